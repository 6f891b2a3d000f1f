use anyhow::Result;
use infra_verify::commands::{list, output, run};

use super::types::Commands;

pub fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            units,
            source,
            json,
        } => run::execute(units, source.config.as_deref(), &source.overrides(), json),
        Commands::List { json } => list::execute(json),
        Commands::Output {
            key,
            show_sensitive,
            source,
        } => output::show(
            &key,
            show_sensitive,
            source.config.as_deref(),
            &source.overrides(),
        ),
        Commands::Outputs { source } => output::list(source.config.as_deref(), &source.overrides()),
    }
}
