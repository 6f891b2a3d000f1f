/// Canonical output key names exposed by the infrastructure configuration.
///
/// Always use these constants instead of string literals for output keys.
pub mod outputs {
    // Compute service
    pub const CLOUD_RUN_URL: &str = "cloud_run_url";

    // Managed database
    pub const DB_INSTANCE_NAME: &str = "db_instance_name";

    // Object storage
    pub const MEDIA_BUCKET_NAME: &str = "media_bucket_name";

    // Shared across resource groups
    pub const PROJECT_ID: &str = "project_id";
    pub const REGION: &str = "region";
}

/// Environment variables that override configuration file values
pub mod env {
    pub const DIR: &str = "INFRA_VERIFY_DIR";
    pub const BINARY: &str = "INFRA_VERIFY_BINARY";
    pub const SOURCE: &str = "INFRA_VERIFY_SOURCE";
    pub const STATE_FILE: &str = "INFRA_VERIFY_STATE_FILE";
    pub const TIMEOUT_SECS: &str = "INFRA_VERIFY_TIMEOUT_SECS";

    /// Every override variable, in precedence-free order
    pub const ALL: &[&str] = &[DIR, BINARY, SOURCE, STATE_FILE, TIMEOUT_SECS];
}
