pub mod commands;
pub mod config;
pub mod keys;
pub mod outputs;
pub mod validation;
pub mod verify;
