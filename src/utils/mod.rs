// Shared utilities: configuration, errors, logging and validation
pub mod config;
pub mod error;
pub mod logging;
pub mod validation;
