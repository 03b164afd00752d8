//! vmu-logging integration tests

mod configuration;
mod rolling_file;
