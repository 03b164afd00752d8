//! vmu-core integration tests

mod build_info;
mod dump;
mod token;
