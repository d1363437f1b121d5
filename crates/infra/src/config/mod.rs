//! Configuration loading
//!
//! Environment variables first, then config files.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, find_config_file};
