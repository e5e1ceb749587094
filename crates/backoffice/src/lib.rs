//! Staffing back-office binary library.
//!
//! This crate provides the command-line interface, configuration loading
//! and the wiring of grids, event pipelines and pollers.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use app::{Backoffice, DLM_ENTITIES};
pub use config::AppConfig;
pub use error::{BackofficeError, Result};
