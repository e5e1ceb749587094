//! REST API for the staffing back-office.
//!
//! This crate serves:
//! - Server-paged grids in the legacy DataTables wire format
//! - The subscription-event webhook and recent pipeline reports
//! - The related-entity field catalog
//!
//! # Example
//!
//! ```ignore
//! use backoffice_api::{ApiConfig, AppState, serve};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(/* ... */);
//!     let config = ApiConfig::default();
//!
//!     serve(config, state).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;
