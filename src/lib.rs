//! ODBC Probe Library
//!
//! Enumerates the host's ODBC drivers and user data sources, connects to
//! each reachable source, and renders bounded Markdown previews of its
//! base tables.

pub mod config;
pub mod connect;
pub mod error;
pub mod inspect;
pub mod preview;
pub mod registry;
pub mod runner;

pub use config::Settings;
pub use error::{ProbeError, ProbeResult};
pub use preview::{PREVIEW_ROW_CAP, Preview};
