//! Connection string assembly.
//!
//! Turns the configuration store snapshot plus the settings/environment
//! inputs into the ordered list of [`ProbeTarget`]s a run works through.
//! A DSN only yields a target when it references an installed driver and
//! carries the server, database, and port properties; anything else is
//! skipped silently, matching how ODBC administrators leave half-filled
//! entries lying around.

use tracing::debug;

use crate::config::Settings;
use crate::registry::{DataSourceDescriptor, DriverDescriptor, Store};

/// Source label for the settings-file default connection string.
pub const SETTINGS_LABEL: &str = "settings";

/// Source label for the environment override connection string.
pub const ENV_LABEL: &str = "env";

/// Coarse driver classification, used only for SQL identifier quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverFamily {
    /// Spreadsheet drivers; table names need bracket quoting.
    Excel,
    /// Everything else.
    #[default]
    Generic,
}

impl DriverFamily {
    /// Classify an installed driver by its display name.
    pub fn of_driver(name: &str) -> Self {
        if name.to_ascii_lowercase().contains("excel") {
            Self::Excel
        } else {
            Self::Generic
        }
    }
}

/// One unit of work for a probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    /// Where the connection string came from: `settings`, `env`, or a DSN name.
    pub label: String,
    /// The string handed to the driver manager, never inspected afterwards.
    pub connection_string: String,
    /// Driver family for the SQL the schema walk generates.
    pub family: DriverFamily,
}

impl ProbeTarget {
    pub fn new(
        label: impl Into<String>,
        connection_string: impl Into<String>,
        family: DriverFamily,
    ) -> Self {
        Self {
            label: label.into(),
            connection_string: connection_string.into(),
            family,
        }
    }
}

/// Synthesize a driver connection string for one DSN.
///
/// Returns `None` when the DSN does not reference an installed driver's
/// library (case-insensitive path comparison) or lacks any of the
/// `Servername`, `Database`, and `Port` properties. Such DSNs are
/// skipped, not errors.
pub fn build_connection_string(
    dsn: &DataSourceDescriptor,
    drivers: &[DriverDescriptor],
) -> Option<(String, DriverFamily)> {
    if dsn.driver.is_empty() {
        return None;
    }
    let driver = drivers
        .iter()
        .find(|d| d.library.eq_ignore_ascii_case(&dsn.driver))?;

    let server = dsn.property("Servername")?;
    let database = dsn.property("Database")?;
    let port = dsn.property("Port")?;

    let connection_string = format!(
        "Driver={{{}}};Server={};Port={};Database={};Uid=user;Pwd=password;",
        driver.name, server, port, database
    );
    Some((connection_string, DriverFamily::of_driver(&driver.name)))
}

/// Assemble the targets of a run in their fixed order: the settings-file
/// default, the environment override, then every discovered data source.
pub fn probe_targets(
    settings: &Settings,
    env_override: Option<&str>,
    store: &Store,
) -> Vec<ProbeTarget> {
    let mut targets = Vec::new();

    if let Some(default) = settings.connection_string.as_deref() {
        if !default.is_empty() {
            targets.push(ProbeTarget::new(
                SETTINGS_LABEL,
                default,
                DriverFamily::Generic,
            ));
        }
    }

    if let Some(overridden) = env_override {
        if !overridden.is_empty() {
            targets.push(ProbeTarget::new(ENV_LABEL, overridden, DriverFamily::Generic));
        }
    }

    for dsn in &store.data_sources {
        match build_connection_string(dsn, &store.drivers) {
            Some((connection_string, family)) => {
                targets.push(ProbeTarget::new(dsn.name.clone(), connection_string, family));
            }
            None => {
                debug!(dsn = %dsn.name, "skipping data source without a usable configuration");
            }
        }
    }

    targets
}
