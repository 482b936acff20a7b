//! The probe run.
//!
//! Works through every assembled target in order: connect, walk the
//! catalog, preview each base table. A failing target is logged and
//! skipped so the remaining sources still get probed; the summary lets
//! the caller turn any failures into a non-zero exit.

use tracing::{debug, error, info};

use crate::config::Settings;
use crate::connect::{self, DriverFamily, ProbeTarget};
use crate::error::{ProbeError, ProbeResult};
use crate::inspect::{self, OdbcConnection};
use crate::preview::Preview;
use crate::registry::Store;

/// Outcome of a run, for deriving the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Targets attempted.
    pub targets: usize,
    /// Targets that failed to connect or query.
    pub failures: usize,
}

impl RunSummary {
    /// Fold the summary into the process-level result.
    pub fn into_result(self) -> ProbeResult<()> {
        if self.failures > 0 {
            Err(ProbeError::sources_failed(self.failures, self.targets))
        } else {
            Ok(())
        }
    }
}

/// Probe every target assembled from settings, environment, and the store.
pub fn run(settings: &Settings, store: &Store) -> RunSummary {
    let targets = connect::probe_targets(
        settings,
        Settings::env_connection_string().as_deref(),
        store,
    );

    if targets.is_empty() {
        info!("no data sources configured; nothing to probe");
        return RunSummary {
            targets: 0,
            failures: 0,
        };
    }

    let total = targets.len();
    let mut failures = 0usize;

    for target in &targets {
        if let Err(e) = probe_target(target) {
            error!(source = %target.label, error = %e, "probe failed");
            failures += 1;
        }
    }

    RunSummary {
        targets: total,
        failures,
    }
}

/// Connect to one target and preview every base table it exposes.
///
/// The connection, and any cursor opened on it, is dropped before this
/// returns, on success and failure alike.
fn probe_target(target: &ProbeTarget) -> ProbeResult<()> {
    info!(source = %target.label, "probing data source");
    let conn = inspect::open_connection(&target.label, &target.connection_string)?;

    if let Ok(dbms) = inspect::dbms_name(&conn) {
        debug!(source = %target.label, dbms = %dbms, "connected");
    }

    let tables = inspect::list_base_tables(&conn)?;
    debug!(source = %target.label, count = tables.len(), "found base tables");

    for table in &tables {
        preview_table(&conn, &table.name, target.family)?;
    }

    Ok(())
}

/// Query one table and print its preview. Empty tables print nothing.
fn preview_table(conn: &OdbcConnection, table: &str, family: DriverFamily) -> ProbeResult<()> {
    let Some(mut rows) = inspect::select_all(conn, table, family)? else {
        return Ok(());
    };

    let collected =
        Preview::collect(&mut rows).map_err(|e| ProbeError::query(table, e.to_string()))?;

    if let Some(preview) = collected {
        println!("{}", preview.render(table));
    }

    Ok(())
}
