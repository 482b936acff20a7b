//! ODBC driver and data-source discovery.
//!
//! Reads the host's unixODBC configuration store: installed drivers from
//! `odbcinst.ini`, user-registered data sources (DSNs) from `odbc.ini`.
//! File locations honor `ODBCSYSINI` and `ODBCINI` with the conventional
//! `/etc` and `$HOME` fallbacks. A host without a store simply has
//! nothing registered, so absent or unreadable files yield empty sets
//! rather than errors.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// One installed ODBC driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverDescriptor {
    /// Display name, the `odbcinst.ini` section header.
    pub name: String,
    /// Path to the driver shared library.
    pub library: String,
}

/// One user-registered data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceDescriptor {
    /// DSN name, the `odbc.ini` section header.
    pub name: String,
    /// Driver library path the DSN references (may be empty).
    pub driver: String,
    /// Remaining DSN properties (Servername, Database, Port, ...).
    pub properties: BTreeMap<String, String>,
}

impl DataSourceDescriptor {
    /// Case-insensitive property lookup.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Snapshot of the host's ODBC configuration store, taken once per run.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub drivers: Vec<DriverDescriptor>,
    pub data_sources: Vec<DataSourceDescriptor>,
}

impl Store {
    /// Read the store from the conventional host locations.
    pub fn discover() -> Self {
        Self::from_files(&drivers_path(), &data_sources_path())
    }

    /// Read the store from explicit file paths.
    pub fn from_files(drivers_file: &Path, sources_file: &Path) -> Self {
        let drivers = read_drivers(drivers_file);
        let data_sources = read_data_sources(sources_file);
        debug!(
            drivers = drivers.len(),
            data_sources = data_sources.len(),
            "scanned ODBC configuration store"
        );
        Self {
            drivers,
            data_sources,
        }
    }
}

/// `odbcinst.ini` location: the `$ODBCSYSINI` directory, `/etc` by default.
pub fn drivers_path() -> PathBuf {
    let dir = match std::env::var("ODBCSYSINI") {
        Ok(dir) if !dir.is_empty() => dir,
        _ => "/etc".to_string(),
    };
    PathBuf::from(dir).join("odbcinst.ini")
}

/// User `odbc.ini` location: `$ODBCINI`, or `$HOME/.odbc.ini`.
pub fn data_sources_path() -> PathBuf {
    if let Ok(path) = std::env::var("ODBCINI") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".odbc.ini"))
        .unwrap_or_else(|| PathBuf::from(".odbc.ini"))
}

fn read_drivers(path: &Path) -> Vec<DriverDescriptor> {
    read_sections(path)
        .into_iter()
        .filter_map(|(name, keys)| {
            // Sections without a Driver key ([ODBC] trace options) are not drivers.
            let library = lookup(&keys, "Driver")?;
            Some(DriverDescriptor {
                name,
                library: library.to_string(),
            })
        })
        .collect()
}

fn read_data_sources(path: &Path) -> Vec<DataSourceDescriptor> {
    read_sections(path)
        .into_iter()
        .filter(|(name, _)| {
            !name.eq_ignore_ascii_case("ODBC Data Sources") && !name.eq_ignore_ascii_case("ODBC")
        })
        .map(|(name, mut keys)| {
            let driver = take(&mut keys, "Driver").unwrap_or_default();
            DataSourceDescriptor {
                name,
                driver,
                properties: keys,
            }
        })
        .collect()
}

fn lookup<'a>(keys: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    keys.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

fn take(keys: &mut BTreeMap<String, String>, key: &str) -> Option<String> {
    let found = keys
        .keys()
        .find(|k| k.eq_ignore_ascii_case(key))
        .cloned()?;
    keys.remove(&found)
}

fn read_sections(path: &Path) -> Vec<(String, BTreeMap<String, String>)> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_ini(&contents),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no ODBC configuration file");
            Vec::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read ODBC configuration file");
            Vec::new()
        }
    }
}

/// Parse the unixODBC INI dialect: `[section]` headers, `key = value`
/// pairs, `;` or `#` comment lines. Unparseable lines are ignored.
fn parse_ini(contents: &str) -> Vec<(String, BTreeMap<String, String>)> {
    let mut sections: Vec<(String, BTreeMap<String, String>)> = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim().to_string();
            sections.push((name, BTreeMap::new()));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        // Key/value lines before any section header have nothing to attach to.
        if let Some((_, keys)) = sections.last_mut() {
            keys.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ODBCINST: &str = r#"
; unixODBC driver registrations
[ODBC]
Trace = No

[PostgreSQL Unicode]
Description = PostgreSQL ODBC driver
Driver      = /usr/lib/psqlodbcw.so
Setup       = /usr/lib/libodbcpsqlS.so

[Excel 12]
Driver = /opt/drivers/libexcelodbc.so
"#;

    const ODBCINI: &str = r#"
[ODBC Data Sources]
warehouse = PostgreSQL Unicode

[warehouse]
Driver     = /usr/lib/psqlodbcw.so
Servername = db.internal
Database   = warehouse
Port       = 5432

# legacy entry, no driver recorded
[orphan]
Database = leftovers
"#;

    #[test]
    fn test_parse_ini_sections_and_comments() {
        let sections = parse_ini(ODBCINST);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].0, "ODBC");
        assert_eq!(sections[1].0, "PostgreSQL Unicode");
        assert_eq!(
            sections[1].1.get("Driver").map(String::as_str),
            Some("/usr/lib/psqlodbcw.so")
        );
        assert_eq!(sections[2].0, "Excel 12");
    }

    #[test]
    fn test_parse_ini_ignores_stray_lines() {
        let sections = parse_ini("orphan = value\n[first]\nnot a pair\nkey = v\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].1.len(), 1);
        assert_eq!(sections[0].1.get("key").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_read_drivers_skips_sections_without_driver_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{ODBCINST}").unwrap();

        let drivers = read_drivers(file.path());
        assert_eq!(drivers.len(), 2);
        assert_eq!(drivers[0].name, "PostgreSQL Unicode");
        assert_eq!(drivers[0].library, "/usr/lib/psqlodbcw.so");
        assert_eq!(drivers[1].name, "Excel 12");
    }

    #[test]
    fn test_read_data_sources_skips_reserved_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{ODBCINI}").unwrap();

        let sources = read_data_sources(file.path());
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "warehouse");
        assert_eq!(sources[0].driver, "/usr/lib/psqlodbcw.so");
        assert_eq!(sources[0].property("Database"), Some("warehouse"));
        assert_eq!(sources[1].name, "orphan");
        assert_eq!(sources[1].driver, "");
    }

    #[test]
    fn test_property_lookup_is_case_insensitive() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{ODBCINI}").unwrap();

        let sources = read_data_sources(file.path());
        assert_eq!(sources[0].property("servername"), Some("db.internal"));
        assert_eq!(sources[0].property("PORT"), Some("5432"));
        assert_eq!(sources[0].property("missing"), None);
    }

    #[test]
    fn test_absent_files_yield_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::from_files(
            &dir.path().join("odbcinst.ini"),
            &dir.path().join("odbc.ini"),
        );
        assert!(store.drivers.is_empty());
        assert!(store.data_sources.is_empty());
    }

    #[test]
    fn test_store_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let inst = dir.path().join("odbcinst.ini");
        let ini = dir.path().join("odbc.ini");
        fs::write(&inst, ODBCINST).unwrap();
        fs::write(&ini, ODBCINI).unwrap();

        let store = Store::from_files(&inst, &ini);
        assert_eq!(store.drivers.len(), 2);
        assert_eq!(store.data_sources.len(), 2);
    }
}
