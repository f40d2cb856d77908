//! Read-only access to the rasdaemon SQLite database.
//!
//! Every scrape opens its own connection with `SQLITE_OPEN_READ_ONLY`, so the
//! exporter never creates or modifies the file and needs no locking between
//! concurrent requests.

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::families::{MetricFamily, MC_EVENT_COLUMNS, MC_EVENT_TABLE};

/// How long a query waits for rasdaemon to release a write lock.
const BUSY_TIMEOUT: Duration = Duration::from_millis(2000);

/// Errors raised while reading the rasdaemon database.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("rasdaemon database not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot access rasdaemon database {}: {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open rasdaemon database {} read-only: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("query for {family} failed: {source}")]
    Query {
        family: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

/// Sample value as read from SQLite. Integer sums stay exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleValue {
    Integer(i64),
    Float(f64),
}

impl SampleValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            SampleValue::Integer(i) => i as f64,
            SampleValue::Float(f) => f,
        }
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SampleValue::Integer(i) => write!(f, "{}", i),
            SampleValue::Float(v) => f.write_str(&crate::exposition::format_value(v)),
        }
    }
}

/// One exposition line: ordered labels plus the sample value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub labels: Vec<(String, String)>,
    pub value: SampleValue,
}

/// Result of running one family query.
#[derive(Debug, Clone)]
pub struct FamilySnapshot {
    pub family: &'static MetricFamily,
    pub samples: Vec<Sample>,
}

/// Opens a fresh read-only connection to the database at `path`.
pub fn open_read_only(path: &Path) -> Result<Connection, DbError> {
    // Only a missing file is NotFound; EACCES on a parent directory is not.
    if let Err(e) = std::fs::metadata(path) {
        return Err(if e.kind() == io::ErrorKind::NotFound {
            DbError::NotFound(path.to_path_buf())
        } else {
            DbError::Access {
                path: path.to_path_buf(),
                source: e,
            }
        });
    }

    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags).map_err(|source| DbError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|source| DbError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(conn)
}

/// Runs the query of `family` and converts every row into a [`Sample`].
pub fn query_family(
    conn: &Connection,
    family: &'static MetricFamily,
) -> Result<FamilySnapshot, DbError> {
    let query_err = |source| DbError::Query {
        family: family.name,
        source,
    };

    let mut stmt = conn.prepare(family.query).map_err(query_err)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let value_idx = columns.iter().position(|c| c == family.value_column);

    let mut rows = stmt.query([]).map_err(query_err)?;
    let mut samples = Vec::new();

    while let Some(row) = rows.next().map_err(query_err)? {
        let mut labels = Vec::with_capacity(columns.len().saturating_sub(1));
        let mut value = SampleValue::Integer(0);

        for (idx, name) in columns.iter().enumerate() {
            let raw = row.get_ref(idx).map_err(query_err)?;
            if Some(idx) == value_idx {
                value = numeric_value(raw);
            } else {
                labels.push((name.clone(), label_value(raw)));
            }
        }

        samples.push(Sample { labels, value });
    }

    debug!("{}: {} samples", family.name, samples.len());
    Ok(FamilySnapshot { family, samples })
}

/// Opens the database once and collects every family in `families`.
#[instrument(skip(families))]
pub fn collect(
    path: &Path,
    families: &'static [MetricFamily],
) -> Result<Vec<FamilySnapshot>, DbError> {
    let conn = open_read_only(path)?;
    families
        .iter()
        .map(|family| query_family(&conn, family))
        .collect()
}

fn label_value(raw: ValueRef<'_>) -> String {
    match raw {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

fn numeric_value(raw: ValueRef<'_>) -> SampleValue {
    match raw {
        ValueRef::Integer(i) => SampleValue::Integer(i),
        ValueRef::Real(f) => SampleValue::Float(f),
        ValueRef::Text(t) => {
            let text = std::str::from_utf8(t).unwrap_or("").trim();
            if let Ok(i) = text.parse::<i64>() {
                SampleValue::Integer(i)
            } else {
                text.parse::<f64>()
                    .map(SampleValue::Float)
                    .unwrap_or(SampleValue::Integer(0))
            }
        }
        ValueRef::Null | ValueRef::Blob(_) => SampleValue::Integer(0),
    }
}

/// Summary of the database layout, used by the `check` subcommand.
#[derive(Debug, Clone)]
pub struct DatabaseReport {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub has_mc_event: bool,
    pub missing_columns: Vec<String>,
    pub mc_event_rows: u64,
}

impl DatabaseReport {
    /// True if every exported family can be queried.
    pub fn is_usable(&self) -> bool {
        self.has_mc_event && self.missing_columns.is_empty()
    }
}

/// Inspects the `mc_event` table without running the exported queries.
pub fn inspect(path: &Path) -> Result<DatabaseReport, DbError> {
    let conn = open_read_only(path)?;
    let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let query_err = |source| DbError::Query {
        family: MC_EVENT_TABLE,
        source,
    };

    let present: Vec<String> = {
        let mut stmt = conn
            .prepare("SELECT name FROM pragma_table_info(?1)")
            .map_err(query_err)?;
        let names = stmt
            .query_map([MC_EVENT_TABLE], |row| row.get::<_, String>(0))
            .map_err(query_err)?;
        let present = names
            .collect::<Result<Vec<String>, _>>()
            .map_err(query_err)?;
        present
    };

    let has_mc_event = !present.is_empty();
    let missing_columns = MC_EVENT_COLUMNS
        .iter()
        .filter(|c| !present.iter().any(|p| p == *c))
        .map(|c| c.to_string())
        .collect();

    let mc_event_rows = if has_mc_event {
        conn.query_row("SELECT COUNT(*) FROM mc_event", [], |row| row.get::<_, i64>(0))
            .map_err(query_err)? as u64
    } else {
        0
    };

    Ok(DatabaseReport {
        path: path.to_path_buf(),
        size_bytes,
        has_mc_event,
        missing_columns,
        mc_event_rows,
    })
}
