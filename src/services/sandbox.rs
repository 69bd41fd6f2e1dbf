use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, params, types::Value as SqlValue};

use crate::error::{AppError, Result};
use crate::models::principal::Role;
use crate::models::query::{CellValue, QueryRequest, QueryResult};

/// Executes caller-supplied read queries against the survey database.
///
/// Holds only the database path; a fresh connection is opened per call and
/// released on every exit path. Opening with `SQLITE_OPEN_READ_ONLY` gives
/// the read-only execution context the store supports, on top of the
/// lexical gate below.
#[derive(Clone)]
pub struct QuerySandbox {
    database_path: PathBuf,
}

impl QuerySandbox {
    /// Creates a sandbox over the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: path.into(),
        }
    }

    /// Validates and executes a query request.
    ///
    /// The statement must pass the read-only gate before the store is
    /// contacted at all. `role` is accepted for forward compatibility
    /// (per-role statement restrictions); no role-based filtering is
    /// applied today, so any authenticated principal may run any read
    /// query.
    ///
    /// Store failures come back as `Execution` with the store's own
    /// diagnostic text.
    pub async fn execute(&self, request: QueryRequest, role: Role) -> Result<QueryResult> {
        if !is_read_only(&request.statement) {
            tracing::warn!(%role, "statement rejected by read-only gate");
            return Err(AppError::RejectedQuery);
        }

        let path = self.database_path.clone();
        let QueryRequest {
            statement,
            limit,
            offset,
        } = request;

        // SQLite work is synchronous; keep it off the async runtime.
        tokio::task::spawn_blocking(move || run_bounded(&path, &statement, limit, offset))
            .await
            .map_err(|e| AppError::Internal(format!("query task failed: {}", e)))?
    }
}

/// The read-only gate.
///
/// A conservative lexical check, not a parser: after trimming leading
/// whitespace and ASCII case-folding, the statement must begin with
/// `select`. A SELECT that invokes a side-effecting function would pass;
/// that residual risk is accepted and mitigated by the read-only
/// connection, not by deeper analysis.
fn is_read_only(statement: &str) -> bool {
    statement
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("select")
}

/// Wraps the statement in the outer pagination boundary and runs it.
///
/// The caller's SQL becomes a nested subquery with its casing preserved;
/// limit and offset are bound parameters, never interpolated, so the
/// pagination path cannot reintroduce injection.
fn run_bounded(path: &Path, statement: &str, limit: u32, offset: u32) -> Result<QueryResult> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| AppError::Execution(e.to_string()))?;

    let bounded = format!("SELECT * FROM ({}) LIMIT ?1 OFFSET ?2", statement);

    let mut stmt = conn
        .prepare(&bounded)
        .map_err(|e| AppError::Execution(e.to_string()))?;

    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut rows = stmt
        .query(params![limit, offset])
        .map_err(|e| AppError::Execution(e.to_string()))?;

    let mut out: Vec<Vec<CellValue>> = Vec::new();
    while let Some(row) = rows.next().map_err(|e| AppError::Execution(e.to_string()))? {
        let mut record = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            let value = row
                .get::<usize, SqlValue>(index)
                .map_err(|e| AppError::Execution(e.to_string()))?;
            record.push(CellValue::from(value));
        }
        out.push(record);
    }

    let row_count = out.len();
    Ok(QueryResult {
        columns,
        rows: out,
        row_count,
    })
}
