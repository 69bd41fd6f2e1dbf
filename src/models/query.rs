use serde::{Deserialize, Serialize};

/// The request payload for running a query.
#[derive(Deserialize, Debug)]
pub struct QueryRequest {
    /// The caller-supplied SQL statement.
    pub statement: String,
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Number of rows to skip before returning.
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    50
}

/// A single result cell.
///
/// The store hands back dynamically typed values; this variant pins the
/// contract to the scalar types the gateway supports. Serialized untagged,
/// so JSON output carries plain scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<rusqlite::types::Value> for CellValue {
    fn from(value: rusqlite::types::Value) -> Self {
        use rusqlite::types::Value;
        match value {
            Value::Null => CellValue::Null,
            Value::Integer(n) => CellValue::Int(n),
            Value::Real(f) => CellValue::Float(f),
            Value::Text(s) => CellValue::Text(s),
            // The cell contract has no binary case; BLOBs hex-encode.
            Value::Blob(bytes) => CellValue::Text(hex::encode(bytes)),
        }
    }
}

/// A tabular query result.
///
/// Column names and row values come verbatim from the store, in store
/// order. Produced fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names, in result-set order.
    pub columns: Vec<String>,
    /// Rows, each in column order.
    pub rows: Vec<Vec<CellValue>>,
    /// Number of rows actually returned (bounded by the request limit).
    pub row_count: usize,
}
