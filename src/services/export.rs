use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{AppError, Result};
use crate::models::query::{CellValue, QueryResult};

/// One result row rendered as an object keyed by column name.
struct Record<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl Serialize for Record<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

/// Serializes a query result into a downloadable record-array encoding:
/// a JSON array of row objects keyed by column name.
///
/// Pure function; the cell values were already validated by the sandbox,
/// so the only failure mode is the encoder itself.
pub fn serialize(result: &QueryResult) -> Result<Vec<u8>> {
    let records: Vec<Record<'_>> = result
        .rows
        .iter()
        .map(|cells| Record {
            columns: &result.columns,
            cells,
        })
        .collect();

    sonic_rs::to_vec(&records)
        .map_err(|e| AppError::Internal(format!("export serialization failed: {}", e)))
}
