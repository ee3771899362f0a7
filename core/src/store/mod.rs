//! In-memory SQLite snapshot of the three source tables.
//!
//! RULE: Only the store talks to the database.
//! Analyses call store methods; they never execute SQL directly.
//! The snapshot is written once while loading and is read-only afterwards.

mod quality;
mod reconciliation;
mod reporting;

pub use reconciliation::PremiumPair;
pub use reporting::BookingStateTotals;

use crate::{
    config::RunConfig,
    error::{ReconError, ReconResult},
    types::{ColumnKind, SourceTable},
};
use rusqlite::{
    params_from_iter,
    types::{Value, ValueRef},
    Connection, Row,
};
use serde_json::{Map, Number, Value as JsonValue};
use std::io::Read;

/// One source row, with every schema column rendered for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 1-based position of the row in its input file.
    pub row_num: i64,
    pub policy_id: Option<String>,
    pub detail: Map<String, JsonValue>,
}

pub struct SourceStore {
    conn: Connection,
}

impl SourceStore {
    /// Open an empty snapshot with the source schema applied.
    pub fn in_memory() -> ReconResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> ReconResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_sources.sql"))?;
        Ok(())
    }

    /// Load all three inputs from the locations named by `config`.
    /// A missing file aborts the load; nothing is substituted.
    pub fn load(config: &RunConfig) -> ReconResult<Self> {
        let mut store = Self::in_memory()?;
        for table in SourceTable::ALL {
            let path = config.input_path(table);
            if !path.is_file() {
                return Err(ReconError::MissingInput {
                    table: table.name().to_string(),
                    path: path.display().to_string(),
                });
            }
            let reader = csv_reader().from_path(&path)?;
            let rows = store.load_table(table, reader)?;
            log::info!("Loaded {rows} rows into {table} from {}", path.display());
        }
        Ok(store)
    }

    /// Load from in-memory readers. Used by tests and embedding callers.
    pub fn from_readers<P, G, C>(policies: P, gl: G, claims: C) -> ReconResult<Self>
    where
        P: Read,
        G: Read,
        C: Read,
    {
        let mut store = Self::in_memory()?;
        store.load_table(SourceTable::Policies, csv_reader().from_reader(policies))?;
        store.load_table(SourceTable::AccountingGl, csv_reader().from_reader(gl))?;
        store.load_table(SourceTable::Claims, csv_reader().from_reader(claims))?;
        Ok(store)
    }

    fn load_table<R: Read>(
        &mut self,
        table: SourceTable,
        mut reader: csv::Reader<R>,
    ) -> ReconResult<usize> {
        let headers = reader.headers()?.clone();
        let columns = table.columns();

        // Header position of every required column, in schema order.
        let positions = columns
            .iter()
            .map(|col| {
                headers
                    .iter()
                    .position(|h| h == col.name)
                    .ok_or_else(|| ReconError::MissingColumn {
                        table: table.name().to_string(),
                        column: col.name.to_string(),
                    })
            })
            .collect::<ReconResult<Vec<_>>>()?;

        let column_list = columns.iter().map(|c| c.name).collect::<Vec<_>>().join(", ");
        let placeholders = (1..=columns.len() + 1)
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {table} (row_num, {column_list}) VALUES ({placeholders})"
        );

        let tx = self.conn.transaction()?;
        let mut count = 0usize;
        {
            let mut stmt = tx.prepare(&sql)?;
            for (idx, record) in reader.records().enumerate() {
                let record = record?;
                let row_num = idx + 1;
                let mut values = Vec::with_capacity(columns.len() + 1);
                values.push(Value::Integer(row_num as i64));
                for (col, &pos) in columns.iter().zip(&positions) {
                    let raw = record.get(pos).unwrap_or("");
                    values.push(parse_field(table, row_num, col.name, col.kind, raw)?);
                }
                stmt.execute(params_from_iter(values.iter()))?;
                count += 1;
            }
        }
        tx.commit()?;
        Ok(count)
    }

    pub fn row_count(&self, table: SourceTable) -> ReconResult<i64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {table}"),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// All rows of `table` matching `predicate`, in input order.
    fn rows_where(&self, table: SourceTable, predicate: &str) -> ReconResult<Vec<SourceRow>> {
        let column_list = table
            .columns()
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT row_num, {column_list} FROM {table}
             WHERE {predicate}
             ORDER BY row_num ASC"
        ))?;
        let rows = stmt
            .query_map([], |row| map_source_row(table, row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn csv_reader() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).trim(csv::Trim::All);
    builder
}

/// Tokens read as missing in any column. This is the default NA set of the
/// pandas CSV reader that upstream producers and consumers use.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_null_marker(raw: &str) -> bool {
    NULL_MARKERS.contains(&raw)
}

fn parse_field(
    table: SourceTable,
    row_num: usize,
    column: &str,
    kind: ColumnKind,
    raw: &str,
) -> ReconResult<Value> {
    if is_null_marker(raw) {
        return Ok(Value::Null);
    }
    match kind {
        ColumnKind::Text => Ok(Value::Text(raw.to_string())),
        ColumnKind::Real => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Value::Real)
            .ok_or_else(|| ReconError::InvalidValue {
                table: table.name().to_string(),
                row: row_num,
                column: column.to_string(),
                value: raw.to_string(),
            }),
    }
}

fn map_source_row(table: SourceTable, row: &Row<'_>) -> rusqlite::Result<SourceRow> {
    let row_num: i64 = row.get(0)?;
    let mut detail = Map::new();
    let mut policy_id = None;
    for (i, col) in table.columns().iter().enumerate() {
        let value = match row.get_ref(i + 1)? {
            ValueRef::Null => JsonValue::Null,
            ValueRef::Integer(n) => JsonValue::from(n),
            ValueRef::Real(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
            ValueRef::Text(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(_) => JsonValue::Null,
        };
        if col.name == "policy_id" {
            policy_id = value.as_str().map(str::to_string);
        }
        detail.insert(col.name.to_string(), value);
    }
    Ok(SourceRow {
        row_num,
        policy_id,
        detail,
    })
}
