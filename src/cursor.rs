use std::collections::BTreeSet;

use tracing::debug;

use crate::connection::Connection;
use crate::error::{Result, SqlHttpError};
use crate::protocol::{QueryResponse, Record};
use crate::render;
use crate::types::{ColumnDesc, DataFrame, Row, SqlValue};

fn no_execution() -> SqlHttpError {
    SqlHttpError::Programming("no query has been executed".to_string())
}

/// A cursor over one query execution's materialized result set.
///
/// The remote endpoint returns per-row JSON objects whose key sets may
/// differ from row to row. On every execution the cursor reconciles them
/// into one fixed column schema and a table of fixed-arity rows, then
/// serves positional fetches against that table. The cursor borrows its
/// connection and never closes it.
pub struct Cursor<'conn> {
    conn: &'conn Connection,
    closed: bool,
    table: Option<Vec<Row>>,
    description: Option<Vec<ColumnDesc>>,
    rowcount: i64,
    arraysize: usize,
    position: usize,
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("closed", &self.closed)
            .field("table", &self.table)
            .field("description", &self.description)
            .field("rowcount", &self.rowcount)
            .field("arraysize", &self.arraysize)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl<'conn> Cursor<'conn> {
    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            closed: false,
            table: None,
            description: None,
            rowcount: -1,
            arraysize: 1,
            position: 0,
        }
    }

    /// Column descriptors for the last execution, or `None` before one.
    pub fn description(&self) -> Option<&[ColumnDesc]> {
        self.description.as_deref()
    }

    /// Number of rows materialized by the last execution, -1 before one.
    pub fn rowcount(&self) -> i64 {
        self.rowcount
    }

    /// Default batch size for `fetch_many` when no size is given.
    pub fn arraysize(&self) -> usize {
        self.arraysize
    }

    /// Set the default `fetch_many` batch size. Zero is rejected.
    pub fn set_arraysize(&mut self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(SqlHttpError::Programming(
                "arraysize must be at least 1".to_string(),
            ));
        }
        self.arraysize = size;
        Ok(())
    }

    /// Liveness guard run at the start of every public operation.
    fn guard_open(&self) -> Result<()> {
        if self.closed {
            return Err(SqlHttpError::Interface("cursor is closed".to_string()));
        }
        if self.conn.is_closed() {
            return Err(SqlHttpError::Interface("connection is closed".to_string()));
        }
        Ok(())
    }

    /// The materialized table, or a programming error before any execution.
    fn materialized(&self) -> Result<&[Row]> {
        self.table.as_deref().ok_or_else(no_execution)
    }

    /// Execute a query against the connection's endpoint.
    pub fn execute(&mut self, operation: &str) -> Result<()> {
        self.execute_params(operation, &[])
    }

    /// Execute with an explicit parameter set.
    ///
    /// The remote protocol has no placeholder syntax; any non-empty
    /// parameter set is rejected, never silently ignored. Rejection happens
    /// before any request is sent, so prior results stay fetchable.
    pub fn execute_params(&mut self, operation: &str, params: &[SqlValue]) -> Result<()> {
        self.guard_open()?;

        if !params.is_empty() {
            return Err(SqlHttpError::Programming(
                "parameterized queries are not supported".to_string(),
            ));
        }

        match self.conn.execute_query(operation, &[]) {
            Ok(response) => {
                self.materialize(response);
                Ok(())
            }
            Err(e) => {
                // A failed execution must never leave a stale partial
                // result visible to subsequent fetches.
                self.reset();
                Err(e)
            }
        }
    }

    /// Batch execution is rejected: the endpoint is read-only and there is
    /// nothing meaningful to batch.
    pub fn execute_many(&mut self, _operation: &str, _param_sets: &[Vec<SqlValue>]) -> Result<()> {
        self.guard_open()?;
        Err(SqlHttpError::NotSupported(
            "executemany is not supported for a read-only endpoint".to_string(),
        ))
    }

    /// Reconcile a decoded response into the cursor's table and schema.
    fn materialize(&mut self, response: QueryResponse) {
        let records = response.rows.unwrap_or_default();
        let (description, rows) = reconcile(&records);
        debug!(
            rows = rows.len(),
            columns = description.len(),
            "materialized result set"
        );
        self.description = Some(description);
        self.rowcount = rows.len() as i64;
        self.table = Some(rows);
        self.position = 0;
    }

    /// Return the cursor to its fresh, no-execution state.
    fn reset(&mut self) {
        self.table = None;
        self.description = None;
        self.rowcount = -1;
        self.position = 0;
    }

    /// Fetch the row at the current position and advance by one.
    /// Returns `None` once the position has reached the row count.
    pub fn fetch_one(&mut self) -> Result<Option<Row>> {
        self.guard_open()?;
        let rows = self.materialized()?;
        if self.position >= rows.len() {
            return Ok(None);
        }
        let row = rows[self.position].clone();
        self.position += 1;
        Ok(Some(row))
    }

    /// Fetch up to `size` rows (the arraysize when unspecified), advancing
    /// the position past them. Empty at end-of-results, never an error.
    pub fn fetch_many(&mut self, size: Option<usize>) -> Result<Vec<Row>> {
        self.guard_open()?;
        let size = size.unwrap_or(self.arraysize);
        let rows = self.materialized()?;
        let start = self.position;
        let end = start.saturating_add(size).min(rows.len());
        let batch = rows[start..end].to_vec();
        self.position = end;
        Ok(batch)
    }

    /// Fetch every remaining row, advancing the position to the end.
    pub fn fetch_all(&mut self) -> Result<Vec<Row>> {
        self.guard_open()?;
        let rows = self.materialized()?;
        let batch = rows[self.position..].to_vec();
        self.position = rows.len();
        Ok(batch)
    }

    /// Iterate over the remaining rows via repeated `fetch_one`.
    pub fn rows(&mut self) -> Rows<'_, 'conn> {
        Rows { cursor: self }
    }

    /// Render the full materialized table as an aligned text table.
    ///
    /// A pure projection: no network, no reconciliation, and the fetch
    /// position is untouched.
    pub fn display_table(&self) -> Result<String> {
        self.guard_open()?;
        match (&self.description, &self.table) {
            (Some(description), Some(rows)) => Ok(render::format_table(description, rows)),
            _ => Err(no_execution()),
        }
    }

    /// Project the full materialized table into a `DataFrame`.
    ///
    /// A pure projection, like `display_table`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        self.guard_open()?;
        match (&self.description, &self.table) {
            (Some(description), Some(rows)) => {
                let columns = description.iter().map(|d| d.name.clone()).collect();
                Ok(DataFrame::new(columns, rows))
            }
            _ => Err(no_execution()),
        }
    }

    /// Close the cursor, discarding the materialized table and schema.
    pub fn close(&mut self) {
        self.closed = true;
        self.reset();
    }

    /// Returns true once the cursor has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Iterator over a cursor's remaining rows.
/// Terminates when `fetch_one` returns its no-more-rows sentinel.
pub struct Rows<'cur, 'conn> {
    cursor: &'cur mut Cursor<'conn>,
}

impl Iterator for Rows<'_, '_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.fetch_one().transpose()
    }
}

/// Reconcile heterogeneous records into one schema and fixed-arity rows.
///
/// The schema is the lexicographically sorted union of every key appearing
/// in any record, so column order does not depend on which record happened
/// to come first. A record that omits a column yields `Null` at that
/// position.
fn reconcile(records: &[Record]) -> (Vec<ColumnDesc>, Vec<Row>) {
    if records.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let names: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();

    let description = names.iter().map(|name| ColumnDesc::opaque(*name)).collect();

    let rows = records
        .iter()
        .map(|record| {
            Row::new(
                names
                    .iter()
                    .map(|name| {
                        record
                            .get(*name)
                            .map(SqlValue::from_json)
                            .unwrap_or(SqlValue::Null)
                    })
                    .collect(),
            )
        })
        .collect();

    (description, rows)
}
