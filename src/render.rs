//! Text-table rendering for already-materialized results.

use crate::types::{ColumnDesc, Row, SqlValue};

fn cell(row: &Row, idx: usize) -> String {
    match row.get(idx) {
        Some(value) => value.to_string(),
        None => SqlValue::Null.to_string(),
    }
}

/// Format a result set as an aligned text table with a row-count trailer.
pub fn format_table(columns: &[ColumnDesc], rows: &[Row]) -> String {
    let ncols = columns.len();
    let mut out = String::new();

    if ncols > 0 {
        // Compute column widths
        let mut widths: Vec<usize> = columns.iter().map(|c| c.name.len()).collect();
        for row in rows {
            for (i, w) in widths.iter_mut().enumerate() {
                *w = (*w).max(cell(row, i).len());
            }
        }

        // Header
        let header: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c.name, width = widths[i]))
            .collect();
        out.push_str(&format!(" {} \n", header.join(" | ")));

        // Separator
        let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w + 2)).collect();
        out.push_str(&format!("{}\n", sep.join("+")));

        // Rows
        for row in rows {
            let cells: Vec<String> = (0..ncols)
                .map(|i| format!("{:<width$}", cell(row, i), width = widths[i]))
                .collect();
            out.push_str(&format!(" {} \n", cells.join(" | ")));
        }
    }

    let count = rows.len();
    out.push_str(&format!(
        "({} row{})\n",
        count,
        if count == 1 { "" } else { "s" }
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<ColumnDesc> {
        names.iter().map(|n| ColumnDesc::opaque(*n)).collect()
    }

    #[test]
    fn test_format_table_alignment_and_trailer() {
        let cols = columns(&["id", "name"]);
        let rows = vec![
            Row::new(vec![SqlValue::Int(1), SqlValue::Text("Alice".to_string())]),
            Row::new(vec![SqlValue::Int(2), SqlValue::Null]),
        ];
        let out = format_table(&cols, &rows);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " id | name  ");
        assert_eq!(lines[1], "----+-------");
        assert_eq!(lines[2], " 1  | Alice ");
        assert_eq!(lines[3], " 2  | NULL  ");
        assert_eq!(lines[4], "(2 rows)");
    }

    #[test]
    fn test_format_table_single_row_trailer() {
        let cols = columns(&["a"]);
        let rows = vec![Row::new(vec![SqlValue::Int(1)])];
        let out = format_table(&cols, &rows);
        assert!(out.ends_with("(1 row)\n"));
    }

    #[test]
    fn test_format_table_empty() {
        let out = format_table(&[], &[]);
        assert_eq!(out, "(0 rows)\n");
    }
}
