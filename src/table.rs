//! Parsed tabular structure produced by the delimited-text and columnar
//! validators for downstream use.
//!
//! This is a plain column-names-plus-rows shape: the pipeline enumerates
//! columns but performs no semantic validation of record contents, so there
//! is no user-facing schema type.

/// A single cell in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing/empty value.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 text.
    Text(String),
}

/// In-memory tabular view of a parsed upload.
///
/// Rows are stored row-major in the same order as `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column names in file order.
    pub columns: Vec<String>,
    /// Row-major cell storage.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Number of data rows (the header is not a row).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows whose cells are all [`Cell::Null`].
    pub fn empty_row_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| !row.is_empty() && row.iter().all(|c| matches!(c, Cell::Null)))
            .count()
    }

    /// Fraction of null cells across the whole table, in `0.0..=1.0`.
    ///
    /// Returns `0.0` for a table with no data cells.
    pub fn null_fraction(&self) -> f64 {
        let total: usize = self.rows.iter().map(Vec::len).sum();
        if total == 0 {
            return 0.0;
        }
        let nulls = self
            .rows
            .iter()
            .flatten()
            .filter(|c| matches!(c, Cell::Null))
            .count();
        nulls as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Table};

    fn two_by_two() -> Table {
        Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![Cell::Text("1".to_string()), Cell::Null],
                vec![Cell::Null, Cell::Null],
            ],
        )
    }

    #[test]
    fn counts_match_shape() {
        let t = two_by_two();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.empty_row_count(), 1);
    }

    #[test]
    fn null_fraction_counts_null_cells() {
        let t = two_by_two();
        assert!((t.null_fraction() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn null_fraction_of_empty_table_is_zero() {
        let t = Table::new(vec!["a".to_string()], Vec::new());
        assert_eq!(t.null_fraction(), 0.0);
    }
}
