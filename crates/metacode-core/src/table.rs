//! Declarative tables: a header row of column names and `|`-delimited rows

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Cell delimiter
pub const DELIMITER: char = '|';

/// Table parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("MALFORMED_TABLE: table '{table}' line {line}: {message}")]
    MalformedTable {
        table: String,
        message: String,
        line: usize,
    },

    /// A row built in memory does not match the table's columns
    #[error("MALFORMED_TABLE: table '{table}' row {row}: {message}")]
    NonUniformRow {
        table: String,
        /// 1-based position in the row list
        row: usize,
        message: String,
    },
}

impl TableError {
    /// Shift the reported line by `offset`
    pub fn relocate(self, offset: usize) -> Self {
        match self {
            TableError::MalformedTable {
                table,
                message,
                line,
            } => TableError::MalformedTable {
                table,
                message,
                line: line + offset,
            },
            other => other,
        }
    }
}

/// One record, addressable by column name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Row {
    cells: BTreeMap<String, String>,
}

impl Row {
    /// Cell value for `column`
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Named, ordered collection of rows sharing one column schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from already-split data
    ///
    /// # Errors
    ///
    /// Returns `NonUniformRow` if a row's column set differs from `columns`.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Row>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        for (i, row) in rows.iter().enumerate() {
            let uniform = row.len() == columns.len() && columns.iter().all(|c| row.get(c).is_some());
            if !uniform {
                return Err(TableError::NonUniformRow {
                    table: name,
                    row: i + 1,
                    message: format!("cells do not match columns [{}]", columns.join(", ")),
                });
            }
        }
        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    /// Parse a `|`-delimited table block
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, TableError> {
        parse_table(name, source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in declaration order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn split_cells(line: &str) -> Vec<&str> {
    line.split(DELIMITER).map(str::trim).collect()
}

/// Parse a table block: header line, then data lines
///
/// Blank lines are skipped. Cells are trimmed; a column whose header cell is
/// empty (such as the one after a trailing `|`) is ignored.
///
/// # Errors
///
/// `MalformedTable` when there is no header, no named column, a duplicate
/// column name, or a row whose cell count differs from the header's.
pub fn parse_table(name: impl Into<String>, source: &str) -> Result<Table, TableError> {
    let name = name.into();
    let malformed = |message: String, line: usize| TableError::MalformedTable {
        table: name.clone(),
        message,
        line,
    };

    let mut lines = source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| malformed("missing header row".to_string(), 1))?;
    let header = split_cells(header);

    let mut columns: Vec<String> = Vec::new();
    for key in header.iter().filter(|key| !key.is_empty()) {
        if columns.iter().any(|c| c == key) {
            return Err(malformed(format!("duplicate column '{}'", key), header_line));
        }
        columns.push(key.to_string());
    }
    if columns.is_empty() {
        return Err(malformed("header has no named columns".to_string(), header_line));
    }

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let cells = split_cells(line);
        if cells.len() != header.len() {
            return Err(malformed(
                format!(
                    "row has {} cell(s), header has {}",
                    cells.len(),
                    header.len()
                ),
                line_no,
            ));
        }
        let row: Row = header
            .iter()
            .zip(cells)
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, cell)| (*key, cell))
            .collect();
        rows.push(row);
    }

    log::debug!("parsed table '{}': {} column(s), {} row(s)", name, columns.len(), rows.len());

    Ok(Table {
        name,
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAT_BREEDS: &str = "
        k          |
        Persian    |
        MaineCoon  |
        Siamese    |
        Bengal     |
    ";

    #[test]
    fn test_parse_single_column_with_trailing_delimiter() {
        let table = parse_table("T_CAT_BREEDS", CAT_BREEDS).unwrap();
        assert_eq!(table.name(), "T_CAT_BREEDS");
        assert_eq!(table.columns(), ["k".to_string()]);
        assert_eq!(table.len(), 4);
        let names: Vec<_> = table.rows().iter().map(|r| r.get("k").unwrap()).collect();
        assert_eq!(names, ["Persian", "MaineCoon", "Siamese", "Bengal"]);
    }

    #[test]
    fn test_parse_multiple_columns_trims_cells() {
        let table = parse_table("T", "id | label\n1 |  One \n 2| Two").unwrap();
        assert_eq!(table.columns(), ["id".to_string(), "label".to_string()]);
        assert_eq!(table.rows()[0].get("label"), Some("One"));
        assert_eq!(table.rows()[1].get("id"), Some("2"));
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[test]
    fn test_parse_header_only_is_empty_table() {
        let table = parse_table("T", "k |").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_error_cell_count_mismatch() {
        let result = parse_table("T", "a | b\n1 | 2\n3");
        match result {
            Err(TableError::MalformedTable { table, line, message }) => {
                assert_eq!(table, "T");
                assert_eq!(line, 3);
                assert!(message.contains("1 cell(s)"));
            }
            other => panic!("Expected MalformedTable error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_missing_header() {
        assert!(matches!(
            parse_table("T", "  \n\n"),
            Err(TableError::MalformedTable { .. })
        ));
    }

    #[test]
    fn test_error_duplicate_column() {
        let err = parse_table("T", "a | a\n1 | 2").unwrap_err();
        assert!(err.to_string().contains("duplicate column 'a'"));
    }

    #[test]
    fn test_relocate_shifts_line() {
        let err = parse_table("T", "a\n1 | 2").unwrap_err().relocate(10);
        assert!(matches!(err, TableError::MalformedTable { line: 12, .. }));
    }

    #[test]
    fn test_new_rejects_non_uniform_rows() {
        let rows = vec![
            [("a", "1")].into_iter().collect::<Row>(),
            [("b", "2")].into_iter().collect::<Row>(),
        ];
        match Table::new("T", vec!["a".to_string()], rows) {
            Err(err @ TableError::NonUniformRow { .. }) => {
                assert_eq!(
                    err.clone().relocate(10),
                    err,
                    "in-memory rows have no source line to shift"
                );
                assert_eq!(
                    err.to_string(),
                    "MALFORMED_TABLE: table 'T' row 2: cells do not match columns [a]"
                );
            }
            other => panic!("Expected NonUniformRow error, got {:?}", other),
        }
    }
}
