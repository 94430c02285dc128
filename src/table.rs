use crate::error::{PlotError, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Rows of string fields, exactly as read from the csv file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Table {
        Table { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Transposes columns back into rows, inverse of `extract`
    pub fn from_columns(columns: &[Column]) -> Table {
        let nrows = columns.first().map(|c| c.fields.len()).unwrap_or(0);
        let rows = (0..nrows)
            .map(|r| columns.iter().map(|c| c.fields[r].clone()).collect())
            .collect();
        Table { rows }
    }

    /// Fails on the first row whose length differs from the header row
    pub fn check_rectangular(&self) -> Result<usize> {
        let width = match self.rows.first() {
            Some(r) => r.len(),
            None => return Ok(0),
        };
        for (i, row) in self.rows.iter().enumerate().skip(1) {
            if row.len() != width {
                return Err(PlotError::RaggedRow {
                    row: i,
                    expected: width,
                    found: row.len(),
                });
            }
        }
        Ok(width)
    }
}

/// One field position across all the rows of a table;
/// the first field is the header, used as label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub fields: Vec<String>,
}

impl Column {
    pub fn header(&self) -> &str {
        self.fields.first().map(|s| s.as_str()).unwrap_or("")
    }

    /// All the fields after the header
    pub fn values(&self) -> &[String] {
        self.fields.get(1..).unwrap_or(&[])
    }
}

/// Reads the csv at `path` without any header handling or type coercion.
/// Rows with a different number of fields are kept as they are.
pub fn load(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PlotError::PathNotFound {
            what: "csv file",
            path: path.to_path_buf(),
        },
        _ => PlotError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| PlotError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        rows.push(record.iter().map(String::from).collect());
    }
    debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(Table { rows })
}

/// Transposes the rows into columns, in field order.
/// Every row must be as long as the header row.
pub fn extract(table: &Table) -> Result<Vec<Column>> {
    let width = table.check_rectangular()?;
    let columns: Vec<Column> = (0..width)
        .map(|c| Column {
            fields: table.rows.iter().map(|r| r[c].clone()).collect(),
        })
        .collect();
    debug!(
        "extracted {} columns of {} fields",
        columns.len(),
        table.row_count()
    );
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind as PlotErrorKind;
    use std::io::Write;

    fn table(rows: &[&[&str]]) -> Table {
        Table::new(
            rows.iter()
                .map(|r| r.iter().map(|f| f.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn extract_transposes_in_field_order() {
        let t = table(&[&["t", "a", "b"], &["1", "10", "20"], &["2", "15", "25"]]);
        let cols = extract(&t).unwrap();
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[1].header(), "a");
        assert_eq!(cols[1].values(), &["10".to_string(), "15".to_string()]);
        assert_eq!(cols[2].fields, vec!["b", "20", "25"]);
    }

    #[test]
    fn extract_round_trips() {
        let shapes: &[&[&[&str]]] = &[
            &[&["x"]],
            &[&["x", "y"]],
            &[&["t", "a", "b"], &["1", "10", "20"], &["2", "15", "25"]],
            &[&["", " a ", "b,c"], &["1", "", "3"]],
        ];
        for s in shapes {
            let t = table(s);
            let cols = extract(&t).unwrap();
            assert_eq!(Table::from_columns(&cols), t);
        }
    }

    #[test]
    fn extract_rejects_short_and_long_rows() {
        let short = table(&[&["t", "a", "b"], &["1", "10"]]);
        let err = extract(&short).unwrap_err();
        assert_eq!(err.kind(), PlotErrorKind::IndexOutOfRange);
        match err {
            PlotError::RaggedRow {
                row,
                expected,
                found,
            } => assert_eq!((row, expected, found), (1, 3, 2)),
            e => panic!("unexpected error {:?}", e),
        }

        let long = table(&[&["t", "a"], &["1", "10"], &["2", "15", "99"]]);
        assert_eq!(
            extract(&long).unwrap_err().kind(),
            PlotErrorKind::IndexOutOfRange
        );
    }

    #[test]
    fn extract_empty_table() {
        assert!(extract(&Table::default()).unwrap().is_empty());
    }

    #[test]
    fn load_keeps_fields_verbatim_and_ragged_rows() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "time, load\n1,2\n3\n").unwrap();
        let t = load(f.path()).unwrap();
        assert_eq!(
            t,
            table(&[&["time", " load"], &["1", "2"], &["3"]])
        );
    }

    #[test]
    fn load_missing_file() {
        let err = load(Path::new("does/not/exist.csv")).unwrap_err();
        assert_eq!(err.kind(), PlotErrorKind::PathNotFound);
    }
}
