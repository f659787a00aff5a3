use crate::error::TableError;
use std::path::{Path, PathBuf};

/// A column-oriented time series loaded from a data file.
///
/// The first column of every data row is the sample time; the remaining
/// columns are the recorded quantities. Lines before the first numeric row
/// form the preamble: the first one is kept as the title and the last one is
/// used as the header when its width matches the data.
#[derive(Clone, Debug, PartialEq)]
pub struct DataTable {
    origin: PathBuf,
    title: Option<String>,
    names: Vec<String>,
    time: Vec<f64>,
    columns: Vec<Vec<f64>>,
}

impl DataTable {
    /// Load a table from a tab- or comma-delimited file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse_from(&text, path)?;
        tracing::debug!(
            path = %path.display(),
            rows = table.num_rows(),
            columns = table.num_columns(),
            "loaded data table"
        );
        Ok(table)
    }

    /// Parse a table held in memory.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        Self::parse_from(text, Path::new("<memory>"))
    }

    fn parse_from(text: &str, origin: &Path) -> Result<Self, TableError> {
        let delimiter = if text.contains('\t') { b'\t' } else { b',' };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut preamble: Vec<Vec<String>> = Vec::new();
        let mut rows: Vec<Vec<f64>> = Vec::new();

        for record in reader.records() {
            let record = record.map_err(|source| TableError::Csv {
                path: origin.to_path_buf(),
                source,
            })?;
            let line = record.position().map_or(0, |p| p.line());

            // Trailing delimiters leave empty fields behind.
            let mut fields: Vec<&str> = record.iter().collect();
            while fields.last().is_some_and(|f| f.is_empty()) {
                fields.pop();
            }
            if fields.is_empty() {
                continue;
            }

            // Data starts at the first line with a numeric time and at least one
            // value; a lone token such as a title `2024` stays in the preamble.
            if rows.is_empty() && (fields.len() < 2 || fields[0].parse::<f64>().is_err()) {
                preamble.push(fields.iter().map(|f| f.to_string()).collect());
                continue;
            }

            let mut row = Vec::with_capacity(fields.len());
            for field in &fields {
                let value = field.parse::<f64>().map_err(|_| TableError::Parse {
                    path: origin.to_path_buf(),
                    line,
                    token: field.to_string(),
                })?;
                row.push(value);
            }

            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(TableError::RaggedRow {
                        path: origin.to_path_buf(),
                        line,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push(row);
        }

        let width = rows.first().map_or(0, |r| r.len());
        let num_columns = width.saturating_sub(1);

        let names = match preamble.last() {
            Some(header) if header.len() == width && width > 0 => header[1..].to_vec(),
            _ => (1..=num_columns).map(|i| format!("col{i}")).collect(),
        };
        let title = preamble
            .first()
            .filter(|_| preamble.len() > 1)
            .map(|fields| fields.join(" "));

        let mut time = Vec::with_capacity(rows.len());
        let mut columns = vec![Vec::with_capacity(rows.len()); num_columns];
        for row in rows {
            time.push(row[0]);
            for (column, value) in columns.iter_mut().zip(&row[1..]) {
                column.push(*value);
            }
        }

        Ok(Self {
            origin: origin.to_path_buf(),
            title,
            names,
            time,
            columns,
        })
    }

    /// Path the table was loaded from (`<memory>` for parsed text).
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Names of the non-time columns.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Samples of the `i`-th non-time column.
    pub fn column(&self, i: usize) -> &[f64] {
        &self.columns[i]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[f64]> {
        self.columns.iter().map(|c| c.as_slice())
    }

    /// Number of non-time columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGINE_OUTPUT: &str = "Spherical_Case01\n\
        \n\
        Time\tX_Pos\tY_Pos\tZ_Pos\t\n\
        +0.000000e+00\t+2.000000e+00\t+0.000000e+00\t+0.000000e+00\t\n\
        +1.000000e-02\t+1.999999e+00\t+0.000000e+00\t-4.903325e-04\t\n";

    #[test]
    fn parses_engine_output_with_preamble() {
        let table = DataTable::parse(ENGINE_OUTPUT).unwrap();
        assert_eq!(table.title(), Some("Spherical_Case01"));
        assert_eq!(table.column_names(), ["X_Pos", "Y_Pos", "Z_Pos"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.time(), [0.0, 0.01]);
        assert_eq!(table.column(2), [0.0, -4.903325e-4]);
    }

    #[test]
    fn parses_headerless_comma_table() {
        let table = DataTable::parse("0.0,1.0,2.0\n0.01,1.5,2.5\n").unwrap();
        assert_eq!(table.title(), None);
        assert_eq!(table.column_names(), ["col1", "col2"]);
        assert_eq!(table.column(0), [1.0, 1.5]);
        assert_eq!(table.column(1), [2.0, 2.5]);
    }

    #[test]
    fn header_with_wrong_width_falls_back_to_generic_names() {
        let table = DataTable::parse("Time,A\n0.0,1.0,2.0\n").unwrap();
        assert_eq!(table.column_names(), ["col1", "col2"]);
    }

    #[test]
    fn rejects_non_numeric_token_in_data() {
        let err = DataTable::parse("Time,A\n0.0,1.0\n0.01,oops\n").unwrap_err();
        match err {
            TableError::Parse { line, token, .. } => {
                assert_eq!(line, 3);
                assert_eq!(token, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = DataTable::parse("0.0,1.0,2.0\n0.01,1.0\n").unwrap_err();
        assert!(matches!(
            err,
            TableError::RaggedRow {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn numeric_title_stays_in_preamble() {
        for title in ["2024", "inf"] {
            let text = format!("{title}\n\nTime\tX_Pos\n+0.000000e+00\t+2.000000e+00\n");
            let table = DataTable::parse(&text).unwrap();
            assert_eq!(table.title(), Some(title));
            assert_eq!(table.column_names(), ["X_Pos"]);
            assert_eq!(table.num_rows(), 1);
        }
    }

    #[test]
    fn header_only_file_is_empty() {
        let table = DataTable::parse("Time\tA\tB\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.num_columns(), 0);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DataTable::load("/nonexistent/dir/table.txt").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/table.txt"));
    }
}
