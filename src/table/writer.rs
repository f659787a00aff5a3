use crate::error::TableError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Accumulates time-stamped samples and writes them in the engine's
/// channel-table layout: a title line, a blank line, the header, then one
/// tab-delimited row per sample.
#[derive(Clone, Debug)]
pub struct TableWriter {
    header: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TableWriter {
    /// Create a writer. The first header entry names the time column.
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Append one sample. `values` excludes the time column.
    pub fn push_row(&mut self, time: f64, values: &[f64]) -> Result<(), TableError> {
        let expected = self.header.len().saturating_sub(1);
        if values.len() != expected {
            return Err(TableError::RowWidth {
                expected,
                found: values.len(),
            });
        }
        let mut row = Vec::with_capacity(values.len() + 1);
        row.push(time);
        row.extend_from_slice(values);
        self.rows.push(row);
        Ok(())
    }

    /// Write the table to `path`, truncating any existing file.
    pub fn write_to_file(&self, path: impl AsRef<Path>, title: &str) -> Result<(), TableError> {
        let path = path.as_ref();
        let io_err = |source| TableError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_err)?;
        self.write_to(BufWriter::new(file), title).map_err(|e| match e {
            WriteError::Io(source) => io_err(source),
            WriteError::Csv(source) => TableError::Csv {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    /// Render the table into a string, mostly useful for tests and logs.
    pub fn render(&self, title: &str) -> String {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut out, title);
        String::from_utf8_lossy(&out).into_owned()
    }

    fn write_to<W: Write>(&self, mut out: W, title: &str) -> Result<(), WriteError> {
        writeln!(out, "{title}")?;
        writeln!(out)?;

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_writer(out);
        wtr.write_record(&self.header)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|v| format_scientific(*v)))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

enum WriteError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl From<std::io::Error> for WriteError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for WriteError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

/// Format a value as signed scientific notation with six fractional digits
/// and an exponent of at least two digits, e.g. `+1.000000e-02`.
pub fn format_scientific(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let s = format!("{value:+.6e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}
