//! In-memory representation of a PMLB table.
use crate::{Dataset, PmlbError};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Name of the label column in every PMLB table.
pub const TARGET_COLUMN: &str = "target";

/// Cells read as missing values, the same set pandas recognizes by default plus `?`.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "?",
];

/// A loaded dataset: column names and rows of numbers, `None` marking a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct PmlbDataset {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

/// Features and targets of a dataset, the `target` column split off.
#[derive(Debug, Clone, PartialEq)]
pub struct Xy {
    /// Every column but `target`, in table order
    pub feature_names: Vec<String>,
    /// One row of features per sample
    pub features: Vec<Vec<Option<f64>>>,
    /// One target per sample
    pub targets: Vec<Option<f64>>,
}

impl PmlbDataset {
    /// Build a table by hand, every row must have one value per column.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, PmlbError> {
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(PmlbError::RaggedRow {
                row,
                expected: columns.len(),
                found: values.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            columns,
            rows,
        })
    }

    /// Parse an uncompressed tsv with a header row.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self, PmlbError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let values = record
                .iter()
                .zip(&columns)
                .map(|(field, column)| {
                    parse_value(field).ok_or_else(|| PmlbError::InvalidValue {
                        row,
                        column: column.clone(),
                        value: field.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(values);
        }
        Ok(Self {
            name: name.to_string(),
            columns,
            rows,
        })
    }

    /// Parse a gzipped tsv held in memory.
    pub fn from_gz_bytes(name: &str, bytes: &[u8]) -> Result<Self, PmlbError> {
        Self::from_reader(name, GzDecoder::new(bytes))
    }

    /// Parse a gzipped tsv on disk, like the ones stored in the cache.
    pub fn from_path(name: &str, path: &Path) -> Result<Self, PmlbError> {
        Self::from_reader(name, GzDecoder::new(File::open(path)?))
    }

    /// The dataset identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header of the table
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, in file order
    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    /// Removes every row holding at least one missing value, returns how many went away.
    pub fn drop_missing(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.iter().all(Option::is_some));
        before - self.rows.len()
    }

    /// Splits the `target` column off the features.
    pub fn into_xy(self) -> Result<Xy, PmlbError> {
        let target = self
            .columns
            .iter()
            .position(|column| column == TARGET_COLUMN)
            .ok_or_else(|| PmlbError::MissingColumn(TARGET_COLUMN.to_string()))?;

        let mut feature_names = self.columns;
        feature_names.remove(target);

        let mut features = Vec::with_capacity(self.rows.len());
        let mut targets = Vec::with_capacity(self.rows.len());
        for mut row in self.rows {
            targets.push(row.remove(target));
            features.push(row);
        }
        Ok(Xy {
            feature_names,
            features,
            targets,
        })
    }
}

fn parse_value(field: &str) -> Option<Option<f64>> {
    let field = field.trim();
    if MISSING_MARKERS.contains(&field) {
        return Some(None);
    }
    field.parse().ok().map(Some)
}

impl Dataset for PmlbDataset {
    type Item = Vec<Option<f64>>;

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.rows.get(index).cloned()
    }
}
