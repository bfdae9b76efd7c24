//! The list of datasets available in PMLB, split by task.
use crate::PmlbError;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DATASET_COLUMN: &str = "dataset";
const TASK_COLUMN: &str = "task";

/// The two kinds of datasets PMLB provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Categorical target
    Classification,
    /// Continuous target
    Regression,
}

impl Task {
    /// The name used in the summary stats `task` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Classification => "classification",
            Task::Regression => "regression",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dataset identifiers per task, in repository order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    classification: Vec<String>,
    regression: Vec<String>,
}

impl Catalog {
    /// Build a catalog from two known lists.
    pub fn new(classification: Vec<String>, regression: Vec<String>) -> Self {
        Self {
            classification,
            regression,
        }
    }

    /// Reads the `all_summary_stats.tsv` table of the PMLB repository.
    ///
    /// Only the `dataset` and `task` columns are used (header case doesn't matter),
    /// rows with any other task are skipped.
    pub fn from_summary_stats<R: Read>(reader: R) -> Result<Self, PmlbError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);
        let headers = reader.headers()?;
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| PmlbError::MissingColumn(name.to_string()))
        };
        let dataset = position(DATASET_COLUMN)?;
        let task = position(TASK_COLUMN)?;

        let mut catalog = Self::default();
        for record in reader.records() {
            let record = record?;
            let (Some(name), Some(kind)) = (record.get(dataset), record.get(task)) else {
                continue;
            };
            match kind.trim() {
                "classification" => catalog.classification.push(name.trim().to_string()),
                "regression" => catalog.regression.push(name.trim().to_string()),
                _ => {}
            }
        }
        Ok(catalog)
    }

    /// Reads a local copy of the summary stats.
    pub fn from_path(path: &Path) -> Result<Self, PmlbError> {
        Self::from_summary_stats(File::open(path)?)
    }

    /// Classification datasets
    pub fn classification(&self) -> &[String] {
        &self.classification
    }

    /// Regression datasets
    pub fn regression(&self) -> &[String] {
        &self.regression
    }

    /// Datasets of a given task
    pub fn names(&self, task: Task) -> &[String] {
        match task {
            Task::Classification => &self.classification,
            Task::Regression => &self.regression,
        }
    }

    /// Total number of datasets
    pub fn len(&self) -> usize {
        self.classification.len() + self.regression.len()
    }

    /// Whether there is nothing to fetch
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
