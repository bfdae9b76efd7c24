#![deny(missing_docs)]
//! This crate aims to emulate and be compatible with the `fetch_data` helper of the
//! [pmlb](https://github.com/EpistasisLab/pmlb) python package.
//!
//! Datasets are downloaded from the PMLB repository as gzipped tsv files and cached
//! locally under `<cache_dir>/<name>/<name>.tsv.gz`, so that subsequent fetches don't
//! touch the network.
//!
//! The `pmlb-fetch` binary uses the [`downloader`] to mirror every classification and
//! regression dataset listed in the [`catalog`].
use reqwest::{Client, Error as ReqwestError, StatusCode};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub mod catalog;
pub mod config;
pub mod downloader;
pub mod table;

pub use catalog::{Catalog, Task};
pub use config::PmlbConfig;
pub use table::{PmlbDataset, Xy};

/// The default trait to implement to get the simplest API
pub trait Dataset {
    /// The type of objects contained in the dataset
    type Item;

    /// The length of the dataset
    fn len(&self) -> usize;

    /// Whether the dataset holds no item at all
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get item at specific index. Should return `None` if and only if
    /// `index >= dataset.len()`.
    fn get(&self, index: usize) -> Option<Self::Item>;
}

/// Generic structure to iterate over [`Dataset`].
pub struct DatasetIterator<'a, D> {
    dataset: &'a D,
    index: usize,
}

/// Iterate of the dataset in order
pub fn iter<D: Dataset>(dataset: &D) -> DatasetIterator<'_, D> {
    DatasetIterator { dataset, index: 0 }
}

impl<'a, D: Dataset> Iterator for DatasetIterator<'a, D> {
    type Item = D::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let object = self.dataset.get(self.index);
        self.index += 1;
        object
    }
}

/// Every dataset of the PMLB repository is stored with this suffix
pub const DATASET_SUFFIX: &str = ".tsv.gz";

/// Error type for pmlb
#[derive(Debug, Error)]
pub enum PmlbError {
    /// Error in the request
    #[error("request error: {0}")]
    RequestError(#[from] ReqwestError),

    /// The remote repository has no dataset with this name.
    #[error("Dataset not found in PMLB: {0}")]
    UnknownDataset(String),

    /// Reading or writing the local cache failed
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    /// The tsv content is malformed
    #[error("tsv error: {0}")]
    CsvError(#[from] csv::Error),

    /// A required column is absent from the header
    #[error("missing column {0:?}")]
    MissingColumn(String),

    /// A cell is neither a number nor a missing value marker
    #[error("invalid value {value:?} at row {row}, column {column:?}")]
    InvalidValue {
        /// 0-based row index, header excluded
        row: usize,
        /// Name of the offending column
        column: String,
        /// The raw cell content
        value: String,
    },

    /// A row doesn't have as many cells as there are columns
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        /// 0-based row index
        row: usize,
        /// Number of columns in the header
        expected: usize,
        /// Number of values in the row
        found: usize,
    },
}

/// The arguments of a single fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// Dataset identifier, as listed in the [`Catalog`]
    pub name: &'a str,
    /// Split the `target` column off the features instead of returning the whole table
    pub return_xy: bool,
    /// Where to cache the download. `None` always downloads and never writes anything.
    pub cache_dir: Option<&'a Path>,
    /// Drop every row holding a missing value
    pub drop_missing: bool,
}

/// What a fetch hands back, depending on [`FetchRequest::return_xy`].
#[derive(Debug, Clone)]
pub enum Fetched {
    /// The whole table, `target` column included
    Table(PmlbDataset),
    /// Features and targets
    Xy(Xy),
}

/// Anything able to fetch a dataset by name.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Fetches (and caches) a single dataset.
    async fn fetch(&self, request: FetchRequest<'_>) -> Result<Fetched, PmlbError>;
}

/// The core struct used to interact with the PMLB repository
pub struct Pmlb {
    client: Client,
    config: PmlbConfig,
}

impl Default for Pmlb {
    fn default() -> Self {
        Self::new()
    }
}

impl Pmlb {
    /// Talks to the upstream PMLB repository.
    pub fn new() -> Self {
        Self::with_config(PmlbConfig::default())
    }

    /// Use different remote locations, e.g. a mirror.
    pub fn with_config(config: PmlbConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// The remote location of a dataset.
    pub fn dataset_url(&self, name: &str) -> String {
        let base = self.config.datasets_url.trim_end_matches('/');
        format!("{base}/{name}/{name}{DATASET_SUFFIX}")
    }

    /// The local location of a dataset, cached or not.
    pub fn cache_path(cache_dir: &Path, name: &str) -> PathBuf {
        cache_dir.join(name).join(format!("{name}{DATASET_SUFFIX}"))
    }

    /// Downloads the summary stats and lists the datasets per task.
    pub async fn catalog(&self) -> Result<Catalog, PmlbError> {
        let response = self
            .client
            .get(&self.config.summary_stats_url)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        Catalog::from_summary_stats(&body[..])
    }

    async fn download(&self, name: &str) -> Result<Vec<u8>, PmlbError> {
        let url = self.dataset_url(name);
        debug!(%url, "downloading dataset");
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(PmlbError::UnknownDataset(name.to_string()));
        }
        let body = response.error_for_status()?.bytes().await?;
        Ok(body.to_vec())
    }

    /// Loads a dataset from the cache, downloading it first when it isn't cached yet.
    pub async fn fetch_data(
        &self,
        name: &str,
        return_xy: bool,
        cache_dir: Option<&Path>,
        drop_missing: bool,
    ) -> Result<Fetched, PmlbError> {
        let mut dataset = match cache_dir {
            Some(cache_dir) => {
                let path = Self::cache_path(cache_dir, name);
                if path.exists() {
                    debug!(path = %path.display(), "cache hit");
                    PmlbDataset::from_path(name, &path)?
                } else {
                    let bytes = self.download(name).await?;
                    // Parse before writing so a broken download never lands in the cache
                    let dataset = PmlbDataset::from_gz_bytes(name, &bytes)?;
                    write_cache(&path, &bytes)?;
                    info!(path = %path.display(), rows = dataset.len(), "cached dataset");
                    dataset
                }
            }
            None => PmlbDataset::from_gz_bytes(name, &self.download(name).await?)?,
        };

        if drop_missing {
            let dropped = dataset.drop_missing();
            if dropped > 0 {
                debug!(name, dropped, "dropped rows with missing values");
            }
        }

        if return_xy {
            Ok(Fetched::Xy(dataset.into_xy()?))
        } else {
            Ok(Fetched::Table(dataset))
        }
    }
}

impl Fetch for Pmlb {
    async fn fetch(&self, request: FetchRequest<'_>) -> Result<Fetched, PmlbError> {
        self.fetch_data(
            request.name,
            request.return_xy,
            request.cache_dir,
            request.drop_missing,
        )
        .await
    }
}

fn write_cache(path: &Path, bytes: &[u8]) -> Result<(), PmlbError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let partial = path.with_extension("gz.part");
    let written = std::fs::write(&partial, bytes).and_then(|_| std::fs::rename(&partial, path));
    if let Err(err) = written {
        // The partial file may not exist at all, nothing to report then
        let _ = std::fs::remove_file(&partial);
        return Err(err.into());
    }
    Ok(())
}
