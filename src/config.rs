//! Command line arguments and remote locations.
use clap::Parser;
use std::path::PathBuf;

/// Where classification datasets land when no directory is given
pub const DEFAULT_CLASSIFICATION_DIR: &str = "data/PMLB/classification";
/// Where regression datasets land when no directory is given
pub const DEFAULT_REGRESSION_DIR: &str = "data/PMLB/regression";
/// Root of the datasets in the PMLB repository
pub const DEFAULT_DATASETS_URL: &str = "https://github.com/EpistasisLab/pmlb/raw/master/datasets";
/// Table listing every PMLB dataset along with its task
pub const DEFAULT_SUMMARY_STATS_URL: &str =
    "https://raw.githubusercontent.com/EpistasisLab/pmlb/master/pmlb/all_summary_stats.tsv";

/// Download every PMLB classification and regression dataset.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Cache directory for classification datasets
    #[arg(value_name = "CLASSIFICATION_DIR", default_value = DEFAULT_CLASSIFICATION_DIR)]
    pub classification_dir: PathBuf,

    /// Cache directory for regression datasets
    #[arg(value_name = "REGRESSION_DIR", default_value = DEFAULT_REGRESSION_DIR)]
    pub regression_dir: PathBuf,
}

/// Settings of a download run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Cache directory for classification datasets
    pub classification_dir: PathBuf,
    /// Cache directory for regression datasets
    pub regression_dir: PathBuf,
    /// Drop rows with missing values once loaded
    pub drop_missing: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            classification_dir: PathBuf::from(DEFAULT_CLASSIFICATION_DIR),
            regression_dir: PathBuf::from(DEFAULT_REGRESSION_DIR),
            drop_missing: true,
        }
    }
}

impl From<Args> for DownloadConfig {
    fn from(args: Args) -> Self {
        Self {
            classification_dir: args.classification_dir,
            regression_dir: args.regression_dir,
            ..Default::default()
        }
    }
}

/// Remote locations of the PMLB repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmlbConfig {
    /// Datasets are found under `{datasets_url}/{name}/{name}.tsv.gz`
    pub datasets_url: String,
    /// The `all_summary_stats.tsv` table used to build the catalog
    pub summary_stats_url: String,
}

impl Default for PmlbConfig {
    fn default() -> Self {
        Self {
            datasets_url: DEFAULT_DATASETS_URL.to_string(),
            summary_stats_url: DEFAULT_SUMMARY_STATS_URL.to_string(),
        }
    }
}
