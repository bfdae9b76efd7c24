//! Mirrors every dataset of a [`Catalog`] into the configured cache directories.
use crate::config::DownloadConfig;
use crate::{Catalog, Fetch, FetchRequest, PmlbError, Task};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Number of datasets fetched per task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Classification datasets fetched
    pub classification: usize,
    /// Regression datasets fetched
    pub regression: usize,
}

/// Sequentially fetches the classification datasets, then the regression ones.
///
/// Progress is written to `out` before each fetch. The first failing fetch aborts
/// the whole run.
pub struct Downloader<'a, F> {
    fetcher: &'a F,
    config: &'a DownloadConfig,
}

impl<'a, F: Fetch> Downloader<'a, F> {
    /// Create the downloader if you already have a fetcher at hand.
    pub fn new(fetcher: &'a F, config: &'a DownloadConfig) -> Self {
        Self { fetcher, config }
    }

    /// Fetch everything listed in the catalog.
    pub async fn run<W: Write>(
        &self,
        catalog: &Catalog,
        out: &mut W,
    ) -> Result<DownloadSummary, PmlbError> {
        let classification = self
            .download_task(Task::Classification, catalog, &self.config.classification_dir, out)
            .await?;
        let regression = self
            .download_task(Task::Regression, catalog, &self.config.regression_dir, out)
            .await?;
        Ok(DownloadSummary {
            classification,
            regression,
        })
    }

    async fn download_task<W: Write>(
        &self,
        task: Task,
        catalog: &Catalog,
        cache_dir: &Path,
        out: &mut W,
    ) -> Result<usize, PmlbError> {
        let names = catalog.names(task);
        writeln!(out, "downloading {task} data:")?;
        for (i, name) in names.iter().enumerate() {
            writeln!(out, "  {}: {name}", i + 1)?;
            // Only the cached file matters here
            let _ = self
                .fetcher
                .fetch(FetchRequest {
                    name,
                    return_xy: false,
                    cache_dir: Some(cache_dir),
                    drop_missing: self.config.drop_missing,
                })
                .await?;
        }
        info!(%task, count = names.len(), dir = %cache_dir.display(), "task done");
        Ok(names.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Fetched, PmlbDataset};
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        name: String,
        return_xy: bool,
        cache_dir: Option<PathBuf>,
        drop_missing: bool,
    }

    /// Records every request, fails on `fail_on`.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Call>>,
        fail_on: Option<&'static str>,
    }

    impl Fetch for Recorder {
        async fn fetch(&self, request: FetchRequest<'_>) -> Result<Fetched, PmlbError> {
            self.calls.borrow_mut().push(Call {
                name: request.name.to_string(),
                return_xy: request.return_xy,
                cache_dir: request.cache_dir.map(Path::to_path_buf),
                drop_missing: request.drop_missing,
            });
            if self.fail_on == Some(request.name) {
                return Err(PmlbError::UnknownDataset(request.name.to_string()));
            }
            Ok(Fetched::Table(PmlbDataset::new(request.name, vec![], vec![])?))
        }
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn call(name: &str, dir: &str) -> Call {
        Call {
            name: name.to_string(),
            return_xy: false,
            cache_dir: Some(PathBuf::from(dir)),
            drop_missing: true,
        }
    }

    #[tokio::test]
    async fn end_to_end_with_defaults() {
        let catalog = Catalog::new(names(&["a", "b"]), names(&["c"]));
        let config = DownloadConfig::default();
        let recorder = Recorder::default();
        let mut out = Vec::new();

        let summary = Downloader::new(&recorder, &config)
            .run(&catalog, &mut out)
            .await
            .unwrap();

        assert_eq!(
            summary,
            DownloadSummary {
                classification: 2,
                regression: 1
            }
        );
        assert_eq!(
            recorder.calls.into_inner(),
            vec![
                call("a", "data/PMLB/classification"),
                call("b", "data/PMLB/classification"),
                call("c", "data/PMLB/regression"),
            ]
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "downloading classification data:\n  1: a\n  2: b\ndownloading regression data:\n  1: c\n"
        );
    }

    #[tokio::test]
    async fn every_dataset_goes_to_its_task_directory() {
        let classification = names(&["adult", "iris", "mushroom", "wine_quality_red"]);
        let regression = names(&["1027_ESL", "529_pollen", "feynman_I_6_2"]);
        let catalog = Catalog::new(classification.clone(), regression.clone());
        let config = DownloadConfig {
            classification_dir: PathBuf::from("/cache/clf"),
            regression_dir: PathBuf::from("/cache/reg"),
            drop_missing: true,
        };
        let recorder = Recorder::default();
        let mut out = Vec::new();

        Downloader::new(&recorder, &config)
            .run(&catalog, &mut out)
            .await
            .unwrap();

        let calls = recorder.calls.into_inner();
        assert_eq!(calls.len(), classification.len() + regression.len());
        let (clf, reg) = calls.split_at(classification.len());
        for (call, name) in clf.iter().zip(&classification) {
            assert_eq!(&call.name, name);
            assert_eq!(call.cache_dir.as_deref(), Some(Path::new("/cache/clf")));
        }
        for (call, name) in reg.iter().zip(&regression) {
            assert_eq!(&call.name, name);
            assert_eq!(call.cache_dir.as_deref(), Some(Path::new("/cache/reg")));
        }

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "downloading classification data:");
        assert_eq!(lines[4], "  4: wine_quality_red");
        assert_eq!(lines[5], "downloading regression data:");
        assert_eq!(lines[8], "  3: feynman_I_6_2");
    }

    #[tokio::test]
    async fn failure_aborts_the_rest() {
        let catalog = Catalog::new(names(&["a", "b", "c"]), names(&["d"]));
        let config = DownloadConfig::default();
        let recorder = Recorder {
            fail_on: Some("b"),
            ..Default::default()
        };
        let mut out = Vec::new();

        let err = Downloader::new(&recorder, &config)
            .run(&catalog, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, PmlbError::UnknownDataset(ref n) if n == "b"));
        let fetched: Vec<_> = recorder
            .calls
            .into_inner()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(fetched, ["a", "b"]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "downloading classification data:\n  1: a\n  2: b\n"
        );
    }

    #[tokio::test]
    async fn empty_catalog_prints_headers_only() {
        let config = DownloadConfig::default();
        let recorder = Recorder::default();
        let mut out = Vec::new();

        let summary = Downloader::new(&recorder, &config)
            .run(&Catalog::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(summary, DownloadSummary::default());
        assert!(recorder.calls.into_inner().is_empty());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "downloading classification data:\ndownloading regression data:\n"
        );
    }
}
