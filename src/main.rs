use clap::Parser;
use pmlb::config::{Args, DownloadConfig};
use pmlb::downloader::Downloader;
use pmlb::Pmlb;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Progress goes to stdout, logs to stderr
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = DownloadConfig::from(Args::parse());
    let pmlb = Pmlb::new();

    let catalog = pmlb.catalog().await?;
    info!(
        classification = catalog.classification().len(),
        regression = catalog.regression().len(),
        "loaded catalog"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = Downloader::new(&pmlb, &config).run(&catalog, &mut out).await?;
    info!(
        classification = summary.classification,
        regression = summary.regression,
        "all datasets cached"
    );
    Ok(())
}
