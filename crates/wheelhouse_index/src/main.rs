use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use indicatif::MultiProgress;
use tracing_subscriber::EnvFilter;
use url::Url;
use wheelhouse_index::mirror::RelabelRule;
use wheelhouse_index::{generate, IndexConfig};

/// The latest-release endpoint of the wheel-builder repository.
const DEFAULT_RELEASE_URL: &str =
    "https://api.github.com/repos/termux-user-repository/pypi-wheel-builder/releases/latest";

/// Build a static PEP-503 wheel index from the wheel assets of the latest release
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URL of the latest-release endpoint to list wheel assets from
    #[arg(long, default_value = DEFAULT_RELEASE_URL)]
    release_url: Url,

    /// Directory the index is generated into
    #[arg(long, default_value = "docs")]
    output: PathBuf,

    /// Owner rendered into the pip instructions on the top-level page
    #[arg(long, env = "WHEELHOUSE_OWNER", default_value = "OWNER")]
    owner: String,

    /// Site name rendered into the pip instructions on the top-level page
    #[arg(long, env = "WHEELHOUSE_SITE", default_value = "SITE")]
    site: String,

    /// Package-name substring marking wheels that must be hosted locally
    #[arg(long, default_value = "pydantic_core")]
    mirror_marker: String,

    /// Platform tag that is replaced on mirrored wheels
    #[arg(long, default_value = "linux_aarch64")]
    from_tag: String,

    /// Platform tag mirrored wheels are published under
    #[arg(long, default_value = "android_24_aarch64")]
    to_tag: String,

    /// Timeout in seconds for every network call
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

/// Entry point of the `wheelhouse-index` cli.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(cli.verbosity.tracing_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let config = IndexConfig {
        release_url: cli.release_url,
        output_root: cli.output,
        rule: RelabelRule {
            package_marker: cli.mirror_marker,
            from_tag: cli.from_tag,
            to_tag: cli.to_tag,
        },
        owner: cli.owner,
        site: cli.site,
        request_timeout: Duration::from_secs(cli.timeout),
        multi_progress: Some(MultiProgress::new()),
    };

    let stats = generate(config).await?;
    tracing::info!(
        "Wrote {} package pages: {} links ({} mirrored, {} omitted), {} packages skipped",
        stats.packages,
        stats.links,
        stats.links_mirrored,
        stats.links_omitted,
        stats.packages_skipped
    );
    Ok(())
}
