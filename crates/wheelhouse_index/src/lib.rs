//! Generation of a static PEP-503 wheel index from the wheel assets attached to the latest
//! release of a wheel-builder repository.
#![deny(missing_docs)]

mod error;
pub mod group;
pub mod mirror;
pub mod release;
pub mod render;

use std::path::PathBuf;
use std::time::Duration;

use fs_err::{self as fs};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use url::Url;

pub use crate::error::IndexError;
use crate::group::group_by_package;
use crate::mirror::{ArtifactMirror, LinkEntry, RelabelRule};
use crate::release::ReleaseClient;

/// The user agent to use for the reqwest client
const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Statistics for a single generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of package pages written
    pub packages: usize,
    /// Number of packages skipped because their directory or page could not be written
    pub packages_skipped: usize,
    /// Number of links rendered across all package pages
    pub links: usize,
    /// Number of links pointing at locally mirrored wheels
    pub links_mirrored: usize,
    /// Number of links omitted because the wheel could not be mirrored
    pub links_omitted: usize,
}

/// Configuration for [`generate`].
pub struct IndexConfig {
    /// The latest-release endpoint listing the wheel assets.
    pub release_url: Url,
    /// The directory the index is generated into.
    pub output_root: PathBuf,
    /// The policy deciding which wheels are mirrored locally.
    pub rule: RelabelRule,
    /// The owner rendered into the pip instructions on the top-level page.
    pub owner: String,
    /// The site name rendered into the pip instructions on the top-level page.
    pub site: String,
    /// Bound on every network call of the run.
    pub request_timeout: Duration,
    /// The multi-progress bar to use for the run.
    pub multi_progress: Option<MultiProgress>,
}

/// Generates the static index into the configured output root.
///
/// The function takes roughly the following steps:
///
/// 1. Fetch the latest release and collect its wheel assets.
/// 2. Group the wheels by the package name derived from their file name.
/// 3. For every package, mirror the wheels the relabel rule applies to and write the
///    package's `index.html`.
/// 4. Write the top-level `index.html` linking every package directory.
///
/// A failed or empty listing aborts the run before anything is written. A wheel that cannot
/// be mirrored only loses its link; a package whose directory or page cannot be written is
/// skipped and left off the top-level page. Both are reported in the returned [`IndexStats`].
pub async fn generate(config: IndexConfig) -> Result<IndexStats, IndexError> {
    let IndexConfig {
        release_url,
        output_root,
        rule,
        owner,
        site,
        request_timeout,
        multi_progress,
    } = config;

    let client = reqwest::Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(request_timeout)
        .build()
        .map_err(IndexError::Client)?;

    let lister = ReleaseClient::new(client.clone(), release_url);
    let wheels = lister.list_wheels().await?;
    if wheels.is_empty() {
        return Err(IndexError::NoWheels);
    }

    let groups = group_by_package(wheels);
    if groups.is_empty() {
        return Err(IndexError::NoPackages);
    }

    fs::create_dir_all(&output_root).map_err(IndexError::CreateOutputRoot)?;

    let total: u64 = groups.iter().map(|g| g.artifacts.len() as u64).sum();
    let pb = if let Some(multi_progress) = multi_progress {
        multi_progress.add(ProgressBar::new(total))
    } else {
        ProgressBar::hidden()
    };
    let sty = ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
    )
    .unwrap()
    .progress_chars("##-");
    pb.set_style(sty);

    let mirror = ArtifactMirror::new(client, &output_root, rule);
    let mut stats = IndexStats::default();
    let mut written_packages: Vec<String> = Vec::with_capacity(groups.len());

    for group in &groups {
        let name = group.name.as_normalized();

        let package_dir = output_root.join(name);
        if let Err(err) = fs::create_dir_all(&package_dir) {
            tracing::warn!("Skipping package {name}: {err}");
            stats.packages_skipped += 1;
            pb.inc(group.artifacts.len() as u64);
            continue;
        }

        let mut entries: Vec<LinkEntry> = Vec::with_capacity(group.artifacts.len());
        let mut mirrored = 0;
        let mut omitted = 0;
        for artifact in &group.artifacts {
            pb.set_message(format!(
                "{name} {}",
                console::style(&artifact.file_name).dim()
            ));
            let needs_mirror = mirror.rule().applies_to(&artifact.file_name);
            match mirror.resolve_link(artifact).await {
                Ok(entry) => {
                    if needs_mirror {
                        mirrored += 1;
                    }
                    entries.push(entry);
                }
                Err(err) => {
                    tracing::warn!("Omitting link for {}: {err}", artifact.file_name);
                    omitted += 1;
                }
            }
            pb.inc(1);
        }
        stats.links_omitted += omitted;

        let page = render::render_package_page(name, &entries);
        if let Err(err) = fs::write(package_dir.join("index.html"), page) {
            tracing::warn!("Skipping package {name}: {err}");
            stats.packages_skipped += 1;
            continue;
        }
        stats.packages += 1;
        stats.links += entries.len();
        stats.links_mirrored += mirrored;
        written_packages.push(name.to_owned());
    }

    let names: Vec<&str> = written_packages.iter().map(String::as_str).collect();
    let top_page = render::render_top_page(&names, &owner, &site);
    fs::write(output_root.join("index.html"), top_page).map_err(IndexError::WriteTopPage)?;

    pb.finish_with_message(format!(
        "{} {}",
        console::style("Finished").green(),
        output_root.display()
    ));

    Ok(stats)
}
