use thiserror::Error;

use crate::release::ListReleaseError;

/// A fatal error of an index generation run. Per-wheel download failures and per-package
/// write failures never surface here; those are logged, counted and skipped.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The HTTP client could not be constructed
    #[error("failed to construct the HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The release listing failed; nothing was written
    #[error(transparent)]
    List(#[from] ListReleaseError),

    /// The latest release carries no wheel assets
    #[error("the latest release contains no wheel assets")]
    NoWheels,

    /// No package name could be derived from any of the listed wheels
    #[error("no packages could be derived from the listed wheels")]
    NoPackages,

    /// The output root directory could not be created
    #[error("failed to create the output root: {0}")]
    CreateOutputRoot(#[source] std::io::Error),

    /// The top-level index page could not be written
    #[error("failed to write the top-level index page: {0}")]
    WriteTopPage(#[source] std::io::Error),
}
