//! Local mirroring of wheels that need to be published under a different platform tag, and
//! link resolution for everything else.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use url::Url;
use wheelhouse_types::WheelArtifact;

/// The policy deciding which wheels are mirrored locally under a new platform tag.
///
/// A wheel is mirrored when its file name contains both `package_marker` and `from_tag`. The
/// local copy is stored under the file name with `from_tag` substituted by `to_tag`. This is
/// the only piece of domain policy in the generator; swapping the rule changes which wheels
/// are re-hosted without touching the renderer.
#[derive(Debug, Clone)]
pub struct RelabelRule {
    /// Substring of the file name marking a package that must be hosted locally.
    pub package_marker: String,

    /// The platform tag to replace.
    pub from_tag: String,

    /// The platform tag the local copy is published under.
    pub to_tag: String,
}

impl RelabelRule {
    /// Returns `true` if this rule applies to the given file name.
    pub fn applies_to(&self, file_name: &str) -> bool {
        file_name.contains(&self.package_marker) && file_name.contains(&self.from_tag)
    }

    /// Returns the file name with the platform tag substituted.
    pub fn relabel(&self, file_name: &str) -> String {
        file_name.replace(&self.from_tag, &self.to_tag)
    }
}

/// The rendered unit on a package page: one link to a wheel, remote or mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// The text of the link. Differs from the wheel's published file name when the relabel
    /// rule applied.
    pub display_name: String,

    /// Where the link points: the original remote URL, or a path relative to the package page
    /// for mirrored wheels.
    pub href: String,

    /// The `sha256=…` fragment of the source URL, if it carried one.
    pub digest_fragment: Option<String>,
}

/// An error that can occur while mirroring a single wheel. Mirror failures are scoped to one
/// link: the caller logs the error, omits the link and continues with the rest of the run.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The wheel could not be fetched (transport failure, timeout or non-success status)
    #[error("failed to download {url}: {source}")]
    Request {
        /// The URL the download was fetched from
        url: Url,
        /// The underlying request error
        #[source]
        source: reqwest::Error,
    },

    /// The local copy could not be written
    #[error("failed to write wheel to disk: {0}")]
    Io(#[source] std::io::Error),
}

/// Mirrors wheels matching the relabel rule into the output tree and computes the link target
/// for every wheel.
pub struct ArtifactMirror {
    client: reqwest::Client,
    output_root: PathBuf,
    rule: RelabelRule,
}

impl ArtifactMirror {
    /// Constructs a new mirror writing local copies directly under `output_root`.
    pub fn new(client: reqwest::Client, output_root: &Path, rule: RelabelRule) -> Self {
        Self {
            client,
            output_root: output_root.to_path_buf(),
            rule,
        }
    }

    /// The relabel rule this mirror applies.
    pub fn rule(&self) -> &RelabelRule {
        &self.rule
    }

    /// Resolves the link for one wheel.
    ///
    /// Wheels the rule does not apply to link straight to their remote URL, fragment and all.
    /// Wheels the rule applies to are downloaded to `<output_root>/<relabeled name>` and link
    /// to that local copy, one directory level up from the package page. A wheel already
    /// present at its destination is not downloaded again.
    pub async fn resolve_link(&self, artifact: &WheelArtifact) -> Result<LinkEntry, DownloadError> {
        let digest_fragment = artifact.digest_fragment().map(str::to_owned);

        if !self.rule.applies_to(&artifact.file_name) {
            return Ok(LinkEntry {
                display_name: artifact.file_name.clone(),
                href: artifact.url.to_string(),
                digest_fragment,
            });
        }

        let display_name = self.rule.relabel(&artifact.file_name);
        let destination = self.output_root.join(&display_name);
        if destination.exists() {
            tracing::debug!("{display_name} is already mirrored, skipping download");
        } else {
            self.download(&artifact.url, &destination).await?;
        }

        Ok(LinkEntry {
            href: format!("../{display_name}"),
            display_name,
            digest_fragment,
        })
    }

    async fn download(&self, url: &Url, destination: &Path) -> Result<(), DownloadError> {
        tracing::info!("Mirroring {url} to {}", destination.display());
        match self.download_inner(url, destination).await {
            Ok(()) => Ok(()),
            Err(err) => {
                // The existence check treats any file at the destination as a complete
                // mirror, so a partial download must not survive the failure.
                let _ = tokio::fs::remove_file(destination).await;
                Err(err)
            }
        }
    }

    async fn download_inner(&self, url: &Url, destination: &Path) -> Result<(), DownloadError> {
        let request_err = |source| DownloadError::Request {
            url: url.clone(),
            source,
        };

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_err)?
            .error_for_status()
            .map_err(request_err)?;

        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(DownloadError::Io)?;
        while let Some(chunk) = response.chunk().await.map_err(request_err)? {
            file.write_all(&chunk).await.map_err(DownloadError::Io)?;
        }
        file.flush().await.map_err(DownloadError::Io)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rule() -> RelabelRule {
        RelabelRule {
            package_marker: "pydantic_core".to_owned(),
            from_tag: "linux_aarch64".to_owned(),
            to_tag: "android_24_aarch64".to_owned(),
        }
    }

    #[test]
    fn test_rule_requires_both_marker_and_tag() {
        let rule = rule();
        assert!(rule.applies_to("pydantic_core-2.0-cp311-linux_aarch64.whl"));
        // Right package, wrong platform.
        assert!(!rule.applies_to("pydantic_core-2.0-py3-none-any.whl"));
        // Right platform, package that does not need local hosting.
        assert!(!rule.applies_to("numpy-1.26.4-cp311-linux_aarch64.whl"));
    }

    #[test]
    fn test_relabel_substitutes_the_platform_tag() {
        assert_eq!(
            rule().relabel("pydantic_core-2.0-cp311-linux_aarch64.whl"),
            "pydantic_core-2.0-cp311-android_24_aarch64.whl"
        );
    }
}
