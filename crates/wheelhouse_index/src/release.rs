//! Listing of the wheel assets attached to the latest release of the wheel-builder
//! repository.

use serde::Deserialize;
use thiserror::Error;
use url::Url;
use wheelhouse_types::WheelArtifact;

/// The release document returned by the latest-release endpoint. Only the fields the lister
/// consumes are modeled; everything else in the response is ignored.
#[derive(Debug, Deserialize)]
struct Release {
    assets: Vec<ReleaseAsset>,
}

/// One asset record within a release. Both fields are optional: records missing either are
/// skipped with a diagnostic instead of failing the whole listing.
#[derive(Debug, Deserialize)]
struct ReleaseAsset {
    name: Option<String>,
    browser_download_url: Option<String>,
}

/// An error that can occur while listing the wheel assets of the latest release. Every variant
/// is fatal to the run: no output may be written after a failed listing.
#[derive(Debug, Error)]
pub enum ListReleaseError {
    /// The request could not be completed (transport failure or timeout)
    #[error("failed to fetch release info: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("release endpoint returned HTTP {status}")]
    Status {
        /// The status code of the response
        status: reqwest::StatusCode,
    },

    /// The response body is not valid JSON or lacks the expected `assets` array
    #[error("malformed release response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Fetches the asset list of the latest release from a fixed endpoint.
pub struct ReleaseClient {
    client: reqwest::Client,
    release_url: Url,
}

impl ReleaseClient {
    /// Constructs a new client for the given latest-release endpoint. Timeouts are bound by
    /// the injected [`reqwest::Client`].
    pub fn new(client: reqwest::Client, release_url: Url) -> Self {
        Self {
            client,
            release_url,
        }
    }

    /// Fetches the latest release and returns one artifact per wheel asset.
    ///
    /// Assets whose name does not end in `.whl` are expected (build logs, checksum files) and
    /// skipped silently. Assets missing a name or a parsable download URL are skipped with a
    /// diagnostic. The returned order is whatever the endpoint produced; grouping re-sorts.
    pub async fn list_wheels(&self) -> Result<Vec<WheelArtifact>, ListReleaseError> {
        tracing::info!("Fetching release info from {}", self.release_url);

        let response = self.client.get(self.release_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ListReleaseError::Status { status });
        }
        let body = response.text().await?;

        let wheels = wheels_from_release_body(&body)?;
        tracing::info!("Found {} wheel files", wheels.len());
        Ok(wheels)
    }
}

/// Parses a release document and extracts the wheel assets.
fn wheels_from_release_body(body: &str) -> Result<Vec<WheelArtifact>, ListReleaseError> {
    let release: Release = serde_json::from_str(body)?;

    let mut wheels = Vec::new();
    for asset in release.assets {
        match (asset.name, asset.browser_download_url) {
            (Some(name), Some(raw_url)) if WheelArtifact::is_wheel(&name) => {
                match raw_url.parse::<Url>() {
                    Ok(url) => wheels.push(WheelArtifact {
                        file_name: name,
                        url,
                    }),
                    Err(err) => {
                        tracing::warn!("Skipping wheel asset {name} with unparsable URL: {err}");
                    }
                }
            }
            (Some(name), _) if !WheelArtifact::is_wheel(&name) => {
                // Releases also carry non-wheel assets; not worth a diagnostic.
            }
            (name, _) => {
                tracing::warn!("Skipping asset with missing name or download URL (name: {name:?})");
            }
        }
    }
    Ok(wheels)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wheels_from_release_body() {
        let body = r#"{
            "tag_name": "v1",
            "assets": [
                {"name": "foo-1.0-py3-none-any.whl", "browser_download_url": "https://x/foo-1.0-py3-none-any.whl#sha256=abc"},
                {"name": "build.log", "browser_download_url": "https://x/build.log"},
                {"name": "bar-2.0-py3-none-any.whl"},
                {"browser_download_url": "https://x/anonymous.whl"},
                {"name": "baz-3.0-py3-none-any.whl", "browser_download_url": "not a url"}
            ]
        }"#;
        let wheels = wheels_from_release_body(body).unwrap();
        assert_eq!(wheels.len(), 1);
        assert_eq!(wheels[0].file_name, "foo-1.0-py3-none-any.whl");
        assert_eq!(wheels[0].digest_fragment(), Some("sha256=abc"));
    }

    #[test]
    fn test_input_order_is_preserved() {
        let body = r#"{"assets": [
            {"name": "b-1.0-py3-none-any.whl", "browser_download_url": "https://x/b"},
            {"name": "a-1.0-py3-none-any.whl", "browser_download_url": "https://x/a"}
        ]}"#;
        let wheels = wheels_from_release_body(body).unwrap();
        let names: Vec<&str> = wheels.iter().map(|w| w.file_name.as_str()).collect();
        assert_eq!(names, ["b-1.0-py3-none-any.whl", "a-1.0-py3-none-any.whl"]);
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(matches!(
            wheels_from_release_body("not json"),
            Err(ListReleaseError::MalformedResponse(_))
        ));
        // Valid JSON without the assets array is just as malformed.
        assert!(matches!(
            wheels_from_release_body(r#"{"message": "Not Found"}"#),
            Err(ListReleaseError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_empty_assets_is_not_an_error() {
        let wheels = wheels_from_release_body(r#"{"assets": []}"#).unwrap();
        assert!(wheels.is_empty());
    }
}
