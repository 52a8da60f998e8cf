use url::Url;

/// The archive suffix of a binary wheel. Matching is exact and case-sensitive: release assets
/// whose name does not end in this suffix are not wheels.
pub const WHEEL_SUFFIX: &str = ".whl";

/// A single downloadable wheel published as a release asset: a file name and the URL it can be
/// fetched from. Its identity is the file name; the URL is never used for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelArtifact {
    /// The file name of the wheel as published, e.g. `numpy-1.26.4-cp311-linux_aarch64.whl`.
    pub file_name: String,

    /// The URL the wheel can be downloaded from. May carry a `#sha256=…` fragment.
    pub url: Url,
}

impl WheelArtifact {
    /// Returns `true` if the given asset name carries the wheel suffix.
    pub fn is_wheel(name: &str) -> bool {
        name.ends_with(WHEEL_SUFFIX)
    }

    /// Returns the digest fragment of the source URL, without the leading `#`, if the URL
    /// carries one (e.g. `sha256=abc…`). Fragments that are not digest markers are ignored.
    pub fn digest_fragment(&self) -> Option<&str> {
        self.url.fragment().filter(|f| f.starts_with("sha256="))
    }
}
