use std::borrow::Borrow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

/// A representation of a PyPI package name. This struct both stores the source string from which
/// this instance was created as well as a normalized name that can be used to compare different
/// names. The normalized form follows the simple-index convention: lowercase, with underscores
/// and dots replaced by hyphens.
///
/// This struct explicitly does not implement [`std::fmt::Display`] because its ambiguous if that
/// would display the source or the normalized version. Simply call `as_source` or `as_normalized`
/// to make the distinction.
#[derive(Debug, Clone, Eq)]
pub struct PackageName {
    normalized: Option<String>,
    source: String,
}

impl PackageName {
    /// Returns the source representation of the package name. This is the string from which this
    /// instance was created.
    pub fn as_source(&self) -> &str {
        &self.source
    }

    /// Returns the normalized version of the package name: lowercase, `_` and `.` replaced by
    /// `-`. Two names that normalize to the same string refer to the same package.
    pub fn as_normalized(&self) -> &str {
        self.normalized.as_ref().unwrap_or(&self.source)
    }

    /// Derives the package name from a wheel file name.
    ///
    /// The name is the part of the file name that precedes the version segment. The version
    /// segment starts at the first `-` that is followed by an ASCII digit; file names whose
    /// remaining segments never start with a digit fall back to the first `-`. A file name
    /// without any `-` cannot be split and is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use wheelhouse_types::PackageName;
    ///
    /// let name = PackageName::from_wheel_filename("pydantic_core-2.0-cp311-linux_aarch64.whl").unwrap();
    /// assert_eq!(name.as_source(), "pydantic_core");
    /// assert_eq!(name.as_normalized(), "pydantic-core");
    /// ```
    pub fn from_wheel_filename(file_name: &str) -> Result<Self, InvalidPackageNameError> {
        let bytes = file_name.as_bytes();
        let mut first_separator = None;
        let mut version_separator = None;
        for (i, &b) in bytes.iter().enumerate() {
            if b != b'-' {
                continue;
            }
            if first_separator.is_none() {
                first_separator = Some(i);
            }
            if bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
                version_separator = Some(i);
                break;
            }
        }
        let end = version_separator
            .or(first_separator)
            .ok_or_else(|| InvalidPackageNameError::MissingSeparator(file_name.to_owned()))?;
        file_name[..end].try_into()
    }
}

/// An error that is returned when conversion from a string to a [`PackageName`] fails.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InvalidPackageNameError {
    /// The package name contains illegal characters
    #[error(
        "'{0}' is not a valid package name. Package names can only contain 0-9, a-z, A-Z, -, _, or ."
    )]
    InvalidCharacters(String),

    /// The file name contains no `-` to split a package name off of
    #[error("'{0}' contains no '-' separator to derive a package name from")]
    MissingSeparator(String),
}

impl TryFrom<String> for PackageName {
    type Error = InvalidPackageNameError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        // Ensure that the string is non-empty and only contains valid characters
        if source.is_empty()
            || !source
                .bytes()
                .all(|b| matches!(b, b'a'..=b'z'|b'A'..=b'Z'|b'0'..=b'9'|b'-'|b'_'|b'.'))
        {
            return Err(InvalidPackageNameError::InvalidCharacters(source));
        }

        // Only allocate the normalized form if the source actually differs from it.
        let normalized = if source
            .bytes()
            .any(|b| b.is_ascii_uppercase() || b == b'_' || b == b'.')
        {
            Some(
                source
                    .chars()
                    .map(|c| match c {
                        '_' | '.' => '-',
                        c => c.to_ascii_lowercase(),
                    })
                    .collect(),
            )
        } else {
            None
        };

        Ok(Self { normalized, source })
    }
}

impl<'a> TryFrom<&'a str> for PackageName {
    type Error = InvalidPackageNameError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        value.to_owned().try_into()
    }
}

impl FromStr for PackageName {
    type Err = InvalidPackageNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.to_owned().try_into()
    }
}

impl Hash for PackageName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_normalized().hash(state);
    }
}

impl PartialEq for PackageName {
    fn eq(&self, other: &Self) -> bool {
        self.as_normalized().eq(other.as_normalized())
    }
}

impl PartialOrd for PackageName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_normalized().cmp(other.as_normalized())
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        self.as_normalized()
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_package_name_basics() {
        let name1 = PackageName::try_from("PyYAML").unwrap();
        assert_eq!(name1.as_source(), "PyYAML");
        assert_eq!(name1.as_normalized(), "pyyaml");

        let name2 = PackageName::try_from("pyyaml").unwrap();
        assert_eq!(name2.as_source(), "pyyaml");
        assert_eq!(name2.as_normalized(), "pyyaml");

        assert_eq!(name1, name2);

        assert!(PackageName::try_from("invalid$").is_err());
        assert!(PackageName::try_from("").is_err());
    }

    #[rstest]
    #[case("pydantic_core", "pydantic-core")]
    #[case("ruamel.yaml", "ruamel-yaml")]
    #[case("A_B", "a-b")]
    #[case("a-b", "a-b")]
    #[case("numpy", "numpy")]
    fn test_normalization(#[case] source: &str, #[case] expected: &str) {
        let name: PackageName = source.parse().unwrap();
        assert_eq!(name.as_source(), source);
        assert_eq!(name.as_normalized(), expected);
    }

    #[rstest]
    #[case("foo-1.0-py3-none-linux_aarch64.whl", "foo")]
    #[case("pydantic_core-2.0-cp311-linux_aarch64.whl", "pydantic-core")]
    #[case("A_B-1.0-py3-none-any.whl", "a-b")]
    #[case("a-b-2.0-py3-none-any.whl", "a-b")]
    #[case("7zip-1.0-py3-none-any.whl", "7zip")]
    // No version-looking segment at all: fall back to the first separator.
    #[case("foo-bar.whl", "foo")]
    fn test_from_wheel_filename(#[case] file_name: &str, #[case] expected: &str) {
        let name = PackageName::from_wheel_filename(file_name).unwrap();
        assert_eq!(name.as_normalized(), expected);
    }

    #[rstest]
    #[case("noseparator.whl")]
    #[case("")]
    fn test_from_wheel_filename_missing_separator(#[case] file_name: &str) {
        assert_eq!(
            PackageName::from_wheel_filename(file_name),
            Err(InvalidPackageNameError::MissingSeparator(
                file_name.to_owned()
            ))
        );
    }

    #[test]
    fn test_same_prefix_groups_together() {
        let a = PackageName::from_wheel_filename("A_B-1.0-py3-none-any.whl").unwrap();
        let b = PackageName::from_wheel_filename("a-b-2.0-py3-none-any.whl").unwrap();
        assert_eq!(a, b);

        use std::hash::{BuildHasher, RandomState};
        let state = RandomState::new();
        assert_eq!(state.hash_one(&a), state.hash_one(&b));
    }

    #[test]
    fn test_ordering_is_by_normalized_name() {
        let mut names: Vec<PackageName> = ["Zope_interface", "attrs", "PyYAML"]
            .into_iter()
            .map(|s| s.parse().unwrap())
            .collect();
        names.sort();
        let normalized: Vec<&str> = names.iter().map(PackageName::as_normalized).collect();
        assert_eq!(normalized, ["attrs", "pyyaml", "zope-interface"]);
    }
}
