//! Grouping of wheel artifacts into per-package collections.

use std::collections::BTreeMap;

use wheelhouse_types::{PackageName, WheelArtifact};

/// All wheels that belong to one package.
#[derive(Debug, Clone)]
pub struct PackageGroup {
    /// The grouping key derived from the wheel file names.
    pub name: PackageName,

    /// The wheels of this package, sorted by file name.
    pub artifacts: Vec<WheelArtifact>,
}

/// Groups artifacts by the package name derived from their file name.
///
/// An artifact whose file name cannot be split into a package name is skipped with a
/// diagnostic, never a hard error. Groups are returned ordered by normalized name and each
/// group's artifacts are sorted by file name, so the output is identical across runs with
/// identical input.
pub fn group_by_package(artifacts: Vec<WheelArtifact>) -> Vec<PackageGroup> {
    let mut groups: BTreeMap<PackageName, Vec<WheelArtifact>> = BTreeMap::new();
    for artifact in artifacts {
        match PackageName::from_wheel_filename(&artifact.file_name) {
            Ok(name) => groups.entry(name).or_default().push(artifact),
            Err(err) => {
                tracing::warn!(
                    "Could not derive a package name from {}: {err}",
                    artifact.file_name
                );
            }
        }
    }

    let groups: Vec<PackageGroup> = groups
        .into_iter()
        .map(|(name, mut artifacts)| {
            artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));
            PackageGroup { name, artifacts }
        })
        .collect();
    tracing::info!("Grouped wheels into {} packages", groups.len());
    groups
}
