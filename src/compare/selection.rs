use crate::document::{ComparisonSelection, Version};

/// Default pair for versions already sorted newest first: the immediate
/// predecessor on the left and the latest on the right. A single version is
/// compared with itself; no versions means no selection.
pub fn default_selection(sorted: &[Version]) -> Option<ComparisonSelection> {
    match sorted {
        [] => None,
        [only] => Some(ComparisonSelection {
            left: only.id,
            right: only.id,
        }),
        [latest, previous, ..] => Some(ComparisonSelection {
            left: previous.id,
            right: latest.id,
        }),
    }
}

pub fn latest_version_number(versions: &[Version]) -> Option<u32> {
    versions.iter().map(|v| v.version_number).max()
}

/// `"Version {n}"`, with `" (Latest)"` when `n` is the highest number in `versions`.
pub fn version_label(version: &Version, versions: &[Version]) -> String {
    if latest_version_number(versions) == Some(version.version_number) {
        format!("Version {} (Latest)", version.version_number)
    } else {
        format!("Version {}", version.version_number)
    }
}
