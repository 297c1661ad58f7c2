use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::effects::FileSystem;

pub(crate) const DIST_DIR: &str = "dist";

/// Build output removed before every build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CleanPattern {
    Exact(&'static str),
    Suffix(&'static str),
}

pub(crate) const CLEAN_PATTERNS: [CleanPattern; 3] = [
    CleanPattern::Exact("build"),
    CleanPattern::Exact(DIST_DIR),
    CleanPattern::Suffix(".egg-info"),
];

impl CleanPattern {
    pub(crate) fn matches(self, name: &str) -> bool {
        match self {
            Self::Exact(expected) => name == expected,
            Self::Suffix(suffix) => name.ends_with(suffix),
        }
    }
}

/// Entries directly under `root` that the clean stage removes, grouped by
/// pattern in declaration order.
pub(crate) fn clean_targets(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs.list_dir(root)?;
    let mut targets = Vec::new();
    for pattern in CLEAN_PATTERNS {
        for entry in &entries {
            let Some(name) = entry.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if pattern.matches(name) && !targets.contains(entry) {
                targets.push(entry.clone());
            }
        }
    }
    Ok(targets)
}

/// Archives in `dist/`, as paths relative to `root`, sorted.
pub(crate) fn dist_files(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    let dist = root.join(DIST_DIR);
    if !fs.is_dir(&dist) {
        return Ok(Vec::new());
    }
    let files = fs
        .list_dir(&dist)?
        .into_iter()
        .filter(|path| fs.is_file(path))
        .map(|path| path.strip_prefix(root).map(Path::to_path_buf).unwrap_or(path))
        .collect();
    Ok(files)
}

pub(crate) fn relative_path_str(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
