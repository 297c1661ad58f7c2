use std::path::Path;

use toml_edit::DocumentMut;
use tracing::debug;

use crate::effects::FileSystem;

pub const MANIFEST_FILE: &str = "pyproject.toml";

pub(crate) fn has_manifest(fs: &dyn FileSystem, root: &Path) -> bool {
    fs.is_file(&root.join(MANIFEST_FILE))
}

/// `[project].name` from the manifest, when it can be read.
pub(crate) fn project_name(fs: &dyn FileSystem, root: &Path) -> Option<String> {
    let path = root.join(MANIFEST_FILE);
    let contents = fs.read_to_string(&path).ok()?;
    let doc: DocumentMut = match contents.parse() {
        Ok(doc) => doc,
        Err(err) => {
            debug!(error = %err, "pyproject.toml is not valid TOML");
            return None;
        }
    };
    doc.get("project")
        .and_then(|project| project.get("name"))
        .and_then(|name| name.as_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
}

/// Name shown in banners: the declared project name, else the directory name.
pub(crate) fn display_name(fs: &dyn FileSystem, root: &Path) -> String {
    project_name(fs, root)
        .or_else(|| {
            root.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "project".to_string())
}
