use crate::bundle::{BundleEntry, FileBundle};
use crate::error::{BundleError, BundleResult};
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Directory where run artifacts are written; never collected
pub const OUTPUT_DIR_NAME: &str = "maze-output";

/// Extensions the remote service accepts, matched as prefixes of a file's extension
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["tf", "tfvars", "tfstate"];

pub struct FileCollector;

impl FileCollector {
    /// Collect every recognized file below `directory` into a bundle.
    ///
    /// Any unreadable file or directory aborts collection; no partial bundle
    /// is returned.
    pub fn collect(directory: &Path) -> BundleResult<FileBundle> {
        tracing::debug!("Collecting terraform files from: {}", directory.display());

        let mut bundle = FileBundle::new();
        let walker = WalkDir::new(directory)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !Self::is_output_dir(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| directory.to_path_buf());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                BundleError::FileAccess { path, source }
            })?;

            if !entry.file_type().is_file() || !Self::is_recognized(entry.path()) {
                continue;
            }

            bundle.push(Self::read_entry(directory, entry.path())?);
        }

        tracing::info!(
            "Collected {} file(s), {} bytes",
            bundle.len(),
            bundle.content_size()
        );
        Ok(bundle)
    }

    /// Whether `path` carries one of the recognized extensions
    pub fn is_recognized(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| RECOGNIZED_EXTENSIONS.iter().any(|r| ext.starts_with(r)))
    }

    fn is_output_dir(entry: &walkdir::DirEntry) -> bool {
        entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == OUTPUT_DIR_NAME
    }

    fn read_entry(root: &Path, path: &Path) -> BundleResult<BundleEntry> {
        let access = |source: std::io::Error| BundleError::FileAccess {
            path: path.to_path_buf(),
            source,
        };

        let content = {
            let mut file = File::open(path).map_err(access)?;
            let mut content = Vec::new();
            file.read_to_end(&mut content).map_err(access)?;
            content
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative_path = relative_path(root, path);
        tracing::debug!("Selected {} ({} bytes)", relative_path, content.len());

        Ok(BundleEntry {
            file_name,
            relative_path,
            content,
        })
    }
}

/// `path` relative to `root`, always `/`-separated
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
