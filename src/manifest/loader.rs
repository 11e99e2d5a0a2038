//! Reading manifest files and splitting them into YAML documents.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ManifestError, SyntaxError};

/// Path that means "read standard input".
pub const STDIN_PATH: &str = "-";

const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Where a document came from: file plus zero-based position in the stream.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DocumentSource {
    pub path: PathBuf,
    pub index: usize,
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.as_os_str() == STDIN_PATH {
            write!(f, "<stdin>#{}", self.index)
        } else {
            write!(f, "{}#{}", self.path.display(), self.index)
        }
    }
}

/// One non-empty YAML document, not yet interpreted.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source: DocumentSource,
    pub value: serde_yaml::Value,
}

fn has_manifest_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Expand `path` into the manifest files it names.
///
/// Directories are walked recursively in sorted order; only files with a
/// manifest extension are taken from them. Files named explicitly are always
/// taken.
pub fn collect_files(path: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    if path.as_os_str() == STDIN_PATH {
        return Ok(vec![path.to_path_buf()]);
    }

    let metadata = fs::metadata(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let read_error = |source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(path)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort();

    let mut files = Vec::new();
    for entry in entries {
        if entry.is_dir() {
            files.extend(collect_files(&entry)?);
        } else if has_manifest_extension(&entry) {
            files.push(entry);
        }
    }
    Ok(files)
}

/// Read a manifest file, or standard input for `-`.
pub fn read_source(path: &Path) -> Result<String, ManifestError> {
    let read_error = |source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    };
    if path.as_os_str() == STDIN_PATH {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(read_error)?;
        return Ok(content);
    }
    fs::read_to_string(path).map_err(read_error)
}

/// Split `content` into its non-empty YAML documents.
pub fn parse_documents(path: &Path, content: &str) -> Result<Vec<RawDocument>, SyntaxError> {
    let mut documents = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = serde_yaml::Value::deserialize(document).map_err(|source| SyntaxError {
            path: path.to_path_buf(),
            document: index,
            content: content.to_string(),
            source,
        })?;

        if value.is_null() {
            debug!(path = %path.display(), index, "skipping empty document");
            continue;
        }

        documents.push(RawDocument {
            source: DocumentSource {
                path: path.to_path_buf(),
                index,
            },
            value,
        });
    }

    Ok(documents)
}
