use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DriftError;

/// One source file captured for analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// Path the file was read from.
    pub path: PathBuf,
    /// Full file text.
    pub text: String,
}

/// An ordered set of source files concatenated into one prompt blob.
///
/// Immutable once built: the bundle is constructed from the input paths in
/// the order given, then rendered with file-boundary markers so the model
/// can attribute behavior to specific files.
///
/// # Examples
///
/// ```
/// use driftguard_core::CodeBundle;
///
/// let bundle = CodeBundle::from_sources(vec![
///     ("src/refund.py".into(), "def refund(): ...".into()),
/// ]);
/// assert_eq!(bundle.len(), 1);
/// assert!(bundle.render().contains("--- FILE: src/refund.py ---"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBundle {
    files: Vec<SourceFile>,
}

impl CodeBundle {
    /// Build a bundle from already-loaded (path, text) pairs.
    pub fn from_sources(sources: Vec<(PathBuf, String)>) -> Self {
        Self {
            files: sources
                .into_iter()
                .map(|(path, text)| SourceFile { path, text })
                .collect(),
        }
    }

    /// Read every path into a bundle, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::FileNotFound`] for a missing file, or
    /// [`DriftError::Io`] for any other read failure. Fails on the first
    /// unreadable file; nothing is analyzed with partial input.
    pub fn from_paths(paths: &[PathBuf]) -> Result<Self, DriftError> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let text = std::fs::read_to_string(path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DriftError::FileNotFound(path.clone())
                } else {
                    DriftError::Io(e)
                }
            })?;
            files.push(SourceFile {
                path: path.clone(),
                text,
            });
        }
        Ok(Self { files })
    }

    /// Number of files in the bundle.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the bundle holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The captured files, in input order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Concatenate all files into one text blob with boundary markers.
    pub fn render(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        for file in &self.files {
            let _ = writeln!(out, "--- FILE: {} ---", file.path.display());
            out.push_str(&file.text);
            if !file.text.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}

/// Read a single documentation file.
///
/// # Errors
///
/// Returns [`DriftError::FileNotFound`] if the file is missing, or
/// [`DriftError::Io`] for any other read failure.
pub fn read_doc(path: &Path) -> Result<String, DriftError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DriftError::FileNotFound(path.to_path_buf())
        } else {
            DriftError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_paths_reads_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.py");
        let b = dir.path().join("b.py");
        std::fs::write(&a, "print('a')\n").unwrap();
        std::fs::write(&b, "print('b')\n").unwrap();

        let bundle = CodeBundle::from_paths(&[b.clone(), a.clone()]).unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.files()[0].path, b);
        assert_eq!(bundle.files()[1].path, a);

        let rendered = bundle.render();
        let b_marker = rendered.find("b.py ---").unwrap();
        let a_marker = rendered.find("a.py ---").unwrap();
        assert!(b_marker < a_marker, "files must render in input order");
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.py");
        let err = CodeBundle::from_paths(&[missing.clone()]).unwrap_err();
        match err {
            DriftError::FileNotFound(p) => assert_eq!(p, missing),
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }

    #[test]
    fn render_adds_markers_and_trailing_newline() {
        let bundle = CodeBundle::from_sources(vec![(
            PathBuf::from("x.rs"),
            "fn main() {}".into(),
        )]);
        let rendered = bundle.render();
        assert!(rendered.starts_with("--- FILE: x.rs ---\n"));
        assert!(rendered.ends_with("fn main() {}\n"));
    }

    #[test]
    fn empty_bundle() {
        let bundle = CodeBundle::from_sources(vec![]);
        assert!(bundle.is_empty());
        assert_eq!(bundle.render(), "");
    }

    #[test]
    fn read_doc_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_doc(&dir.path().join("README.md")).unwrap_err();
        assert!(matches!(err, DriftError::FileNotFound(_)));
    }
}
