//! Shader source loading.
//!
//! Sources ship as plain GLSL files next to the executable; a checkout run
//! via `cargo run` falls back to the `shaders/` directory in the crate root.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading a text resource.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl LoadError {
    /// Path of the resource that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Read { path, .. } => path,
        }
    }
}

/// Read the full text content of a resource.
pub fn load_text(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Directory holding the shipped shader sources.
///
/// Resolved relative to the program's own location; when no `shaders/`
/// directory sits next to the executable (development builds run from the
/// target dir), the crate's checked-in `shaders/` directory is used.
pub fn shader_dir() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let bundled = dir.join("shaders");
            if bundled.is_dir() {
                return bundled;
            }
        }
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_text_reads_full_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "void main() {{}}").unwrap();

        let text = load_text(file.path()).unwrap();
        assert_eq!(text, "void main() {}");
    }

    #[test]
    fn test_load_text_missing_file_names_path() {
        let err = load_text(Path::new("/no/such/shader.frag")).unwrap_err();
        assert!(err.to_string().contains("/no/such/shader.frag"));
        assert_eq!(err.path(), Path::new("/no/such/shader.frag"));
    }

    #[test]
    fn test_shader_dir_contains_shipped_sources() {
        let dir = shader_dir();
        assert!(dir.join("colorwash.frag").is_file());
        assert!(dir.join("fullscreen.vert").is_file());
    }
}
