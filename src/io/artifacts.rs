// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Persisting the data and metadata text artifacts

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Locations of the written artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub data: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    /// `<dir>/<name>.data.txt` and `<dir>/<name>.meta.txt`
    pub fn for_model(dir: &Path, name: &str) -> Self {
        Self {
            data: dir.join(format!("{}.data.txt", name)),
            metadata: dir.join(format!("{}.meta.txt", name)),
        }
    }
}

/// Output directory for `input` found under `root`: `out` plus the
/// subdirectory of `input` below `root`, so equal file names in different
/// subdirectories never share artifacts
pub fn mirrored_dir(out: &Path, root: &Path, input: &Path) -> PathBuf {
    match input.strip_prefix(root).ok().and_then(Path::parent) {
        Some(parent) if !parent.as_os_str().is_empty() => out.join(parent),
        _ => out.to_path_buf(),
    }
}

/// Write `contents` to `path`, flushing before the handle is released.
///
/// The writer is scoped to this call, so the file is closed on error too.
pub fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()
}

/// Write both artifacts, creating `dir` when missing
pub fn write_artifacts(
    dir: &Path,
    name: &str,
    data: &str,
    metadata: &str,
) -> std::io::Result<ArtifactPaths> {
    fs::create_dir_all(dir)?;
    let paths = ArtifactPaths::for_model(dir, name);
    write_text(&paths.data, data)?;
    write_text(&paths.metadata, metadata)?;
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_artifacts() -> std::io::Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("nested").join("out");
        let paths = write_artifacts(&out, "cube", "data", "meta")?;

        assert_eq!(paths.data, out.join("cube.data.txt"));
        assert_eq!(fs::read_to_string(&paths.data)?, "data");
        assert_eq!(fs::read_to_string(&paths.metadata)?, "meta");
        Ok(())
    }

    #[test]
    fn test_mirrored_dir_keeps_subdirectories_apart() {
        let out = Path::new("reports");
        let root = Path::new("models");

        let a = mirrored_dir(out, root, &root.join("a").join("part.stl"));
        let b = mirrored_dir(out, root, &root.join("b").join("part.stl"));
        assert_eq!(a, out.join("a"));
        assert_eq!(b, out.join("b"));
        assert_ne!(
            ArtifactPaths::for_model(&a, "part"),
            ArtifactPaths::for_model(&b, "part")
        );

        assert_eq!(mirrored_dir(out, root, &root.join("top.stl")), out);
        assert_eq!(mirrored_dir(out, root, Path::new("elsewhere/x.stl")), out);
    }

    #[test]
    fn test_write_into_file_path_fails() -> std::io::Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory")?;
        assert!(write_artifacts(&blocker, "cube", "data", "meta").is_err());
        Ok(())
    }
}
