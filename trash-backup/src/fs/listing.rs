//! Immediate directory listing.

use std::path::{Path, PathBuf};

/// One entry of a single directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    /// File name, lossily converted for display and notifications
    pub name: String,

    /// Full path of the entry
    pub path: PathBuf,

    /// Is this a directory? Symlinks are resolved.
    pub is_dir: bool,
}

/// List the immediate entries of `dir`, sorted by file name.
///
/// Entries whose metadata cannot be read are reported as files; the
/// replicator decides later whether they can actually be copied.
pub fn list_entries(dir: &Path) -> std::io::Result<Vec<ListedEntry>> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_dir = std::fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false);

        entries.push(ListedEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path,
            is_dir,
        });
    }

    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_sorted_with_kinds() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("b.txt"), b"b")?;
        fs::create_dir(temp_dir.path().join("a"))?;
        fs::write(temp_dir.path().join("c.txt"), b"c")?;

        let entries = list_entries(temp_dir.path())?;
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b.txt", "c.txt"]);
        assert!(entries[0].is_dir);
        assert!(!entries[1].is_dir);
        assert_eq!(entries[2].path, temp_dir.path().join("c.txt"));
        Ok(())
    }

    #[test]
    fn test_list_is_not_recursive() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join("outer/inner"))?;
        fs::write(temp_dir.path().join("outer/inner/deep.txt"), b"x")?;

        let entries = list_entries(temp_dir.path())?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "outer");
        Ok(())
    }

    #[test]
    fn test_list_missing_directory() {
        assert!(list_entries(Path::new("/nonexistent_path_12345")).is_err());
    }
}
