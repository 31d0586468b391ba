use crate::error::Res;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Create a directory and all of its parents.
pub(crate) fn make_dir(path: impl AsRef<Path>) -> Res<()> {
    let path = path.as_ref();
    fs::create_dir_all(path)
        .with_context(|| format!("Unable to create directory at {}", path.display()))
}

/// Canonicalize a path, which must exist.
pub(crate) fn canonicalize(path: impl AsRef<Path>) -> Res<PathBuf> {
    let path = path.as_ref();
    fs::canonicalize(path)
        .with_context(|| format!("Unable to canonicalize the path {}", path.display()))
}

/// Write a file, replacing any previous contents.
pub(crate) fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Res<()> {
    let path = path.as_ref();
    fs::write(path, contents).context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub(crate) fn read(path: impl AsRef<Path>) -> Res<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub(crate) fn deserialize<T>(path: impl AsRef<Path>) -> Res<T>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let content = read(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Append `line` to the file at `path`, creating the file if it does not exist.
pub(crate) fn append(path: impl AsRef<Path>, line: &str) -> Res<()> {
    let path = path.as_ref();
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Unable to open {} for appending", path.display()))?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("Unable to append to {}", path.display()))
}

/// Lists the files directly inside `dir` that have the given `extension`, sorted by file name.
pub(crate) fn list_files(dir: impl AsRef<Path>, extension: &str) -> Res<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Unable to read directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        write(dir.path().join("2024-06-16.json"), "[]").unwrap();
        write(dir.path().join("2024-06-15.json"), "[]").unwrap();
        write(dir.path().join("notes.txt"), "hello").unwrap();
        make_dir(dir.path().join("nested.json")).unwrap();

        let files = list_files(dir.path(), "json").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["2024-06-15.json", "2024-06-16.json"]);
    }

    #[test]
    fn test_append_creates_then_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.log");
        append(&path, "one\n").unwrap();
        append(&path, "two\n").unwrap();
        assert_eq!(read(&path).unwrap(), "one\ntwo\n");
    }
}
