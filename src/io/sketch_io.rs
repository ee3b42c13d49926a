use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::line_map::LineMap;
use crate::parse::error::ConvertError;

/// Error type for sketch, header, config and map file operations
#[derive(Debug, thiserror::Error)]
pub enum SketchIoError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ConfigParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not scan header {path}: {source}")]
    HeaderError { path: PathBuf, source: ConvertError },
    #[error("malformed line map: {0}")]
    MapJsonError(#[from] serde_json::Error),
}

/// Read a sketch (or header) as UTF-8 text.
pub fn read_sketch(path: &Path) -> Result<String, SketchIoError> {
    fs::read_to_string(path).map_err(|e| SketchIoError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a translation unit, replacing `path` atomically.
pub fn write_output(path: &Path, text: &str) -> Result<(), SketchIoError> {
    atomic_write(path, text.as_bytes()).map_err(|e| SketchIoError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `map` as pretty JSON.
pub fn write_line_map(path: &Path, map: &LineMap) -> Result<(), SketchIoError> {
    let mut json = serde_json::to_string_pretty(map)?;
    json.push('\n');
    write_output(path, &json)
}

/// Read a line map previously written by [`write_line_map`].
pub fn read_line_map(path: &Path) -> Result<LineMap, SketchIoError> {
    let text = read_sketch(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sketch.cpp");
        write_output(&path, "void setup() {}\n").unwrap();
        assert_eq!(read_sketch(&path).unwrap(), "void setup() {}\n");

        // Overwrite in place
        write_output(&path, "void loop() {}\n").unwrap();
        assert_eq!(read_sketch(&path).unwrap(), "void loop() {}\n");
    }

    #[test]
    fn test_line_map_file_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sketch.map.json");
        let map = LineMap::with_insertion(12, 4, 2);
        write_line_map(&path, &map).unwrap();
        assert_eq!(read_line_map(&path).unwrap(), map);
    }

    #[test]
    fn test_read_missing_sketch() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.ino");
        let err = read_sketch(&path).unwrap_err();
        assert!(matches!(err, SketchIoError::ReadError { .. }));
        assert!(err.to_string().contains("missing.ino"));
    }

    #[test]
    fn test_read_invalid_line_map() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{\"input_lines\": 1}").unwrap();
        assert!(matches!(
            read_line_map(&path).unwrap_err(),
            SketchIoError::MapJsonError(_)
        ));
    }
}
