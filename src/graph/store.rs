use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::model::Snapshot;
use crate::error::{GraphError, GraphResult};

fn io_error(path: &Path, source: std::io::Error) -> GraphError {
    GraphError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Read a snapshot document from disk
pub fn read_snapshot(path: &Path) -> GraphResult<Snapshot> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let snapshot = serde_json::from_reader(BufReader::new(file))?;
    Ok(snapshot)
}

/// Overwrite `path` with the pretty-printed snapshot.
///
/// The file is truncated before writing, so an interrupted write leaves it
/// incomplete.
pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> GraphResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.write_all(b"\n").map_err(|e| io_error(path, e))?;
    writer.flush().map_err(|e| io_error(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::fixtures::universe;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/graph.json");
        let snapshot = universe();

        write_snapshot(&snapshot, &path).unwrap();
        let loaded = read_snapshot(&path).unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, "x".repeat(100_000)).unwrap();

        write_snapshot(&universe(), &path).unwrap();

        assert!(read_snapshot(&path).is_ok());
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_snapshot(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }));
    }

    #[test]
    fn test_read_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read_snapshot(&path).unwrap_err();
        assert!(matches!(err, GraphError::Parse(_)));
    }
}
