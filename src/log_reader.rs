use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read a complete match log into memory, one entry per line. Fully blank
/// lines are dropped so a trailing newline cannot shift tick alignment.
/// Failing to open or scan the file is fatal for the whole ingestion.
pub fn read_match_log(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|source| Error::LogRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| Error::LogRead {
            path: path.to_path_buf(),
            source,
        })?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}
