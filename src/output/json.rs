//! JSON Lines record writer and reader.
//!
//! One serialized `TraceRecord` per line, in producer order.

use crate::parser::schema::TraceRecord;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Write a record stream to a JSON Lines file
///
/// **Public** - main entry point for record output
///
/// # Arguments
/// * `records` - Records in producer order
/// * `output_path` - Path to output file
///
/// # Returns
/// Number of records written
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_records(
    records: &[TraceRecord],
    output_path: impl AsRef<Path>,
) -> Result<usize, OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing records to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path)?;
    let written = write_records_to(records, BufWriter::new(file))?;

    info!(
        "{} records written ({} bytes)",
        written,
        calculate_file_size(output_path)
    );

    Ok(written)
}

/// Write records as JSON Lines to any writer (stdout, a buffer, a file)
///
/// **Public** - used by the CLI when no output file is given
pub fn write_records_to<W: Write>(records: &[TraceRecord], mut writer: W) -> Result<usize, OutputError> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Read a JSON Lines record file back
///
/// **Public** - useful for validation and testing
///
/// Blank lines are skipped. The first line that does not decode as a record
/// fails the whole read with its 1-based line number.
pub fn read_records(input_path: impl AsRef<Path>) -> Result<Vec<TraceRecord>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading records from: {}", input_path.display());

    let reader = BufReader::new(File::open(input_path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: TraceRecord =
            serde_json::from_str(&line).map_err(|e| OutputError::InvalidRecord {
                line: index + 1,
                message: e.to_string(),
            })?;
        records.push(record);
    }

    debug!("Loaded {} records", records.len());
    Ok(records)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }
}
