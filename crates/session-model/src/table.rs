//! Delimited-text table I/O.
//!
//! Every stage boundary is a comma-separated file with a header row.
//! Column names are fixed by the serde renames on the record types.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use bowsync_common::error::BowsyncError;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::direction::DirectionSegment;
use crate::event::{Annotation, InferredNoteEvent};
use crate::pitch::PitchRow;
use crate::trajectory::KeypointRow;

/// Errors raised while reading or writing tables.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl TableError {
    /// Whether the failure was a missing file rather than bad content.
    pub fn is_not_found(&self) -> bool {
        match self {
            TableError::IoError { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            TableError::ParseError { source, .. } => match source.kind() {
                csv::ErrorKind::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
                _ => false,
            },
        }
    }
}

impl From<TableError> for BowsyncError {
    fn from(err: TableError) -> Self {
        if err.is_not_found() {
            let path = match err {
                TableError::IoError { path, .. } | TableError::ParseError { path, .. } => path,
            };
            return BowsyncError::FileNotFound { path };
        }
        match err {
            TableError::IoError { source, .. } => BowsyncError::Io(source),
            TableError::ParseError { .. } => BowsyncError::malformed(err.to_string()),
        }
    }
}

/// Read all records of a table from any reader.
pub fn read_records<T, R>(reader: R) -> Result<Vec<T>, csv::Error>
where
    T: DeserializeOwned,
    R: Read,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect()
}

/// Write records, header first, to any writer.
pub fn write_records<T, W>(writer: W, records: &[T]) -> Result<(), csv::Error>
where
    T: Serialize,
    W: Write,
{
    let mut out = csv::Writer::from_writer(writer);
    for record in records {
        out.serialize(record)?;
    }
    out.flush()?;
    Ok(())
}

/// Read a table file.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TableError> {
    let file = std::fs::File::open(path).map_err(|e| TableError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_records(file).map_err(|e| TableError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a table file, creating parent directories as needed.
pub fn write_table<T: Serialize>(path: &Path, records: &[T]) -> Result<(), TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| TableError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let file = std::fs::File::create(path).map_err(|e| TableError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_records(file, records).map_err(|e| TableError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// `Frame, Keypoint Index, X, Y`
pub fn read_keypoints(path: &Path) -> Result<Vec<KeypointRow>, TableError> {
    read_table(path)
}

/// `Time (s), Frequency (Hz), Confidence, Frame`
pub fn read_pitch(path: &Path) -> Result<Vec<PitchRow>, TableError> {
    read_table(path)
}

/// `Frame Start, Frame End, Direction`
pub fn read_directions(path: &Path) -> Result<Vec<DirectionSegment>, TableError> {
    read_table(path)
}

pub fn write_directions(path: &Path, segments: &[DirectionSegment]) -> Result<(), TableError> {
    write_table(path, segments)
}

/// `Frame, Time (s), Note, Event`
pub fn read_events(path: &Path) -> Result<Vec<InferredNoteEvent>, TableError> {
    read_table(path)
}

pub fn write_events(path: &Path, events: &[InferredNoteEvent]) -> Result<(), TableError> {
    write_table(path, events)
}

/// `Frame, Time (s), Note, Event, Annotation`
pub fn read_annotations(path: &Path) -> Result<Vec<Annotation>, TableError> {
    read_table(path)
}

pub fn write_annotations(path: &Path, annotations: &[Annotation]) -> Result<(), TableError> {
    write_table(path, annotations)
}
