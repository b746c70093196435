//! File-backed logger writing the `cemlog` container.

use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use cemsim_core::{Configuration, DataLogger, Dataset, Header, StorageError};
use tracing::{debug, warn};

use crate::attributes::header_record;
use crate::codec::{append_values_offset, encode_append, encode_create, encode_header, encode_preamble};
use crate::directory::Directory;
use crate::reader::{open_existing, StorageReader};

struct OpenTarget {
    path: PathBuf,
    file: File,
    directory: Directory,
    /// Byte position just past the last complete record.
    end: u64,
}

impl OpenTarget {
    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        self.end = append_or_rollback(&mut self.file, self.end, bytes, &self.path)?;
        Ok(())
    }
}

/// Sinks that can be cut back to a byte length.
trait Truncate {
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl Truncate for File {
    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Write `bytes` at `end` and return the new end. On failure the sink is
/// cut back to `end` so no partial record survives.
fn append_or_rollback<S>(
    sink: &mut S,
    end: u64,
    bytes: &[u8],
    path: &Path,
) -> Result<u64, StorageError>
where
    S: Write + Seek + Truncate,
{
    let result = sink
        .seek(SeekFrom::Start(end))
        .and_then(|_| sink.write_all(bytes));
    if let Err(e) = result {
        warn!(path = %path.display(), error = %e, "append failed, truncating");
        sink.truncate_to(end)?;
        return Err(StorageError::Io(e));
    }
    Ok(end + bytes.len() as u64)
}

/// Append-only logger over a single `cemlog` file.
///
/// Every write goes straight to the file, so it is visible to reads as
/// soon as the call returns. The in-memory directory mirrors the record
/// log and serves reads by seeking into the file.
#[derive(Default)]
pub struct BinaryLogger {
    target: Option<OpenTarget>,
}

impl BinaryLogger {
    /// Discriminator for this backend.
    pub const KIND: &'static str = "binary";

    /// A logger with no open target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an existing container to continue appending to it.
    ///
    /// Existing datasets keep growing from their stored length.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let file = open_existing(path, true)?;
        let (directory, end) = Directory::replay(&file)?;
        debug!(path = %path.display(), datasets = directory.datasets().len(), "reopened container");
        Ok(Self {
            target: Some(OpenTarget {
                path: path.to_path_buf(),
                file,
                directory,
                end,
            }),
        })
    }

    /// Path of the open target, if any.
    pub fn path(&self) -> Option<&Path> {
        self.target.as_ref().map(|t| t.path.as_path())
    }

    fn target(&self) -> Result<&OpenTarget, StorageError> {
        self.target.as_ref().ok_or(StorageError::NotOpen)
    }

    fn target_mut(&mut self) -> Result<&mut OpenTarget, StorageError> {
        self.target.as_mut().ok_or(StorageError::NotOpen)
    }
}

impl DataLogger for BinaryLogger {
    fn backend(&self) -> &str {
        Self::KIND
    }

    fn create_file(&mut self, path: &Path) -> Result<(), StorageError> {
        let mut file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        let mut preamble = Vec::new();
        encode_preamble(&mut preamble)?;
        file.write_all(&preamble)?;
        debug!(path = %path.display(), "created container");
        self.target = Some(OpenTarget {
            path: path.to_path_buf(),
            file,
            directory: Directory::default(),
            end: preamble.len() as u64,
        });
        Ok(())
    }

    fn write_header(&mut self, configuration: &Configuration) -> Result<(), StorageError> {
        let target = self.target_mut()?;
        if target.directory.header_record().is_some() {
            return Err(StorageError::HeaderAlreadyWritten);
        }
        let record = header_record(configuration)?;
        let mut buf = Vec::new();
        encode_header(&mut buf, &record)?;
        target.append_bytes(&buf)?;
        target.directory.set_header(record)
    }

    fn read_header(&self) -> Result<Header, StorageError> {
        self.target()?.directory.header()
    }

    fn write_data(&mut self, values: &[f64], dataset: &Dataset) -> Result<(), StorageError> {
        let target = self.target_mut()?;
        let path = dataset.path();
        if values.is_empty() {
            return Err(StorageError::EmptyWrite { dataset: path });
        }

        let existing = target.directory.get(dataset).map(|e| e.len);
        let offset = existing.unwrap_or(0);
        let mut buf = Vec::new();
        if existing.is_none() {
            encode_create(&mut buf, &path, values.len() as u64)?;
        }
        let values_pos = target.end + buf.len() as u64 + append_values_offset(&path);
        encode_append(&mut buf, &path, offset, values)?;
        target.append_bytes(&buf)?;

        if existing.is_none() {
            target.directory.create(&path, values.len() as u64)?;
            debug!(dataset = %path, record_len = values.len(), "created dataset");
        }
        target
            .directory
            .append(&path, offset, values.len() as u64, values_pos)
    }

    fn read_vector(&self, dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        let target = self.target()?;
        target.directory.read_vector(&target.file, dataset)
    }

    fn read_record(&self, index: usize, dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        let target = self.target()?;
        target.directory.read_record(&target.file, index, dataset)
    }

    fn read_vector_from(&self, path: &Path, dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        StorageReader::open(path)?.read_vector(dataset)
    }

    fn read_record_from(
        &self,
        path: &Path,
        index: usize,
        dataset: &Dataset,
    ) -> Result<Vec<f64>, StorageError> {
        StorageReader::open(path)?.read_record(index, dataset)
    }

    fn dataset_len(&self, dataset: &Dataset) -> Option<u64> {
        self.target
            .as_ref()
            .and_then(|t| t.directory.get(dataset))
            .map(|e| e.len)
    }

    fn datasets(&self) -> Vec<Dataset> {
        self.target
            .as_ref()
            .map(|t| t.directory.datasets())
            .unwrap_or_default()
    }

    fn close(&mut self) -> Result<(), StorageError> {
        if let Some(target) = self.target.take() {
            target.file.sync_all()?;
            debug!(path = %target.path.display(), bytes = target.end, "closed container");
        }
        Ok(())
    }
}
