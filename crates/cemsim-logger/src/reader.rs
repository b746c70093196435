//! Read-only access to a `cemlog` file.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cemsim_core::{Dataset, Header, StorageError};

use crate::directory::Directory;

/// Opens a finished (or still growing) container for reading only.
///
/// The directory is built once on open; appends made by another handle
/// afterwards are not visible.
///
/// # Examples
///
/// ```no_run
/// use cemsim_core::Dataset;
/// use cemsim_logger::StorageReader;
///
/// let reader = StorageReader::open("fields.cem".as_ref())?;
/// let third_snapshot = reader.read_record(2, &Dataset::EField)?;
/// # Ok::<(), cemsim_core::StorageError>(())
/// ```
#[derive(Debug)]
pub struct StorageReader {
    path: PathBuf,
    file: File,
    directory: Directory,
}

pub(crate) fn open_existing(path: &Path, write: bool) -> Result<File, StorageError> {
    File::options()
        .read(true)
        .write(write)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => StorageError::Io(e),
        })
}

impl StorageReader {
    /// Open `path` and index its records.
    ///
    /// Fails with [`StorageError::FileNotFound`] if `path` does not exist,
    /// or a decode error if the container is malformed.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let file = open_existing(path, false)?;
        let (directory, _) = Directory::replay(&file)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            directory,
        })
    }

    /// Path this reader was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The header record.
    pub fn header(&self) -> Result<Header, StorageError> {
        self.directory.header()
    }

    /// Full content of `dataset`.
    pub fn read_vector(&self, dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        self.directory.read_vector(&self.file, dataset)
    }

    /// The `index`-th record of `dataset`.
    pub fn read_record(&self, index: usize, dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        self.directory.read_record(&self.file, index, dataset)
    }

    /// Logical length of `dataset`, or `None` if absent.
    pub fn dataset_len(&self, dataset: &Dataset) -> Option<u64> {
        self.directory.get(dataset).map(|e| e.len)
    }

    /// Number of complete records in `dataset`, or `None` if absent.
    pub fn record_count(&self, dataset: &Dataset) -> Option<u64> {
        self.directory.get(dataset).map(|e| e.records())
    }

    /// Datasets in creation order.
    pub fn datasets(&self) -> Vec<Dataset> {
        self.directory.datasets()
    }
}
