//! In-memory logger for dry runs and tests.

use std::path::{Path, PathBuf};

use cemsim_core::{Configuration, DataLogger, Dataset, Header, StorageError};
use indexmap::IndexMap;
use tracing::debug;

use crate::attributes::header_attributes;

#[derive(Clone, Debug, Default)]
struct Series {
    record_len: usize,
    values: Vec<f64>,
}

/// Keeps every dataset in memory under the name of its target.
///
/// Follows the same append discipline and error semantics as
/// [`BinaryLogger`](crate::BinaryLogger), but nothing touches the disk:
/// `create_file` only names the target, and reads from any other path
/// report [`StorageError::FileNotFound`].
#[derive(Debug, Default)]
pub struct MemoryLogger {
    path: Option<PathBuf>,
    header: Option<Header>,
    series: IndexMap<String, Series>,
}

impl MemoryLogger {
    /// Discriminator for this backend.
    pub const KIND: &'static str = "memory";

    /// A logger with no open target.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_open(&self) -> Result<(), StorageError> {
        match self.path {
            Some(_) => Ok(()),
            None => Err(StorageError::NotOpen),
        }
    }

    fn series(&self, dataset: &Dataset) -> Result<&Series, StorageError> {
        self.series
            .get(&dataset.path())
            .ok_or_else(|| StorageError::DatasetNotFound {
                dataset: dataset.path(),
            })
    }

    fn check_same_target(&self, path: &Path) -> Result<(), StorageError> {
        match &self.path {
            Some(own) if own == path => Ok(()),
            _ => Err(StorageError::FileNotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl DataLogger for MemoryLogger {
    fn backend(&self) -> &str {
        Self::KIND
    }

    fn create_file(&mut self, path: &Path) -> Result<(), StorageError> {
        self.path = Some(path.to_path_buf());
        self.header = None;
        self.series.clear();
        debug!(path = %path.display(), "created in-memory target");
        Ok(())
    }

    fn write_header(&mut self, configuration: &Configuration) -> Result<(), StorageError> {
        self.check_open()?;
        if self.header.is_some() {
            return Err(StorageError::HeaderAlreadyWritten);
        }
        self.header = Some(Header {
            attributes: header_attributes(configuration),
            configuration: configuration.clone(),
        });
        Ok(())
    }

    fn read_header(&self) -> Result<Header, StorageError> {
        self.check_open()?;
        self.header.clone().ok_or(StorageError::HeaderMissing)
    }

    fn write_data(&mut self, values: &[f64], dataset: &Dataset) -> Result<(), StorageError> {
        self.check_open()?;
        let path = dataset.path();
        if values.is_empty() {
            return Err(StorageError::EmptyWrite { dataset: path });
        }
        let series = self.series.entry(path).or_insert_with_key(|path| {
            debug!(dataset = %path, record_len = values.len(), "created dataset");
            Series {
                record_len: values.len(),
                values: Vec::new(),
            }
        });
        series.values.extend_from_slice(values);
        Ok(())
    }

    fn read_vector(&self, dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        self.check_open()?;
        Ok(self.series(dataset)?.values.clone())
    }

    fn read_record(&self, index: usize, dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        self.check_open()?;
        let series = self.series(dataset)?;
        let available = series.values.len() / series.record_len;
        if index >= available {
            return Err(StorageError::RecordNotFound {
                dataset: dataset.path(),
                index,
                available,
            });
        }
        let start = index * series.record_len;
        Ok(series.values[start..start + series.record_len].to_vec())
    }

    fn read_vector_from(&self, path: &Path, dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        self.check_same_target(path)?;
        self.read_vector(dataset)
    }

    fn read_record_from(
        &self,
        path: &Path,
        index: usize,
        dataset: &Dataset,
    ) -> Result<Vec<f64>, StorageError> {
        self.check_same_target(path)?;
        self.read_record(index, dataset)
    }

    fn dataset_len(&self, dataset: &Dataset) -> Option<u64> {
        self.series
            .get(&dataset.path())
            .map(|s| s.values.len() as u64)
    }

    fn datasets(&self) -> Vec<Dataset> {
        self.series.keys().map(|p| Dataset::from_path(p)).collect()
    }

    fn close(&mut self) -> Result<(), StorageError> {
        self.path = None;
        self.header = None;
        self.series.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cemsim_test_utils::sample_config;

    fn open() -> MemoryLogger {
        let mut logger = MemoryLogger::new();
        logger.create_file(Path::new("dry-run.cem")).unwrap();
        logger
    }

    #[test]
    fn append_and_record_selection() {
        let mut logger = open();
        logger.write_data(&[1.0, 2.0], &Dataset::EField).unwrap();
        logger.write_data(&[3.0, 4.0], &Dataset::EField).unwrap();
        logger.write_data(&[5.0, 6.0], &Dataset::EField).unwrap();
        assert_eq!(logger.read_record(1, &Dataset::EField).unwrap(), vec![3.0, 4.0]);
        assert_eq!(logger.dataset_len(&Dataset::EField), Some(6));
        assert!(matches!(
            logger.read_record(3, &Dataset::EField),
            Err(StorageError::RecordNotFound { available: 3, .. })
        ));
    }

    #[test]
    fn header_carries_attributes() {
        let mut logger = open();
        logger.write_header(&sample_config()).unwrap();
        let header = logger.read_header().unwrap();
        assert_eq!(header.attributes["source"], "modulated_gaussian");
        assert_eq!(header.configuration, sample_config());
        assert!(logger.write_header(&sample_config()).is_err());
    }

    #[test]
    fn other_paths_are_not_found() {
        let mut logger = open();
        logger.write_data(&[1.0], &Dataset::EField).unwrap();
        assert_eq!(
            logger
                .read_vector_from(Path::new("dry-run.cem"), &Dataset::EField)
                .unwrap(),
            vec![1.0]
        );
        assert!(matches!(
            logger.read_vector_from(Path::new("elsewhere.cem"), &Dataset::EField),
            Err(StorageError::FileNotFound { .. })
        ));
    }

    #[test]
    fn create_file_resets_state() {
        let mut logger = open();
        logger.write_data(&[1.0], &Dataset::EField).unwrap();
        logger.create_file(Path::new("second.cem")).unwrap();
        assert!(logger.datasets().is_empty());
        assert!(matches!(
            logger.read_header(),
            Err(StorageError::HeaderMissing)
        ));
    }

    #[test]
    fn close_forgets_everything() {
        let mut logger = open();
        logger.write_header(&sample_config()).unwrap();
        logger.write_data(&[1.0, 2.0], &Dataset::EField).unwrap();
        logger.close().unwrap();
        assert_eq!(logger.dataset_len(&Dataset::EField), None);
        assert!(logger.datasets().is_empty());
        assert!(matches!(
            logger.read_vector(&Dataset::EField),
            Err(StorageError::NotOpen)
        ));
        assert!(matches!(logger.read_header(), Err(StorageError::NotOpen)));
    }
}
