//! In-memory index over a `cemlog` file.
//!
//! The directory maps each dataset path to its record length, logical
//! length and the file extents holding its values. It is rebuilt by
//! replaying the record log on open and kept current on every append, so
//! any sub-range read is a handful of seeks.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};

use cemsim_core::{Configuration, Dataset, Header, StorageError};
use indexmap::IndexMap;

use crate::codec::{decode_preamble, decode_record_head, HeaderRecord, RecordHead, PREAMBLE_LEN};

/// A run of consecutive values stored contiguously in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    /// Logical index of the first value in the dataset.
    pub start: u64,
    /// Number of values.
    pub count: u64,
    /// Byte position of the first value in the file.
    pub file_pos: u64,
}

/// Directory entry for one dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetEntry {
    /// Values per record, fixed by the first write.
    pub record_len: u64,
    /// Logical length: total values appended.
    pub len: u64,
    /// Extents in logical order.
    pub extents: Vec<Extent>,
}

impl DatasetEntry {
    /// Number of complete records.
    pub fn records(&self) -> u64 {
        if self.record_len == 0 {
            0
        } else {
            self.len / self.record_len
        }
    }
}

/// Index of the header and every dataset in one container.
#[derive(Clone, Debug, Default)]
pub struct Directory {
    header: Option<HeaderRecord>,
    datasets: IndexMap<String, DatasetEntry>,
}

impl Directory {
    /// Replay the record log of `file` and return the directory together
    /// with the byte position just past the last record.
    pub fn replay(file: &File) -> Result<(Self, u64), StorageError> {
        let file_len = file.metadata()?.len();
        let mut r = BufReader::new(file);
        r.seek(SeekFrom::Start(0))?;
        decode_preamble(&mut r)?;

        let mut dir = Directory::default();
        let mut pos = PREAMBLE_LEN;
        while let Some(head) = decode_record_head(&mut r)? {
            match head {
                RecordHead::Header(h) => {
                    if dir.header.is_some() {
                        return Err(StorageError::MalformedRecord {
                            detail: format!("second header record at byte {pos}"),
                        });
                    }
                    dir.header = Some(h);
                }
                RecordHead::Create {
                    dataset,
                    record_len,
                } => dir.create(&dataset, record_len)?,
                RecordHead::Append {
                    dataset,
                    offset,
                    count,
                } => {
                    let file_pos = r.stream_position()?;
                    let bytes = u64::from(count) * 8;
                    if file_pos + bytes > file_len {
                        return Err(StorageError::MalformedRecord {
                            detail: format!("truncated append record for {dataset}"),
                        });
                    }
                    dir.append(&dataset, offset, u64::from(count), file_pos)?;
                    r.seek_relative(bytes as i64)?;
                }
            }
            pos = r.stream_position()?;
        }
        Ok((dir, pos))
    }

    /// The raw header record, if one was written.
    pub fn header_record(&self) -> Option<&HeaderRecord> {
        self.header.as_ref()
    }

    /// Record that the header has been written.
    pub fn set_header(&mut self, header: HeaderRecord) -> Result<(), StorageError> {
        if self.header.is_some() {
            return Err(StorageError::HeaderAlreadyWritten);
        }
        self.header = Some(header);
        Ok(())
    }

    /// The header, with its configuration parsed back from TOML.
    pub fn header(&self) -> Result<Header, StorageError> {
        let record = self.header.as_ref().ok_or(StorageError::HeaderMissing)?;
        let configuration = Configuration::parse(&record.configuration_toml).map_err(|e| {
            StorageError::MalformedRecord {
                detail: format!("stored configuration does not parse: {e}"),
            }
        })?;
        Ok(Header {
            attributes: record.attributes.clone(),
            configuration,
        })
    }

    /// Entry for `dataset`, if it exists.
    pub fn get(&self, dataset: &Dataset) -> Option<&DatasetEntry> {
        self.datasets.get(&dataset.path())
    }

    /// Dataset paths in creation order.
    pub fn datasets(&self) -> Vec<Dataset> {
        self.datasets.keys().map(|p| Dataset::from_path(p)).collect()
    }

    /// Register a new dataset.
    pub fn create(&mut self, path: &str, record_len: u64) -> Result<(), StorageError> {
        if record_len == 0 {
            return Err(StorageError::MalformedRecord {
                detail: format!("dataset {path} created with zero record length"),
            });
        }
        if self.datasets.contains_key(path) {
            return Err(StorageError::MalformedRecord {
                detail: format!("dataset {path} created twice"),
            });
        }
        self.datasets.insert(
            path.to_string(),
            DatasetEntry {
                record_len,
                ..DatasetEntry::default()
            },
        );
        Ok(())
    }

    /// Register `count` values appended at logical `offset`, stored from
    /// byte `file_pos`. `offset` must equal the current length.
    pub fn append(
        &mut self,
        path: &str,
        offset: u64,
        count: u64,
        file_pos: u64,
    ) -> Result<(), StorageError> {
        let entry = self
            .datasets
            .get_mut(path)
            .ok_or_else(|| StorageError::MalformedRecord {
                detail: format!("append to dataset {path} before its create record"),
            })?;
        if offset != entry.len {
            return Err(StorageError::MalformedRecord {
                detail: format!(
                    "append to {path} at offset {offset}, but its length is {}",
                    entry.len
                ),
            });
        }
        entry.extents.push(Extent {
            start: offset,
            count,
            file_pos,
        });
        entry.len += count;
        Ok(())
    }

    /// Read `count` values of `dataset` starting at logical index `start`.
    ///
    /// The caller guarantees the range lies within the dataset.
    pub fn read_range(
        &self,
        file: &File,
        entry: &DatasetEntry,
        start: u64,
        count: u64,
    ) -> Result<Vec<f64>, StorageError> {
        let end = start + count;
        let mut out = Vec::with_capacity(count as usize);
        let mut reader = file;
        // Extents are sorted by `start`; skip straight to the first overlap.
        let first = entry
            .extents
            .partition_point(|x| x.start + x.count <= start);
        for extent in &entry.extents[first..] {
            if extent.start >= end {
                break;
            }
            let lo = start.max(extent.start);
            let hi = end.min(extent.start + extent.count);
            reader.seek(SeekFrom::Start(extent.file_pos + (lo - extent.start) * 8))?;
            let mut bytes = vec![0u8; ((hi - lo) * 8) as usize];
            reader.read_exact(&mut bytes)?;
            out.extend(
                bytes
                    .chunks_exact(8)
                    .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])),
            );
        }
        Ok(out)
    }

    /// Full content of `dataset`.
    pub fn read_vector(&self, file: &File, dataset: &Dataset) -> Result<Vec<f64>, StorageError> {
        let entry = self.get(dataset).ok_or_else(|| StorageError::DatasetNotFound {
            dataset: dataset.path(),
        })?;
        self.read_range(file, entry, 0, entry.len)
    }

    /// The `index`-th record of `dataset`.
    pub fn read_record(
        &self,
        file: &File,
        index: usize,
        dataset: &Dataset,
    ) -> Result<Vec<f64>, StorageError> {
        let entry = self.get(dataset).ok_or_else(|| StorageError::DatasetNotFound {
            dataset: dataset.path(),
        })?;
        let available = entry.records();
        if index as u64 >= available {
            return Err(StorageError::RecordNotFound {
                dataset: dataset.path(),
                index,
                available: available as usize,
            });
        }
        self.read_range(
            file,
            entry,
            index as u64 * entry.record_len,
            entry.record_len,
        )
    }
}
