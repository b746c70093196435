//! Binary encode/decode for the `cemlog` container.
//!
//! All integers and floats are little-endian. Strings are length-prefixed
//! with a `u32` length. A file is a preamble followed by tagged records;
//! nothing is ever rewritten in place.

use std::io::{ErrorKind, Read, Write};

use cemsim_core::StorageError;
use indexmap::IndexMap;

use crate::{FORMAT_VERSION, MAGIC};

/// Tag of the one-time header record.
pub const TAG_HEADER: u8 = 1;
/// Tag of a dataset-creation record.
pub const TAG_CREATE: u8 = 2;
/// Tag of an append record.
pub const TAG_APPEND: u8 = 3;

/// Size of the magic bytes plus the version byte.
pub const PREAMBLE_LEN: u64 = 5;

// ── Primitives ──────────────────────────────────────────────────

/// Fixed-width values stored little-endian.
pub trait LeCodec: Sized {
    /// Write `self` to `w`.
    fn put(self, w: &mut dyn Write) -> Result<(), StorageError>;
    /// Read one value from `r`.
    fn get(r: &mut dyn Read) -> Result<Self, StorageError>;
}

macro_rules! le_codec {
    ($($ty:ty),*) => {$(
        impl LeCodec for $ty {
            fn put(self, w: &mut dyn Write) -> Result<(), StorageError> {
                w.write_all(&self.to_le_bytes())?;
                Ok(())
            }

            fn get(r: &mut dyn Read) -> Result<Self, StorageError> {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                r.read_exact(&mut buf)?;
                Ok(<$ty>::from_le_bytes(buf))
            }
        }
    )*};
}

le_codec!(u8, u32, u64, f64);

/// Write a string as a `u32` byte length followed by its UTF-8 bytes.
pub fn put_str(w: &mut dyn Write, s: &str) -> Result<(), StorageError> {
    let len = u32::try_from(s.len()).map_err(|_| StorageError::MalformedRecord {
        detail: format!("string of {} bytes exceeds the u32 length prefix", s.len()),
    })?;
    len.put(w)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// Read a string written by [`put_str`].
pub fn get_str(r: &mut dyn Read) -> Result<String, StorageError> {
    let mut bytes = vec![0u8; u32::get(r)? as usize];
    r.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| StorageError::MalformedRecord {
        detail: format!("dataset or attribute name is not UTF-8: {e}"),
    })
}

/// Write `values` back to back as one buffer.
pub fn put_f64s(w: &mut dyn Write, values: &[f64]) -> Result<(), StorageError> {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    w.write_all(&bytes)?;
    Ok(())
}

/// Read `count` values written by [`put_f64s`].
pub fn get_f64s(r: &mut dyn Read, count: usize) -> Result<Vec<f64>, StorageError> {
    let mut bytes = vec![0u8; count * 8];
    r.read_exact(&mut bytes)?;
    Ok(bytes
        .chunks_exact(8)
        .map(|c| {
            let mut word = [0u8; 8];
            word.copy_from_slice(c);
            f64::from_le_bytes(word)
        })
        .collect())
}

// ── Preamble ────────────────────────────────────────────────────

/// Encode the container preamble (magic, version).
pub fn encode_preamble(w: &mut dyn Write) -> Result<(), StorageError> {
    w.write_all(&MAGIC)?;
    FORMAT_VERSION.put(w)
}

/// Decode and validate the container preamble.
pub fn decode_preamble(r: &mut dyn Read) -> Result<(), StorageError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => StorageError::InvalidMagic,
        _ => StorageError::Io(e),
    })?;
    if magic != MAGIC {
        return Err(StorageError::InvalidMagic);
    }
    let version = u8::get(r)?;
    if version != FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion { found: version });
    }
    Ok(())
}

// ── Records ─────────────────────────────────────────────────────

/// The one-time header record as stored: flat attributes plus the
/// configuration serialized as TOML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderRecord {
    /// Key/value attributes in write order.
    pub attributes: IndexMap<String, String>,
    /// The full run configuration, as TOML text.
    pub configuration_toml: String,
}

/// A decoded record, with an append's values elided.
///
/// Directory replay only needs to know where an append's values sit,
/// not the values themselves.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordHead {
    /// TAG 1.
    Header(HeaderRecord),
    /// TAG 2.
    Create {
        /// Dataset storage path.
        dataset: String,
        /// Number of values per record.
        record_len: u64,
    },
    /// TAG 3. The reader is left positioned at the first value.
    Append {
        /// Dataset storage path.
        dataset: String,
        /// Logical offset the values were appended at.
        offset: u64,
        /// Number of values that follow.
        count: u32,
    },
}

/// Encode a header record.
pub fn encode_header(w: &mut dyn Write, header: &HeaderRecord) -> Result<(), StorageError> {
    TAG_HEADER.put(w)?;
    (header.attributes.len() as u32).put(w)?;
    for (key, value) in &header.attributes {
        put_str(w, key)?;
        put_str(w, value)?;
    }
    put_str(w, &header.configuration_toml)
}

/// Encode a dataset-creation record.
pub fn encode_create(w: &mut dyn Write, dataset: &str, record_len: u64) -> Result<(), StorageError> {
    TAG_CREATE.put(w)?;
    put_str(w, dataset)?;
    record_len.put(w)
}

/// Encode an append record.
pub fn encode_append(
    w: &mut dyn Write,
    dataset: &str,
    offset: u64,
    values: &[f64],
) -> Result<(), StorageError> {
    let count = u32::try_from(values.len()).map_err(|_| StorageError::MalformedRecord {
        detail: format!("append of {} values exceeds the u32 count", values.len()),
    })?;
    TAG_APPEND.put(w)?;
    put_str(w, dataset)?;
    offset.put(w)?;
    count.put(w)?;
    put_f64s(w, values)
}

/// Byte distance from the start of an append record to its first value.
pub fn append_values_offset(dataset: &str) -> u64 {
    // tag + str length + str bytes + offset + count
    1 + 4 + dataset.len() as u64 + 8 + 4
}

fn truncated(e: StorageError, what: &str) -> StorageError {
    match e {
        StorageError::Io(io) if io.kind() == ErrorKind::UnexpectedEof => {
            StorageError::MalformedRecord {
                detail: format!("truncated {what} record"),
            }
        }
        other => other,
    }
}

/// Decode the next record, stopping before an append's values.
///
/// Returns `Ok(None)` on clean EOF (no bytes before the tag), or an error
/// on a truncated or unknown record.
pub fn decode_record_head(r: &mut dyn Read) -> Result<Option<RecordHead>, StorageError> {
    let mut tag = [0u8; 1];
    loop {
        match r.read(&mut tag) {
            Ok(0) => return Ok(None),
            Ok(_) => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(StorageError::Io(e)),
        }
    }

    match tag[0] {
        TAG_HEADER => decode_header_body(r)
            .map(|h| Some(RecordHead::Header(h)))
            .map_err(|e| truncated(e, "header")),
        TAG_CREATE => decode_create_body(r)
            .map(Some)
            .map_err(|e| truncated(e, "create")),
        TAG_APPEND => decode_append_body(r)
            .map(Some)
            .map_err(|e| truncated(e, "append")),
        other => Err(StorageError::MalformedRecord {
            detail: format!("unknown record tag {other}"),
        }),
    }
}

fn decode_header_body(r: &mut dyn Read) -> Result<HeaderRecord, StorageError> {
    let n = u32::get(r)?;
    let mut attributes = IndexMap::new();
    for _ in 0..n {
        let key = get_str(r)?;
        attributes.insert(key, get_str(r)?);
    }
    let configuration_toml = get_str(r)?;
    Ok(HeaderRecord {
        attributes,
        configuration_toml,
    })
}

fn decode_create_body(r: &mut dyn Read) -> Result<RecordHead, StorageError> {
    let dataset = get_str(r)?;
    let record_len = u64::get(r)?;
    Ok(RecordHead::Create {
        dataset,
        record_len,
    })
}

fn decode_append_body(r: &mut dyn Read) -> Result<RecordHead, StorageError> {
    let dataset = get_str(r)?;
    let offset = u64::get(r)?;
    let count = u32::get(r)?;
    Ok(RecordHead::Append {
        dataset,
        offset,
        count,
    })
}

/// Read the values of an append whose head was just decoded.
pub fn decode_append_values(r: &mut dyn Read, count: u32) -> Result<Vec<f64>, StorageError> {
    get_f64s(r, count as usize).map_err(|e| truncated(e, "append"))
}
