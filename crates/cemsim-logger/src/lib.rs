//! Append-only field storage for the cemsim field simulator.
//!
//! - [`BinaryLogger`] writes the `cemlog` container to a file
//! - [`MemoryLogger`] keeps everything in memory for dry runs
//! - [`StorageReader`] opens a container read-only
//! - [`create_logger`] selects a backend from `output.logger`
//!
//! # Format
//!
//! ```text
//! [MAGIC "CEML"] [VERSION u8]
//! [Record 1] [Record 2] ... [Record N]
//!
//! Record := TAG u8, payload
//!   1 HEADER : u32 n, n × (str key, str value), str configuration_toml
//!   2 CREATE : str dataset, u64 record_len
//!   3 APPEND : str dataset, u64 offset, u32 count, count × f64
//! ```
//!
//! Records are only ever appended. An append's `offset` is the dataset's
//! length before the append, so the log can be replayed to rebuild every
//! dataset's length and the file position of each of its values.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attributes;
pub mod binary;
pub mod codec;
pub mod directory;
pub mod factory;
pub mod memory;
pub mod reader;

pub use attributes::header_attributes;
pub use binary::BinaryLogger;
pub use factory::{create_logger, LoggerKind};
pub use memory::MemoryLogger;
pub use reader::StorageReader;

/// Magic bytes at the start of every container.
pub const MAGIC: [u8; 4] = *b"CEML";

/// Current container format version.
pub const FORMAT_VERSION: u8 = 1;
