//! Header attributes derived from a configuration.

use cemsim_core::{Configuration, StorageError};
use indexmap::IndexMap;

use crate::codec::HeaderRecord;

/// Flat attributes stored alongside the configuration in every header.
pub fn header_attributes(config: &Configuration) -> IndexMap<String, String> {
    let mut attrs = IndexMap::new();
    attrs.insert("cemsim_version".to_string(), env!("CARGO_PKG_VERSION").to_string());
    attrs.insert("start_time".to_string(), config.start_time.to_string());
    attrs.insert("stop_time".to_string(), config.stop_time.to_string());
    attrs.insert("grid_size".to_string(), config.engine.grid_size.to_string());
    attrs.insert("engine".to_string(), config.engine.kind.clone());
    attrs.insert("source".to_string(), config.source.kind.clone());
    attrs
}

/// Build the header record for `config`.
pub(crate) fn header_record(config: &Configuration) -> Result<HeaderRecord, StorageError> {
    let configuration_toml = config.to_toml().map_err(|e| StorageError::MalformedRecord {
        detail: format!("configuration does not serialize: {e}"),
    })?;
    Ok(HeaderRecord {
        attributes: header_attributes(config),
        configuration_toml,
    })
}
