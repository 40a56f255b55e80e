use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, InventoryResult};
use crate::version::FormatVersion;

/// Highest zlib compression level.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Settings for [`InventoryWriter`](crate::InventoryWriter).
///
/// Output depends only on these options and the table contents, so two
/// writers with equal options produce identical bytes for identical input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Format version to write.
    pub format: FormatVersion,
    /// zlib level (0-9) for the v2 record section.
    pub compression_level: u32,
    /// Write uris ending in the object name with the `$` placeholder (v2).
    pub shorten_uris: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            format: FormatVersion::V2,
            compression_level: MAX_COMPRESSION_LEVEL,
            shorten_uris: true,
        }
    }
}

impl EncodeOptions {
    /// Load options from TOML; missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> InventoryResult<Self> {
        let options: Self =
            toml::from_str(input).map_err(|e| InventoryError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> InventoryResult<()> {
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(InventoryError::Config(format!(
                "compression_level must be at most {MAX_COMPRESSION_LEVEL}, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }
}
