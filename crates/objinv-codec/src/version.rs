use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InventoryResult;
use crate::grammar::{self, Record};

/// Inventory format version, chosen once from the first line of the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVersion {
    /// Plain-text records, no priorities or display names.
    V1,
    /// zlib-compressed records with priorities and display names.
    #[default]
    V2,
}

impl FormatVersion {
    /// The first line of a file in this format.
    pub fn marker(self) -> &'static str {
        match self {
            Self::V1 => "# Sphinx inventory version 1",
            Self::V2 => "# Sphinx inventory version 2",
        }
    }

    /// Detect the format from the first line, without its line terminator.
    pub fn from_marker(line: &str) -> Option<Self> {
        [Self::V1, Self::V2]
            .into_iter()
            .find(|v| v.marker() == line)
    }

    /// The version number written in the marker.
    pub fn number(self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }

    /// Returns `true` if the record section is zlib-compressed.
    pub fn is_compressed(self) -> bool {
        matches!(self, Self::V2)
    }

    /// Parse one record line with this version's grammar.
    ///
    /// `line_no` is only used for error reporting.
    pub fn parse_record(self, line: &str, line_no: usize) -> InventoryResult<Record> {
        match self {
            Self::V1 => grammar::parse_v1(line, line_no),
            Self::V2 => grammar::parse_v2(line, line_no),
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_roundtrip() {
        for v in [FormatVersion::V1, FormatVersion::V2] {
            assert_eq!(FormatVersion::from_marker(v.marker()), Some(v));
        }
    }

    #[test]
    fn unknown_markers() {
        assert!(FormatVersion::from_marker("# Sphinx inventory version 3").is_none());
        assert!(FormatVersion::from_marker("# sphinx inventory version 2").is_none());
        assert!(FormatVersion::from_marker("#  Sphinx inventory version 2").is_none());
        assert!(FormatVersion::from_marker("").is_none());
    }

    #[test]
    fn only_v2_is_compressed() {
        assert!(!FormatVersion::V1.is_compressed());
        assert!(FormatVersion::V2.is_compressed());
    }

    #[test]
    fn display() {
        assert_eq!(FormatVersion::V1.to_string(), "v1");
        assert_eq!(FormatVersion::V2.to_string(), "v2");
    }

    #[test]
    fn dispatches_to_grammar() {
        let rec = FormatVersion::V1.parse_record("module mod foo.html", 4).unwrap();
        assert_eq!(rec.object_type.as_str(), "py:module");
        let rec = FormatVersion::V2
            .parse_record("f py:function 1 a.html#$ -", 1)
            .unwrap();
        assert_eq!(rec.uri, "a.html#f");
    }
}
