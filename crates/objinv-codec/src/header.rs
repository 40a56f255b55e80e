//! The comment lines that open every inventory file.

use std::io::Write;

use serde::Serialize;

use crate::error::{InventoryError, InventoryResult};
use crate::version::FormatVersion;

pub const PROJECT_PREFIX: &str = "# Project:";
pub const VERSION_PREFIX: &str = "# Version:";

/// Fourth header line of a version 2 file.
pub const COMPRESSION_NOTICE: &str = "# The remainder of this file is compressed using zlib.";

/// Decoded header of an inventory file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Header {
    pub format: FormatVersion,
    pub project: String,
    /// Empty when the file does not name a version.
    pub project_version: String,
}

impl Header {
    pub fn new(
        format: FormatVersion,
        project: impl Into<String>,
        project_version: impl Into<String>,
    ) -> Self {
        Self {
            format,
            project: project.into(),
            project_version: project_version.into(),
        }
    }

    /// Write the header lines, including the compression notice for v2.
    ///
    /// Whitespace runs in the project name and version are collapsed so each
    /// stays on its own line, and their ends are trimmed as the reader does.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", self.format.marker())?;
        writeln!(out, "{PROJECT_PREFIX} {}", escape(&self.project))?;
        writeln!(out, "{VERSION_PREFIX} {}", escape(&self.project_version))?;
        if self.format.is_compressed() {
            writeln!(out, "{COMPRESSION_NOTICE}")?;
        }
        Ok(())
    }
}

/// Trim `value` and collapse every inner run of whitespace into one space.
pub fn escape(value: &str) -> String {
    let value = value.trim();
    let mut out = String::with_capacity(value.len());
    let mut in_space = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Value of a `# Project:` / `# Version:` line.
///
/// `line` is already right-trimmed; one space after the prefix is dropped.
pub(crate) fn parse_field(line: &str, prefix: &str, line_no: usize) -> InventoryResult<String> {
    let rest = line
        .strip_prefix(prefix)
        .ok_or_else(|| InventoryError::HeaderFormat {
            line: line_no,
            reason: format!("expected {prefix:?}, found {line:?}"),
        })?;
    Ok(rest.strip_prefix(' ').unwrap_or(rest).to_string())
}

/// Check the v2 compression notice.
pub(crate) fn check_compression_notice(line: &str, line_no: usize) -> InventoryResult<()> {
    if !line.starts_with('#') || !line.contains("zlib") {
        return Err(InventoryError::HeaderFormat {
            line: line_no,
            reason: format!("invalid inventory header (not compressed): {line:?}"),
        });
    }
    Ok(())
}
