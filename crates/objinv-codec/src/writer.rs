use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use objinv_types::InventoryTable;
use tracing::debug;

use crate::config::EncodeOptions;
use crate::error::InventoryResult;
use crate::grammar;
use crate::header::Header;
use crate::version::FormatVersion;

/// Serializes inventory tables.
///
/// Entries are written grouped by object type, in table order; the writer
/// never sorts. Every record is formatted before anything reaches the sink,
/// so an unrepresentable entry leaves the sink untouched.
#[derive(Clone, Debug, Default)]
pub struct InventoryWriter {
    options: EncodeOptions,
}

impl InventoryWriter {
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Write `table` with the given project header to `sink`.
    pub fn write<W: Write>(
        &self,
        table: &InventoryTable,
        project: &str,
        project_version: &str,
        mut sink: W,
    ) -> InventoryResult<()> {
        self.options.validate()?;
        let body = self.format_records(table)?;

        let header = Header::new(self.options.format, project, project_version);
        header.write_to(&mut sink)?;

        match self.options.format {
            FormatVersion::V1 => sink.write_all(body.as_bytes())?,
            FormatVersion::V2 => {
                let level = Compression::new(self.options.compression_level);
                let mut encoder = ZlibEncoder::new(&mut sink, level);
                encoder.write_all(body.as_bytes())?;
                encoder.finish()?;
            }
        }
        sink.flush()?;

        debug!(
            format = %self.options.format,
            entries = table.len(),
            body_bytes = body.len(),
            "inventory encoded"
        );
        Ok(())
    }

    /// Encode into a fresh buffer.
    pub fn write_to_vec(
        &self,
        table: &InventoryTable,
        project: &str,
        project_version: &str,
    ) -> InventoryResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write(table, project, project_version, &mut out)?;
        Ok(out)
    }

    /// Encode to a file, replacing it if it exists.
    pub fn write_file(
        &self,
        table: &InventoryTable,
        project: &str,
        project_version: &str,
        path: &Path,
    ) -> InventoryResult<()> {
        let bytes = self.write_to_vec(table, project, project_version)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn format_records(&self, table: &InventoryTable) -> InventoryResult<String> {
        let mut body = String::new();
        for (object_type, name, entry) in table.iter() {
            let line = match self.options.format {
                FormatVersion::V1 => grammar::format_v1(object_type, name, entry)?,
                FormatVersion::V2 => {
                    grammar::format_v2(object_type, name, entry, self.options.shorten_uris)?
                }
            };
            body.push_str(&line);
            body.push('\n');
        }
        Ok(body)
    }
}

/// Encode `table` as a version 2 inventory with default options.
pub fn encode<W: Write>(
    table: &InventoryTable,
    project: &str,
    project_version: &str,
    sink: W,
) -> InventoryResult<()> {
    InventoryWriter::default().write(table, project, project_version, sink)
}
