use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::{Decompress, FlushDecompress, Status};
use objinv_types::InventoryTable;
use tracing::debug;

use crate::error::{InventoryError, InventoryResult};
use crate::header::{self, Header, PROJECT_PREFIX, VERSION_PREFIX};
use crate::resolve::{PathJoin, Resolver};
use crate::version::FormatVersion;

/// A decoded inventory together with its header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInventory {
    pub header: Header,
    pub table: InventoryTable,
}

/// Decodes inventory files, resolving every location against one base.
pub struct InventoryReader<'a, J> {
    resolver: Resolver<'a, J>,
}

impl<'a, J: PathJoin> InventoryReader<'a, J> {
    /// Create a reader resolving locations with `join(base, location)`.
    pub fn new(base: &'a str, join: J) -> Self {
        Self {
            resolver: Resolver::new(base, join),
        }
    }

    /// Decode a whole inventory from `source`.
    pub fn read<R: Read>(&self, source: R) -> InventoryResult<DecodedInventory> {
        let mut source = BufReader::new(source);

        let marker = match read_line(&mut source, 1) {
            Err(InventoryError::InvalidUtf8 { .. }) => {
                return Err(InventoryError::FormatDetection {
                    found: "<binary data>".into(),
                })
            }
            other => other?.unwrap_or_default(),
        };
        let format = FormatVersion::from_marker(&marker)
            .ok_or(InventoryError::FormatDetection { found: marker })?;

        let project = header_line(&mut source, PROJECT_PREFIX, 2)?;
        let project_version = header_line(&mut source, VERSION_PREFIX, 3)?;
        let header = Header::new(format, project, project_version);
        debug!(%format, project = %header.project, version = %header.project_version, "inventory header");

        let mut rest = Vec::new();
        let first_record_line = match format {
            FormatVersion::V1 => {
                source.read_to_end(&mut rest)?;
                4
            }
            FormatVersion::V2 => {
                let notice = read_line(&mut source, 4)?.ok_or_else(|| {
                    InventoryError::HeaderFormat {
                        line: 4,
                        reason: "missing compression notice".into(),
                    }
                })?;
                header::check_compression_notice(&notice, 4)?;
                let mut compressed = Vec::new();
                source.read_to_end(&mut compressed)?;
                rest = inflate(&compressed)?;
                1
            }
        };

        let table = self.parse_records(&header, &rest, first_record_line)?;
        debug!(entries = table.len(), types = table.type_count(), "inventory decoded");
        Ok(DecodedInventory { header, table })
    }

    /// Decode an inventory held in memory.
    pub fn read_bytes(&self, data: &[u8]) -> InventoryResult<DecodedInventory> {
        self.read(data)
    }

    /// Decode an inventory file from disk.
    pub fn open(&self, path: &Path) -> InventoryResult<DecodedInventory> {
        let file = std::fs::File::open(path)?;
        self.read(file)
    }

    fn parse_records(
        &self,
        header: &Header,
        body: &[u8],
        first_line: usize,
    ) -> InventoryResult<InventoryTable> {
        let mut table = InventoryTable::new();
        for (offset, raw) in body.split(|&b| b == b'\n').enumerate() {
            let line_no = first_line + offset;
            let line = std::str::from_utf8(raw)
                .map_err(|_| InventoryError::InvalidUtf8 { line: line_no })?;
            if line.trim().is_empty() {
                continue;
            }
            let record = header.format.parse_record(line, line_no)?;
            let uri = self.resolver.resolve(&record.uri);
            let (object_type, name, entry) =
                record.into_entry(&header.project, &header.project_version, uri);
            table.insert(object_type, name, entry);
        }
        Ok(table)
    }
}

/// Decode an inventory, returning only its table.
pub fn decode<R: Read, J: PathJoin>(
    source: R,
    base: &str,
    join: J,
) -> InventoryResult<InventoryTable> {
    Ok(decode_with_header(source, base, join)?.table)
}

/// Decode an inventory, returning its header and table.
pub fn decode_with_header<R: Read, J: PathJoin>(
    source: R,
    base: &str,
    join: J,
) -> InventoryResult<DecodedInventory> {
    InventoryReader::new(base, join).read(source)
}

/// Read one line without its `\n` or `\r\n` terminator. `None` at end of
/// input.
fn read_line<R: BufRead>(source: &mut R, line_no: usize) -> InventoryResult<Option<String>> {
    let mut buf = Vec::new();
    if source.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    let line = String::from_utf8(buf).map_err(|_| InventoryError::InvalidUtf8 { line: line_no })?;
    Ok(Some(line))
}

fn header_line<R: BufRead>(source: &mut R, prefix: &str, line_no: usize) -> InventoryResult<String> {
    let line = read_line(source, line_no)?.ok_or_else(|| InventoryError::HeaderFormat {
        line: line_no,
        reason: format!("missing {prefix:?} line"),
    })?;
    header::parse_field(line.trim_end(), prefix, line_no)
}

/// Inflate a complete zlib stream. Bytes after the end of the stream are
/// ignored; an empty input inflates to nothing.
fn inflate(data: &[u8]) -> InventoryResult<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let mut decoder = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4).max(1024));
    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }
        let before_in = decoder.total_in();
        let before_out = decoder.total_out();
        let input = &data[before_in as usize..];
        let status = decoder
            .decompress_vec(input, &mut out, FlushDecompress::None)
            .map_err(|e| InventoryError::Decompression(e.to_string()))?;
        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                let stalled =
                    decoder.total_in() == before_in && decoder.total_out() == before_out;
                if stalled && out.len() < out.capacity() {
                    return Err(InventoryError::Decompression(
                        "truncated zlib stream".into(),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::PosixJoin;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn v2(records: &[u8]) -> Vec<u8> {
        let mut data = b"# Sphinx inventory version 2\n\
# Project: foo\n\
# Version: 2.0\n\
# The remainder of this file is compressed with zlib.\n"
            .to_vec();
        data.extend(zlib(records));
        data
    }

    #[test]
    fn inflate_roundtrip() {
        let payload = b"line one\nline two\n".repeat(500);
        assert_eq!(inflate(&zlib(&payload)).unwrap(), payload);
    }

    #[test]
    fn inflate_truncated() {
        let compressed = zlib(&b"some records\n".repeat(200));
        let err = inflate(&compressed[..compressed.len() / 2]).unwrap_err();
        assert!(matches!(err, InventoryError::Decompression(_)));
    }

    #[test]
    fn inflate_garbage() {
        let err = inflate(b"definitely not zlib").unwrap_err();
        assert!(matches!(err, InventoryError::Decompression(_)));
    }

    #[test]
    fn empty_input_is_format_error() {
        let err = decode(&b""[..], "/util", PosixJoin).unwrap_err();
        assert!(matches!(err, InventoryError::FormatDetection { .. }));
    }

    #[test]
    fn binary_input_is_format_error() {
        let err = decode(&b"\x89PNG\r\n\x1a\n\xff\xfe"[..], "", PosixJoin).unwrap_err();
        assert!(matches!(err, InventoryError::FormatDetection { .. }));
    }

    #[test]
    fn unknown_version_marker() {
        let data = b"# Sphinx inventory version 3\n# Project: foo\n# Version: 1\n";
        match decode(&data[..], "/util", PosixJoin).unwrap_err() {
            InventoryError::FormatDetection { found } => {
                assert_eq!(found, "# Sphinx inventory version 3")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn crlf_marker_is_accepted() {
        let data = b"# Sphinx inventory version 1\r\n# Project: foo\r\n# Version: 1.0\r\nmodule mod foo.html\r\n";
        let table = decode(&data[..], "/util", PosixJoin).unwrap();
        assert_eq!(
            table.get("py:module", "module").unwrap().uri,
            "/util/foo.html#module-module"
        );
    }

    #[test]
    fn padded_marker_is_rejected() {
        let data = b"# Sphinx inventory version 1  \n# Project: foo\n# Version: 1.0\n";
        match decode(&data[..], "", PosixJoin).unwrap_err() {
            InventoryError::FormatDetection { found } => {
                assert_eq!(found, "# Sphinx inventory version 1  ")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_project_line() {
        let data = b"# Sphinx inventory version 1\n";
        let err = decode(&data[..], "/util", PosixJoin).unwrap_err();
        assert!(matches!(err, InventoryError::HeaderFormat { line: 2, .. }));
    }

    #[test]
    fn version_line_without_hash() {
        let data = b"# Sphinx inventory version 1\n# Project: foo\nVersion: 1.0\n";
        let err = decode(&data[..], "/util", PosixJoin).unwrap_err();
        assert!(matches!(err, InventoryError::HeaderFormat { line: 3, .. }));
    }

    #[test]
    fn v2_missing_compression_notice() {
        let data = b"# Sphinx inventory version 2\n# Project: foo\n# Version: 2.0\n";
        let err = decode(&data[..], "/util", PosixJoin).unwrap_err();
        assert!(matches!(err, InventoryError::HeaderFormat { line: 4, .. }));
    }

    #[test]
    fn v2_corrupt_stream() {
        let mut data = v2(b"module1 py:module 0 foo.html#module-module1 -\n");
        let len = data.len();
        data.truncate(len - 6);
        let err = decode(&data[..], "/util", PosixJoin).unwrap_err();
        assert!(matches!(err, InventoryError::Decompression(_)));
    }

    #[test]
    fn v2_empty_body() {
        let mut data = v2(b"");
        let decoded = decode_with_header(&data[..], "/util", PosixJoin).unwrap();
        assert!(decoded.table.is_empty());

        // No zlib stream at all.
        let header_len = data.len() - zlib(b"").len();
        data.truncate(header_len);
        assert!(decode(&data[..], "/util", PosixJoin).unwrap().is_empty());
    }

    #[test]
    fn v2_record_error_reports_stream_line() {
        let data = v2(b"ok py:module 0 a.html -\n\nbroken line\n");
        match decode(&data[..], "/util", PosixJoin).unwrap_err() {
            InventoryError::RecordParse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn v1_record_error_reports_file_line() {
        let data = b"# Sphinx inventory version 1\n# Project: foo\n# Version: 1.0\nmodule mod foo.html\nbad\n";
        match decode(&data[..], "/util", PosixJoin).unwrap_err() {
            InventoryError::RecordParse { line, .. } => assert_eq!(line, 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_utf8_record() {
        let data = v2(b"caf\xe9 py:module 0 a.html -\n");
        let err = decode(&data[..], "/util", PosixJoin).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidUtf8 { line: 1 }));
    }

    #[test]
    fn duplicate_key_last_wins() {
        let data = v2(b"m py:module 0 first.html -\nm py:module 0 second.html -\n");
        let table = decode(&data[..], "", PosixJoin).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("py:module", "m").unwrap().uri, "second.html");
    }

    #[test]
    fn header_is_returned() {
        let data = v2(b"");
        let decoded = decode_with_header(&data[..], "/util", PosixJoin).unwrap();
        assert_eq!(decoded.header, Header::new(FormatVersion::V2, "foo", "2.0"));
    }

    #[test]
    fn open_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("objects.inv");
        std::fs::write(&path, v2(b"m py:module 0 a.html -\n")).unwrap();

        let decoded = InventoryReader::new("https://docs.example.org", PosixJoin)
            .open(&path)
            .unwrap();
        assert_eq!(
            decoded.table.get("py:module", "m").unwrap().uri,
            "https://docs.example.org/a.html"
        );
    }
}
