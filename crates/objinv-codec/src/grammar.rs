//! Single-record grammar for both inventory versions.
//!
//! Version 1: `name type location`, where `type` is either a `domain:role`
//! pair or one of the bare Python roles written by the legacy format. Legacy
//! records carry no anchor, so one is derived from the name.
//!
//! Version 2: `name domain:role priority uri display name`. The name may
//! contain spaces: it ends at the first token that is followed by a
//! `domain:role` token and an integer priority. The display name is the rest
//! of the line, spaces included. A trailing `$` in the uri stands for the
//! object name.

use objinv_types::{Entry, ObjectType, LEGACY_PRIORITY, NO_DISPLAY_NAME};

use crate::error::{InventoryError, InventoryResult};

/// Bare version 1 types and the object types they denote.
const LEGACY_TYPES: &[(&str, &str)] = &[
    ("mod", "py:module"),
    ("class", "py:class"),
    ("function", "py:function"),
    ("method", "py:method"),
    ("classmethod", "py:classmethod"),
    ("staticmethod", "py:staticmethod"),
    ("attribute", "py:attribute"),
    ("exception", "py:exception"),
    ("data", "py:data"),
];

/// Anchor prefix the legacy format implied for modules.
const MODULE_ANCHOR: &str = "#module-";

/// Placeholder for the object name at the end of a version 2 uri.
const NAME_PLACEHOLDER: char = '$';

/// One parsed inventory line, before its uri is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub object_type: ObjectType,
    pub priority: i64,
    /// Location relative to the inventory base, placeholder already expanded.
    pub uri: String,
    pub display_name: String,
}

impl Record {
    /// Build the table entry for this record.
    ///
    /// The project fields come from the file header; `uri` is the resolved
    /// location.
    pub fn into_entry(
        self,
        project_name: &str,
        project_version: &str,
        uri: String,
    ) -> (ObjectType, String, Entry) {
        let entry = Entry {
            project_name: project_name.to_string(),
            project_version: project_version.to_string(),
            uri,
            display_name: self.display_name,
            priority: self.priority,
        };
        (self.object_type, self.name, entry)
    }
}

/// Byte spans of the whitespace-separated tokens of `line`.
fn token_spans(line: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, line.len()));
    }
    spans
}

/// Priority token that did not parse.
#[derive(Debug, PartialEq, Eq)]
enum PriorityError {
    NotInteger,
    OutOfRange,
}

/// Parse `-?[0-9]+` into an `i64`.
fn parse_priority(token: &str) -> Result<i64, PriorityError> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PriorityError::NotInteger);
    }
    token.parse().map_err(|_| PriorityError::OutOfRange)
}

fn legacy_type(token: &str) -> Option<&'static str> {
    LEGACY_TYPES
        .iter()
        .find(|(bare, _)| *bare == token)
        .map(|(_, full)| *full)
}

fn legacy_token(object_type: &ObjectType) -> Option<&'static str> {
    LEGACY_TYPES
        .iter()
        .find(|(_, full)| *full == object_type.as_str())
        .map(|(bare, _)| *bare)
}

/// Parse a version 1 record line.
pub fn parse_v1(line: &str, line_no: usize) -> InventoryResult<Record> {
    let line = line.trim();
    let spans = token_spans(line);
    if spans.len() < 3 {
        return Err(InventoryError::RecordParse {
            line: line_no,
            reason: format!("expected 3 fields, found {}", spans.len()),
        });
    }
    let name = &line[spans[0].0..spans[0].1];
    let type_token = &line[spans[1].0..spans[1].1];
    let location = &line[spans[2].0..];

    let (object_type, uri) = match legacy_type(type_token) {
        Some(full) => {
            let anchor = if type_token == "mod" {
                format!("{MODULE_ANCHOR}{name}")
            } else {
                format!("#{name}")
            };
            (full, format!("{location}{anchor}"))
        }
        None if type_token.contains(':') => (type_token, location.to_string()),
        None => {
            return Err(InventoryError::RecordParse {
                line: line_no,
                reason: format!("unknown version 1 object type {type_token:?}"),
            });
        }
    };
    let object_type = ObjectType::parse(object_type).map_err(|e| InventoryError::RecordParse {
        line: line_no,
        reason: e.to_string(),
    })?;

    Ok(Record {
        name: name.to_string(),
        object_type,
        priority: LEGACY_PRIORITY,
        uri,
        display_name: NO_DISPLAY_NAME.to_string(),
    })
}

/// Parse a version 2 record line (already decompressed).
pub fn parse_v2(line: &str, line_no: usize) -> InventoryResult<Record> {
    let line = line.trim();
    let spans = token_spans(line);
    if spans.len() < 5 {
        return Err(InventoryError::RecordParse {
            line: line_no,
            reason: format!("expected 5 fields, found {}", spans.len()),
        });
    }
    let token = |i: usize| &line[spans[i].0..spans[i].1];

    let mut reason = String::from("no `domain:role` field followed by an integer priority");
    let mut bad_priority = false;
    for i in 0..spans.len() - 4 {
        let Ok(object_type) = ObjectType::parse(token(i + 1)) else {
            continue;
        };
        let priority = match parse_priority(token(i + 2)) {
            Ok(priority) => priority,
            Err(err) => {
                if !bad_priority {
                    reason = match err {
                        PriorityError::NotInteger => {
                            format!("priority {:?} is not an integer", token(i + 2))
                        }
                        PriorityError::OutOfRange => {
                            format!("priority {:?} is out of range", token(i + 2))
                        }
                    };
                    bad_priority = true;
                }
                continue;
            }
        };

        let name = &line[..spans[i].1];
        let mut uri = token(i + 3).to_string();
        if uri.ends_with(NAME_PLACEHOLDER) {
            uri.pop();
            uri.push_str(name);
        }
        return Ok(Record {
            name: name.to_string(),
            object_type,
            priority,
            uri,
            display_name: line[spans[i + 4].0..].to_string(),
        });
    }

    Err(InventoryError::RecordParse {
        line: line_no,
        reason,
    })
}

fn check_name(name: &str) -> InventoryResult<()> {
    if name.is_empty() || name.contains(['\n', '\r']) {
        return Err(InventoryError::Unrepresentable {
            name: name.to_string(),
            reason: "object names must be non-empty and on one line".into(),
        });
    }
    Ok(())
}

fn check_uri(name: &str, uri: &str) -> InventoryResult<()> {
    if uri.is_empty() || uri.contains(char::is_whitespace) {
        return Err(InventoryError::Unrepresentable {
            name: name.to_string(),
            reason: format!("uri {uri:?} must be non-empty and contain no whitespace"),
        });
    }
    Ok(())
}

/// The version 1 location is the last field, so it may hold inner spaces but
/// not the edges the reader trims.
fn check_location(name: &str, uri: &str) -> InventoryResult<()> {
    if uri.is_empty() || uri.trim() != uri || uri.contains(['\n', '\r']) {
        return Err(InventoryError::Unrepresentable {
            name: name.to_string(),
            reason: format!("uri {uri:?} must be non-empty, on one line and not padded"),
        });
    }
    Ok(())
}

/// Format one table entry as a version 2 line, without the newline.
///
/// With `shorten`, a uri ending in the object name is written with the `$`
/// placeholder instead. An empty display name is written as `-`.
pub fn format_v2(
    object_type: &ObjectType,
    name: &str,
    entry: &Entry,
    shorten: bool,
) -> InventoryResult<String> {
    check_name(name)?;
    check_uri(name, &entry.uri)?;

    // A uri ending in `$` would be expanded on read, so it can only be
    // written through the placeholder.
    let uri = match entry.uri.strip_suffix(name) {
        Some(prefix) if shorten || entry.uri.ends_with(NAME_PLACEHOLDER) => {
            format!("{prefix}{NAME_PLACEHOLDER}")
        }
        _ if entry.uri.ends_with(NAME_PLACEHOLDER) => {
            return Err(InventoryError::Unrepresentable {
                name: name.to_string(),
                reason: format!("uri {:?} ends with the name placeholder", entry.uri),
            });
        }
        _ => entry.uri.clone(),
    };

    let display = entry.display_name.trim();
    if display.contains(['\n', '\r']) {
        return Err(InventoryError::Unrepresentable {
            name: name.to_string(),
            reason: "display name spans several lines".into(),
        });
    }
    let display = if display.is_empty() {
        NO_DISPLAY_NAME
    } else {
        display
    };

    Ok(format!(
        "{name} {object_type} {priority} {uri} {display}",
        priority = entry.priority
    ))
}

/// Format one table entry as a version 1 line, without the newline.
///
/// Python objects whose uri carries the anchor the legacy format implies are
/// written with their bare type and the anchor dropped; everything else keeps
/// its `domain:role` and full uri.
pub fn format_v1(object_type: &ObjectType, name: &str, entry: &Entry) -> InventoryResult<String> {
    check_name(name)?;
    if name.contains(char::is_whitespace) {
        return Err(InventoryError::Unrepresentable {
            name: name.to_string(),
            reason: "version 1 names cannot contain whitespace".into(),
        });
    }
    check_location(name, &entry.uri)?;

    if let Some(bare) = legacy_token(object_type) {
        let anchor = if bare == "mod" {
            format!("{MODULE_ANCHOR}{name}")
        } else {
            format!("#{name}")
        };
        if let Some(location) = entry.uri.strip_suffix(anchor.as_str()) {
            if !location.is_empty() && location.trim_end() == location {
                return Ok(format!("{name} {bare} {location}"));
            }
        }
    }
    Ok(format!("{name} {object_type} {}", entry.uri))
}
