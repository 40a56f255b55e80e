use serde::{Deserialize, Serialize};

/// Display name meaning "no distinct label, show the object name".
pub const NO_DISPLAY_NAME: &str = "-";

/// Priority given to version 1 records, which carry none.
pub const LEGACY_PRIORITY: i64 = 1;

/// Location and label of one documented object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Project that documents the object.
    pub project_name: String,
    /// Project version; empty when unspecified.
    pub project_version: String,
    /// Resolved link target.
    pub uri: String,
    /// Human-readable label, or [`NO_DISPLAY_NAME`].
    pub display_name: String,
    /// Ranking hint, opaque to the codec.
    pub priority: i64,
}

impl Entry {
    pub fn new(
        project_name: impl Into<String>,
        project_version: impl Into<String>,
        uri: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            project_version: project_version.into(),
            uri: uri.into(),
            display_name: display_name.into(),
            priority: LEGACY_PRIORITY,
        }
    }

    /// Replace the priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// The `(project_name, project_version, uri, display_name)` view.
    pub fn as_tuple(&self) -> (&str, &str, &str, &str) {
        (
            &self.project_name,
            &self.project_version,
            &self.uri,
            &self.display_name,
        )
    }

    /// Returns `true` if the entry carries a label of its own.
    pub fn has_display_name(&self) -> bool {
        !self.display_name.is_empty() && self.display_name != NO_DISPLAY_NAME
    }

    /// The label to show for `name`, falling back to the name itself.
    pub fn label<'a>(&'a self, name: &'a str) -> &'a str {
        if self.has_display_name() {
            &self.display_name
        } else {
            name
        }
    }
}
