use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("unknown or unsupported inventory version marker: {found:?}")]
    FormatDetection { found: String },

    #[error("invalid inventory header at line {line}: {reason}")]
    HeaderFormat { line: usize, reason: String },

    #[error("decompression failed: {0}")]
    Decompression(String),

    #[error("malformed record at line {line}: {reason}")]
    RecordParse { line: usize, reason: String },

    #[error("line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    #[error("cannot write {name:?} in this format: {reason}")]
    Unrepresentable { name: String, reason: String },

    #[error("invalid encode options: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type InventoryResult<T> = Result<T, InventoryError>;
