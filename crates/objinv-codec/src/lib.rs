//! Reader and writer for object inventory files (`objects.inv`).
//!
//! An inventory starts with a version marker and a `Project`/`Version`
//! header, followed by one record per documented object: plain text in
//! version 1, a zlib stream in version 2.
//!
//! # Architecture
//!
//! - **grammar**: parse/format a single record line for each version
//! - **resolve**: join record locations onto a caller-supplied base
//! - **header**: the comment lines opening every file
//! - **InventoryReader**: header sniff, version dispatch, inflate, table assembly
//! - **InventoryWriter**: header, record formatting, deflate
//!
//! Decoding is all-or-nothing: the first malformed line aborts the call and
//! no table is returned.

pub mod config;
pub mod error;
pub mod grammar;
pub mod header;
pub mod reader;
pub mod resolve;
pub mod version;
pub mod writer;

pub use config::EncodeOptions;
pub use error::{InventoryError, InventoryResult};
pub use grammar::Record;
pub use header::Header;
pub use reader::{decode, decode_with_header, DecodedInventory, InventoryReader};
pub use resolve::{PathJoin, PosixJoin, Resolver, UrlJoin};
pub use version::FormatVersion;
pub use writer::{encode, InventoryWriter};

pub use objinv_types::{Entry, InventoryTable, ObjectType};
