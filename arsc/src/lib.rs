//! Decoder for Android compiled resource tables (`resources.arsc`).
//!
//! [`ResourceTable::decode`] validates a table chunk by chunk and borrows
//! string data from the input buffer. [`ResourceTable::resolve`] picks the
//! value of an entry that best matches a device [`ResourceConfig`], using the
//! same qualifier precedence as the platform.
pub mod chunk;
pub mod config;
pub mod error;
pub mod package;
pub mod reader;
pub mod resolve;
pub mod string_pool;
pub mod table;
pub mod types;

pub use crate::chunk::{decode_chunk_header, Chunk, ChunkHeader, ChunkType};
pub use crate::config::ResourceConfig;
pub use crate::error::{ArscError, NotFound, Result};
pub use crate::package::{LibraryEntry, Package, PackageHeader, TypeGroup};
pub use crate::resolve::{is_compatible, is_more_specific, select_best};
pub use crate::string_pool::{ResSpan, StringPool, StringPoolHeader};
pub use crate::table::{Ref, ResTableHeader, ResTableRef, Resolved, ResourceTable};
pub use crate::types::{
    EntryTable, ResTableEntry, ResTableMap, ResTableMapEntry, ResTableValue, ResValue,
    ResValueType, TypeChunk, TypeSpec,
};
