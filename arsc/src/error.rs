use thiserror::Error;

/// Errors produced while decoding or querying a resource table.
///
/// Offsets are absolute positions in the buffer handed to the decoder.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ArscError {
    /// A read or a declared size reaches past the end of the available bytes.
    #[error("truncated data: {needed} bytes at {offset:#x} run past the end at {end:#x}")]
    TruncatedData {
        offset: usize,
        needed: usize,
        end: usize,
    },

    /// Header size and total size of a chunk are inconsistent.
    #[error("malformed chunk {chunk_type:#06x} at {offset:#x}: {reason}")]
    MalformedChunk {
        chunk_type: u16,
        offset: usize,
        reason: String,
    },

    #[error("malformed string at {offset:#x}: {reason}")]
    MalformedString { offset: usize, reason: String },

    #[error("string index {index} out of range for a pool of {count} strings")]
    StringIndexOutOfRange { index: u32, count: u32 },

    #[error("malformed config at {offset:#x}: {reason}")]
    MalformedConfig { offset: usize, reason: String },

    #[error("malformed package at {offset:#x}: {reason}")]
    MalformedPackage { offset: usize, reason: String },

    /// Ordering or offset violations inside a type spec or type chunk.
    #[error("malformed type at {offset:#x}: {reason}")]
    MalformedType { offset: usize, reason: String },

    /// A chunk tag that is unknown or not allowed where it was found.
    #[error("unsupported chunk type {found:#06x} at {offset:#x}, expected {expected}")]
    UnsupportedChunkType {
        offset: usize,
        found: u16,
        expected: &'static str,
    },

    /// A textual reference not of the form `@[package:]type/name`.
    #[error("invalid resource reference {0:?}")]
    InvalidReference(String),

    #[error(transparent)]
    NotFound(#[from] NotFound),
}

/// Outcomes of a lookup that had nothing to return.
///
/// These are expected results of resolution rather than signs of a corrupt
/// table, see [`ArscError::is_not_found`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum NotFound {
    #[error("no package with id {0:#04x}")]
    Package(u8),

    #[error("no type {type_id:#04x} in package {package_id:#04x}")]
    Type { package_id: u8, type_id: u8 },

    #[error("no entry {entry:#06x} of type {type_id:#04x} in package {package_id:#04x}")]
    Entry {
        package_id: u8,
        type_id: u8,
        entry: u16,
    },

    #[error(
        "no configuration of entry {entry:#06x} of type {type_id:#04x} in package \
         {package_id:#04x} is compatible with the requested one"
    )]
    NoCompatibleConfig {
        package_id: u8,
        type_id: u8,
        entry: u16,
    },

    #[error("no resource named {0}")]
    Name(String),
}

impl ArscError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub(crate) fn malformed_string(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedString {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_config(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedConfig {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_package(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedPackage {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_type(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedType {
            offset,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = ArscError> = std::result::Result<T, E>;
