use crate::error::{ArscError, Result};
use crate::reader::Region;
use byteorder::{ByteOrder, LittleEndian};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u16)]
pub enum ChunkType {
    Null = 0x0000,
    StringPool = 0x0001,
    Table = 0x0002,
    Xml = 0x0003,
    XmlStartNamespace = 0x0100,
    XmlEndNamespace = 0x0101,
    XmlStartElement = 0x0102,
    XmlEndElement = 0x0103,
    XmlCdata = 0x0104,
    XmlResourceMap = 0x0180,
    TablePackage = 0x0200,
    TableType = 0x0201,
    TableTypeSpec = 0x0202,
    TableLibrary = 0x0203,
    TableOverlayable = 0x0204,
    TableOverlayablePolicy = 0x0205,
    TableStagedAlias = 0x0206,
}

impl ChunkType {
    pub fn from_u16(ty: u16) -> Option<Self> {
        Some(match ty {
            ty if ty == ChunkType::Null as u16 => ChunkType::Null,
            ty if ty == ChunkType::StringPool as u16 => ChunkType::StringPool,
            ty if ty == ChunkType::Table as u16 => ChunkType::Table,
            ty if ty == ChunkType::Xml as u16 => ChunkType::Xml,
            ty if ty == ChunkType::XmlStartNamespace as u16 => ChunkType::XmlStartNamespace,
            ty if ty == ChunkType::XmlEndNamespace as u16 => ChunkType::XmlEndNamespace,
            ty if ty == ChunkType::XmlStartElement as u16 => ChunkType::XmlStartElement,
            ty if ty == ChunkType::XmlEndElement as u16 => ChunkType::XmlEndElement,
            ty if ty == ChunkType::XmlCdata as u16 => ChunkType::XmlCdata,
            ty if ty == ChunkType::XmlResourceMap as u16 => ChunkType::XmlResourceMap,
            ty if ty == ChunkType::TablePackage as u16 => ChunkType::TablePackage,
            ty if ty == ChunkType::TableType as u16 => ChunkType::TableType,
            ty if ty == ChunkType::TableTypeSpec as u16 => ChunkType::TableTypeSpec,
            ty if ty == ChunkType::TableLibrary as u16 => ChunkType::TableLibrary,
            ty if ty == ChunkType::TableOverlayable as u16 => ChunkType::TableOverlayable,
            ty if ty == ChunkType::TableOverlayablePolicy as u16 => {
                ChunkType::TableOverlayablePolicy
            }
            ty if ty == ChunkType::TableStagedAlias as u16 => ChunkType::TableStagedAlias,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::StringPool => "string pool",
            Self::Table => "table",
            Self::Xml => "xml",
            Self::XmlStartNamespace => "xml start namespace",
            Self::XmlEndNamespace => "xml end namespace",
            Self::XmlStartElement => "xml start element",
            Self::XmlEndElement => "xml end element",
            Self::XmlCdata => "xml cdata",
            Self::XmlResourceMap => "xml resource map",
            Self::TablePackage => "table package",
            Self::TableType => "table type",
            Self::TableTypeSpec => "table type spec",
            Self::TableLibrary => "table library",
            Self::TableOverlayable => "table overlayable",
            Self::TableOverlayablePolicy => "table overlayable policy",
            Self::TableStagedAlias => "table staged alias",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ChunkHeader {
    /// Type identifier for this chunk. The meaning of this value depends
    /// on the containing chunk.
    pub ty: u16,
    /// Size of the chunk header (in bytes). Adding this value to the address
    /// of the chunk allows you to find its associated data (if any).
    pub header_size: u16,
    /// Total size of this chunk (in bytes). This is the header_size plus the
    /// size of any data associated with the chunk. Adding this value to the
    /// chunk allows you to completely skip its contents (including any child
    /// chunks). If this value is the same as header_size, there is no data
    /// associated with the chunk.
    pub size: u32,
}

impl ChunkHeader {
    pub const SIZE: usize = 8;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0; Self::SIZE];
        LittleEndian::write_u16(&mut buf[0..2], self.ty);
        LittleEndian::write_u16(&mut buf[2..4], self.header_size);
        LittleEndian::write_u32(&mut buf[4..8], self.size);
        buf
    }
}

/// Decodes the chunk header at `offset` and bounds the chunk to `buf`.
pub fn decode_chunk_header(buf: &[u8], offset: usize) -> Result<Chunk<'_>> {
    Chunk::read(Region::new(buf), offset)
}

/// A validated chunk header together with the region `[offset, offset + size)`.
#[derive(Clone, Copy, Debug)]
pub struct Chunk<'a> {
    pub header: ChunkHeader,
    region: Region<'a>,
}

impl<'a> Chunk<'a> {
    /// Reads the chunk starting at `rel` inside `parent`.
    pub fn read(parent: Region<'a>, rel: usize) -> Result<Self> {
        let offset = parent.absolute(rel);
        if !parent.contains(rel, ChunkHeader::SIZE) {
            return Err(ArscError::TruncatedData {
                offset,
                needed: ChunkHeader::SIZE,
                end: parent.end(),
            });
        }
        let mut r = parent.reader(rel);
        let ty = r.read_u16()?;
        let header_size = r.read_u16()?;
        let size = r.read_u32()?;
        let header = ChunkHeader {
            ty,
            header_size,
            size,
        };
        if (header_size as usize) < ChunkHeader::SIZE {
            return Err(ArscError::MalformedChunk {
                chunk_type: ty,
                offset,
                reason: format!("header size {header_size} is smaller than a chunk header"),
            });
        }
        if size < header_size as u32 {
            return Err(ArscError::MalformedChunk {
                chunk_type: ty,
                offset,
                reason: format!("size {size} is smaller than header size {header_size}"),
            });
        }
        if !parent.contains(rel, size as usize) {
            return Err(ArscError::TruncatedData {
                offset,
                needed: size as usize,
                end: parent.end(),
            });
        }
        let region = parent.sub(rel, size as usize)?;
        Ok(Self { header, region })
    }

    pub fn ty(&self) -> Option<ChunkType> {
        ChunkType::from_u16(self.header.ty)
    }

    /// Absolute offset of the chunk header.
    pub fn offset(&self) -> usize {
        self.region.start()
    }

    pub fn header_size(&self) -> usize {
        self.header.header_size as usize
    }

    /// The whole chunk, header included.
    pub fn region(&self) -> Region<'a> {
        self.region
    }

    /// Fails with `UnsupportedChunkType` unless the tag is `ty`.
    pub fn expect(&self, ty: ChunkType) -> Result<()> {
        if self.header.ty != ty as u16 {
            return Err(self.unsupported(ty.name()));
        }
        Ok(())
    }

    pub fn unsupported(&self, expected: &'static str) -> ArscError {
        ArscError::UnsupportedChunkType {
            offset: self.offset(),
            found: self.header.ty,
            expected,
        }
    }

    /// Fails with `MalformedChunk` when the header is too short for its type.
    pub fn require_header_size(&self, min: usize) -> Result<()> {
        if self.header_size() < min {
            return Err(ArscError::MalformedChunk {
                chunk_type: self.header.ty,
                offset: self.offset(),
                reason: format!(
                    "header size {} is smaller than the minimum of {min}",
                    self.header_size()
                ),
            });
        }
        Ok(())
    }

    /// Iterates the chunks nested after the header.
    pub fn children(&self) -> ChunkIter<'a> {
        ChunkIter::new(self.region, self.header_size())
    }
}

/// Sibling chunks laid out back to back inside a region.
///
/// Stops after the first error.
#[derive(Clone, Debug)]
pub struct ChunkIter<'a> {
    region: Region<'a>,
    pos: usize,
    failed: bool,
}

impl<'a> ChunkIter<'a> {
    pub fn new(region: Region<'a>, pos: usize) -> Self {
        Self {
            region,
            pos,
            failed: false,
        }
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.region.len() {
            return None;
        }
        match Chunk::read(self.region, self.pos) {
            Ok(chunk) => {
                self.pos += chunk.header.size as usize;
                Some(Ok(chunk))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
