//! Bounds-checked little-endian reads.
//!
//! The free functions are the only place that knows about byte order. The
//! [`Region`] and [`Reader`] types build on them so that every decoder works on
//! a window of the input buffer and reports absolute offsets in its errors.
use crate::error::{ArscError, Result};
use byteorder::{ByteOrder, LittleEndian};

fn bytes_at(buf: &[u8], offset: usize, width: usize) -> Result<&[u8]> {
    match offset.checked_add(width) {
        Some(end) if end <= buf.len() => Ok(&buf[offset..end]),
        _ => Err(ArscError::TruncatedData {
            offset,
            needed: width,
            end: buf.len(),
        }),
    }
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<(u8, usize)> {
    let bytes = bytes_at(buf, offset, 1)?;
    Ok((bytes[0], offset + 1))
}

pub fn read_u16(buf: &[u8], offset: usize) -> Result<(u16, usize)> {
    let bytes = bytes_at(buf, offset, 2)?;
    Ok((LittleEndian::read_u16(bytes), offset + 2))
}

pub fn read_u32(buf: &[u8], offset: usize) -> Result<(u32, usize)> {
    let bytes = bytes_at(buf, offset, 4)?;
    Ok((LittleEndian::read_u32(bytes), offset + 4))
}

pub fn read_u64(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
    let bytes = bytes_at(buf, offset, 8)?;
    Ok((LittleEndian::read_u64(bytes), offset + 8))
}

/// A window `[start, end)` of the input buffer.
///
/// Relative offsets passed to the accessors are measured from `start`. Nothing
/// past `end` is reachable through a region, so a nested decoder can never read
/// into a sibling chunk.
#[derive(Clone, Copy, Debug)]
pub struct Region<'a> {
    /// Input buffer cut off at the end of the region.
    buf: &'a [u8],
    start: usize,
}

impl<'a> Region<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, start: 0 }
    }

    /// Absolute offset of the first byte.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Absolute offset one past the last byte.
    pub fn end(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.buf.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        &self.buf[self.start..]
    }

    pub fn absolute(&self, rel: usize) -> usize {
        self.start.saturating_add(rel)
    }

    /// Whether `len` bytes at `rel` lie inside the region.
    pub fn contains(&self, rel: usize, len: usize) -> bool {
        rel.checked_add(len).map_or(false, |end| end <= self.len())
    }

    pub fn sub(&self, rel: usize, len: usize) -> Result<Region<'a>> {
        let bytes = self.bytes(rel, len)?;
        let start = self.absolute(rel);
        Ok(Region {
            buf: &self.buf[..start + bytes.len()],
            start,
        })
    }

    /// The region from `rel` to the end.
    pub fn tail(&self, rel: usize) -> Result<Region<'a>> {
        let len = self.len().checked_sub(rel).ok_or(ArscError::TruncatedData {
            offset: self.absolute(rel),
            needed: 0,
            end: self.end(),
        })?;
        self.sub(rel, len)
    }

    pub fn bytes(&self, rel: usize, len: usize) -> Result<&'a [u8]> {
        bytes_at(self.buf, self.absolute(rel), len)
    }

    pub fn read_u8(&self, rel: usize) -> Result<u8> {
        read_u8(self.buf, self.absolute(rel)).map(|(v, _)| v)
    }

    pub fn read_u16(&self, rel: usize) -> Result<u16> {
        read_u16(self.buf, self.absolute(rel)).map(|(v, _)| v)
    }

    pub fn read_u32(&self, rel: usize) -> Result<u32> {
        read_u32(self.buf, self.absolute(rel)).map(|(v, _)| v)
    }

    pub fn read_u64(&self, rel: usize) -> Result<u64> {
        read_u64(self.buf, self.absolute(rel)).map(|(v, _)| v)
    }

    pub fn reader(&self, rel: usize) -> Reader<'a> {
        Reader {
            region: *self,
            pos: rel,
        }
    }
}

/// Sequential reads over a [`Region`].
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    region: Region<'a>,
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Position relative to the start of the region.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn absolute_position(&self) -> usize {
        self.region.absolute(self.pos)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let v = self.region.read_u8(self.pos)?;
        self.pos += 1;
        Ok(v)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let v = self.region.read_u16(self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let v = self.region.read_u32(self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let v = self.region.read_u64(self.pos)?;
        self.pos += 8;
        Ok(v)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self.region.bytes(self.pos, len)?;
        self.pos += len;
        Ok(bytes)
    }
}
