use crate::chunk::{Chunk, ChunkType};
use crate::error::{ArscError, Result};
use crate::reader::Region;
use byteorder::{ByteOrder, LittleEndian};
use std::borrow::Cow;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StringPoolHeader {
    pub string_count: u32,
    pub style_count: u32,
    pub flags: u32,
    /// Offset from the chunk start to the string data.
    pub strings_start: u32,
    /// Offset from the chunk start to the style data.
    pub styles_start: u32,
}

impl StringPoolHeader {
    pub const SORTED_FLAG: u32 = 1 << 0;
    pub const UTF8_FLAG: u32 = 1 << 8;
    /// Header size including the chunk header.
    pub const SIZE: usize = 28;

    pub fn is_utf8(&self) -> bool {
        self.flags & Self::UTF8_FLAG > 0
    }

    pub fn is_sorted(&self) -> bool {
        self.flags & Self::SORTED_FLAG > 0
    }
}

/// A styled run inside a string, referring to the tag name by pool index.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResSpan {
    pub name: u32,
    pub first_char: u32,
    pub last_char: u32,
}

impl ResSpan {
    /// Terminates the span list of a style.
    pub const END: u32 = 0xffff_ffff;
}

/// An indexed table of strings backed by the input buffer.
///
/// Offsets are validated when the pool is decoded. Strings are decoded on
/// access, UTF-8 strings without copying.
#[derive(Clone, Copy, Debug)]
pub struct StringPool<'a> {
    pub header: StringPoolHeader,
    string_index: Region<'a>,
    style_index: Region<'a>,
    strings: Region<'a>,
    styles: Region<'a>,
}

impl<'a> StringPool<'a> {
    /// Decodes the string pool chunk at the start of `region`.
    pub fn decode(region: Region<'a>) -> Result<Self> {
        let chunk = Chunk::read(region, 0)?;
        chunk.expect(ChunkType::StringPool)?;
        chunk.require_header_size(StringPoolHeader::SIZE)?;
        let region = chunk.region();
        let offset = chunk.offset();

        let mut r = region.reader(8);
        let header = StringPoolHeader {
            string_count: r.read_u32()?,
            style_count: r.read_u32()?,
            flags: r.read_u32()?,
            strings_start: r.read_u32()?,
            styles_start: r.read_u32()?,
        };

        let index_len = |count: u32| {
            (count as usize)
                .checked_mul(4)
                .ok_or_else(|| ArscError::malformed_string(offset, "index table overflows"))
        };
        let string_index = region.sub(chunk.header_size(), index_len(header.string_count)?)?;
        let style_index = region.sub(
            chunk.header_size() + string_index.len(),
            index_len(header.style_count)?,
        )?;

        let data_end = region.len();
        let block = |start: u32, end: usize, what: &str| -> Result<Region<'a>> {
            let start = start as usize;
            if start < chunk.header_size() || start > end {
                return Err(ArscError::malformed_string(
                    offset,
                    format!("{what} start {start:#x} lies outside the chunk"),
                ));
            }
            region.sub(start, end - start)
        };
        let styles = if header.style_count > 0 {
            block(header.styles_start, data_end, "styles")?
        } else {
            region.sub(data_end, 0)?
        };
        let strings = if header.string_count > 0 {
            let end = if header.style_count > 0 {
                header.styles_start as usize
            } else {
                data_end
            };
            block(header.strings_start, end, "strings")?
        } else {
            region.sub(data_end, 0)?
        };

        let pool = Self {
            header,
            string_index,
            style_index,
            strings,
            styles,
        };
        for i in 0..header.string_count {
            let start = pool.string_index.read_u32(i as usize * 4)? as usize;
            if start >= pool.strings.len() {
                return Err(ArscError::malformed_string(
                    pool.string_index.absolute(i as usize * 4),
                    format!("string #{i} starts past the string data"),
                ));
            }
        }
        for i in 0..header.style_count {
            let start = pool.style_index.read_u32(i as usize * 4)? as usize;
            if start >= pool.styles.len() {
                return Err(ArscError::malformed_string(
                    pool.style_index.absolute(i as usize * 4),
                    format!("style #{i} starts past the style data"),
                ));
            }
        }
        Ok(pool)
    }

    pub fn len(&self) -> u32 {
        self.header.string_count
    }

    pub fn is_empty(&self) -> bool {
        self.header.string_count == 0
    }

    pub fn style_count(&self) -> u32 {
        self.header.style_count
    }

    /// Decodes the string at `index`.
    pub fn get(&self, index: u32) -> Result<Cow<'a, str>> {
        if index >= self.header.string_count {
            return Err(ArscError::StringIndexOutOfRange {
                index,
                count: self.header.string_count,
            });
        }
        let start = self.string_index.read_u32(index as usize * 4)? as usize;
        if self.header.is_utf8() {
            decode_utf8(self.strings, start).map(Cow::Borrowed)
        } else {
            decode_utf16(self.strings, start).map(Cow::Owned)
        }
    }

    pub fn strings(&self) -> impl Iterator<Item = Result<Cow<'a, str>>> + '_ {
        (0..self.header.string_count).map(move |i| self.get(i))
    }

    /// Index of the first string equal to `needle`.
    pub fn position(&self, needle: &str) -> Result<Option<u32>> {
        for i in 0..self.header.string_count {
            if self.get(i)? == needle {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Span records of the style at `index`, which styles the string with the
    /// same index.
    pub fn style(&self, index: u32) -> Result<Vec<ResSpan>> {
        if index >= self.header.style_count {
            return Err(ArscError::StringIndexOutOfRange {
                index,
                count: self.header.style_count,
            });
        }
        let start = self.style_index.read_u32(index as usize * 4)? as usize;
        let mut r = self.styles.reader(start);
        let mut spans = vec![];
        loop {
            let at = r.absolute_position();
            let truncated = |_| ArscError::malformed_string(at, "unterminated style span list");
            let name = r.read_u32().map_err(truncated)?;
            if name == ResSpan::END {
                break;
            }
            let first_char = r.read_u32().map_err(truncated)?;
            let last_char = r.read_u32().map_err(truncated)?;
            spans.push(ResSpan {
                name,
                first_char,
                last_char,
            });
        }
        Ok(spans)
    }
}

/// Lengths below 0x80 take one byte. Longer ones set the high bit and
/// continue into a second byte.
fn utf8_length(data: Region<'_>, pos: usize) -> Result<(usize, usize)> {
    let first = data.read_u8(pos)? as usize;
    if first & 0x80 == 0 {
        return Ok((first, 1));
    }
    let second = data.read_u8(pos + 1)? as usize;
    Ok((((first & 0x7f) << 8) | second, 2))
}

/// Lengths below 0x8000 take one unit. Longer ones set the high bit and
/// continue into a second unit.
fn utf16_length(data: Region<'_>, pos: usize) -> Result<(usize, usize)> {
    let first = data.read_u16(pos)? as usize;
    if first & 0x8000 == 0 {
        return Ok((first, 2));
    }
    let second = data.read_u16(pos + 2)? as usize;
    Ok((((first & 0x7fff) << 16) | second, 4))
}

fn decode_utf8(data: Region<'_>, start: usize) -> Result<&str> {
    let offset = data.absolute(start);
    let malformed = |reason: &str| ArscError::malformed_string(offset, reason);
    // The character count comes first, the byte count second.
    let (_chars, n) = utf8_length(data, start).map_err(|_| malformed("truncated length"))?;
    let (len, m) = utf8_length(data, start + n).map_err(|_| malformed("truncated length"))?;
    let pos = start + n + m;
    let bytes = data
        .bytes(pos, len)
        .map_err(|_| malformed("string runs past the string data"))?;
    if data.read_u8(pos + len).ok() != Some(0) {
        return Err(malformed("string is not NUL terminated"));
    }
    std::str::from_utf8(bytes).map_err(|err| malformed(&format!("invalid UTF-8: {err}")))
}

fn decode_utf16(data: Region<'_>, start: usize) -> Result<String> {
    let offset = data.absolute(start);
    let malformed = |reason: &str| ArscError::malformed_string(offset, reason);
    let (len, n) = utf16_length(data, start).map_err(|_| malformed("truncated length"))?;
    let pos = start + n;
    let byte_len = len
        .checked_mul(2)
        .ok_or_else(|| malformed("length overflows"))?;
    let bytes = data
        .bytes(pos, byte_len)
        .map_err(|_| malformed("string runs past the string data"))?;
    if data.read_u16(pos + byte_len).ok() != Some(0) {
        return Err(malformed("string is not NUL terminated"));
    }
    let units = bytes
        .chunks_exact(2)
        .map(LittleEndian::read_u16)
        .collect::<Vec<_>>();
    String::from_utf16(&units).map_err(|err| malformed(&format!("invalid UTF-16: {err}")))
}
