use crate::chunk::{Chunk, ChunkType};
use crate::config::ResourceConfig;
use crate::error::{ArscError, Result};
use crate::reader::Region;
use std::num::NonZeroU8;

/// Per-entry flags of one resource type, shared by all of its configurations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeSpec {
    pub id: NonZeroU8,
    pub res0: u8,
    /// Number of type chunks for this id, zero when the writer did not count.
    pub types_count: u16,
    /// One word per entry: `CONFIG_*` bits of the axes that vary, plus the
    /// `SPEC_*` bits.
    pub flags: Vec<u32>,
}

impl TypeSpec {
    pub const HEADER_SIZE: usize = 16;
    pub const SPEC_PUBLIC: u32 = 0x4000_0000;
    pub const SPEC_STAGED_API: u32 = 0x2000_0000;

    /// Decodes the type spec chunk at the start of `region`.
    pub fn decode(region: Region<'_>) -> Result<Self> {
        let chunk = Chunk::read(region, 0)?;
        chunk.expect(ChunkType::TableTypeSpec)?;
        chunk.require_header_size(Self::HEADER_SIZE)?;
        let region = chunk.region();
        let mut r = region.reader(8);
        let id = r.read_u8()?;
        let res0 = r.read_u8()?;
        let types_count = r.read_u16()?;
        let entry_count = r.read_u32()?;
        let id = NonZeroU8::new(id)
            .ok_or_else(|| ArscError::malformed_type(chunk.offset(), "type id 0 is invalid"))?;
        let len = (entry_count as usize).checked_mul(4).ok_or_else(|| {
            ArscError::malformed_type(chunk.offset(), "entry count overflows")
        })?;
        let words = region.sub(chunk.header_size(), len)?;
        let mut flags = Vec::with_capacity(entry_count as usize);
        let mut r = words.reader(0);
        for _ in 0..entry_count {
            flags.push(r.read_u32()?);
        }
        Ok(Self {
            id,
            res0,
            types_count,
            flags,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.flags.len()
    }

    /// `CONFIG_*` axes along which the entry varies.
    pub fn config_mask(&self, entry: u16) -> Option<u32> {
        self.flags
            .get(entry as usize)
            .map(|f| f & !(Self::SPEC_PUBLIC | Self::SPEC_STAGED_API))
    }

    pub fn is_public(&self, entry: u16) -> bool {
        self.flags
            .get(entry as usize)
            .map_or(false, |f| f & Self::SPEC_PUBLIC != 0)
    }

    pub fn is_staged_api(&self, entry: u16) -> bool {
        self.flags
            .get(entry as usize)
            .map_or(false, |f| f & Self::SPEC_STAGED_API != 0)
    }
}

/// The values of one resource type for one configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeChunk {
    pub id: NonZeroU8,
    pub flags: u8,
    pub reserved: u16,
    /// Dense capacity, or the number of present pairs for sparse tables.
    pub entry_count: u32,
    /// Offset from the chunk start to the entry records.
    pub entries_start: u32,
    pub config: ResourceConfig,
    pub entries: EntryTable,
}

impl TypeChunk {
    /// Fixed fields in front of the config record.
    pub const HEADER_SIZE: usize = 20;
    pub const NO_ENTRY: u32 = 0xffff_ffff;
    pub const NO_ENTRY16: u16 = 0xffff;
    pub const FLAG_SPARSE: u8 = 0x01;
    pub const FLAG_OFFSET16: u8 = 0x02;
    /// Entry indices are 16 bits wide in a resource id.
    pub const MAX_ENTRIES: u32 = 0x1_0000;

    /// Decodes the type chunk at the start of `region`.
    pub fn decode(region: Region<'_>) -> Result<Self> {
        let chunk = Chunk::read(region, 0)?;
        chunk.expect(ChunkType::TableType)?;
        chunk.require_header_size(Self::HEADER_SIZE + 4)?;
        let offset = chunk.offset();
        let region = chunk.region();
        let mut r = region.reader(8);
        let id = r.read_u8()?;
        let flags = r.read_u8()?;
        let reserved = r.read_u16()?;
        let entry_count = r.read_u32()?;
        let entries_start = r.read_u32()?;
        let id = NonZeroU8::new(id)
            .ok_or_else(|| ArscError::malformed_type(offset, "type id 0 is invalid"))?;
        let config = ResourceConfig::decode(
            region.sub(Self::HEADER_SIZE, chunk.header_size() - Self::HEADER_SIZE)?,
        )?;

        let sparse = flags & Self::FLAG_SPARSE != 0;
        let offset16 = flags & Self::FLAG_OFFSET16 != 0;
        if !sparse && entry_count > Self::MAX_ENTRIES {
            return Err(ArscError::malformed_type(
                offset,
                format!("{entry_count} entries do not fit 16 bit entry indices"),
            ));
        }
        let width = if offset16 && !sparse { 2 } else { 4 };
        let index_len = (entry_count as usize)
            .checked_mul(width)
            .ok_or_else(|| ArscError::malformed_type(offset, "entry count overflows"))?;
        let index = region.sub(chunk.header_size(), index_len)?;
        let start = entries_start as usize;
        if start < chunk.header_size() + index_len || start > region.len() {
            return Err(ArscError::malformed_type(
                offset,
                format!("entries start {start:#x} overlaps the index or lies past the chunk"),
            ));
        }
        let data = region.tail(start)?;

        let entries = if sparse {
            EntryTable::Sparse(read_sparse(index, data, entry_count)?)
        } else if offset16 {
            let mut entries = Vec::with_capacity(entry_count as usize);
            let mut r = index.reader(0);
            for _ in 0..entry_count {
                entries.push(match r.read_u16()? {
                    Self::NO_ENTRY16 => None,
                    offset => Some(ResTableEntry::decode(data, offset as usize * 4)?),
                });
            }
            EntryTable::Dense(entries)
        } else {
            let mut entries = Vec::with_capacity(entry_count as usize);
            let mut r = index.reader(0);
            for _ in 0..entry_count {
                entries.push(match r.read_u32()? {
                    Self::NO_ENTRY => None,
                    offset => Some(ResTableEntry::decode(data, offset as usize)?),
                });
            }
            EntryTable::Dense(entries)
        };

        Ok(Self {
            id,
            flags,
            reserved,
            entry_count,
            entries_start,
            config,
            entries,
        })
    }

    pub fn is_sparse(&self) -> bool {
        self.flags & Self::FLAG_SPARSE != 0
    }

    /// The record for `index` in this configuration, if present.
    pub fn entry(&self, index: u16) -> Option<&ResTableEntry> {
        self.entries.get(index)
    }
}

fn read_sparse(index: Region<'_>, data: Region<'_>, count: u32) -> Result<Vec<(u16, ResTableEntry)>> {
    let mut pairs = Vec::with_capacity(count as usize);
    let mut r = index.reader(0);
    for _ in 0..count {
        let at = r.absolute_position();
        let idx = r.read_u16()?;
        let offset = r.read_u16()?;
        // Lookups binary search by index.
        if let Some(&(prev, _)) = pairs.last() {
            if idx <= prev {
                return Err(ArscError::malformed_type(
                    at,
                    format!("sparse entry {idx} does not follow entry {prev}"),
                ));
            }
        }
        pairs.push((idx, offset));
    }
    pairs
        .into_iter()
        .map(|(idx, offset)| Ok((idx, ResTableEntry::decode(data, offset as usize * 4)?)))
        .collect()
}

/// Present entries of a type chunk, keyed by entry index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EntryTable {
    Dense(Vec<Option<ResTableEntry>>),
    /// Sorted by strictly increasing index.
    Sparse(Vec<(u16, ResTableEntry)>),
}

impl EntryTable {
    pub fn get(&self, index: u16) -> Option<&ResTableEntry> {
        match self {
            Self::Dense(entries) => entries.get(index as usize)?.as_ref(),
            Self::Sparse(entries) => entries
                .binary_search_by_key(&index, |(idx, _)| *idx)
                .ok()
                .map(|i| &entries[i].1),
        }
    }

    /// Present entries in index order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (u16, &ResTableEntry)> + '_> {
        match self {
            Self::Dense(entries) => Box::new(
                entries
                    .iter()
                    .enumerate()
                    .filter_map(|(i, e)| e.as_ref().map(|e| (i as u16, e))),
            ),
            Self::Sparse(entries) => Box::new(entries.iter().map(|(i, e)| (*i, e))),
        }
    }
}

/// A value record of a type chunk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResTableEntry {
    /// Absolute offset of the record in the input.
    pub offset: usize,
    pub size: u16,
    pub flags: u16,
    /// Index into the key string pool of the package.
    pub key: u32,
    pub value: ResTableValue,
}

impl ResTableEntry {
    pub const FLAG_COMPLEX: u16 = 0x1;
    pub const FLAG_PUBLIC: u16 = 0x2;
    pub const FLAG_WEAK: u16 = 0x4;
    /// Eight byte record: key index in the size field, data type in the high
    /// byte of the flags, data in place of the key.
    pub const FLAG_COMPACT: u16 = 0x8;

    /// Decodes the record `rel` bytes into `data`.
    pub fn decode(data: Region<'_>, rel: usize) -> Result<Self> {
        let offset = data.absolute(rel);
        let malformed = |reason: String| ArscError::malformed_type(offset, reason);
        if rel % 4 != 0 {
            return Err(malformed(format!("entry at {rel:#x} is not 4 byte aligned")));
        }
        if !data.contains(rel, 8) {
            return Err(malformed(format!("entry at {rel:#x} lies past the chunk")));
        }
        let mut r = data.reader(rel);
        let size = r.read_u16()?;
        let flags = r.read_u16()?;
        let key = r.read_u32()?;

        if flags & Self::FLAG_COMPACT != 0 {
            return Ok(Self {
                offset,
                size: 8,
                flags: flags & 0x00ff,
                key: size as u32,
                value: ResTableValue::Simple(ResValue {
                    size: 8,
                    res0: 0,
                    data_type: (flags >> 8) as u8,
                    data: key,
                }),
            });
        }
        if size < 8 {
            return Err(malformed(format!("entry size {size} is below 8")));
        }
        if !data.contains(rel, size as usize) {
            return Err(malformed(format!("entry of {size} bytes runs past the chunk")));
        }

        let value = if flags & Self::FLAG_COMPLEX != 0 {
            if size < 16 {
                return Err(malformed(format!("map entry size {size} is below 16")));
            }
            let parent = data.read_u32(rel + 8)?;
            let count = data.read_u32(rel + 12)?;
            let maps = rel + size as usize;
            let len = (count as usize)
                .checked_mul(ResTableMap::SIZE)
                .filter(|len| data.contains(maps, *len))
                .ok_or_else(|| malformed(format!("{count} map values run past the chunk")))?;
            let mut r = data.sub(maps, len)?.reader(0);
            let mut map = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let name = r.read_u32()?;
                let value = ResValue::read(&mut r)?;
                map.push(ResTableMap { name, value });
            }
            ResTableValue::Complex(ResTableMapEntry { parent, count }, map)
        } else {
            let at = rel + size as usize;
            if !data.contains(at, ResValue::SIZE) {
                return Err(malformed("value runs past the chunk".into()));
            }
            ResTableValue::Simple(ResValue::read(&mut data.reader(at))?)
        };
        Ok(Self {
            offset,
            size,
            flags,
            key,
            value,
        })
    }

    pub fn is_complex(&self) -> bool {
        self.flags & Self::FLAG_COMPLEX != 0
    }

    pub fn is_public(&self) -> bool {
        self.flags & Self::FLAG_PUBLIC != 0
    }

    pub fn is_weak(&self) -> bool {
        self.flags & Self::FLAG_WEAK != 0
    }

    pub fn is_compact(&self) -> bool {
        self.flags & Self::FLAG_COMPACT != 0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResTableValue {
    Simple(ResValue),
    Complex(ResTableMapEntry, Vec<ResTableMap>),
}

/// A raw typed value. `data` is interpreted according to `data_type`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResValue {
    pub size: u16,
    pub res0: u8,
    pub data_type: u8,
    pub data: u32,
}

impl ResValue {
    pub const SIZE: usize = 8;

    fn read(r: &mut crate::reader::Reader<'_>) -> Result<Self> {
        let size = r.read_u16()?;
        let res0 = r.read_u8()?;
        let data_type = r.read_u8()?;
        let data = r.read_u32()?;
        Ok(Self {
            size,
            res0,
            data_type,
            data,
        })
    }

    pub fn ty(&self) -> Option<ResValueType> {
        ResValueType::from_u8(self.data_type)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum ResValueType {
    Null = 0x00,
    Reference = 0x01,
    Attribute = 0x02,
    String = 0x03,
    Float = 0x04,
    Dimension = 0x05,
    Fraction = 0x06,
    DynamicReference = 0x07,
    DynamicAttribute = 0x08,
    IntDec = 0x10,
    IntHex = 0x11,
    IntBoolean = 0x12,
    IntColorArgb8 = 0x1c,
    IntColorRgb8 = 0x1d,
    IntColorArgb4 = 0x1e,
    IntColorRgb4 = 0x1f,
}

impl ResValueType {
    pub fn from_u8(ty: u8) -> Option<Self> {
        Some(match ty {
            x if x == Self::Null as u8 => Self::Null,
            x if x == Self::Reference as u8 => Self::Reference,
            x if x == Self::Attribute as u8 => Self::Attribute,
            x if x == Self::String as u8 => Self::String,
            x if x == Self::Float as u8 => Self::Float,
            x if x == Self::Dimension as u8 => Self::Dimension,
            x if x == Self::Fraction as u8 => Self::Fraction,
            x if x == Self::DynamicReference as u8 => Self::DynamicReference,
            x if x == Self::DynamicAttribute as u8 => Self::DynamicAttribute,
            x if x == Self::IntDec as u8 => Self::IntDec,
            x if x == Self::IntHex as u8 => Self::IntHex,
            x if x == Self::IntBoolean as u8 => Self::IntBoolean,
            x if x == Self::IntColorArgb8 as u8 => Self::IntColorArgb8,
            x if x == Self::IntColorRgb8 as u8 => Self::IntColorRgb8,
            x if x == Self::IntColorArgb4 as u8 => Self::IntColorArgb4,
            x if x == Self::IntColorRgb4 as u8 => Self::IntColorRgb4,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResTableMapEntry {
    /// Resource id of the parent map, 0 for none.
    pub parent: u32,
    pub count: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResTableMap {
    /// Resource id of the attribute this value is for.
    pub name: u32,
    pub value: ResValue,
}

impl ResTableMap {
    pub const SIZE: usize = 12;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{type_chunk, type_chunk_raw, type_spec, Layout, Value};
    use anyhow::Result;

    fn config() -> ResourceConfig {
        ResourceConfig {
            size: 64,
            density: ResourceConfig::DENSITY_HIGH,
            ..Default::default()
        }
    }

    fn entry_record(key: u32, data: u32) -> Vec<u8> {
        Value::simple(key, data).to_bytes()
    }

    #[test]
    fn test_type_spec() -> Result<()> {
        let flags = [
            ResourceConfig::CONFIG_DENSITY | TypeSpec::SPEC_PUBLIC,
            0,
            ResourceConfig::CONFIG_LOCALE | ResourceConfig::CONFIG_ORIENTATION,
        ];
        let buf = type_spec(3, &flags);
        let spec = TypeSpec::decode(Region::new(&buf))?;
        assert_eq!(spec.id.get(), 3);
        assert_eq!(spec.entry_count(), 3);
        assert!(spec.is_public(0));
        assert!(!spec.is_public(1));
        assert_eq!(spec.config_mask(0), Some(ResourceConfig::CONFIG_DENSITY));
        assert_eq!(spec.config_mask(3), None);
        Ok(())
    }

    #[test]
    fn test_type_spec_id_zero() {
        let buf = type_spec(0, &[0]);
        assert!(matches!(
            TypeSpec::decode(Region::new(&buf)),
            Err(ArscError::MalformedType { .. })
        ));
    }

    #[test]
    fn test_type_spec_truncated_flags() {
        let mut buf = type_spec(1, &[0, 0]);
        buf[12..16].copy_from_slice(&10u32.to_le_bytes());
        assert!(matches!(
            TypeSpec::decode(Region::new(&buf)),
            Err(ArscError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_dense_with_missing_entry() -> Result<()> {
        // Index [NO_ENTRY, 16]; the record at 0 is not referenced.
        let mut index = vec![];
        index.extend(TypeChunk::NO_ENTRY.to_le_bytes());
        index.extend(16u32.to_le_bytes());
        let mut data = entry_record(9, 9);
        data.extend(entry_record(1, 0x1234));
        let buf = type_chunk_raw(2, 0, &config(), 2, &index, &data);
        let ty = TypeChunk::decode(Region::new(&buf))?;
        assert_eq!(ty.id.get(), 2);
        assert!(!ty.is_sparse());
        assert_eq!(ty.config.density, ResourceConfig::DENSITY_HIGH);
        assert_eq!(ty.entry(0), None);
        let entry = ty.entry(1).expect("entry 1");
        assert_eq!(entry.offset, ty.entries_start as usize + 16);
        assert_eq!(entry.key, 1);
        assert_eq!(
            entry.value,
            ResTableValue::Simple(ResValue {
                size: 8,
                res0: 0,
                data_type: ResValueType::IntDec as u8,
                data: 0x1234,
            })
        );
        assert_eq!(ty.entry(2), None);
        Ok(())
    }

    #[test]
    fn test_dense_index_past_u16() -> Result<()> {
        let mut index = vec![];
        for _ in 0..TypeChunk::MAX_ENTRIES {
            index.extend(TypeChunk::NO_ENTRY.to_le_bytes());
        }
        index.extend(0u32.to_le_bytes());
        let data = entry_record(0, 1);
        let count = TypeChunk::MAX_ENTRIES + 1;
        let buf = type_chunk_raw(1, 0, &config(), count, &index, &data);
        assert!(matches!(
            TypeChunk::decode(Region::new(&buf)),
            Err(ArscError::MalformedType { .. })
        ));

        // A full 16 bit table still decodes and reports its last index.
        index.truncate(index.len() - 8);
        index.extend(0u32.to_le_bytes());
        let buf = type_chunk_raw(1, 0, &config(), TypeChunk::MAX_ENTRIES, &index, &data);
        let ty = TypeChunk::decode(Region::new(&buf))?;
        let present = ty.entries.iter().map(|(i, _)| i).collect::<Vec<_>>();
        assert_eq!(present, [0xffff]);
        Ok(())
    }

    #[test]
    fn test_sparse_out_of_order() {
        let mut index = vec![];
        for (idx, offset) in [(3u16, 0u16), (1, 4)] {
            index.extend(idx.to_le_bytes());
            index.extend(offset.to_le_bytes());
        }
        let mut data = entry_record(0, 0);
        data.extend(entry_record(1, 1));
        let buf = type_chunk_raw(1, TypeChunk::FLAG_SPARSE, &config(), 2, &index, &data);
        assert!(matches!(
            TypeChunk::decode(Region::new(&buf)),
            Err(ArscError::MalformedType { .. })
        ));
    }

    #[test]
    fn test_sparse_duplicate_index() {
        let mut index = vec![];
        for (idx, offset) in [(1u16, 0u16), (1, 4)] {
            index.extend(idx.to_le_bytes());
            index.extend(offset.to_le_bytes());
        }
        let mut data = entry_record(0, 0);
        data.extend(entry_record(1, 1));
        let buf = type_chunk_raw(1, TypeChunk::FLAG_SPARSE, &config(), 2, &index, &data);
        assert!(matches!(
            TypeChunk::decode(Region::new(&buf)),
            Err(ArscError::MalformedType { .. })
        ));
    }

    #[test]
    fn test_layouts_agree() -> Result<()> {
        let entries = vec![
            None,
            Some(Value::simple(0, 10)),
            None,
            None,
            Some(Value::complex(1, 0x0101_0000, &[(0x0101_0001, 7), (0x0101_0002, 8)])),
            Some(Value::compact(2, 30)),
            None,
        ];
        let decoded = [Layout::Dense, Layout::Sparse, Layout::Offset16]
            .into_iter()
            .map(|layout| {
                let buf = type_chunk(4, &config(), &entries, layout);
                TypeChunk::decode(Region::new(&buf))
            })
            .collect::<Result<Vec<_>, _>>()?;
        assert!(decoded[1].is_sparse());
        assert!(matches!(decoded[1].entries, EntryTable::Sparse(_)));
        for index in 0..10u16 {
            let expected = entries
                .get(index as usize)
                .cloned()
                .flatten()
                .map(|v| (v.key(), v.flags()));
            for ty in &decoded {
                let found = ty.entry(index).map(|e| (e.key, e.flags));
                assert_eq!(found, expected, "entry {index}");
                assert_eq!(
                    ty.entry(index).map(|e| &e.value),
                    decoded[0].entry(index).map(|e| &e.value)
                );
            }
        }
        let present = decoded[1].entries.iter().map(|(i, _)| i).collect::<Vec<_>>();
        assert_eq!(present, [1, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_complex_entry() -> Result<()> {
        let entries = vec![Some(Value::complex(
            5,
            0x7f0a_0001,
            &[(0x0101_0098, 0xff00_0000)],
        ))];
        let buf = type_chunk(1, &config(), &entries, Layout::Dense);
        let ty = TypeChunk::decode(Region::new(&buf))?;
        let entry = ty.entry(0).expect("entry 0");
        assert!(entry.is_complex());
        assert_eq!(entry.key, 5);
        match &entry.value {
            ResTableValue::Complex(header, map) => {
                assert_eq!(header.parent, 0x7f0a_0001);
                assert_eq!(map.len(), 1);
                assert_eq!(map[0].name, 0x0101_0098);
                assert_eq!(map[0].value.data, 0xff00_0000);
            }
            other => panic!("unexpected value {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_compact_entry() -> Result<()> {
        let buf = type_chunk(1, &config(), &[Some(Value::compact(7, 99))], Layout::Dense);
        let ty = TypeChunk::decode(Region::new(&buf))?;
        let entry = ty.entry(0).expect("entry 0");
        assert!(entry.is_compact());
        assert_eq!(entry.key, 7);
        match entry.value {
            ResTableValue::Simple(value) => {
                assert_eq!(value.ty(), Some(ResValueType::IntDec));
                assert_eq!(value.data, 99);
            }
            ref other => panic!("unexpected value {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_entry_offset_outside_chunk() {
        let mut index = vec![];
        index.extend(0x100u32.to_le_bytes());
        let buf = type_chunk_raw(1, 0, &config(), 1, &index, &entry_record(0, 0));
        assert!(matches!(
            TypeChunk::decode(Region::new(&buf)),
            Err(ArscError::MalformedType { .. })
        ));
    }

    #[test]
    fn test_entry_size_too_small() {
        let mut data = entry_record(0, 0);
        data[0] = 4;
        let buf = type_chunk_raw(1, 0, &config(), 1, &0u32.to_le_bytes(), &data);
        assert!(matches!(
            TypeChunk::decode(Region::new(&buf)),
            Err(ArscError::MalformedType { .. })
        ));
    }

    #[test]
    fn test_config_larger_than_header() {
        let mut buf = type_chunk(1, &config(), &[Some(Value::simple(0, 0))], Layout::Dense);
        // Config record claims more bytes than the header holds.
        buf[20..24].copy_from_slice(&80u32.to_le_bytes());
        assert!(matches!(
            TypeChunk::decode(Region::new(&buf)),
            Err(ArscError::MalformedConfig { .. })
        ));
    }

    #[test]
    fn test_early_config_record() -> Result<()> {
        let early = ResourceConfig {
            size: 28,
            density: ResourceConfig::DENSITY_XHIGH,
            ..Default::default()
        };
        let buf = type_chunk(1, &early, &[Some(Value::simple(0, 1))], Layout::Dense);
        let ty = TypeChunk::decode(Region::new(&buf))?;
        assert_eq!(ty.config.size, 28);
        assert_eq!(ty.config.density, ResourceConfig::DENSITY_XHIGH);
        assert!(ty.entry(0).is_some());
        Ok(())
    }

    #[test]
    fn test_truncated_type() {
        let buf = type_chunk(1, &config(), &[Some(Value::simple(0, 1))], Layout::Dense);
        for len in [4, 12, 40, buf.len() - 1] {
            assert!(
                matches!(
                    TypeChunk::decode(Region::new(&buf[..len])),
                    Err(ArscError::TruncatedData { .. })
                ),
                "length {len}"
            );
        }
    }
}
