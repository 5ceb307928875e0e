use crate::chunk::{Chunk, ChunkType};
use crate::error::{ArscError, NotFound, Result};
use crate::reader::{Reader, Region};
use crate::string_pool::StringPool;
use crate::types::{ResTableEntry, TypeChunk, TypeSpec};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::num::NonZeroU8;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PackageHeader {
    pub id: u32,
    pub name: String,
    /// Offset from the package start to the type name pool.
    pub type_strings: u32,
    pub last_public_type: u32,
    /// Offset from the package start to the key name pool.
    pub key_strings: u32,
    pub last_public_key: u32,
    /// Zero for headers written before the field existed.
    pub type_id_offset: u32,
}

impl PackageHeader {
    pub const SIZE: usize = 288;
    /// Header size without `type_id_offset`.
    pub const SIZE_WITHOUT_TYPE_ID_OFFSET: usize = 284;
    /// UTF-16 units reserved for the package name.
    pub const NAME_LEN: usize = 128;
}

/// A shared library a dynamic package id refers to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LibraryEntry {
    pub package_id: u32,
    pub package_name: String,
}

impl LibraryEntry {
    pub const SIZE: usize = 4 + 2 * PackageHeader::NAME_LEN;
}

/// The spec of one resource type and its values in every configuration, in
/// the order the chunks appear.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeGroup {
    pub spec: TypeSpec,
    pub types: Vec<TypeChunk>,
}

impl TypeGroup {
    pub fn id(&self) -> NonZeroU8 {
        self.spec.id
    }
}

#[derive(Clone, Debug)]
pub struct Package<'a> {
    pub header: PackageHeader,
    pub type_strings: StringPool<'a>,
    pub key_strings: StringPool<'a>,
    pub libraries: Vec<LibraryEntry>,
    groups: BTreeMap<u8, TypeGroup>,
}

impl<'a> Package<'a> {
    /// Decodes the package chunk at the start of `region` with all its
    /// children.
    pub fn decode(region: Region<'a>) -> Result<Self> {
        let chunk = Chunk::read(region, 0)?;
        chunk.expect(ChunkType::TablePackage)?;
        let offset = chunk.offset();
        if chunk.header_size() < PackageHeader::SIZE_WITHOUT_TYPE_ID_OFFSET {
            return Err(ArscError::malformed_package(
                offset,
                format!("header size {} is below 284", chunk.header_size()),
            ));
        }
        let region = chunk.region();
        let mut r = region.reader(8);
        let id = r.read_u32()?;
        let name = read_name(&mut r)?;
        let mut header = PackageHeader {
            id,
            name,
            type_strings: r.read_u32()?,
            last_public_type: r.read_u32()?,
            key_strings: r.read_u32()?,
            last_public_key: r.read_u32()?,
            type_id_offset: 0,
        };
        if chunk.header_size() >= PackageHeader::SIZE {
            header.type_id_offset = r.read_u32()?;
        }
        if id > 0xff {
            return Err(ArscError::malformed_package(
                offset,
                format!("package id {id:#x} does not fit in a resource id"),
            ));
        }
        tracing::trace!(offset, id, "package {}", header.name);

        let type_strings = pool_at(chunk, header.type_strings, "type")?;
        let key_strings = pool_at(chunk, header.key_strings, "key")?;

        let mut libraries = vec![];
        let mut groups = BTreeMap::<u8, TypeGroup>::new();
        for child in chunk.children() {
            let child = child?;
            let rel = child.offset() - offset;
            match child.ty() {
                Some(ChunkType::StringPool) => {
                    if rel != header.type_strings as usize && rel != header.key_strings as usize {
                        return Err(ArscError::malformed_package(
                            child.offset(),
                            "string pool is neither the type nor the key pool",
                        ));
                    }
                }
                Some(ChunkType::TableTypeSpec) => {
                    let spec = TypeSpec::decode(child.region())?;
                    tracing::trace!(
                        offset = child.offset(),
                        id = spec.id.get(),
                        "type spec with {} entries",
                        spec.entry_count()
                    );
                    let id = spec.id.get();
                    if groups.contains_key(&id) {
                        return Err(ArscError::malformed_type(
                            child.offset(),
                            format!("second type spec for type {id:#04x}"),
                        ));
                    }
                    groups.insert(
                        id,
                        TypeGroup {
                            spec,
                            types: vec![],
                        },
                    );
                }
                Some(ChunkType::TableType) => {
                    let ty = TypeChunk::decode(child.region())?;
                    tracing::trace!(offset = child.offset(), id = ty.id.get(), "type {}", ty.config);
                    let group = groups.get_mut(&ty.id.get()).ok_or_else(|| {
                        ArscError::malformed_type(
                            child.offset(),
                            format!("type {:#04x} appears before its type spec", ty.id),
                        )
                    })?;
                    group.types.push(ty);
                }
                Some(ChunkType::TableLibrary) => {
                    libraries.extend(decode_library(child)?);
                }
                Some(
                    ty @ (ChunkType::TableOverlayable
                    | ChunkType::TableOverlayablePolicy
                    | ChunkType::TableStagedAlias),
                ) => {
                    tracing::trace!(offset = child.offset(), "skipping {} chunk", ty.name());
                }
                _ => return Err(child.unsupported("a package child chunk")),
            }
        }

        Ok(Self {
            header,
            type_strings,
            key_strings,
            libraries,
            groups,
        })
    }

    pub fn id(&self) -> u8 {
        self.header.id as u8
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn type_group(&self, type_id: u8) -> Option<&TypeGroup> {
        self.groups.get(&type_id)
    }

    /// Type groups in ascending id order.
    pub fn type_groups(&self) -> impl Iterator<Item = &TypeGroup> {
        self.groups.values()
    }

    /// Name of the type with `type_id`, such as `drawable`.
    pub fn type_name(&self, type_id: u8) -> Result<Cow<'a, str>> {
        let index = (type_id as u32)
            .checked_sub(self.header.type_id_offset.saturating_add(1))
            .ok_or(NotFound::Type {
                package_id: self.id(),
                type_id,
            })?;
        self.type_strings.get(index)
    }

    /// Id of the type named `name`.
    pub fn type_id(&self, name: &str) -> Result<Option<u8>> {
        Ok(self
            .type_strings
            .position(name)?
            .and_then(|index| index.checked_add(self.header.type_id_offset)?.checked_add(1))
            .and_then(|id| u8::try_from(id).ok()))
    }

    pub fn key_name(&self, entry: &ResTableEntry) -> Result<Cow<'a, str>> {
        self.key_strings.get(entry.key)
    }
}

/// Decodes the string pool `rel` bytes into the package chunk.
fn pool_at<'a>(package: Chunk<'a>, rel: u32, what: &str) -> Result<StringPool<'a>> {
    let rel = rel as usize;
    let offset = package.offset();
    if rel < package.header_size() || rel >= package.region().len() {
        return Err(ArscError::malformed_package(
            offset,
            format!("{what} strings at {rel:#x} lie outside the package"),
        ));
    }
    let chunk = Chunk::read(package.region(), rel).map_err(|err| {
        ArscError::malformed_package(offset, format!("{what} strings at {rel:#x}: {err}"))
    })?;
    if chunk.ty() != Some(ChunkType::StringPool) {
        return Err(ArscError::malformed_package(
            offset,
            format!(
                "{what} strings at {rel:#x} start with chunk type {:#06x}",
                chunk.header.ty
            ),
        ));
    }
    StringPool::decode(chunk.region())
}

fn read_name(r: &mut Reader<'_>) -> Result<String> {
    let at = r.absolute_position();
    let mut units = Vec::with_capacity(PackageHeader::NAME_LEN);
    for _ in 0..PackageHeader::NAME_LEN {
        units.push(r.read_u16()?);
    }
    let len = units.iter().position(|u| *u == 0).unwrap_or(units.len());
    String::from_utf16(&units[..len])
        .map_err(|err| ArscError::malformed_package(at, format!("invalid package name: {err}")))
}

fn decode_library(chunk: Chunk<'_>) -> Result<Vec<LibraryEntry>> {
    chunk.require_header_size(12)?;
    let region = chunk.region();
    let count = region.read_u32(8)?;
    let len = (count as usize)
        .checked_mul(LibraryEntry::SIZE)
        .ok_or_else(|| ArscError::malformed_package(chunk.offset(), "library count overflows"))?;
    let mut r = region.sub(chunk.header_size(), len)?.reader(0);
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let package_id = r.read_u32()?;
        let package_name = read_name(&mut r)?;
        tracing::trace!(offset = chunk.offset(), package_id, "library {}", package_name);
        entries.push(LibraryEntry {
            package_id,
            package_name,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceConfig;
    use crate::tests::{
        capture_trace, empty_chunk, init_logger, library, package, string_pool, type_chunk,
        type_spec, Layout, Value,
    };
    use anyhow::Result;

    fn land() -> ResourceConfig {
        ResourceConfig {
            size: 64,
            orientation: ResourceConfig::ORIENTATION_LAND,
            ..Default::default()
        }
    }

    fn sample() -> Vec<u8> {
        package(
            0x7f,
            "com.example.app",
            &["attr", "string"],
            &["app_name", "title"],
            &[
                type_spec(2, &[0, ResourceConfig::CONFIG_ORIENTATION]),
                type_chunk(
                    2,
                    &ResourceConfig::default(),
                    &[Some(Value::simple(0, 1)), Some(Value::simple(1, 2))],
                    Layout::Dense,
                ),
                type_chunk(2, &land(), &[None, Some(Value::simple(1, 3))], Layout::Sparse),
            ],
        )
    }

    #[test]
    fn test_package() -> Result<()> {
        init_logger()?;
        let buf = sample();
        let package = Package::decode(Region::new(&buf))?;
        assert_eq!(package.id(), 0x7f);
        assert_eq!(package.name(), "com.example.app");
        assert_eq!(package.header.last_public_type, 2);
        assert_eq!(package.type_name(2)?, "string");
        assert_eq!(package.type_id("attr")?, Some(1));
        assert_eq!(package.type_id("layout")?, None);
        assert!(package.type_group(1).is_none());
        let group = package.type_group(2).expect("string type");
        assert_eq!(group.types.len(), 2);
        assert_eq!(group.types[1].config.orientation, ResourceConfig::ORIENTATION_LAND);
        let entry = group.types[1].entry(1).expect("title");
        assert_eq!(package.key_name(entry)?, "title");
        assert_eq!(package.type_groups().count(), 1);
        Ok(())
    }

    #[test]
    fn test_trace_fields() -> Result<()> {
        let buf = sample();
        let (package, events) = capture_trace(|| Package::decode(Region::new(&buf)));
        assert_eq!(package?.id(), 0x7f);
        assert!(events.contains("id=127"), "{events}");
        assert!(events.contains("type spec with 2 entries"), "{events}");
        assert!(events.contains("id=2"), "{events}");
        // One offset field for the package, its type spec and both types.
        assert_eq!(events.matches("offset=").count(), 4, "{events}");
        assert!(events.contains("offset=0"), "{events}");
        Ok(())
    }

    #[test]
    fn test_short_header() -> Result<()> {
        let mut buf = package(0x7f, "lib", &["string"], &["a"], &[]);
        // Drop type_id_offset, moving both pools four bytes down.
        buf.drain(284..288);
        buf[2..4].copy_from_slice(&284u16.to_le_bytes());
        let size = buf.len() as u32;
        buf[4..8].copy_from_slice(&size.to_le_bytes());
        for at in [268, 276] {
            let rel = u32::from_le_bytes(buf[at..at + 4].try_into()?) - 4;
            buf[at..at + 4].copy_from_slice(&rel.to_le_bytes());
        }
        let package = Package::decode(Region::new(&buf))?;
        assert_eq!(package.header.type_id_offset, 0);
        assert_eq!(package.type_name(1)?, "string");
        Ok(())
    }

    #[test]
    fn test_type_id_offset() -> Result<()> {
        let mut buf = package(0x7f, "overlay", &["string"], &["a"], &[]);
        buf[284..288].copy_from_slice(&2u32.to_le_bytes());
        let package = Package::decode(Region::new(&buf))?;
        assert_eq!(package.type_name(3)?, "string");
        assert_eq!(package.type_id("string")?, Some(3));
        assert!(package.type_name(2).is_err());
        Ok(())
    }

    #[test]
    fn test_bad_pool_offset() {
        let mut buf = sample();
        // Point the key pool into the middle of the type pool.
        let type_strings = u32::from_le_bytes(buf[268..272].try_into().unwrap());
        buf[276..280].copy_from_slice(&(type_strings + 4).to_le_bytes());
        assert!(matches!(
            Package::decode(Region::new(&buf)),
            Err(ArscError::MalformedPackage { .. })
        ));

        let mut buf = sample();
        buf[268..272].copy_from_slice(&0x10_0000u32.to_le_bytes());
        assert!(matches!(
            Package::decode(Region::new(&buf)),
            Err(ArscError::MalformedPackage { .. })
        ));
    }

    #[test]
    fn test_pool_offset_at_other_chunk() {
        let spec = type_spec(1, &[0]);
        let mut buf = package(0x7f, "app", &["string"], &["a"], &[spec]);
        let spec_at = (buf.len() - 20) as u32;
        buf[276..280].copy_from_slice(&spec_at.to_le_bytes());
        assert!(matches!(
            Package::decode(Region::new(&buf)),
            Err(ArscError::MalformedPackage { .. })
        ));
    }

    #[test]
    fn test_type_before_spec() {
        let buf = package(
            0x7f,
            "app",
            &["string"],
            &["a"],
            &[type_chunk(1, &land(), &[Some(Value::simple(0, 0))], Layout::Dense)],
        );
        assert!(matches!(
            Package::decode(Region::new(&buf)),
            Err(ArscError::MalformedType { .. })
        ));
    }

    #[test]
    fn test_duplicate_spec() {
        let buf = package(
            0x7f,
            "app",
            &["string"],
            &["a"],
            &[type_spec(1, &[0]), type_spec(1, &[0])],
        );
        assert!(matches!(
            Package::decode(Region::new(&buf)),
            Err(ArscError::MalformedType { .. })
        ));
    }

    #[test]
    fn test_stray_string_pool() {
        let buf = package(
            0x7f,
            "app",
            &["string"],
            &["a"],
            &[string_pool(&["stray"], true)],
        );
        assert!(matches!(
            Package::decode(Region::new(&buf)),
            Err(ArscError::MalformedPackage { .. })
        ));
    }

    #[test]
    fn test_library_and_skipped_chunks() -> Result<()> {
        let buf = package(
            0x7f,
            "app",
            &["string"],
            &["a"],
            &[
                library(&[(0x02, "com.example.lib")]),
                empty_chunk(ChunkType::TableOverlayable),
                empty_chunk(ChunkType::TableStagedAlias),
                type_spec(1, &[TypeSpec::SPEC_PUBLIC]),
            ],
        );
        let package = Package::decode(Region::new(&buf))?;
        assert_eq!(
            package.libraries,
            [LibraryEntry {
                package_id: 0x02,
                package_name: "com.example.lib".into(),
            }]
        );
        assert!(package.type_group(1).expect("type 1").spec.is_public(0));
        Ok(())
    }

    #[test]
    fn test_unsupported_child() {
        let buf = package(
            0x7f,
            "app",
            &["string"],
            &["a"],
            &[empty_chunk(ChunkType::XmlCdata)],
        );
        assert!(matches!(
            Package::decode(Region::new(&buf)),
            Err(ArscError::UnsupportedChunkType { found: 0x0104, .. })
        ));
    }

    #[test]
    fn test_child_escapes_package() {
        let mut buf = package(0x7f, "app", &["string"], &["a"], &[type_spec(1, &[0])]);
        let spec_at = buf.len() - 20;
        buf[spec_at + 4..spec_at + 8].copy_from_slice(&64u32.to_le_bytes());
        assert!(matches!(
            Package::decode(Region::new(&buf)),
            Err(ArscError::TruncatedData { .. })
        ));
    }
}
