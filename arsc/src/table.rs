use crate::chunk::{Chunk, ChunkType};
use crate::config::ResourceConfig;
use crate::error::{ArscError, NotFound, Result};
use crate::package::Package;
use crate::reader::Region;
use crate::resolve::select_best;
use crate::string_pool::StringPool;
use crate::types::ResTableEntry;
use std::fmt;
use std::num::NonZeroU8;

/// A resource id, `0xPPTTEEEE`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ResTableRef(u32);

impl ResTableRef {
    pub fn new(package: u8, ty: NonZeroU8, entry: u16) -> Self {
        let package = (package as u32) << 24;
        let ty = (ty.get() as u32) << 16;
        let entry = entry as u32;
        Self(package | ty | entry)
    }

    pub fn package(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn ty(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn entry(self) -> u16 {
        self.0 as u16
    }
}

impl From<u32> for ResTableRef {
    fn from(r: u32) -> Self {
        Self(r)
    }
}

impl From<ResTableRef> for u32 {
    fn from(r: ResTableRef) -> u32 {
        r.0
    }
}

impl fmt::Display for ResTableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// A resource named as `@[package:]type/name`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ref<'a> {
    pub package: Option<&'a str>,
    pub ty: &'a str,
    pub name: &'a str,
}

impl<'a> Ref<'a> {
    pub fn parse(s: &'a str) -> Result<Self> {
        let invalid = || ArscError::InvalidReference(s.to_owned());
        let rest = s.strip_prefix('@').ok_or_else(invalid)?;
        let (descr, name) = rest.split_once('/').ok_or_else(invalid)?;
        let (package, ty) = if let Some((package, ty)) = descr.split_once(':') {
            (Some(package), ty)
        } else {
            (None, descr)
        };
        if ty.is_empty() || name.is_empty() || package == Some("") {
            return Err(invalid());
        }
        Ok(Self { package, ty, name })
    }
}

impl fmt::Display for Ref<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("@")?;
        if let Some(package) = self.package {
            write!(f, "{package}:")?;
        }
        write!(f, "{}/{}", self.ty, self.name)
    }
}

/// The value record chosen for a requested configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Resolved<'t> {
    pub config: &'t ResourceConfig,
    pub entry: &'t ResTableEntry,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ResTableHeader {
    /// Number of packages declared by the writer.
    pub package_count: u32,
}

impl ResTableHeader {
    pub const SIZE: usize = 12;
}

/// A decoded resource table borrowing its strings from the input.
#[derive(Clone, Debug)]
pub struct ResourceTable<'a> {
    pub header: ResTableHeader,
    /// Pool holding the string values of all packages.
    pub strings: StringPool<'a>,
    packages: Vec<Package<'a>>,
}

impl<'a> ResourceTable<'a> {
    /// Package id used when a reference names no package.
    pub const APP_PACKAGE_ID: u8 = 0x7f;

    /// Decodes a complete `resources.arsc` buffer. Bytes after the table
    /// chunk are ignored.
    pub fn decode(buf: &'a [u8]) -> Result<Self> {
        let chunk = Chunk::read(Region::new(buf), 0)?;
        if chunk.ty() != Some(ChunkType::Table) {
            return Err(chunk.unsupported("a resource table"));
        }
        chunk.require_header_size(ResTableHeader::SIZE)?;
        let header = ResTableHeader {
            package_count: chunk.region().read_u32(8)?,
        };
        tracing::trace!(
            offset = chunk.offset(),
            package_count = header.package_count,
            "table"
        );

        let mut strings = None;
        let mut packages = vec![];
        for child in chunk.children() {
            let child = child?;
            match child.ty() {
                Some(ChunkType::StringPool) => {
                    if strings.is_some() {
                        return Err(malformed(&chunk, "second global string pool"));
                    }
                    strings = Some(StringPool::decode(child.region())?);
                }
                Some(ChunkType::TablePackage) => {
                    tracing::trace!(offset = child.offset(), "table package");
                    packages.push(Package::decode(child.region())?);
                }
                _ => return Err(child.unsupported("a string pool or package")),
            }
        }
        let strings = strings.ok_or_else(|| malformed(&chunk, "missing global string pool"))?;
        if packages.len() != header.package_count as usize {
            return Err(malformed(
                &chunk,
                format!(
                    "declares {} packages but holds {}",
                    header.package_count,
                    packages.len()
                ),
            ));
        }
        Ok(Self {
            header,
            strings,
            packages,
        })
    }

    pub fn packages(&self) -> &[Package<'a>] {
        &self.packages
    }

    pub fn package(&self, id: u8) -> Option<&Package<'a>> {
        self.packages.iter().find(|p| p.id() == id)
    }

    pub fn package_by_name(&self, name: &str) -> Option<&Package<'a>> {
        self.packages.iter().find(|p| p.name() == name)
    }

    /// Picks the value of an entry for the `target` device configuration.
    pub fn resolve(
        &self,
        package_id: u8,
        type_id: u8,
        entry: u16,
        target: &ResourceConfig,
    ) -> Result<Resolved<'_>> {
        let package = self
            .package(package_id)
            .ok_or(NotFound::Package(package_id))?;
        let group = package.type_group(type_id).ok_or(NotFound::Type {
            package_id,
            type_id,
        })?;
        let candidates = group
            .types
            .iter()
            .filter_map(|ty| ty.entry(entry).map(|e| (&ty.config, e)))
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            return Err(NotFound::Entry {
                package_id,
                type_id,
                entry,
            }
            .into());
        }
        let best = select_best(candidates.iter().map(|(config, _)| *config), target).ok_or(
            NotFound::NoCompatibleConfig {
                package_id,
                type_id,
                entry,
            },
        )?;
        let (config, entry) = candidates[best];
        Ok(Resolved { config, entry })
    }

    pub fn resolve_ref(&self, id: ResTableRef, target: &ResourceConfig) -> Result<Resolved<'_>> {
        self.resolve(id.package(), id.ty(), id.entry(), target)
    }

    /// Id of the resource named by `r`, searching every configuration.
    pub fn find(&self, r: Ref<'_>) -> Result<ResTableRef> {
        let not_found = || NotFound::Name(r.to_string());
        let package = match r.package {
            Some(name) => self.package_by_name(name),
            None => self.package(Self::APP_PACKAGE_ID),
        }
        .ok_or_else(not_found)?;
        let type_id = package.type_id(r.ty)?.ok_or_else(not_found)?;
        let key = package.key_strings.position(r.name)?.ok_or_else(not_found)?;
        let group = package.type_group(type_id).ok_or_else(not_found)?;
        let entry = group
            .types
            .iter()
            .flat_map(|ty| ty.entries.iter())
            .find(|(_, e)| e.key == key)
            .map(|(index, _)| index)
            .ok_or_else(not_found)?;
        Ok(ResTableRef::new(package.id(), group.id(), entry))
    }

    /// `package:type/name` of a resource id.
    pub fn entry_name(&self, id: ResTableRef) -> Result<String> {
        let package = self
            .package(id.package())
            .ok_or(NotFound::Package(id.package()))?;
        let group = package.type_group(id.ty()).ok_or(NotFound::Type {
            package_id: id.package(),
            type_id: id.ty(),
        })?;
        let entry = group
            .types
            .iter()
            .find_map(|ty| ty.entry(id.entry()))
            .ok_or(NotFound::Entry {
                package_id: id.package(),
                type_id: id.ty(),
                entry: id.entry(),
            })?;
        Ok(format!(
            "{}:{}/{}",
            package.name(),
            package.type_name(id.ty())?,
            package.key_name(entry)?
        ))
    }
}

fn malformed(chunk: &Chunk<'_>, reason: impl Into<String>) -> ArscError {
    ArscError::MalformedChunk {
        chunk_type: chunk.header.ty,
        offset: chunk.offset(),
        reason: reason.into(),
    }
}
