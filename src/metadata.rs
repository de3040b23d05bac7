//! Attribute access on volume handles.
//!
//! Attributes are grouped by name, such as `"patient"` or `"acquisition"`,
//! and hold text, floating point or integer arrays.

use crate::backend::{AttributeValue, Metadata, NativeVolume, StorageEngine};
use crate::error::Result;
use crate::file::Minc2File;
use std::collections::BTreeMap;

impl<E: StorageEngine> Minc2File<E> {
    /// Fetch one attribute, `None` if it does not exist.
    pub fn read_attribute(&self, group: &str, name: &str) -> Result<Option<AttributeValue>> {
        let (_, volume) = self.parts()?;
        volume.attribute(group, name)
    }

    /// Create or replace one attribute.
    pub fn write_attribute(&mut self, group: &str, name: &str, value: AttributeValue) -> Result<()> {
        let (_, volume) = self.parts_mut()?;
        volume.set_attribute(group, name, value)
    }

    /// All attributes of the volume, by group.
    pub fn metadata(&self) -> Result<Metadata> {
        let (_, volume) = self.parts()?;
        let mut metadata = BTreeMap::new();
        for group in volume.attribute_groups()? {
            let mut attributes = BTreeMap::new();
            for name in volume.attribute_names(&group)? {
                if let Some(value) = volume.attribute(&group, &name)? {
                    let _ = attributes.insert(name, value);
                }
            }
            let _ = metadata.insert(group, attributes);
        }
        Ok(metadata)
    }

    /// Write every attribute of `metadata`, replacing existing ones of the
    /// same name.
    pub fn write_metadata(&mut self, metadata: &Metadata) -> Result<()> {
        let (_, volume) = self.parts_mut()?;
        for (group, attributes) in metadata {
            for (name, value) in attributes {
                volume.set_attribute(group, name, value.clone())?;
            }
        }
        Ok(())
    }
}

/// Copy every attribute of the volume in `src` into the volume in `dst`.
pub fn copy_metadata<A, B>(src: &Minc2File<A>, dst: &mut Minc2File<B>) -> Result<()>
where
    A: StorageEngine,
    B: StorageEngine,
{
    let (_, from) = src.parts()?;
    let (_, to) = dst.parts_mut()?;
    to.copy_attributes_from(from)
}
