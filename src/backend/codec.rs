//! Reading and writing of the self-describing container persisted by
//! [`MemVolume`](super::MemVolume).
//!
//! The layout is little endian throughout:
//!
//! | field | encoding |
//! |-------|----------|
//! | magic | `b"MNCR"` |
//! | version | `u16` |
//! | store type, class, slice scaling flag | `i32`, `u8`, `u8` |
//! | valid range, real range | 4 × `f64` |
//! | dimensions | `u32` count, then name, length, step, start, irregular flag, optional cosines |
//! | slice ranges | `u64` count, then `(min, max)` pairs |
//! | attributes | `u32` group count, then per group its name and tagged attributes |
//! | voxels | `u64` count, then values encoded as the store type |
//!
//! The whole container may be wrapped in a gzip stream, which is detected
//! from its magic bytes when reading.

use super::mem::{MemDimension, MemVolume};
use super::{AttributeValue, DataClass, Metadata, NativeType, VoxelOrder};
use crate::error::{MincError, Result};
use crate::util::{element_count, is_gz_stream};
use byteordered::{ByteOrdered, Endian};
use either::Either;
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::io::{BufRead, BufReader, Error as IOError, ErrorKind, Read, Write};

/// Magic code at the start of every container.
pub const MAGIC_CODE: &[u8; 4] = b"MNCR";
/// Current container version.
pub const VERSION: u16 = 1;

const MAX_DIMS: u32 = 32;
const MAX_NAME_LEN: usize = 4096;
const PREALLOC_LIMIT: usize = 1 << 20;

const ATTR_TEXT: u8 = 0;
const ATTR_DOUBLE: u8 = 1;
const ATTR_INT: u8 = 2;

/// Decode a volume container from the given byte source, which may be gzip
/// compressed.
pub fn read_volume<R: Read>(source: R) -> Result<MemVolume> {
    let mut source = BufReader::new(source);
    let gz = is_gz_stream(source.fill_buf()?);
    let stream = if gz {
        Either::Left(GzDecoder::new(source))
    } else {
        Either::Right(source)
    };
    read_container(ByteOrdered::le(stream))
}

/// Encode a volume container into the given sink, gzip compressed with the
/// given level if any.
pub fn write_volume<W: Write>(volume: &MemVolume, sink: W, compression: Option<u32>) -> Result<()> {
    match compression {
        Some(level) => {
            let mut encoder = GzEncoder::new(sink, Compression::new(level));
            write_container(volume, &mut encoder)?;
            encoder.finish()?.flush()?;
        }
        None => write_container(volume, sink)?,
    }
    Ok(())
}

fn read_container<R, E>(mut input: ByteOrdered<R, E>) -> Result<MemVolume>
where
    R: Read,
    E: Endian,
{
    let mut magic = [0u8; 4];
    input.read_exact(&mut magic)?;
    if &magic != MAGIC_CODE {
        return Err(MincError::InvalidFormat);
    }
    let version = input.read_u16()?;
    if version != VERSION {
        return Err(MincError::InvalidCode("container version", i64::from(version)));
    }

    let store_type = NativeType::from_code(input.read_i32()?)?;
    if store_type.scalar_size().is_none() {
        return Err(MincError::UnsupportedNativeType(store_type.code()));
    }
    let class = DataClass::from_code(input.read_u8()?)?;
    let slice_scaling = read_flag(&mut input)?;
    let valid_range = (input.read_f64()?, input.read_f64()?);
    let volume_range = (input.read_f64()?, input.read_f64()?);

    let ndims = input.read_u32()?;
    if ndims == 0 || ndims > MAX_DIMS {
        return Err(MincError::InvalidCode("dimension count", i64::from(ndims)));
    }
    let mut dims = Vec::with_capacity(ndims as usize);
    for _ in 0..ndims {
        let name = read_name(&mut input)?;
        let length = input.read_u64()?;
        let step = input.read_f64()?;
        let start = input.read_f64()?;
        let irregular = read_flag(&mut input)?;
        let cosines = if read_flag(&mut input)? {
            Some([input.read_f64()?, input.read_f64()?, input.read_f64()?])
        } else {
            None
        };
        dims.push(MemDimension {
            name,
            length,
            step,
            start,
            cosines,
            irregular,
            voxel_order: VoxelOrder::File,
        });
    }

    let lengths: Vec<u64> = dims.iter().map(|d| d.length).collect();
    let nvoxels = element_count(&lengths).ok_or(MincError::InvalidFormat)?;
    let nslices = element_count(&lengths[..MemVolume::slice_dims_of(lengths.len())])
        .ok_or(MincError::InvalidFormat)?;

    let n = input.read_u64()?;
    if n != nslices as u64 {
        return Err(MincError::InvalidFormat);
    }
    let mut slice_ranges = Vec::with_capacity(nslices.min(PREALLOC_LIMIT));
    for _ in 0..nslices {
        slice_ranges.push((input.read_f64()?, input.read_f64()?));
    }

    let attributes = read_attributes(&mut input)?;

    let n = input.read_u64()?;
    if n != nvoxels as u64 {
        return Err(MincError::InvalidFormat);
    }
    let mut voxels = Vec::with_capacity(nvoxels.min(PREALLOC_LIMIT));
    for _ in 0..nvoxels {
        voxels.push(read_voxel(&mut input, store_type)?);
    }

    Ok(MemVolume::from_parts(
        dims,
        store_type,
        class,
        slice_scaling,
        valid_range,
        volume_range,
        slice_ranges,
        attributes,
        voxels,
    ))
}

fn write_container<W: Write>(volume: &MemVolume, sink: W) -> Result<()> {
    let mut out = ByteOrdered::le(sink);
    out.write_all(MAGIC_CODE)?;
    out.write_u16(VERSION)?;
    out.write_i32(volume.store_type.code())?;
    out.write_u8(volume.class as u8)?;
    out.write_u8(volume.slice_scaling as u8)?;
    out.write_f64(volume.valid_range.0)?;
    out.write_f64(volume.valid_range.1)?;
    out.write_f64(volume.volume_range.0)?;
    out.write_f64(volume.volume_range.1)?;

    out.write_u32(volume.dims.len() as u32)?;
    for dim in &volume.dims {
        write_name(&mut out, &dim.name)?;
        out.write_u64(dim.length)?;
        out.write_f64(dim.step)?;
        out.write_f64(dim.start)?;
        out.write_u8(dim.irregular as u8)?;
        match dim.cosines {
            Some(cosines) => {
                out.write_u8(1)?;
                for c in &cosines {
                    out.write_f64(*c)?;
                }
            }
            None => out.write_u8(0)?,
        }
    }

    out.write_u64(volume.slice_ranges.len() as u64)?;
    for (min, max) in &volume.slice_ranges {
        out.write_f64(*min)?;
        out.write_f64(*max)?;
    }

    out.write_u32(volume.attributes.len() as u32)?;
    for (group, attributes) in &volume.attributes {
        write_name(&mut out, group)?;
        out.write_u32(attributes.len() as u32)?;
        for (name, value) in attributes {
            write_name(&mut out, name)?;
            match value {
                AttributeValue::Text(text) => {
                    out.write_u8(ATTR_TEXT)?;
                    write_text(&mut out, text)?;
                }
                AttributeValue::Double(values) => {
                    out.write_u8(ATTR_DOUBLE)?;
                    out.write_u32(values.len() as u32)?;
                    for v in values {
                        out.write_f64(*v)?;
                    }
                }
                AttributeValue::Int(values) => {
                    out.write_u8(ATTR_INT)?;
                    out.write_u32(values.len() as u32)?;
                    for v in values {
                        out.write_i32(*v)?;
                    }
                }
            }
        }
    }

    out.write_u64(volume.voxels.len() as u64)?;
    for v in &volume.voxels {
        write_voxel(&mut out, volume.store_type, *v)?;
    }
    out.flush()?;
    Ok(())
}

fn read_attributes<R, E>(input: &mut ByteOrdered<R, E>) -> Result<Metadata>
where
    R: Read,
    E: Endian,
{
    let mut attributes = BTreeMap::new();
    let ngroups = input.read_u32()?;
    for _ in 0..ngroups {
        let group = read_name(input)?;
        let mut entries = BTreeMap::new();
        let nattr = input.read_u32()?;
        for _ in 0..nattr {
            let name = read_name(input)?;
            let value = match input.read_u8()? {
                ATTR_TEXT => AttributeValue::Text(read_text(input)?),
                ATTR_DOUBLE => {
                    let n = input.read_u32()? as usize;
                    let mut values = Vec::with_capacity(n.min(PREALLOC_LIMIT));
                    for _ in 0..n {
                        values.push(input.read_f64()?);
                    }
                    AttributeValue::Double(values)
                }
                ATTR_INT => {
                    let n = input.read_u32()? as usize;
                    let mut values = Vec::with_capacity(n.min(PREALLOC_LIMIT));
                    for _ in 0..n {
                        values.push(input.read_i32()?);
                    }
                    AttributeValue::Int(values)
                }
                tag => return Err(MincError::InvalidCode("attribute tag", i64::from(tag))),
            };
            let _ = entries.insert(name, value);
        }
        let _ = attributes.insert(group, entries);
    }
    Ok(attributes)
}

fn read_flag<R, E>(input: &mut ByteOrdered<R, E>) -> Result<bool>
where
    R: Read,
    E: Endian,
{
    match input.read_u8()? {
        0 => Ok(false),
        1 => Ok(true),
        v => Err(MincError::InvalidCode("flag", i64::from(v))),
    }
}

/// Read a dimension, group or attribute name.
fn read_name<R, E>(input: &mut ByteOrdered<R, E>) -> Result<String>
where
    R: Read,
    E: Endian,
{
    let len = input.read_u32()? as usize;
    if len > MAX_NAME_LEN {
        return Err(MincError::InvalidCode("name length", len as i64));
    }
    let mut bytes = vec![0u8; len];
    input.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|_| MincError::InvalidFormat)
}

/// Read a text attribute value, which has no length limit of its own.
fn read_text<R, E>(input: &mut ByteOrdered<R, E>) -> Result<String>
where
    R: Read,
    E: Endian,
{
    let len = input.read_u32()? as usize;
    let mut bytes = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    let read = Read::take(&mut *input, len as u64).read_to_end(&mut bytes)?;
    if read != len {
        return Err(IOError::from(ErrorKind::UnexpectedEof).into());
    }
    String::from_utf8(bytes).map_err(|_| MincError::InvalidFormat)
}

fn write_name<W, E>(out: &mut ByteOrdered<W, E>, name: &str) -> Result<()>
where
    W: Write,
    E: Endian,
{
    if name.len() > MAX_NAME_LEN {
        return Err(MincError::InvalidCode("name length", name.len() as i64));
    }
    out.write_u32(name.len() as u32)?;
    out.write_all(name.as_bytes())?;
    Ok(())
}

fn write_text<W, E>(out: &mut ByteOrdered<W, E>, text: &str) -> Result<()>
where
    W: Write,
    E: Endian,
{
    let len = u32::try_from(text.len())
        .map_err(|_| MincError::InvalidCode("text length", text.len() as i64))?;
    out.write_u32(len)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

/// Read one stored voxel value of the given type from a byte source.
pub(crate) fn read_voxel<R, E>(input: &mut ByteOrdered<R, E>, ty: NativeType) -> Result<f64>
where
    R: Read,
    E: Endian,
{
    let v = match ty {
        NativeType::Byte => f64::from(input.read_i8()?),
        NativeType::UByte => f64::from(input.read_u8()?),
        NativeType::Short => f64::from(input.read_i16()?),
        NativeType::UShort => f64::from(input.read_u16()?),
        NativeType::Int => f64::from(input.read_i32()?),
        NativeType::UInt => f64::from(input.read_u32()?),
        NativeType::Float => f64::from(input.read_f32()?),
        NativeType::Double => input.read_f64()?,
        other => return Err(MincError::UnsupportedNativeType(other.code())),
    };
    Ok(v)
}

/// Write one voxel value as the given type, rounding and saturating into
/// the range of integer types.
pub(crate) fn write_voxel<W, E>(out: &mut ByteOrdered<W, E>, ty: NativeType, v: f64) -> Result<()>
where
    W: Write,
    E: Endian,
{
    match ty {
        NativeType::Byte => out.write_i8(v.round() as i8)?,
        NativeType::UByte => out.write_u8(v.round() as u8)?,
        NativeType::Short => out.write_i16(v.round() as i16)?,
        NativeType::UShort => out.write_u16(v.round() as u16)?,
        NativeType::Int => out.write_i32(v.round() as i32)?,
        NativeType::UInt => out.write_u32(v.round() as u32)?,
        NativeType::Float => out.write_f32(v as f32)?,
        NativeType::Double => out.write_f64(v)?,
        other => return Err(MincError::UnsupportedNativeType(other.code())),
    }
    Ok(())
}
