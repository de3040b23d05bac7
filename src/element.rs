//! This module defines the data element API, which enables volume handles to
//! read and write voxel buffers of any supported primitive type.
//!
//! Buffers are handed to the storage engine as plain byte views in native
//! endianness, so element types are restricted to plain old data.
use crate::typedef::MincType;
use bytemuck::Pod;
use num_traits::AsPrimitive;

/// Trait type for characterizing a voxel data element, implemented for the
/// primitive numeric types which can be used to represent voxel values in
/// memory.
pub trait DataElement: 'static + Sized + Copy + Pod + PartialOrd + AsPrimitive<f64> {
    /// The abstract voxel type mapped to the type T
    const DATA_TYPE: MincType;
}

macro_rules! impl_data_element {
    ($($t:ty => $dt:ident),* $(,)?) => {
        $(
            impl DataElement for $t {
                const DATA_TYPE: MincType = MincType::$dt;
            }
        )*
    };
}

impl_data_element! {
    u8 => UByte,
    i8 => Byte,
    u16 => UShort,
    i16 => Short,
    u32 => UInt,
    i32 => Int,
    f32 => Float,
    f64 => Double,
}

/// View a typed voxel buffer as raw bytes.
pub(crate) fn as_bytes<T: DataElement>(buffer: &[T]) -> &[u8] {
    bytemuck::cast_slice(buffer)
}

/// View a mutable typed voxel buffer as raw bytes.
pub(crate) fn as_bytes_mut<T: DataElement>(buffer: &mut [T]) -> &mut [u8] {
    bytemuck::cast_slice_mut(buffer)
}
