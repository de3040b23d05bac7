//! The boundary with the volume storage engine.
//!
//! Everything the volume handle needs from the underlying array-file engine
//! goes through the two traits declared here: [`StorageEngine`] opens and
//! creates volumes, and [`NativeVolume`] answers dimension queries, manages
//! scaling ranges and the apparent dimension order, and transfers typed
//! hyperslabs of real values. Index vectors crossing this boundary are always
//! in file convention: slowest-varying axis first.
//!
//! A reference implementation, [`MemoryEngine`](mem::MemoryEngine), is
//! provided in [`mem`].

pub mod codec;
pub mod mem;

pub use self::mem::{MemVolume, MemoryEngine};

use crate::error::{MincError, Result};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::collections::BTreeMap;
use std::path::Path;

/// Voxel types as enumerated by the storage engine.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum NativeType {
    /// 8-bit signed integer
    Byte = 1,
    /// 16-bit signed integer
    Short = 3,
    /// 32-bit signed integer
    Int = 4,
    /// 32-bit floating point
    Float = 5,
    /// 64-bit floating point
    Double = 6,
    /// ASCII string
    String = 7,
    /// 8-bit unsigned integer
    UByte = 100,
    /// 16-bit unsigned integer
    UShort = 101,
    /// 32-bit unsigned integer
    UInt = 102,
    /// 16-bit signed integer complex
    SComplex = 1000,
    /// 32-bit signed integer complex
    IComplex = 1001,
    /// 32-bit floating point complex
    FComplex = 1002,
    /// 64-bit floating point complex
    DComplex = 1003,
}

impl NativeType {
    /// Retrieve the type from its numeric code.
    pub fn from_code(code: i32) -> Result<NativeType> {
        FromPrimitive::from_i32(code).ok_or(MincError::UnsupportedNativeType(code))
    }

    /// The numeric code of this type.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Size of one scalar voxel of this type in bytes, `None` for
    /// types which cannot hold scalar voxel values.
    pub fn scalar_size(self) -> Option<usize> {
        use NativeType::*;
        match self {
            Byte | UByte => Some(1),
            Short | UShort => Some(2),
            Int | UInt | Float => Some(4),
            Double => Some(8),
            String | SComplex | IComplex | FComplex | DComplex => None,
        }
    }

    /// Whether values of this type are stored without scaling.
    pub fn is_floating_point(self) -> bool {
        matches!(self, NativeType::Float | NativeType::Double)
    }

    /// Full representable range of a scalar type.
    pub fn bounds(self) -> Option<(f64, f64)> {
        use NativeType::*;
        match self {
            Byte => Some((f64::from(i8::MIN), f64::from(i8::MAX))),
            UByte => Some((0., f64::from(u8::MAX))),
            Short => Some((f64::from(i16::MIN), f64::from(i16::MAX))),
            UShort => Some((0., f64::from(u16::MAX))),
            Int => Some((f64::from(i32::MIN), f64::from(i32::MAX))),
            UInt => Some((0., f64::from(u32::MAX))),
            Float => Some((f64::from(f32::MIN), f64::from(f32::MAX))),
            Double => Some((f64::MIN, f64::MAX)),
            String | SComplex | IComplex | FComplex | DComplex => None,
        }
    }
}

/// Class of the data held by a volume.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum DataClass {
    /// Real valued data
    Real = 0,
    /// Integer valued data
    Int = 1,
    /// Label data
    Label = 2,
    /// Complex valued data
    Complex = 3,
    /// Uniform record
    UniformRecord = 4,
    /// Non-uniform record
    NonUniformRecord = 5,
}

impl DataClass {
    /// Retrieve the class from its numeric code.
    pub fn from_code(code: u8) -> Result<DataClass> {
        FromPrimitive::from_u8(code).ok_or(MincError::InvalidCode("data class", i64::from(code)))
    }
}

/// Opaque handle to one dimension of a native volume.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct DimensionId(pub usize);

/// Voxel traversal direction of a dimension.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum VoxelOrder {
    /// Traverse voxels in the order they are stored
    File,
    /// Traverse voxels so that the world coordinate increases
    Positive,
}

/// Which ordering a dimension property query refers to.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum DimensionOrder {
    /// As stored in the file
    File,
    /// As seen through the apparent voxel order
    Apparent,
}

/// Declaration of one dimension of a volume about to be created.
#[derive(Debug, PartialEq, Clone)]
pub struct NativeDimension {
    /// Dimension name, such as `"xspace"`
    pub name: String,
    /// Number of samples
    pub length: u64,
    /// Spacing between samples
    pub step: f64,
    /// World coordinate of the first sample
    pub start: f64,
    /// Direction cosines, if defined
    pub cosines: Option<[f64; 3]>,
    /// Whether sampling is irregular
    pub irregular: bool,
}

/// Value of a metadata attribute.
#[derive(Debug, PartialEq, Clone)]
pub enum AttributeValue {
    /// Text attribute
    Text(String),
    /// Floating point array attribute
    Double(Vec<f64>),
    /// Integer array attribute
    Int(Vec<i32>),
}

/// Attributes of a volume, grouped by name.
pub type Metadata = BTreeMap<String, BTreeMap<String, AttributeValue>>;

/// Options for creating a new volume.
///
/// # Example
///
/// ```
/// use minc2_simple::CreateOptions;
///
/// let options = CreateOptions::new().compression(Some(4)).overwrite(false);
/// assert_eq!(options.compression_level(), Some(4));
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CreateOptions {
    compression: Option<u32>,
    overwrite: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        CreateOptions {
            compression: None,
            overwrite: true,
        }
    }
}

impl CreateOptions {
    /// Default options: no compression, overwriting existing files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression level (0 to 9), or `None` to store uncompressed.
    pub fn compression(mut self, level: Option<u32>) -> Self {
        self.compression = level.map(|l| l.min(9));
        self
    }

    /// Whether an existing file at the target path may be replaced.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// The configured compression level.
    pub fn compression_level(&self) -> Option<u32> {
        self.compression
    }

    /// Whether existing files are replaced.
    pub fn overwrites(&self) -> bool {
        self.overwrite
    }
}

/// An engine able to open existing volumes and create new ones.
pub trait StorageEngine {
    /// The concrete type of an open volume.
    type Volume: NativeVolume;

    /// Open an existing volume for reading.
    fn open_volume(&self, path: &Path) -> Result<Self::Volume>;

    /// Create a new volume with the given dimensions, declared in file order.
    fn create_volume(
        &self,
        path: &Path,
        dims: &[NativeDimension],
        store_type: NativeType,
        class: DataClass,
        options: &CreateOptions,
    ) -> Result<Self::Volume>;
}

/// An open volume of the storage engine.
pub trait NativeVolume {
    /// Number of dimensions of the volume.
    fn dimension_count(&self) -> Result<usize>;

    /// Dimension handles, in file order.
    fn dimensions(&self) -> Result<Vec<DimensionId>>;

    /// Name of a dimension.
    fn dimension_name(&self, dim: DimensionId) -> Result<String>;

    /// Number of samples along a dimension.
    fn dimension_size(&self, dim: DimensionId) -> Result<u64>;

    /// Spacing between samples along a dimension.
    fn dimension_separation(&self, dim: DimensionId, order: DimensionOrder) -> Result<f64>;

    /// World coordinate of the first sample along a dimension.
    fn dimension_start(&self, dim: DimensionId, order: DimensionOrder) -> Result<f64>;

    /// Direction cosines of a dimension, if defined.
    fn dimension_cosines(&self, dim: DimensionId) -> Result<Option<[f64; 3]>>;

    /// Whether sampling along a dimension is irregular.
    fn dimension_irregular(&self, dim: DimensionId) -> Result<bool>;

    /// Set the direction in which voxels along a dimension are traversed.
    fn set_dimension_apparent_voxel_order(&mut self, dim: DimensionId, order: VoxelOrder)
        -> Result<()>;

    /// Set the order used to interpret start and count vectors of
    /// subsequent hyperslab calls, slowest-varying dimension first.
    fn set_apparent_dimension_order(&mut self, order: &[DimensionId]) -> Result<()>;

    /// Voxel type as stored.
    fn data_type(&self) -> Result<NativeType>;

    /// Class of the stored data.
    fn data_class(&self) -> Result<DataClass>;

    /// Whether per-slice ranges are in use.
    fn slice_scaling_flag(&self) -> Result<bool>;

    /// Enable or disable per-slice ranges.
    fn set_slice_scaling_flag(&mut self, flag: bool) -> Result<()>;

    /// Range of stored voxel values, as `(min, max)`.
    fn valid_range(&self) -> Result<(f64, f64)>;

    /// Set the range of stored voxel values.
    fn set_valid_range(&mut self, min: f64, max: f64) -> Result<()>;

    /// Global range of real values, as `(min, max)`.
    fn volume_range(&self) -> Result<(f64, f64)>;

    /// Set the global range of real values.
    fn set_volume_range(&mut self, min: f64, max: f64) -> Result<()>;

    /// Number of dimensions spanning the slices.
    fn slice_dimension_count(&self) -> Result<usize>;

    /// Real value range of the slice containing the voxel at `start`
    /// (apparent order).
    fn slice_range(&self, start: &[u64]) -> Result<(f64, f64)>;

    /// Set the real value range of the slice containing the voxel at
    /// `start` (apparent order).
    fn set_slice_range(&mut self, start: &[u64], min: f64, max: f64) -> Result<()>;

    /// Read the real values of a hyperslab into `buffer`, converted to `ty`.
    fn get_real_value_hyperslab(
        &self,
        ty: NativeType,
        start: &[u64],
        count: &[u64],
        buffer: &mut [u8],
    ) -> Result<()>;

    /// Write the real values in `buffer`, of type `ty`, into a hyperslab.
    fn set_real_value_hyperslab(
        &mut self,
        ty: NativeType,
        start: &[u64],
        count: &[u64],
        buffer: &[u8],
    ) -> Result<()>;

    /// Names of the attribute groups.
    fn attribute_groups(&self) -> Result<Vec<String>>;

    /// Names of the attributes of a group.
    fn attribute_names(&self, group: &str) -> Result<Vec<String>>;

    /// Fetch one attribute, `None` if missing.
    fn attribute(&self, group: &str, name: &str) -> Result<Option<AttributeValue>>;

    /// Create or replace one attribute.
    fn set_attribute(&mut self, group: &str, name: &str, value: AttributeValue) -> Result<()>;

    /// Copy every attribute of `other` into this volume.
    fn copy_attributes_from<V: NativeVolume + ?Sized>(&mut self, other: &V) -> Result<()> {
        for group in other.attribute_groups()? {
            for name in other.attribute_names(&group)? {
                if let Some(value) = other.attribute(&group, &name)? {
                    self.set_attribute(&group, &name, value)?;
                }
            }
        }
        Ok(())
    }

    /// Flush and release the volume. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Release a volume whose creation could not be completed, removing
    /// anything already written for it.
    fn discard(&mut self) -> Result<()>;
}
