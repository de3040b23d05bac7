//! Module holding the in-memory reference implementation of the storage
//! engine.
//!
//! Volumes are held fully in memory as stored (voxel) values in file order,
//! last dimension varying fastest. Created volumes are persisted with the
//! [`codec`](super::codec) container when closed; opened volumes are
//! read-only.

use super::codec;
use super::{
    AttributeValue, CreateOptions, DataClass, DimensionId, DimensionOrder, Metadata,
    NativeDimension, NativeType, NativeVolume, StorageEngine, VoxelOrder,
};
use crate::error::{MincError, Result};
use crate::util::{element_count, is_gz_file};
use byteordered::ByteOrdered;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Compression level used for `.gz` destinations without an explicit level.
const DEFAULT_GZ_LEVEL: u32 = 6;

/// Storage engine keeping volumes in memory and persisting them as
/// self-describing container files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryEngine;

impl MemoryEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        MemoryEngine
    }
}

impl StorageEngine for MemoryEngine {
    type Volume = MemVolume;

    fn open_volume(&self, path: &Path) -> Result<MemVolume> {
        let volume = MemVolume::from_reader(File::open(path)?)?;
        debug!(
            "opened {} ({} dimensions, {:?})",
            path.display(),
            volume.dims.len(),
            volume.store_type
        );
        Ok(volume)
    }

    fn create_volume(
        &self,
        path: &Path,
        dims: &[NativeDimension],
        store_type: NativeType,
        class: DataClass,
        options: &CreateOptions,
    ) -> Result<MemVolume> {
        if !options.overwrites() && path.exists() {
            return Err(MincError::Engine(format!(
                "{} already exists",
                path.display()
            )));
        }
        let mut volume = MemVolume::new(dims, store_type, class)?;
        // fail early on an unwritable destination
        let _ = File::create(path)?;
        let compression = options.compression_level().or_else(|| {
            if is_gz_file(path) {
                Some(DEFAULT_GZ_LEVEL)
            } else {
                None
            }
        });
        volume.sink = Some(Sink {
            path: path.to_path_buf(),
            compression,
        });
        debug!("created {} ({:?})", path.display(), store_type);
        Ok(volume)
    }
}

/// Destination of a writable volume.
#[derive(Debug, PartialEq, Clone)]
struct Sink {
    path: PathBuf,
    compression: Option<u32>,
}

/// One dimension of a [`MemVolume`].
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct MemDimension {
    pub(crate) name: String,
    pub(crate) length: u64,
    pub(crate) step: f64,
    pub(crate) start: f64,
    pub(crate) cosines: Option<[f64; 3]>,
    pub(crate) irregular: bool,
    pub(crate) voxel_order: VoxelOrder,
}

impl MemDimension {
    #[cfg(test)]
    pub(crate) fn new(name: &str, length: u64, step: f64, start: f64) -> Self {
        MemDimension {
            name: name.to_string(),
            length,
            step,
            start,
            cosines: None,
            irregular: false,
            voxel_order: VoxelOrder::File,
        }
    }

    /// Whether apparent traversal runs against the file order.
    fn flipped(&self) -> bool {
        self.voxel_order == VoxelOrder::Positive && self.step < 0.
    }

    /// Map an apparent index to the file index.
    fn file_index(&self, i: u64) -> u64 {
        if self.flipped() {
            self.length - 1 - i
        } else {
            i
        }
    }
}

/// A volume of the [`MemoryEngine`].
#[derive(Debug, PartialEq, Clone)]
pub struct MemVolume {
    pub(crate) dims: Vec<MemDimension>,
    pub(crate) store_type: NativeType,
    pub(crate) class: DataClass,
    pub(crate) slice_scaling: bool,
    pub(crate) valid_range: (f64, f64),
    pub(crate) volume_range: (f64, f64),
    pub(crate) slice_ranges: Vec<(f64, f64)>,
    pub(crate) attributes: Metadata,
    pub(crate) voxels: Vec<f64>,
    apparent: Vec<DimensionId>,
    sink: Option<Sink>,
    #[cfg(test)]
    pub(crate) reject_apparent_order: bool,
}

impl MemVolume {
    /// Build a new zero-filled volume with the given dimensions, declared in
    /// file order. Valid and real ranges both start as the store type's
    /// full bounds.
    pub fn new(dims: &[NativeDimension], store_type: NativeType, class: DataClass) -> Result<Self> {
        if dims.is_empty() {
            return Err(MincError::Engine(
                "a volume needs at least one dimension".to_string(),
            ));
        }
        let bounds = store_type.bounds().ok_or_else(|| {
            MincError::Engine(format!("unsupported voxel type {:?}", store_type))
        })?;
        let dims: Vec<MemDimension> = dims
            .iter()
            .map(|d| MemDimension {
                name: d.name.clone(),
                length: d.length,
                step: d.step,
                start: d.start,
                cosines: d.cosines,
                irregular: d.irregular,
                voxel_order: VoxelOrder::File,
            })
            .collect();
        let lengths: Vec<u64> = dims.iter().map(|d| d.length).collect();
        let too_large = || MincError::Engine("volume is too large".to_string());
        let nvoxels = element_count(&lengths).ok_or_else(too_large)?;
        let nslices =
            element_count(&lengths[..Self::slice_dims_of(lengths.len())]).ok_or_else(too_large)?;

        Ok(MemVolume {
            dims,
            store_type,
            class,
            slice_scaling: false,
            valid_range: bounds,
            volume_range: bounds,
            slice_ranges: vec![(0., 1.); nslices],
            attributes: Metadata::new(),
            voxels: vec![0.; nvoxels],
            apparent: Vec::new(),
            sink: None,
            #[cfg(test)]
            reject_apparent_order: false,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        dims: Vec<MemDimension>,
        store_type: NativeType,
        class: DataClass,
        slice_scaling: bool,
        valid_range: (f64, f64),
        volume_range: (f64, f64),
        slice_ranges: Vec<(f64, f64)>,
        attributes: Metadata,
        voxels: Vec<f64>,
    ) -> Self {
        MemVolume {
            dims,
            store_type,
            class,
            slice_scaling,
            valid_range,
            volume_range,
            slice_ranges,
            attributes,
            voxels,
            apparent: Vec::new(),
            sink: None,
            #[cfg(test)]
            reject_apparent_order: false,
        }
    }

    /// Decode a read-only volume from a container byte stream.
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        codec::read_volume(source)
    }

    /// Encode this volume as a container, optionally gzip compressed.
    pub fn write_to<W: Write>(&self, sink: W, compression: Option<u32>) -> Result<()> {
        codec::write_volume(self, sink, compression)
    }

    /// Number of leading (slowest) file dimensions spanning the slices of a
    /// volume with `ndims` dimensions.
    pub(crate) fn slice_dims_of(ndims: usize) -> usize {
        ndims.saturating_sub(2)
    }

    fn dim(&self, dim: DimensionId) -> Result<&MemDimension> {
        self.dims
            .get(dim.0)
            .ok_or_else(|| MincError::Engine(format!("invalid dimension handle {}", dim.0)))
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.sink.is_some() {
            Ok(())
        } else {
            Err(MincError::Engine(
                "volume is not open for writing".to_string(),
            ))
        }
    }

    /// File dimension indices in apparent order.
    fn apparent_order(&self) -> Vec<usize> {
        if self.apparent.is_empty() {
            (0..self.dims.len()).collect()
        } else {
            self.apparent.iter().map(|d| d.0).collect()
        }
    }

    fn file_strides(&self) -> Vec<usize> {
        let mut strides = vec![1usize; self.dims.len()];
        for d in (0..self.dims.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * self.dims[d + 1].length as usize;
        }
        strides
    }

    fn image_size(&self) -> usize {
        self.dims[Self::slice_dims_of(self.dims.len())..]
            .iter()
            .map(|d| d.length as usize)
            .product()
    }

    fn slice_of(&self, offset: usize) -> usize {
        match self.image_size() {
            0 => 0,
            image => offset / image,
        }
    }

    /// Linear file offsets of every voxel of a hyperslab, listed in
    /// apparent order with the last apparent dimension varying fastest.
    fn hyperslab_offsets(&self, start: &[u64], count: &[u64]) -> Result<Vec<usize>> {
        let n = self.dims.len();
        if start.len() != n {
            return Err(MincError::IncorrectDimensionality(n, start.len()));
        }
        if count.len() != n {
            return Err(MincError::IncorrectDimensionality(n, count.len()));
        }
        let order = self.apparent_order();
        for (k, &d) in order.iter().enumerate() {
            let fits = start[k]
                .checked_add(count[k])
                .map_or(false, |end| end <= self.dims[d].length);
            if !fits {
                return Err(MincError::OutOfBounds(start.to_vec()));
            }
        }
        let total = element_count(count).ok_or_else(|| MincError::OutOfBounds(count.to_vec()))?;
        let mut offsets = Vec::with_capacity(total);
        if total == 0 {
            return Ok(offsets);
        }

        let strides = self.file_strides();
        let mut pos = vec![0u64; n];
        loop {
            let offset: usize = order
                .iter()
                .enumerate()
                .map(|(k, &d)| self.dims[d].file_index(start[k] + pos[k]) as usize * strides[d])
                .sum();
            offsets.push(offset);

            let mut k = n;
            loop {
                if k == 0 {
                    return Ok(offsets);
                }
                k -= 1;
                pos[k] += 1;
                if pos[k] < count[k] {
                    break;
                }
                pos[k] = 0;
            }
        }
    }

    /// Linear index of the slice holding the voxel at `start`, given in
    /// apparent order.
    fn slice_index(&self, start: &[u64]) -> Result<usize> {
        let n = self.dims.len();
        if start.len() != n {
            return Err(MincError::IncorrectDimensionality(n, start.len()));
        }
        let mut file_idx = vec![0u64; n];
        for (k, d) in self.apparent_order().into_iter().enumerate() {
            let dim = &self.dims[d];
            if start[k] >= dim.length {
                return Err(MincError::OutOfBounds(start.to_vec()));
            }
            file_idx[d] = dim.file_index(start[k]);
        }
        Ok((0..Self::slice_dims_of(n)).fold(0usize, |slice, d| {
            slice * self.dims[d].length as usize + file_idx[d] as usize
        }))
    }

    fn real_range(&self, slice: usize) -> (f64, f64) {
        if self.slice_scaling {
            self.slice_ranges.get(slice).copied().unwrap_or((0., 1.))
        } else {
            self.volume_range
        }
    }

    fn voxel_to_real(&self, stored: f64, slice: usize) -> f64 {
        if self.store_type.is_floating_point() {
            return stored;
        }
        let (vmin, vmax) = self.valid_range;
        let (rmin, rmax) = self.real_range(slice);
        if (rmin, rmax) == (vmin, vmax) {
            stored
        } else if vmax == vmin {
            rmin
        } else {
            rmin + (stored - vmin) * (rmax - rmin) / (vmax - vmin)
        }
    }

    fn real_to_voxel(&self, real: f64, slice: usize) -> f64 {
        match self.store_type {
            NativeType::Float => f64::from(real as f32),
            NativeType::Double => real,
            _ => {
                let (vmin, vmax) = self.valid_range;
                let (rmin, rmax) = self.real_range(slice);
                let stored = if (rmin, rmax) == (vmin, vmax) {
                    real
                } else if rmax == rmin {
                    vmin
                } else {
                    vmin + (real - rmin) * (vmax - vmin) / (rmax - rmin)
                };
                stored.round().max(vmin).min(vmax)
            }
        }
    }
}

impl NativeVolume for MemVolume {
    fn dimension_count(&self) -> Result<usize> {
        Ok(self.dims.len())
    }

    fn dimensions(&self) -> Result<Vec<DimensionId>> {
        Ok((0..self.dims.len()).map(DimensionId).collect())
    }

    fn dimension_name(&self, dim: DimensionId) -> Result<String> {
        Ok(self.dim(dim)?.name.clone())
    }

    fn dimension_size(&self, dim: DimensionId) -> Result<u64> {
        Ok(self.dim(dim)?.length)
    }

    fn dimension_separation(&self, dim: DimensionId, order: DimensionOrder) -> Result<f64> {
        let d = self.dim(dim)?;
        Ok(match order {
            DimensionOrder::Apparent if d.flipped() => -d.step,
            _ => d.step,
        })
    }

    fn dimension_start(&self, dim: DimensionId, order: DimensionOrder) -> Result<f64> {
        let d = self.dim(dim)?;
        Ok(match order {
            DimensionOrder::Apparent if d.flipped() && d.length > 0 => {
                d.start + d.step * (d.length - 1) as f64
            }
            _ => d.start,
        })
    }

    fn dimension_cosines(&self, dim: DimensionId) -> Result<Option<[f64; 3]>> {
        Ok(self.dim(dim)?.cosines)
    }

    fn dimension_irregular(&self, dim: DimensionId) -> Result<bool> {
        Ok(self.dim(dim)?.irregular)
    }

    fn set_dimension_apparent_voxel_order(
        &mut self,
        dim: DimensionId,
        order: VoxelOrder,
    ) -> Result<()> {
        let _ = self.dim(dim)?;
        self.dims[dim.0].voxel_order = order;
        Ok(())
    }

    fn set_apparent_dimension_order(&mut self, order: &[DimensionId]) -> Result<()> {
        #[cfg(test)]
        {
            if self.reject_apparent_order {
                return Err(MincError::Engine("apparent order rejected".to_string()));
            }
        }
        let n = self.dims.len();
        if order.len() != n {
            return Err(MincError::AxisCountMismatch(n, order.len()));
        }
        let mut seen = vec![false; n];
        for dim in order {
            match seen.get_mut(dim.0) {
                Some(s) if !*s => *s = true,
                _ => {
                    return Err(MincError::Engine(format!(
                        "invalid apparent dimension order {:?}",
                        order
                    )))
                }
            }
        }
        self.apparent = order.to_vec();
        Ok(())
    }

    fn data_type(&self) -> Result<NativeType> {
        Ok(self.store_type)
    }

    fn data_class(&self) -> Result<DataClass> {
        Ok(self.class)
    }

    fn slice_scaling_flag(&self) -> Result<bool> {
        Ok(self.slice_scaling)
    }

    fn set_slice_scaling_flag(&mut self, flag: bool) -> Result<()> {
        self.ensure_writable()?;
        self.slice_scaling = flag;
        Ok(())
    }

    fn valid_range(&self) -> Result<(f64, f64)> {
        Ok(self.valid_range)
    }

    fn set_valid_range(&mut self, min: f64, max: f64) -> Result<()> {
        self.ensure_writable()?;
        if !(min <= max) {
            return Err(MincError::Engine(format!(
                "invalid valid range [{}, {}]",
                min, max
            )));
        }
        self.valid_range = (min, max);
        Ok(())
    }

    fn volume_range(&self) -> Result<(f64, f64)> {
        Ok(self.volume_range)
    }

    fn set_volume_range(&mut self, min: f64, max: f64) -> Result<()> {
        self.ensure_writable()?;
        if !(min <= max) {
            return Err(MincError::Engine(format!(
                "invalid real range [{}, {}]",
                min, max
            )));
        }
        self.volume_range = (min, max);
        Ok(())
    }

    fn slice_dimension_count(&self) -> Result<usize> {
        Ok(Self::slice_dims_of(self.dims.len()))
    }

    fn slice_range(&self, start: &[u64]) -> Result<(f64, f64)> {
        let slice = self.slice_index(start)?;
        Ok(self.slice_ranges[slice])
    }

    fn set_slice_range(&mut self, start: &[u64], min: f64, max: f64) -> Result<()> {
        self.ensure_writable()?;
        let slice = self.slice_index(start)?;
        self.slice_ranges[slice] = (min, max);
        Ok(())
    }

    fn get_real_value_hyperslab(
        &self,
        ty: NativeType,
        start: &[u64],
        count: &[u64],
        buffer: &mut [u8],
    ) -> Result<()> {
        let size = ty
            .scalar_size()
            .ok_or(MincError::UnsupportedNativeType(ty.code()))?;
        let offsets = self.hyperslab_offsets(start, count)?;
        if buffer.len() != offsets.len() * size {
            return Err(MincError::IncompatibleLength(
                offsets.len() * size,
                buffer.len(),
            ));
        }
        let mut out = ByteOrdered::native(buffer);
        for offset in offsets {
            let real = self.voxel_to_real(self.voxels[offset], self.slice_of(offset));
            codec::write_voxel(&mut out, ty, real)?;
        }
        Ok(())
    }

    fn set_real_value_hyperslab(
        &mut self,
        ty: NativeType,
        start: &[u64],
        count: &[u64],
        buffer: &[u8],
    ) -> Result<()> {
        self.ensure_writable()?;
        let size = ty
            .scalar_size()
            .ok_or(MincError::UnsupportedNativeType(ty.code()))?;
        let offsets = self.hyperslab_offsets(start, count)?;
        if buffer.len() != offsets.len() * size {
            return Err(MincError::IncompatibleLength(
                offsets.len() * size,
                buffer.len(),
            ));
        }
        let mut input = ByteOrdered::native(buffer);
        for offset in offsets {
            let real = codec::read_voxel(&mut input, ty)?;
            let stored = self.real_to_voxel(real, self.slice_of(offset));
            self.voxels[offset] = stored;
        }
        Ok(())
    }

    fn attribute_groups(&self) -> Result<Vec<String>> {
        Ok(self.attributes.keys().cloned().collect())
    }

    fn attribute_names(&self, group: &str) -> Result<Vec<String>> {
        self.attributes
            .get(group)
            .map(|g| g.keys().cloned().collect())
            .ok_or_else(|| MincError::Engine(format!("no attribute group `{}`", group)))
    }

    fn attribute(&self, group: &str, name: &str) -> Result<Option<AttributeValue>> {
        Ok(self
            .attributes
            .get(group)
            .and_then(|g| g.get(name))
            .cloned())
    }

    fn set_attribute(&mut self, group: &str, name: &str, value: AttributeValue) -> Result<()> {
        self.ensure_writable()?;
        let _ = self
            .attributes
            .entry(group.to_string())
            .or_default()
            .insert(name.to_string(), value);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(sink) = self.sink.take() {
            self.write_to(BufWriter::new(File::create(&sink.path)?), sink.compression)?;
            debug!("wrote {}", sink.path.display());
        }
        Ok(())
    }

    fn discard(&mut self) -> Result<()> {
        if let Some(sink) = self.sink.take() {
            std::fs::remove_file(&sink.path)?;
            debug!("discarded {}", sink.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declare(name: &str, length: u64, step: f64, start: f64) -> NativeDimension {
        NativeDimension {
            name: name.to_string(),
            length,
            step,
            start,
            cosines: None,
            irregular: false,
        }
    }

    /// A writable 2x3 volume (yspace slowest) whose voxels hold their own
    /// file offset.
    fn ramp(store_type: NativeType) -> MemVolume {
        let dims = [declare("yspace", 2, 1., 0.), declare("xspace", 3, -2., 10.)];
        let mut volume = MemVolume::new(&dims, store_type, DataClass::Real).unwrap();
        volume.sink = Some(Sink {
            path: PathBuf::from("unused.mnc"),
            compression: None,
        });
        for (i, v) in volume.voxels.iter_mut().enumerate() {
            *v = i as f64;
        }
        volume
    }

    fn read_f64(volume: &MemVolume, start: &[u64], count: &[u64]) -> Vec<f64> {
        let n: u64 = count.iter().product();
        let mut bytes = vec![0u8; n as usize * 8];
        volume
            .get_real_value_hyperslab(NativeType::Double, start, count, &mut bytes)
            .unwrap();
        bytemuck::pod_collect_to_vec(&bytes)
    }

    #[test]
    fn defaults_on_creation() {
        let volume = ramp(NativeType::UByte);
        assert_eq!(volume.valid_range().unwrap(), (0., 255.));
        assert_eq!(volume.volume_range().unwrap(), (0., 255.));
        assert_eq!(volume.slice_dimension_count().unwrap(), 0);
        assert_eq!(volume.dimension_count().unwrap(), 2);
        assert!(MemVolume::new(&[], NativeType::UByte, DataClass::Real).is_err());
        assert!(MemVolume::new(
            &[declare("xspace", 2, 1., 0.)],
            NativeType::FComplex,
            DataClass::Complex
        )
        .is_err());
    }

    #[test]
    fn file_order_hyperslab() {
        let volume = ramp(NativeType::Short);
        assert_eq!(read_f64(&volume, &[0, 0], &[2, 3]), vec![0., 1., 2., 3., 4., 5.]);
        assert_eq!(read_f64(&volume, &[1, 1], &[1, 2]), vec![4., 5.]);
        assert!(volume
            .get_real_value_hyperslab(NativeType::Double, &[1, 2], &[1, 2], &mut [0u8; 16])
            .is_err());
        assert!(volume
            .get_real_value_hyperslab(NativeType::Double, &[0, 0], &[1, 1], &mut [0u8; 4])
            .is_err());
    }

    #[test]
    fn apparent_order_and_positive_voxel_order() {
        let mut volume = ramp(NativeType::Short);
        volume
            .set_apparent_dimension_order(&[DimensionId(1), DimensionId(0)])
            .unwrap();
        assert_eq!(read_f64(&volume, &[0, 0], &[3, 2]), vec![0., 3., 1., 4., 2., 5.]);

        volume
            .set_dimension_apparent_voxel_order(DimensionId(1), VoxelOrder::Positive)
            .unwrap();
        assert_eq!(read_f64(&volume, &[0, 0], &[3, 2]), vec![2., 5., 1., 4., 0., 3.]);
        assert_eq!(
            volume
                .dimension_separation(DimensionId(1), DimensionOrder::Apparent)
                .unwrap(),
            2.
        );
        assert_eq!(
            volume
                .dimension_start(DimensionId(1), DimensionOrder::Apparent)
                .unwrap(),
            6.
        );
        assert_eq!(
            volume
                .dimension_separation(DimensionId(1), DimensionOrder::File)
                .unwrap(),
            -2.
        );
    }

    #[test]
    fn bad_apparent_order() {
        let mut volume = ramp(NativeType::Short);
        match volume.set_apparent_dimension_order(&[DimensionId(1)]) {
            Err(MincError::AxisCountMismatch(2, 1)) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(volume
            .set_apparent_dimension_order(&[DimensionId(1), DimensionId(1)])
            .is_err());
        assert!(volume
            .set_apparent_dimension_order(&[DimensionId(0), DimensionId(2)])
            .is_err());
    }

    #[test]
    fn global_scaling() {
        let mut volume = ramp(NativeType::UByte);
        volume.set_volume_range(-1., 1.).unwrap();
        let values = [-1.0f64, 1.0, 0.0, 0.5, -0.5, 2.0];
        volume
            .set_real_value_hyperslab(
                NativeType::Double,
                &[0, 0],
                &[2, 3],
                bytemuck::cast_slice(&values),
            )
            .unwrap();
        assert_eq!(volume.voxels[0], 0.);
        assert_eq!(volume.voxels[1], 255.);
        // out of range values are clamped
        assert_eq!(volume.voxels[5], 255.);
        let back = read_f64(&volume, &[0, 0], &[2, 3]);
        for (got, expected) in back.iter().zip(&[-1.0, 1.0, 0.0, 0.5, -0.5, 1.0]) {
            assert!((got - expected).abs() <= 1.5 / 255., "{} vs {}", got, expected);
        }
    }

    #[test]
    fn slice_scaling() {
        let dims = [
            declare("zspace", 2, 1., 0.),
            declare("yspace", 1, 1., 0.),
            declare("xspace", 2, 1., 0.),
        ];
        let mut volume = MemVolume::new(&dims, NativeType::UShort, DataClass::Real).unwrap();
        volume.sink = Some(Sink {
            path: PathBuf::from("unused.mnc"),
            compression: None,
        });
        volume.set_slice_scaling_flag(true).unwrap();
        assert_eq!(volume.slice_dimension_count().unwrap(), 1);
        volume.set_slice_range(&[0, 0, 0], 0., 10.).unwrap();
        volume.set_slice_range(&[1, 0, 1], 100., 200.).unwrap();
        assert_eq!(volume.slice_range(&[1, 0, 0]).unwrap(), (100., 200.));

        let values = [0.0f64, 10.0, 100.0, 200.0];
        volume
            .set_real_value_hyperslab(
                NativeType::Double,
                &[0, 0, 0],
                &[2, 1, 2],
                bytemuck::cast_slice(&values),
            )
            .unwrap();
        assert_eq!(volume.voxels, vec![0., 65535., 0., 65535.]);
        assert_eq!(read_f64(&volume, &[0, 0, 0], &[2, 1, 2]), values.to_vec());
    }

    #[test]
    fn float_store_is_unscaled() {
        let mut volume = ramp(NativeType::Float);
        volume.set_volume_range(0., 1.).unwrap();
        let values = [0.1f64, 1000.25, -3.5, 0., 7., 8.];
        volume
            .set_real_value_hyperslab(
                NativeType::Double,
                &[0, 0],
                &[2, 3],
                bytemuck::cast_slice(&values),
            )
            .unwrap();
        let back = read_f64(&volume, &[0, 0], &[2, 3]);
        assert_eq!(back[1], 1000.25);
        assert_eq!(back[0], f64::from(0.1f32));
    }

    #[test]
    fn read_only_rejects_writes() {
        let mut volume = ramp(NativeType::UByte);
        volume.sink = None;
        assert!(volume.set_volume_range(0., 1.).is_err());
        assert!(volume
            .set_attribute("patient", "name", AttributeValue::Text("x".to_string()))
            .is_err());
        assert!(volume
            .set_real_value_hyperslab(NativeType::UByte, &[0, 0], &[1, 1], &[1])
            .is_err());
        // apparent order does not modify the stored data
        assert!(volume
            .set_apparent_dimension_order(&[DimensionId(1), DimensionId(0)])
            .is_ok());
    }

    #[test]
    fn attributes() {
        let mut volume = ramp(NativeType::UByte);
        volume
            .set_attribute("patient", "name", AttributeValue::Text("anon".to_string()))
            .unwrap();
        volume
            .set_attribute("acquisition", "echo_time", AttributeValue::Double(vec![0.03]))
            .unwrap();
        assert_eq!(
            volume.attribute_groups().unwrap(),
            vec!["acquisition".to_string(), "patient".to_string()]
        );
        assert_eq!(volume.attribute_names("patient").unwrap(), vec!["name".to_string()]);
        assert!(volume.attribute_names("study").is_err());
        assert_eq!(volume.attribute("patient", "age").unwrap(), None);

        let mut other = ramp(NativeType::Short);
        other.copy_attributes_from(&volume).unwrap();
        assert_eq!(other.attributes, volume.attributes);
    }
}
