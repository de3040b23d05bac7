//! Typed transfers of voxel values between memory and the volume.
//!
//! Start and count vectors are given in the public convention of the active
//! order (fastest-varying axis first) and reversed into file order right
//! before the storage engine call. Buffers are laid out with the first
//! public axis varying fastest. The engine converts between the buffer type
//! and the store type, applying the scaling mode of the volume.

use crate::backend::{NativeVolume, StorageEngine};
use crate::element::{as_bytes, as_bytes_mut, DataElement};
use crate::error::{MincError, Result};
use crate::file::{Minc2File, VolumeState};
use crate::order;
use crate::scaling::{compute_write_range, Scaling};
use crate::typedef::to_native_type;
use crate::util::element_count;

impl<E: StorageEngine> Minc2File<E> {
    /// Read the whole volume, in the active order, into `buffer`.
    pub fn load_complete_volume<T: DataElement>(&self, buffer: &mut [T]) -> Result<()> {
        let (state, volume) = self.parts()?;
        let count = whole_volume(state, buffer.len())?;
        let start = vec![0; count.len()];
        volume.get_real_value_hyperslab(
            to_native_type(T::DATA_TYPE),
            &start,
            &count,
            as_bytes_mut(buffer),
        )
    }

    /// Read the whole volume, in the active order, into a new vector.
    pub fn load_complete_volume_vec<T: DataElement>(&self) -> Result<Vec<T>> {
        let mut buffer = vec![T::zeroed(); self.nelement()?];
        self.load_complete_volume(&mut buffer)?;
        Ok(buffer)
    }

    /// Write the whole volume, in the active order, from `buffer`.
    ///
    /// A globally scaled volume takes the exact range of the buffer as its
    /// real value range; a slice scaled volume takes the exact range of each
    /// slice.
    pub fn save_complete_volume<T: DataElement>(&mut self, buffer: &[T]) -> Result<()> {
        let (state, volume) = self.parts_mut()?;
        let count = whole_volume(state, buffer.len())?;
        match state.scaling {
            Scaling::Global => {
                if let Some((min, max)) = compute_write_range(buffer) {
                    volume.set_volume_range(min, max)?;
                }
            }
            Scaling::Slice => push_slice_ranges(volume, state, buffer)?,
            Scaling::Direct => {}
        }
        let start = vec![0; count.len()];
        volume.set_real_value_hyperslab(to_native_type(T::DATA_TYPE), &start, &count, as_bytes(buffer))
    }

    /// Read a hyperslab of the active order into `buffer`, which must hold
    /// exactly the product of `count` elements.
    pub fn read_hyperslab<T: DataElement>(&self, start: &[u64], count: &[u64], buffer: &mut [T]) -> Result<()> {
        let (state, volume) = self.parts()?;
        check_hyperslab(state, start, count, buffer.len())?;
        volume.get_real_value_hyperslab(
            to_native_type(T::DATA_TYPE),
            &order::to_file_order(start),
            &order::to_file_order(count),
            as_bytes_mut(buffer),
        )
    }

    /// Write a hyperslab of the active order from `buffer`, which must hold
    /// exactly the product of `count` elements. Scaling ranges are left as
    /// they are.
    pub fn write_hyperslab<T: DataElement>(&mut self, start: &[u64], count: &[u64], buffer: &[T]) -> Result<()> {
        let (state, volume) = self.parts_mut()?;
        check_hyperslab(state, start, count, buffer.len())?;
        volume.set_real_value_hyperslab(
            to_native_type(T::DATA_TYPE),
            &order::to_file_order(start),
            &order::to_file_order(count),
            as_bytes(buffer),
        )
    }
}

/// File order count vector of the whole volume in the active order.
fn whole_volume(state: &VolumeState, len: usize) -> Result<Vec<u64>> {
    let lengths = state.active_lengths();
    let expected = element_count(&lengths).ok_or_else(|| MincError::OutOfBounds(lengths.clone()))?;
    if len != expected {
        return Err(MincError::IncompatibleLength(expected, len));
    }
    Ok(order::to_file_order(&lengths))
}

fn check_hyperslab(state: &VolumeState, start: &[u64], count: &[u64], len: usize) -> Result<()> {
    let ndims = state.ndims();
    if start.len() != ndims {
        return Err(MincError::IncorrectDimensionality(ndims, start.len()));
    }
    if count.len() != ndims {
        return Err(MincError::IncorrectDimensionality(ndims, count.len()));
    }
    let expected = element_count(count).ok_or_else(|| MincError::OutOfBounds(count.to_vec()))?;
    if len != expected {
        return Err(MincError::IncompatibleLength(expected, len));
    }
    Ok(())
}

/// Compute the exact range of every slice of a whole volume buffer and push
/// it to the engine.
fn push_slice_ranges<V, T>(volume: &mut V, state: &VolumeState, buffer: &[T]) -> Result<()>
where
    V: NativeVolume,
    T: DataElement,
{
    let lengths = state.active_lengths();
    let source = state.active_source();
    let ndims = lengths.len();
    // slice axes are the store axes beyond the two fastest file dimensions
    let slice_ndim = volume.slice_dimension_count()?;
    let slice_axes: Vec<usize> = (0..ndims)
        .filter(|&j| source[j] + slice_ndim >= ndims)
        .collect();
    let nslices: usize = slice_axes.iter().map(|&j| lengths[j] as usize).product();

    let mut ranges: Vec<Option<(f64, f64)>> = vec![None; nslices];
    let mut pos = vec![0u64; ndims];
    for &v in buffer {
        let slice = slice_axes
            .iter()
            .rev()
            .fold(0usize, |acc, &j| acc * lengths[j] as usize + pos[j] as usize);
        let v: f64 = v.as_();
        if !v.is_nan() {
            ranges[slice] = Some(match ranges[slice] {
                Some((min, max)) => (min.min(v), max.max(v)),
                None => (v, v),
            });
        }
        for j in 0..ndims {
            pos[j] += 1;
            if pos[j] < lengths[j] {
                break;
            }
            pos[j] = 0;
        }
    }

    for (slice, range) in ranges.into_iter().enumerate() {
        if let Some((min, max)) = range {
            let mut coords = vec![0u64; ndims];
            let mut rest = slice;
            for &j in &slice_axes {
                let len = lengths[j] as usize;
                coords[j] = (rest % len) as u64;
                rest /= len;
            }
            volume.set_slice_range(&order::to_file_order(&coords), min, max)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::dimension::Dimension;
    use crate::error::MincError;
    use crate::file::Minc2File;
    use crate::typedef::{DimensionKind, MincType};
    use tempfile::tempdir;

    fn create(path: &std::path::Path, store_type: MincType, data_type: MincType) -> Minc2File {
        let dims = [
            Dimension::new(DimensionKind::X, 3, 1., 0.),
            Dimension::new(DimensionKind::Y, 2, 1., 0.),
            Dimension::new(DimensionKind::Z, 2, 1., 0.),
        ];
        let mut file = Minc2File::new();
        file.define(&dims, store_type, data_type).unwrap();
        file.create(path).unwrap();
        file
    }

    #[test]
    fn hyperslab_bookkeeping() {
        let dir = tempdir().unwrap();
        let mut file = create(&dir.path().join("a.mnc"), MincType::Short, MincType::Short);
        let mut buffer = [0i16; 4];
        assert!(matches!(
            file.read_hyperslab(&[0, 0], &[2, 2], &mut buffer),
            Err(MincError::IncorrectDimensionality(3, 2))
        ));
        assert!(matches!(
            file.read_hyperslab(&[0, 0, 0], &[2, 2, 2], &mut buffer),
            Err(MincError::IncompatibleLength(8, 4))
        ));
        assert!(matches!(
            file.save_complete_volume(&buffer),
            Err(MincError::IncompatibleLength(12, 4))
        ));

        // public axis 0 varies fastest
        file.write_hyperslab(&[0, 1, 1], &[3, 1, 1], &[7i16, 8, 9]).unwrap();
        let all: Vec<i16> = file.load_complete_volume_vec().unwrap();
        assert_eq!(&all[9..], &[7, 8, 9]);
        assert!(all[..9].iter().all(|&v| v == 0));
    }

    #[test]
    fn slice_ranges_follow_buffer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slices.mnc");
        let dims = [
            Dimension::new(DimensionKind::X, 2, 1., 0.),
            Dimension::new(DimensionKind::Y, 2, 1., 0.),
            Dimension::new(DimensionKind::Z, 3, 1., 0.),
        ];
        let mut file = Minc2File::new();
        file.define(&dims, MincType::UShort, MincType::Float).unwrap();
        file.set_scaling(false, true).unwrap();
        file.create(&path).unwrap();
        assert_eq!(file.slice_ndim().unwrap(), 1);

        let values: Vec<f32> = (0..12).map(|v| v as f32 * 10.).collect();
        file.save_complete_volume(&values).unwrap();
        assert_eq!(file.slice_range(&[0, 0, 0]).unwrap(), (0., 30.));
        assert_eq!(file.slice_range(&[1, 1, 1]).unwrap(), (40., 70.));
        assert_eq!(file.slice_range(&[0, 0, 2]).unwrap(), (80., 110.));

        let back: Vec<f32> = file.load_complete_volume_vec().unwrap();
        for (a, b) in back.iter().zip(&values) {
            assert!((a - b).abs() < 1e-2, "{} vs {}", a, b);
        }
    }
}
