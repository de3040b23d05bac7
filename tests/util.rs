use minc2_simple::backend::{DataClass, NativeDimension, NativeType, NativeVolume};
use minc2_simple::{CreateOptions, Dimension, DimensionKind, MemoryEngine, Minc2File, MincType, StorageEngine};
use std::path::Path;

/// Regular X, Y and Z axes of the given lengths, in that order.
#[allow(dead_code)]
pub fn xyz(lengths: [u64; 3]) -> Vec<Dimension> {
    vec![
        Dimension::new(DimensionKind::X, lengths[0], 1., 0.),
        Dimension::new(DimensionKind::Y, lengths[1], 1., 0.),
        Dimension::new(DimensionKind::Z, lengths[2], 1., 0.),
    ]
}

/// Define and create a volume at `path`.
#[allow(dead_code)]
pub fn create(path: &Path, dims: &[Dimension], store_type: MincType, data_type: MincType) -> Minc2File {
    let mut file = Minc2File::new();
    file.define(dims, store_type, data_type).unwrap();
    file.create(path).unwrap();
    file
}

/// Write a volume straight through the storage engine, bypassing axis name
/// checks. `dims` holds `(name, length)` pairs in file order; voxels hold
/// their own file offset.
#[allow(dead_code)]
pub fn write_raw(path: &Path, dims: &[(&str, u64)]) {
    let decls: Vec<NativeDimension> = dims
        .iter()
        .map(|&(name, length)| NativeDimension {
            name: name.to_string(),
            length,
            step: 1.,
            start: 0.,
            cosines: None,
            irregular: false,
        })
        .collect();
    let mut volume = MemoryEngine
        .create_volume(path, &decls, NativeType::Short, DataClass::Real, &CreateOptions::default())
        .unwrap();
    let count: Vec<u64> = dims.iter().map(|d| d.1).collect();
    let n: u64 = count.iter().product();
    let values: Vec<i16> = (0..n as i16).collect();
    volume
        .set_real_value_hyperslab(
            NativeType::Short,
            &vec![0; dims.len()],
            &count,
            bytemuck::cast_slice(&values),
        )
        .unwrap();
    volume.close().unwrap();
}
