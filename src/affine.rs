//! Conversion between voxel indices and world coordinates.
//!
//! The world position of a voxel is the sum, over the X, Y and Z axes, of
//! the axis direction cosines scaled by `start + step * index`. An axis
//! without direction cosines points along its own world axis, and a missing
//! spatial axis maps its index to that world axis unchanged.
use crate::backend::StorageEngine;
use crate::dimension::Dimension;
use crate::error::{MincError, Result};
use crate::file::Minc2File;
use crate::typedef::DimensionKind;
use nalgebra::{Matrix3, Matrix4, Vector3};

/// Linear part of a voxel to world transformation.
pub type Affine3 = Matrix3<f64>;
/// Homogeneous voxel to world transformation.
pub type Affine4 = Matrix4<f64>;

const SPATIAL: [DimensionKind; 3] = [DimensionKind::X, DimensionKind::Y, DimensionKind::Z];

/// Separate a 4x4 affine into its 3x3 affine and translation components.
pub fn get_affine_and_translation(affine: &Affine4) -> (Affine3, Vector3<f64>) {
    let translation = Vector3::new(affine[(0, 3)], affine[(1, 3)], affine[(2, 3)]);
    let linear = affine.fixed_view::<3, 3>(0, 0).into_owned();
    (linear, translation)
}

/// Voxel to world affine of the given storage order dimensions, taking
/// `[x, y, z]` voxel indices.
pub fn voxel_to_world_affine(dims: &[Dimension]) -> Affine4 {
    let mut affine = Affine4::identity();
    for (col, &kind) in SPATIAL.iter().enumerate() {
        let (cosines, step, start) = match dims.iter().find(|d| d.kind == kind) {
            Some(d) => (
                d.direction_cosines.unwrap_or_else(|| unit_axis(col)),
                d.step,
                d.start,
            ),
            None => (unit_axis(col), 1., 0.),
        };
        for row in 0..3 {
            affine[(row, col)] = cosines[row] * step;
            affine[(row, 3)] += cosines[row] * start;
        }
    }
    affine
}

fn unit_axis(axis: usize) -> [f64; 3] {
    let mut cosines = [0.; 3];
    cosines[axis] = 1.;
    cosines
}

impl<E: StorageEngine> Minc2File<E> {
    /// Voxel to world affine of the volume, taking `[x, y, z]` voxel
    /// indices in native order.
    pub fn voxel_to_world_affine(&self) -> Result<Affine4> {
        Ok(voxel_to_world_affine(self.store_dimensions()?))
    }

    /// World coordinates of the voxel at `[x, y, z]`.
    pub fn voxel_to_world(&self, voxel: [f64; 3]) -> Result<[f64; 3]> {
        let (linear, translation) = get_affine_and_translation(&self.voxel_to_world_affine()?);
        let world = linear * Vector3::from(voxel) + translation;
        Ok([world.x, world.y, world.z])
    }

    /// Voxel indices, possibly fractional, of the world position `[x, y, z]`.
    pub fn world_to_voxel(&self, world: [f64; 3]) -> Result<[f64; 3]> {
        let (linear, translation) = get_affine_and_translation(&self.voxel_to_world_affine()?);
        let inverse = linear.try_inverse().ok_or(MincError::Singular)?;
        let voxel = inverse * (Vector3::from(world) - translation);
        Ok([voxel.x, voxel.y, voxel.z])
    }
}
