//! Planning of the standardized dimension order, and the transform between
//! public and file index conventions.
//!
//! Public index vectors list the fastest-varying axis first. The storage
//! engine expects file convention, slowest-varying axis first. Every index
//! vector crossing that boundary goes through [`to_file_order`] or
//! [`to_public_order`].

use crate::dimension::Dimension;
use crate::typedef::DimensionKind;

/// Axis kinds of the standardized order, fastest-varying first.
pub const STANDARD_ORDER: [DimensionKind; 5] = [
    DimensionKind::Vector,
    DimensionKind::X,
    DimensionKind::Y,
    DimensionKind::Z,
    DimensionKind::Time,
];

/// Reverse a public order index vector into file order.
pub fn to_file_order<T: Copy>(public: &[T]) -> Vec<T> {
    public.iter().rev().copied().collect()
}

/// Reverse a file order index vector into public order.
pub fn to_public_order<T: Copy>(file: &[T]) -> Vec<T> {
    file.iter().rev().copied().collect()
}

/// Store axis indices in standardized public order. Axes of a kind outside
/// [`STANDARD_ORDER`] are left out, so a short plan means the volume cannot
/// be standardized.
pub fn standard_plan(store_dims: &[Dimension]) -> Vec<usize> {
    STANDARD_ORDER
        .iter()
        .filter_map(|&kind| store_dims.iter().position(|d| d.kind == kind))
        .collect()
}

/// Index of the storage engine's file order dimension holding store axis
/// `axis` of a volume with `ndims` dimensions.
pub fn file_index(ndims: usize, axis: usize) -> usize {
    ndims - 1 - axis
}
