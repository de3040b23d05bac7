//! Resolution of the voxel value scaling mode of a volume.
//!
//! A volume either stores real values directly, maps them through one global
//! range, or maps them through one range per slice. The mode is inferred
//! from the file when opening, and from the store and representation types
//! when defining a new volume.

use crate::element::DataElement;
use crate::error::{MincError, Result};
use crate::typedef::{to_native_type, MincType};
use num_traits::AsPrimitive;

/// How real voxel values relate to stored values.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Scaling {
    /// Values are stored as they are
    Direct,
    /// One real value range for the whole volume
    Global,
    /// One real value range per slice
    Slice,
}

impl Scaling {
    /// Build the mode from the two scaling flags, which are mutually
    /// exclusive.
    pub fn from_flags(global: bool, slice: bool) -> Result<Scaling> {
        match (global, slice) {
            (true, true) => Err(MincError::InvalidScaling),
            (true, false) => Ok(Scaling::Global),
            (false, true) => Ok(Scaling::Slice),
            (false, false) => Ok(Scaling::Direct),
        }
    }

    /// Whether per-slice real value ranges are in use.
    pub fn is_slice(self) -> bool {
        self == Scaling::Slice
    }

    /// Whether stored values go through any range mapping.
    pub fn is_scaled(self) -> bool {
        self != Scaling::Direct
    }
}

/// Scaling of an existing volume. The slice scaling flag is taken as is;
/// otherwise a real range differing from the valid range implies global
/// scaling.
pub fn resolve_on_open(slice_flag: bool, valid_range: (f64, f64), real_range: (f64, f64)) -> Scaling {
    if slice_flag {
        Scaling::Slice
    } else if valid_range != real_range {
        Scaling::Global
    } else {
        Scaling::Direct
    }
}

/// Scaling of a new volume: values are stored directly when both types are
/// floating point or both are integral, and globally scaled otherwise.
pub fn resolve_on_define(store_type: MincType, data_type: MincType) -> Scaling {
    let both_float = store_type.is_floating_point() && data_type.is_floating_point();
    let both_integral = store_type.is_integral() && data_type.is_integral();
    if both_float || both_integral {
        Scaling::Direct
    } else {
        Scaling::Global
    }
}

/// The in-memory type presented for an opened volume.
pub fn representation_type(store_type: MincType, scaling: Scaling) -> MincType {
    match (scaling.is_scaled(), store_type) {
        (false, t) => t,
        (true, MincType::Double) => MincType::Double,
        (true, _) => MincType::Float,
    }
}

/// Full representable range of an integral store type, `None` otherwise.
pub fn integral_valid_range(store_type: MincType) -> Option<(f64, f64)> {
    if store_type.is_integral() {
        to_native_type(store_type).bounds()
    } else {
        None
    }
}

/// Exact minimum and maximum of a buffer, `None` if it is empty or holds
/// only NaN values.
pub fn compute_write_range<T: DataElement>(buffer: &[T]) -> Option<(f64, f64)> {
    buffer
        .iter()
        .map(|v| AsPrimitive::<f64>::as_(*v))
        .filter(|v| !v.is_nan())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
