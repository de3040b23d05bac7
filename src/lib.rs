//! Dimension-order agnostic access to MINC2 image volumes.
//!
//! A [`Minc2File`] opens or creates a volume through a storage engine,
//! discovers its dimensions and voxel type, and presents the voxels either in
//! the order they are stored or in a standardized order (vector, X, Y, Z,
//! time, fastest-varying first). Voxel values are converted and scaled on
//! every transfer, so buffers can be of any supported primitive type
//! regardless of how the volume is stored.
//!
//! Index vectors given to this crate list the fastest-varying axis first.
//!
//! # Example
//!
//! ```no_run
//! use minc2_simple::{Dimension, DimensionKind, Minc2File, MincType};
//! # use minc2_simple::Result;
//!
//! # fn run() -> Result<()> {
//! let mut out = Minc2File::new();
//! out.define(
//!     &[
//!         Dimension::new(DimensionKind::X, 64, 1., -32.),
//!         Dimension::new(DimensionKind::Y, 64, 1., -32.),
//!         Dimension::new(DimensionKind::Z, 32, 2., -32.),
//!     ],
//!     MincType::UShort,
//!     MincType::Float,
//! )?;
//! out.create("phantom.mnc")?;
//! out.save_complete_volume(&vec![0.5f32; out.nelement()?])?;
//! out.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! The storage engine is abstracted behind the traits of the [`backend`]
//! module; [`MemoryEngine`] is the engine used by default.
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[cfg(feature = "nalgebra_affine")]
pub mod affine;
#[cfg(feature = "ndarray_volumes")]
pub mod array;
pub mod backend;
pub mod dimension;
pub mod element;
pub mod error;
pub mod file;
pub mod metadata;
pub mod order;
pub mod scaling;
pub mod transfer;
pub mod typedef;
mod util;

pub use crate::backend::{
    AttributeValue, CreateOptions, MemVolume, MemoryEngine, Metadata, NativeVolume,
    StorageEngine,
};
pub use crate::dimension::Dimension;
pub use crate::element::DataElement;
pub use crate::error::{MincError, Result};
pub use crate::file::Minc2File;
pub use crate::metadata::copy_metadata;
pub use crate::scaling::Scaling;
pub use crate::typedef::{dimension_kind_name, type_name, DimensionKind, MincType};
