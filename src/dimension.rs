//! The dimension model: descriptors of the axes of a volume, and their
//! discovery from the storage engine.
//!
//! Descriptor sequences held by a volume handle always end with the
//! [`Dimension::END`] sentinel. Axis indices in this module follow the
//! public convention, in which the fastest-varying axis comes first.

use crate::backend::{DimensionId, DimensionOrder, NativeDimension, NativeVolume};
use crate::error::{MincError, Result};
use crate::typedef::DimensionKind;
use log::error;

/// Descriptor of one volume axis.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Dimension {
    /// The kind of axis
    pub kind: DimensionKind,
    /// Number of voxels along the axis
    pub length: u64,
    /// Whether the axis is sampled irregularly
    pub irregular: bool,
    /// Signed world spacing between voxels
    pub step: f64,
    /// World coordinate of the voxel at index 0
    pub start: f64,
    /// Direction cosines, meaningful for spatial axes only
    pub direction_cosines: Option<[f64; 3]>,
}

impl Dimension {
    /// The terminating descriptor of a dimension sequence.
    pub const END: Dimension = Dimension {
        kind: DimensionKind::End,
        length: 0,
        irregular: false,
        step: 0.,
        start: 0.,
        direction_cosines: None,
    };

    /// A regularly sampled axis without direction cosines.
    pub fn new(kind: DimensionKind, length: u64, step: f64, start: f64) -> Self {
        Dimension {
            kind,
            length,
            irregular: false,
            step,
            start,
            direction_cosines: None,
        }
    }

    /// Attach direction cosines to this axis.
    pub fn with_cosines(mut self, cosines: [f64; 3]) -> Self {
        self.direction_cosines = Some(cosines);
        self
    }

    /// Mark this axis as irregularly sampled.
    pub fn with_irregular(mut self, irregular: bool) -> Self {
        self.irregular = irregular;
        self
    }

    /// Whether this is the sequence terminator.
    pub fn is_end(&self) -> bool {
        self.kind == DimensionKind::End
    }
}

impl DimensionKind {
    /// Classify a storage engine axis name.
    pub fn from_dimension_name(name: &str) -> Option<DimensionKind> {
        match name {
            "xspace" | "xfrequency" => Some(DimensionKind::X),
            "yspace" | "yfrequency" => Some(DimensionKind::Y),
            "zspace" | "zfrequency" => Some(DimensionKind::Z),
            "time" | "tfrequency" => Some(DimensionKind::Time),
            "vector_dimension" => Some(DimensionKind::Vector),
            _ => None,
        }
    }

    /// The axis name used when declaring this kind to the storage engine.
    pub fn dimension_name(self) -> Option<&'static str> {
        match self {
            DimensionKind::X => Some("xspace"),
            DimensionKind::Y => Some("yspace"),
            DimensionKind::Z => Some("zspace"),
            DimensionKind::Time => Some("time"),
            DimensionKind::Vector => Some("vector_dimension"),
            DimensionKind::Unknown | DimensionKind::End => None,
        }
    }
}

/// The leading part of `dims` up to, and excluding, the first sentinel.
pub fn terminated(dims: &[Dimension]) -> &[Dimension] {
    let end = dims.iter().position(Dimension::is_end).unwrap_or(dims.len());
    &dims[..end]
}

/// Check the axis kinds of a volume: every axis is classified, no kind is
/// repeated, vector and time are not both present, and at least one
/// spatial axis exists.
pub fn validate(dims: &[Dimension]) -> Result<()> {
    let mut seen = [false; 6];
    for dim in dims {
        let slot = match dim.kind {
            DimensionKind::Unknown | DimensionKind::End => {
                error!("Unsupported dimension type: {}", dim.kind.name());
                return Err(MincError::UnsupportedDimension(dim.kind.name().to_string()));
            }
            kind => kind as usize,
        };
        if seen[slot] {
            error!("Dimension {} appears more than once", dim.kind.name());
            return Err(MincError::DuplicateDimension(dim.kind));
        }
        seen[slot] = true;
    }
    if seen[DimensionKind::Vector as usize] && seen[DimensionKind::Time as usize] {
        error!("Time and vector dimensions are not supported simultaneously");
        return Err(MincError::VectorAndTime);
    }
    if !dims.iter().any(|d| d.kind.is_spatial()) {
        error!("No spatial dimensions found");
        return Err(MincError::NoSpatialDimensions);
    }
    Ok(())
}

/// Dimensions of an opened volume, as discovered from the storage engine.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct StorageLayout {
    /// Descriptors in public order, followed by the sentinel
    pub dims: Vec<Dimension>,
    /// Engine handles in file order
    pub file_dims: Vec<DimensionId>,
}

/// Query every dimension of `volume` and express them in public order: file
/// axis `i` becomes axis `ndims - 1 - i`.
pub(crate) fn populate_from_storage<V: NativeVolume + ?Sized>(volume: &V) -> Result<StorageLayout> {
    let ndims = volume.dimension_count()?;
    let file_dims = volume.dimensions()?;
    if file_dims.len() != ndims {
        return Err(MincError::AxisCountMismatch(ndims, file_dims.len()));
    }

    let mut dims = vec![Dimension::END; ndims + 1];
    for (i, &id) in file_dims.iter().enumerate() {
        let name = volume.dimension_name(id)?;
        let kind = DimensionKind::from_dimension_name(&name).ok_or_else(|| {
            error!("Unsupported dimension type: {}", name);
            MincError::UnsupportedDimension(name.clone())
        })?;
        dims[ndims - 1 - i] = Dimension {
            kind,
            length: volume.dimension_size(id)?,
            irregular: volume.dimension_irregular(id)?,
            step: volume.dimension_separation(id, DimensionOrder::File)?,
            start: volume.dimension_start(id, DimensionOrder::File)?,
            direction_cosines: volume.dimension_cosines(id)?,
        };
    }
    validate(&dims[..ndims])?;

    Ok(StorageLayout { dims, file_dims })
}

/// Declarations of the given public order descriptors, in file order.
pub(crate) fn to_native_declarations(dims: &[Dimension]) -> Result<Vec<NativeDimension>> {
    dims.iter()
        .rev()
        .map(|d| {
            let name = d
                .kind
                .dimension_name()
                .ok_or_else(|| MincError::UnsupportedDimension(d.kind.name().to_string()))?;
            Ok(NativeDimension {
                name: name.to_string(),
                length: d.length,
                step: d.step,
                start: d.start,
                cosines: d.direction_cosines,
                irregular: d.irregular,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DataClass, MemVolume, NativeType};
    use pretty_assertions::assert_eq;

    fn axis(kind: DimensionKind, length: u64) -> Dimension {
        Dimension::new(kind, length, 1., 0.)
    }

    #[test]
    fn classify_names() {
        assert_eq!(DimensionKind::from_dimension_name("xspace"), Some(DimensionKind::X));
        assert_eq!(DimensionKind::from_dimension_name("yfrequency"), Some(DimensionKind::Y));
        assert_eq!(DimensionKind::from_dimension_name("zspace"), Some(DimensionKind::Z));
        assert_eq!(DimensionKind::from_dimension_name("tfrequency"), Some(DimensionKind::Time));
        assert_eq!(
            DimensionKind::from_dimension_name("vector_dimension"),
            Some(DimensionKind::Vector)
        );
        assert_eq!(DimensionKind::from_dimension_name("wspace"), None);
        assert_eq!(DimensionKind::End.dimension_name(), None);
    }

    #[test]
    fn sentinel_terminates() {
        let dims = [axis(DimensionKind::X, 3), Dimension::END, axis(DimensionKind::Y, 4)];
        assert_eq!(terminated(&dims), &dims[..1]);
        assert_eq!(terminated(&dims[..1]), &dims[..1]);
        assert!(terminated(&[Dimension::END]).is_empty());
    }

    #[test]
    fn invariants() {
        use DimensionKind::*;
        assert!(validate(&[axis(Vector, 3), axis(X, 4), axis(Y, 5)]).is_ok());
        assert!(validate(&[axis(X, 4), axis(Time, 5)]).is_ok());
        match validate(&[axis(Vector, 3), axis(X, 4), axis(Time, 5)]) {
            Err(MincError::VectorAndTime) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
        match validate(&[axis(X, 4), axis(X, 5)]) {
            Err(MincError::DuplicateDimension(X)) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
        match validate(&[axis(Time, 5)]) {
            Err(MincError::NoSpatialDimensions) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
        match validate(&[axis(X, 4), axis(Unknown, 5)]) {
            Err(MincError::UnsupportedDimension(_)) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn populate_reverses_file_order() {
        let dims = [
            axis(DimensionKind::X, 4),
            Dimension::new(DimensionKind::Y, 5, -2., 10.).with_cosines([0., 1., 0.]),
            axis(DimensionKind::Z, 6),
        ];
        let decls = to_native_declarations(&dims).unwrap();
        assert_eq!(decls[0].name, "zspace");
        assert_eq!(decls[2].name, "xspace");

        let volume = MemVolume::new(&decls, NativeType::Short, DataClass::Real).unwrap();
        let layout = populate_from_storage(&volume).unwrap();
        assert_eq!(&layout.dims[..3], &dims[..]);
        assert!(layout.dims[3].is_end());
        assert_eq!(
            layout.file_dims,
            vec![DimensionId(0), DimensionId(1), DimensionId(2)]
        );
    }
}
