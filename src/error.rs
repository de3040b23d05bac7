//! Types for error handling go here.
use crate::typedef::{DimensionKind, MincType};
use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error kinds originated by this crate.
    #[derive(Debug)]
    pub enum MincError {
        /// The storage engine rejected an operation.
        Engine(msg: String) {
            display("Storage engine failure: {}", msg)
        }
        /// An axis name that does not classify into a known dimension kind.
        UnsupportedDimension(name: String) {
            display("Unsupported dimension type: {}", name)
        }
        /// The volume has no X, Y or Z axis.
        NoSpatialDimensions {
            display("No spatial dimensions found")
        }
        /// Vector and time axes cannot be present in the same volume.
        VectorAndTime {
            display("Time and vector dimensions are not supported simultaneously")
        }
        /// The same dimension kind was found on more than one axis.
        DuplicateDimension(kind: DimensionKind) {
            display("Dimension {} appears more than once", kind.name())
        }
        /// Global and slice scaling were requested at the same time.
        InvalidScaling {
            display("Global and slice scaling are mutually exclusive")
        }
        /// The handle was never opened or defined.
        NotInitialized {
            display("Volume handle is not opened or defined")
        }
        /// The handle already holds a created volume.
        AlreadyOpen {
            display("Volume handle already holds an open volume")
        }
        /// Data type not supported for voxel transfer.
        UnsupportedDataType(t: MincType) {
            display("Unsupported data type: {}", t.name())
        }
        /// Native storage type code without a counterpart.
        UnsupportedNativeType(code: i32) {
            display("Unsupported storage type code {}", code)
        }
        /// An invalid code was found in a field.
        InvalidCode(typename: &'static str, code: i64) {
            display("invalid code `{}` for {}", code, typename)
        }
        /// A start/count vector does not have one entry per axis.
        IncorrectDimensionality(expected: usize, got: usize) {
            display("Expected {} dimensions, got {}", expected, got)
        }
        /// The buffer does not hold exactly the requested number of voxels.
        IncompatibleLength(expected: usize, got: usize) {
            display("Buffer holds {} elements, {} were expected", got, expected)
        }
        /// An array does not have the shape of the volume.
        IncompatibleShape(expected: Vec<usize>, got: Vec<usize>) {
            display("Expected an array of shape {:?}, got {:?}", &expected[..], &got[..])
        }
        /// Attempted to access the volume outside its boundaries.
        OutOfBounds(coords: Vec<u64>) {
            display("Out of bounds access to volume: {:?}", &coords[..])
        }
        /// The apparent order does not cover every axis exactly once.
        AxisCountMismatch(expected: usize, got: usize) {
            display("Apparent order lists {} of {} dimensions", got, expected)
        }
        /// Attempted to read an invalid volume container.
        InvalidFormat {
            display("Invalid MINC volume container")
        }
        /// The voxel to world transformation cannot be inverted.
        Singular {
            display("Voxel to world transformation is singular")
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, MincError>;
