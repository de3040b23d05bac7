//! This module contains the enumerations shared by the whole crate: the
//! abstract voxel type ([`MincType`]) and the dimension kinds
//! ([`DimensionKind`]), along with the mapping of voxel types to and from the
//! storage engine's own type enumeration.
//!
//! Numeric codes of the abstract types were chosen to coincide with the
//! storage engine codes. The two conversion functions are nevertheless kept
//! apart, so that one side can be renumbered without breaking callers.

use crate::backend::NativeType;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Data type for representing a voxel value type, either as stored on disk
/// or as represented in memory.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum MincType {
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

impl MincType {
    /// Retrieve the type from its numeric code, if recognized.
    pub fn from_code(code: i32) -> Option<MincType> {
        FromPrimitive::from_i32(code)
    }

    /// The numeric code of this type.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Whether this is a real floating point type.
    pub fn is_floating_point(self) -> bool {
        matches!(self, MincType::Float | MincType::Double)
    }

    /// Whether this is a (signed or unsigned) 8, 16 or 32-bit integer type.
    pub fn is_integral(self) -> bool {
        use MincType::*;
        matches!(self, Byte | Short | Int | UByte | UShort | UInt)
    }

    /// Human readable name of the type.
    pub fn name(self) -> &'static str {
        use MincType::*;
        match self {
            Byte => "Byte",
            Short => "Short",
            Int => "Int",
            Float => "Float",
            Double => "Double",
            String => "String",
            UByte => "Unsigned Byte",
            UShort => "Unsigned Short",
            UInt => "Unsigned Int",
            SComplex => "Complex Short",
            IComplex => "Complex Int",
            FComplex => "Complex Float",
            DComplex => "Complex Double",
        }
    }
}

/// The kind of a volume axis.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum DimensionKind {
    /// Unclassified axis
    Unknown = 0,
    /// X spatial axis
    X = 1,
    /// Y spatial axis
    Y = 2,
    /// Z spatial axis
    Z = 3,
    /// Time axis
    Time = 4,
    /// Vector (component) axis
    Vector = 5,
    /// Terminator of a dimension sequence
    End = 255,
}

impl DimensionKind {
    /// Retrieve the kind from its numeric code, if recognized.
    pub fn from_code(code: i32) -> Option<DimensionKind> {
        FromPrimitive::from_i32(code)
    }

    /// Whether this is one of the X, Y or Z axes.
    pub fn is_spatial(self) -> bool {
        matches!(self, DimensionKind::X | DimensionKind::Y | DimensionKind::Z)
    }

    /// Human readable name of the dimension kind.
    pub fn name(self) -> &'static str {
        match self {
            DimensionKind::Unknown => "Unknown",
            DimensionKind::X => "X",
            DimensionKind::Y => "Y",
            DimensionKind::Z => "Z",
            DimensionKind::Time => "Time",
            DimensionKind::Vector => "Vector",
            DimensionKind::End => "End",
        }
    }
}

/// Map an abstract voxel type to the storage engine's type.
pub fn to_native_type(t: MincType) -> NativeType {
    match t {
        MincType::Byte => NativeType::Byte,
        MincType::Short => NativeType::Short,
        MincType::Int => NativeType::Int,
        MincType::Float => NativeType::Float,
        MincType::Double => NativeType::Double,
        MincType::String => NativeType::String,
        MincType::UByte => NativeType::UByte,
        MincType::UShort => NativeType::UShort,
        MincType::UInt => NativeType::UInt,
        MincType::SComplex => NativeType::SComplex,
        MincType::IComplex => NativeType::IComplex,
        MincType::FComplex => NativeType::FComplex,
        MincType::DComplex => NativeType::DComplex,
    }
}

/// Map a storage engine type to the abstract voxel type.
pub fn to_abstract_type(t: NativeType) -> MincType {
    match t {
        NativeType::Byte => MincType::Byte,
        NativeType::Short => MincType::Short,
        NativeType::Int => MincType::Int,
        NativeType::Float => MincType::Float,
        NativeType::Double => MincType::Double,
        NativeType::String => MincType::String,
        NativeType::UByte => MincType::UByte,
        NativeType::UShort => MincType::UShort,
        NativeType::UInt => MincType::UInt,
        NativeType::SComplex => MincType::SComplex,
        NativeType::IComplex => MincType::IComplex,
        NativeType::FComplex => MincType::FComplex,
        NativeType::DComplex => MincType::DComplex,
    }
}

/// Human readable name of a voxel type code, `"Unknown"` if not recognized.
pub fn type_name(code: i32) -> &'static str {
    MincType::from_code(code).map_or("Unknown", MincType::name)
}

/// Human readable name of a dimension kind code, `"Unknown"` if not
/// recognized.
pub fn dimension_kind_name(code: i32) -> &'static str {
    DimensionKind::from_code(code).map_or("Unknown", DimensionKind::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TYPES: [MincType; 13] = [
        MincType::Byte,
        MincType::Short,
        MincType::Int,
        MincType::Float,
        MincType::Double,
        MincType::String,
        MincType::UByte,
        MincType::UShort,
        MincType::UInt,
        MincType::SComplex,
        MincType::IComplex,
        MincType::FComplex,
        MincType::DComplex,
    ];

    #[test]
    fn native_mapping_preserves_codes() {
        for &t in ALL_TYPES.iter() {
            let native = to_native_type(t);
            assert_eq!(native.code(), t.code());
            assert_eq!(to_abstract_type(native), t);
        }
    }

    #[test]
    fn names() {
        assert_eq!(type_name(100), "Unsigned Byte");
        assert_eq!(type_name(6), "Double");
        assert_eq!(type_name(2), "Unknown");
        assert_eq!(type_name(-1), "Unknown");
        assert_eq!(dimension_kind_name(1), "X");
        assert_eq!(dimension_kind_name(5), "Vector");
        assert_eq!(dimension_kind_name(255), "End");
        assert_eq!(dimension_kind_name(42), "Unknown");
    }

    #[test]
    fn type_classes() {
        assert!(MincType::UShort.is_integral());
        assert!(!MincType::UShort.is_floating_point());
        assert!(MincType::Double.is_floating_point());
        assert!(!MincType::FComplex.is_floating_point());
        assert!(!MincType::String.is_integral());
    }
}
