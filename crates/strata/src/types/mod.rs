// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! Closed catalog of payload types supported by the entity registry.
//!
//! Every value held by an [`EntityRegistry`](crate::registry::EntityRegistry)
//! is one of the fourteen kinds declared here. The catalog is closed: the
//! [`Payload`] trait is sealed and implemented exactly once per kind, and all
//! per-kind code in the crate is generated from the single `for_each_kind!`
//! list, so the set (and its dispatch order) cannot drift between call sites.
//!
//! # Dispatch order
//!
//! Runtime dispatch (`EntityRegistry::visit` and friends) probes kinds in
//! [`Kind`] declaration order: `String` first, then the signed and unsigned
//! integers narrow to wide, then the floating-point and complex kinds.
//! Callers relying on first-match semantics get exactly this order.

use std::fmt;

/// Tag identifying one member of the closed set of supported payload types.
///
/// Declaration order is the documented runtime dispatch order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    /// Variable-length UTF-8 string.
    String,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// IEEE-754 single precision.
    Float,
    /// IEEE-754 double precision.
    Double,
    /// Extended-precision float, carried as opaque bytes (see [`LongDouble`]).
    LongDouble,
    /// Complex number with `f32` components.
    ComplexFloat,
    /// Complex number with `f64` components.
    ComplexDouble,
}

impl Kind {
    /// Stable string rendering used in diagnostics and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
            Self::ComplexFloat => "complex float",
            Self::ComplexDouble => "complex double",
        }
    }

    /// Per-element payload size in bytes, `None` for variable-length kinds.
    #[must_use]
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Self::String => None,
            Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float => Some(4),
            Self::Int64 | Self::UInt64 | Self::Double | Self::ComplexFloat => Some(8),
            Self::LongDouble | Self::ComplexDouble => Some(16),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complex number with `f32` components.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct Complex32 {
    /// Real part.
    pub re: f32,
    /// Imaginary part.
    pub im: f32,
}

impl Complex32 {
    /// Build from real and imaginary parts.
    #[must_use]
    pub fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.re, self.im)
    }
}

/// Complex number with `f64` components.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct Complex64 {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex64 {
    /// Build from real and imaginary parts.
    #[must_use]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.re, self.im)
    }
}

/// Opaque stand-in for the C `long double` payload kind.
///
/// Rust has no native extended-precision float, so the registry carries the
/// raw 16-byte storage unchanged. Producers that need the numeric value
/// convert at the boundary; this crate only moves the bytes.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct LongDouble(pub [u8; 16]);

impl fmt::Display for LongDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in self.0.iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

pub(crate) mod sealed {
    /// Implemented only by the fourteen catalog types; closes [`super::Payload`].
    pub trait Sealed {}
}

/// A concrete payload type belonging to the catalog.
///
/// Sealed: exactly the fourteen types listed by [`Kind`] implement it. The
/// store-selection methods are crate plumbing for the registry's per-kind
/// stores and are hidden from the public surface.
pub trait Payload:
    sealed::Sealed + Clone + fmt::Debug + fmt::Display + Default + 'static
{
    /// The kind tag for this payload type. Never changes for a given `T`.
    const KIND: Kind;

    #[doc(hidden)]
    fn store(stores: &crate::registry::KindStores) -> &crate::registry::EntityStore<Self>;

    #[doc(hidden)]
    fn store_mut(
        stores: &mut crate::registry::KindStores,
    ) -> &mut crate::registry::EntityStore<Self>;
}

/// The single authoritative kind list: `(variant, store field, Rust type)`.
///
/// Every per-kind expansion in the crate (store declarations, `Payload`
/// impls, visit dispatch) consumes this list, so the catalog and its
/// dispatch order have exactly one definition.
macro_rules! for_each_kind {
    ($apply:ident) => {
        $apply! {
            (String, string, ::std::string::String),
            (Int8, int8, i8),
            (Int16, int16, i16),
            (Int32, int32, i32),
            (Int64, int64, i64),
            (UInt8, uint8, u8),
            (UInt16, uint16, u16),
            (UInt32, uint32, u32),
            (UInt64, uint64, u64),
            (Float, float, f32),
            (Double, double, f64),
            (LongDouble, long_double, $crate::types::LongDouble),
            (ComplexFloat, complex_float, $crate::types::Complex32),
            (ComplexDouble, complex_double, $crate::types::Complex64),
        }
    };
}
pub(crate) use for_each_kind;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_rendering_is_stable() {
        assert_eq!(Kind::Int8.as_str(), "int8");
        assert_eq!(Kind::Double.to_string(), "double");
        assert_eq!(Kind::LongDouble.as_str(), "long double");
        assert_eq!(Kind::ComplexFloat.as_str(), "complex float");
        assert_eq!(Kind::String.as_str(), "string");
    }

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(Kind::String.fixed_size(), None);
        assert_eq!(Kind::UInt8.fixed_size(), Some(1));
        assert_eq!(Kind::Float.fixed_size(), Some(4));
        assert_eq!(Kind::ComplexFloat.fixed_size(), Some(8));
        assert_eq!(Kind::ComplexDouble.fixed_size(), Some(16));
        assert_eq!(Kind::LongDouble.fixed_size(), Some(16));
    }

    #[test]
    fn test_payload_kind_tags() {
        assert_eq!(<String as Payload>::KIND, Kind::String);
        assert_eq!(<i64 as Payload>::KIND, Kind::Int64);
        assert_eq!(<f64 as Payload>::KIND, Kind::Double);
        assert_eq!(<Complex64 as Payload>::KIND, Kind::ComplexDouble);
    }

    #[test]
    fn test_complex_display() {
        assert_eq!(Complex64::new(1.5, -2.0).to_string(), "(1.5,-2)");
    }
}
