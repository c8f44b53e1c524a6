//! Field values as they travel between a record and the wire.

/// Number of entries in a short-array field.
pub const MAX_STATS: usize = 32;

/// A field value lifted out of a record.
///
/// Comparison for delta purposes is bitwise ([`same_bits`](Self::same_bits)):
/// `-0.0` differs from `0.0`, and a NaN equals itself.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldValue {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Shorts([i16; MAX_STATS]),
}

impl FieldValue {
    /// Returns `true` if both values have identical wire bits.
    #[must_use]
    pub fn same_bits(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Vec3(a), Self::Vec3(b)) => same_floats(a, b),
            (Self::Vec4(a), Self::Vec4(b)) => same_floats(a, b),
            (Self::Shorts(a), Self::Shorts(b)) => a == b,
            _ => false,
        }
    }

    /// Integer view. Reals truncate toward zero.
    #[must_use]
    pub fn as_int(&self) -> i32 {
        match *self {
            Self::Int(v) => v,
            Self::Float(v) => v as i32,
            _ => 0,
        }
    }

    /// Real view. Integers convert exactly where `f32` allows.
    #[must_use]
    pub fn as_float(&self) -> f32 {
        match *self {
            Self::Float(v) => v,
            Self::Int(v) => v as f32,
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn as_vec3(&self) -> [f32; 3] {
        match *self {
            Self::Vec3(v) => v,
            _ => [0.0; 3],
        }
    }

    #[must_use]
    pub fn as_vec4(&self) -> [f32; 4] {
        match *self {
            Self::Vec4(v) => v,
            _ => [0.0; 4],
        }
    }

    #[must_use]
    pub fn as_shorts(&self) -> [i16; MAX_STATS] {
        match *self {
            Self::Shorts(v) => v,
            _ => [0; MAX_STATS],
        }
    }
}

fn same_floats(a: &[f32], b: &[f32]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bits_is_exact() {
        assert!(FieldValue::Float(1.0).same_bits(&FieldValue::Float(1.0)));
        assert!(!FieldValue::Float(0.0).same_bits(&FieldValue::Float(-0.0)));
        assert!(FieldValue::Float(f32::NAN).same_bits(&FieldValue::Float(f32::NAN)));
        assert!(!FieldValue::Vec3([1.0, 2.0, 3.0]).same_bits(&FieldValue::Vec3([1.0, 2.0, 3.5])));
    }

    #[test]
    fn mismatched_kinds_differ() {
        assert!(!FieldValue::Int(1).same_bits(&FieldValue::Float(1.0)));
    }

    #[test]
    fn views_convert() {
        assert_eq!(FieldValue::Float(7.9).as_int(), 7);
        assert_eq!(FieldValue::Int(-3).as_float(), -3.0);
        assert_eq!(FieldValue::Int(5).as_vec3(), [0.0; 3]);
        let mut stats = [0i16; MAX_STATS];
        stats[4] = 9;
        assert_eq!(FieldValue::Shorts(stats).as_shorts()[4], 9);
    }
}
