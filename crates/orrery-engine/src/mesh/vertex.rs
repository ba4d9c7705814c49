use std::hash::{Hash, Hasher};

use glam::{Vec2, Vec3};

/// One face-corner attribute triple as emitted by a model loader.
///
/// Equality is exact and field-wise. Comparison happens on a canonical bit key:
/// `-0.0` folds into `+0.0` (they are IEEE-equal), and NaN compares by bit
/// pattern so a vertex is always equal to itself. `Hash` agrees with `Eq`.
#[derive(Debug, Copy, Clone, Default)]
pub struct RawVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl RawVertex {
    #[inline]
    pub const fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self { position, uv, normal }
    }

    /// Bit key used for hashing and equality.
    #[inline]
    fn key(&self) -> [u32; 8] {
        [
            canonical_bits(self.position.x),
            canonical_bits(self.position.y),
            canonical_bits(self.position.z),
            canonical_bits(self.uv.x),
            canonical_bits(self.uv.y),
            canonical_bits(self.normal.x),
            canonical_bits(self.normal.y),
            canonical_bits(self.normal.z),
        ]
    }
}

#[inline]
fn canonical_bits(v: f32) -> u32 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

impl PartialEq for RawVertex {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for RawVertex {}

impl Hash for RawVertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &RawVertex) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    fn v(p: [f32; 3], uv: [f32; 2], n: [f32; 3]) -> RawVertex {
        RawVertex::new(Vec3::from(p), Vec2::from(uv), Vec3::from(n))
    }

    #[test]
    fn identical_fields_are_equal() {
        let a = v([1.0, 2.0, 3.0], [0.5, 0.25], [0.0, 0.0, 1.0]);
        let b = v([1.0, 2.0, 3.0], [0.5, 0.25], [0.0, 0.0, 1.0]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn uv_difference_breaks_equality() {
        let a = v([0.0; 3], [0.0, 0.0], [0.0, 0.0, 1.0]);
        let b = v([0.0; 3], [0.0, 1.0], [0.0, 0.0, 1.0]);
        assert_ne!(a, b);
    }

    #[test]
    fn no_epsilon_tolerance() {
        let a = v([1.0, 0.0, 0.0], [0.0; 2], [0.0; 3]);
        let b = v([1.0 + f32::EPSILON, 0.0, 0.0], [0.0; 2], [0.0; 3]);
        assert_ne!(a, b);
    }

    #[test]
    fn signed_zero_folds() {
        let a = v([0.0, 0.0, 0.0], [0.0; 2], [0.0; 3]);
        let b = v([-0.0, 0.0, 0.0], [0.0; 2], [0.0; 3]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn nan_vertex_equals_itself() {
        let a = v([f32::NAN, 0.0, 0.0], [0.0; 2], [0.0; 3]);
        assert_eq!(a, a);
    }
}
