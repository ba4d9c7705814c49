//! Procedural geometry for the flat-colour objects.

use glam::Vec3;

/// Edge length of the axis gizmo.
pub const AXES_SIZE: f32 = 0.1;

/// Three axis segments from one corner of a cube of edge `size`, centred on
/// the origin, coloured red (X), green (Y) and blue (Z). Line-list order.
pub fn axes(size: f32) -> (Vec<Vec3>, Vec<Vec3>) {
    let h = size / 2.0;
    let corner = Vec3::splat(-h);

    let positions = vec![
        corner,
        Vec3::new(h, -h, -h),
        corner,
        Vec3::new(-h, h, -h),
        corner,
        Vec3::new(-h, -h, h),
    ];
    let colors = vec![Vec3::X, Vec3::X, Vec3::Y, Vec3::Y, Vec3::Z, Vec3::Z];

    (positions, colors)
}

/// One white colour per vertex.
pub fn white(count: usize) -> Vec<Vec3> {
    vec![Vec3::ONE; count]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_three_unit_colored_segments() {
        let (p, c) = axes(AXES_SIZE);
        assert_eq!(p.len(), 6);
        assert_eq!(c.len(), 6);

        for (segment, axis) in p.chunks(2).zip([Vec3::X, Vec3::Y, Vec3::Z]) {
            let d = segment[1] - segment[0];
            assert!((d - axis * AXES_SIZE).length() < 1e-6, "{d:?}");
        }
        assert_eq!(c[0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(c[5], Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn white_fills_requested_count() {
        let w = white(36);
        assert_eq!(w.len(), 36);
        assert!(w.iter().all(|c| *c == Vec3::ONE));
    }
}
