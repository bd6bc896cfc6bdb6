//! Source (Z up, counter-clockwise, UV origin top left) to target
//! (Y up, clockwise, UV origin bottom left) conversions.

use glam::{Vec2, Vec3, Vec4};

/// (x, y, z) -> (x, z, y). Applying it twice gives back the input.
pub fn swap_yz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

/// v' = |v - 1|
pub fn flip_v(uv: Vec2) -> Vec2 {
    Vec2::new(uv.x, (uv.y - 1.0).abs())
}

/// (a, b, c) -> (a, c, b)
pub fn reverse_winding(face: [u32; 3]) -> [u32; 3] {
    [face[0], face[2], face[1]]
}

/// Source quaternion (x, y, z, w) -> target (x, z, y, -w). The w flip keeps
/// handedness after the position axis swap.
pub fn convert_rotation(q: Vec4) -> Vec4 {
    Vec4::new(q.x, q.z, q.y, -q.w)
}

/// Rotation tangents get the component swap only.
pub fn convert_rotation_tangent(t: Vec4) -> Vec4 {
    Vec4::new(t.x, t.z, t.y, t.w)
}
