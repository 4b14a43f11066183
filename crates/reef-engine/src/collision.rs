use crate::target::Vec2;

/// Solves `|P(t) - C|^2 = r^2` for `t` in `[0, 1]` along the segment
/// `prev -> cur`, returning the smallest such `t` if the segment enters the
/// circle of radius `radius` centered at `center`.
///
/// A zero-length segment (`prev == cur`, e.g. a projectile that hasn't
/// moved this tick) falls back to a point-in-circle test at `t = 0`.
pub fn swept_hit(prev: Vec2, cur: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let d = Vec2 {
        x: cur.x - prev.x,
        z: cur.z - prev.z,
    };
    let f = Vec2 {
        x: prev.x - center.x,
        z: prev.z - center.z,
    };

    let a = d.x * d.x + d.z * d.z;
    if a == 0.0 {
        let dist_sq = f.x * f.x + f.z * f.z;
        return if dist_sq <= radius * radius {
            Some(0.0)
        } else {
            None
        };
    }

    let b = 2.0 * (f.x * d.x + f.z * d.z);
    let c = f.x * f.x + f.z * f.z - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    if (0.0..=1.0).contains(&t1) {
        Some(t1)
    } else if (0.0..=1.0).contains(&t2) {
        Some(t2)
    } else {
        None
    }
}
