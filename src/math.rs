use crate::Float;

pub const PI: Float = std::f64::consts::PI;
pub const INV_PI: Float = std::f64::consts::FRAC_1_PI;
pub const INFINITY: Float = std::f64::INFINITY;

/// Offset applied along a scattered direction so the new ray does not
/// immediately hit the surface it left.
pub const RAY_EPSILON: Float = 1.0e-3;

/// Real roots of `a*t^2 + b*t + c`, smallest first.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    let discrim = b * b - 4.0 * a * c;
    if discrim < 0.0 { return None; }

    let root_discrim = discrim.sqrt();

    // avoids cancellation when b and the root have similar magnitude
    let q = if b < 0.0 {
        -0.5 * (b - root_discrim)
    } else {
        -0.5 * (b + root_discrim)
    };

    let t0 = q / a;
    let t1 = c / q;

    if t0 > t1 { Some((t1, t0)) } else { Some((t0, t1)) }
}
