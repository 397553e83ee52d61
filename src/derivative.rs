//! The Derivative Builder: populates a coefficient vector with every mixed
//! partial derivative of `1/R` up to degree `order`, `C[I(α)] = ∂^α(1/R)`.
//!
//! See DESIGN.md (Open Questions 1 and 2) for the derivation. In short:
//! spec.md §4.4's own recursion does not reproduce correct values when
//! checked against closed-form derivatives by hand, and contradicts its
//! own §8 testable property 6 (which omits the `α!` weighting §4.4 asks
//! for). This builder implements the unweighted form, via a recursion
//! re-derived from Euler's homogeneity relation for `1/R`, recursing on a
//! "designated axis" — the highest-priority nonzero axis among z, y, x,
//! the same priority order the Power Builder already uses — and using
//! *local* axis counts (not total degree) in every coefficient.

use crate::index::linear_index;
use crate::point::Point;

/// Fill `out[0..lterm(order)]` with `∂^α(1/R)` for every α with `|α| <=
/// order`, where `R = |d|`. `d` must be nonzero (the builder is only ever
/// called with well-separated box or target displacements; a zero `d` is a
/// caller contract violation, not a recoverable condition here).
pub fn build_derivatives(d: Point, order: usize, out: &mut [f64]) {
    let r2 = d.norm_sq();
    debug_assert!(r2 > 0.0, "Derivative Builder called with a zero displacement");
    let inv_r2 = 1.0 / r2;
    out[0] = r2.sqrt().recip();

    let coord = [d.x, d.y, d.z];

    for degree in 1..=order {
        for nx in 0..=degree {
            for ny in 0..=(degree - nx) {
                let nz = degree - nx - ny;
                let n = [nx, ny, nz];
                let slot = linear_index(nx, ny, nz);

                // Designated axis: highest priority nonzero axis among
                // z(2), y(1), x(0), matching the Power Builder's order.
                let designated = if nz >= 1 {
                    2
                } else if ny >= 1 {
                    1
                } else {
                    0
                };

                let mut acc = 0.0;
                for axis in 0..3 {
                    let count = n[axis];
                    if count == 0 {
                        continue;
                    }
                    let once = step(n, axis, 1);
                    let near = if axis == designated {
                        -(2.0 * count as f64 - 1.0) * coord[axis]
                    } else {
                        -2.0 * count as f64 * coord[axis]
                    };
                    acc += near * out[linear_index(once[0], once[1], once[2])];

                    if count >= 2 {
                        let twice = step(n, axis, 2);
                        let far = if axis == designated {
                            -(count as f64 - 1.0).powi(2)
                        } else {
                            -(count as f64) * (count as f64 - 1.0)
                        };
                        acc += far * out[linear_index(twice[0], twice[1], twice[2])];
                    }
                }

                out[slot] = acc * inv_r2;
            }
        }
    }
}

/// `alpha` with `axis`'s component decremented by `by`.
fn step(alpha: [usize; 3], axis: usize, by: usize) -> [usize; 3] {
    let mut out = alpha;
    out[axis] -= by;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::lterm;
    use approx::assert_relative_eq;

    fn closed_form(nx: i32, ny: i32, nz: i32, d: Point) -> f64 {
        // Hand-verified closed forms used to pin the recursion (see
        // DESIGN.md OQ2 for the derivation these come from).
        let r2 = d.norm_sq();
        let r = r2.sqrt();
        match (nx, ny, nz) {
            (0, 0, 0) => 1.0 / r,
            (1, 0, 0) => -d.x / r.powi(3),
            (0, 1, 0) => -d.y / r.powi(3),
            (0, 0, 1) => -d.z / r.powi(3),
            (1, 1, 0) => 3.0 * d.x * d.y / r.powi(5),
            (1, 0, 1) => 3.0 * d.x * d.z / r.powi(5),
            (0, 1, 1) => 3.0 * d.y * d.z / r.powi(5),
            (0, 0, 2) => 3.0 * d.z * d.z / r.powi(5) - 1.0 / r.powi(3),
            (2, 0, 0) => 3.0 * d.x * d.x / r.powi(5) - 1.0 / r.powi(3),
            (0, 2, 0) => 3.0 * d.y * d.y / r.powi(5) - 1.0 / r.powi(3),
            (2, 0, 1) => 3.0 * d.z / r.powi(5) - 15.0 * d.x * d.x * d.z / r.powi(7),
            _ => panic!("no closed form tabulated for ({nx},{ny},{nz})"),
        }
    }

    #[test]
    fn matches_hand_derived_closed_forms() {
        let d = Point::new(0.37, -1.1, 2.2);
        let order = 3;
        let mut c = vec![0.0; lterm(order)];
        build_derivatives(d, order, &mut c);
        for &(nx, ny, nz) in &[
            (0, 0, 0),
            (1, 0, 0),
            (0, 1, 0),
            (0, 0, 1),
            (1, 1, 0),
            (1, 0, 1),
            (0, 1, 1),
            (0, 0, 2),
            (2, 0, 0),
            (0, 2, 0),
            (2, 0, 1),
        ] {
            let slot = linear_index(nx, ny, nz);
            let expected = closed_form(nx as i32, ny as i32, nz as i32, d);
            assert_relative_eq!(c[slot], expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn matches_central_finite_differences() {
        // S6 (derivative builder correctness via finite differences).
        let d = Point::new(1.3, -0.4, 0.9);
        let h = 1e-4;
        let order = 2;
        let mut c = vec![0.0; lterm(order)];
        build_derivatives(d, order, &mut c);

        let phi = |p: Point| 1.0 / p.norm();

        let fd_x = (phi(Point::new(d.x + h, d.y, d.z)) - phi(Point::new(d.x - h, d.y, d.z)))
            / (2.0 * h);
        assert_relative_eq!(c[linear_index(1, 0, 0)], fd_x, epsilon = 1e-5);

        let fd_z = (phi(Point::new(d.x, d.y, d.z + h)) - phi(Point::new(d.x, d.y, d.z - h)))
            / (2.0 * h);
        assert_relative_eq!(c[linear_index(0, 0, 1)], fd_z, epsilon = 1e-5);

        // A mixed second partial.
        let fd_xy = (phi(Point::new(d.x + h, d.y + h, d.z))
            - phi(Point::new(d.x + h, d.y - h, d.z))
            - phi(Point::new(d.x - h, d.y + h, d.z))
            + phi(Point::new(d.x - h, d.y - h, d.z)))
            / (4.0 * h * h);
        assert_relative_eq!(c[linear_index(1, 1, 0)], fd_xy, epsilon = 1e-3);
    }
}
