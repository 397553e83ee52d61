//! The Power Builder: populates a coefficient vector with the monomial
//! tableau `C[I(α)] = d^α / α!` for a displacement `d`, up to a caller-given
//! maximum degree.
//!
//! Ascends degree by degree using the recurrences from spec.md §4.3,
//! always dividing by the axis count of the just-incremented axis (nz
//! first, then ny, then nx), so division by zero never arises.

use crate::index::linear_index;
use crate::point::Point;

/// Fill `out[1..]` with `d^α/α!` for every α with `1 <= |α| <= max_degree`.
/// `out[0]` must already hold the caller's chosen value for `|α|=0` (`1.0`
/// for ordinary use, or a P2M charge) and is left untouched.
pub fn build_power_series(d: Point, max_degree: usize, out: &mut [f64]) {
    for degree in 1..=max_degree {
        for nx in 0..=degree {
            for ny in 0..=(degree - nx) {
                let nz = degree - nx - ny;
                let slot = linear_index(nx, ny, nz);
                out[slot] = if nz >= 1 {
                    out[linear_index(nx, ny, nz - 1)] * d.z / nz as f64
                } else if ny >= 1 {
                    out[linear_index(nx, ny - 1, 0)] * d.y / ny as f64
                } else {
                    out[linear_index(nx - 1, 0, 0)] * d.x / nx as f64
                };
            }
        }
    }
}
