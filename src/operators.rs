//! The six shift operators: P2M, M2M, M2L, M2P, L2L, L2P.
//!
//! Every operator below is a convolution of a coefficient vector against
//! either the Power Builder's `d^α/α!` tableau (M2M, L2L — translating an
//! expansion's *center*) or the Derivative Builder's `∂^α(1/R)` tableau
//! (M2L, M2P, L2P — converting between a multipole/local series and a
//! field value). See DESIGN.md for the hand-derivation that fixes the
//! overall sign and settles the weighting ambiguity in spec.md §4.4.
//!
//! `translation` is always the vector from the source expansion's center to
//! the target expansion's center (`target_center - source_center`).

use crate::coeffs::{Local, Multipole};
use crate::derivative::build_derivatives;
use crate::index::{linear_index, lterm, mterm, multi_indices_up_to};
use crate::point::Point;
use crate::FieldValue;

/// Seed a multipole expansion about `center` with a single charge at
/// `source`: `M[α] = charge * (source-center)^α / α!`.
pub fn p2m(source: Point, charge: f64, center: Point, m: &mut Multipole) {
    let order = m.order();
    let d = source - center;
    let mut power = vec![0.0; mterm(order)];
    power[0] = charge;
    crate::power::build_power_series(d, order.saturating_sub(1), &mut power);
    for slot in 0..power.len() {
        m.increment(slot, power[slot]);
    }
}

/// Translate a child box's multipole expansion into its parent's:
/// `target[α] += Σ_{β<=α} source[β] * (-translation)^(α-β) / (α-β)!`,
/// `translation = parent_center - child_center`.
pub fn m2m(source: &Multipole, target: &mut Multipole, translation: Point) {
    let order = source.order();
    debug_assert_eq!(order, target.order(), "M2M requires matching orders");
    let max_degree = order.saturating_sub(1);

    // Source relative to the parent center is (source - child) + (child -
    // parent) = d_child - translation (translation = parent - child), so
    // the convolution kernel is built from the *negated* translation.
    let neg_translation = Point::new(-translation.x, -translation.y, -translation.z);
    let mut power = vec![0.0; mterm(order)];
    power[0] = 1.0;
    crate::power::build_power_series(neg_translation, max_degree, &mut power);

    for (ax, ay, az) in multi_indices_up_to(max_degree) {
        let alpha_slot = linear_index(ax, ay, az);
        let mut acc = 0.0;
        for bx in 0..=ax {
            for by in 0..=ay {
                for bz in 0..=az {
                    let beta_slot = linear_index(bx, by, bz);
                    let gamma_slot = linear_index(ax - bx, ay - by, az - bz);
                    acc += source.get(beta_slot) * power[gamma_slot];
                }
            }
        }
        target.increment(alpha_slot, acc);
    }
}

/// Convert a source box's multipole expansion into the target box's local
/// expansion: `target[α] += (-1)^|α| * Σ_β source[β] * D[α+β]`, where
/// `D[γ] = ∂^γ(1/R)` evaluated at the box-to-box separation.
pub fn m2l(source: &Multipole, target: &mut Local, translation: Point) {
    let m_order = source.order();
    let l_order = target.order();
    let separation = Point::new(-translation.x, -translation.y, -translation.z);

    let deriv_degree = l_order + m_order.saturating_sub(1);
    let mut deriv = vec![0.0; lterm(deriv_degree)];
    build_derivatives(separation, deriv_degree, &mut deriv);

    for (ax, ay, az) in multi_indices_up_to(l_order) {
        let alpha_slot = linear_index(ax, ay, az);
        let sign = if (ax + ay + az) % 2 == 0 { 1.0 } else { -1.0 };
        let mut acc = 0.0;
        for (bx, by, bz) in multi_indices_up_to(m_order.saturating_sub(1)) {
            let beta_slot = linear_index(bx, by, bz);
            let gamma_slot = linear_index(ax + bx, ay + by, az + bz);
            acc += source.get(beta_slot) * deriv[gamma_slot];
        }
        target.increment(alpha_slot, sign * acc);
    }
}

/// Evaluate a source box's multipole expansion directly at a target point,
/// without forming a local expansion: `result.potential += Σ_β source[β] *
/// D[β]`, `result.force[j] -= Σ_β source[β] * D[β+e_j]`, `D` built from
/// `center - target`.
pub fn m2p(source: &Multipole, center: Point, target: Point, result: &mut FieldValue) {
    let order = source.order();
    let d = center - target;

    let mut deriv = vec![0.0; lterm(order)];
    build_derivatives(d, order, &mut deriv);

    let mut potential = 0.0;
    let mut force = [0.0; 3];
    for (bx, by, bz) in multi_indices_up_to(order.saturating_sub(1)) {
        let beta_slot = linear_index(bx, by, bz);
        let coeff = source.get(beta_slot);
        potential += coeff * deriv[linear_index(bx, by, bz)];
        force[0] -= coeff * deriv[linear_index(bx + 1, by, bz)];
        force[1] -= coeff * deriv[linear_index(bx, by + 1, bz)];
        force[2] -= coeff * deriv[linear_index(bx, by, bz + 1)];
    }
    result.potential += potential;
    for k in 0..3 {
        result.force[k] += force[k];
    }
}

/// Re-center a parent box's local expansion onto a child box:
/// `target[α] += Σ_{β>=α} source[β] * translation^(β-α) / (β-α)!`.
pub fn l2l(source: &Local, target: &mut Local, translation: Point) {
    let order = source.order();
    debug_assert_eq!(order, target.order(), "L2L requires matching orders");

    let mut power = vec![0.0; lterm(order)];
    power[0] = 1.0;
    crate::power::build_power_series(translation, order, &mut power);

    for (ax, ay, az) in multi_indices_up_to(order) {
        let alpha_slot = linear_index(ax, ay, az);
        let mut acc = 0.0;
        for (bx, by, bz) in multi_indices_up_to(order) {
            if bx < ax || by < ay || bz < az {
                continue;
            }
            let beta_slot = linear_index(bx, by, bz);
            let gamma_slot = linear_index(bx - ax, by - ay, bz - az);
            acc += source.get(beta_slot) * power[gamma_slot];
        }
        target.increment(alpha_slot, acc);
    }
}

/// Evaluate a local expansion at a target point: `result.potential +=
/// Σ_α source[α] * P[α]`, `result.force[j] += Σ_α source[α] * P[α-e_j]`,
/// `P` the Power Builder tableau of `target-center`.
pub fn l2p(source: &Local, center: Point, target: Point, result: &mut FieldValue) {
    let order = source.order();
    let d = target - center;

    let mut power = vec![0.0; lterm(order)];
    power[0] = 1.0;
    crate::power::build_power_series(d, order, &mut power);

    let mut potential = 0.0;
    let mut force = [0.0; 3];
    for (ax, ay, az) in multi_indices_up_to(order) {
        let slot = linear_index(ax, ay, az);
        let coeff = source.get(slot);
        potential += coeff * power[slot];
        if ax >= 1 {
            force[0] += coeff * power[linear_index(ax - 1, ay, az)];
        }
        if ay >= 1 {
            force[1] += coeff * power[linear_index(ax, ay - 1, az)];
        }
        if az >= 1 {
            force[2] += coeff * power[linear_index(ax, ay, az - 1)];
        }
    }
    result.potential += potential;
    for k in 0..3 {
        result.force[k] += force[k];
    }
}
