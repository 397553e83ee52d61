//! The monomial index: a bijection between multi-indices α=(nx,ny,nz) and
//! linear coefficient-vector slots, plus the associated factorial weights.
//!
//! The mapping is the degree-graded colexicographic one from spec.md §3:
//! `I(nx,ny,nz) = n(n+1)(n+2)/6 + m(m+1)/2 + nz`, with `n=nx+ny+nz` and
//! `m=ny+nz`. This gives a contiguous slot range per total degree `d`:
//! `[d(d+1)(d+2)/6, (d+1)(d+2)(d+3)/6)`.

/// Number of monomials of total degree < `order` (multipole vector length).
pub fn mterm(order: usize) -> usize {
    degree_offset(order)
}

/// Number of monomials of total degree <= `order` (local vector length).
pub fn lterm(order: usize) -> usize {
    degree_offset(order + 1)
}

/// First slot of degree `d` (and, equivalently, the count of slots of
/// degree < d): `d(d+1)(d+2)/6`.
pub fn degree_offset(d: usize) -> usize {
    d * (d + 1) * (d + 2) / 6
}

/// Linear slot for multi-index (nx,ny,nz).
pub fn linear_index(nx: usize, ny: usize, nz: usize) -> usize {
    let n = nx + ny + nz;
    let m = ny + nz;
    degree_offset(n) + m * (m + 1) / 2 + nz
}

/// alpha! = nx! * ny! * nz!, as f64 (orders in the supported range keep this
/// well within f64's exact-integer representation).
pub fn factorial_weight(nx: usize, ny: usize, nz: usize) -> f64 {
    factorial(nx) * factorial(ny) * factorial(nz)
}

pub fn factorial(n: usize) -> f64 {
    (1..=n).fold(1.0, |acc, k| acc * k as f64)
}

/// Iterate every multi-index (nx,ny,nz) with total degree exactly `d`, in
/// the ascending slot order used throughout the Power and Derivative
/// builders (nz-major: the traversal order that makes each recurrence's
/// dependency already-computed).
pub fn degree_multi_indices(d: usize) -> impl Iterator<Item = (usize, usize, usize)> {
    (0..=d).flat_map(move |nx| (0..=(d - nx)).map(move |ny| (nx, ny, d - nx - ny)))
}

/// Iterate every multi-index with total degree <= `max_degree`, ascending
/// by degree (so dependencies for the recurrences are always already
/// populated).
pub fn multi_indices_up_to(max_degree: usize) -> impl Iterator<Item = (usize, usize, usize)> {
    (0..=max_degree).flat_map(degree_multi_indices)
}
