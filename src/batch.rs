//! Parallel direct (P2P) evaluation over point clouds.
//!
//! There is no tree here and no admissibility decision — every `(target,
//! source, charge)` triple is evaluated with the direct kernel. This
//! mirrors the teacher's `par_chunks_exact_mut` dispatch in
//! `field_translation/source.rs`, chunked with [`crate::helpers::find_chunk_size`].

use itertools::izip;
use rayon::prelude::*;

use crate::helpers::find_chunk_size;
use crate::kernel::eval;
use crate::point::Point;
use crate::{Charge, FieldValue};

/// Upper bound on a single rayon chunk's length, tuned so each task does
/// enough work to amortize dispatch overhead without starving threads on
/// small batches.
const MAX_CHUNK_SIZE: usize = 512;

/// Evaluate `eval(targets[i], sources[i]).scaled(charges[i])` for every
/// `i`, distributing the work across the rayon thread pool. The three
/// input slices must have equal length (a contract violation otherwise).
pub fn evaluate_direct(targets: &[Point], sources: &[Point], charges: &[Charge]) -> Vec<FieldValue> {
    assert_eq!(targets.len(), sources.len(), "targets/sources length mismatch");
    assert_eq!(targets.len(), charges.len(), "targets/charges length mismatch");

    let n = targets.len();
    let mut out = vec![FieldValue::zero(); n];
    if n == 0 {
        return out;
    }

    let chunk_size = find_chunk_size(n, MAX_CHUNK_SIZE);
    out.par_chunks_mut(chunk_size)
        .zip(targets.par_chunks(chunk_size))
        .zip(sources.par_chunks(chunk_size))
        .zip(charges.par_chunks(chunk_size))
        .for_each(|(((out_chunk, t_chunk), s_chunk), c_chunk)| {
            for (o, &t, &s, &c) in izip!(out_chunk, t_chunk, s_chunk, c_chunk) {
                *o = eval(t, s).scaled(c);
            }
        });

    out
}
