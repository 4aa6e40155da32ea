use super::slice::PlineSlice;
use crate::geometry::pline::{Pline, PlineVertex};

const JOIN_TOLERANCE_SQ: f64 = 1e-8;

/// Chains valid slices end to start into polylines.
///
/// Offsets of closed input always close; offsets of open input close only
/// when the chain returns to its first vertex.
#[must_use]
pub fn connect(slices: &[&PlineSlice], input_closed: bool) -> Vec<Pline> {
    let mut used = vec![false; slices.len()];
    let mut results = Vec::new();

    for start in 0..slices.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut chain: Vec<PlineVertex> = slices[start].vertices.clone();

        while let Some(next) = chain.last().and_then(|end| nearest_unused(slices, &used, end)) {
            used[next] = true;
            chain.extend_from_slice(&slices[next].vertices[1..]);
        }

        let coincide =
            chain.len() >= 2 && dist_sq(&chain[0], &chain[chain.len() - 1]) < JOIN_TOLERANCE_SQ;
        if coincide {
            chain.pop();
        }
        let closed = input_closed || coincide;
        if !closed || chain.len() >= 3 {
            results.push(Pline {
                vertices: chain,
                closed,
            });
        }
    }

    results
}

fn nearest_unused(slices: &[&PlineSlice], used: &[bool], end: &PlineVertex) -> Option<usize> {
    slices
        .iter()
        .enumerate()
        .filter(|(i, _)| !used[*i])
        .map(|(i, s)| (i, dist_sq(&s.vertices[0], end)))
        .filter(|(_, d)| *d < JOIN_TOLERANCE_SQ)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

fn dist_sq(a: &PlineVertex, b: &PlineVertex) -> f64 {
    (a.x - b.x).powi(2) + (a.y - b.y).powi(2)
}
