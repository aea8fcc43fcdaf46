//! Surface differential geometry
//!
//! After positions update, every vertex gets a fresh tangent (toward the
//! next row), bitangent (toward the next column) and normal (their cross
//! product) for downstream shading. The last row and column have no forward
//! neighbour and copy the adjacent interior frame instead — an explicit
//! boundary-extrapolation policy, not an oversight.

use rayon::prelude::*;

use crate::simulation::forces::MIN_EDGE_LEN;
use crate::simulation::states::ClothState;

/// Recompute tangent/bitangent/normal for every vertex from the updated
/// positions. When a forward difference degenerates (coincident vertices or
/// a folded frame), the previous frame is kept for that vertex.
pub fn update_surface_frames(state: &mut ClothState) {
    let m = state.rows;
    let n = state.cols;
    let pos = &state.curr_pos;

    // Interior: forward differences toward the next row / next column.
    // Row-chunked fan-out; every task writes its own row only.
    state
        .tangents
        .par_chunks_mut(n)
        .zip(state.bitangents.par_chunks_mut(n))
        .zip(state.normals.par_chunks_mut(n))
        .take(m - 1)
        .enumerate()
        .for_each(|(j, ((tan_row, bit_row), nrm_row))| {
            for i in 0..n - 1 {
                let here = pos[j * n + i];

                let tangent = (pos[(j + 1) * n + i] - here)
                    .try_normalize(MIN_EDGE_LEN)
                    .unwrap_or(tan_row[i]);
                let bitangent = (pos[j * n + i + 1] - here)
                    .try_normalize(MIN_EDGE_LEN)
                    .unwrap_or(bit_row[i]);
                let normal = bitangent
                    .cross(&tangent)
                    .try_normalize(MIN_EDGE_LEN)
                    .unwrap_or(nrm_row[i]);

                tan_row[i] = tangent;
                bit_row[i] = bitangent;
                nrm_row[i] = normal;
            }
        });

    // Boundary patch, column first then row. The order matters at the far
    // corner, which ends up equal to both of its interior neighbours.
    for j in 0..m {
        let last = j * n + n - 1;
        state.normals[last] = state.normals[last - 1];
        state.tangents[last] = state.tangents[last - 1];
        state.bitangents[last] = state.bitangents[last - 1];
    }
    for i in 0..n {
        let last = (m - 1) * n + i;
        let up = (m - 2) * n + i;
        state.normals[last] = state.normals[up];
        state.tangents[last] = state.tangents[up];
        state.bitangents[last] = state.bitangents[up];
    }
}
