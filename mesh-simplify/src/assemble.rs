//! Quadric assembly: face planes, attribute penalties, boundary protection.

use hashbrown::HashMap;
use mesh_scene::Vector3;
use tracing::debug;

use crate::ingest::Corner;
use crate::params::SimplifyParams;
use crate::quadric::Quadric;
use crate::weld::WeldedTopology;

/// Cross products below this magnitude mark a face as degenerate.
const MIN_CROSS: f64 = 1e-12;

/// Diagnostic counts from the assembly pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AssemblyStats {
    /// Number of boundary edges that received protection quadrics.
    pub boundary_edges: usize,
    /// The adaptive UV penalty weight actually applied.
    pub uv_weight: f64,
}

/// Accumulate quadrics onto the welded vertices.
///
/// Three contributions, in order:
/// 1. per-vertex attribute penalties (`w_norm`, plus `w_uv_base` scaled by
///    the inverse UV span of the input);
/// 2. face-plane quadrics weighted by `w_geo`;
/// 3. virtual boundary planes on edges incident to exactly one face,
///    weighted by `10 * w_boundary`.
pub(crate) fn assemble_quadrics(
    topo: &mut WeldedTopology,
    corners: &[Corner],
    params: &SimplifyParams,
) -> AssemblyStats {
    let uv_weight = adaptive_uv_weight(corners, params.w_uv_base);
    debug!(uv_weight, "Adaptive UV penalty weight");

    let seed = Quadric::attribute_penalty(params.w_norm) + Quadric::attribute_penalty(uv_weight);
    for vertex in &mut topo.vertices {
        vertex.quadric = seed;
    }

    // Face pass: plane quadrics plus undirected edge counts.
    let mut edge_faces: HashMap<(u32, u32), u32> = HashMap::new();
    for face in &topo.faces {
        let Some(normal) = face_normal(topo, face) else {
            continue;
        };

        let p0 = topo.vertices[face[0] as usize].position;
        let d = -normal.dot(&p0.coords);
        let plane = Quadric::from_plane(normal.x, normal.y, normal.z, d) * params.w_geo;

        for &v in face {
            topo.vertices[v as usize].quadric += plane;
        }

        for (u, v) in face_edges(face) {
            *edge_faces.entry(ordered(u, v)).or_insert(0) += 1;
        }
    }

    // Boundary pass: anchor every edge that no second face shares.
    let boundary_weight = params.w_boundary * 10.0;
    let mut boundary_edges = 0;
    for face in &topo.faces {
        let Some(normal) = face_normal(topo, face) else {
            continue;
        };

        for (u, v) in face_edges(face) {
            if edge_faces.get(&ordered(u, v)) != Some(&1) {
                continue;
            }

            let p_u = topo.vertices[u as usize].position;
            let p_v = topo.vertices[v as usize].position;
            let cross = (p_v - p_u).cross(&normal);
            let norm = cross.norm();
            if norm < MIN_CROSS {
                continue;
            }
            let nb = cross / norm;

            let d = -nb.dot(&p_u.coords);
            let protection = Quadric::from_plane(nb.x, nb.y, nb.z, d) * boundary_weight;
            topo.vertices[u as usize].quadric += protection;
            topo.vertices[v as usize].quadric += protection;
            boundary_edges += 1;
        }
    }

    debug!(boundary_edges, "Boundary protection applied");

    AssemblyStats {
        boundary_edges,
        uv_weight,
    }
}

/// Unit normal of a welded face, or `None` when the face is degenerate
/// (repeated vertices or a near-zero cross product).
pub(crate) fn face_normal(topo: &WeldedTopology, face: &[u32; 3]) -> Option<Vector3<f64>> {
    if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
        return None;
    }

    let p0 = topo.vertices[face[0] as usize].position;
    let p1 = topo.vertices[face[1] as usize].position;
    let p2 = topo.vertices[face[2] as usize].position;

    let cross = (p1 - p0).cross(&(p2 - p0));
    let norm = cross.norm();
    if norm < MIN_CROSS {
        return None;
    }
    Some(cross / norm)
}

#[inline]
fn face_edges(face: &[u32; 3]) -> [(u32, u32); 3] {
    [
        (face[0], face[1]),
        (face[1], face[2]),
        (face[2], face[0]),
    ]
}

#[inline]
const fn ordered(u: u32, v: u32) -> (u32, u32) {
    if u < v {
        (u, v)
    } else {
        (v, u)
    }
}

/// UV penalty weight scaled by the inverse span of the input UVs, so the
/// penalty is comparable across differently-sized atlases.
fn adaptive_uv_weight(corners: &[Corner], w_uv_base: f64) -> f64 {
    let mut u_min = f64::INFINITY;
    let mut u_max = f64::NEG_INFINITY;
    let mut v_min = f64::INFINITY;
    let mut v_max = f64::NEG_INFINITY;

    for corner in corners {
        u_min = u_min.min(corner.uv.x);
        u_max = u_max.max(corner.uv.x);
        v_min = v_min.min(corner.uv.y);
        v_max = v_max.max(corner.uv.y);
    }

    let span = (u_max - u_min).max(v_max - v_min);
    let scale = if span > 1e-6 { 1.0 / span } else { 1.0 };
    w_uv_base * scale
}
