//! Edge-collapse engine.
//!
//! A value-typed min-heap of collapse candidates, computed once at start.
//! Costs are not re-evaluated when a neighboring collapse changes them;
//! stale entries are discarded lazily when popped, by resolving both
//! endpoints through the union-find and checking the removed flags. A
//! candidate that fails the flip guard is dropped, not re-enqueued.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashSet;
use mesh_scene::Point3;
use tracing::{debug, info};

use crate::assemble::face_normal;
use crate::ingest::Corner;
use crate::params::SimplifyParams;
use crate::weld::{UniqueVertex, WeldedTopology};

/// Cross products below this magnitude count as a folded-over face.
const MIN_CROSS: f64 = 1e-12;

/// Diagnostic counts from the collapse loop.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CollapseStats {
    pub performed: usize,
    pub rejected: usize,
}

/// An edge collapse candidate.
#[derive(Debug, Clone)]
struct EdgeCandidate {
    /// Endpoint unique-vertex indices, `u < v`.
    u: u32,
    v: u32,
    cost: f64,
    target: Point3<f64>,
}

impl PartialEq for EdgeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for EdgeCandidate {}

impl PartialOrd for EdgeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior (smaller cost pops first)
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Disjoint-set forest over unique vertex ids with path halving.
///
/// No union by rank: the collapse loop always keeps the popped edge's first
/// root as survivor, so rank is implicit in collapse order.
#[derive(Debug)]
pub(crate) struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len as u32).collect(),
        }
    }

    /// Root of `id`, halving the path on the way up.
    pub fn find(&mut self, mut id: u32) -> u32 {
        while id != self.parent[id as usize] {
            let grandparent = self.parent[self.parent[id as usize] as usize];
            self.parent[id as usize] = grandparent;
            id = grandparent;
        }
        id
    }

    /// Point `loser`'s root slot at `survivor`.
    pub fn merge(&mut self, loser: u32, survivor: u32) {
        self.parent[loser as usize] = survivor;
    }
}

/// Run the decimation loop until the face budget is met or the heap drains,
/// then propagate collapsed positions into the corner array.
///
/// Returns the union-find alongside the counts so callers can resolve
/// surviving roots.
pub(crate) fn collapse_edges(
    topo: &mut WeldedTopology,
    corners: &mut [Corner],
    params: &SimplifyParams,
) -> (CollapseStats, UnionFind) {
    let initial_faces = topo.faces.len();
    let target_faces = params.face_budget(initial_faces);

    let mut incidence = build_incidence(topo);
    let mut heap = build_heap(topo, params);
    let mut uf = UnionFind::new(topo.vertices.len());
    let mut stats = CollapseStats::default();

    info!(
        faces = initial_faces,
        target = target_faces,
        edges = heap.len(),
        "Starting edge collapse"
    );

    let mut current_faces = initial_faces;

    while current_faces > target_faces {
        let Some(edge) = heap.pop() else {
            break;
        };

        let r1 = uf.find(edge.u);
        let r2 = uf.find(edge.v);

        // Stale candidate: endpoints already merged or consumed.
        if r1 == r2
            || topo.vertices[r1 as usize].removed
            || topo.vertices[r2 as usize].removed
        {
            continue;
        }

        if would_flip(
            topo,
            &incidence[r1 as usize],
            &incidence[r2 as usize],
            &mut uf,
            r1,
            r2,
            &edge.target,
            params.flip_cosine,
        ) {
            stats.rejected += 1;
            continue;
        }

        // Merge r2 into r1 at the candidate target.
        topo.vertices[r1 as usize].position = edge.target;
        let q2 = topo.vertices[r2 as usize].quadric;
        topo.vertices[r1 as usize].quadric += q2;
        topo.vertices[r2 as usize].removed = true;
        uf.merge(r2, r1);

        let loser = std::mem::take(&mut incidence[r2 as usize]);
        let survivor = &mut incidence[r1 as usize];
        for face_idx in loser {
            if survivor.len() >= params.incidence_cap {
                break;
            }
            survivor.push(face_idx);
        }

        // An interior manifold collapse removes exactly two faces; boundary
        // collapses remove one, making this bookkeeping approximate.
        current_faces = current_faces.saturating_sub(2);
        stats.performed += 1;
    }

    propagate_positions(topo, corners, &mut uf);

    debug!(
        performed = stats.performed,
        rejected = stats.rejected,
        "Collapse loop finished"
    );

    (stats, uf)
}

/// Face ids incident to each unique vertex, degenerate faces excluded.
/// Consulted only by the flip guard.
#[allow(clippy::cast_possible_truncation)]
fn build_incidence(topo: &WeldedTopology) -> Vec<Vec<u32>> {
    let mut incidence = vec![Vec::new(); topo.vertices.len()];
    for (face_idx, face) in topo.faces.iter().enumerate() {
        if face_normal(topo, face).is_none() {
            continue;
        }
        for &v in face {
            incidence[v as usize].push(face_idx as u32);
        }
    }
    incidence
}

/// One candidate per unique undirected edge of the non-degenerate faces.
fn build_heap(topo: &WeldedTopology, params: &SimplifyParams) -> BinaryHeap<EdgeCandidate> {
    let mut heap = BinaryHeap::new();
    let mut seen: HashSet<(u32, u32)> = HashSet::new();

    for face in &topo.faces {
        if face_normal(topo, face).is_none() {
            continue;
        }
        for i in 0..3 {
            let (a, b) = (face[i], face[(i + 1) % 3]);
            let (u, v) = if a < b { (a, b) } else { (b, a) };
            if seen.insert((u, v)) {
                heap.push(edge_candidate(u, v, &topo.vertices, params));
            }
        }
    }

    heap
}

/// Cost and target for collapsing `(u, v)`.
///
/// Biased toward endpoint snapping: the analytic optimum of the combined
/// quadric is adopted only when it is meaningfully cheaper than the better
/// endpoint and lies near the edge. Distant optima of ill-conditioned
/// systems produce visible artifacts otherwise.
fn edge_candidate(
    u: u32,
    v: u32,
    vertices: &[UniqueVertex],
    params: &SimplifyParams,
) -> EdgeCandidate {
    let qbar = vertices[u as usize].quadric + vertices[v as usize].quadric;
    let p_u = vertices[u as usize].position;
    let p_v = vertices[v as usize].position;

    let cost_u = qbar.evaluate(&p_u);
    let cost_v = qbar.evaluate(&p_v);
    let (mut cost, mut target) = if cost_u <= cost_v {
        (cost_u, p_u)
    } else {
        (cost_v, p_v)
    };

    if let Some(optimum) = qbar.optimal_point() {
        let cost_opt = qbar.evaluate(&optimum);
        if cost_opt < params.cost_accept * cost
            && (optimum - p_u).norm() < params.target_distance_guard * (p_v - p_u).norm()
        {
            cost = cost_opt;
            target = optimum;
        }
    }

    EdgeCandidate {
        u,
        v,
        cost: cost.max(0.0),
        target,
    }
}

/// Whether moving `r1`/`r2` to `target` folds over any incident face.
///
/// Faces that contain both roots vanish in the collapse and are skipped, as
/// are faces already degenerate under the current union-find. The guard
/// only sees the cached (capped) incidence lists.
#[allow(clippy::too_many_arguments)]
fn would_flip(
    topo: &WeldedTopology,
    faces_r1: &[u32],
    faces_r2: &[u32],
    uf: &mut UnionFind,
    r1: u32,
    r2: u32,
    target: &Point3<f64>,
    flip_cosine: f64,
) -> bool {
    for &face_idx in faces_r1.iter().chain(faces_r2) {
        let face = topo.faces[face_idx as usize];
        let roots = [uf.find(face[0]), uf.find(face[1]), uf.find(face[2])];

        let touches_r1 = roots.contains(&r1);
        let touches_r2 = roots.contains(&r2);
        if touches_r1 && touches_r2 {
            continue;
        }
        if roots[0] == roots[1] || roots[1] == roots[2] || roots[0] == roots[2] {
            continue;
        }

        let old = roots.map(|r| topo.vertices[r as usize].position);
        let new = roots.map(|r| if r == r1 || r == r2 { *target } else {
            topo.vertices[r as usize].position
        });

        let old_cross = (old[1] - old[0]).cross(&(old[2] - old[0]));
        let new_cross = (new[1] - new[0]).cross(&(new[2] - new[0]));

        let new_norm = new_cross.norm();
        if new_norm < MIN_CROSS {
            return true;
        }
        let old_norm = old_cross.norm();
        if old_norm < MIN_CROSS {
            // Index-distinct but position-degenerate before the move: no
            // pre-move orientation exists to compare against, so the face
            // cannot veto the collapse.
            continue;
        }

        if old_cross.dot(&new_cross) / (old_norm * new_norm) < flip_cosine {
            return true;
        }
    }

    false
}

/// Copy each surviving root position into every corner of its welded group.
#[allow(clippy::cast_possible_truncation)]
fn propagate_positions(topo: &WeldedTopology, corners: &mut [Corner], uf: &mut UnionFind) {
    for i in 0..topo.vertices.len() as u32 {
        let root = uf.find(i);
        let position = topo.vertices[root as usize].position;
        for &corner_idx in &topo.vertices[i as usize].corners {
            corners[corner_idx as usize].position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble_quadrics;
    use crate::ingest::ingest_scene;
    use crate::weld::weld_corners;
    use mesh_scene::{Scene, SubMesh};

    fn prepare(scene: &Scene, params: &SimplifyParams) -> (WeldedTopology, Vec<Corner>) {
        let mesh = ingest_scene(scene);
        let mut topo = weld_corners(&mesh, params.weld_scale);
        assemble_quadrics(&mut topo, &mesh.corners, params);
        (topo, mesh.corners)
    }

    /// 3x3 vertex grid over [0,1]^2 split into 8 triangles.
    fn grid_scene() -> Scene {
        let mut positions = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                positions.push(Point3::new(f64::from(x) * 0.5, f64::from(y) * 0.5, 0.0));
            }
        }
        let mut faces = Vec::new();
        for y in 0..2u32 {
            for x in 0..2u32 {
                let i = y * 3 + x;
                faces.push([i, i + 1, i + 4]);
                faces.push([i, i + 4, i + 3]);
            }
        }
        Scene::from_submeshes(vec![SubMesh::from_positions(positions, faces)])
    }

    #[test]
    fn union_find_path_halving() {
        let mut uf = UnionFind::new(4);
        uf.merge(1, 0);
        uf.merge(2, 1);
        uf.merge(3, 2);
        assert_eq!(uf.find(3), 0);
        assert_eq!(uf.find(2), 0);
        assert_eq!(uf.find(0), 0);
    }

    #[test]
    fn single_triangle_is_never_collapsed() {
        let scene = Scene::from_submeshes(vec![SubMesh::from_positions(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )]);
        let params = SimplifyParams::with_target_ratio(0.9);
        let (mut topo, mut corners) = prepare(&scene, &params);

        let (stats, _) = collapse_edges(&mut topo, &mut corners, &params);

        assert_eq!(stats.performed, 0);
        assert!(topo.vertices.iter().all(|v| !v.removed));
    }

    #[test]
    fn grid_collapses_to_budget() {
        let scene = grid_scene();
        let params = SimplifyParams::with_target_ratio(0.5);
        let (mut topo, mut corners) = prepare(&scene, &params);

        let (stats, mut uf) = collapse_edges(&mut topo, &mut corners, &params);

        assert!(stats.performed >= 1);

        // Surviving faces, resolved through the union-find.
        let surviving = topo
            .faces
            .iter()
            .filter(|face| {
                let roots = [uf.find(face[0]), uf.find(face[1]), uf.find(face[2])];
                roots[0] != roots[1] && roots[1] != roots[2] && roots[0] != roots[2]
            })
            .count();
        // Boundary collapses remove one face against the -2 bookkeeping, so
        // the loop may stop up to two faces above the budget.
        assert!(surviving <= params.face_budget(8) + 2, "got {surviving}");
    }

    #[test]
    fn roots_are_never_removed() {
        let scene = grid_scene();
        let params = SimplifyParams::with_target_ratio(0.5);
        let (mut topo, mut corners) = prepare(&scene, &params);

        let (_, mut uf) = collapse_edges(&mut topo, &mut corners, &params);

        for i in 0..topo.vertices.len() as u32 {
            let root = uf.find(i);
            assert!(
                !topo.vertices[root as usize].removed,
                "root {root} of {i} is removed"
            );
        }
    }

    #[test]
    fn collapse_keeps_planar_winding() {
        let scene = grid_scene();
        let params = SimplifyParams::with_target_ratio(0.5);
        let (mut topo, mut corners) = prepare(&scene, &params);

        let (_, mut uf) = collapse_edges(&mut topo, &mut corners, &params);

        // The grid is planar with consistent +z winding; the flip guard must
        // keep every surviving face oriented +z.
        for face in &topo.faces {
            let roots = [uf.find(face[0]), uf.find(face[1]), uf.find(face[2])];
            if roots[0] == roots[1] || roots[1] == roots[2] || roots[0] == roots[2] {
                continue;
            }
            let p = roots.map(|r| topo.vertices[r as usize].position);
            let cross = (p[1] - p[0]).cross(&(p[2] - p[0]));
            assert!(cross.z > 0.0, "face folded over: {cross:?}");
        }
    }

    #[test]
    fn positions_propagate_to_all_corners() {
        // Two welded copies of the same grid: every corner of a collapsed
        // group must end at its root position.
        let mut scene = grid_scene();
        let copy = scene.submeshes[0].clone();
        scene.push(copy);
        let params = SimplifyParams::with_target_ratio(0.5);
        let (mut topo, mut corners) = prepare(&scene, &params);

        let (_, mut uf) = collapse_edges(&mut topo, &mut corners, &params);

        for i in 0..topo.vertices.len() as u32 {
            let root = uf.find(i);
            let expected = topo.vertices[root as usize].position;
            for &corner_idx in &topo.vertices[i as usize].corners {
                assert_eq!(corners[corner_idx as usize].position, expected);
            }
        }
    }

    #[test]
    fn heap_orders_by_ascending_cost() {
        let mut heap = BinaryHeap::new();
        for (cost, tag) in [(3.0, 0), (1.0, 1), (2.0, 2)] {
            heap.push(EdgeCandidate {
                u: tag,
                v: tag + 10,
                cost,
                target: Point3::origin(),
            });
        }
        assert_eq!(heap.pop().unwrap().u, 1);
        assert_eq!(heap.pop().unwrap().u, 2);
        assert_eq!(heap.pop().unwrap().u, 0);
    }
}
