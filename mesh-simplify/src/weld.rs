//! Topology normalizer: position-based vertex welding.
//!
//! Loaders split geometrically contiguous surfaces into distinct vertex
//! records (per sub-mesh, per material, per attribute seam), which breaks
//! the adjacency the collapse engine needs. This pass merges corners by
//! quantized position into unique topology vertices and rewrites the face
//! list against them.

use hashbrown::HashMap;
use mesh_scene::Point3;
use tracing::debug;

use crate::ingest::WorkingMesh;
use crate::quadric::Quadric;

/// A welded topology vertex.
#[derive(Debug, Clone)]
pub(crate) struct UniqueVertex {
    pub position: Point3<f64>,
    pub quadric: Quadric,
    /// Corner indices that welded into this vertex, in insertion order.
    pub corners: Vec<u32>,
    /// Set when a collapse consumes this vertex.
    pub removed: bool,
}

/// The welded view of a [`WorkingMesh`]: the only topology the collapse
/// engine consumes.
#[derive(Debug, Default)]
pub(crate) struct WeldedTopology {
    pub vertices: Vec<UniqueVertex>,
    /// Corner index → unique vertex index.
    pub corner_to_unique: Vec<u32>,
    /// The global face list rewritten against unique vertex indices.
    pub faces: Vec<[u32; 3]>,
    /// Number of corners that merged into an existing unique vertex.
    pub merged: usize,
}

/// Round each coordinate to the nearest multiple of `1 / scale`.
#[allow(clippy::cast_possible_truncation)] // quantized coordinates fit i64 for any sane input
fn quantize(p: &Point3<f64>, scale: f64) -> (i64, i64, i64) {
    (
        (p.x * scale).round() as i64,
        (p.y * scale).round() as i64,
        (p.z * scale).round() as i64,
    )
}

/// Weld corners by quantized position.
#[allow(clippy::cast_possible_truncation)] // u32 vertex indices by design
pub(crate) fn weld_corners(mesh: &WorkingMesh, scale: f64) -> WeldedTopology {
    let mut topo = WeldedTopology {
        corner_to_unique: Vec::with_capacity(mesh.corners.len()),
        ..Default::default()
    };

    let mut by_position: HashMap<(i64, i64, i64), u32> = HashMap::new();

    for (corner_idx, corner) in mesh.corners.iter().enumerate() {
        let key = quantize(&corner.position, scale);
        let unique_idx = *by_position.entry(key).or_insert_with(|| {
            let idx = topo.vertices.len() as u32;
            topo.vertices.push(UniqueVertex {
                position: corner.position,
                quadric: Quadric::zero(),
                corners: Vec::new(),
                removed: false,
            });
            idx
        });

        let vertex = &mut topo.vertices[unique_idx as usize];
        if !vertex.corners.is_empty() {
            topo.merged += 1;
        }
        vertex.corners.push(corner_idx as u32);
        topo.corner_to_unique.push(unique_idx);
    }

    topo.faces = mesh
        .faces
        .iter()
        .map(|face| {
            [
                topo.corner_to_unique[face[0] as usize],
                topo.corner_to_unique[face[1] as usize],
                topo.corner_to_unique[face[2] as usize],
            ]
        })
        .collect();

    debug!(
        corners = mesh.corners.len(),
        unique = topo.vertices.len(),
        merged = topo.merged,
        "Welded topology"
    );

    topo
}
