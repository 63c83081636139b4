//! Ingestion adapter: flattens a scene into the core's working arrays.

use mesh_scene::{Point3, Scene, Vector2, Vector3};
use tracing::debug;

/// One input vertex slot, as loaded. Positions are rewritten to the
/// collapsed position of the slot's welded group before writeback.
#[derive(Debug, Clone)]
pub(crate) struct Corner {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
    pub uv: Vector2<f64>,
}

/// A sub-mesh's slice of the global corner and face arrays.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SubMeshRange {
    pub base_vertex: u32,
    pub face_start: usize,
    pub face_count: usize,
}

/// The flattened scene the core operates on: all corners and triangles of
/// every sub-mesh in one pair of arrays, plus the ranges needed to write
/// results back per sub-mesh.
#[derive(Debug, Default)]
pub(crate) struct WorkingMesh {
    pub corners: Vec<Corner>,
    /// Triangles as global corner indices.
    pub faces: Vec<[u32; 3]>,
    pub ranges: Vec<SubMeshRange>,
}

/// Flatten the scene. Vertex indices are shifted by a running offset so
/// every face indexes the global corner array.
#[allow(clippy::cast_possible_truncation)] // u32 indices by design, as in the scene types
pub(crate) fn ingest_scene(scene: &Scene) -> WorkingMesh {
    let mut mesh = WorkingMesh::default();

    for submesh in &scene.submeshes {
        let base_vertex = mesh.corners.len() as u32;
        let face_start = mesh.faces.len();

        for (i, position) in submesh.positions.iter().enumerate() {
            mesh.corners.push(Corner {
                position: *position,
                normal: submesh.normal_or_default(i),
                uv: submesh.uv_or_default(i),
            });
        }

        for face in &submesh.faces {
            mesh.faces.push([
                face[0] + base_vertex,
                face[1] + base_vertex,
                face[2] + base_vertex,
            ]);
        }

        mesh.ranges.push(SubMeshRange {
            base_vertex,
            face_start,
            face_count: submesh.faces.len(),
        });
    }

    debug!(
        corners = mesh.corners.len(),
        faces = mesh.faces.len(),
        submeshes = mesh.ranges.len(),
        "Ingested scene"
    );

    mesh
}
