//! Writeback: regenerate per-sub-mesh buffers from the collapsed corners.

use hashbrown::HashMap;
use mesh_scene::{Point3, Scene, Vector2, Vector3};
use tracing::debug;

use crate::ingest::WorkingMesh;

/// Faces whose corner positions span less than this cross-product magnitude
/// are dropped as collapsed.
const MIN_SURVIVING_CROSS: f64 = 1e-9;

/// Rebuild every sub-mesh from the surviving faces of the global list.
///
/// Corner positions were rewritten to their collapsed group positions, so a
/// face survives exactly when its three corners still span a triangle. Each
/// sub-mesh gets fresh, compact vertex and index buffers; attribute arrays
/// are emitted only for attributes the sub-mesh had on input.
///
/// A sub-mesh that collapses entirely receives one dummy vertex and one
/// degenerate face, keeping serializers that reject empty attribute arrays
/// working. Returns the number of real (non-dummy) faces written.
#[allow(clippy::cast_possible_truncation)] // u32 indices by design
pub(crate) fn write_back(scene: &mut Scene, mesh: &WorkingMesh) -> usize {
    let mut surviving_total = 0;

    for (submesh, range) in scene.submeshes.iter_mut().zip(&mesh.ranges) {
        let mut positions: Vec<Point3<f64>> = Vec::new();
        let mut normals: Option<Vec<Vector3<f64>>> = submesh.has_normals().then(Vec::new);
        let mut uvs: Option<Vec<Vector2<f64>>> = submesh.has_uvs().then(Vec::new);
        let mut faces: Vec<[u32; 3]> = Vec::new();
        let mut local_index: HashMap<u32, u32> = HashMap::new();

        let face_range = range.face_start..range.face_start + range.face_count;
        for face in &mesh.faces[face_range] {
            let p0 = mesh.corners[face[0] as usize].position;
            let p1 = mesh.corners[face[1] as usize].position;
            let p2 = mesh.corners[face[2] as usize].position;
            if (p1 - p0).cross(&(p2 - p0)).norm() < MIN_SURVIVING_CROSS {
                continue;
            }

            let mut indices = [0u32; 3];
            for (slot, &corner_idx) in face.iter().enumerate() {
                let next = local_index.len() as u32;
                // Keyed by sub-mesh-local vertex id.
                let local = *local_index.entry(corner_idx - range.base_vertex).or_insert_with(|| {
                    let corner = &mesh.corners[corner_idx as usize];
                    positions.push(corner.position);
                    if let Some(n) = normals.as_mut() {
                        n.push(corner.normal);
                    }
                    if let Some(uv) = uvs.as_mut() {
                        uv.push(corner.uv);
                    }
                    next
                });
                indices[slot] = local;
            }
            faces.push(indices);
        }

        surviving_total += faces.len();

        if positions.is_empty() {
            // Dummy geometry for a fully collapsed sub-mesh.
            positions.push(Point3::origin());
            if let Some(n) = normals.as_mut() {
                n.push(Vector3::new(0.0, 1.0, 0.0));
            }
            if let Some(uv) = uvs.as_mut() {
                uv.push(Vector2::zeros());
            }
            faces.push([0, 0, 0]);
        }

        submesh.replace_geometry(positions, normals, uvs, faces);
    }

    debug!(faces = surviving_total, "Writeback complete");

    surviving_total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ingest_scene;
    use mesh_scene::SubMesh;

    fn triangle() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn untouched_mesh_round_trips() {
        let mut scene = Scene::from_submeshes(vec![SubMesh::from_positions(
            triangle(),
            vec![[0, 1, 2]],
        )]);
        let mesh = ingest_scene(&scene);

        let surviving = write_back(&mut scene, &mesh);

        assert_eq!(surviving, 1);
        let sm = &scene.submeshes[0];
        assert_eq!(sm.vertex_count(), 3);
        assert_eq!(sm.faces, vec![[0, 1, 2]]);
        assert_eq!(sm.positions[1], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn collapsed_faces_are_dropped() {
        let mut scene = Scene::from_submeshes(vec![SubMesh::from_positions(
            triangle(),
            vec![[0, 1, 2]],
        )]);
        let mut mesh = ingest_scene(&scene);
        // Simulate a collapse: all corners at one point.
        for corner in &mut mesh.corners {
            corner.position = Point3::origin();
        }

        let surviving = write_back(&mut scene, &mesh);

        assert_eq!(surviving, 0);
        // Dummy contract: one vertex, one degenerate face.
        let sm = &scene.submeshes[0];
        assert_eq!(sm.vertex_count(), 1);
        assert_eq!(sm.faces, vec![[0, 0, 0]]);
        assert_eq!(sm.positions[0], Point3::origin());
    }

    #[test]
    fn dummy_carries_attributes_only_if_input_did() {
        let with_attrs = SubMesh::try_new(
            triangle(),
            Some(vec![Vector3::z(); 3]),
            Some(vec![Vector2::new(0.5, 0.5); 3]),
            vec![[0, 1, 2]],
        )
        .unwrap();
        let bare = SubMesh::from_positions(triangle(), vec![[0, 1, 2]]);
        let mut scene = Scene::from_submeshes(vec![with_attrs, bare]);
        let mut mesh = ingest_scene(&scene);
        for corner in &mut mesh.corners {
            corner.position = Point3::origin();
        }

        write_back(&mut scene, &mesh);

        let dummy = &scene.submeshes[0];
        assert_eq!(dummy.normals.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            dummy.normals.as_ref().and_then(|n| n.first().copied()),
            Some(Vector3::new(0.0, 1.0, 0.0))
        );
        assert_eq!(dummy.uvs.as_ref().map(Vec::len), Some(1));
        assert!(!scene.submeshes[1].has_normals());
    }

    #[test]
    fn vertices_are_interned_per_submesh() {
        // Two triangles sharing two corners compact to four vertices.
        let mut scene = Scene::from_submeshes(vec![SubMesh::from_positions(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )]);
        let mesh = ingest_scene(&scene);

        let surviving = write_back(&mut scene, &mesh);

        assert_eq!(surviving, 2);
        let sm = &scene.submeshes[0];
        assert_eq!(sm.vertex_count(), 4);
        assert_eq!(sm.faces[1], [0, 2, 3]);
    }

    #[test]
    fn attributes_follow_surviving_corners() {
        let submesh = SubMesh::try_new(
            triangle(),
            Some(vec![
                Vector3::x(),
                Vector3::y(),
                Vector3::z(),
            ]),
            Some(vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(0.0, 1.0),
            ]),
            vec![[0, 1, 2]],
        )
        .unwrap();
        let mut scene = Scene::from_submeshes(vec![submesh]);
        let mesh = ingest_scene(&scene);

        write_back(&mut scene, &mesh);

        let sm = &scene.submeshes[0];
        assert_eq!(sm.normals.as_ref().map(|n| n[1]), Some(Vector3::y()));
        assert_eq!(sm.uvs.as_ref().map(|uv| uv[2]), Some(Vector2::new(0.0, 1.0)));
    }
}
