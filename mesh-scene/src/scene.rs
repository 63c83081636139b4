//! Ordered collection of sub-meshes.

use crate::{Aabb, SubMesh};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A scene: the flat, ordered list of triangle sub-meshes that a loader
/// extracted from a source file.
///
/// Sub-mesh order is significant. The simplification core writes results
/// back into the same slots, so a serializer can re-associate each sub-mesh
/// with its original material and node.
///
/// # Example
///
/// ```
/// use mesh_scene::{Scene, SubMesh, Point3};
///
/// let mut scene = Scene::new();
/// scene.push(SubMesh::from_positions(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// ));
///
/// assert_eq!(scene.total_vertex_count(), 3);
/// assert_eq!(scene.total_face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scene {
    /// The sub-meshes, in declaration order.
    pub submeshes: Vec<SubMesh>,
}

impl Scene {
    /// Create an empty scene.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            submeshes: Vec::new(),
        }
    }

    /// Create a scene from a list of sub-meshes.
    #[inline]
    #[must_use]
    pub fn from_submeshes(submeshes: Vec<SubMesh>) -> Self {
        Self { submeshes }
    }

    /// Append a sub-mesh.
    #[inline]
    pub fn push(&mut self, submesh: SubMesh) {
        self.submeshes.push(submesh);
    }

    /// Total vertex count across all sub-meshes.
    #[must_use]
    pub fn total_vertex_count(&self) -> usize {
        self.submeshes.iter().map(SubMesh::vertex_count).sum()
    }

    /// Total face count across all sub-meshes.
    #[must_use]
    pub fn total_face_count(&self) -> usize {
        self.submeshes.iter().map(SubMesh::face_count).sum()
    }

    /// Whether no sub-mesh carries any face.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.submeshes.iter().all(SubMesh::is_empty)
    }

    /// Bounding box over every vertex of every sub-mesh.
    ///
    /// Returns [`Aabb::empty`] for a scene with no vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.submeshes.iter().flat_map(|sm| sm.positions.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn triangle(offset: f64) -> SubMesh {
        SubMesh::from_positions(
            vec![
                Point3::new(offset, 0.0, 0.0),
                Point3::new(offset + 1.0, 0.0, 0.0),
                Point3::new(offset, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn empty_scene() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.total_face_count(), 0);
        assert!(scene.bounds().is_empty());
    }

    #[test]
    fn counts_sum_over_submeshes() {
        let scene = Scene::from_submeshes(vec![triangle(0.0), triangle(5.0)]);
        assert_eq!(scene.total_vertex_count(), 6);
        assert_eq!(scene.total_face_count(), 2);
        assert!(!scene.is_empty());
    }

    #[test]
    fn scene_with_only_faceless_submeshes_is_empty() {
        let mut scene = Scene::new();
        scene.push(SubMesh::from_positions(vec![Point3::origin()], vec![]));
        assert!(scene.is_empty());
    }

    #[test]
    fn bounds_span_all_submeshes() {
        let scene = Scene::from_submeshes(vec![triangle(0.0), triangle(5.0)]);
        let bounds = scene.bounds();
        assert!((bounds.min.x - 0.0).abs() < f64::EPSILON);
        assert!((bounds.max.x - 6.0).abs() < f64::EPSILON);
    }
}
