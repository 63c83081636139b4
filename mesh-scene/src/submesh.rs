//! Triangle sub-mesh with optional per-vertex attributes.

use nalgebra::{Point3, Vector2, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// One triangle sub-mesh of a scene.
///
/// A loader typically produces one `SubMesh` per primitive of the source
/// file. Faces are triangles only; a loader must drop or triangulate
/// anything else before constructing a `SubMesh`.
///
/// Normals and UVs are optional whole-array attributes: either every vertex
/// has one, or the sub-mesh carries none. This mirrors how interchange
/// formats store vertex streams.
///
/// # Example
///
/// ```
/// use mesh_scene::{SubMesh, Point3};
///
/// let submesh = SubMesh::from_positions(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
///
/// assert_eq!(submesh.vertex_count(), 3);
/// assert_eq!(submesh.face_count(), 1);
/// assert!(!submesh.has_normals());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,

    /// Per-vertex unit normals, if the source provided them.
    /// When present, the length equals `positions.len()`.
    pub normals: Option<Vec<Vector3<f64>>>,

    /// Per-vertex texture coordinates (first channel), if provided.
    /// When present, the length equals `positions.len()`.
    pub uvs: Option<Vec<Vector2<f64>>>,

    /// Triangle faces as indices into the vertex arrays,
    /// counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

impl SubMesh {
    /// Create an empty sub-mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: None,
            uvs: None,
            faces: Vec::new(),
        }
    }

    /// Create a sub-mesh from positions and faces, with no attributes.
    #[inline]
    #[must_use]
    pub const fn from_positions(positions: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            normals: None,
            uvs: None,
            faces,
        }
    }

    /// Create a sub-mesh with attributes, validating array lengths and
    /// face indices.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::AttributeLengthMismatch`] if a provided
    /// attribute array does not match the position count, and
    /// [`SceneError::FaceIndexOutOfRange`] if a face references a vertex
    /// index outside the position array.
    pub fn try_new(
        positions: Vec<Point3<f64>>,
        normals: Option<Vec<Vector3<f64>>>,
        uvs: Option<Vec<Vector2<f64>>>,
        faces: Vec<[u32; 3]>,
    ) -> SceneResult<Self> {
        let vertex_count = positions.len();

        if let Some(ref n) = normals {
            if n.len() != vertex_count {
                return Err(SceneError::AttributeLengthMismatch {
                    attribute: "normal",
                    expected: vertex_count,
                    got: n.len(),
                });
            }
        }

        if let Some(ref uv) = uvs {
            if uv.len() != vertex_count {
                return Err(SceneError::AttributeLengthMismatch {
                    attribute: "uv",
                    expected: vertex_count,
                    got: uv.len(),
                });
            }
        }

        for (face_idx, face) in faces.iter().enumerate() {
            for &index in face {
                if index as usize >= vertex_count {
                    return Err(SceneError::FaceIndexOutOfRange {
                        face: face_idx,
                        index,
                        vertex_count,
                    });
                }
            }
        }

        Ok(Self {
            positions,
            normals,
            uvs,
            faces,
        })
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangle faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the sub-mesh has no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Whether the sub-mesh carries per-vertex normals.
    #[inline]
    #[must_use]
    pub const fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Whether the sub-mesh carries per-vertex UVs.
    #[inline]
    #[must_use]
    pub const fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Normal of vertex `index`, or the conventional up vector `(0, 1, 0)`
    /// when the sub-mesh carries no normals.
    #[inline]
    #[must_use]
    pub fn normal_or_default(&self, index: usize) -> Vector3<f64> {
        self.normals
            .as_ref()
            .map_or_else(|| Vector3::new(0.0, 1.0, 0.0), |n| n[index])
    }

    /// UV of vertex `index`, or `(0, 0)` when the sub-mesh carries no UVs.
    #[inline]
    #[must_use]
    pub fn uv_or_default(&self, index: usize) -> Vector2<f64> {
        self.uvs.as_ref().map_or_else(Vector2::zeros, |uv| uv[index])
    }

    /// Replace all vertex and face buffers wholesale.
    ///
    /// This is the writeback contract of the simplification core: the
    /// previous buffers are dropped atomically, never partially updated.
    pub fn replace_geometry(
        &mut self,
        positions: Vec<Point3<f64>>,
        normals: Option<Vec<Vector3<f64>>>,
        uvs: Option<Vec<Vector2<f64>>>,
        faces: Vec<[u32; 3]>,
    ) {
        self.positions = positions;
        self.normals = normals;
        self.uvs = uvs;
        self.faces = faces;
    }
}
