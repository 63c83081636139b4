//! Mesh simplification using quadric error metrics.
//!
//! This crate reduces the triangle count of a [`Scene`] by a target ratio
//! while minimizing visible distortion. It implements edge collapse driven
//! by Quadric Error Metrics (QEM), with two additions aimed at scenes
//! assembled from multiple sub-meshes:
//!
//! - **Topology welding**: vertices are merged by quantized position before
//!   simplification, so collapses cross sub-mesh and attribute seams and
//!   the result is topologically watertight.
//! - **Boundary protection**: edges incident to exactly one face receive
//!   high-weight virtual plane quadrics, anchoring open borders of the
//!   surface.
//!
//! Results are written back into the original sub-mesh partitioning, so a
//! serializer can keep materials and node assignments intact.
//!
//! # Example
//!
//! ```
//! use mesh_scene::{Point3, Scene, SubMesh};
//! use mesh_simplify::{simplify_scene, SimplifyParams};
//!
//! let mut scene = Scene::from_submeshes(vec![SubMesh::from_positions(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2], [0, 2, 3]],
//! )]);
//!
//! let summary = simplify_scene(&mut scene, &SimplifyParams::with_target_ratio(0.5))?;
//! println!("{summary}");
//! # Ok::<(), mesh_simplify::SimplifyError>(())
//! ```
//!
//! # Algorithm
//!
//! 1. Flatten all sub-meshes into one corner/face array pair.
//! 2. Weld corners by quantized position into unique topology vertices.
//! 3. Accumulate face-plane quadrics, attribute penalties, and boundary
//!    protection quadrics onto the unique vertices.
//! 4. Pop edges from a cost-ordered heap and collapse them, guarded
//!    against normal flips, until the face budget is met.
//! 5. Rebuild each sub-mesh's buffers from its surviving faces.
//!
//! The collapse loop is single-threaded and allocation is `O(V + F + E)`.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod assemble;
mod collapse;
mod error;
mod ingest;
mod params;
mod quadric;
mod result;
mod weld;
mod writeback;

pub use error::{SimplifyError, SimplifyResult};
pub use params::SimplifyParams;
pub use quadric::Quadric;
pub use result::SimplifySummary;

use mesh_scene::Scene;
use tracing::{debug, info, warn};

/// Simplify every sub-mesh of a scene in place.
///
/// The scene's sub-mesh buffers are replaced wholesale with the simplified
/// geometry; sub-mesh order and count are preserved. On error the scene is
/// left untouched.
///
/// # Errors
///
/// - [`SimplifyError::InvalidRatio`] if `params.target_ratio` is not finite.
/// - [`SimplifyError::NoGeometry`] if no triangles survive ingestion.
pub fn simplify_scene(
    scene: &mut Scene,
    params: &SimplifyParams,
) -> SimplifyResult<SimplifySummary> {
    if !params.target_ratio.is_finite() {
        return Err(SimplifyError::InvalidRatio(params.target_ratio));
    }

    let mut working = ingest::ingest_scene(scene);
    if working.faces.is_empty() {
        warn!("no geometry found");
        return Err(SimplifyError::NoGeometry);
    }
    let original_faces = working.faces.len();

    let mut topo = weld::weld_corners(&working, params.weld_scale);
    let unique_vertices = topo.vertices.len();
    let welded_corners = topo.merged;

    let assembly = assemble::assemble_quadrics(&mut topo, &working.corners, params);
    debug!(
        boundary_edges = assembly.boundary_edges,
        uv_weight = assembly.uv_weight,
        "Quadrics assembled"
    );

    let (stats, _) = collapse::collapse_edges(&mut topo, &mut working.corners, params);

    let final_faces = writeback::write_back(scene, &working);

    let summary = SimplifySummary {
        submeshes: scene.submeshes.len(),
        original_faces,
        final_faces,
        unique_vertices,
        welded_corners,
        boundary_edges: assembly.boundary_edges,
        collapses_performed: stats.performed,
        collapses_rejected: stats.rejected,
    };

    info!(%summary, "Simplification done");

    Ok(summary)
}
