//! Scene and sub-mesh data model for triangle mesh simplification.
//!
//! This crate provides the data types that sit between a mesh loader and the
//! simplification core:
//!
//! - [`SubMesh`] - One triangle sub-mesh with positions and optional attributes
//! - [`Scene`] - An ordered collection of sub-meshes
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Layer 0 Crate
//!
//! This crate has no I/O and no engine dependencies. A glTF or OBJ loader
//! converts its primitives into [`SubMesh`] values; a serializer reads them
//! back out. The simplification core (`mesh-simplify`) only ever sees these
//! types, never a loader API.
//!
//! # Units & Coordinates
//!
//! Coordinates are `f64` and unit-agnostic. The default welding tolerance in
//! `mesh-simplify` (1/10000) assumes meter-scale data. Right-handed
//! coordinate system, counter-clockwise face winding viewed from outside.
//!
//! # Example
//!
//! ```
//! use mesh_scene::{Scene, SubMesh, Point3};
//!
//! let submesh = SubMesh::from_positions(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//! );
//!
//! let mut scene = Scene::new();
//! scene.push(submesh);
//! assert_eq!(scene.total_face_count(), 1);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod error;
mod scene;
mod submesh;

pub use bounds::Aabb;
pub use error::{SceneError, SceneResult};
pub use scene::Scene;
pub use submesh::SubMesh;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector2, Vector3};
