//! Error types for scene construction.

use thiserror::Error;

/// Errors that can occur when building scene data.
#[derive(Debug, Error)]
pub enum SceneError {
    /// An attribute array does not match the position count.
    #[error("{attribute} count {got} does not match vertex count {expected}")]
    AttributeLengthMismatch {
        /// Name of the offending attribute array.
        attribute: &'static str,
        /// Number of vertices in the sub-mesh.
        expected: usize,
        /// Length of the attribute array.
        got: usize,
    },

    /// A face references a vertex index outside the vertex array.
    #[error("face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    FaceIndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the sub-mesh.
        vertex_count: usize,
    },
}

/// Result type for scene operations.
pub type SceneResult<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SceneError::AttributeLengthMismatch {
            attribute: "normal",
            expected: 8,
            got: 4,
        };
        let msg = format!("{err}");
        assert!(msg.contains("normal"));
        assert!(msg.contains('8'));

        let err = SceneError::FaceIndexOutOfRange {
            face: 2,
            index: 9,
            vertex_count: 3,
        };
        assert!(format!("{err}").contains('9'));
    }
}
