//! Parameters for mesh simplification.

/// Parameters for mesh simplification.
///
/// The weights mirror the quadric assembly: `w_geo` scales face-plane
/// quadrics, `w_norm` and `w_uv_base` the per-vertex attribute penalties,
/// and `w_boundary` the virtual boundary planes (applied with an additional
/// fixed factor of 10).
///
/// The remaining fields are design constants of the collapse engine. They
/// are exposed for experimentation but the defaults are part of the
/// algorithm's tuning; change them only with care.
#[derive(Debug, Clone)]
pub struct SimplifyParams {
    /// Fraction of original faces to remove, in `[0.0, 1.0]`.
    /// The face budget is `max(4, floor(faces * (1 - target_ratio)))`.
    /// Default: 0.5
    pub target_ratio: f64,

    /// Weight on face-plane quadrics. Default: 1.0
    pub w_geo: f64,

    /// Attribute penalty weight for normals. Default: 0.1
    pub w_norm: f64,

    /// Base attribute penalty weight for UVs, scaled adaptively by the
    /// inverse UV span of the input. Default: 0.1
    pub w_uv_base: f64,

    /// Base weight on boundary-protection quadrics. The effective weight is
    /// ten times this value. Default: 10000.0
    pub w_boundary: f64,

    /// Position quantization scale for vertex welding: coordinates are
    /// rounded to the nearest multiple of `1 / weld_scale`.
    /// Default: 10000.0 (0.1 mm for meter-scale data)
    pub weld_scale: f64,

    /// The analytic optimum replaces the cheaper endpoint only when its cost
    /// is below this fraction of the endpoint cost. Default: 0.8
    pub cost_accept: f64,

    /// The analytic optimum is rejected when it lies farther from the first
    /// endpoint than this multiple of the edge length. Default: 1.5
    pub target_distance_guard: f64,

    /// A collapse is rejected when any incident face normal's cosine against
    /// its pre-collapse direction drops below this value. Default: 0.2
    pub flip_cosine: f64,

    /// Cap on the per-vertex incident-face cache consulted by the flip
    /// guard. Merges stop growing a list at this size, bounding the cost of
    /// dense-valence vertices at the price of an incomplete guard there.
    /// Default: 200
    pub incidence_cap: usize,
}

impl Default for SimplifyParams {
    fn default() -> Self {
        Self {
            target_ratio: 0.5,
            w_geo: 1.0,
            w_norm: 0.1,
            w_uv_base: 0.1,
            w_boundary: 10000.0,
            weld_scale: 10000.0,
            cost_accept: 0.8,
            target_distance_guard: 1.5,
            flip_cosine: 0.2,
            incidence_cap: 200,
        }
    }
}

impl SimplifyParams {
    /// Create params removing the given fraction of faces.
    ///
    /// Non-finite ratios are passed through and rejected by
    /// [`simplify_scene`](crate::simplify_scene); finite ratios are clamped
    /// to `[0.0, 1.0]`.
    #[must_use]
    pub fn with_target_ratio(ratio: f64) -> Self {
        Self {
            target_ratio: if ratio.is_finite() {
                ratio.clamp(0.0, 1.0)
            } else {
                ratio
            },
            ..Default::default()
        }
    }

    /// Aggressive preset: removes 90% of faces.
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            target_ratio: 0.9,
            ..Default::default()
        }
    }

    /// Conservative preset: removes 25% of faces and doubles the boundary
    /// protection weight.
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            target_ratio: 0.25,
            w_boundary: 20000.0,
            ..Default::default()
        }
    }

    /// Set the boundary protection weight.
    #[must_use]
    pub const fn with_boundary_weight(mut self, w: f64) -> Self {
        self.w_boundary = w;
        self
    }

    /// Set the welding quantization scale.
    #[must_use]
    pub const fn with_weld_scale(mut self, scale: f64) -> Self {
        self.weld_scale = scale;
        self
    }

    /// Set the attribute penalty weights for normals and UVs.
    #[must_use]
    pub const fn with_attribute_weights(mut self, w_norm: f64, w_uv_base: f64) -> Self {
        self.w_norm = w_norm;
        self.w_uv_base = w_uv_base;
        self
    }

    /// The face budget for an input with `face_count` triangles.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)] // face counts are far below 2^52
    pub fn face_budget(&self, face_count: usize) -> usize {
        let ratio = self.target_ratio.clamp(0.0, 1.0);
        let target = ((face_count as f64) * (1.0 - ratio)).floor() as usize;
        target.max(4)
    }
}
