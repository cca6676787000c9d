use crate::Axis;

/// Configuration for [`crate::Reconciler`].
///
/// Strategy choices (axis, follower mode) are fixed at construction; the
/// quantities that change over a container's lifetime (`data_count`,
/// `reserved_pixels`, the size guess) have setters on the reconciler.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconcilerOptions {
    /// Number of items in the dataset.
    pub data_count: usize,

    /// Scroll axis of the container.
    pub axis: Axis,

    /// Follower mode: the engine never drives the scroll offset itself and
    /// only reacts to externally driven scrolling. One spacer (the front
    /// one) is still maintained; scroll writes are suppressed everywhere.
    pub follower: bool,

    /// Extra pixels rendered beyond the viewport when sizing the window.
    pub reserved_pixels: f64,

    /// Seed for the per-item size estimate, used until the first real
    /// measurement. `0.0` means "unknown": the first paint renders exactly
    /// one item to produce a measurement.
    pub guessed_item_size: f64,

    /// Hard cap on the window length. When growing one edge would exceed
    /// it, the far edge is shrunk by the overflow.
    pub max_render_count: Option<usize>,

    /// Pixel margin tolerated at a viewport edge before a coverage miss is
    /// reported.
    pub coverage_slack: f64,

    /// Estimate drift (pixels) that forces a spacer recomputation.
    pub spacer_estimate_threshold: f64,

    /// Relative spacer discrepancy that forces a recomputation while the
    /// window grows toward that spacer.
    pub spacer_discrepancy_ratio: f64,

    /// Pre-emptive extension: when the rendered span remaining on one side
    /// of the viewport falls below this fraction of the slice, extend the
    /// window before the edge is actually uncovered. Performance heuristic
    /// only; `None` disables it.
    pub extend_ahead_ratio: Option<f64>,
}

impl ReconcilerOptions {
    pub fn new(data_count: usize) -> Self {
        Self {
            data_count,
            axis: Axis::Vertical,
            follower: false,
            reserved_pixels: 0.0,
            guessed_item_size: 0.0,
            max_render_count: None,
            coverage_slack: 1.0,
            spacer_estimate_threshold: 10.0,
            spacer_discrepancy_ratio: 1.0 / 3.0,
            extend_ahead_ratio: None,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_follower(mut self, follower: bool) -> Self {
        self.follower = follower;
        self
    }

    pub fn with_reserved_pixels(mut self, reserved_pixels: f64) -> Self {
        self.reserved_pixels = reserved_pixels;
        self
    }

    pub fn with_guessed_item_size(mut self, guessed_item_size: f64) -> Self {
        self.guessed_item_size = guessed_item_size;
        self
    }

    pub fn with_max_render_count(mut self, max_render_count: Option<usize>) -> Self {
        self.max_render_count = max_render_count;
        self
    }

    pub fn with_coverage_slack(mut self, coverage_slack: f64) -> Self {
        self.coverage_slack = coverage_slack;
        self
    }

    pub fn with_extend_ahead_ratio(mut self, extend_ahead_ratio: Option<f64>) -> Self {
        self.extend_ahead_ratio = extend_ahead_ratio;
        self
    }
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self::new(0)
    }
}
