/// Which edge of the render window is pixel-pinned to a known position.
///
/// The other edge's pixel position is only known after the host finishes
/// laying out the rendered slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignDirection {
    #[default]
    Start,
    End,
}

/// A physical edge of an element along the scroll axis.
///
/// `Leading` is the top edge for vertical scrolling and the left edge for
/// horizontal scrolling; `Trailing` is the opposite edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Leading,
    Trailing,
}

/// Result of a coverage check against the visible viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Coverage {
    /// The slice's leading edge is inside the viewport; more items are
    /// needed before `start_index`.
    Start,
    /// The slice's trailing edge is inside the viewport; more items are
    /// needed after `end_index`.
    End,
    /// The slice has no pixel overlap with the viewport at all; the window
    /// must be recomputed from the current scroll offset.
    Break,
}

/// The contiguous `[start_index, end_index)` slice of the dataset currently
/// materialized by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderWindow {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl RenderWindow {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        debug_assert!(
            start_index <= end_index,
            "inverted render window (start={start_index}, end={end_index})"
        );
        Self {
            start_index,
            end_index,
        }
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

/// Pixel sizes of the two inert spacer elements placed around the slice.
///
/// Their only purpose is to keep the container's total scrollable extent
/// close to `estimated_item_size * data_count` so native scrollbar behavior
/// and offset-to-index math stay consistent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpacerPair {
    pub front: f64,
    pub back: f64,
}

/// Cached pixel geometry of the last completed render.
///
/// `start_offset`/`end_offset` are the slice's edges in content space (the
/// same space `ScrollHost::scroll_offset` is measured in); `initial_offset`
/// is the content offset where the virtualized region begins, accounting for
/// any sibling content before it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliderPosition {
    pub start_index: usize,
    pub end_index: usize,
    pub start_offset: f64,
    pub end_offset: f64,
    pub initial_offset: f64,
}

/// The largest index interval rendered without a discontinuous jump across
/// consecutive updates, with the content-space pixel positions of its edges.
///
/// Only size observations computed over this interval are trusted for
/// statistics; a window reset (for example a far scrollbar drag) starts a
/// fresh range.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContinuousRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
    pub start_position: f64,
    pub end_position: f64,
}

impl ContinuousRange {
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn pixel_span(&self) -> f64 {
        (self.end_position - self.start_position).max(0.0)
    }
}
