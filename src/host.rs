use crate::{Edge, RenderWindow};

/// The contract a host environment provides to the reconciler.
///
/// The engine is headless: it never holds UI objects. It reads committed
/// geometry through the getters here and writes position/size instructions
/// back through the setters; the host owns the actual layout.
///
/// Coordinate spaces:
/// - `scroll_offset`, `content_size`, `slice_start` and `item_start` are in
///   *content space*: pixels from the start of the scrollable content.
/// - `set_slice_position` and spacer sizes are relative to `list_origin`,
///   the content offset where the virtualized region begins (siblings such
///   as headers may precede it).
///
/// Two-phase discipline: [`Self::render`] is the single write-flush point.
/// It must materialize exactly the items in `[start_index, end_index)` and
/// return only once layout for them is committed, so every getter called
/// afterwards observes the rendered result. The engine never reads geometry
/// between issuing writes and the completion of `render`; a host that lays
/// out lazily must flush inside `render`.
pub trait ScrollHost {
    /// Size of the visible viewport along the scroll axis.
    fn client_size(&self) -> f64;

    /// Current scrolled distance.
    fn scroll_offset(&self) -> f64;

    /// Drives the scroll position. Only explicit index requests and edge
    /// corrections call this; it is never called in follower mode.
    fn set_scroll_offset(&mut self, offset: f64);

    /// Total scrollable extent of the content.
    fn content_size(&self) -> f64;

    /// Content offset where the virtualized region begins.
    fn list_origin(&self) -> f64 {
        0.0
    }

    /// Number of currently materialized items.
    fn rendered_count(&self) -> usize;

    /// Content-space leading edge of the rendered item at `local_index`
    /// (relative to the window, not the dataset).
    fn item_start(&self, local_index: usize) -> f64;

    /// Size of the rendered item at `local_index` along the scroll axis.
    fn item_size(&self, local_index: usize) -> f64;

    /// Content-space leading edge of the materialized slice.
    fn slice_start(&self) -> f64;

    /// Pixel size of the materialized slice along the scroll axis.
    fn slice_size(&self) -> f64;

    /// Positions the slice so the given edge sits at `position` pixels from
    /// `list_origin`.
    fn set_slice_position(&mut self, edge: Edge, position: f64);

    /// Resizes the spacer at the given edge of the slice.
    fn set_spacer_size(&mut self, edge: Edge, size: f64);

    /// Materializes exactly the items in `window`, committing layout before
    /// returning.
    fn render(&mut self, window: RenderWindow);

    /// Optional monotone per-item end offsets (ignoring any uniform margins
    /// the host cannot cheaply include), refreshed before each update.
    fn end_position_hints(&self) -> Option<&[f64]> {
        None
    }
}
