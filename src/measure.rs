use crate::host::ScrollHost;
use crate::{ContinuousRange, Coverage, Edge, RenderWindow, SliderPosition};

/// Post-render geometry intake and viewport coverage classification.
///
/// The tracker owns the [`SliderPosition`] record bridging index space and
/// pixel space, the [`ContinuousRange`] that gates trustworthy size
/// observations, and the caches behind the lazy spacer-resize policy.
#[derive(Clone, Debug, Default)]
pub struct CoverageTracker {
    position: Option<SliderPosition>,
    continuous: Option<ContinuousRange>,
    last_fed: Option<(usize, usize)>,
    spacer_data_count: Option<usize>,
    spacer_estimate: f64,
    spacer_window: Option<RenderWindow>,
}

impl CoverageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slider_position(&self) -> Option<&SliderPosition> {
        self.position.as_ref()
    }

    pub fn continuous_range(&self) -> Option<&ContinuousRange> {
        self.continuous.as_ref()
    }

    /// Drops all cached geometry. Called on disconnect/reconnect so a moved
    /// container never trusts stale positions.
    pub fn invalidate(&mut self) {
        self.position = None;
        self.continuous = None;
        self.last_fed = None;
        self.spacer_data_count = None;
        self.spacer_estimate = 0.0;
        self.spacer_window = None;
    }

    /// Reads the committed geometry of the just-rendered `window`, updates
    /// the slider position record and the continuous range.
    ///
    /// Returns the continuous range when it changed, i.e. when it carries a
    /// size observation that has not been fed to the estimator yet. Naively
    /// sizing every raw render would double-count items whenever the window
    /// only partially changed between calls; the continuous span is the only
    /// unbiased measurement.
    pub fn measure_after_render<H: ScrollHost>(
        &mut self,
        host: &H,
        window: RenderWindow,
    ) -> Option<ContinuousRange> {
        debug_assert!(
            window.start_index <= window.end_index,
            "inverted render window (start={}, end={})",
            window.start_index,
            window.end_index
        );
        debug_assert!(
            host.rendered_count() == window.len(),
            "host rendered {} items for a window of {}",
            host.rendered_count(),
            window.len()
        );

        let slice_start = host.slice_start();
        let slice_end = slice_start + host.slice_size();
        self.position = Some(SliderPosition {
            start_index: window.start_index,
            end_index: window.end_index,
            start_offset: slice_start,
            end_offset: slice_end,
            initial_offset: host.list_origin(),
        });

        if window.is_empty() {
            self.continuous = None;
            self.last_fed = None;
            return None;
        }

        let merged = match self.continuous {
            // Overlapping or touching windows extend the tracked range; the
            // edge positions follow whichever window reaches further.
            Some(range)
                if window.start_index <= range.end_index
                    && window.end_index >= range.start_index =>
            {
                let (start_index, start_position) = if window.start_index <= range.start_index {
                    (window.start_index, slice_start)
                } else {
                    (range.start_index, range.start_position)
                };
                let (end_index, end_position) = if window.end_index >= range.end_index {
                    (window.end_index, slice_end)
                } else {
                    (range.end_index, range.end_position)
                };
                ContinuousRange {
                    start_index,
                    end_index,
                    start_position,
                    end_position,
                }
            }
            _ => {
                ptrace!(
                    start = window.start_index,
                    end = window.end_index,
                    "continuous range reset"
                );
                ContinuousRange {
                    start_index: window.start_index,
                    end_index: window.end_index,
                    start_position: slice_start,
                    end_position: slice_end,
                }
            }
        };
        self.continuous = Some(merged);

        let key = (merged.start_index, merged.end_index);
        if self.last_fed == Some(key) {
            None
        } else {
            self.last_fed = Some(key);
            Some(merged)
        }
    }

    /// Classifies whether the last rendered slice still visually covers the
    /// viewport.
    ///
    /// `slack` is the pixel margin tolerated at either edge before a miss is
    /// reported (1px by default; sub-pixel rounding must not trigger
    /// corrections).
    pub fn check_coverage<H: ScrollHost>(
        &self,
        host: &H,
        window: RenderWindow,
        data_count: usize,
        slack: f64,
    ) -> Option<Coverage> {
        let position = self.position.as_ref()?;
        if data_count == 0 || window.is_empty() {
            return None;
        }

        let scroll = host.scroll_offset();
        let client = host.client_size();
        let relative_start = position.start_offset - scroll;
        let relative_end = position.end_offset - scroll;

        if relative_end <= 0.0 || relative_start >= client {
            return Some(Coverage::Break);
        }
        // Content before the list origin belongs to siblings; the leading
        // gap only counts from wherever the virtualized region begins.
        let list_start = position.initial_offset;
        let visible_start = scroll.max(list_start);
        if position.start_offset - visible_start > slack
            || (scroll <= list_start && window.start_index > 0)
        {
            return Some(Coverage::Start);
        }
        let at_content_end = scroll + client >= host.content_size();
        if relative_end < client - slack || (at_content_end && window.end_index < data_count) {
            return Some(Coverage::End);
        }
        None
    }

    /// The three-tier gate behind spacer resizing.
    ///
    /// Placeholder resizing is expensive and can itself perturb the scroll
    /// position, so it happens only when: (a) the data count changed, (b)
    /// the estimate moved more than `estimate_threshold` pixels since the
    /// last spacer computation, or (c) the window edge adjacent to this
    /// spacer advanced and the discrepancy relative to the extent beyond the
    /// known slice edge exceeds `discrepancy_ratio`. Pure scroll-up (edges
    /// receding) never resizes.
    #[allow(clippy::too_many_arguments)]
    pub fn should_update_spacer_size(
        &self,
        edge: Edge,
        new_size: f64,
        cached_size: f64,
        data_count: usize,
        estimate: f64,
        window: RenderWindow,
        estimate_threshold: f64,
        discrepancy_ratio: f64,
    ) -> bool {
        if self.spacer_data_count != Some(data_count) {
            return true;
        }
        if (estimate - self.spacer_estimate).abs() > estimate_threshold {
            return true;
        }
        let Some(cached_window) = self.spacer_window else {
            return true;
        };
        let advanced = match edge {
            Edge::Leading => window.start_index > cached_window.start_index,
            Edge::Trailing => window.end_index > cached_window.end_index,
        };
        if !advanced {
            return false;
        }
        let discrepancy = (new_size - cached_size).abs();
        discrepancy > new_size.max(1.0) * discrepancy_ratio
    }

    /// Records the inputs of the latest spacer computation.
    pub fn note_spacer_update(&mut self, data_count: usize, estimate: f64, window: RenderWindow) {
        self.spacer_data_count = Some(data_count);
        self.spacer_estimate = estimate;
        self.spacer_window = Some(window);
    }
}
