use crate::estimate::SizeEstimate;
use crate::host::ScrollHost;
use crate::mapper::PositionMapper;
use crate::measure::CoverageTracker;
use crate::options::ReconcilerOptions;
use crate::{
    AlignDirection, Axis, ContinuousRange, Coverage, Edge, RenderWindow, SliderPosition,
    SpacerPair, locator, num,
};

// Correction passes per update cycle. Each pass sizes its extension from the
// measured pixel gap, which closes the full gap in one pass for uniform items
// and geometrically when the local items run smaller than the estimate; the
// bound guards against a hostile host that keeps moving the goalposts.
const MAX_COVERAGE_PASSES: usize = 8;

// Full re-evaluations per `update` call when requests arrive mid-cycle.
const MAX_UPDATE_PASSES: usize = 4;

// Residuals below this are treated as already flush during edge correction.
const EDGE_EPSILON: f64 = 0.01;

#[derive(Clone, Copy, Debug)]
struct IndexRequest {
    start: usize,
    end: Option<usize>,
    align: AlignDirection,
}

/// The render-window reconciler.
///
/// Owns the `[start_index, end_index)` window, the align direction, the
/// spacer sizes and all size statistics for one scroll container, and drives
/// the host through render → measure → correct cycles until the materialized
/// slice covers the viewport.
///
/// The engine is headless; all geometry flows through a [`ScrollHost`]. One
/// reconciler is bound 1:1 to one container and none of its state is shared.
#[derive(Clone, Debug)]
pub struct Reconciler {
    options: ReconcilerOptions,
    window: RenderWindow,
    align: AlignDirection,
    data_count: usize,
    reserved_pixels: f64,
    estimate: SizeEstimate,
    mapper: PositionMapper,
    tracker: CoverageTracker,
    spacers: SpacerPair,
    pending: Option<IndexRequest>,
    rendering: bool,
    connected: bool,
}

impl Reconciler {
    pub fn new(options: ReconcilerOptions) -> Self {
        let mut estimate = SizeEstimate::new();
        estimate.set_default_size(options.guessed_item_size);
        pdebug!(
            data_count = options.data_count,
            follower = options.follower,
            "Reconciler::new"
        );
        Self {
            data_count: options.data_count,
            reserved_pixels: options.reserved_pixels,
            options,
            window: RenderWindow::default(),
            align: AlignDirection::Start,
            estimate,
            mapper: PositionMapper::new(),
            tracker: CoverageTracker::new(),
            spacers: SpacerPair::default(),
            pending: None,
            rendering: false,
            connected: false,
        }
    }

    pub fn options(&self) -> &ReconcilerOptions {
        &self.options
    }

    pub fn axis(&self) -> Axis {
        self.options.axis
    }

    pub fn start_index(&self) -> usize {
        self.window.start_index
    }

    pub fn end_index(&self) -> usize {
        self.window.end_index
    }

    pub fn render_window(&self) -> RenderWindow {
        self.window
    }

    pub fn align_direction(&self) -> AlignDirection {
        self.align
    }

    pub fn data_count(&self) -> usize {
        self.data_count
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn size_estimate(&self) -> SizeEstimate {
        self.estimate
    }

    pub fn spacer_sizes(&self) -> SpacerPair {
        self.spacers
    }

    pub fn slider_position(&self) -> Option<SliderPosition> {
        self.tracker.slider_position().copied()
    }

    pub fn continuous_range(&self) -> Option<ContinuousRange> {
        self.tracker.continuous_range().copied()
    }

    /// Requests that the next update render a window containing `start`,
    /// pinned at the given edge (`Start` by default).
    ///
    /// With an explicit `end` the window is `[start, end)` literally,
    /// clamped to the dataset. This is the only path that may drive the
    /// scroll offset (never in follower mode).
    pub fn set_render_indices(
        &mut self,
        start: usize,
        end: Option<usize>,
        align: Option<AlignDirection>,
    ) {
        ptrace!(start, ?end, "set_render_indices");
        self.pending = Some(IndexRequest {
            start,
            end,
            align: align.unwrap_or_default(),
        });
    }

    pub fn set_data_count(&mut self, data_count: usize) {
        if self.data_count == data_count {
            return;
        }
        ptrace!(data_count, "set_data_count");
        self.data_count = data_count;
    }

    pub fn set_reserved_pixels(&mut self, reserved_pixels: f64) {
        self.reserved_pixels = reserved_pixels.max(0.0);
    }

    /// Seeds the size estimate so the first paint can skip the one-item
    /// bootstrap render.
    pub fn set_guessed_item_size(&mut self, size: f64) {
        self.estimate.set_default_size(size);
    }

    /// Discards all size statistics and cached geometry, for example after a
    /// drastic reflow that invalidates every prior measurement. The guessed
    /// item size survives.
    pub fn invalidate(&mut self) {
        self.estimate.invalidate();
        self.mapper.invalidate();
        self.tracker.invalidate();
    }

    /// Marks the container as present in the visible tree. All geometry is
    /// re-derived from scratch on the next update; a container can have been
    /// detached and re-attached elsewhere.
    pub fn connect(&mut self) {
        if self.connected {
            return;
        }
        self.connected = true;
        self.rendering = false;
        self.tracker.invalidate();
        self.spacers = SpacerPair::default();
    }

    /// Detaches the reconciler from its container; updates become no-ops
    /// and cached geometry is dropped.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.rendering = false;
        self.tracker.invalidate();
    }

    /// Global index of the rendered item at the viewport edge in
    /// `direction`.
    pub fn locate_visible_index<H: ScrollHost>(&self, host: &H, direction: AlignDirection) -> usize {
        let local = locator::locate(host, direction);
        (self.window.start_index + local).min(self.window.end_index)
    }

    /// Classifies whether the last rendered slice still covers the viewport.
    pub fn check_coverage<H: ScrollHost>(&self, host: &H) -> Option<Coverage> {
        self.tracker
            .check_coverage(host, self.window, self.data_count, self.options.coverage_slack)
    }

    /// Runs one reconciliation cycle: apply any pending index request or
    /// data change, render, measure the committed geometry, and correct
    /// coverage misses until the slice covers the viewport.
    ///
    /// Re-entrant calls (a host notifying from inside its own render) are
    /// no-ops; the next natural update tick re-triggers them. A request
    /// arriving mid-correction supersedes the correction and is re-evaluated
    /// from fresh state within the same call.
    pub fn update<H: ScrollHost>(&mut self, host: &mut H) {
        if self.rendering {
            pwarn!("update ignored while a render cycle is active");
            return;
        }
        if !self.connected {
            return;
        }
        self.rendering = true;
        let mut passes = 0;
        loop {
            self.run_cycle(host);
            passes += 1;
            if self.pending.is_none() || passes >= MAX_UPDATE_PASSES {
                break;
            }
        }
        self.rendering = false;
    }

    fn run_cycle<H: ScrollHost>(&mut self, host: &mut H) {
        self.mapper.sync_hints(host.end_position_hints());
        match self.pending.take() {
            Some(request) => self.apply_request(host, request),
            None => self.apply_refresh(host),
        }
        if self.data_count == 0 || self.window.is_empty() {
            return;
        }
        self.absorb_measurement(host);
        self.update_spacers(host);

        let mut corrections = 0;
        while corrections < MAX_COVERAGE_PASSES {
            let Some(coverage) = self.classify(host) else {
                break;
            };
            pdebug!(
                ?coverage,
                start = self.window.start_index,
                end = self.window.end_index,
                "coverage miss"
            );
            match coverage {
                Coverage::Break => self.recover_from_break(host),
                Coverage::Start => self.extend_window(host, AlignDirection::Start),
                Coverage::End => self.extend_window(host, AlignDirection::End),
            }
            self.absorb_measurement(host);
            if self.correct_edges(host) {
                self.absorb_measurement(host);
            }
            self.update_spacers(host);
            if self.pending.is_some() {
                // a newer request supersedes this correction pass
                return;
            }
            corrections += 1;
        }
    }

    fn absorb_measurement<H: ScrollHost>(&mut self, host: &H) {
        if let Some(range) = self.tracker.measure_after_render(host, self.window) {
            self.estimate.update(range.len(), range.pixel_span());
            self.mapper.observe_span(&range);
        }
    }

    fn safe_count<H: ScrollHost>(&self, host: &H, proposed: usize) -> usize {
        let count =
            self.estimate
                .safe_render_count(host.client_size(), self.reserved_pixels, proposed);
        match self.options.max_render_count {
            Some(max) => count.min(max).max(1),
            None => count,
        }
    }

    fn apply_request<H: ScrollHost>(&mut self, host: &mut H, request: IndexRequest) {
        let dc = self.data_count;
        if dc == 0 {
            self.window = RenderWindow::default();
            self.align = AlignDirection::Start;
            if host.rendered_count() != 0 {
                host.render(self.window);
            }
            return;
        }
        let count = self.safe_count(host, self.window.len().max(1));
        let (start, end) = match (request.end, request.align) {
            (Some(requested_end), _) => {
                let end = requested_end.min(dc).max(1);
                (request.start.min(end - 1), end)
            }
            (None, AlignDirection::Start) => {
                let start = request.start.min(dc - 1);
                let end = (start + count).min(dc);
                // fill the viewport even when the request lands near the tail
                (start.min(end.saturating_sub(count)), end)
            }
            (None, AlignDirection::End) => {
                let end = (request.start + 1).min(dc);
                (end.saturating_sub(count), end)
            }
        };
        self.window = RenderWindow::new(start, end);
        self.align = request.align;
        host.render(self.window);
        self.update_spacers(host);
        self.reset_positions(host, false);
    }

    fn apply_refresh<H: ScrollHost>(&mut self, host: &mut H) {
        let dc = self.data_count;
        if dc == 0 {
            if !self.window.is_empty() || host.rendered_count() != 0 {
                self.window = RenderWindow::default();
                self.align = AlignDirection::Start;
                host.render(self.window);
            }
            return;
        }
        if self.window.is_empty() {
            // first update with data present; the user's scroll position
            // (and any content before the list) is left alone
            let count = self.safe_count(host, 1);
            self.window = RenderWindow::new(0, count.min(dc));
            self.align = AlignDirection::Start;
            host.render(self.window);
            self.update_spacers(host);
            self.reset_positions(host, true);
            return;
        }
        if self.window.end_index > dc {
            // data shrank under the window: clamp and re-derive positions,
            // leaving the scroll offset alone
            let count = self.window.len().min(dc).max(1);
            let end = dc;
            let start = self.window.start_index.min(end.saturating_sub(count));
            self.window = RenderWindow::new(start, end.max(start + 1).min(dc));
            self.align = AlignDirection::Start;
            host.render(self.window);
            self.reset_positions(host, true);
            return;
        }
        if self.align == AlignDirection::End {
            // End alignment cannot be trusted to survive a content change:
            // pin the slice to the previously known start pixel instead of
            // trusting stale placement
            if let Some(position) = self.tracker.slider_position() {
                let leading = position.start_offset - position.initial_offset;
                host.set_slice_position(Edge::Leading, leading);
            }
            self.align = AlignDirection::Start;
            return;
        }
        if host.rendered_count() != self.window.len() {
            // reconnected or externally disturbed host: re-materialize
            host.render(self.window);
        }
        // otherwise keep start_index as-is to persist scroll continuity;
        // measurement and coverage correction handle the rest
    }

    fn reset_positions<H: ScrollHost>(&mut self, host: &mut H, indices_from_scroll: bool) {
        let client = host.client_size();
        let estimate = self.estimate.estimate();
        let drive_scroll = !self.options.follower && !indices_from_scroll;
        match self.align {
            AlignDirection::Start => {
                let position = self.mapper.position_of_index(
                    self.window.start_index,
                    AlignDirection::Start,
                    estimate,
                    client,
                );
                host.set_slice_position(Edge::Leading, position);
                if drive_scroll {
                    let target = host.list_origin() + position;
                    host.set_scroll_offset(self.clamp_scroll(host, target));
                }
            }
            AlignDirection::End => {
                let boundary = self.mapper.position_of_index(
                    self.window.end_index,
                    AlignDirection::Start,
                    estimate,
                    client,
                );
                host.set_slice_position(Edge::Trailing, boundary);
                if drive_scroll {
                    let target = host.list_origin()
                        + self.mapper.position_of_index(
                            self.window.end_index,
                            AlignDirection::End,
                            estimate,
                            client,
                        );
                    host.set_scroll_offset(self.clamp_scroll(host, target));
                }
            }
        }
    }

    fn clamp_scroll<H: ScrollHost>(&self, host: &H, offset: f64) -> f64 {
        let max = (host.content_size() - host.client_size()).max(0.0);
        offset.clamp(0.0, max)
    }

    fn classify<H: ScrollHost>(&self, host: &H) -> Option<Coverage> {
        if let Some(coverage) = self.check_coverage(host) {
            return Some(coverage);
        }
        // Optional pre-emptive extension: grow before the edge is uncovered
        // once the rendered span remaining on one side falls below the
        // configured fraction of the slice.
        let ratio = self.options.extend_ahead_ratio?;
        let position = self.tracker.slider_position()?;
        let span = (position.end_offset - position.start_offset).max(0.0);
        let scroll = host.scroll_offset();
        let ahead = position.end_offset - (scroll + host.client_size());
        let behind = scroll - position.start_offset;
        if self.window.end_index < self.data_count && ahead >= 0.0 && ahead < ratio * span {
            return Some(Coverage::End);
        }
        if self.window.start_index > 0 && behind >= 0.0 && behind < ratio * span {
            return Some(Coverage::Start);
        }
        None
    }

    fn recover_from_break<H: ScrollHost>(&mut self, host: &mut H) {
        let dc = self.data_count;
        let offset_in_list = (host.scroll_offset() - host.list_origin()).max(0.0);
        let start =
            self.mapper
                .index_from_offset(offset_in_list, self.estimate.estimate(), dc);
        let count = self.safe_count(host, self.window.len().max(1));
        let end = (start + count).min(dc);
        let start = start.min(end.saturating_sub(count)).min(end.saturating_sub(1));
        self.window = RenderWindow::new(start, end.max(start + 1).min(dc));
        self.align = AlignDirection::Start;
        pdebug!(start, end, "break recovery");
        host.render(self.window);
        // indices were derived from the scroll offset: position the slice,
        // never drive scrolling
        self.reset_positions(host, true);
    }

    fn extend_window<H: ScrollHost>(&mut self, host: &mut H, at: AlignDirection) {
        let dc = self.data_count;
        let rendered = host.rendered_count();
        if rendered == 0 {
            return;
        }
        let client = host.client_size();
        let estimate = self.estimate.estimate().max(1.0);
        let current = self.window;
        let needed = self.safe_count(host, current.len());
        let position = self.tracker.slider_position().copied();
        let scroll = host.scroll_offset();

        // Anchor continuity at the opposite, still covered edge.
        let anchor_direction = match at {
            AlignDirection::Start => AlignDirection::End,
            AlignDirection::End => AlignDirection::Start,
        };
        let anchor_local = locator::locate(host, anchor_direction).min(rendered - 1);
        let anchor_global = current.start_index + anchor_local;
        let anchor_pixel = host.item_start(anchor_local);

        let (new_start, new_end) = match at {
            AlignDirection::Start => {
                let gap = position
                    .map(|p| p.start_offset - scroll)
                    .unwrap_or(0.0)
                    .max(0.0);
                let by_gap = num::ceil(gap / estimate) as usize;
                let grow = by_gap.max(needed.saturating_sub(current.len())).max(1);
                let start = current.start_index.saturating_sub(grow);
                let mut end = current.end_index;
                if let Some(max) = self.options.max_render_count {
                    if end - start > max {
                        end = start + max;
                    }
                }
                (start, end.max(anchor_global + 1).min(dc))
            }
            AlignDirection::End => {
                let gap = position
                    .map(|p| (scroll + client) - p.end_offset)
                    .unwrap_or(0.0)
                    .max(0.0);
                let by_gap = num::ceil(gap / estimate) as usize;
                let grow = by_gap.max(needed.saturating_sub(current.len())).max(1);
                let end = (current.end_index + grow).min(dc);
                let mut start = current.start_index;
                if let Some(max) = self.options.max_render_count {
                    if end - start > max {
                        start = end - max;
                    }
                }
                (start.min(anchor_global), end)
            }
        };
        if new_start == current.start_index && new_end == current.end_index {
            return; // already at the dataset boundary
        }
        self.window = RenderWindow::new(new_start, new_end);
        self.align = anchor_direction;
        ptrace!(
            new_start,
            new_end,
            anchor = anchor_global,
            "extend render window"
        );
        host.render(self.window);

        // Restore the anchor's measured position so the already-visible
        // content does not jump; the newly uncovered edge lands wherever its
        // measured size puts it, not where an estimate would.
        let anchor_local_after = anchor_global - new_start;
        let delta = host.item_start(anchor_local_after) - anchor_pixel;
        if delta != 0.0 {
            let leading = host.slice_start() - host.list_origin() - delta;
            host.set_slice_position(Edge::Leading, leading);
        }
    }

    // Boundary snap pass, run after coverage-triggered re-renders. Returns
    // whether any geometry was written.
    fn correct_edges<H: ScrollHost>(&mut self, host: &mut H) -> bool {
        let dc = self.data_count;
        if dc == 0 || self.window.is_empty() {
            return false;
        }
        let follower = self.options.follower;
        let origin = host.list_origin();
        let estimate = self.estimate.estimate();
        let mut wrote = false;

        let leading = host.slice_start() - origin;
        if self.window.start_index == 0 {
            if leading.abs() > EDGE_EPSILON {
                // snap index 0 exactly flush with the content start
                host.set_slice_position(Edge::Leading, 0.0);
                if self.spacers.front != 0.0 {
                    host.set_spacer_size(Edge::Leading, 0.0);
                    self.spacers.front = 0.0;
                }
                if !follower {
                    host.set_scroll_offset((host.scroll_offset() - leading).max(0.0));
                }
                wrote = true;
            }
        } else if leading <= 0.0 {
            // the estimate under-shot: make room so the items before
            // start_index are not skipped past
            let target = (self.window.start_index as f64 * estimate).max(estimate);
            let shortfall = target - leading;
            host.set_slice_position(Edge::Leading, target);
            host.set_spacer_size(Edge::Leading, target);
            self.spacers.front = target;
            if !follower {
                host.set_scroll_offset(host.scroll_offset() + shortfall);
            }
            wrote = true;
        }

        if follower {
            // the surrounding document owns the trailing extent
            return wrote;
        }
        let trailing = host.slice_start() + host.slice_size() - origin;
        if self.window.end_index == dc {
            if self.spacers.back != 0.0 {
                host.set_spacer_size(Edge::Trailing, 0.0);
                self.spacers.back = 0.0;
                wrote = true;
            }
            let max_scroll = (host.content_size() - host.client_size()).max(0.0);
            if host.scroll_offset() > max_scroll + EDGE_EPSILON {
                host.set_scroll_offset(max_scroll);
                wrote = true;
            }
        } else {
            let content_after = host.content_size() - origin - trailing;
            if content_after <= 0.0 {
                // no room left for the unrendered tail
                let needed =
                    ((dc - self.window.end_index) as f64 * estimate).max(estimate) - content_after;
                self.spacers.back += needed;
                host.set_spacer_size(Edge::Trailing, self.spacers.back);
                wrote = true;
            }
        }
        wrote
    }

    fn update_spacers<H: ScrollHost>(&mut self, host: &mut H) {
        let dc = self.data_count;
        let client = host.client_size();
        let estimate = self.estimate.estimate();
        let window = self.window;

        let front_target = if window.start_index == 0 {
            0.0
        } else {
            self.mapper
                .position_of_index(window.start_index, AlignDirection::Start, estimate, client)
        };
        let back_target = if window.end_index >= dc {
            0.0
        } else {
            let boundary = self.mapper.position_of_index(
                window.end_index,
                AlignDirection::Start,
                estimate,
                client,
            );
            (self.mapper.total_extent(dc, estimate) - boundary).max(0.0)
        };

        let mut wrote = false;
        if self.tracker.should_update_spacer_size(
            Edge::Leading,
            front_target,
            self.spacers.front,
            dc,
            estimate,
            window,
            self.options.spacer_estimate_threshold,
            self.options.spacer_discrepancy_ratio,
        ) {
            host.set_spacer_size(Edge::Leading, front_target);
            self.spacers.front = front_target;
            wrote = true;
        }
        // Follower mode keeps a single spacer: the surrounding document owns
        // the trailing extent.
        if !self.options.follower
            && self.tracker.should_update_spacer_size(
                Edge::Trailing,
                back_target,
                self.spacers.back,
                dc,
                estimate,
                window,
                self.options.spacer_estimate_threshold,
                self.options.spacer_discrepancy_ratio,
            )
        {
            host.set_spacer_size(Edge::Trailing, back_target);
            self.spacers.back = back_target;
            wrote = true;
        }
        if wrote {
            ptrace!(
                front = self.spacers.front,
                back = self.spacers.back,
                "spacer update"
            );
            self.tracker.note_spacer_update(dc, estimate, window);
        }
    }
}
