use alloc::vec::Vec;

use crate::estimate::SizeEstimate;
use crate::search::binary_find_insert_index_with_addition_size;
use crate::{AlignDirection, ContinuousRange, num};

/// How the mapper converts between indexes and pixel positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionMode {
    /// Uniform estimate: every item is assumed to be `estimate` pixels.
    Uniform,
    /// Host-supplied monotone per-item end positions.
    Hinted,
}

/// Converts between item index and pixel offset along the scroll axis.
///
/// All positions are relative to the start of the virtualized region (the
/// host's `list_origin`). In hinted mode the host supplies a monotonically
/// increasing array of per-item end offsets; any uniform per-item size the
/// hints leave out (shared margins, separators) is estimated statistically
/// from rendered spans and folded into every lookup.
#[derive(Clone, Debug, Default)]
pub struct PositionMapper {
    end_positions: Vec<f64>,
    additional: SizeEstimate,
}

impl PositionMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PositionMode {
        if self.end_positions.is_empty() {
            PositionMode::Uniform
        } else {
            PositionMode::Hinted
        }
    }

    /// Replaces or clears the host-supplied end positions.
    ///
    /// The array must be ascending; a non-monotone array is a host defect
    /// and is ignored in release builds.
    pub fn sync_hints(&mut self, hints: Option<&[f64]>) {
        match hints {
            Some(hints) => {
                let monotone = hints.windows(2).all(|w| w[0] <= w[1]);
                debug_assert!(
                    monotone,
                    "end position hints must be monotonically increasing"
                );
                if !monotone {
                    pwarn!("ignoring non-monotone end position hints");
                    return;
                }
                if self.end_positions.as_slice() != hints {
                    self.end_positions.clear();
                    self.end_positions.extend_from_slice(hints);
                }
            }
            None => {
                self.end_positions.clear();
                self.additional.invalidate();
            }
        }
    }

    /// Folds one rendered continuous span into the additional-size estimate.
    ///
    /// Only meaningful in hinted mode: the uniform size the hints omit is
    /// the measured span minus the hinted span, spread over the items.
    pub fn observe_span(&mut self, range: &ContinuousRange) {
        if self.end_positions.is_empty() || range.is_empty() {
            return;
        }
        let hinted = self.raw_start(range.end_index) - self.raw_start(range.start_index);
        let extra = (range.pixel_span() - hinted).max(0.0);
        self.additional.update(range.len(), extra);
    }

    pub fn additional_size(&self) -> f64 {
        self.additional.estimate()
    }

    /// Forgets both the hints and the additional-size statistics.
    pub fn invalidate(&mut self) {
        self.end_positions.clear();
        self.additional.invalidate();
    }

    // Hinted start position of item `index`, without the additional size.
    fn raw_start(&self, index: usize) -> f64 {
        if index == 0 {
            0.0
        } else {
            let i = index.min(self.end_positions.len());
            self.end_positions[i - 1]
        }
    }

    fn hinted_start(&self, index: usize) -> f64 {
        self.raw_start(index) + self.additional.estimate() * index as f64
    }

    /// Pixel position of the boundary before item `index`.
    ///
    /// With `AlignDirection::Start` this is the scroll target that puts the
    /// boundary flush with the viewport's leading edge; with `End` it is the
    /// target that puts it flush with the trailing edge instead.
    pub fn position_of_index(
        &self,
        index: usize,
        align: AlignDirection,
        estimate: f64,
        viewport: f64,
    ) -> f64 {
        let base = match self.mode() {
            PositionMode::Uniform => index as f64 * estimate,
            PositionMode::Hinted => self.hinted_start(index),
        };
        match align {
            AlignDirection::Start => base,
            AlignDirection::End => (base - viewport).max(0.0),
        }
    }

    /// Inverse of [`Self::position_of_index`]: the index of the item at
    /// `offset` pixels from the start of the virtualized region.
    ///
    /// Division in uniform mode, binary search in hinted mode. The result is
    /// clamped to a valid item index.
    pub fn index_from_offset(&self, offset: f64, estimate: f64, data_count: usize) -> usize {
        if data_count == 0 || offset <= 0.0 {
            return 0;
        }
        let index = match self.mode() {
            PositionMode::Uniform => {
                if estimate <= 0.0 {
                    0
                } else {
                    num::floor(offset / estimate) as usize
                }
            }
            PositionMode::Hinted => binary_find_insert_index_with_addition_size(
                &self.end_positions,
                self.additional.estimate(),
                offset,
            ),
        };
        index.min(data_count - 1)
    }

    /// Total pixel extent of `data_count` items.
    pub fn total_extent(&self, data_count: usize, estimate: f64) -> f64 {
        match self.mode() {
            PositionMode::Uniform => data_count as f64 * estimate,
            PositionMode::Hinted => self.hinted_start(data_count.min(self.end_positions.len())),
        }
    }
}
