use crate::num;

/// Running per-item size statistics built from observed contiguous spans.
///
/// Observations are folded with weighted Welford accumulation, so one pass
/// suffices and no history buffer is retained. An observation of `n` items
/// covering `p` pixels contributes the sample `p / n` with weight `n`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeEstimate {
    average: f64,
    m2: f64,
    weight: f64,
    default_size: f64,
}

impl SizeEstimate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one observation of `item_count` items spanning `pixel_size`
    /// pixels. Ignored when `item_count == 0`.
    pub fn update(&mut self, item_count: usize, pixel_size: f64) {
        if item_count == 0 {
            return;
        }
        let w = item_count as f64;
        let sample = pixel_size / w;
        self.weight += w;
        let delta = sample - self.average;
        self.average += delta * w / self.weight;
        self.m2 += w * delta * (sample - self.average);
        ptrace!(
            item_count,
            pixel_size,
            average = self.average,
            "SizeEstimate::update"
        );
    }

    /// The current per-item size estimate.
    ///
    /// Falls back to the seeded default size before any observation, and to
    /// `0.0` when no seed was provided either.
    pub fn estimate(&self) -> f64 {
        if self.weight > 0.0 {
            self.average
        } else {
            self.default_size
        }
    }

    pub fn variance(&self) -> f64 {
        if self.weight > 0.0 { self.m2 / self.weight } else { 0.0 }
    }

    pub fn sample_weight(&self) -> f64 {
        self.weight
    }

    /// Whether at least one real observation backs the estimate.
    pub fn is_settled(&self) -> bool {
        self.weight > 0.0
    }

    /// Seeds the estimate used before the first observation, avoiding the
    /// single-item bootstrap render when the caller can guess item size.
    pub fn set_default_size(&mut self, size: f64) {
        self.default_size = size.max(0.0);
    }

    pub fn default_size(&self) -> f64 {
        self.default_size
    }

    /// Discards all prior observations. The seeded default size survives.
    pub fn invalidate(&mut self) {
        self.average = 0.0;
        self.m2 = 0.0;
        self.weight = 0.0;
    }

    /// Computes how many items are needed to fill `viewport + reserved`
    /// pixels.
    ///
    /// Returns `proposed` unchanged when it is already within 0.5 of the
    /// freshly computed count and not smaller than the minimum needed to
    /// literally fill the viewport; the hysteresis prevents the window from
    /// oscillating by one item due to floating-point noise. With no estimate
    /// at all, returns `1` so the host can produce the first measurement.
    pub fn safe_render_count(&self, viewport: f64, reserved: f64, proposed: usize) -> usize {
        let estimate = self.estimate();
        if estimate <= 0.0 {
            return 1;
        }
        let raw = (viewport + reserved) / estimate;
        let minimum = num::ceil(viewport / estimate).max(1.0);
        let p = proposed as f64;
        if (p - raw).abs() <= 0.5 && p >= minimum {
            proposed
        } else {
            num::ceil(raw).max(1.0) as usize
        }
    }
}
