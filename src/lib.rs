//! A headless partial (virtualized) list rendering engine.
//!
//! Given a dataset of N items and a viewport that can only usefully display
//! a small contiguous slice of them, this crate continuously decides which
//! index range to materialize, keeps the slice visually aligned with the
//! scroll position, and fakes the rest with inert spacers. Per-item size is
//! unknown in advance: it is estimated from what actually rendered and
//! self-corrects over time.
//!
//! It is UI-agnostic. A host layer implements [`ScrollHost`] to provide:
//! - viewport and scroll geometry
//! - committed positions/sizes of rendered items
//! - the render call that materializes a [`RenderWindow`]
//!
//! and drives the engine by calling [`Reconciler::update`] whenever scroll,
//! data, or explicit navigation requests change.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod axis;
mod engine;
mod estimate;
mod host;
pub mod locator;
mod mapper;
mod measure;
mod num;
mod options;
mod search;
mod types;


pub use axis::{Axis, Extent2};
pub use engine::Reconciler;
pub use estimate::SizeEstimate;
pub use host::ScrollHost;
pub use mapper::{PositionMapper, PositionMode};
pub use measure::CoverageTracker;
pub use options::ReconcilerOptions;
pub use search::{
    binary_find_insert_index, binary_find_insert_index_with_addition_size, binary_locate,
};
pub use types::{
    AlignDirection, ContinuousRange, Coverage, Edge, RenderWindow, SliderPosition, SpacerPair,
};
