/// The scroll axis of a container.
///
/// The engine itself reasons in main-axis scalars only; this type is the
/// leaf helper adapters use to reduce 2D host geometry (sizes, offsets,
/// scroll positions) to those scalars in a direction-agnostic way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

/// A 2D extent or point in host coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent2 {
    pub x: f64,
    pub y: f64,
}

impl Extent2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Axis {
    /// The component of `e` along the scroll axis.
    pub fn main(self, e: Extent2) -> f64 {
        match self {
            Self::Vertical => e.y,
            Self::Horizontal => e.x,
        }
    }

    /// The component of `e` across the scroll axis.
    pub fn cross(self, e: Extent2) -> f64 {
        match self {
            Self::Vertical => e.x,
            Self::Horizontal => e.y,
        }
    }

    /// Builds a 2D extent from main/cross components.
    pub fn pack(self, main: f64, cross: f64) -> Extent2 {
        match self {
            Self::Vertical => Extent2 { x: cross, y: main },
            Self::Horizontal => Extent2 { x: main, y: cross },
        }
    }

    /// Replaces the main-axis component of `e`.
    pub fn with_main(self, e: Extent2, main: f64) -> Extent2 {
        self.pack(main, self.cross(e))
    }
}
