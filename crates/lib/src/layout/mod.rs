//! Weighted linear layout: boxes stacked vertically or horizontally, each child
//! sharing the free space along the main axis in proportion to its weight.
//!
//! A [`LinearLayout`] is a plain tree value. [`LinearLayout::materialize`] turns it
//! into a [`Grid`] of constraint cells, and [`Grid::arrange`] solves that grid into
//! rectangles for the GUI toolkit to draw into.

mod grid;
mod linear;

pub use grid::{CellContent, Grid, GridCell, Placement, Rect, Size};
pub use linear::{Child, ChildEntry, LinearLayout, Orientation, Padding, Weight};

/// Layout construction errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid layout weight {0}: weights must be finite and non-negative")]
    InvalidWeight(f64),
}
