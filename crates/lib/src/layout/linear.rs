//! Linear layout tree (vertical/horizontal boxes with weighted children).

use super::grid::{CellContent, Grid, GridCell};
use super::LayoutError;

/// Axis along which a layout stacks its children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Space kept between a child and the edges of its cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const ZERO: Padding = Padding {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(padding: f32) -> Self {
        Self::new(padding, padding, padding, padding)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Relative share of free space along the main axis. Only meaningful compared to
/// sibling weights; 0 keeps the child at its natural size.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    /// Child takes its share of free space (the default for [`LinearLayout::add`]).
    pub const FILL: Weight = Weight(1.0);
    /// Child keeps its natural size along the main axis.
    pub const NATURAL: Weight = Weight(0.0);

    pub fn new(value: f64) -> Result<Self, LayoutError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(LayoutError::InvalidWeight(value))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::FILL
    }
}

impl TryFrom<f64> for Weight {
    type Error = LayoutError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Weight::new(value)
    }
}

/// Something placed in a layout: a caller's widget handle or a nested layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Child<W> {
    Widget(W),
    Layout(LinearLayout<W>),
}

impl<W> From<LinearLayout<W>> for Child<W> {
    fn from(layout: LinearLayout<W>) -> Self {
        Child::Layout(layout)
    }
}

/// One child with the weight and padding it was added with.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildEntry<W> {
    pub child: Child<W>,
    pub weight: Weight,
    pub padding: Padding,
}

/// A box that stacks children along one axis.
///
/// Padding is captured per child when it is added: changing the padding later
/// only affects children added after the change. A hidden layout keeps its slot
/// in the parent but takes no space and places nothing.
///
/// ```
/// use wcschat::layout::{Child, LinearLayout, Padding, Weight};
///
/// let header = LinearLayout::horizontal()
///     .with_padding(Padding::new(5.0, 0.0, 5.0, 0.0))
///     .add(Child::Widget("title"))
///     .add_weighted(Child::Widget("clear"), Weight::NATURAL);
/// let root = LinearLayout::vertical().add_weighted(header, Weight::NATURAL);
/// assert_eq!(root.materialize().cells().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearLayout<W> {
    orientation: Orientation,
    padding: Padding,
    visible: bool,
    children: Vec<ChildEntry<W>>,
}

impl<W> Default for LinearLayout<W> {
    fn default() -> Self {
        Self::new(Orientation::default())
    }
}

impl<W> LinearLayout<W> {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            padding: Padding::ZERO,
            visible: true,
            children: Vec::new(),
        }
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.set_orientation(orientation);
        self
    }

    /// Padding that the next added children will carry.
    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.set_padding(padding);
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.set_visible(visible);
        self
    }

    pub fn children(&self) -> &[ChildEntry<W>] {
        &self.children
    }

    /// Append a child with the current padding snapshot.
    pub fn push(&mut self, child: impl Into<Child<W>>, weight: Weight) {
        self.children.push(ChildEntry {
            child: child.into(),
            weight,
            padding: self.padding,
        });
    }

    /// Append a child with weight 1.0.
    pub fn add(self, child: impl Into<Child<W>>) -> Self {
        self.add_weighted(child, Weight::FILL)
    }

    pub fn add_weighted(mut self, child: impl Into<Child<W>>, weight: Weight) -> Self {
        self.push(child, weight);
        self
    }

    /// Like [`add_weighted`](Self::add_weighted) with a raw weight, rejecting
    /// negative or non-finite values.
    pub fn try_add(self, child: impl Into<Child<W>>, weight: f64) -> Result<Self, LayoutError> {
        let weight = Weight::new(weight)?;
        Ok(self.add_weighted(child, weight))
    }
}

impl<W: Clone> LinearLayout<W> {
    /// Build the constraint grid for the current tree. Child `i` sits at
    /// `(0, i)` when vertical and `(i, 0)` when horizontal; its weight goes on the
    /// main axis and the cross axis gets 1.0. Nested layouts are materialized
    /// first and placed as a whole in their parent cell. A hidden layout gives an
    /// empty grid; as a nested child its cell keeps no weight and no padding.
    pub fn materialize(&self) -> Grid<W> {
        if !self.visible {
            return Grid::new(Vec::new());
        }
        let cells = self
            .children
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let hidden = matches!(&entry.child, Child::Layout(nested) if !nested.visible);
                let (weight, cross, insets) = if hidden {
                    (0.0, 0.0, Padding::ZERO)
                } else {
                    (entry.weight.get(), 1.0, entry.padding)
                };
                let (x, y, weight_x, weight_y) = match self.orientation {
                    Orientation::Vertical => (0, i, cross, weight),
                    Orientation::Horizontal => (i, 0, weight, cross),
                };
                let content = match &entry.child {
                    Child::Widget(w) => CellContent::Widget(w.clone()),
                    Child::Layout(nested) => CellContent::Grid(nested.materialize()),
                };
                GridCell {
                    x,
                    y,
                    weight_x,
                    weight_y,
                    insets,
                    content,
                }
            })
            .collect();
        Grid::new(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(name: &'static str) -> Child<&'static str> {
        Child::Widget(name)
    }

    #[test]
    fn vertical_children_go_down_one_column() {
        let layout = LinearLayout::vertical()
            .try_add(widget("a"), 0.0)
            .and_then(|l| l.try_add(widget("b"), 2.5))
            .and_then(|l| l.try_add(widget("c"), 1.0))
            .unwrap();
        let grid = layout.materialize();
        let cells = grid.cells();
        assert_eq!(cells.len(), 3);
        for (i, (cell, w)) in cells.iter().zip([0.0, 2.5, 1.0]).enumerate() {
            assert_eq!((cell.x, cell.y), (0, i));
            assert_eq!(cell.weight_y, w);
            assert_eq!(cell.weight_x, 1.0);
        }
    }

    #[test]
    fn horizontal_transposes_positions_but_keeps_weight_on_main_axis() {
        let layout = LinearLayout::horizontal()
            .add_weighted(widget("a"), Weight::NATURAL)
            .add(widget("b"));
        let grid = layout.materialize();
        let cells = grid.cells();
        assert_eq!((cells[0].x, cells[0].y), (0, 0));
        assert_eq!((cells[1].x, cells[1].y), (1, 0));
        assert_eq!(cells[0].weight_x, 0.0);
        assert_eq!(cells[1].weight_x, 1.0);
        assert!(cells.iter().all(|c| c.weight_y == 1.0));
    }

    #[test]
    fn padding_is_snapshotted_per_child() {
        let mut layout = LinearLayout::vertical().with_padding(Padding::uniform(3.0));
        layout.push(widget("a"), Weight::FILL);
        layout.set_padding(Padding::new(1.0, 2.0, 3.0, 4.0));
        layout.push(widget("b"), Weight::FILL);

        let grid = layout.materialize();
        assert_eq!(grid.cells()[0].insets, Padding::uniform(3.0));
        assert_eq!(grid.cells()[1].insets, Padding::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn nested_layout_keeps_its_own_weights() {
        let inner = LinearLayout::horizontal()
            .add_weighted(widget("label"), Weight::FILL)
            .add_weighted(widget("button"), Weight::NATURAL);
        let outer = LinearLayout::vertical().add_weighted(inner, Weight::NATURAL);

        let grid = outer.materialize();
        let cell = &grid.cells()[0];
        assert_eq!(cell.weight_y, 0.0);
        assert_eq!(cell.weight_x, 1.0);
        let CellContent::Grid(nested) = &cell.content else {
            panic!("expected nested grid, got {:?}", cell.content);
        };
        assert_eq!(nested.cells()[0].weight_x, 1.0);
        assert_eq!(nested.cells()[1].weight_x, 0.0);
        assert_eq!((nested.cells()[1].x, nested.cells()[1].y), (1, 0));
    }

    #[test]
    fn materialize_is_repeatable_and_tracks_changes() {
        let mut layout = LinearLayout::vertical().add(widget("a"));
        assert_eq!(layout.materialize(), layout.materialize());

        layout.push(widget("b"), Weight::FILL);
        layout.set_orientation(Orientation::Horizontal);
        let grid = layout.materialize();
        assert_eq!(grid.cells().len(), 2);
        assert_eq!((grid.cells()[1].x, grid.cells()[1].y), (1, 0));
    }

    #[test]
    fn rejects_negative_and_non_finite_weights() {
        assert_eq!(
            LinearLayout::vertical().try_add(widget("a"), -0.5).unwrap_err(),
            LayoutError::InvalidWeight(-0.5)
        );
        assert!(Weight::new(f64::NAN).is_err());
        assert!(Weight::try_from(f64::INFINITY).is_err());
        assert_eq!(Weight::try_from(0.0).unwrap(), Weight::NATURAL);
    }

    #[test]
    fn duplicate_children_are_kept() {
        let layout = LinearLayout::vertical().add(widget("a")).add(widget("a"));
        assert_eq!(layout.materialize().cells().len(), 2);
    }

    #[test]
    fn hidden_layout_keeps_its_slot_without_weight_or_padding() {
        let hidden = LinearLayout::horizontal().add(widget("x")).with_visible(false);
        let layout = LinearLayout::vertical()
            .with_padding(Padding::uniform(5.0))
            .add(hidden)
            .add(widget("b"));
        let grid = layout.materialize();
        let cells = grid.cells();
        assert_eq!((cells[1].x, cells[1].y), (0, 1));
        assert_eq!((cells[0].weight_x, cells[0].weight_y), (0.0, 0.0));
        assert_eq!(cells[0].insets, Padding::ZERO);
        assert_eq!(cells[1].insets, Padding::uniform(5.0));
        match &cells[0].content {
            CellContent::Grid(g) => assert!(g.is_empty()),
            other => panic!("expected nested grid, got {:?}", other),
        }
        assert!(layout.with_visible(false).materialize().is_empty());
    }
}
