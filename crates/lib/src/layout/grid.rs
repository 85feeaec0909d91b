//! Materialized layout: grid cells with weights and insets, solved into rectangles.

use super::linear::Padding;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrink by `insets`; never yields a negative size.
    pub fn inset(&self, insets: &Padding) -> Rect {
        Rect {
            x: self.x + insets.left,
            y: self.y + insets.top,
            width: (self.width - insets.horizontal()).max(0.0),
            height: (self.height - insets.vertical()).max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent<W> {
    Widget(W),
    Grid(Grid<W>),
}

/// One 1x1 cell. Its content is stretched to fill the cell (minus insets) on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell<W> {
    pub x: usize,
    pub y: usize,
    pub weight_x: f64,
    pub weight_y: f64,
    pub insets: Padding,
    pub content: CellContent<W>,
}

/// A widget and the rectangle it should be drawn in.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<W> {
    pub widget: W,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<W> {
    cells: Vec<GridCell<W>>,
}

/// Per-column and per-row minimum sizes and weights.
struct Tracks {
    col_min: Vec<f32>,
    col_weight: Vec<f64>,
    row_min: Vec<f32>,
    row_weight: Vec<f64>,
}

impl<W> Grid<W> {
    pub fn new(cells: Vec<GridCell<W>>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[GridCell<W>] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Smallest size that fits every cell's natural content plus insets.
    pub fn natural_size<F>(&self, measure: &mut F) -> Size
    where
        F: FnMut(&W) -> Size,
    {
        let tracks = self.tracks(measure);
        Size::new(tracks.col_min.iter().sum(), tracks.row_min.iter().sum())
    }

    fn tracks<F>(&self, measure: &mut F) -> Tracks
    where
        F: FnMut(&W) -> Size,
    {
        let cols = self.cells.iter().map(|c| c.x + 1).max().unwrap_or(0);
        let rows = self.cells.iter().map(|c| c.y + 1).max().unwrap_or(0);
        let mut tracks = Tracks {
            col_min: vec![0.0; cols],
            col_weight: vec![0.0; cols],
            row_min: vec![0.0; rows],
            row_weight: vec![0.0; rows],
        };
        for cell in &self.cells {
            let natural = match &cell.content {
                CellContent::Widget(w) => measure(w),
                CellContent::Grid(g) => g.natural_size(measure),
            };
            let width = natural.width + cell.insets.horizontal();
            let height = natural.height + cell.insets.vertical();
            tracks.col_min[cell.x] = tracks.col_min[cell.x].max(width);
            tracks.row_min[cell.y] = tracks.row_min[cell.y].max(height);
            tracks.col_weight[cell.x] = tracks.col_weight[cell.x].max(cell.weight_x);
            tracks.row_weight[cell.y] = tracks.row_weight[cell.y].max(cell.weight_y);
        }
        tracks
    }
}

impl<W: Clone> Grid<W> {
    /// Solve the grid inside `bounds`.
    ///
    /// Each column and row starts at its natural size; the free space left over is
    /// split between tracks in proportion to their weight (a track's weight is the
    /// largest weight of its cells). When every weight is zero the tracks are
    /// centered instead. If `bounds` is too small the tracks keep their natural
    /// size and overflow.
    pub fn arrange<F>(&self, bounds: Rect, measure: &mut F) -> Vec<Placement<W>>
    where
        F: FnMut(&W) -> Size,
    {
        let mut out = Vec::new();
        self.arrange_into(bounds, measure, &mut out);
        out
    }

    fn arrange_into<F>(&self, bounds: Rect, measure: &mut F, out: &mut Vec<Placement<W>>)
    where
        F: FnMut(&W) -> Size,
    {
        if self.cells.is_empty() {
            return;
        }
        let tracks = self.tracks(measure);
        let col_starts = track_starts(bounds.x, bounds.width, &tracks.col_min, &tracks.col_weight);
        let row_starts = track_starts(bounds.y, bounds.height, &tracks.row_min, &tracks.row_weight);

        for cell in &self.cells {
            let x = col_starts[cell.x];
            let y = row_starts[cell.y];
            let cell_rect = Rect::new(x, y, col_starts[cell.x + 1] - x, row_starts[cell.y + 1] - y);
            let content_rect = cell_rect.inset(&cell.insets);
            match &cell.content {
                CellContent::Widget(w) => out.push(Placement {
                    widget: w.clone(),
                    rect: content_rect,
                }),
                CellContent::Grid(g) => g.arrange_into(content_rect, measure, out),
            }
        }
    }
}

/// Track boundaries along one axis: `n + 1` positions for `n` tracks.
fn track_starts(origin: f32, available: f32, mins: &[f32], weights: &[f64]) -> Vec<f32> {
    let natural: f32 = mins.iter().sum();
    let extra = available - natural;
    // only ratios matter; scaling by the largest keeps huge weights from summing to inf
    let max_weight = weights.iter().copied().fold(0.0, f64::max);
    let shares: Vec<f64> = if max_weight > 0.0 {
        weights.iter().map(|w| w / max_weight).collect()
    } else {
        vec![0.0; weights.len()]
    };
    let total_weight: f64 = shares.iter().sum();

    let mut pos = origin;
    let mut sizes: Vec<f32> = mins.to_vec();
    if extra > 0.0 {
        if total_weight > 0.0 {
            for (size, share) in sizes.iter_mut().zip(&shares) {
                *size += (f64::from(extra) * share / total_weight) as f32;
            }
        } else {
            pos += extra / 2.0;
        }
    }

    let mut starts = Vec::with_capacity(sizes.len() + 1);
    starts.push(pos);
    for size in sizes {
        pos += size;
        starts.push(pos);
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Child, LinearLayout, Weight};

    /// Every widget measures as its name's natural size from this table.
    fn measure(name: &&'static str) -> Size {
        match *name {
            "label" => Size::new(80.0, 20.0),
            "button" => Size::new(40.0, 24.0),
            "input" => Size::new(100.0, 30.0),
            _ => Size::new(10.0, 10.0),
        }
    }

    fn rect_of(placements: &[Placement<&'static str>], name: &str) -> Rect {
        placements
            .iter()
            .find(|p| p.widget == name)
            .map(|p| p.rect)
            .unwrap_or_else(|| panic!("{} not placed", name))
    }

    #[test]
    fn zero_weight_keeps_natural_size_and_weighted_child_takes_rest() {
        let layout = LinearLayout::vertical()
            .add_weighted(Child::Widget("label"), Weight::NATURAL)
            .add(Child::Widget("history"))
            .add_weighted(Child::Widget("input"), Weight::NATURAL);
        let placements = layout
            .materialize()
            .arrange(Rect::new(0.0, 0.0, 200.0, 300.0), &mut measure);

        assert_eq!(rect_of(&placements, "label"), Rect::new(0.0, 0.0, 200.0, 20.0));
        assert_eq!(rect_of(&placements, "history"), Rect::new(0.0, 20.0, 200.0, 250.0));
        assert_eq!(rect_of(&placements, "input"), Rect::new(0.0, 270.0, 200.0, 30.0));
    }

    #[test]
    fn hidden_layout_takes_no_space() {
        let footer = LinearLayout::horizontal()
            .add(Child::Widget("input"))
            .with_visible(false);
        let layout = LinearLayout::vertical()
            .with_padding(crate::layout::Padding::uniform(5.0))
            .add_weighted(Child::Widget("label"), Weight::NATURAL)
            .add(Child::Widget("history"))
            .add_weighted(footer, Weight::NATURAL);
        let placements = layout
            .materialize()
            .arrange(Rect::new(0.0, 0.0, 200.0, 300.0), &mut measure);

        assert_eq!(placements.len(), 2);
        assert_eq!(rect_of(&placements, "label"), Rect::new(5.0, 5.0, 190.0, 20.0));
        assert_eq!(rect_of(&placements, "history"), Rect::new(5.0, 35.0, 190.0, 260.0));
    }

    #[test]
    fn largest_weights_split_space_evenly() {
        let huge = Weight::new(f64::MAX).unwrap();
        let layout = LinearLayout::vertical()
            .add_weighted(Child::Widget("a"), huge)
            .add_weighted(Child::Widget("b"), huge);
        let placements = layout
            .materialize()
            .arrange(Rect::new(0.0, 0.0, 100.0, 100.0), &mut measure);

        assert_eq!(rect_of(&placements, "a"), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(rect_of(&placements, "b"), Rect::new(0.0, 50.0, 100.0, 50.0));
    }

    #[test]
    fn free_space_is_split_by_weight() {
        let layout = LinearLayout::horizontal()
            .add_weighted(Child::Widget("a"), Weight::new(1.0).unwrap())
            .add_weighted(Child::Widget("b"), Weight::new(3.0).unwrap());
        let placements = layout
            .materialize()
            .arrange(Rect::new(0.0, 0.0, 420.0, 50.0), &mut measure);

        // natural 10 + 10, free 400 split 100 / 300
        assert_eq!(rect_of(&placements, "a"), Rect::new(0.0, 0.0, 110.0, 50.0));
        assert_eq!(rect_of(&placements, "b"), Rect::new(110.0, 0.0, 310.0, 50.0));
    }

    #[test]
    fn insets_shrink_the_content_rect() {
        let layout = LinearLayout::vertical()
            .with_padding(Padding::new(5.0, 1.0, 5.0, 2.0))
            .add(Child::Widget("label"));
        let grid = layout.materialize();
        assert_eq!(grid.natural_size(&mut measure), Size::new(90.0, 23.0));

        let placements = grid.arrange(Rect::new(10.0, 10.0, 100.0, 23.0), &mut measure);
        assert_eq!(rect_of(&placements, "label"), Rect::new(15.0, 11.0, 90.0, 20.0));
    }

    #[test]
    fn all_zero_weights_center_the_content() {
        let layout = LinearLayout::vertical().add_weighted(Child::Widget("label"), Weight::NATURAL);
        let placements = layout
            .materialize()
            .arrange(Rect::new(0.0, 0.0, 80.0, 100.0), &mut measure);
        assert_eq!(rect_of(&placements, "label"), Rect::new(0.0, 40.0, 80.0, 20.0));
    }

    #[test]
    fn nested_grid_is_arranged_inside_its_parent_cell() {
        let header = LinearLayout::horizontal()
            .add(Child::Widget("label"))
            .add_weighted(Child::Widget("button"), Weight::NATURAL);
        let root = LinearLayout::vertical()
            .add_weighted(header, Weight::NATURAL)
            .add(Child::Widget("history"));
        let placements = root
            .materialize()
            .arrange(Rect::new(0.0, 0.0, 300.0, 200.0), &mut measure);

        // header row is as tall as its tallest child (button, 24)
        assert_eq!(rect_of(&placements, "label"), Rect::new(0.0, 0.0, 260.0, 24.0));
        assert_eq!(rect_of(&placements, "button"), Rect::new(260.0, 0.0, 40.0, 24.0));
        assert_eq!(rect_of(&placements, "history"), Rect::new(0.0, 24.0, 300.0, 176.0));
    }

    #[test]
    fn parent_weight_does_not_leak_into_nested_children() {
        let inner = LinearLayout::vertical()
            .add_weighted(Child::Widget("label"), Weight::NATURAL)
            .add(Child::Widget("history"));
        let light = LinearLayout::horizontal()
            .add_weighted(inner.clone(), Weight::new(1.0).unwrap())
            .add_weighted(Child::Widget("x"), Weight::new(1.0).unwrap());
        let heavy = LinearLayout::horizontal()
            .add_weighted(inner, Weight::new(9.0).unwrap())
            .add_weighted(Child::Widget("x"), Weight::new(1.0).unwrap());

        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
        let light = light.materialize().arrange(bounds, &mut measure);
        let heavy = heavy.materialize().arrange(bounds, &mut measure);

        // the nested column is wider under the heavier weight, but its own
        // vertical split is the same in both
        assert!(rect_of(&heavy, "history").width > rect_of(&light, "history").width);
        assert_eq!(rect_of(&light, "label").height, 20.0);
        assert_eq!(rect_of(&heavy, "label").height, 20.0);
        assert_eq!(rect_of(&light, "history").height, rect_of(&heavy, "history").height);
    }

    #[test]
    fn too_small_bounds_overflow_at_natural_size() {
        let layout = LinearLayout::vertical()
            .add(Child::Widget("label"))
            .add(Child::Widget("input"));
        let placements = layout
            .materialize()
            .arrange(Rect::new(0.0, 0.0, 50.0, 10.0), &mut measure);
        assert_eq!(rect_of(&placements, "input").y, 20.0);
        assert_eq!(rect_of(&placements, "input").height, 30.0);
    }

    #[test]
    fn empty_grid_places_nothing() {
        let grid: Grid<&'static str> = LinearLayout::vertical().materialize();
        assert!(grid.is_empty());
        assert!(grid.arrange(Rect::new(0.0, 0.0, 10.0, 10.0), &mut measure).is_empty());
        assert_eq!(grid.natural_size(&mut measure), Size::default());
    }
}
