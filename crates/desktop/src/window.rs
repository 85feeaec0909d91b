//! Chat window widget tree, declared as weighted linear layouts.

use wcschat::layout::{Child, LinearLayout, Padding, Weight};

pub const HISTORY_LABEL: &str = "Chat History:";
pub const CLEAR_BUTTON: &str = "Clear";
pub const INPUT_LABEL: &str = "Input Text:  (press ENTER-KEY to send)";

/// Font size of the single-line input box.
pub const INPUT_FONT_SIZE: f32 = 20.0;

/// Widgets the window draws. The layout only carries these handles; the app
/// owns the state behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    HistoryLabel,
    ClearButton,
    History,
    InputLabel,
    Input,
}

/// Header (label + Clear), history filling the middle, footer (label + input).
pub fn build_layout() -> LinearLayout<Widget> {
    let header = LinearLayout::horizontal()
        .with_padding(Padding::new(5.0, 0.0, 5.0, 0.0))
        .add(Child::Widget(Widget::HistoryLabel))
        .add_weighted(Child::Widget(Widget::ClearButton), Weight::NATURAL);
    let center = LinearLayout::vertical()
        .with_padding(Padding::new(5.0, 0.0, 5.0, 0.0))
        .add(Child::Widget(Widget::History));
    let footer = LinearLayout::vertical()
        .with_padding(Padding::uniform(5.0))
        .add(Child::Widget(Widget::InputLabel))
        .add(Child::Widget(Widget::Input));

    LinearLayout::vertical()
        .with_padding(Padding::uniform(5.0))
        .add_weighted(header, Weight::NATURAL)
        .add(center)
        .add_weighted(footer, Weight::NATURAL)
}
