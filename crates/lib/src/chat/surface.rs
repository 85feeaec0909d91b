/// What the controller needs from a front-end: show the history text and lock or
/// unlock the input box. Called only from the UI context.
pub trait RenderSurface {
    /// Replace the whole history view with `text`.
    fn set_text(&mut self, text: &str);

    fn set_enabled(&mut self, enabled: bool);
}
