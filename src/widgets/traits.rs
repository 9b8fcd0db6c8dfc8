use crate::runtime::effect::Effect;
use crate::terminal::{CursorPos, KeyEvent, MouseEvent};
use crate::ui::span::SpanLine;

#[derive(Debug, Clone, Default)]
pub struct DrawOutput {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

pub trait Drawable {
    fn draw(&self) -> DrawOutput;

    /// One-line key help shown under the widget.
    fn hint(&self) -> Option<String> {
        None
    }
}

pub trait Interactive {
    fn on_key(&mut self, key: KeyEvent) -> Vec<Effect>;

    fn on_mouse(&mut self, _event: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }
}
