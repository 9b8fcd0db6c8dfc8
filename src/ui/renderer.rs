use crate::terminal::{CursorPos, TerminalSize};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::traits::Drawable;

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

pub struct Renderer;

impl Renderer {
    /// Lays the widget out from the top-left cell so its own row numbers are
    /// screen rows. The hint goes on the last row when there is room for it.
    pub fn render(widget: &dyn Drawable, terminal_size: TerminalSize) -> RenderFrame {
        let out = widget.draw();
        let height = terminal_size.height as usize;
        let mut frame = RenderFrame {
            lines: out.lines,
            cursor: out.cursor.filter(|cursor| (cursor.row as usize) < height),
        };

        if let Some(hint) = widget.hint()
            && frame.lines.len() < height
        {
            frame.lines.resize_with(height - 1, Vec::new);
            frame.lines.push(vec![Span::styled(
                hint,
                Style::new().color(Color::DarkGrey),
            )]);
        }

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use crate::terminal::{CursorPos, TerminalSize};
    use crate::ui::span::{Span, line_text};
    use crate::widgets::traits::{DrawOutput, Drawable};

    struct Fixed;

    impl Drawable for Fixed {
        fn draw(&self) -> DrawOutput {
            DrawOutput {
                lines: vec![vec![Span::new("one")], vec![Span::new("two")]],
                cursor: Some(CursorPos { col: 1, row: 1 }),
            }
        }

        fn hint(&self) -> Option<String> {
            Some("Esc quit".to_string())
        }
    }

    #[test]
    fn hint_is_pinned_to_the_bottom_row() {
        let frame = Renderer::render(&Fixed, TerminalSize { width: 40, height: 5 });
        assert_eq!(frame.lines.len(), 5);
        assert_eq!(line_text(&frame.lines[1]), "two");
        assert_eq!(line_text(&frame.lines[4]), "Esc quit");
        assert_eq!(frame.cursor, Some(CursorPos { col: 1, row: 1 }));
    }

    #[test]
    fn short_terminal_drops_hint_and_offscreen_cursor() {
        let frame = Renderer::render(&Fixed, TerminalSize { width: 40, height: 1 });
        assert_eq!(frame.lines.len(), 2);
        assert_eq!(frame.cursor, None);
    }
}
