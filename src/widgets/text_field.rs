use crate::core::search::autocomplete::completion_suffix;
use crate::core::suggestions::SuggestionList;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::base::InputBase;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    Ignored,
    /// Cursor moved, value unchanged.
    Moved,
    Edited,
}

/// Single-line text input with autocomplete and an enabled flag.
#[derive(Debug, Clone)]
pub struct TextField {
    base: InputBase,
    value: String,
    /// Char index, not byte index.
    cursor: usize,
    enabled: bool,
    placeholder: Option<String>,
    suggestions: SuggestionList,
}

impl TextField {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base: InputBase::new(id, label),
            value: String::new(),
            cursor: 0,
            enabled: true,
            placeholder: None,
            suggestions: SuggestionList::default(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: SuggestionList) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    pub fn label(&self) -> &str {
        self.base.label()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    pub fn set_suggestions(&mut self, suggestions: SuggestionList) {
        self.suggestions = suggestions;
    }

    /// Best completion of the current value, if it would add anything.
    pub fn suggestion(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.suggestions
            .suggest(&self.value)
            .filter(|completion| *completion != self.value)
    }

    pub fn accept_suggestion(&mut self) -> bool {
        match self.suggestion() {
            Some(completion) => {
                self.set_value(completion);
                true
            }
            None => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FieldEdit {
        if !self.enabled {
            return FieldEdit::Ignored;
        }
        let len = self.value.chars().count();
        self.cursor = self.cursor.min(len);

        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.value.is_empty() {
                    return FieldEdit::Ignored;
                }
                self.clear();
                FieldEdit::Edited
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                FieldEdit::Ignored
            }
            KeyCode::Char(ch) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, ch);
                self.cursor += 1;
                FieldEdit::Edited
            }
            KeyCode::Backspace if self.cursor > 0 => {
                let at = self.byte_index(self.cursor - 1);
                self.value.remove(at);
                self.cursor -= 1;
                FieldEdit::Edited
            }
            KeyCode::Delete if self.cursor < len => {
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                FieldEdit::Edited
            }
            KeyCode::Left if self.cursor > 0 => {
                self.cursor -= 1;
                FieldEdit::Moved
            }
            KeyCode::Right if self.cursor < len => {
                self.cursor += 1;
                FieldEdit::Moved
            }
            KeyCode::Home if self.cursor > 0 => {
                self.cursor = 0;
                FieldEdit::Moved
            }
            KeyCode::End if self.cursor < len => {
                self.cursor = len;
                FieldEdit::Moved
            }
            _ => FieldEdit::Ignored,
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    /// Display columns from the start of the value to the cursor.
    pub fn cursor_col(&self) -> usize {
        self.value
            .chars()
            .take(self.cursor)
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum()
    }

    pub fn draw(&self, focused: bool, label_width: usize) -> SpanLine {
        let label_style = if self.enabled {
            Style::new().bold()
        } else {
            Style::new().color(Color::DarkGrey)
        };
        let mut line = vec![Span::styled(
            self.base.prefixed_label(focused, label_width),
            label_style,
        )];

        if !self.enabled {
            line.push(Span::styled(
                "(choose a state first)",
                Style::new().color(Color::DarkGrey),
            ));
            return line;
        }

        let ghost = focused
            .then(|| self.suggestion())
            .flatten()
            .and_then(|completion| completion_suffix(&completion, &self.value));

        if self.value.is_empty() && ghost.is_none() {
            if let Some(placeholder) = &self.placeholder {
                line.push(Span::styled(
                    placeholder.clone(),
                    Style::new().color(Color::DarkGrey),
                ));
            }
            return line;
        }

        line.push(Span::new(self.value.clone()));
        if let Some(suffix) = ghost {
            line.push(Span::styled(suffix, Style::new().color(Color::DarkGrey)));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldEdit, TextField};
    use crate::core::suggestions::SuggestionList;
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::ui::span::line_text;

    fn type_text(field: &mut TextField, text: &str) {
        for ch in text.chars() {
            field.handle_key(KeyEvent::plain(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn edits_at_cursor() {
        let mut field = TextField::new("state", "State");
        type_text(&mut field, "Oio");
        field.handle_key(KeyEvent::plain(KeyCode::Left));
        field.handle_key(KeyEvent::plain(KeyCode::Left));
        type_text(&mut field, "h");
        assert_eq!(field.value(), "Ohio");

        assert_eq!(
            field.handle_key(KeyEvent::plain(KeyCode::Backspace)),
            FieldEdit::Edited
        );
        assert_eq!(field.value(), "Oio");
        assert_eq!(
            field.handle_key(KeyEvent::plain(KeyCode::Home)),
            FieldEdit::Moved
        );
        assert_eq!(
            field.handle_key(KeyEvent::plain(KeyCode::Left)),
            FieldEdit::Ignored
        );
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut field = TextField::new("county", "County");
        type_text(&mut field, "Doña Ana");
        field.handle_key(KeyEvent::plain(KeyCode::Home));
        field.handle_key(KeyEvent::plain(KeyCode::Right));
        field.handle_key(KeyEvent::plain(KeyCode::Right));
        field.handle_key(KeyEvent::plain(KeyCode::Delete));
        assert_eq!(field.value(), "Doa Ana");
        assert_eq!(field.cursor_col(), 2);
    }

    #[test]
    fn disabled_field_ignores_input() {
        let mut field = TextField::new("county", "County").with_enabled(false);
        assert_eq!(
            field.handle_key(KeyEvent::plain(KeyCode::Char('x'))),
            FieldEdit::Ignored
        );
        assert!(field.value().is_empty());
    }

    #[test]
    fn ctrl_u_clears() {
        let mut field = TextField::new("state", "State");
        type_text(&mut field, "Utah");
        assert_eq!(field.handle_key(KeyEvent::ctrl('u')), FieldEdit::Edited);
        assert!(field.value().is_empty());
    }

    #[test]
    fn accepts_and_ghosts_suggestion() {
        let mut field =
            TextField::new("state", "State").with_suggestions(SuggestionList::us_states());
        type_text(&mut field, "Wyo");
        assert_eq!(line_text(&field.draw(true, 6)), "> State:  Wyoming");
        assert_eq!(line_text(&field.draw(false, 6)), "  State:  Wyo");

        assert!(field.accept_suggestion());
        assert_eq!(field.value(), "Wyoming");
        assert!(!field.accept_suggestion());
    }
}
