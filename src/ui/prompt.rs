use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStep {
    Pending,
    Submitted,
    Cancelled,
}

/// Single-line input buffer for the status-row prompts. `cursor` counts
/// characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    text: String,
    cursor: usize,
}

impl LineEditor {
    pub fn new(initial: &str) -> Self {
        Self {
            text: initial.to_string(),
            cursor: initial.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Text before and after the cursor.
    pub fn split(&self) -> (&str, &str) {
        self.text.split_at(self.byte_offset(self.cursor))
    }

    pub fn apply(&mut self, key: KeyEvent) -> PromptStep {
        if key.kind != KeyEventKind::Press {
            return PromptStep::Pending;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('g') => return PromptStep::Cancelled,
                KeyCode::Char('u') => {
                    self.text.clear();
                    self.cursor = 0;
                }
                KeyCode::Char('a') => self.cursor = 0,
                KeyCode::Char('e') => self.cursor = self.len(),
                _ => {}
            }
            return PromptStep::Pending;
        }
        match key.code {
            KeyCode::Enter => return PromptStep::Submitted,
            KeyCode::Esc => return PromptStep::Cancelled,
            KeyCode::Char(ch) => {
                let offset = self.byte_offset(self.cursor);
                self.text.insert(offset, ch);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let offset = self.byte_offset(self.cursor);
                    self.text.remove(offset);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    let offset = self.byte_offset(self.cursor);
                    self.text.remove(offset);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            _ => {}
        }
        PromptStep::Pending
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
}

/// Only `y` / `Y` confirms.
pub fn is_confirmation(key: KeyEvent) -> bool {
    key.kind == KeyEventKind::Press && matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'))
}
