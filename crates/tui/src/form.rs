//! Editable input fields and the modal forms built from them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const MAX_INPUT_LEN: usize = 64;

/// Single-line text input with a cursor measured in characters.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    pub label: &'static str,
    input: String,
    cursor: usize,
}

impl InputField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            input: String::new(),
            cursor: 0,
        }
    }

    pub fn with_value(label: &'static str, value: &str) -> Self {
        let mut field = Self::new(label);
        for ch in value.chars() {
            field.insert(ch);
        }
        field
    }

    pub fn value(&self) -> &str {
        self.input.trim()
    }

    pub fn text(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.input.len())
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.len() as isize;
        let next = (self.cursor as isize + delta).clamp(0, len);
        self.cursor = next as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn insert(&mut self, ch: char) {
        if self.len() >= MAX_INPUT_LEN || ch.is_control() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.input.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.input.remove(at);
        }
    }
}

/// What happened to a form after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSignal {
    Editing,
    Submit,
    Cancel,
}

/// Modal form with one or more fields, tagged with what it collects.
#[derive(Debug, Clone)]
pub struct Form<K> {
    pub kind: K,
    pub title: String,
    pub fields: Vec<InputField>,
    focus: usize,
}

impl<K> Form<K> {
    pub fn new(kind: K, title: impl Into<String>, fields: Vec<InputField>) -> Self {
        // Prefilled leading fields are skipped so typing starts where input is needed.
        let focus = fields
            .iter()
            .position(|field| field.text().is_empty())
            .unwrap_or(0);
        Self {
            kind,
            title: title.into(),
            fields,
            focus,
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(InputField::value)
            .unwrap_or_default()
    }

    fn focused_mut(&mut self) -> Option<&mut InputField> {
        self.fields.get_mut(self.focus)
    }

    fn move_focus(&mut self, delta: isize) {
        if self.fields.is_empty() {
            return;
        }
        let len = self.fields.len() as isize;
        self.focus = (self.focus as isize + delta).rem_euclid(len) as usize;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormSignal {
        match key.code {
            KeyCode::Esc => return FormSignal::Cancel,
            KeyCode::Enter => {
                if self.focus + 1 >= self.fields.len() {
                    return FormSignal::Submit;
                }
                self.focus += 1;
            }
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Left => {
                if let Some(field) = self.focused_mut() {
                    field.move_cursor(-1);
                }
            }
            KeyCode::Right => {
                if let Some(field) = self.focused_mut() {
                    field.move_cursor(1);
                }
            }
            KeyCode::Home => {
                if let Some(field) = self.focused_mut() {
                    field.move_home();
                }
            }
            KeyCode::End => {
                if let Some(field) = self.focused_mut() {
                    field.move_end();
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.focused_mut() {
                    field.backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(field) = self.focused_mut() {
                    field.delete();
                }
            }
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    if let Some(field) = self.focused_mut() {
                        field.insert(ch);
                    }
                }
            }
            _ => {}
        }
        FormSignal::Editing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<K>(form: &mut Form<K>, text: &str) {
        for ch in text.chars() {
            form.handle_key(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn field_editing() {
        let mut field = InputField::with_value("Ware", "Aple");
        field.move_cursor(-2);
        field.insert('p');
        assert_eq!(field.text(), "Apple");
        field.move_end();
        field.backspace();
        assert_eq!(field.text(), "Appl");
        field.move_home();
        field.delete();
        assert_eq!(field.text(), "ppl");
        field.move_cursor(-5);
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn multibyte_input_is_char_indexed() {
        let mut field = InputField::new("Ware");
        for ch in "Crème".chars() {
            field.insert(ch);
        }
        field.move_cursor(-2);
        field.backspace();
        assert_eq!(field.text(), "Crme");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn value_is_trimmed_and_length_capped() {
        let mut field = InputField::with_value("Name", "  Shop  ");
        assert_eq!(field.value(), "Shop");
        for _ in 0..100 {
            field.insert('x');
        }
        assert_eq!(field.text().chars().count(), MAX_INPUT_LEN);
    }

    #[test]
    fn enter_advances_then_submits() {
        let mut form = Form::new(
            (),
            "Sell",
            vec![InputField::new("Ware"), InputField::new("Quantity")],
        );
        type_text(&mut form, "Apple");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormSignal::Editing);
        assert_eq!(form.focus(), 1);
        type_text(&mut form, "4");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormSignal::Submit);
        assert_eq!(form.value(0), "Apple");
        assert_eq!(form.value(1), "4");
        assert_eq!(form.value(7), "");
    }

    #[test]
    fn prefilled_fields_are_skipped_and_focus_wraps() {
        let mut form = Form::new(
            (),
            "Sell",
            vec![InputField::with_value("Ware", "Apple"), InputField::new("Quantity")],
        );
        assert_eq!(form.focus(), 1);
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focus(), 0);
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focus(), 1);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormSignal::Cancel);
    }
}
