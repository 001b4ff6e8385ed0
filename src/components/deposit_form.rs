use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;

/// Single-field form: top up the caller's existing will.
pub struct DepositForm {
    pub input: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl DepositForm {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            error: None,
            submitting: false,
        }
    }

    pub fn reset(&mut self) {
        self.input.clear();
        self.error = None;
        self.submitting = false;
    }

    pub fn finish(&mut self, ok: bool) {
        self.submitting = false;
        if ok {
            self.reset();
        }
    }
}

impl Component for DepositForm {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if self.submitting {
            return None;
        }

        match key.code {
            KeyCode::Enter => match utils::parse_native(&self.input).filter(|a| !a.is_zero()) {
                Some(amount) => {
                    self.error = None;
                    self.submitting = true;
                    Some(AppEvent::DepositSubmitted(amount))
                }
                None => {
                    self.error = Some("Invalid amount".to_string());
                    None
                }
            },
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                self.error = None;
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.error = None;
                None
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Deposit More ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());

        let mut lines = vec![
            Line::from(vec![
                Span::styled("> ", THEME.accent_style()),
                Span::styled("Amount  ", THEME.accent_style().add_modifier(Modifier::BOLD)),
                Span::styled(self.input.as_str(), Style::default().fg(THEME.text)),
                Span::styled("\u{2588}", THEME.accent_style()),
            ]),
            Line::from(""),
        ];

        if self.submitting {
            lines.push(Line::from(Span::styled(
                "Submitting transaction...",
                THEME.accent_style(),
            )));
        } else if let Some(ref err) = self.error {
            lines.push(Line::from(Span::styled(err.as_str(), THEME.error_style())));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter: deposit   Esc: back",
                THEME.muted_style(),
            )));
        }

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_submit_valid_amount() {
        let mut form = DepositForm::new();
        for c in "2.5".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        match form.handle_key(key(KeyCode::Enter)) {
            Some(AppEvent::DepositSubmitted(amount)) => {
                assert_eq!(amount, utils::parse_native("2.5").unwrap());
            }
            other => panic!("expected DepositSubmitted, got {other:?}"),
        }
        assert!(form.submitting);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut form = DepositForm::new();
        form.handle_key(key(KeyCode::Char('0')));
        assert!(form.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(form.error.as_deref(), Some("Invalid amount"));
        assert!(!form.submitting);
    }
}
