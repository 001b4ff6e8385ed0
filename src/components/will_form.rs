use alloy::primitives::{Address, U256};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;

const FIELDS: &[&str] = &[
    "Beneficiary address",
    "Description",
    "Amount",
    "Wait time (e.g. 30d, 12h, 3600)",
];

const BENEFICIARY: usize = 0;
const DESCRIPTION: usize = 1;
const AMOUNT: usize = 2;
const WAIT_TIME: usize = 3;

/// Input form for creating a will. Enter advances through the fields and
/// submits on the last one; validation errors keep the user in place.
pub struct WillForm {
    inputs: Vec<String>,
    current: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

impl WillForm {
    pub fn new() -> Self {
        Self {
            inputs: vec![String::new(); FIELDS.len()],
            current: 0,
            error: None,
            submitting: false,
        }
    }

    pub fn reset(&mut self) {
        self.inputs = vec![String::new(); FIELDS.len()];
        self.current = 0;
        self.error = None;
        self.submitting = false;
    }

    /// Called when the create operation finishes.
    pub fn finish(&mut self, ok: bool) {
        self.submitting = false;
        if ok {
            self.reset();
        }
    }

    fn submit(&mut self) -> Option<AppEvent> {
        let beneficiary: Address = match self.inputs[BENEFICIARY].trim().parse() {
            Ok(addr) => addr,
            Err(_) => {
                self.error = Some("Invalid beneficiary address".to_string());
                self.current = BENEFICIARY;
                return None;
            }
        };
        let description = self.inputs[DESCRIPTION].trim().to_string();
        let Some(amount) = utils::parse_native(&self.inputs[AMOUNT]).filter(|a| !a.is_zero())
        else {
            self.error = Some("Invalid amount".to_string());
            self.current = AMOUNT;
            return None;
        };
        let Some(wait_time) = utils::parse_wait_time(&self.inputs[WAIT_TIME]).filter(|w| *w > 0)
        else {
            self.error = Some("Invalid wait time".to_string());
            self.current = WAIT_TIME;
            return None;
        };

        self.error = None;
        self.submitting = true;
        Some(AppEvent::CreateWillSubmitted {
            beneficiary,
            description,
            amount,
            wait_time: U256::from(wait_time),
        })
    }
}

impl Component for WillForm {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if self.submitting {
            return None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.current = (self.current + 1) % FIELDS.len();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.current = self.current.checked_sub(1).unwrap_or(FIELDS.len() - 1);
                None
            }
            KeyCode::Enter => {
                if self.current + 1 < FIELDS.len() {
                    self.current += 1;
                    None
                } else {
                    self.submit()
                }
            }
            KeyCode::Backspace => {
                self.inputs[self.current].pop();
                self.error = None;
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.inputs[self.current].clear();
                self.error = None;
                None
            }
            KeyCode::Char(c) => {
                self.inputs[self.current].push(c);
                self.error = None;
                None
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Create Will ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());

        let mut lines = Vec::new();
        for (i, label) in FIELDS.iter().enumerate() {
            let marker = if i == self.current { "> " } else { "  " };
            let label_style = if i == self.current {
                THEME.accent_style().add_modifier(Modifier::BOLD)
            } else {
                THEME.muted_style()
            };
            lines.push(Line::from(vec![
                Span::styled(marker, THEME.accent_style()),
                Span::styled(format!("{label:<34}"), label_style),
                Span::styled(self.inputs[i].as_str(), Style::default().fg(THEME.text)),
                Span::styled(
                    if i == self.current { "\u{2588}" } else { "" },
                    THEME.accent_style(),
                ),
            ]));
            lines.push(Line::from(""));
        }

        if self.submitting {
            lines.push(Line::from(Span::styled(
                "Submitting transaction...",
                THEME.accent_style(),
            )));
        } else if let Some(ref err) = self.error {
            lines.push(Line::from(Span::styled(err.as_str(), THEME.error_style())));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter: next field / submit   Tab: move   Esc: back",
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
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(form: &mut WillForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_submit_valid_form() {
        let mut form = WillForm::new();
        type_text(&mut form, "0x0101010101010101010101010101010101010101");
        form.handle_key(key(KeyCode::Enter));
        type_text(&mut form, "for my daughter");
        form.handle_key(key(KeyCode::Enter));
        type_text(&mut form, "1.5");
        form.handle_key(key(KeyCode::Enter));
        type_text(&mut form, "30d");

        let event = form.handle_key(key(KeyCode::Enter));
        match event {
            Some(AppEvent::CreateWillSubmitted {
                beneficiary,
                description,
                amount,
                wait_time,
            }) => {
                assert_eq!(beneficiary, Address::from_slice(&[0x01; 20]));
                assert_eq!(description, "for my daughter");
                assert_eq!(amount, utils::parse_native("1.5").unwrap());
                assert_eq!(wait_time, U256::from(30u64 * 86400));
            }
            other => panic!("expected CreateWillSubmitted, got {other:?}"),
        }
        assert!(form.submitting);
    }

    #[test]
    fn test_submit_rejects_bad_address() {
        let mut form = WillForm::new();
        type_text(&mut form, "not-an-address");
        for _ in 0..3 {
            form.handle_key(key(KeyCode::Enter));
        }
        type_text(&mut form, "1");
        // amount and wait empty too, but address is reported first
        assert!(form.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(form.error.as_deref(), Some("Invalid beneficiary address"));
        assert!(!form.submitting);
    }

    #[test]
    fn test_submit_rejects_zero_amount() {
        let mut form = WillForm::new();
        type_text(&mut form, "0x0101010101010101010101010101010101010101");
        form.handle_key(key(KeyCode::Enter));
        form.handle_key(key(KeyCode::Enter));
        type_text(&mut form, "0");
        form.handle_key(key(KeyCode::Enter));
        type_text(&mut form, "30d");
        assert!(form.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(form.error.as_deref(), Some("Invalid amount"));
    }

    #[test]
    fn test_keys_ignored_while_submitting() {
        let mut form = WillForm::new();
        form.submitting = true;
        assert!(form.handle_key(key(KeyCode::Char('x'))).is_none());
        assert!(form.inputs[0].is_empty());
    }
}
