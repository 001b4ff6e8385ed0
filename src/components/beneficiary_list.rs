use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::data::types::BeneficiaryWill;
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;

/// Wills naming the connected account as beneficiary. Enter claims the
/// selected one.
pub struct BeneficiaryList {
    pub wills: Vec<BeneficiaryWill>,
    pub loading: bool,
    pub symbol: String,
    table_state: TableState,
}

impl BeneficiaryList {
    pub fn new() -> Self {
        Self {
            wills: Vec::new(),
            loading: false,
            symbol: "DPLS".to_string(),
            table_state: TableState::default().with_selected(0),
        }
    }

    pub fn set_wills(&mut self, wills: Vec<BeneficiaryWill>) {
        self.wills = wills;
        self.loading = false;
        self.table_state.select(if self.wills.is_empty() { None } else { Some(0) });
    }

    fn select_next(&mut self) {
        if self.wills.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = (current + 1).min(self.wills.len() - 1);
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.wills.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(current.saturating_sub(1)));
    }

    fn selected(&self) -> Option<&BeneficiaryWill> {
        self.wills.get(self.table_state.selected()?)
    }
}

impl Component for BeneficiaryList {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Char('g') => {
                if !self.wills.is_empty() {
                    self.table_state.select(Some(0));
                }
                None
            }
            KeyCode::Char('G') => {
                if !self.wills.is_empty() {
                    self.table_state.select(Some(self.wills.len() - 1));
                }
                None
            }
            KeyCode::Enter => self
                .selected()
                .map(|will| AppEvent::ClaimWillRequested(will.owner)),
            KeyCode::Char('e') => Some(AppEvent::ExportRequested),
            KeyCode::Char('r') => Some(AppEvent::RefreshRequested),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Inheritances (you are the beneficiary) ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());

        if self.wills.is_empty() {
            let text = if self.loading {
                "Loading..."
            } else {
                "Nothing to claim. r: refresh"
            };
            let paragraph = Paragraph::new(Span::styled(text, THEME.muted_style())).block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(vec!["#", "Owner", "Amount"]).style(THEME.table_header_style());
        let rows: Vec<Row> = self
            .wills
            .iter()
            .enumerate()
            .map(|(i, will)| {
                Row::new(vec![
                    Cell::from(format!("{i}")).style(THEME.muted_style()),
                    Cell::from(utils::truncate_address(&will.owner))
                        .style(THEME.address_style()),
                    Cell::from(format!("{} {}", will.amount, self.symbol))
                        .style(THEME.amount_style()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(16),
                Constraint::Min(12),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(THEME.selected_style())
        .highlight_symbol("> ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn list_with(n: usize) -> BeneficiaryList {
        let mut list = BeneficiaryList::new();
        list.set_wills(
            (0..n)
                .map(|i| BeneficiaryWill {
                    owner: Address::from_slice(&[i as u8 + 1; 20]),
                    amount: "1.0".to_string(),
                })
                .collect(),
        );
        list
    }

    #[test]
    fn test_enter_claims_selected_owner() {
        let mut list = list_with(2);
        list.handle_key(key(KeyCode::Down));
        match list.handle_key(key(KeyCode::Enter)) {
            Some(AppEvent::ClaimWillRequested(owner)) => {
                assert_eq!(owner, Address::from_slice(&[0x02; 20]));
            }
            other => panic!("expected ClaimWillRequested, got {other:?}"),
        }
    }

    #[test]
    fn test_enter_on_empty_list_is_noop() {
        let mut list = BeneficiaryList::new();
        list.set_wills(vec![]);
        assert!(list.handle_key(key(KeyCode::Enter)).is_none());
    }

    #[test]
    fn test_selection_clamps_at_ends() {
        let mut list = list_with(2);
        list.handle_key(key(KeyCode::Up));
        assert_eq!(list.table_state.selected(), Some(0));
        list.handle_key(key(KeyCode::Down));
        list.handle_key(key(KeyCode::Down));
        list.handle_key(key(KeyCode::Down));
        assert_eq!(list.table_state.selected(), Some(1));
    }
}
