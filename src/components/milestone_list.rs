use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::data::types::MilestoneRelease;
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;

/// Claimable milestone releases for the connected beneficiary. Each row is
/// one independently claimable release.
pub struct MilestoneList {
    pub releases: Vec<MilestoneRelease>,
    pub loading: bool,
    pub symbol: String,
    table_state: TableState,
}

impl MilestoneList {
    pub fn new() -> Self {
        Self {
            releases: Vec::new(),
            loading: false,
            symbol: "DPLS".to_string(),
            table_state: TableState::default().with_selected(0),
        }
    }

    pub fn set_releases(&mut self, releases: Vec<MilestoneRelease>) {
        self.releases = releases;
        self.loading = false;
        self.table_state
            .select(if self.releases.is_empty() { None } else { Some(0) });
    }

    fn select_next(&mut self) {
        if self.releases.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = (current + 1).min(self.releases.len() - 1);
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.releases.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(current.saturating_sub(1)));
    }

    fn selected(&self) -> Option<&MilestoneRelease> {
        self.releases.get(self.table_state.selected()?)
    }
}

impl Component for MilestoneList {
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
                if !self.releases.is_empty() {
                    self.table_state.select(Some(0));
                }
                None
            }
            KeyCode::Char('G') => {
                if !self.releases.is_empty() {
                    self.table_state.select(Some(self.releases.len() - 1));
                }
                None
            }
            KeyCode::Enter => self.selected().map(|release| AppEvent::ClaimMilestoneRequested {
                owner: release.owner,
                will_index: release.will_index,
                release_index: release.release_index,
            }),
            KeyCode::Char('e') => Some(AppEvent::ExportRequested),
            KeyCode::Char('r') => Some(AppEvent::RefreshRequested),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Milestone Releases (you are the beneficiary) ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());

        if self.releases.is_empty() {
            let text = if self.loading {
                "Loading..."
            } else {
                "No claimable releases. r: refresh"
            };
            let paragraph = Paragraph::new(Span::styled(text, THEME.muted_style())).block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(vec!["Owner", "Will", "Release", "Amount"])
            .style(THEME.table_header_style());
        let rows: Vec<Row> = self
            .releases
            .iter()
            .map(|release| {
                Row::new(vec![
                    Cell::from(utils::truncate_address(&release.owner))
                        .style(THEME.address_style()),
                    Cell::from(release.will_index.to_string()),
                    Cell::from(release.release_index.to_string()),
                    Cell::from(format!("{} {}", release.amount, self.symbol))
                        .style(THEME.amount_style()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Length(6),
                Constraint::Length(8),
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
    use alloy::primitives::{Address, U256};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_claims_selected_release() {
        let mut list = MilestoneList::new();
        list.set_releases(vec![MilestoneRelease {
            owner: Address::from_slice(&[0x03; 20]),
            will_index: U256::from(2u64),
            release_index: U256::from(1u64),
            amount: "0.5".to_string(),
        }]);

        match list.handle_key(key(KeyCode::Enter)) {
            Some(AppEvent::ClaimMilestoneRequested {
                owner,
                will_index,
                release_index,
            }) => {
                assert_eq!(owner, Address::from_slice(&[0x03; 20]));
                assert_eq!(will_index, U256::from(2u64));
                assert_eq!(release_index, U256::from(1u64));
            }
            other => panic!("expected ClaimMilestoneRequested, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list_has_no_selection() {
        let mut list = MilestoneList::new();
        list.set_releases(vec![]);
        assert!(list.handle_key(key(KeyCode::Enter)).is_none());
    }
}
