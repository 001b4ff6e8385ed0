use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::data::types::WillRecord;
use crate::events::{AppEvent, View};
use crate::session::Session;
use crate::theme::THEME;
use crate::utils;

pub struct Dashboard {
    pub session: Session,
    pub has_will: Option<bool>,
    pub will: Option<WillRecord>,
    pub symbol: String,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            session: Session::default(),
            has_will: None,
            will: None,
            symbol: "DPLS".to_string(),
        }
    }

    fn wallet_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();
        match self.session.account {
            Some(ref account) => {
                lines.push(Line::from(vec![
                    Span::styled("Account     ", THEME.muted_style()),
                    Span::styled(format!("{account}"), THEME.address_style()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Balance     ", THEME.muted_style()),
                    Span::styled(
                        format!("{} {}", self.session.balance, self.symbol),
                        THEME.amount_style(),
                    ),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Chain       ", THEME.muted_style()),
                    Span::styled(
                        self.session.chain_id.as_deref().unwrap_or("-").to_string(),
                        Style::default().fg(THEME.text),
                    ),
                ]));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "Not connected. Press c to connect the wallet.",
                    Style::default().fg(THEME.text),
                )));
            }
        }
        lines
    }

    fn will_lines(&self) -> Vec<Line<'_>> {
        let Some(ref will) = self.will else {
            return match self.has_will {
                Some(false) => vec![Line::from(Span::styled(
                    "No will yet. Press n to create one.",
                    Style::default().fg(THEME.text),
                ))],
                _ => vec![Line::from(Span::styled(
                    "Will details load after connecting.",
                    THEME.muted_style(),
                ))],
            };
        };

        let now = utils::now_ts();
        let (status_text, status_style) = if will.claimed {
            ("CLAIMED", THEME.muted_style())
        } else if will.is_claimable(now) {
            ("CLAIMABLE BY BENEFICIARY", THEME.error_style())
        } else {
            ("LOCKED", THEME.success_style())
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Beneficiary ", THEME.muted_style()),
                Span::styled(format!("{}", will.beneficiary), THEME.address_style()),
            ]),
            Line::from(vec![
                Span::styled("Locked      ", THEME.muted_style()),
                Span::styled(
                    utils::format_native(will.amount, &self.symbol),
                    THEME.amount_style(),
                ),
            ]),
            Line::from(vec![
                Span::styled("Created     ", THEME.muted_style()),
                Span::styled(
                    utils::format_timestamp(will.created_at),
                    Style::default().fg(THEME.text),
                ),
            ]),
            Line::from(vec![
                Span::styled("Last ping   ", THEME.muted_style()),
                Span::styled(
                    utils::format_time_ago(will.last_ping),
                    Style::default().fg(THEME.text),
                ),
            ]),
            Line::from(vec![
                Span::styled("Wait time   ", THEME.muted_style()),
                Span::styled(
                    utils::format_wait_time(will.claim_wait_time),
                    Style::default().fg(THEME.text),
                ),
            ]),
            Line::from(vec![
                Span::styled("Claimable   ", THEME.muted_style()),
                Span::styled(
                    utils::format_timestamp(will.claimable_at()),
                    Style::default().fg(THEME.text),
                ),
                Span::raw("  "),
                Span::styled(status_text, status_style.add_modifier(Modifier::BOLD)),
            ]),
        ];
        if !will.description.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Note        ", THEME.muted_style()),
                Span::styled(will.description.as_str(), Style::default().fg(THEME.text)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "p: ping (reset claim timer)   d: deposit more",
            THEME.muted_style(),
        )));
        lines
    }
}

impl Component for Dashboard {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Char('p') => Some(AppEvent::PingRequested),
            KeyCode::Char('n') => Some(AppEvent::Navigate(View::CreateWill)),
            KeyCode::Char('d') => Some(AppEvent::Navigate(View::Deposit)),
            KeyCode::Char('r') => Some(AppEvent::RefreshRequested),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        let wallet_block = Block::default()
            .title(" Wallet ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let wallet = Paragraph::new(self.wallet_lines())
            .block(wallet_block)
            .wrap(Wrap { trim: false });
        frame.render_widget(wallet, chunks[0]);

        let will_block = Block::default()
            .title(" My Will ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let will = Paragraph::new(self.will_lines())
            .block(will_block)
            .wrap(Wrap { trim: false });
        frame.render_widget(will, chunks[1]);
    }
}
