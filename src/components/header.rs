use alloy::primitives::Address;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub chain_name: String,
    pub native_symbol: String,
    pub account: Option<Address>,
    pub current_tab: usize,
    pub connected: bool,
}

const TABS: &[&str] = &["Dashboard [1]", "Inheritances [2]", "Milestones [3]"];

impl Header {
    pub fn new() -> Self {
        Self {
            chain_name: String::new(),
            native_symbol: "DPLS".to_string(),
            account: None,
            current_tab: 0,
            connected: false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background for the entire header bar
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        // Split the header: left (title), center (tabs), right (chain + account)
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Min(0),
                Constraint::Length(36),
            ])
            .split(area);

        // Left: App title
        let title = Paragraph::new(Span::styled(
            " will-tui",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        // Center: Tab navigation
        let tab_titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
        let tabs = Tabs::new(tab_titles)
            .select(self.current_tab)
            .style(THEME.muted_style())
            .highlight_style(THEME.accent_style().add_modifier(Modifier::BOLD))
            .divider(Span::raw(" | "));
        frame.render_widget(tabs, chunks[1]);

        // Right: chain name and the connected account
        let account_str = match self.account {
            Some(ref addr) => utils::truncate_address(addr),
            None => "no account".to_string(),
        };
        let account_style = if self.connected {
            THEME.address_style()
        } else {
            THEME.muted_style()
        };
        let info = Line::from(vec![
            Span::styled(self.chain_name.as_str(), Style::default().fg(THEME.text)),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(account_str, account_style),
            Span::raw(" "),
        ]);
        let info_paragraph = Paragraph::new(info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(info_paragraph, chunks[2]);
    }
}
