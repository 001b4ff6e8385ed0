use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

pub struct StatusBar {
    pub connected: bool,
    pub balance: String,
    pub symbol: String,
    pub error_message: Option<String>,
    pub info_message: Option<String>,
    pub loading: bool,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            connected: false,
            balance: "0.0".to_string(),
            symbol: "DPLS".to_string(),
            error_message: None,
            info_message: None,
            loading: false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Background
        let bg = Block::default().style(THEME.header_style());
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(34)])
            .split(area);

        // --- Left side ---
        let left_content = if let Some(ref err) = self.error_message {
            Line::from(vec![
                Span::styled(
                    " ! ",
                    Style::default()
                        .fg(THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(err.as_str(), Style::default().fg(THEME.warning)),
            ])
        } else if self.loading {
            Line::from(Span::styled(
                " Working...",
                Style::default().fg(THEME.text_accent),
            ))
        } else if let Some(ref info) = self.info_message {
            Line::from(vec![
                Span::styled(" \u{2713} ", THEME.success_style()),
                Span::styled(info.as_str(), Style::default().fg(THEME.text)),
            ])
        } else {
            Line::from(vec![
                Span::styled(" c", Style::default().fg(THEME.text_accent)),
                Span::styled(":Connect  ", Style::default().fg(THEME.text_muted)),
                Span::styled("\u{2191}\u{2193}", Style::default().fg(THEME.text_accent)),
                Span::styled(":Navigate  ", Style::default().fg(THEME.text_muted)),
                Span::styled("Enter", Style::default().fg(THEME.text_accent)),
                Span::styled(":Select  ", Style::default().fg(THEME.text_muted)),
                Span::styled("Esc", Style::default().fg(THEME.text_accent)),
                Span::styled(":Back  ", Style::default().fg(THEME.text_muted)),
                Span::styled("?", Style::default().fg(THEME.text_accent)),
                Span::styled(":Help  ", Style::default().fg(THEME.text_muted)),
                Span::styled("q", Style::default().fg(THEME.text_accent)),
                Span::styled(":Quit", Style::default().fg(THEME.text_muted)),
            ])
        };

        let left = Paragraph::new(left_content).style(THEME.header_style());
        frame.render_widget(left, chunks[0]);

        // --- Right side: connection status + balance ---
        let (dot_color, status_text) = if self.connected {
            (THEME.success, "Connected")
        } else {
            (THEME.error, "Disconnected")
        };

        let right_content = Line::from(vec![
            Span::styled("\u{25cf} ", Style::default().fg(dot_color)),
            Span::styled(status_text, Style::default().fg(dot_color)),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(
                format!("{} {} ", self.balance, self.symbol),
                THEME.amount_style(),
            ),
        ]);

        let right = Paragraph::new(right_content)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(right, chunks[1]);
    }
}
