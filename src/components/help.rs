use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        if self.visible {
            self.visible = false;
            true
        } else {
            false
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_width = area.width * 60 / 100;
        let popup_height = area.height * 70 / 100;
        let x = area.x + (area.width - popup_width) / 2;
        let y = area.y + (area.height - popup_height) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style())
            .style(Style::default().bg(THEME.surface));

        let entry = |keys: &'static str, action: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<9}"), Style::default().fg(THEME.text_accent)),
                Span::styled(action, Style::default().fg(THEME.text)),
            ])
        };
        let section = |title: &'static str| {
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            ))
        };

        let help_text = vec![
            section("Wallet"),
            entry("c", "Connect wallet (switches to the target chain)"),
            Line::from(""),
            section("Views"),
            entry("1", "Dashboard"),
            entry("2", "Inheritances you can claim"),
            entry("3", "Milestone releases you can claim"),
            entry("Esc", "Go back / Close"),
            Line::from(""),
            section("Dashboard"),
            entry("n", "Create a will"),
            entry("d", "Deposit more into your will"),
            entry("p", "Ping (prove liveness, reset claim timer)"),
            entry("r", "Refresh"),
            Line::from(""),
            section("Claim Views"),
            entry("\u{2191}/k \u{2193}/j", "Move selection"),
            entry("g / G", "Go to top / bottom"),
            entry("Enter", "Claim the selected entry"),
            entry("e", "Export list to CSV"),
            entry("r", "Refresh"),
            Line::from(""),
            section("Forms"),
            entry("Tab", "Next field"),
            entry("Enter", "Next field / submit"),
            entry("Ctrl+U", "Clear field"),
            Line::from(""),
            section("Other"),
            entry("?", "Toggle this help"),
            entry("q", "Quit"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}
