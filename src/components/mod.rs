pub mod beneficiary_list;
pub mod dashboard;
pub mod deposit_form;
pub mod header;
pub mod help;
pub mod milestone_list;
pub mod status_bar;
pub mod will_form;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::events::AppEvent;

/// Trait for all UI components
pub trait Component {
    /// Handle a key event, optionally returning an AppEvent
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent>;

    /// Render the component into the given area
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
