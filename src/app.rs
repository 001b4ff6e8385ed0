use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;

use crate::components::Component;
use crate::components::beneficiary_list::BeneficiaryList;
use crate::components::dashboard::Dashboard;
use crate::components::deposit_form::DepositForm;
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::milestone_list::MilestoneList;
use crate::components::status_bar::StatusBar;
use crate::components::will_form::WillForm;
use crate::data::WillService;
use crate::events::{AppEvent, View};
use crate::theme::THEME;
use crate::utils;

pub struct App {
    // Navigation
    view_stack: Vec<View>,
    current_view: View,

    // Components
    header: Header,
    dashboard: Dashboard,
    will_form: WillForm,
    deposit_form: DepositForm,
    beneficiary_list: BeneficiaryList,
    milestone_list: MilestoneList,
    status_bar: StatusBar,
    help: HelpOverlay,

    // Data
    service: Arc<WillService>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,

    // State
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn with_service(
        service: Arc<WillService>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        tick_rate_ms: u64,
    ) -> Self {
        Self {
            view_stack: Vec::new(),
            current_view: View::Dashboard,
            header: Header::new(),
            dashboard: Dashboard::new(),
            will_form: WillForm::new(),
            deposit_form: DepositForm::new(),
            beneficiary_list: BeneficiaryList::new(),
            milestone_list: MilestoneList::new(),
            status_bar: StatusBar::new(),
            help: HelpOverlay::new(),
            service,
            event_rx,
            should_quit: false,
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub fn set_chain_info(&mut self, name: String, symbol: String) {
        self.header.chain_name = name;
        self.header.native_symbol = symbol.clone();
        self.status_bar.symbol = symbol.clone();
        self.dashboard.symbol = symbol.clone();
        self.beneficiary_list.symbol = symbol.clone();
        self.milestone_list.symbol = symbol;
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        // Forward wallet chain changes into this loop for resync
        self.service.watch_chain_changes();

        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Fill background
        frame.render_widget(
            Block::default().style(Style::default().bg(THEME.bg)),
            area,
        );

        // Layout: header (1) | content (fill) | status bar (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        // Header
        self.header.render(frame, chunks[0]);

        // Main content based on current view
        match &self.current_view {
            View::Dashboard => self.dashboard.render(frame, chunks[1]),
            View::CreateWill => self.will_form.render(frame, chunks[1]),
            View::Deposit => self.deposit_form.render(frame, chunks[1]),
            View::BeneficiaryWills => self.beneficiary_list.render(frame, chunks[1]),
            View::MilestoneWills => self.milestone_list.render(frame, chunks[1]),
        }

        // Status bar
        self.status_bar.render(frame, chunks[2]);

        // Overlays (rendered on top)
        self.help.render(frame, area);
    }

    fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only handle key press events (not release/repeat) for cross-platform compat
            if key.kind != KeyEventKind::Press {
                return;
            }

            // Help overlay consumes all keys when visible
            if self.help.handle_key(key) {
                return;
            }

            // Esc and Ctrl+C always work, including inside forms
            if key.code == KeyCode::Esc {
                self.go_back();
                return;
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                self.should_quit = true;
                return;
            }

            // Form views own every other key so typing works
            let in_form = matches!(self.current_view, View::CreateWill | View::Deposit);
            if !in_form {
                match key.code {
                    KeyCode::Char('q') => {
                        self.should_quit = true;
                        return;
                    }
                    KeyCode::Char('?') => {
                        self.help.toggle();
                        return;
                    }
                    KeyCode::Char('c') => {
                        self.status_bar.loading = true;
                        self.service.connect_wallet();
                        return;
                    }
                    // Tab switching with number keys
                    KeyCode::Char('1') => {
                        self.navigate_to(View::Dashboard);
                        return;
                    }
                    KeyCode::Char('2') => {
                        self.navigate_to(View::BeneficiaryWills);
                        return;
                    }
                    KeyCode::Char('3') => {
                        self.navigate_to(View::MilestoneWills);
                        return;
                    }
                    KeyCode::Backspace => {
                        self.go_back();
                        return;
                    }
                    _ => {}
                }
            }

            // Delegate to current view's component
            let app_event = self.delegate_key(key);
            if let Some(event) = app_event {
                self.handle_app_event(event);
            }
        }
    }

    fn delegate_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match &self.current_view {
            View::Dashboard => self.dashboard.handle_key(key),
            View::CreateWill => self.will_form.handle_key(key),
            View::Deposit => self.deposit_form.handle_key(key),
            View::BeneficiaryWills => self.beneficiary_list.handle_key(key),
            View::MilestoneWills => self.milestone_list.handle_key(key),
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SessionUpdated(session) => {
                self.header.account = session.account;
                self.header.connected = session.is_connected;
                self.status_bar.connected = session.is_connected;
                self.status_bar.balance = session.balance.clone();
                self.status_bar.loading = session.loading;
                self.status_bar.error_message = session.error.clone();
                self.dashboard.session = session;
            }
            AppEvent::WillLoaded(will) => {
                self.dashboard.will = will;
            }
            AppEvent::HasWill(has_will) => {
                self.dashboard.has_will = Some(has_will);
            }
            AppEvent::BeneficiaryWillsLoaded(wills) => {
                self.beneficiary_list.set_wills(wills);
            }
            AppEvent::MilestoneWillsLoaded(releases) => {
                self.milestone_list.set_releases(releases);
            }
            AppEvent::TxSubmitted(hash) => {
                self.status_bar.info_message =
                    Some(format!("Submitted {}", utils::truncate_hash(&hash)));
            }
            AppEvent::WillCreated(ok) => {
                self.will_form.finish(ok);
                if ok {
                    self.status_bar.info_message = Some("Will created".to_string());
                    self.navigate_to(View::Dashboard);
                    self.service.refresh_dashboard();
                }
            }
            AppEvent::DepositCompleted(ok) => {
                self.deposit_form.finish(ok);
                if ok {
                    self.status_bar.info_message = Some("Deposit confirmed".to_string());
                    self.navigate_to(View::Dashboard);
                    self.service.refresh_dashboard();
                }
            }
            AppEvent::PingCompleted(ok) => {
                if ok {
                    self.status_bar.info_message = Some("Liveness ping confirmed".to_string());
                    self.service.refresh_dashboard();
                }
            }
            AppEvent::WillClaimCompleted { owner, ok } => {
                if ok {
                    self.status_bar.info_message =
                        Some(format!("Claimed will of {}", utils::truncate_address(&owner)));
                    self.service.refresh_beneficiary_wills();
                }
            }
            AppEvent::MilestoneClaimCompleted { owner, ok } => {
                if ok {
                    self.status_bar.info_message = Some(format!(
                        "Claimed milestone release of {}",
                        utils::truncate_address(&owner)
                    ));
                    self.service.refresh_milestone_wills();
                }
            }
            AppEvent::ChainChanged(chain_id) => {
                self.status_bar.info_message = Some(format!("Wallet moved to chain {chain_id}"));
                // Back on the target chain: pull fresh data instead of
                // restarting the process
                if self.service.session().snapshot().is_connected {
                    self.service.refresh_dashboard();
                }
            }
            AppEvent::ExportComplete(message) => {
                self.status_bar.info_message = Some(message);
            }

            // User intents from components
            AppEvent::PingRequested => {
                self.service.ping();
            }
            AppEvent::RefreshRequested => match self.current_view {
                View::BeneficiaryWills => {
                    self.beneficiary_list.loading = true;
                    self.service.refresh_beneficiary_wills();
                }
                View::MilestoneWills => {
                    self.milestone_list.loading = true;
                    self.service.refresh_milestone_wills();
                }
                _ => self.service.refresh_dashboard(),
            },
            AppEvent::CreateWillSubmitted {
                beneficiary,
                description,
                amount,
                wait_time,
            } => {
                self.service
                    .submit_create_will(beneficiary, description, amount, wait_time);
            }
            AppEvent::DepositSubmitted(amount) => {
                self.service.submit_deposit(amount);
            }
            AppEvent::ClaimWillRequested(owner) => {
                self.service.claim_will(owner);
            }
            AppEvent::ClaimMilestoneRequested {
                owner,
                will_index,
                release_index,
            } => {
                self.service.claim_milestone(owner, will_index, release_index);
            }
            AppEvent::ExportRequested => {
                let path = format!("claimables-{}.csv", utils::now_ts());
                self.service.export_claimables(
                    self.beneficiary_list.wills.clone(),
                    self.milestone_list.releases.clone(),
                    path,
                );
            }

            AppEvent::Navigate(view) => {
                self.navigate_to(view);
            }
            AppEvent::Error(message) => {
                self.status_bar.error_message = Some(message);
                self.status_bar.loading = false;
            }
        }
    }

    fn navigate_to(&mut self, view: View) {
        if view == self.current_view {
            return;
        }

        // Update tab indicator
        match &view {
            View::Dashboard | View::CreateWill | View::Deposit => self.header.current_tab = 0,
            View::BeneficiaryWills => self.header.current_tab = 1,
            View::MilestoneWills => self.header.current_tab = 2,
        }

        // Clear transient messages on navigation
        self.status_bar.error_message = None;
        self.status_bar.info_message = None;
        self.service.session().clear_error();

        // Push current view to stack
        let old_view = std::mem::replace(&mut self.current_view, view.clone());
        self.view_stack.push(old_view);

        // Trigger data loading for the new view
        match &view {
            View::Dashboard => {
                self.service.refresh_dashboard();
            }
            View::CreateWill => {
                self.will_form.reset();
            }
            View::Deposit => {
                self.deposit_form.reset();
            }
            View::BeneficiaryWills => {
                self.beneficiary_list.loading = true;
                self.service.refresh_beneficiary_wills();
            }
            View::MilestoneWills => {
                self.milestone_list.loading = true;
                self.service.refresh_milestone_wills();
            }
        }
    }

    fn go_back(&mut self) {
        if let Some(prev_view) = self.view_stack.pop() {
            self.current_view = prev_view;
            match &self.current_view {
                View::Dashboard | View::CreateWill | View::Deposit => self.header.current_tab = 0,
                View::BeneficiaryWills => self.header.current_tab = 1,
                View::MilestoneWills => self.header.current_tab = 2,
            }
            self.status_bar.error_message = None;
            self.status_bar.info_message = None;
        }
    }
}
