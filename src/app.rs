use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::config::ListSettings;
use crate::core::FetchError;
use crate::domain::{DashboardTab, Record, Row};
use crate::store::{Completion, FetchCache, FetchTicket, TabState};
use crate::window::{compute_window, max_scroll_offset, Window};

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

/// First visible row before a data swap, used to keep the viewport on the
/// same record after a refresh.
#[derive(Debug, Clone)]
struct ScrollAnchor {
    row_id: String,
    within_row: u64,
}

pub struct App {
    pub cache: FetchCache<DashboardTab, Record>,
    pub current_tab: DashboardTab,
    pub list: ListSettings,
    pub source_label: String,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
    scroll: BTreeMap<DashboardTab, u64>,
    viewport_height: u32,
    pending_fetches: Vec<FetchTicket<DashboardTab>>,
}

impl App {
    /// Build the dashboard with the first tab active. The initial fetch is
    /// queued and picked up by [`App::take_fetch_requests`].
    pub fn new(list: ListSettings, source_label: impl Into<String>) -> Self {
        let mut app = Self {
            cache: FetchCache::new(DashboardTab::ALL),
            current_tab: DashboardTab::Candidates,
            list,
            source_label: source_label.into(),
            status: None,
            help_open: false,
            should_quit: false,
            scroll: DashboardTab::ALL.iter().map(|tab| (*tab, 0)).collect(),
            viewport_height: 0,
            pending_fetches: Vec::new(),
        };
        app.activate(DashboardTab::Candidates);
        app
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub fn select_tab(&mut self, tab: DashboardTab) {
        if tab == self.current_tab {
            return;
        }
        self.current_tab = tab;
        self.activate(tab);
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.current_tab.next());
    }

    pub fn prev_tab(&mut self) {
        self.select_tab(self.current_tab.prev());
    }

    fn activate(&mut self, tab: DashboardTab) {
        if let Some(ticket) = self.cache.ensure(tab) {
            self.pending_fetches.push(ticket);
        }
        self.clamp_scroll(tab);
    }

    /// Force a fetch for the active tab. Refused while any fetch is in
    /// flight, unless the active tab itself failed and is idle.
    pub fn refresh_active(&mut self) {
        let retry = self
            .current_state()
            .is_some_and(|state| state.error.is_some() && !state.loading);
        if self.cache.is_any_loading() && !retry {
            self.set_status("Refresh already in progress", StatusLevel::Warn);
            return;
        }
        if let Some(ticket) = self.cache.refresh(self.current_tab) {
            self.pending_fetches.push(ticket);
            self.set_status(
                format!("Refreshing {}…", self.current_tab.noun()),
                StatusLevel::Info,
            );
        }
    }

    pub fn take_fetch_requests(&mut self) -> Vec<FetchTicket<DashboardTab>> {
        std::mem::take(&mut self.pending_fetches)
    }

    pub fn is_refreshing(&self) -> bool {
        self.cache.is_any_loading()
    }

    pub fn apply_fetch_result(
        &mut self,
        ticket: FetchTicket<DashboardTab>,
        result: Result<Vec<Record>, FetchError>,
    ) -> Completion {
        let tab = ticket.key;
        let anchor = self.scroll_anchor(tab);
        let failure = result.as_ref().err().map(|err| err.message().to_string());

        let completion = self.cache.complete(&ticket, result);
        if completion != Completion::Applied {
            return completion;
        }

        if let Some(anchor) = anchor {
            self.restore_anchor(tab, &anchor);
        }
        self.clamp_scroll(tab);

        if let Some(message) = failure {
            self.set_status(
                format!("Failed to load {}: {message}", tab.noun()),
                StatusLevel::Error,
            );
        }
        completion
    }

    pub fn apply_runtime_error(&mut self, message: String) {
        self.set_status(message, StatusLevel::Error);
    }

    pub fn state(&self, tab: DashboardTab) -> Option<&TabState<Record>> {
        self.cache.state(tab)
    }

    pub fn current_state(&self) -> Option<&TabState<Record>> {
        self.state(self.current_tab)
    }

    pub fn current_rows(&self) -> &[Record] {
        self.current_state()
            .and_then(|state| state.data.as_deref())
            .unwrap_or(&[])
    }

    /// "HH:MM:SS" in local time for the active tab, or "Never"
    pub fn last_updated_text(&self) -> String {
        self.current_state()
            .and_then(|state| state.last_fetched_at)
            .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "Never".to_string())
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        if self.viewport_height == height {
            return;
        }
        self.viewport_height = height;
        for tab in DashboardTab::ALL {
            self.clamp_scroll(tab);
        }
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_of(self.current_tab)
    }

    pub fn window(&self) -> Window {
        compute_window(
            self.current_rows().len(),
            self.list.row_height,
            self.viewport_height,
            self.scroll_offset(),
            self.list.overscan,
        )
    }

    pub fn max_scroll(&self) -> u64 {
        self.max_scroll_of(self.current_tab)
    }

    /// Scroll by whole rows; negative moves up.
    pub fn scroll_rows(&mut self, rows: i64) {
        let step = i64::from(self.list.row_height.get());
        self.scroll_by(rows.saturating_mul(step));
    }

    /// Scroll by terminal lines; negative moves up.
    pub fn scroll_by(&mut self, delta: i64) {
        let current = self.scroll_offset();
        let next = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as u64)
        };
        self.set_scroll(self.current_tab, next);
    }

    pub fn page_down(&mut self) {
        self.scroll_by(i64::from(self.page_size()));
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-i64::from(self.page_size()));
    }

    pub fn half_page_down(&mut self) {
        self.scroll_by(i64::from(self.page_size() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_by(-i64::from(self.page_size() / 2).max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.set_scroll(self.current_tab, 0);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.set_scroll(self.current_tab, u64::MAX);
    }

    fn page_size(&self) -> u32 {
        self.viewport_height.max(1)
    }

    fn scroll_of(&self, tab: DashboardTab) -> u64 {
        self.scroll.get(&tab).copied().unwrap_or(0)
    }

    fn max_scroll_of(&self, tab: DashboardTab) -> u64 {
        let rows = self.state(tab).map(TabState::row_count).unwrap_or(0) as u64;
        let total = rows.saturating_mul(u64::from(self.list.row_height.get()));
        max_scroll_offset(total, self.viewport_height)
    }

    fn set_scroll(&mut self, tab: DashboardTab, offset: u64) {
        let clamped = offset.min(self.max_scroll_of(tab));
        self.scroll.insert(tab, clamped);
    }

    fn clamp_scroll(&mut self, tab: DashboardTab) {
        self.set_scroll(tab, self.scroll_of(tab));
    }

    fn scroll_anchor(&self, tab: DashboardTab) -> Option<ScrollAnchor> {
        let rows = self.state(tab)?.data.as_deref()?;
        let offset = self.scroll_of(tab);
        if offset == 0 {
            return None;
        }
        let height = u64::from(self.list.row_height.get());
        let index = usize::try_from(offset / height).ok()?;
        let row = rows.get(index)?;
        Some(ScrollAnchor {
            row_id: row.row_id().to_string(),
            within_row: offset % height,
        })
    }

    fn restore_anchor(&mut self, tab: DashboardTab, anchor: &ScrollAnchor) {
        let position = self
            .state(tab)
            .and_then(|state| state.data.as_deref())
            .and_then(|rows| rows.iter().position(|row| row.row_id() == anchor.row_id));
        if let Some(index) = position {
            let height = u64::from(self.list.row_height.get());
            let offset = (index as u64)
                .saturating_mul(height)
                .saturating_add(anchor.within_row);
            self.scroll.insert(tab, offset);
        }
    }
}
