//! Dashboard Refresh State Machine
//!
//! Tracks the admin dashboard's data, error banner and in-flight requests
//! across the initial fetch, background polls and manual refreshes. The
//! controller never performs I/O: callers ask it for a [`FetchTicket`],
//! run the request themselves and hand the result back with
//! [`DashboardController::complete`]. Time is passed in as epoch
//! milliseconds.

use thiserror::Error;

/// Background poll period
pub const POLL_INTERVAL_MS: u64 = 15_000;

/// Minimum spacing between two manual refreshes
pub const MANUAL_REFRESH_COOLDOWN_MS: i64 = 2_000;

/// What started a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// Initial mount or the "Refresh Now" button
    Manual,
    /// Polling timer tick
    Poll,
}

/// Why a fetch was not started
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshRejected {
    #[error("Please wait a moment before refreshing again")]
    TooSoon { retry_in_ms: i64 },

    #[error("A refresh is already in progress")]
    Busy,

    #[error("Auto-refresh is turned off")]
    PollingDisabled,
}

/// Handle for one accepted fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub trigger: RefreshTrigger,
}

/// Result of a manual refresh, surfaced as a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    Failed(String),
}

impl RefreshOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            RefreshOutcome::Refreshed => "Dashboard refreshed!",
            RefreshOutcome::Failed(_) => "Failed to refresh dashboard",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed)
    }
}

/// Which main section the dashboard renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Loading,
    Content,
    /// "No feedback entries found.", only rendered when there is no error
    Empty,
}

pub const EMPTY_MESSAGE: &str = "No feedback entries found.";

/// Loading / polling / manual-refresh state of the admin dashboard
#[derive(Debug, Clone)]
pub struct DashboardController<T> {
    data: Option<Vec<T>>,
    error: Option<String>,
    polling: bool,
    in_flight: usize,
    manual_in_flight: usize,
    last_manual_at: Option<i64>,
    next_seq: u64,
    latest_applied: Option<u64>,
}

impl<T> Default for DashboardController<T> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<T> DashboardController<T> {
    pub fn new(polling: bool) -> Self {
        Self {
            data: None,
            error: None,
            polling,
            in_flight: 0,
            manual_in_flight: 0,
            last_manual_at: None,
            next_seq: 0,
            latest_applied: None,
        }
    }

    /// Initial fetch when the dashboard opens; counts as a manual refresh
    pub fn mount(&mut self, now_ms: i64) -> Result<FetchTicket, RefreshRejected> {
        self.request(RefreshTrigger::Manual, now_ms)
    }

    /// Ask to start a fetch.
    ///
    /// Polls are skipped while any request is in flight or polling is off.
    /// Manual refreshes are refused while another manual refresh is running
    /// or within [`MANUAL_REFRESH_COOLDOWN_MS`] of the previous one.
    pub fn request(
        &mut self,
        trigger: RefreshTrigger,
        now_ms: i64,
    ) -> Result<FetchTicket, RefreshRejected> {
        match trigger {
            RefreshTrigger::Poll => {
                if !self.polling {
                    return Err(RefreshRejected::PollingDisabled);
                }
                if self.in_flight > 0 {
                    return Err(RefreshRejected::Busy);
                }
            }
            RefreshTrigger::Manual => {
                if self.manual_in_flight > 0 {
                    return Err(RefreshRejected::Busy);
                }
                if let Some(last) = self.last_manual_at {
                    let elapsed = now_ms - last;
                    if elapsed < MANUAL_REFRESH_COOLDOWN_MS {
                        return Err(RefreshRejected::TooSoon {
                            retry_in_ms: MANUAL_REFRESH_COOLDOWN_MS - elapsed,
                        });
                    }
                }
                self.manual_in_flight += 1;
                self.last_manual_at = Some(now_ms);
            }
        }

        self.in_flight += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        Ok(FetchTicket { seq, trigger })
    }

    /// Record the result of a fetch started with `ticket`.
    ///
    /// A failure keeps the current data and sets the error banner, which
    /// stays up until a later fetch succeeds. A result older than one
    /// already applied is dropped. Manual refreshes return
    /// the outcome to report; polls return `None`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<T>, String>,
    ) -> Option<RefreshOutcome> {
        self.in_flight = self.in_flight.saturating_sub(1);
        if ticket.trigger == RefreshTrigger::Manual {
            self.manual_in_flight = self.manual_in_flight.saturating_sub(1);
        }

        let stale = self.latest_applied.is_some_and(|latest| ticket.seq < latest);

        let outcome = match result {
            Ok(data) => {
                if !stale {
                    self.data = Some(data);
                    self.error = None;
                    self.latest_applied = Some(ticket.seq);
                }
                RefreshOutcome::Refreshed
            }
            Err(message) => {
                if !stale {
                    self.error = Some(message.clone());
                    self.latest_applied = Some(ticket.seq);
                }
                RefreshOutcome::Failed(message)
            }
        };

        match ticket.trigger {
            RefreshTrigger::Manual => Some(outcome),
            RefreshTrigger::Poll => None,
        }
    }

    /// Flip auto-refresh, returning the new setting
    pub fn toggle_polling(&mut self) -> bool {
        self.polling = !self.polling;
        self.polling
    }

    pub fn polling(&self) -> bool {
        self.polling
    }

    pub fn data(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_manual_loading(&self) -> bool {
        self.manual_in_flight > 0
    }

    pub fn show_loading_indicator(&self) -> bool {
        (self.in_flight > 0 && self.data.is_none()) || self.manual_in_flight > 0
    }

    /// Whether the "Refresh Now" button is disabled
    pub fn refresh_disabled(&self) -> bool {
        self.show_loading_indicator()
    }

    pub fn view(&self) -> DashboardView {
        if self.show_loading_indicator() {
            DashboardView::Loading
        } else if self.data.as_ref().is_some_and(|d| !d.is_empty()) {
            DashboardView::Content
        } else {
            DashboardView::Empty
        }
    }

    /// Error banner text, hidden while the loading indicator shows
    pub fn error_banner(&self) -> Option<String> {
        if self.show_loading_indicator() {
            return None;
        }
        self.error.as_ref().map(|e| {
            format!(
                "Could not retrieve latest feedback data: {}. Data shown might be outdated.",
                e
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(polling: bool) -> DashboardController<u32> {
        let mut ctl = DashboardController::new(polling);
        let ticket = ctl.mount(0).unwrap();
        ctl.complete(ticket, Ok(vec![1, 2, 3]));
        ctl
    }

    #[test]
    fn test_mount_shows_loading_until_first_result() {
        let mut ctl: DashboardController<u32> = DashboardController::new(true);
        assert_eq!(ctl.view(), DashboardView::Empty);

        let ticket = ctl.mount(0).unwrap();
        assert_eq!(ticket.trigger, RefreshTrigger::Manual);
        assert_eq!(ctl.view(), DashboardView::Loading);
        assert!(ctl.refresh_disabled());

        let outcome = ctl.complete(ticket, Ok(vec![7]));
        assert_eq!(outcome, Some(RefreshOutcome::Refreshed));
        assert_eq!(ctl.view(), DashboardView::Content);
        assert_eq!(ctl.data(), Some(&[7][..]));
    }

    #[test]
    fn test_manual_refresh_cooldown() {
        let mut ctl = loaded(true);

        let err = ctl.request(RefreshTrigger::Manual, 1_500).unwrap_err();
        assert_eq!(err, RefreshRejected::TooSoon { retry_in_ms: 500 });
        assert_eq!(err.to_string(), "Please wait a moment before refreshing again");

        assert!(ctl.request(RefreshTrigger::Manual, 2_000).is_ok());
    }

    #[test]
    fn test_rejected_manual_does_not_reset_cooldown() {
        let mut ctl = loaded(true);
        assert!(ctl.request(RefreshTrigger::Manual, 1_900).is_err());
        assert!(ctl.request(RefreshTrigger::Manual, 2_100).is_ok());
    }

    #[test]
    fn test_poll_skipped_while_in_flight() {
        let mut ctl = loaded(true);
        let manual = ctl.request(RefreshTrigger::Manual, 5_000).unwrap();

        assert_eq!(
            ctl.request(RefreshTrigger::Poll, 15_000),
            Err(RefreshRejected::Busy)
        );

        ctl.complete(manual, Ok(vec![]));
        let poll = ctl.request(RefreshTrigger::Poll, 15_000).unwrap();
        assert_eq!(poll.trigger, RefreshTrigger::Poll);
        assert_eq!(
            ctl.request(RefreshTrigger::Poll, 15_001),
            Err(RefreshRejected::Busy)
        );
    }

    #[test]
    fn test_poll_keeps_content_visible() {
        let mut ctl = loaded(true);
        let _poll = ctl.request(RefreshTrigger::Poll, 15_000).unwrap();
        assert!(ctl.is_fetching());
        assert!(!ctl.show_loading_indicator());
        assert_eq!(ctl.view(), DashboardView::Content);
    }

    #[test]
    fn test_polling_toggle() {
        let mut ctl = loaded(true);
        assert!(!ctl.toggle_polling());
        assert_eq!(
            ctl.request(RefreshTrigger::Poll, 15_000),
            Err(RefreshRejected::PollingDisabled)
        );
        // Manual refresh still works with polling off
        assert!(ctl.request(RefreshTrigger::Manual, 15_000).is_ok());
        assert!(ctl.toggle_polling());
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut ctl = loaded(true);

        let poll = ctl.request(RefreshTrigger::Poll, 15_000).unwrap();
        assert_eq!(ctl.complete(poll, Err("Network error".into())), None);

        assert_eq!(ctl.data(), Some(&[1, 2, 3][..]));
        assert_eq!(ctl.view(), DashboardView::Content);
        assert_eq!(
            ctl.error_banner().unwrap(),
            "Could not retrieve latest feedback data: Network error. Data shown might be outdated."
        );

        let manual = ctl.request(RefreshTrigger::Manual, 20_000).unwrap();
        assert!(ctl.error_banner().is_none());
        let outcome = ctl.complete(manual, Err("timeout".into())).unwrap();
        assert_eq!(outcome.message(), "Failed to refresh dashboard");
        assert_eq!(ctl.error(), Some("timeout"));

        let manual = ctl.request(RefreshTrigger::Manual, 25_000).unwrap();
        ctl.complete(manual, Ok(vec![9]));
        assert_eq!(ctl.error(), None);
    }

    #[test]
    fn test_banner_stays_during_background_polls() {
        let mut ctl = loaded(true);
        let poll = ctl.request(RefreshTrigger::Poll, 15_000).unwrap();
        ctl.complete(poll, Err("Network error".into()));

        // Next poll runs behind the banner
        let poll = ctl.request(RefreshTrigger::Poll, 30_000).unwrap();
        assert!(ctl.is_fetching());
        assert_eq!(ctl.view(), DashboardView::Content);
        assert!(ctl.error_banner().unwrap().contains("Network error"));

        ctl.complete(poll, Err("Server error (502)".into()));
        assert!(ctl.error_banner().unwrap().contains("Server error (502)"));
        assert_eq!(ctl.data(), Some(&[1, 2, 3][..]));

        let poll = ctl.request(RefreshTrigger::Poll, 45_000).unwrap();
        ctl.complete(poll, Ok(vec![4]));
        assert!(ctl.error_banner().is_none());
        assert_eq!(ctl.data(), Some(&[4][..]));
    }

    #[test]
    fn test_first_fetch_failure_shows_empty_with_banner() {
        let mut ctl: DashboardController<u32> = DashboardController::new(true);
        let ticket = ctl.mount(0).unwrap();
        ctl.complete(ticket, Err("offline".into()));

        assert_eq!(ctl.view(), DashboardView::Empty);
        assert!(ctl.error_banner().is_some());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut ctl = loaded(true);
        let poll = ctl.request(RefreshTrigger::Poll, 15_000).unwrap();
        let manual = ctl.request(RefreshTrigger::Manual, 16_000).unwrap();

        ctl.complete(manual, Ok(vec![42]));
        ctl.complete(poll, Ok(vec![0]));

        assert_eq!(ctl.data(), Some(&[42][..]));
        assert!(!ctl.is_fetching());
    }
}
