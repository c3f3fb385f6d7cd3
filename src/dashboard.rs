//! Dashboard Poller
//!
//! Drives a [`DashboardController`] from a tokio task: fetches once on
//! start, polls on a fixed interval and accepts manual refreshes and
//! polling toggles over a channel. Every state change is published as a
//! [`DashboardSnapshot`] for a renderer (the CLI `watch` command).

use async_trait::async_trait;
use habesha_core::dashboard::POLL_INTERVAL_MS;
use habesha_core::{
    DashboardController, DashboardStats, DashboardView, FeedbackEntry, FetchTicket,
    RatingDistribution, RefreshOutcome, RefreshRejected, RefreshTrigger,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Where the dashboard gets its entries from
#[async_trait]
pub trait FeedbackFeed: Send + Sync {
    /// Fetch all entries, newest first; errors are display messages
    async fn fetch(&self) -> Result<Vec<FeedbackEntry>, String>;
}

type FetchResult = (FetchTicket, Result<Vec<FeedbackEntry>, String>);

/// Input to a running poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerCommand {
    /// "Refresh Now"
    Refresh,
    /// Turn auto-refresh on or off
    TogglePolling,
    Stop,
}

/// Output of a running poller
#[derive(Debug, Clone)]
pub enum PollerEvent {
    /// A fetch finished; `outcome` is set for manual refreshes
    Updated {
        snapshot: DashboardSnapshot,
        outcome: Option<RefreshOutcome>,
    },
    /// A manual refresh was refused
    Rejected(RefreshRejected),
    PollingChanged(bool),
}

/// Everything a renderer needs to draw the dashboard
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub view: DashboardView,
    pub entries: Vec<FeedbackEntry>,
    pub stats: DashboardStats,
    pub distribution: RatingDistribution,
    pub error_banner: Option<String>,
    pub polling: bool,
}

impl DashboardSnapshot {
    fn capture(controller: &DashboardController<FeedbackEntry>) -> Self {
        let entries = controller.data().map(<[_]>::to_vec).unwrap_or_default();
        Self {
            view: controller.view(),
            stats: DashboardStats::compute(&entries),
            distribution: RatingDistribution::from_entries(&entries),
            error_banner: controller.error_banner(),
            polling: controller.polling(),
            entries,
        }
    }
}

/// Handle to a spawned poller
pub struct PollerHandle {
    pub commands: mpsc::Sender<PollerCommand>,
    pub events: mpsc::Receiver<PollerEvent>,
    pub task: JoinHandle<()>,
}

/// Background refresh loop for one dashboard
pub struct DashboardPoller {
    feed: Arc<dyn FeedbackFeed>,
    controller: DashboardController<FeedbackEntry>,
    period: Duration,
}

impl DashboardPoller {
    pub fn new(feed: Arc<dyn FeedbackFeed>, polling: bool) -> Self {
        Self {
            feed,
            controller: DashboardController::new(polling),
            period: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }

    /// Override the poll period
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Spawn the loop on the current runtime
    pub fn spawn(self) -> PollerHandle {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(64);
        let task = tokio::spawn(self.run(command_rx, event_tx));

        PollerHandle {
            commands: command_tx,
            events: event_rx,
            task,
        }
    }

    /// Run until [`PollerCommand::Stop`], the command channel closes or
    /// the event receiver is dropped.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<PollerCommand>,
        events: mpsc::Sender<PollerEvent>,
    ) {
        let started = Instant::now();
        let now_ms = move || started.elapsed().as_millis() as i64;

        let (result_tx, mut results) = mpsc::channel::<FetchResult>(8);

        let mut ticker = interval_at(started + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        match self.controller.mount(now_ms()) {
            Ok(ticket) => self.start_fetch(ticket, &result_tx),
            Err(e) => tracing::warn!(error = %e, "Initial dashboard fetch refused"),
        }

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.controller.request(RefreshTrigger::Poll, now_ms()) {
                        Ok(ticket) => self.start_fetch(ticket, &result_tx),
                        Err(reason) => tracing::debug!(reason = %reason, "Skipped dashboard poll"),
                    }
                }
                Some((ticket, result)) = results.recv() => {
                    if let Err(e) = &result {
                        tracing::warn!(seq = ticket.seq, error = %e, "Dashboard fetch failed");
                    }
                    let outcome = self.controller.complete(ticket, result);
                    let event = PollerEvent::Updated {
                        snapshot: DashboardSnapshot::capture(&self.controller),
                        outcome,
                    };
                    if events.send(event).await.is_err() {
                        break;
                    }
                }
                command = commands.recv() => {
                    let event = match command {
                        Some(PollerCommand::Refresh) => {
                            match self.controller.request(RefreshTrigger::Manual, now_ms()) {
                                Ok(ticket) => {
                                    self.start_fetch(ticket, &result_tx);
                                    continue;
                                }
                                Err(reason) => PollerEvent::Rejected(reason),
                            }
                        }
                        Some(PollerCommand::TogglePolling) => {
                            let polling = self.controller.toggle_polling();
                            tracing::info!(polling, "Dashboard auto-refresh toggled");
                            PollerEvent::PollingChanged(polling)
                        }
                        Some(PollerCommand::Stop) | None => break,
                    };
                    if events.send(event).await.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Dashboard poller stopped");
    }

    fn start_fetch(&self, ticket: FetchTicket, results: &mpsc::Sender<FetchResult>) {
        tracing::debug!(seq = ticket.seq, trigger = ?ticket.trigger, "Fetching dashboard data");

        let feed = Arc::clone(&self.feed);
        let results = results.clone();
        tokio::spawn(async move {
            let result = feed.fetch().await;
            let _ = results.send((ticket, result)).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use habesha_core::GuestSubmission;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeFeed {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeFeed {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedbackFeed for FakeFeed {
        async fn fetch(&self) -> Result<Vec<FeedbackEntry>, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err("HTTP 500".to_string());
            }
            let sub = GuestSubmission {
                rating: 2,
                comment: "Noisy hallway".to_string(),
                room_number: Some("310".to_string()),
                language: Default::default(),
            };
            Ok(vec![FeedbackEntry::guest("g1", Utc::now(), &sub)])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_then_poll() {
        let feed = FakeFeed::new(false);
        let mut handle = DashboardPoller::new(feed.clone(), true).spawn();

        match handle.events.recv().await.unwrap() {
            PollerEvent::Updated { snapshot, outcome } => {
                assert_eq!(outcome, Some(RefreshOutcome::Refreshed));
                assert_eq!(snapshot.view, DashboardView::Content);
                assert_eq!(snapshot.stats.negative_entries, 1);
                assert!(snapshot.error_banner.is_none());
            }
            other => panic!("unexpected event {:?}", other),
        }

        match handle.events.recv().await.unwrap() {
            PollerEvent::Updated { outcome, .. } => assert_eq!(outcome, None),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(feed.calls(), 2);

        handle.commands.send(PollerCommand::Stop).await.unwrap();
        handle.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_mount_shows_banner() {
        let feed = FakeFeed::new(true);
        let mut handle = DashboardPoller::new(feed, false).spawn();

        match handle.events.recv().await.unwrap() {
            PollerEvent::Updated { snapshot, outcome } => {
                assert_eq!(outcome, Some(RefreshOutcome::Failed("HTTP 500".to_string())));
                assert_eq!(snapshot.view, DashboardView::Empty);
                assert!(snapshot.error_banner.unwrap().contains("HTTP 500"));
            }
            other => panic!("unexpected event {:?}", other),
        }

        handle.commands.send(PollerCommand::Stop).await.unwrap();
        handle.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_too_soon_after_mount() {
        let feed = FakeFeed::new(false);
        let mut handle = DashboardPoller::new(feed, false).spawn();
        handle.events.recv().await.unwrap();

        handle.commands.send(PollerCommand::Refresh).await.unwrap();
        match handle.events.recv().await.unwrap() {
            PollerEvent::Rejected(RefreshRejected::TooSoon { .. }) => {}
            other => panic!("unexpected event {:?}", other),
        }

        handle.commands.send(PollerCommand::Stop).await.unwrap();
        handle.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_off_stops_fetches() {
        let feed = FakeFeed::new(false);
        let mut handle = DashboardPoller::new(feed.clone(), true).spawn();
        handle.events.recv().await.unwrap();

        handle.commands.send(PollerCommand::TogglePolling).await.unwrap();
        match handle.events.recv().await.unwrap() {
            PollerEvent::PollingChanged(polling) => assert!(!polling),
            other => panic!("unexpected event {:?}", other),
        }

        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS * 4)).await;
        assert_eq!(feed.calls(), 1);

        handle.commands.send(PollerCommand::Stop).await.unwrap();
        handle.task.await.unwrap();
    }
}
