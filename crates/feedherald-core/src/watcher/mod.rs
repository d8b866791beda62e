use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::feed::{FetchSource, Item, Source};
use crate::notify::Dispatcher;
use crate::Result;

/// Delay between source fetches within one tick, to stay polite to providers.
const SOURCE_FETCH_DELAY: Duration = Duration::from_secs(2);

/// Outcome of polling a single source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Items the provider returned on this fetch
    pub fetched: usize,
    /// Items delivered to the dispatcher
    pub emitted: u32,
    /// Items whose dispatch failed (still marked seen)
    pub dispatch_failures: u32,
    /// True when this was the source's first poll: everything fetched was
    /// recorded as seen and nothing was emitted
    pub primed: bool,
}

/// Aggregated outcome of one tick across all sources of a watcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub emitted: u32,
    pub dispatch_failures: u32,
    /// Sources skipped this tick because their fetch failed
    pub failed_sources: u32,
}

/// Read-only snapshot of watcher state, published after every tick.
#[derive(Debug, Clone, Default)]
pub struct WatcherStatus {
    pub sources: usize,
    /// Total identifiers tracked across all seen-sets
    pub items_tracked: usize,
    pub last_tick_at: Option<DateTime<Utc>>,
    pub last_tick_emitted: u32,
    pub last_tick_failed_sources: u32,
}

/// Polls a fixed list of sources on a fixed interval and emits unseen items,
/// oldest first, to a dispatcher.
///
/// The seen-sets live here, owned by the watcher and mutated only from its
/// own tick. They are process-lifetime only: a restart re-primes every
/// source, which deliberately re-treats the provider's current page as
/// already seen instead of replaying it into the channel.
pub struct FeedWatcher<F> {
    name: &'static str,
    fetcher: F,
    sources: Vec<Source>,
    interval: Duration,
    /// Lowercased topical keywords; `None` disables the filter (video variant)
    keywords: Option<Vec<String>>,
    fetch_delay: Duration,
    seen: HashMap<String, HashSet<String>>,
    status_tx: Option<watch::Sender<WatcherStatus>>,
}

impl<F: FetchSource> FeedWatcher<F> {
    pub fn new(name: &'static str, fetcher: F, sources: Vec<Source>, interval: Duration) -> Self {
        Self {
            name,
            fetcher,
            sources,
            interval,
            keywords: None,
            fetch_delay: SOURCE_FETCH_DELAY,
            seen: HashMap::new(),
            status_tx: None,
        }
    }

    /// Restrict emission to items whose title or summary contains at least
    /// one of the given keywords (case-insensitive substring match).
    pub fn with_keywords(mut self, keywords: &[String]) -> Self {
        self.keywords = Some(keywords.iter().map(|k| k.to_lowercase()).collect());
        self
    }

    /// Override the inter-source fetch delay within a tick.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Subscribe to status snapshots. Snapshots are published after every
    /// tick; the watcher never reads them back.
    pub fn status_receiver(&mut self) -> watch::Receiver<WatcherStatus> {
        let (tx, rx) = watch::channel(WatcherStatus {
            sources: self.sources.len(),
            ..WatcherStatus::default()
        });
        self.status_tx = Some(tx);
        rx
    }

    /// Poll one source: fetch its latest page, drop already-seen items,
    /// apply the keyword filter, then emit the remainder oldest-first,
    /// marking each identifier seen as it goes.
    ///
    /// The first poll for a source primes its seen-set and emits nothing.
    /// A fetch failure abandons the source for this tick; the next scheduled
    /// interval is the retry.
    pub async fn poll_once(
        &mut self,
        source: &Source,
        dispatcher: &dyn Dispatcher,
    ) -> Result<PollOutcome> {
        let fetched = self.fetcher.fetch(source).await?;
        let source_name = fetched.source_name().to_string();
        let fetched_count = fetched.items.len();

        let seen = match self.seen.entry(source.key().to_string()) {
            Entry::Vacant(vacant) => {
                let ids: HashSet<String> =
                    fetched.items.into_iter().map(|item| item.id).collect();
                debug!(
                    "[{}] primed {} with {} items, none emitted",
                    self.name,
                    source,
                    ids.len()
                );
                vacant.insert(ids);
                return Ok(PollOutcome {
                    fetched: fetched_count,
                    primed: true,
                    ..PollOutcome::default()
                });
            }
            Entry::Occupied(occupied) => occupied.into_mut(),
        };

        let mut fresh: Vec<Item> = fetched
            .items
            .into_iter()
            .filter(|item| !seen.contains(&item.id))
            .collect();

        if let Some(keywords) = &self.keywords {
            // Discarded items do not enter the seen-set: a later feed edit
            // that makes them match keeps them eligible.
            fresh.retain(|item| matches_keywords(item, keywords));
        }

        // Oldest first, so a backlog arrives in publication order. Undated
        // items sort before dated ones; the sort is stable so feed order
        // breaks ties.
        fresh.sort_by_key(|item| item.published_at);

        let mut emitted = 0;
        let mut dispatch_failures = 0;

        for item in &fresh {
            match dispatcher.dispatch(item, &source_name).await {
                Ok(()) => emitted += 1,
                Err(e) => {
                    warn!(
                        "[{}] dispatch failed for '{}' from {}: {}",
                        self.name, item.title, source, e
                    );
                    dispatch_failures += 1;
                }
            }
            // Marked seen even on failure: at-most-once delivery, so a
            // transient dispatch error never turns into duplicate spam.
            seen.insert(item.id.clone());
        }

        Ok(PollOutcome {
            fetched: fetched_count,
            emitted,
            dispatch_failures,
            primed: false,
        })
    }

    /// Run one tick over all sources. A source whose fetch fails is logged
    /// and skipped; the remaining sources are still polled.
    pub async fn tick(&mut self, dispatcher: &dyn Dispatcher) -> TickSummary {
        let mut summary = TickSummary::default();

        for index in 0..self.sources.len() {
            let source = self.sources[index].clone();

            match self.poll_once(&source, dispatcher).await {
                Ok(outcome) => {
                    summary.emitted += outcome.emitted;
                    summary.dispatch_failures += outcome.dispatch_failures;
                }
                Err(e) => {
                    error!("[{}] failed to check {}: {}", self.name, source, e);
                    summary.failed_sources += 1;
                }
            }

            if index + 1 < self.sources.len() && !self.fetch_delay.is_zero() {
                tokio::time::sleep(self.fetch_delay).await;
            }
        }

        self.publish_status(&summary);
        summary
    }

    /// Run ticks forever on a fixed interval until the shutdown signal.
    ///
    /// The first tick fires immediately and primes every source. A tick
    /// that runs long delays the next one rather than stacking missed ticks.
    pub async fn run_forever(
        mut self,
        dispatcher: Arc<dyn Dispatcher>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "[{}] watcher started: {} sources, every {}s",
            self.name,
            self.sources.len(),
            self.interval.as_secs()
        );

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("[{}] watcher received shutdown signal", self.name);
                        break;
                    }
                }

                _ = interval.tick() => {
                    let summary = self.tick(dispatcher.as_ref()).await;
                    if summary.emitted > 0 || summary.failed_sources > 0 {
                        info!(
                            "[{}] tick: {} emitted, {} dispatch failures, {} sources failed",
                            self.name,
                            summary.emitted,
                            summary.dispatch_failures,
                            summary.failed_sources
                        );
                    }
                }
            }
        }

        info!("[{}] watcher stopped", self.name);
    }

    fn items_tracked(&self) -> usize {
        self.seen.values().map(HashSet::len).sum()
    }

    fn publish_status(&self, summary: &TickSummary) {
        if let Some(tx) = &self.status_tx {
            tx.send_replace(WatcherStatus {
                sources: self.sources.len(),
                items_tracked: self.items_tracked(),
                last_tick_at: Some(Utc::now()),
                last_tick_emitted: summary.emitted,
                last_tick_failed_sources: summary.failed_sources,
            });
        }
    }
}

/// Case-insensitive substring match over title + summary. Keywords must
/// already be lowercased.
fn matches_keywords(item: &Item, keywords: &[String]) -> bool {
    let haystack = format!(
        "{} {}",
        item.title,
        item.summary.as_deref().unwrap_or("")
    )
    .to_lowercase();

    keywords.iter().any(|keyword| haystack.contains(keyword.as_str()))
}
