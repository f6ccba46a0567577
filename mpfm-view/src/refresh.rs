//! Polling state for views that refetch on a fixed interval.
//!
//! Each fetch takes a [`Ticket`] carrying a generation number. A result is
//! applied only when its generation is newer than the data on screen, and a
//! scope change (new selection, filter, page or time range) retires every
//! ticket issued before it. An old response arriving late can therefore never
//! overwrite newer data, whatever order the requests complete in.

use std::fmt;
use std::time::Duration;

/// Interval between background refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest interval accepted from configuration.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Clamp a configured interval to [`MIN_POLL_INTERVAL`].
pub fn poll_interval(configured: Duration) -> Duration {
    configured.max(MIN_POLL_INTERVAL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Proof of a fetch issued by [`Polled::issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: Generation,
}

impl Ticket {
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

/// What happened to a resolved fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// New data is on screen.
    Applied,
    /// Newer data or a newer scope already superseded this fetch.
    Stale,
    /// Nothing was loaded yet; the error is shown.
    FailedInitial(String),
    /// Background failure; the previous data stays on screen.
    FailedKeptPrevious(String),
}

/// Data of one view plus the bookkeeping needed to poll it safely.
#[derive(Debug, Clone)]
pub struct Polled<S, T> {
    scope: S,
    data: Option<T>,
    error: Option<String>,
    issued: u64,
    applied: u64,
    /// Last generation issued before the current scope was set.
    scope_start: u64,
    in_flight: usize,
}

impl<S: PartialEq + fmt::Debug, T> Polled<S, T> {
    pub fn new(scope: S) -> Self {
        Self {
            scope,
            data: None,
            error: None,
            issued: 0,
            applied: 0,
            scope_start: 0,
            in_flight: 0,
        }
    }

    pub fn scope(&self) -> &S {
        &self.scope
    }

    /// Switch to a new scope. Returns `false` when the scope is unchanged.
    ///
    /// Data from the old scope is dropped and every outstanding ticket goes
    /// stale, so the next fetch counts as an initial load again.
    pub fn set_scope(&mut self, scope: S) -> bool {
        if self.scope == scope {
            return false;
        }
        log::debug!("Refresh scope {:?} -> {:?}", self.scope, scope);
        self.scope = scope;
        self.data = None;
        self.error = None;
        self.applied = self.issued;
        self.scope_start = self.issued;
        self.in_flight = 0;
        true
    }

    /// Start a fetch for the current scope.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        self.in_flight += 1;
        Ticket {
            generation: Generation(self.issued),
        }
    }

    /// Record the result of a fetch started with `ticket`.
    pub fn resolve<E: fmt::Display>(&mut self, ticket: Ticket, result: Result<T, E>) -> Outcome {
        let generation = ticket.generation.0;
        // Tickets of an earlier scope were already dropped from the count.
        if generation > self.scope_start {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        if generation <= self.applied {
            log::debug!(
                "Dropping stale response (generation {}, showing {})",
                generation,
                self.applied
            );
            return Outcome::Stale;
        }
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.applied = generation;
                Outcome::Applied
            }
            Err(e) => {
                let message = e.to_string();
                if self.data.is_none() {
                    self.error = Some(message.clone());
                    Outcome::FailedInitial(message)
                } else {
                    log::warn!("Background refresh failed, keeping previous data: {}", message);
                    Outcome::FailedKeptPrevious(message)
                }
            }
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Error of a failed initial load; background failures are never stored.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True until the first response for the current scope has arrived.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Generation of the data currently on screen.
    pub fn applied_generation(&self) -> Generation {
        Generation(self.applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type View = Polled<&'static str, u32>;

    #[test]
    fn later_request_wins_regardless_of_arrival_order() {
        // Second tick fires while the first fetch is still pending.
        let mut view = View::new("w1");
        let first = view.issue();
        let second = view.issue();
        assert_eq!(view.in_flight(), 2);

        assert_eq!(view.resolve(second, Ok::<_, String>(2)), Outcome::Applied);
        assert_eq!(view.resolve(first, Ok::<_, String>(1)), Outcome::Stale);
        assert_eq!(view.data(), Some(&2));

        // In-order arrival applies both, ending on the newer one.
        let third = view.issue();
        let fourth = view.issue();
        assert_eq!(view.resolve(third, Ok::<_, String>(3)), Outcome::Applied);
        assert_eq!(view.resolve(fourth, Ok::<_, String>(4)), Outcome::Applied);
        assert_eq!(view.data(), Some(&4));
    }

    #[test]
    fn scope_change_retires_outstanding_tickets() {
        let mut view = View::new("w1");
        let old = view.issue();
        assert!(view.set_scope("w2"));
        assert!(!view.set_scope("w2"));
        let new = view.issue();

        assert_eq!(view.in_flight(), 1);

        assert_eq!(view.resolve(old, Ok::<_, String>(10)), Outcome::Stale);
        assert!(view.data().is_none());
        assert_eq!(view.in_flight(), 1);
        assert_eq!(view.resolve(new, Ok::<_, String>(20)), Outcome::Applied);
        assert_eq!(view.data(), Some(&20));
        assert_eq!(view.in_flight(), 0);
    }

    #[test]
    fn initial_failure_is_surfaced() {
        let mut view = View::new("w1");
        assert!(view.is_loading());
        let ticket = view.issue();
        assert_eq!(
            view.resolve(ticket, Err::<u32, _>("unable to connect")),
            Outcome::FailedInitial("unable to connect".into())
        );
        assert_eq!(view.error(), Some("unable to connect"));
        assert!(!view.is_loading());

        let retry = view.issue();
        assert_eq!(view.resolve(retry, Ok::<_, String>(1)), Outcome::Applied);
        assert!(view.error().is_none());
    }

    #[test]
    fn background_failure_keeps_previous_data() {
        let mut view = View::new("w1");
        let ok = view.issue();
        view.resolve(ok, Ok::<_, String>(7));
        let failing = view.issue();
        assert_eq!(
            view.resolve(failing, Err::<u32, _>("timeout")),
            Outcome::FailedKeptPrevious("timeout".into())
        );
        assert_eq!(view.data(), Some(&7));
        assert!(view.error().is_none());
    }

    #[test]
    fn interval_is_clamped() {
        assert_eq!(poll_interval(Duration::from_millis(10)), MIN_POLL_INTERVAL);
        assert_eq!(poll_interval(DEFAULT_POLL_INTERVAL), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn concurrent_fetches_resolve_out_of_order() {
        use tokio::sync::oneshot;

        let mut view = View::new("field-a");
        let (slow_tx, slow_rx) = oneshot::channel::<u32>();
        let (fast_tx, fast_rx) = oneshot::channel::<u32>();
        let slow_ticket = view.issue();
        let fast_ticket = view.issue();

        let slow = tokio::spawn(async move { slow_rx.await.unwrap_or_default() });
        let fast = tokio::spawn(async move { fast_rx.await.unwrap_or_default() });

        fast_tx.send(200).unwrap();
        let fast_value = fast.await.unwrap();
        assert_eq!(view.resolve(fast_ticket, Ok::<_, String>(fast_value)), Outcome::Applied);

        slow_tx.send(100).unwrap();
        let slow_value = slow.await.unwrap();
        assert_eq!(view.resolve(slow_ticket, Ok::<_, String>(slow_value)), Outcome::Stale);
        assert_eq!(view.data(), Some(&200));
    }
}
