//! Single-flight refresh coordination.
//!
//! [`RefreshCoordinator`] is an explicit `Idle -> Refreshing -> Idle` state machine. The first
//! caller that observes `Idle` receives a [`RefreshLease`] and performs the upstream exchange;
//! every caller arriving while the cycle is in flight receives a [`RefreshWaiter`] bound to the
//! same pending cycle. [`RefreshCoordinator::resolve`] returns the state to `Idle` and fans the
//! outcome out to every waiter, so N concurrent 401s produce exactly one upstream refresh and
//! all of them observe the same token pair or the same failure.
//!
//! The state lock is never held across an `.await`; waiters park on an async once-cell.

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{_prelude::*, auth::TokenPair};

/// Outcome shared by every participant of a refresh cycle.
pub type RefreshOutcome = Result<TokenPair, RefreshFailure>;

/// Failure shared by every participant of a refresh cycle.
#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum RefreshFailure {
	/// The refresh token is missing or was rejected; the session is over.
	#[error("Session ended: {0}.")]
	SessionEnded(BusinessError),
	/// The exchange failed for a reason that does not end the session.
	#[error("Token refresh failed: {reason}.")]
	Failed {
		/// Display form of the underlying failure.
		reason: String,
		/// Business code reported by the upstream, when one was present.
		code: Option<String>,
	},
	/// The leader was dropped before it resolved the cycle.
	#[error("Token refresh was abandoned before it completed.")]
	Abandoned,
}
impl RefreshFailure {
	/// Returns `true` when callers must treat the session as ended.
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::SessionEnded(_))
	}
}

#[derive(Debug)]
struct PendingRefresh {
	cycle: u64,
	outcome: AsyncOnceCell<RefreshOutcome>,
}

#[derive(Debug)]
enum RefreshState {
	Idle,
	Refreshing(Arc<PendingRefresh>),
}

/// Process-wide coordinator that allows at most one in-flight refresh.
#[derive(Debug)]
pub struct RefreshCoordinator {
	state: Mutex<RefreshState>,
	cycles: AtomicU64,
	metrics: RefreshMetrics,
}
impl RefreshCoordinator {
	/// Creates an idle coordinator.
	pub fn new() -> Self {
		Self {
			state: Mutex::new(RefreshState::Idle),
			cycles: AtomicU64::new(0),
			metrics: RefreshMetrics::default(),
		}
	}

	/// Starts a new cycle when idle, or joins the cycle already in flight.
	pub fn acquire_or_join(&self) -> RefreshTicket<'_> {
		let mut state = self.state.lock();

		if let RefreshState::Refreshing(pending) = &*state {
			let waiter = RefreshWaiter(pending.clone());

			self.metrics.record_join();

			return RefreshTicket::Follower(waiter);
		}

		let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
		let pending = Arc::new(PendingRefresh { cycle, outcome: AsyncOnceCell::new() });

		*state = RefreshState::Refreshing(pending.clone());
		self.metrics.record_attempt();

		RefreshTicket::Leader(RefreshLease { coordinator: self, pending, resolved: false })
	}

	/// Completes the leader's cycle: returns to `Idle`, then fans `outcome` out to every waiter.
	pub async fn resolve(
		&self,
		mut lease: RefreshLease<'_>,
		outcome: RefreshOutcome,
	) -> RefreshOutcome {
		lease.resolved = true;

		self.finish(&lease.pending, &outcome);

		let _ = lease.pending.outcome.set(outcome.clone()).await;

		outcome
	}

	/// Runs `refresh` as leader, or awaits the in-flight cycle as follower.
	///
	/// A follower whose leader was dropped mid-cycle does not see [`RefreshFailure::Abandoned`];
	/// it re-enters the coordinator, so one waiter takes over the exchange and the rest join it.
	pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = RefreshOutcome>,
	{
		loop {
			match self.acquire_or_join() {
				RefreshTicket::Leader(lease) => {
					let outcome = refresh().await;

					return self.resolve(lease, outcome).await;
				},
				RefreshTicket::Follower(waiter) => match waiter.wait().await {
					Err(RefreshFailure::Abandoned) => {
						self.metrics.record_takeover();

						continue;
					},
					outcome => return outcome,
				},
			}
		}
	}

	/// Returns `true` while a cycle is in flight.
	pub fn is_refreshing(&self) -> bool {
		matches!(&*self.state.lock(), RefreshState::Refreshing(_))
	}

	/// Returns the refresh counters.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	fn finish(&self, pending: &Arc<PendingRefresh>, outcome: &RefreshOutcome) {
		{
			let mut state = self.state.lock();

			let is_current = matches!(
				&*state,
				RefreshState::Refreshing(current) if Arc::ptr_eq(current, pending)
			);

			if is_current {
				*state = RefreshState::Idle;
			}
		}

		match outcome {
			Ok(_) => self.metrics.record_success(),
			Err(_) => self.metrics.record_failure(),
		}
	}
}
impl Default for RefreshCoordinator {
	fn default() -> Self {
		Self::new()
	}
}

/// Role assigned by [`RefreshCoordinator::acquire_or_join`].
#[derive(Debug)]
pub enum RefreshTicket<'a> {
	/// The caller must perform the upstream refresh and resolve the cycle.
	Leader(RefreshLease<'a>),
	/// The caller must await the in-flight cycle.
	Follower(RefreshWaiter),
}

/// Leader handle for an in-flight cycle.
///
/// Dropping the lease without calling [`RefreshCoordinator::resolve`] resolves every waiter with
/// [`RefreshFailure::Abandoned`] and returns the coordinator to `Idle`. Callers going through
/// [`RefreshCoordinator::run`] then retry the cycle instead of surfacing the abandonment.
#[derive(Debug)]
pub struct RefreshLease<'a> {
	coordinator: &'a RefreshCoordinator,
	pending: Arc<PendingRefresh>,
	resolved: bool,
}
impl RefreshLease<'_> {
	/// Monotonic identifier of the cycle this lease leads.
	pub fn cycle(&self) -> u64 {
		self.pending.cycle
	}
}
impl Drop for RefreshLease<'_> {
	fn drop(&mut self) {
		if self.resolved {
			return;
		}

		let outcome = Err(RefreshFailure::Abandoned);

		self.coordinator.finish(&self.pending, &outcome);

		let _ = self.pending.outcome.set_blocking(outcome);
	}
}

/// Follower handle for an in-flight cycle.
#[derive(Debug)]
pub struct RefreshWaiter(Arc<PendingRefresh>);
impl RefreshWaiter {
	/// Monotonic identifier of the cycle being awaited.
	pub fn cycle(&self) -> u64 {
		self.0.cycle
	}

	/// Waits for the leader to resolve the cycle.
	pub async fn wait(self) -> RefreshOutcome {
		self.0.outcome.wait().await.clone()
	}
}
