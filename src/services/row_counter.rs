//! Row counter synchronization
//!
//! Owns an in-memory mirror of one project row and keeps its `row_count`
//! loosely in sync with the backend. Local mutations are optimistic: the
//! mirror changes first, then a single persist write is issued and any
//! failure is swallowed (logged, never rolled back). A spawned listener
//! applies every remote update for the project unconditionally —
//! last-writer-wins, no merge, no staleness check — so concurrent edits
//! from two clients can lose an increment. That is the accepted tradeoff
//! for a single-user tool; see the lost-update test in
//! `tests/row_counter_sync_test.rs`.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::domain::Project;
use crate::infrastructure::events::{ChangeFeed, ChangeOp, Record, Table};
use crate::infrastructure::store::{Repository, StoreError, StoreResult};

/// Optimistic mirror of a single project's row counter
pub struct RowCounter {
	project_id: Uuid,

	/// Local state; `None` once the project is deleted remotely
	mirror: Arc<RwLock<Option<Project>>>,

	store: Arc<dyn Repository<Project>>,

	/// Feed listener, running from attach until detach
	listener: Mutex<Option<JoinHandle<()>>>,
}

impl RowCounter {
	/// Load the project and start listening for remote changes
	///
	/// Mirrors a view mount: fetch once, then subscribe. Fails only if the
	/// project cannot be read at all.
	#[instrument(skip(store, feed))]
	pub async fn attach(
		store: Arc<dyn Repository<Project>>,
		feed: &ChangeFeed,
		project_id: Uuid,
	) -> StoreResult<Self> {
		let project = store
			.find_by_id(project_id)
			.await?
			.ok_or(StoreError::NotFound(project_id))?;

		let mirror = Arc::new(RwLock::new(Some(project)));
		let listener = Self::spawn_listener(feed, project_id, mirror.clone());

		Ok(Self {
			project_id,
			mirror,
			store,
			listener: Mutex::new(Some(listener)),
		})
	}

	fn spawn_listener(
		feed: &ChangeFeed,
		project_id: Uuid,
		mirror: Arc<RwLock<Option<Project>>>,
	) -> JoinHandle<()> {
		let mut rx = feed.subscribe();
		tokio::spawn(async move {
			loop {
				match rx.recv().await {
					Ok(event) => {
						if event.table != Table::Projects || event.record.id() != project_id {
							continue;
						}
						match (event.op, event.record) {
							(ChangeOp::Update | ChangeOp::Insert, Record::Project(project)) => {
								apply_remote(&mirror, project).await;
							}
							(ChangeOp::Delete, _) => {
								*mirror.write().await = None;
								debug!(%project_id, "project deleted remotely, mirror cleared");
							}
							_ => {}
						}
					}
					// Dropped events just mean we missed some echoes; the
					// next update for this project still wins.
					Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
						warn!(%project_id, skipped, "change feed lagged");
					}
					Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
				}
			}
		})
	}

	/// Stop delivering remote updates to this mirror
	///
	/// Must be called when the owning view goes away; afterwards the mirror
	/// is frozen at its last value.
	pub async fn detach(&self) {
		if let Some(task) = self.listener.lock().await.take() {
			task.abort();
			debug!(project_id = %self.project_id, "row counter detached");
		}
	}

	/// The mirrored project id
	pub fn project_id(&self) -> Uuid {
		self.project_id
	}

	/// Current local row count, if the project still exists
	pub async fn row_count(&self) -> Option<u32> {
		self.mirror.read().await.as_ref().map(|p| p.row_count)
	}

	/// Snapshot of the mirrored project
	pub async fn project(&self) -> Option<Project> {
		self.mirror.read().await.clone()
	}

	/// Count one more row
	pub async fn increment(&self) {
		self.apply_delta(1).await;
	}

	/// Un-count a row, clamping at zero
	pub async fn decrement(&self) {
		self.apply_delta(-1).await;
	}

	/// Apply a delta to the mirror, then persist the new value
	///
	/// The mirror is updated before the write is issued so the caller sees
	/// the new count immediately. Exactly one persist write per call; a
	/// failed write leaves local and remote diverged until the next remote
	/// push or reload.
	pub async fn apply_delta(&self, delta: i64) {
		let updated = {
			let mut mirror = self.mirror.write().await;
			let Some(project) = mirror.as_mut() else {
				return;
			};
			project.row_count = project.clamped_row_count(delta);
			project.clone()
		};

		if let Err(e) = self.store.update(&updated).await {
			warn!(project_id = %self.project_id, error = %e, "row count persist failed");
		}
	}

	/// Set the counter back to zero, same contract as a delta
	pub async fn reset(&self) {
		let updated = {
			let mut mirror = self.mirror.write().await;
			let Some(project) = mirror.as_mut() else {
				return;
			};
			project.row_count = 0;
			project.clone()
		};

		if let Err(e) = self.store.update(&updated).await {
			warn!(project_id = %self.project_id, error = %e, "row count reset persist failed");
		}
	}
}

/// Replace the mirror with a server-confirmed row
///
/// Unconditional overwrite: whatever committed last on the backend wins
/// locally, including echoes of this client's own writes.
async fn apply_remote(mirror: &RwLock<Option<Project>>, project: Project) {
	*mirror.write().await = Some(project);
}
