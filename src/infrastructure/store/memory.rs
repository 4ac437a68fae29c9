//! In-memory store
//!
//! Reference implementation of the repository seam: per-table maps behind
//! `RwLock`, every successful mutation echoed onto the change feed in
//! commit order. Optionally snapshots all tables to a JSON file in the data
//! directory so local state survives restarts.
//!
//! Tests use [`MemoryTable::fail_next_updates`] to exercise the swallowed
//! persist-failure paths in the components.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Entity, Repository, StoreError, StoreResult};
use crate::domain::{Favorite, Pattern, Profile, Project, QueueItem, StashYarn};
use crate::infrastructure::events::{ChangeEvent, ChangeFeed, ChangeOp};

/// One table of the in-memory store
pub struct MemoryTable<T: Entity> {
	rows: RwLock<HashMap<Uuid, T>>,
	feed: Arc<ChangeFeed>,

	/// Number of upcoming updates to fail, for tests
	fail_updates: AtomicU32,
}

impl<T: Entity> MemoryTable<T> {
	fn new(feed: Arc<ChangeFeed>) -> Self {
		Self {
			rows: RwLock::new(HashMap::new()),
			feed,
			fail_updates: AtomicU32::new(0),
		}
	}

	/// Make the next `n` update calls fail with a backend error
	pub fn fail_next_updates(&self, n: u32) {
		self.fail_updates.store(n, Ordering::SeqCst);
	}

	fn take_injected_failure(&self) -> bool {
		self.fail_updates
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
			.is_ok()
	}

	fn emit(&self, op: ChangeOp, record: &T) {
		self.feed.emit(ChangeEvent {
			op,
			table: T::TABLE,
			record: record.to_record(),
		});
	}

	async fn rows_snapshot(&self) -> Vec<T> {
		self.rows.read().await.values().cloned().collect()
	}

	async fn load_rows(&self, rows: Vec<T>) {
		let mut map = self.rows.write().await;
		for row in rows {
			map.insert(row.id(), row);
		}
	}
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryTable<T> {
	async fn create(&self, record: &T) -> StoreResult<T> {
		let mut rows = self.rows.write().await;
		if rows.contains_key(&record.id()) {
			return Err(StoreError::AlreadyExists(record.id()));
		}
		rows.insert(record.id(), record.clone());
		drop(rows);

		debug!(table = %T::TABLE, id = %record.id(), "row inserted");
		self.emit(ChangeOp::Insert, record);
		Ok(record.clone())
	}

	async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>> {
		Ok(self.rows.read().await.get(&id).cloned())
	}

	async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<T>> {
		Ok(self
			.rows
			.read()
			.await
			.values()
			.filter(|row| row.user_id() == user_id)
			.cloned()
			.collect())
	}

	async fn update(&self, record: &T) -> StoreResult<T> {
		if self.take_injected_failure() {
			return Err(StoreError::Backend("injected update failure".into()));
		}

		let mut rows = self.rows.write().await;
		if !rows.contains_key(&record.id()) {
			return Err(StoreError::NotFound(record.id()));
		}
		rows.insert(record.id(), record.clone());
		drop(rows);

		debug!(table = %T::TABLE, id = %record.id(), "row updated");
		self.emit(ChangeOp::Update, record);
		Ok(record.clone())
	}

	async fn delete(&self, id: Uuid) -> StoreResult<()> {
		let removed = self.rows.write().await.remove(&id);
		if let Some(record) = removed {
			debug!(table = %T::TABLE, id = %id, "row deleted");
			self.emit(ChangeOp::Delete, &record);
		}
		Ok(())
	}
}

/// Serialized form of all tables
#[derive(Default, Serialize, Deserialize)]
struct Snapshot {
	projects: Vec<Project>,
	patterns: Vec<Pattern>,
	stash: Vec<StashYarn>,
	queue: Vec<QueueItem>,
	favorites: Vec<Favorite>,
	profiles: Vec<Profile>,
}

/// In-memory store over all tables
pub struct MemoryStore {
	pub projects: Arc<MemoryTable<Project>>,
	pub patterns: Arc<MemoryTable<Pattern>>,
	pub stash: Arc<MemoryTable<StashYarn>>,
	pub queue: Arc<MemoryTable<QueueItem>>,
	pub favorites: Arc<MemoryTable<Favorite>>,
	pub profiles: Arc<MemoryTable<Profile>>,

	snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
	/// Create an empty store publishing onto `feed`
	pub fn new(feed: Arc<ChangeFeed>) -> Self {
		Self {
			projects: Arc::new(MemoryTable::new(feed.clone())),
			patterns: Arc::new(MemoryTable::new(feed.clone())),
			stash: Arc::new(MemoryTable::new(feed.clone())),
			queue: Arc::new(MemoryTable::new(feed.clone())),
			favorites: Arc::new(MemoryTable::new(feed.clone())),
			profiles: Arc::new(MemoryTable::new(feed)),
			snapshot_path: None,
		}
	}

	/// Create a store backed by a snapshot file, loading it if present
	///
	/// Loading does not emit change events: the feed reports mutations, not
	/// startup state.
	pub async fn with_snapshot(feed: Arc<ChangeFeed>, path: impl AsRef<Path>) -> StoreResult<Self> {
		let path = path.as_ref().to_path_buf();
		let mut store = Self::new(feed);

		if path.exists() {
			let json = tokio::fs::read_to_string(&path).await?;
			let snapshot: Snapshot = serde_json::from_str(&json)?;
			info!(
				path = %path.display(),
				projects = snapshot.projects.len(),
				queue = snapshot.queue.len(),
				"loaded store snapshot"
			);

			store.projects.load_rows(snapshot.projects).await;
			store.patterns.load_rows(snapshot.patterns).await;
			store.stash.load_rows(snapshot.stash).await;
			store.queue.load_rows(snapshot.queue).await;
			store.favorites.load_rows(snapshot.favorites).await;
			store.profiles.load_rows(snapshot.profiles).await;
		}

		store.snapshot_path = Some(path);
		Ok(store)
	}

	/// Write all tables to the snapshot file, if one is configured
	pub async fn save(&self) -> StoreResult<()> {
		let Some(path) = &self.snapshot_path else {
			return Ok(());
		};

		let snapshot = Snapshot {
			projects: self.projects.rows_snapshot().await,
			patterns: self.patterns.rows_snapshot().await,
			stash: self.stash.rows_snapshot().await,
			queue: self.queue.rows_snapshot().await,
			favorites: self.favorites.rows_snapshot().await,
			profiles: self.profiles.rows_snapshot().await,
		};

		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}
		let json = serde_json::to_string_pretty(&snapshot)?;
		tokio::fs::write(path, json).await?;
		info!(path = %path.display(), "saved store snapshot");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::infrastructure::events::Table;

	fn store() -> (Arc<ChangeFeed>, MemoryStore) {
		let feed = Arc::new(ChangeFeed::default());
		let store = MemoryStore::new(feed.clone());
		(feed, store)
	}

	#[tokio::test]
	async fn create_and_find_round_trip() {
		let (_, store) = store();
		let project = Project::new(Uuid::new_v4(), "Gloves");
		store.projects.create(&project).await.unwrap();

		let found = store.projects.find_by_id(project.id).await.unwrap();
		assert_eq!(found.unwrap().name, "Gloves");
	}

	#[tokio::test]
	async fn list_is_scoped_to_the_owning_user() {
		let (_, store) = store();
		let alice = Uuid::new_v4();
		let bob = Uuid::new_v4();

		store
			.projects
			.create(&Project::new(alice, "Alice's hat"))
			.await
			.unwrap();
		store
			.projects
			.create(&Project::new(bob, "Bob's scarf"))
			.await
			.unwrap();

		let mine = store.projects.list_for_user(alice).await.unwrap();
		assert_eq!(mine.len(), 1);
		assert_eq!(mine[0].name, "Alice's hat");
	}

	#[tokio::test]
	async fn mutations_are_echoed_onto_the_feed() {
		let (feed, store) = store();
		let mut rx = feed.subscribe();

		let mut project = Project::new(Uuid::new_v4(), "Vest");
		store.projects.create(&project).await.unwrap();
		project.row_count = 4;
		store.projects.update(&project).await.unwrap();
		store.projects.delete(project.id).await.unwrap();

		let insert = rx.recv().await.unwrap();
		assert_eq!(insert.op, ChangeOp::Insert);
		assert_eq!(insert.table, Table::Projects);

		let update = rx.recv().await.unwrap();
		assert_eq!(update.op, ChangeOp::Update);
		match update.record {
			crate::infrastructure::events::Record::Project(p) => assert_eq!(p.row_count, 4),
			other => panic!("unexpected record: {other:?}"),
		}

		assert_eq!(rx.recv().await.unwrap().op, ChangeOp::Delete);
	}

	#[tokio::test]
	async fn deleting_an_absent_row_is_a_silent_noop() {
		let (feed, store) = store();
		let mut rx = feed.subscribe();

		store.projects.delete(Uuid::new_v4()).await.unwrap();
		assert!(rx.try_recv().is_err());
	}

	#[tokio::test]
	async fn injected_failures_consume_exactly_n_updates() {
		let (_, store) = store();
		let mut project = Project::new(Uuid::new_v4(), "Blanket");
		store.projects.create(&project).await.unwrap();

		store.projects.fail_next_updates(1);
		project.row_count = 1;
		assert!(store.projects.update(&project).await.is_err());
		assert!(store.projects.update(&project).await.is_ok());
	}

	#[tokio::test]
	async fn snapshot_round_trips_through_disk() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("store.json");
		let feed = Arc::new(ChangeFeed::default());

		let store = MemoryStore::with_snapshot(feed.clone(), &path).await.unwrap();
		let project = Project::new(Uuid::new_v4(), "Tea cozy");
		store.projects.create(&project).await.unwrap();
		store.save().await.unwrap();

		let reloaded = MemoryStore::with_snapshot(feed, &path).await.unwrap();
		let found = reloaded.projects.find_by_id(project.id).await.unwrap();
		assert_eq!(found.unwrap().name, "Tea cozy");
	}
}
