//! Queue ordering
//!
//! Owns a sorted in-memory mirror of one user's to-make queue. Display
//! order is always derived by sorting on `(priority, created_at)` — the
//! numeric priorities are never assumed dense, so removals leave gaps and
//! stale-mirror appends may collide, both harmlessly.
//!
//! A single-step move swaps the priority values of the entry and its
//! neighbor with two concurrent, non-transactional writes. Both writes are
//! always attempted; if one fails the backend is left in an intermediate
//! state until the next refetch, which is accepted and covered by tests
//! rather than fixed.

use std::sync::Arc;

use futures::join;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::domain::QueueItem;
use crate::infrastructure::store::{Repository, StoreResult};

/// Direction of a single-step move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
	Up,
	Down,
}

/// Sorted mirror of one user's queue
pub struct QueueBoard {
	user_id: Uuid,
	items: RwLock<Vec<QueueItem>>,
	store: Arc<dyn Repository<QueueItem>>,
}

impl QueueBoard {
	/// Load the user's queue into a fresh board
	pub async fn open(store: Arc<dyn Repository<QueueItem>>, user_id: Uuid) -> StoreResult<Self> {
		let board = Self {
			user_id,
			items: RwLock::new(Vec::new()),
			store,
		};
		board.refresh().await?;
		Ok(board)
	}

	/// The owning user
	pub fn user_id(&self) -> Uuid {
		self.user_id
	}

	/// Snapshot of the queue in display order
	pub async fn items(&self) -> Vec<QueueItem> {
		self.items.read().await.clone()
	}

	/// Number of entries currently mirrored
	pub async fn len(&self) -> usize {
		self.items.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.items.read().await.is_empty()
	}

	/// Refetch the queue and rebuild the sorted mirror
	pub async fn refresh(&self) -> StoreResult<()> {
		let mut rows = self.store.list_for_user(self.user_id).await?;
		rows.sort_by_key(QueueItem::sort_key);
		*self.items.write().await = rows;
		Ok(())
	}

	/// Append an entry at the tail of the currently loaded list
	///
	/// The new priority is the mirror's length. If the mirror is stale the
	/// priority may collide with an existing entry; display order stays
	/// correct through the `created_at` tie-break.
	#[instrument(skip(self, notes))]
	pub async fn append(
		&self,
		pattern_name: &str,
		notes: Option<String>,
		pattern_id: Option<Uuid>,
	) -> StoreResult<()> {
		let priority = self.items.read().await.len() as i64;
		let item = QueueItem::new(self.user_id, pattern_name, notes, pattern_id, priority);

		if let Err(e) = self.store.create(&item).await {
			warn!(user_id = %self.user_id, error = %e, "queue append failed");
		}
		self.refresh().await
	}

	/// Remove an entry
	///
	/// Other entries keep their priority values; gaps are fine.
	#[instrument(skip(self))]
	pub async fn remove(&self, id: Uuid) -> StoreResult<()> {
		if let Err(e) = self.store.delete(id).await {
			warn!(user_id = %self.user_id, error = %e, "queue remove failed");
		}
		self.refresh().await
	}

	/// Move an entry one step towards the front
	pub async fn move_up(&self, id: Uuid) -> StoreResult<()> {
		self.swap_with_neighbor(id, MoveDirection::Up).await
	}

	/// Move an entry one step towards the back
	pub async fn move_down(&self, id: Uuid) -> StoreResult<()> {
		self.swap_with_neighbor(id, MoveDirection::Down).await
	}

	/// Exchange priorities with the adjacent entry in the sorted mirror
	///
	/// No-op (zero writes) if the entry is unknown or already at the edge.
	/// Otherwise both writes are issued concurrently, neither waiting on or
	/// conditioned on the other, then the list is refetched.
	#[instrument(skip(self))]
	async fn swap_with_neighbor(&self, id: Uuid, direction: MoveDirection) -> StoreResult<()> {
		let (mut moving, mut neighbor) = {
			let items = self.items.read().await;
			let Some(idx) = items.iter().position(|item| item.id == id) else {
				return Ok(());
			};
			let swap_idx = match direction {
				MoveDirection::Up => idx.checked_sub(1),
				MoveDirection::Down => idx.checked_add(1),
			};
			let Some(swap_idx) = swap_idx.filter(|&i| i < items.len()) else {
				return Ok(());
			};
			(items[idx].clone(), items[swap_idx].clone())
		};

		debug!(
			moving = %moving.id,
			neighbor = %neighbor.id,
			?direction,
			"swapping queue priorities"
		);
		std::mem::swap(&mut moving.priority, &mut neighbor.priority);

		let (first, second) = join!(self.store.update(&moving), self.store.update(&neighbor));
		if let Err(e) = first {
			warn!(id = %moving.id, error = %e, "priority swap write failed");
		}
		if let Err(e) = second {
			warn!(id = %neighbor.id, error = %e, "priority swap write failed");
		}

		self.refresh().await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::infrastructure::events::ChangeFeed;
	use crate::infrastructure::store::MemoryStore;

	async fn board_with(names: &[&str]) -> (MemoryStore, QueueBoard) {
		let feed = Arc::new(ChangeFeed::default());
		let store = MemoryStore::new(feed);
		let user_id = Uuid::new_v4();

		let board = QueueBoard::open(store.queue.clone(), user_id).await.unwrap();
		for name in names {
			board.append(name, None, None).await.unwrap();
		}
		(store, board)
	}

	#[tokio::test]
	async fn append_assigns_the_current_length_as_priority() {
		let (_store, board) = board_with(&["Hat", "Scarf", "Socks"]).await;

		let items = board.items().await;
		let priorities: Vec<i64> = items.iter().map(|i| i.priority).collect();
		assert_eq!(priorities, vec![0, 1, 2]);
		assert_eq!(items[0].pattern_name, "Hat");
	}

	#[tokio::test]
	async fn remove_leaves_other_priorities_untouched() {
		let (_store, board) = board_with(&["Hat", "Scarf", "Socks"]).await;
		let middle = board.items().await[1].id;

		board.remove(middle).await.unwrap();

		let items = board.items().await;
		let priorities: Vec<i64> = items.iter().map(|i| i.priority).collect();
		// Gap at 1 is expected and harmless.
		assert_eq!(priorities, vec![0, 2]);
	}

	#[tokio::test]
	async fn move_up_swaps_priorities_with_the_neighbor() {
		let (_store, board) = board_with(&["Hat", "Scarf"]).await;
		let scarf = board.items().await[1].id;

		board.move_up(scarf).await.unwrap();

		let items = board.items().await;
		assert_eq!(items[0].pattern_name, "Scarf");
		assert_eq!(items[0].priority, 0);
		assert_eq!(items[1].pattern_name, "Hat");
		assert_eq!(items[1].priority, 1);
	}

	#[tokio::test]
	async fn swap_exchanges_sparse_priority_values_verbatim() {
		let feed = Arc::new(ChangeFeed::default());
		let store = MemoryStore::new(feed);
		let user_id = Uuid::new_v4();

		// A at priority 2, B at priority 5: values swap, not ranks.
		let a = QueueItem::new(user_id, "A", None, None, 2);
		let b = QueueItem::new(user_id, "B", None, None, 5);
		store.queue.create(&a).await.unwrap();
		store.queue.create(&b).await.unwrap();

		let board = QueueBoard::open(store.queue.clone(), user_id).await.unwrap();
		board.move_up(b.id).await.unwrap();

		let items = board.items().await;
		assert_eq!(items[0].id, b.id);
		assert_eq!(items[0].priority, 2);
		assert_eq!(items[1].id, a.id);
		assert_eq!(items[1].priority, 5);
	}

	#[tokio::test]
	async fn edge_moves_are_noops_with_zero_writes() {
		let (store, board) = board_with(&["Hat", "Scarf"]).await;
		let first = board.items().await[0].id;
		let last = board.items().await[1].id;

		// Any write would consume the injected failure and surface below.
		store.queue.fail_next_updates(1);
		board.move_up(first).await.unwrap();
		board.move_down(last).await.unwrap();

		let items = board.items().await;
		assert_eq!(items[0].id, first);
		assert_eq!(items[1].id, last);

		// The injected failure is still pending, so no writes were issued.
		let probe = board.items().await[0].clone();
		assert!(store.queue.update(&probe).await.is_err());
	}

	#[tokio::test]
	async fn partial_swap_failure_leaves_one_row_changed() {
		let (store, board) = board_with(&["Hat", "Scarf"]).await;
		let items = board.items().await;
		let (hat, scarf) = (items[0].clone(), items[1].clone());

		// First swap write fails, second succeeds: exactly one priority
		// changes and the refetched order no longer reflects a clean swap.
		store.queue.fail_next_updates(1);
		board.move_up(scarf.id).await.unwrap();

		let hat_now = store.queue.find_by_id(hat.id).await.unwrap().unwrap();
		let scarf_now = store.queue.find_by_id(scarf.id).await.unwrap().unwrap();
		let changed = [
			hat_now.priority != hat.priority,
			scarf_now.priority != scarf.priority,
		];
		assert_eq!(changed.iter().filter(|&&c| c).count(), 1);
	}

	#[tokio::test]
	async fn stale_append_collisions_resolve_by_creation_time() {
		let (store, board) = board_with(&["Hat"]).await;

		// Another device appended while our mirror was stale: same priority.
		let rival = QueueItem::new(board.user_id(), "Rival cowl", None, None, 1);
		store.queue.create(&rival).await.unwrap();
		board.append("Our mittens", None, None).await.unwrap();

		let items = board.items().await;
		assert_eq!(items.len(), 3);
		assert_eq!(items[1].pattern_name, "Rival cowl");
		assert_eq!(items[2].pattern_name, "Our mittens");
		assert_eq!(items[1].priority, items[2].priority);
	}
}
