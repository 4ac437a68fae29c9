//! Change feed for record-level notifications
//!
//! Every successful store mutation is broadcast to subscribers as a
//! `ChangeEvent`. Delivery is best-effort fan-out: components subscribe on
//! attach, filter for the table (and id) they care about, and drop the
//! receiver on detach. Events arrive in commit order, including echoes of
//! the subscriber's own writes.

use serde::{Deserialize, Serialize};
use strum::Display;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::{Favorite, Pattern, Profile, Project, QueueItem, StashYarn};

/// Backend tables the feed reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Table {
	Projects,
	Patterns,
	Stash,
	Queue,
	Favorites,
	Profiles,
}

/// What happened to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChangeOp {
	Insert,
	Update,
	Delete,
}

/// The changed row, carried whole so subscribers can replace local state
/// without a re-fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Record {
	Project(Project),
	Pattern(Pattern),
	StashYarn(StashYarn),
	QueueItem(QueueItem),
	Favorite(Favorite),
	Profile(Profile),
}

impl Record {
	/// Id of the underlying row
	pub fn id(&self) -> Uuid {
		match self {
			Record::Project(p) => p.id,
			Record::Pattern(p) => p.id,
			Record::StashYarn(y) => y.id,
			Record::QueueItem(q) => q.id,
			Record::Favorite(f) => f.id,
			Record::Profile(p) => p.id,
		}
	}
}

/// A single record-level change notification
#[derive(Debug, Clone)]
pub struct ChangeEvent {
	pub op: ChangeOp,
	pub table: Table,
	pub record: Record,
}

/// Broadcast bus for change events
pub struct ChangeFeed {
	sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
	/// Create a new feed with the given buffer capacity
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Publish an event
	pub fn emit(&self, event: ChangeEvent) {
		// Ignore send errors (no receivers)
		let _ = self.sender.send(event);
	}

	/// Subscribe to all events
	pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
		self.sender.subscribe()
	}
}

impl Default for ChangeFeed {
	fn default() -> Self {
		Self::new(1024)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::Project;

	#[test]
	fn emit_without_receivers_is_a_noop() {
		let feed = ChangeFeed::default();
		feed.emit(ChangeEvent {
			op: ChangeOp::Insert,
			table: Table::Projects,
			record: Record::Project(Project::new(Uuid::new_v4(), "Mittens")),
		});
	}

	#[tokio::test]
	async fn subscribers_see_events_in_emit_order() {
		let feed = ChangeFeed::default();
		let mut rx = feed.subscribe();

		let project = Project::new(Uuid::new_v4(), "Shawl");
		for op in [ChangeOp::Insert, ChangeOp::Update, ChangeOp::Delete] {
			feed.emit(ChangeEvent {
				op,
				table: Table::Projects,
				record: Record::Project(project.clone()),
			});
		}

		assert_eq!(rx.recv().await.unwrap().op, ChangeOp::Insert);
		assert_eq!(rx.recv().await.unwrap().op, ChangeOp::Update);
		assert_eq!(rx.recv().await.unwrap().op, ChangeOp::Delete);
	}
}
