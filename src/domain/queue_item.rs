//! Queue model
//!
//! An entry in the user's to-make queue. `priority` is a sort key only:
//! lower sorts earlier, ties broken by `created_at`, and values are never
//! assumed to be dense or contiguous.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A queued pattern waiting to be cast on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
	/// Unique identifier, immutable
	pub id: Uuid,

	/// Owning user, immutable
	pub user_id: Uuid,

	/// Optional link to a pattern in the library
	pub pattern_id: Option<Uuid>,

	/// Display text
	pub pattern_name: String,

	/// Free-form notes
	pub notes: Option<String>,

	/// Sort key, mutated only by the queue ordering component
	pub priority: i64,

	/// Insertion time, secondary sort key
	pub created_at: DateTime<Utc>,
}

impl QueueItem {
	/// Create a new queue entry
	pub fn new(
		user_id: Uuid,
		pattern_name: impl Into<String>,
		notes: Option<String>,
		pattern_id: Option<Uuid>,
		priority: i64,
	) -> Self {
		Self {
			id: Uuid::new_v4(),
			user_id,
			pattern_id,
			pattern_name: pattern_name.into(),
			notes,
			priority,
			created_at: Utc::now(),
		}
	}

	/// Display ordering key: ascending priority, then insertion time
	pub fn sort_key(&self) -> (i64, DateTime<Utc>) {
		(self.priority, self.created_at)
	}
}
