//! Data store seam
//!
//! The backend database is an external collaborator. The core talks to it
//! through the object-safe [`Repository`] trait and receives change
//! notifications on the [`ChangeFeed`](crate::infrastructure::events::ChangeFeed);
//! nothing in the components knows which backend is on the other side.
//! Updates are whole-row and last write wins — there are no transactions,
//! version columns, or conditional writes at this seam.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Favorite, Pattern, Profile, Project, QueueItem, StashYarn};
use crate::infrastructure::events::{Record, Table};

pub mod memory;

pub use memory::{MemoryStore, MemoryTable};

/// Store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
	/// No row with this id
	#[error("record {0} not found")]
	NotFound(Uuid),

	/// Insert with an id that already exists
	#[error("record {0} already exists")]
	AlreadyExists(Uuid),

	/// Backend write or read failure
	#[error("backend error: {0}")]
	Backend(String),

	/// Snapshot (de)serialization error
	#[error("serialization error: {0}")]
	Json(#[from] serde_json::Error),

	/// Snapshot file error
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A storable row
pub trait Entity: Clone + Send + Sync + 'static {
	/// The backend table this entity lives in
	const TABLE: Table;

	fn id(&self) -> Uuid;

	fn user_id(&self) -> Uuid;

	/// Wrap the row for the change feed
	fn to_record(&self) -> Record;
}

/// Async CRUD over one table
///
/// Every operation is independently fallible; callers decide whether a
/// failure is surfaced or swallowed.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
	/// Insert a new row
	async fn create(&self, record: &T) -> StoreResult<T>;

	/// Fetch a row by id
	async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>>;

	/// Fetch all rows owned by a user
	async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<T>>;

	/// Replace an existing row, last write wins
	async fn update(&self, record: &T) -> StoreResult<T>;

	/// Delete a row; deleting an absent id is a no-op
	async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

impl Entity for Project {
	const TABLE: Table = Table::Projects;

	fn id(&self) -> Uuid {
		self.id
	}

	fn user_id(&self) -> Uuid {
		self.user_id
	}

	fn to_record(&self) -> Record {
		Record::Project(self.clone())
	}
}

impl Entity for Pattern {
	const TABLE: Table = Table::Patterns;

	fn id(&self) -> Uuid {
		self.id
	}

	fn user_id(&self) -> Uuid {
		self.user_id
	}

	fn to_record(&self) -> Record {
		Record::Pattern(self.clone())
	}
}

impl Entity for StashYarn {
	const TABLE: Table = Table::Stash;

	fn id(&self) -> Uuid {
		self.id
	}

	fn user_id(&self) -> Uuid {
		self.user_id
	}

	fn to_record(&self) -> Record {
		Record::StashYarn(self.clone())
	}
}

impl Entity for QueueItem {
	const TABLE: Table = Table::Queue;

	fn id(&self) -> Uuid {
		self.id
	}

	fn user_id(&self) -> Uuid {
		self.user_id
	}

	fn to_record(&self) -> Record {
		Record::QueueItem(self.clone())
	}
}

impl Entity for Favorite {
	const TABLE: Table = Table::Favorites;

	fn id(&self) -> Uuid {
		self.id
	}

	fn user_id(&self) -> Uuid {
		self.user_id
	}

	fn to_record(&self) -> Record {
		Record::Favorite(self.clone())
	}
}

impl Entity for Profile {
	const TABLE: Table = Table::Profiles;

	fn id(&self) -> Uuid {
		self.id
	}

	// Profile rows are keyed by the user they belong to
	fn user_id(&self) -> Uuid {
		self.id
	}

	fn to_record(&self) -> Record {
		Record::Profile(self.clone())
	}
}
