//! Favorite model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A favorited pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
	/// Unique identifier, immutable
	pub id: Uuid,

	/// Owning user, immutable
	pub user_id: Uuid,

	/// The favorited pattern
	pub pattern_id: Uuid,

	/// Row creation time
	pub created_at: DateTime<Utc>,
}

impl Favorite {
	/// Favorite a pattern for a user
	pub fn new(user_id: Uuid, pattern_id: Uuid) -> Self {
		Self {
			id: Uuid::new_v4(),
			user_id,
			pattern_id,
			created_at: Utc::now(),
		}
	}
}
