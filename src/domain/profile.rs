//! Profile model
//!
//! The profile row shares its id with the user it belongs to, so `id` and
//! `user_id` are the same value here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's public profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
	/// The user's id
	pub id: Uuid,

	/// Unique handle
	pub username: Option<String>,

	/// Display name
	pub display_name: Option<String>,

	/// Short bio
	pub bio: Option<String>,

	/// Free-text location
	pub location: Option<String>,

	/// Avatar URL
	pub avatar_url: Option<String>,

	/// Row creation time
	pub created_at: DateTime<Utc>,
}

impl Profile {
	/// Create an empty profile for a user
	pub fn new(user_id: Uuid) -> Self {
		Self {
			id: user_id,
			username: None,
			display_name: None,
			bio: None,
			location: None,
			avatar_url: None,
			created_at: Utc::now(),
		}
	}
}
