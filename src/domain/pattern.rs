//! Pattern model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::Craft;

/// A pattern in the user's library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
	/// Unique identifier, immutable
	pub id: Uuid,

	/// Owning user, immutable
	pub user_id: Uuid,

	/// Pattern name
	pub name: String,

	/// Designer credit
	pub author: Option<String>,

	/// Craft type
	pub craft: Craft,

	/// Category, e.g. "hat", "shawl", "socks"
	pub category: Option<String>,

	/// Recommended yarn weight
	pub yarn_weight: Option<String>,

	/// Recommended needle or hook size
	pub needle_size: Option<String>,

	/// Gauge note
	pub gauge: Option<String>,

	/// Required yardage
	pub yardage: Option<u32>,

	/// Free-form description
	pub description: Option<String>,

	/// Photo URLs
	pub photos: Vec<String>,

	/// Whether the pattern is free
	pub is_free: bool,

	/// Price if not free
	pub price: Option<f64>,

	/// Link to the pattern source
	pub url: Option<String>,

	/// Difficulty rating, 0-5
	pub difficulty: u8,

	/// Row creation time
	pub created_at: DateTime<Utc>,
}

impl Pattern {
	/// Create a new free pattern entry
	pub fn new(user_id: Uuid, name: impl Into<String>, craft: Craft) -> Self {
		Self {
			id: Uuid::new_v4(),
			user_id,
			name: name.into(),
			author: None,
			craft,
			category: None,
			yarn_weight: None,
			needle_size: None,
			gauge: None,
			yardage: None,
			description: None,
			photos: Vec::new(),
			is_free: true,
			price: None,
			url: None,
			difficulty: 0,
			created_at: Utc::now(),
		}
	}
}
