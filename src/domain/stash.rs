//! Yarn stash model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Standard yarn weight classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum YarnWeight {
	Lace,
	Fingering,
	Sport,
	Dk,
	#[default]
	Worsted,
	Aran,
	Bulky,
	SuperBulky,
}

/// A yarn in the user's stash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StashYarn {
	/// Unique identifier, immutable
	pub id: Uuid,

	/// Owning user, immutable
	pub user_id: Uuid,

	/// Yarn name
	pub yarn_name: String,

	/// Brand name
	pub brand: Option<String>,

	/// Base color
	pub color: Option<String>,

	/// Dyer's colorway name
	pub colorway: Option<String>,

	/// Weight class
	pub weight: YarnWeight,

	/// Fiber content, e.g. "80% merino / 20% nylon"
	pub fiber_content: Option<String>,

	/// Yardage per skein
	pub yardage: Option<u32>,

	/// Number of skeins held
	pub skeins: u32,

	/// Free-form notes
	pub notes: Option<String>,

	/// Photo URLs
	pub photos: Vec<String>,

	/// Row creation time
	pub created_at: DateTime<Utc>,
}

impl StashYarn {
	/// Create a new stash entry of one skein
	pub fn new(user_id: Uuid, yarn_name: impl Into<String>, weight: YarnWeight) -> Self {
		Self {
			id: Uuid::new_v4(),
			user_id,
			yarn_name: yarn_name.into(),
			brand: None,
			color: None,
			colorway: None,
			weight,
			fiber_content: None,
			yardage: None,
			skeins: 1,
			notes: None,
			photos: Vec::new(),
			created_at: Utc::now(),
		}
	}
}
