//! Project model
//!
//! A single piece of work on the needles. The row counter component owns
//! `row_count`; it is clamped at zero and never goes negative.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectStatus {
	#[default]
	InProgress,
	Finished,
	Hibernating,
	/// Ripped back out ("frogged" in knitting parlance)
	Frogged,
}

/// Which craft a project or pattern belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Craft {
	#[default]
	Knitting,
	Crochet,
}

/// A knitting or crochet project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
	/// Unique identifier, immutable
	pub id: Uuid,

	/// Owning user, immutable
	pub user_id: Uuid,

	/// Display name
	pub name: String,

	/// Current row, mutated only by the row counter component
	pub row_count: u32,

	/// Index into the client's accent color palette
	pub color_index: u32,

	/// Lifecycle status
	pub status: ProjectStatus,

	/// Craft type
	pub craft: Craft,

	/// Free-text pattern name
	pub pattern_name: Option<String>,

	/// Optional link to a pattern in the library
	pub pattern_id: Option<Uuid>,

	/// Optional link to a yarn in the stash
	pub yarn_id: Option<Uuid>,

	/// Needle or hook size, e.g. "US 7 / 4.5mm"
	pub needle_size: Option<String>,

	/// Gauge note, e.g. "20 sts x 26 rows = 4 in"
	pub gauge: Option<String>,

	/// Date work started
	pub started_at: Option<NaiveDate>,

	/// Date work finished
	pub completed_at: Option<NaiveDate>,

	/// Free-form notes
	pub notes: Option<String>,

	/// Photo URLs
	pub photos: Vec<String>,

	/// Completion estimate, 0-100
	pub progress: u8,

	/// Who the piece is for
	pub made_for: Option<String>,

	/// Happiness rating, 0 (unrated) to 5
	pub happiness: u8,

	/// Row creation time
	pub created_at: DateTime<Utc>,
}

impl Project {
	/// Create a new in-progress project for a user
	pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
		Self {
			id: Uuid::new_v4(),
			user_id,
			name: name.into(),
			row_count: 0,
			color_index: 0,
			status: ProjectStatus::default(),
			craft: Craft::default(),
			pattern_name: None,
			pattern_id: None,
			yarn_id: None,
			needle_size: None,
			gauge: None,
			started_at: None,
			completed_at: None,
			notes: None,
			photos: Vec::new(),
			progress: 0,
			made_for: None,
			happiness: 0,
			created_at: Utc::now(),
		}
	}

	/// Apply a row delta, clamping at zero
	pub fn clamped_row_count(&self, delta: i64) -> u32 {
		let next = self.row_count as i64 + delta;
		next.max(0) as u32
	}
}
