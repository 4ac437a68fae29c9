//! Favorites
//!
//! Toggle-style bookmarking of patterns: at most one favorite row per
//! (user, pattern), newest first in listings.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::domain::{Favorite, Pattern};
use crate::infrastructure::store::{Repository, StoreResult};

/// A favorite joined with its pattern, when the pattern still exists
#[derive(Debug, Clone)]
pub struct FavoritedPattern {
	pub favorite: Favorite,
	pub pattern: Option<Pattern>,
}

/// Favorites for one user
pub struct Favorites {
	user_id: Uuid,
	favorites: Arc<dyn Repository<Favorite>>,
	patterns: Arc<dyn Repository<Pattern>>,
}

impl Favorites {
	pub fn new(
		favorites: Arc<dyn Repository<Favorite>>,
		patterns: Arc<dyn Repository<Pattern>>,
		user_id: Uuid,
	) -> Self {
		Self {
			user_id,
			favorites,
			patterns,
		}
	}

	/// All favorites for the user, newest first, with pattern lookup
	pub async fn list(&self) -> StoreResult<Vec<FavoritedPattern>> {
		let mut rows = self.favorites.list_for_user(self.user_id).await?;
		rows.sort_by_key(|f| std::cmp::Reverse(f.created_at));

		let mut joined = Vec::with_capacity(rows.len());
		for favorite in rows {
			let pattern = self.patterns.find_by_id(favorite.pattern_id).await?;
			joined.push(FavoritedPattern { favorite, pattern });
		}
		Ok(joined)
	}

	/// Whether the user has favorited a pattern
	pub async fn contains(&self, pattern_id: Uuid) -> StoreResult<bool> {
		Ok(self.find(pattern_id).await?.is_some())
	}

	/// Favorite the pattern if it isn't, unfavorite it if it is
	///
	/// Returns the new favorited state.
	pub async fn toggle(&self, pattern_id: Uuid) -> StoreResult<bool> {
		match self.find(pattern_id).await? {
			Some(existing) => {
				self.favorites.delete(existing.id).await?;
				debug!(user_id = %self.user_id, %pattern_id, "favorite removed");
				Ok(false)
			}
			None => {
				let favorite = Favorite::new(self.user_id, pattern_id);
				self.favorites.create(&favorite).await?;
				debug!(user_id = %self.user_id, %pattern_id, "favorite added");
				Ok(true)
			}
		}
	}

	async fn find(&self, pattern_id: Uuid) -> StoreResult<Option<Favorite>> {
		let rows = self.favorites.list_for_user(self.user_id).await?;
		Ok(rows.into_iter().find(|f| f.pattern_id == pattern_id))
	}
}
