//! Stitchbook Core
//!
//! Backend-agnostic core for a personal knitting & crochet notebook:
//! projects with a synchronized row counter, a prioritized to-make queue,
//! a pattern library, a yarn stash, favorites, and a profile. All state is
//! scoped to one user; a record-level change feed keeps multiple open
//! clients loosely in sync with last-writer-wins semantics.

pub mod config;
pub mod domain;
pub mod identity;
pub mod infrastructure;
pub mod services;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::{Pattern, Profile, Project, QueueItem, StashYarn};
use crate::identity::Identity;
use crate::infrastructure::events::ChangeFeed;
use crate::infrastructure::store::{MemoryStore, Repository, StoreResult};
use crate::services::{Favorites, QueueBoard, RowCounter};

/// Install a console tracing subscriber, honoring `RUST_LOG` overrides
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(default_level: &str) {
	use tracing_subscriber::EnvFilter;

	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// The main context for all core operations
///
/// Owns the config, the current identity, the store handles, and the
/// change feed, and constructs the per-view components. Everything is
/// passed down explicitly; there is no ambient global client.
pub struct Core {
	/// Application configuration
	config: Arc<RwLock<AppConfig>>,

	/// The signed-in user
	identity: Identity,

	/// Backing store
	store: Arc<MemoryStore>,

	/// Change feed for record-level notifications
	pub events: Arc<ChangeFeed>,
}

impl Core {
	/// Initialize a new Core instance with the default data directory
	pub async fn new() -> Result<Self> {
		let data_dir = config::default_data_dir()?;
		Self::new_with_config(data_dir).await
	}

	/// Initialize a new Core instance with a custom data directory
	pub async fn new_with_config(data_dir: PathBuf) -> Result<Self> {
		info!("Initializing Stitchbook core at {:?}", data_dir);

		let config = AppConfig::load_or_create(&data_dir)?;
		let identity = Identity::load_or_create(&config.identity_path())?;
		let events = Arc::new(ChangeFeed::new(config.feed_capacity));

		let store = if config.persist_store {
			MemoryStore::with_snapshot(events.clone(), config.store_path()).await?
		} else {
			MemoryStore::new(events.clone())
		};

		info!(user_id = %identity.user_id, "core initialized");
		Ok(Self {
			config: Arc::new(RwLock::new(config)),
			identity,
			store: Arc::new(store),
			events,
		})
	}

	/// Get the application configuration
	pub fn config(&self) -> Arc<RwLock<AppConfig>> {
		self.config.clone()
	}

	/// The current user's opaque id
	pub fn user_id(&self) -> Uuid {
		self.identity.user_id
	}

	/// The backing store
	pub fn store(&self) -> Arc<MemoryStore> {
		self.store.clone()
	}

	/// Open a row counter for one project
	pub async fn row_counter(&self, project_id: Uuid) -> StoreResult<RowCounter> {
		RowCounter::attach(self.store.projects.clone(), &self.events, project_id).await
	}

	/// Open the current user's queue
	pub async fn queue_board(&self) -> StoreResult<QueueBoard> {
		QueueBoard::open(self.store.queue.clone(), self.user_id()).await
	}

	/// Favorites for the current user
	pub fn favorites(&self) -> Favorites {
		Favorites::new(
			self.store.favorites.clone(),
			self.store.patterns.clone(),
			self.user_id(),
		)
	}

	/// All of the current user's projects
	pub async fn projects(&self) -> StoreResult<Vec<Project>> {
		self.store.projects.list_for_user(self.user_id()).await
	}

	/// Create a project owned by the current user
	pub async fn create_project(&self, name: &str) -> StoreResult<Project> {
		let project = Project::new(self.user_id(), name);
		self.store.projects.create(&project).await
	}

	/// All of the current user's patterns
	pub async fn patterns(&self) -> StoreResult<Vec<Pattern>> {
		self.store.patterns.list_for_user(self.user_id()).await
	}

	/// All of the current user's stash yarns
	pub async fn stash(&self) -> StoreResult<Vec<StashYarn>> {
		self.store.stash.list_for_user(self.user_id()).await
	}

	/// The current user's queue rows, unsorted; views go through [`QueueBoard`]
	pub async fn queue_items(&self) -> StoreResult<Vec<QueueItem>> {
		self.store.queue.list_for_user(self.user_id()).await
	}

	/// Queue a pattern from its detail view
	///
	/// Inserted at priority 0, matching the pattern page's behavior rather
	/// than the queue view's tail append; duplicate priorities resolve by
	/// insertion time like any other collision.
	pub async fn enqueue_pattern(&self, pattern: &Pattern) -> StoreResult<QueueItem> {
		let item = QueueItem::new(
			self.user_id(),
			pattern.name.clone(),
			None,
			Some(pattern.id),
			0,
		);
		self.store.queue.create(&item).await
	}

	/// The current user's profile, created empty on first access
	pub async fn profile(&self) -> StoreResult<Profile> {
		if let Some(profile) = self.store.profiles.find_by_id(self.user_id()).await? {
			return Ok(profile);
		}
		let profile = Profile::new(self.user_id());
		self.store.profiles.create(&profile).await
	}

	/// Replace the current user's profile
	pub async fn update_profile(&self, profile: &Profile) -> StoreResult<Profile> {
		self.store.profiles.update(profile).await
	}

	/// Shutdown the core gracefully
	pub async fn shutdown(&self) -> Result<()> {
		info!("Shutting down Stitchbook core");

		self.store.save().await?;
		self.config.read().await.save()?;

		info!("Shutdown complete");
		Ok(())
	}
}
