//! Domain models for the notebook
//!
//! Plain serde structs mirroring the backend rows. The core mutates only
//! `Project::row_count` and `QueueItem::priority`; everything else is
//! carried for the CRUD surfaces around the core.

pub mod favorite;
pub mod pattern;
pub mod profile;
pub mod project;
pub mod queue_item;
pub mod stash;

pub use favorite::Favorite;
pub use pattern::Pattern;
pub use profile::Profile;
pub use project::{Craft, Project, ProjectStatus};
pub use queue_item::QueueItem;
pub use stash::{StashYarn, YarnWeight};
