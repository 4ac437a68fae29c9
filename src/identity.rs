//! Current-user identity
//!
//! The authentication provider is external; the core only needs an opaque
//! user id to scope reads and writes. The identity is persisted in the data
//! directory and created on first run. Nothing in the core mutates it.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// The signed-in user, as far as the core is concerned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
	/// Opaque user id, immutable
	pub user_id: Uuid,

	/// Handle shown in logs, not used for scoping
	pub username: Option<String>,
}

impl Identity {
	/// Load the identity file, creating a fresh one if absent
	pub fn load_or_create(path: &Path) -> Result<Self> {
		if path.exists() {
			let json = fs::read_to_string(path)?;
			let identity: Identity = serde_json::from_str(&json)?;
			info!(user_id = %identity.user_id, "loaded identity");
			Ok(identity)
		} else {
			let identity = Identity {
				user_id: Uuid::new_v4(),
				username: None,
			};
			if let Some(parent) = path.parent() {
				fs::create_dir_all(parent)?;
			}
			fs::write(path, serde_json::to_string_pretty(&identity)?)?;
			info!(user_id = %identity.user_id, "created new identity");
			Ok(identity)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identity_is_stable_across_loads() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("identity.json");

		let first = Identity::load_or_create(&path).unwrap();
		let second = Identity::load_or_create(&path).unwrap();
		assert_eq!(first.user_id, second.user_id);
	}
}
