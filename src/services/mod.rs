//! Stateful view-facing components
//!
//! One instance per open view: constructed on mount, detached/dropped on
//! unmount. All of them hold injected store handles rather than ambient
//! globals so they run against any repository implementation.

pub mod favorites;
pub mod queue_board;
pub mod row_counter;

pub use favorites::{FavoritedPattern, Favorites};
pub use queue_board::{MoveDirection, QueueBoard};
pub use row_counter::RowCounter;
