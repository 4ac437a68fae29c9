//! Infrastructure: change feed and data-store seam

pub mod events;
pub mod store;
