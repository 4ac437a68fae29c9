//! Queue ordering end to end
//!
//! Covers tail append, removal without renumbering, pairwise priority
//! swaps, edge no-ops, the stale-mirror collision path with a second
//! device, and enqueueing straight from a pattern page.

use stitchbook_core::domain::{Craft, Pattern, QueueItem};
use stitchbook_core::infrastructure::store::Repository;
use stitchbook_core::Core;
use tempfile::tempdir;

async fn core() -> (Core, tempfile::TempDir) {
	let dir = tempdir().unwrap();
	let core = Core::new_with_config(dir.path().to_path_buf())
		.await
		.expect("core init");
	(core, dir)
}

fn names(items: &[QueueItem]) -> Vec<&str> {
	items.iter().map(|i| i.pattern_name.as_str()).collect()
}

#[tokio::test]
async fn append_remove_and_reorder_full_session() {
	let (core, _dir) = core().await;
	let board = core.queue_board().await.unwrap();

	board.append("Hat", None, None).await.unwrap();
	board
		.append("Scarf", Some("for Dad".into()), None)
		.await
		.unwrap();
	board.append("Socks", None, None).await.unwrap();
	assert_eq!(names(&board.items().await), vec!["Hat", "Scarf", "Socks"]);

	let socks = board.items().await[2].id;
	board.move_up(socks).await.unwrap();
	assert_eq!(names(&board.items().await), vec!["Hat", "Socks", "Scarf"]);

	let hat = board.items().await[0].id;
	board.remove(hat).await.unwrap();
	assert_eq!(names(&board.items().await), vec!["Socks", "Scarf"]);

	// Removal never renumbers survivors.
	let priorities: Vec<i64> = board.items().await.iter().map(|i| i.priority).collect();
	assert_eq!(priorities, vec![0, 1]);
}

#[tokio::test]
async fn moves_at_the_edges_change_nothing() {
	let (core, _dir) = core().await;
	let board = core.queue_board().await.unwrap();

	board.append("Hat", None, None).await.unwrap();
	board.append("Scarf", None, None).await.unwrap();

	let before = board.items().await;
	board.move_up(before[0].id).await.unwrap();
	board.move_down(before[1].id).await.unwrap();

	let after = board.items().await;
	assert_eq!(names(&before), names(&after));
	let unchanged: Vec<i64> = after.iter().map(|i| i.priority).collect();
	assert_eq!(unchanged, vec![0, 1]);
}

#[tokio::test]
async fn two_devices_appending_collide_but_display_correctly() {
	let (core, _dir) = core().await;

	// Both devices load an empty queue.
	let device_a = core.queue_board().await.unwrap();
	let device_b = core.queue_board().await.unwrap();

	// Each appends with priority = 0 from its own stale view.
	device_a.append("A's hat", None, None).await.unwrap();
	device_b.append("B's cowl", None, None).await.unwrap();

	device_a.refresh().await.unwrap();
	let items = device_a.items().await;
	assert_eq!(items.len(), 2);
	assert_eq!(items[0].priority, items[1].priority);
	// Insertion order breaks the tie.
	assert_eq!(names(&items), vec!["A's hat", "B's cowl"]);
}

#[tokio::test]
async fn reordering_is_visible_to_the_other_device_after_refetch() {
	let (core, _dir) = core().await;
	let device_a = core.queue_board().await.unwrap();

	device_a.append("Hat", None, None).await.unwrap();
	device_a.append("Scarf", None, None).await.unwrap();

	let device_b = core.queue_board().await.unwrap();
	let scarf = device_b.items().await[1].id;
	device_b.move_up(scarf).await.unwrap();

	device_a.refresh().await.unwrap();
	assert_eq!(names(&device_a.items().await), vec!["Scarf", "Hat"]);
}

#[tokio::test]
async fn enqueue_from_a_pattern_lands_at_priority_zero() {
	let (core, _dir) = core().await;
	let board = core.queue_board().await.unwrap();
	board.append("Old favorite", None, None).await.unwrap();

	let pattern = Pattern::new(core.user_id(), "Lace shawl", Craft::Knitting);
	core.store().patterns.create(&pattern).await.unwrap();
	let queued = core.enqueue_pattern(&pattern).await.unwrap();

	assert_eq!(queued.priority, 0);
	assert_eq!(queued.pattern_id, Some(pattern.id));

	board.refresh().await.unwrap();
	let items = board.items().await;
	// Ties at 0 resolve by created_at, so the older entry still leads.
	assert_eq!(names(&items), vec!["Old favorite", "Lace shawl"]);
}

#[tokio::test]
async fn queue_is_isolated_per_user() {
	let (core, _dir) = core().await;
	let board = core.queue_board().await.unwrap();
	board.append("Mine", None, None).await.unwrap();

	// A row owned by someone else never shows up on this user's board.
	let stranger = QueueItem::new(uuid::Uuid::new_v4(), "Theirs", None, None, 0);
	core.store().queue.create(&stranger).await.unwrap();

	board.refresh().await.unwrap();
	assert_eq!(names(&board.items().await), vec!["Mine"]);
}
