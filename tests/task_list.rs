use std::{
    cell::Cell,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};
use tasklist::{
    error::StorageError,
    notify::{AlertQueue, Notifier},
    storage::{KeyValueStore, MemoryStore},
    task::Task,
    task_list::{TaskList, TASKS_KEY},
    transition::TransitionController,
};

/// Store whose reads or writes can be made to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: bool,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Read {
                path: PathBuf::from(key),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(StorageError::Write {
                path: PathBuf::from(key),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            });
        }
        self.inner.set(key, value)
    }
}

fn headless<S: KeyValueStore>(store: S) -> TaskList<S, AlertQueue> {
    TaskList::new(store, AlertQueue::new(), TransitionController::instant())
}

fn seeded(tasks: &[Task]) -> TaskList<MemoryStore, AlertQueue> {
    let json = serde_json::to_string(tasks).unwrap();
    let mut list = headless(MemoryStore::new().with_entry(TASKS_KEY, &json));
    list.load();
    list
}

fn snapshot<N: Notifier>(list: &TaskList<MemoryStore, N>) -> Vec<Task> {
    let data = list.store().get(TASKS_KEY).unwrap().unwrap();
    serde_json::from_str(&data).unwrap()
}

fn task(id: &str, text: &str, completed: bool) -> Task {
    Task {
        id: id.to_string(),
        text: text.to_string(),
        completed,
    }
}

#[test]
fn add_to_empty_list() {
    let mut list = headless(MemoryStore::new());
    list.load();

    let added = list.add_task("Buy milk", Instant::now()).cloned().unwrap();

    assert!(!added.id.is_empty());
    assert_eq!(added.text, "Buy milk");
    assert!(!added.completed);
    assert_eq!(list.tasks(), &[added]);
    assert_eq!(snapshot(&list), list.tasks());
}

#[test]
fn blank_text_is_ignored() {
    let mut list = seeded(&[task("1", "A", false)]);

    assert!(list.add_task("", Instant::now()).is_none());
    assert!(list.add_task("   \t", Instant::now()).is_none());
    assert_eq!(list.len(), 1);
}

#[test]
fn submit_draft_clears_only_on_success() {
    let mut list = headless(MemoryStore::new());

    list.draft_mut().push_str("   ");
    assert!(!list.submit_draft(Instant::now()));
    assert_eq!(list.draft(), "   ");

    list.draft_mut().push_str("Call mom");
    assert!(list.submit_draft(Instant::now()));
    assert_eq!(list.draft(), "");
    assert_eq!(list.tasks()[0].text, "   Call mom");
}

#[test]
fn ids_are_unique_when_adding_quickly() {
    let mut list = headless(MemoryStore::new());
    let now = Instant::now();
    for n in 0..50 {
        list.add_task(&format!("task {n}"), now);
    }
    let mut ids: Vec<&str> = list.tasks().iter().map(|t| t.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn new_ids_never_reuse_loaded_ones() {
    let far_future = "99999999999999";
    let mut list = seeded(&[task(far_future, "A", false)]);
    let added = list.add_task("B", Instant::now()).cloned().unwrap();
    assert_eq!(added.id, "100000000000000");
}

#[test]
fn largest_possible_numeric_id_does_not_block_adding() {
    let mut list = seeded(&[task("9223372036854775807", "A", false)]);

    let added = list.add_task("B", Instant::now()).cloned().unwrap();
    let again = list.add_task("C", Instant::now()).cloned().unwrap();

    assert_ne!(added.id, "9223372036854775807");
    assert_ne!(added.id, again.id);
    assert_eq!(list.len(), 3);
    assert!(list.notifier().is_empty());
}

#[test]
fn toggle_flips_exactly_one_task() {
    let mut list = seeded(&[task("1", "A", false), task("2", "B", true)]);

    assert!(list.toggle_complete("1"));
    assert_eq!(list.tasks(), &[task("1", "A", true), task("2", "B", true)]);
    assert_eq!(snapshot(&list), list.tasks());

    assert!(!list.toggle_complete("missing"));
    assert_eq!(list.tasks(), &[task("1", "A", true), task("2", "B", true)]);
}

#[test]
fn commit_edit_replaces_only_text() {
    let mut list = seeded(&[task("1", "A", true), task("2", "B", false)]);

    list.start_edit("1", "A");
    assert_eq!(list.editing().map(|e| e.buffer.as_str()), Some("A"));
    list.edit_buffer_mut().unwrap().push_str(" and more");

    assert!(list.commit_edit("1"));
    assert_eq!(list.tasks(), &[task("1", "A and more", true), task("2", "B", false)]);
    assert!(list.editing().is_none());
    assert_eq!(snapshot(&list), list.tasks());
}

#[test]
fn commit_edit_accepts_blank_text() {
    let mut list = seeded(&[task("1", "A", false)]);
    list.start_edit("1", "");
    assert!(list.commit_edit("1"));
    assert_eq!(list.tasks()[0].text, "");
}

#[test]
fn commit_edit_without_edit_mode_is_a_no_op() {
    let mut list = seeded(&[task("1", "A", false)]);
    assert!(!list.commit_edit("1"));
    assert_eq!(list.tasks()[0].text, "A");
}

#[test]
fn headless_delete_removes_immediately_and_keeps_order() {
    let mut list = seeded(&[task("1", "A", false), task("2", "B", false), task("3", "C", false)]);

    assert!(list.delete_task("2", Instant::now()));
    assert_eq!(list.tasks(), &[task("1", "A", false), task("3", "C", false)]);
    assert_eq!(snapshot(&list), list.tasks());

    assert!(!list.delete_task("2", Instant::now()));
}

#[test]
fn animated_delete_waits_for_the_fade() {
    let fade = Duration::from_millis(300);
    let json = serde_json::to_string(&[task("1", "A", false), task("2", "B", false)]).unwrap();
    let mut list = TaskList::new(
        MemoryStore::new().with_entry(TASKS_KEY, &json),
        AlertQueue::new(),
        TransitionController::new(fade),
    );
    list.load();
    let t0 = Instant::now();

    assert!(list.delete_task("1", t0));
    assert!(!list.delete_task("1", t0));
    assert!(list.is_animating());
    assert_eq!(list.tick(t0 + fade / 2), 0);
    assert_eq!(list.len(), 2);
    assert!(list.progress("1", t0 + fade / 2) < 1.0);

    assert_eq!(list.tick(t0 + fade), 1);
    assert_eq!(list.tasks(), &[task("2", "B", false)]);
    assert!(!list.is_animating());
    assert_eq!(snapshot(&list), list.tasks());
}

#[test]
fn new_tasks_fade_in() {
    let fade = Duration::from_millis(300);
    let mut list = TaskList::new(
        MemoryStore::new(),
        AlertQueue::new(),
        TransitionController::new(fade),
    );
    let t0 = Instant::now();
    let id = list.add_task("A", t0).unwrap().id.clone();

    assert_eq!(list.progress(&id, t0), 0.0);
    list.tick(t0 + fade);
    assert_eq!(list.progress(&id, t0 + fade), 1.0);
    assert_eq!(list.len(), 1);
}

#[test]
fn save_then_load_round_trips() {
    let mut list = headless(MemoryStore::new());
    let now = Instant::now();
    list.add_task("A", now);
    list.add_task("B", now);
    list.add_task("C", now);
    let b = list.tasks()[1].id.clone();
    list.toggle_complete(&b);

    let mut reloaded = headless(list.store().clone());
    reloaded.load();

    assert_eq!(reloaded.tasks(), list.tasks());
}

#[test]
fn empty_stored_value_counts_as_missing() {
    let mut list = headless(MemoryStore::new().with_entry(TASKS_KEY, ""));
    list.load();
    assert!(list.is_empty());
    assert!(list.notifier().is_empty());
}

#[test]
fn missing_snapshot_loads_empty_without_alert() {
    let mut list = headless(MemoryStore::new());
    list.load();
    assert!(list.is_empty());
    assert!(list.notifier().is_empty());
}

#[test]
fn failing_read_yields_empty_list_and_one_alert() {
    let store = FlakyStore {
        fail_reads: true,
        ..FlakyStore::default()
    };
    let mut list = headless(store);
    list.load();

    assert!(list.is_empty());
    assert_eq!(list.notifier().len(), 1);
    let alert = list.notifier().current().unwrap();
    assert_eq!(alert.title, "Error");
    assert_eq!(alert.body, "Failed to load the tasks.");
}

#[test]
fn malformed_snapshot_is_a_load_failure() {
    let mut list = headless(MemoryStore::new().with_entry(TASKS_KEY, "{not json"));
    list.load();

    assert!(list.is_empty());
    assert_eq!(
        list.notifier().iter().map(|a| a.body.as_str()).collect::<Vec<_>>(),
        vec!["Failed to load the tasks."]
    );
}

#[test]
fn failing_write_alerts_and_keeps_memory_state() {
    let store = FlakyStore {
        fail_writes: Cell::new(true),
        ..FlakyStore::default()
    };
    let mut list = headless(store);

    list.add_task("A", Instant::now());

    assert_eq!(list.len(), 1);
    assert_eq!(list.store().writes.get(), 1);
    assert_eq!(list.notifier().len(), 1);
    assert_eq!(list.notifier().current().unwrap().body, "Failed to save the tasks.");
}

#[test]
fn next_successful_save_catches_up_after_a_failed_one() {
    let mut list = headless(FlakyStore::default());
    let now = Instant::now();
    let a = list.add_task("A", now).unwrap().id.clone();

    list.store().fail_writes.set(true);
    list.add_task("B", now);
    assert_eq!(list.len(), 2);

    list.store().fail_writes.set(false);
    list.toggle_complete(&a);

    let saved: Vec<Task> =
        serde_json::from_str(&list.store().inner.get(TASKS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(saved, list.tasks());
    assert_eq!(saved.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(), ["A", "B"]);
    assert!(saved[0].completed);
    assert_eq!(list.notifier().len(), 1);
    assert_eq!(list.notifier().current().unwrap().body, "Failed to save the tasks.");
}

#[test]
fn every_mutation_saves_once() {
    let mut list = headless(FlakyStore::default());
    let now = Instant::now();

    let id = list.add_task("A", now).unwrap().id.clone();
    list.toggle_complete(&id);
    list.start_edit(&id, "A");
    list.commit_edit(&id);
    list.delete_task(&id, now);

    assert_eq!(list.store().writes.get(), 4);
    assert!(list.is_empty());
}
