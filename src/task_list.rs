use crate::{
    error::{SnapshotError, TaskListError},
    notify::Notifier,
    storage::KeyValueStore,
    task::{IdGenerator, Task},
    transition::TransitionController,
};
use std::time::Instant;
use tracing::{debug, error, info};

/// Storage key holding the serialized task array.
pub const TASKS_KEY: &str = "tasks";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub id: String,
    pub buffer: String,
}

/// The task collection plus everything that keeps it on screen and on disk.
///
/// Every mutation ends with a full [`save`](Self::save).
#[derive(Debug)]
pub struct TaskList<S, N> {
    tasks: Vec<Task>,
    store: S,
    notifier: N,
    ids: IdGenerator,
    transitions: TransitionController,
    draft: String,
    editing: Option<EditState>,
}

impl<S: KeyValueStore, N: Notifier> TaskList<S, N> {
    pub fn new(store: S, notifier: N, transitions: TransitionController) -> Self {
        Self {
            tasks: Vec::new(),
            store,
            notifier,
            ids: IdGenerator::new(),
            transitions,
            draft: String::new(),
            editing: None,
        }
    }

    pub fn load(&mut self) {
        match self.read_snapshot() {
            Ok(tasks) => {
                for task in &tasks {
                    self.transitions.settle(&task.id);
                }
                self.ids.observe(tasks.iter().map(|t| t.id.as_str()));
                info!(count = tasks.len(), "loaded tasks");
                self.tasks = tasks;
            }
            Err(err) => {
                self.tasks.clear();
                self.report(err);
            }
        }
    }

    fn read_snapshot(&self) -> Result<Vec<Task>, TaskListError> {
        let data = self
            .store
            .get(TASKS_KEY)
            .map_err(|err| TaskListError::LoadFailure(err.into()))?;
        match data {
            Some(data) if !data.is_empty() => serde_json::from_str(&data)
                .map_err(|err| TaskListError::LoadFailure(SnapshotError::Codec(err))),
            _ => Ok(Vec::new()),
        }
    }

    pub fn save(&mut self) {
        if let Err(err) = self.write_snapshot() {
            self.report(err);
        }
    }

    fn write_snapshot(&mut self) -> Result<(), TaskListError> {
        let data = serde_json::to_string(&self.tasks)
            .map_err(|err| TaskListError::SaveFailure(SnapshotError::Codec(err)))?;
        self.store
            .set(TASKS_KEY, &data)
            .map_err(|err| TaskListError::SaveFailure(err.into()))?;
        debug!(count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    fn report(&mut self, err: TaskListError) {
        error!(error = %err, "task storage failed");
        self.notifier.alert(err.title(), err.message());
    }

    /// Appends a task unless `text` is blank.
    pub fn add_task(&mut self, text: &str, now: Instant) -> Option<&Task> {
        if text.trim().is_empty() {
            return None;
        }
        let mut id = self.ids.next_id();
        while self.get(&id).is_some() {
            id = self.ids.next_id();
        }
        let task = Task::new(id, text);
        self.transitions.enter(&task.id, now);
        debug!(id = %task.id, "added task");
        self.tasks.push(task);
        self.save();
        self.tasks.last()
    }

    /// Adds the input line as a task and clears it on success.
    pub fn submit_draft(&mut self, now: Instant) -> bool {
        let text = std::mem::take(&mut self.draft);
        if self.add_task(&text, now).is_some() {
            true
        } else {
            self.draft = text;
            false
        }
    }

    pub fn toggle_complete(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        self.save();
        true
    }

    pub fn start_edit(&mut self, id: &str, current_text: &str) {
        self.editing = Some(EditState {
            id: id.to_string(),
            buffer: current_text.to_string(),
        });
    }

    /// Writes the edit buffer into the task and leaves edit mode.
    ///
    /// The buffer is taken as is, blank text included.
    pub fn commit_edit(&mut self, id: &str) -> bool {
        let Some(EditState { buffer, .. }) = self.editing.take() else {
            return false;
        };
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.text = buffer;
        self.save();
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Starts fading the task out; it leaves the collection once the fade ends.
    pub fn delete_task(&mut self, id: &str, now: Instant) -> bool {
        if self.get(id).is_none() || !self.transitions.exit(id, now) {
            return false;
        }
        if self.transitions.is_instant() {
            self.remove_task(id);
        }
        true
    }

    /// Drops the task right away, together with its fade state.
    pub fn remove_task(&mut self, id: &str) -> Option<Task> {
        self.transitions.discard(id);
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(index);
        debug!(id = %task.id, "removed task");
        self.save();
        Some(task)
    }

    /// Advances transitions and removes tasks whose exit has finished.
    pub fn tick(&mut self, now: Instant) -> usize {
        let exited = self.transitions.tick(now);
        exited
            .iter()
            .filter(|id| self.remove_task(id).is_some())
            .count()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        self.editing.as_mut().map(|e| &mut e.buffer)
    }

    pub fn progress(&self, id: &str, now: Instant) -> f32 {
        self.transitions.progress(id, now)
    }

    pub fn is_exiting(&self, id: &str) -> bool {
        self.transitions.is_exiting(id)
    }

    pub fn is_animating(&self) -> bool {
        self.transitions.is_animating()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
