use std::fmt;

use tracing::debug;

/// Identifier of a to-do item, unique for the lifetime of its store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(u64);

impl TodoId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "todo-{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

/// Ordered list of to-do items. Items are appended, toggled, never removed.
#[derive(Debug)]
pub struct TodoStore {
    items: Vec<TodoItem>,
    next_id: u64,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Appends a new open item. Blank text is ignored and yields `None`.
    pub fn add(&mut self, text: &str) -> Option<TodoId> {
        if text.trim().is_empty() {
            debug!("ignoring blank to-do");
            return None;
        }

        let id = TodoId(self.next_id);
        self.next_id += 1;
        self.items.push(TodoItem {
            id,
            text: text.to_string(),
            completed: false,
        });
        debug!(%id, "added to-do");

        Some(id)
    }

    /// Flips the completion flag of `id` and returns the new value,
    /// or `None` when no such item exists.
    pub fn toggle(&mut self, id: TodoId) -> Option<bool> {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.completed = !item.completed;
                debug!(%id, completed = item.completed, "toggled to-do");
                Some(item.completed)
            }
            None => {
                debug!(%id, "toggle of unknown to-do ignored");
                None
            }
        }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }
}
