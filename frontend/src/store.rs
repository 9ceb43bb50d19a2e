//! Client-side mirror of the server's task list plus UI-only state.
//!
//! Network calls are issued by the app layer; the store only records that a
//! request started ([`TaskStore::begin_request`]) and folds the outcome back in
//! through the matching `finish_*` method. A failed call sets `error` and
//! leaves everything else as it was.

use shared::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Pending, Filter::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Pending => "Pending",
            Filter::Completed => "Completed",
        }
    }

    pub fn admits(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    filter: Filter,
    search_query: String,
}

impl TaskStore {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Marks a network call as in flight and clears the previous error.
    pub fn begin_request(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn settle<T>(&mut self, result: Result<T, String>, apply: impl FnOnce(&mut Self, T)) {
        self.loading = false;
        match result {
            Ok(value) => apply(self, value),
            Err(message) => self.error = Some(message),
        }
    }

    /// Replaces the local list with the server's.
    pub fn finish_fetch(&mut self, result: Result<Vec<Task>, String>) {
        self.settle(result, |store, tasks| store.tasks = tasks);
    }

    /// Inserts a freshly created task where the server's ordering (newest
    /// `created_at` first, then highest id) would put it.
    pub fn finish_add(&mut self, result: Result<Task, String>) {
        self.settle(result, |store, task| {
            store.tasks.retain(|t| t.id != task.id);
            let key = (task.created_at, task.id);
            let at = store
                .tasks
                .iter()
                .position(|t| (t.created_at, t.id) < key)
                .unwrap_or(store.tasks.len());
            store.tasks.insert(at, task);
        });
    }

    pub fn finish_update(&mut self, id: i64, result: Result<Task, String>) {
        self.settle(result, |store, updated| {
            if let Some(slot) = store.tasks.iter_mut().find(|t| t.id == id) {
                *slot = updated;
            }
        });
    }

    pub fn finish_delete(&mut self, id: i64, result: Result<(), String>) {
        self.settle(result, |store, ()| store.tasks.retain(|t| t.id != id));
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The list as the user should see it: filter first, then search over
    /// title and description. Recomputed on every call.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        let needle = self.search_query.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| self.filter.admits(t))
            .filter(|t| needle.is_empty() || t.matches(&needle))
            .collect()
    }

    /// Number of tasks each filter would admit, ignoring the search query.
    pub fn count(&self, filter: Filter) -> usize {
        self.tasks.iter().filter(|t| filter.admits(t)).count()
    }
}
