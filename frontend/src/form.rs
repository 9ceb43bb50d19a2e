//! State of the create/edit dialog.

use shared::{CreateTaskRequest, Task, UpdateTaskRequest, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// What a valid form turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(CreateTaskRequest),
    Update(i64, UpdateTaskRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub mode: FormMode,
    pub title: String,
    pub description: String,
    pub errors: FormErrors,
}

impl TaskForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            errors: FormErrors::default(),
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            mode: FormMode::Edit(task.id),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            errors: FormErrors::default(),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn validate(&self) -> FormErrors {
        let title = if self.title.trim().is_empty() {
            Some("Title is required")
        } else if self.title.chars().count() > MAX_TITLE_LEN {
            Some("Title is too long")
        } else {
            None
        };
        let description = (self.description.chars().count() > MAX_DESCRIPTION_LEN)
            .then_some("Description is too long");
        FormErrors { title, description }
    }

    /// Validates and, if everything passes, builds the request to send.
    /// On failure the errors are kept on the form for display.
    pub fn submit(&mut self) -> Option<Submission> {
        self.errors = self.validate();
        if !self.errors.is_empty() {
            return None;
        }

        let title = self.title.trim().to_string();
        let submission = match self.mode {
            FormMode::Create => Submission::Create(CreateTaskRequest {
                title,
                description: Some(self.description.clone()).filter(|d| !d.is_empty()),
                completed: None,
            }),
            // an empty description is sent so the server clears it
            FormMode::Edit(id) => Submission::Update(
                id,
                UpdateTaskRequest {
                    title: Some(title),
                    description: Some(self.description.clone()),
                    completed: None,
                },
            ),
        };
        Some(submission)
    }
}
