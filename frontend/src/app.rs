use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{Task, UpdateTaskRequest};
use wasm_bindgen::JsValue;
use web_sys::{console, window};

use crate::api;
use crate::form::{Submission, TaskForm};
use crate::store::{Filter, TaskStore};

#[derive(Debug, Clone)]
pub enum Msg {
    // Store actions
    FetchTasks,
    TasksFetched(Result<Vec<Task>, String>),
    TaskCreated(Result<Task, String>),
    ToggleTask(i64),
    TaskUpdated(i64, Result<Task, String>),
    DeleteTask(i64),
    TaskDeleted(i64, Result<(), String>),
    SetFilter(Filter),
    SetSearchQuery(String),
    DismissError,

    // Form dialog
    OpenCreateForm,
    EditTask(i64),
    SetFormTitle(String),
    SetFormDescription(String),
    SubmitForm,
    CloseForm,
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    store: TaskStore,
    form: Option<TaskForm>,
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::FetchTasks })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::FetchTasks => {
                self.store.begin_request();
                Cmd::new(async { Msg::TasksFetched(api::fetch_tasks().await) })
            }
            Msg::TasksFetched(result) => {
                log_failure(&result);
                self.store.finish_fetch(result);
                Cmd::none()
            }
            Msg::TaskCreated(result) => {
                log_failure(&result);
                self.store.finish_add(result);
                Cmd::none()
            }
            Msg::ToggleTask(id) => {
                let Some(task) = self.store.find(id) else {
                    return Cmd::none();
                };
                let patch = UpdateTaskRequest::completed(!task.completed);
                self.store.begin_request();
                Cmd::new(async move { Msg::TaskUpdated(id, api::update_task(id, patch).await) })
            }
            Msg::TaskUpdated(id, result) => {
                log_failure(&result);
                self.store.finish_update(id, result);
                Cmd::none()
            }
            Msg::DeleteTask(id) => {
                let confirmed = window()
                    .and_then(|w| {
                        w.confirm_with_message("Are you sure you want to delete this task?")
                            .ok()
                    })
                    .unwrap_or(false);
                if !confirmed {
                    return Cmd::none();
                }
                self.store.begin_request();
                Cmd::new(async move { Msg::TaskDeleted(id, api::delete_task(id).await) })
            }
            Msg::TaskDeleted(id, result) => {
                log_failure(&result);
                self.store.finish_delete(id, result);
                Cmd::none()
            }
            Msg::SetFilter(filter) => {
                self.store.set_filter(filter);
                Cmd::none()
            }
            Msg::SetSearchQuery(query) => {
                self.store.set_search_query(query);
                Cmd::none()
            }
            Msg::DismissError => {
                self.store.clear_error();
                Cmd::none()
            }
            Msg::OpenCreateForm => {
                self.form = Some(TaskForm::create());
                Cmd::none()
            }
            Msg::EditTask(id) => {
                self.form = self.store.find(id).map(TaskForm::edit);
                Cmd::none()
            }
            Msg::SetFormTitle(new_title) => {
                if let Some(form) = &mut self.form {
                    form.title = new_title;
                }
                Cmd::none()
            }
            Msg::SetFormDescription(description) => {
                if let Some(form) = &mut self.form {
                    form.description = description;
                }
                Cmd::none()
            }
            Msg::SubmitForm => {
                let Some(submission) = self.form.as_mut().and_then(TaskForm::submit) else {
                    return Cmd::none();
                };
                // close right away so a double click can't submit twice
                self.form = None;
                self.store.begin_request();
                match submission {
                    Submission::Create(draft) => {
                        Cmd::new(async move { Msg::TaskCreated(api::create_task(draft).await) })
                    }
                    Submission::Update(id, patch) => Cmd::new(async move {
                        Msg::TaskUpdated(id, api::update_task(id, patch).await)
                    }),
                }
            }
            Msg::CloseForm => {
                self.form = None;
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text")],
            [
                div(
                    [class("max-w-4xl mx-auto px-6 py-8")],
                    [
                        self.view_header(),
                        self.view_controls(),
                        self.view_error(),
                        self.view_body(),
                    ],
                ),
                match &self.form {
                    Some(form) => view_form(form),
                    None => span([], []),
                },
            ],
        )
    }
}

fn log_failure<T>(result: &Result<T, String>) {
    if let Err(e) = result {
        console::error_1(&JsValue::from_str(e));
    }
}

impl Model {
    fn view_header(&self) -> Node<Msg> {
        div([class("flex items-center justify-between mb-6")], [
            h1([class("text-3xl font-bold text-ctp-text")], [text("My Tasks")]),
            button([
                on_click(|_| Msg::OpenCreateForm),
                class("bg-ctp-green hover:bg-ctp-teal text-ctp-base font-medium px-4 py-2 rounded-md transition-colors duration-200"),
            ], [text("New Task")]),
        ])
    }

    fn view_controls(&self) -> Node<Msg> {
        div([class("mb-6 space-y-4")], [
            input([
                r#type("text"),
                placeholder("Search tasks..."),
                value(self.store.search_query().to_string()),
                on_input(|event| Msg::SetSearchQuery(event.value())),
                class("w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
            ], []),
            div(
                [class("flex gap-2")],
                Filter::ALL.into_iter().map(|f| self.filter_button(f)).collect::<Vec<_>>(),
            ),
        ])
    }

    fn filter_button(&self, filter: Filter) -> Node<Msg> {
        let active = self.store.filter() == filter;
        button([
            on_click(move |_| Msg::SetFilter(filter)),
            class(&format!(
                "flex-1 px-3 py-2 rounded-md text-sm font-medium transition-colors duration-200 {}",
                if active {
                    "bg-ctp-blue text-ctp-base"
                } else {
                    "bg-ctp-surface0 text-ctp-subtext0 hover:text-ctp-text hover:bg-ctp-surface1"
                }
            )),
        ], [text(&format!("{} ({})", filter.label(), self.store.count(filter)))])
    }

    fn view_error(&self) -> Node<Msg> {
        match self.store.error() {
            Some(message) => div([class("mb-4 flex items-center justify-between rounded-md border border-ctp-red bg-ctp-red/10 px-4 py-3 text-ctp-red")], [
                span([], [text(message)]),
                button([
                    on_click(|_| Msg::DismissError),
                    class("text-sm font-medium hover:underline"),
                ], [text("Dismiss")]),
            ]),
            None => span([], []),
        }
    }

    fn view_body(&self) -> Node<Msg> {
        if self.store.loading() {
            return div([class("text-center py-10 text-ctp-subtext0 italic")], [text("Loading...")]);
        }

        let tasks = self.store.filtered_tasks();
        if tasks.is_empty() {
            return div([class("text-center py-12 text-ctp-subtext0")], [
                p([class("text-lg")], [text("No tasks found")]),
                p([class("text-sm")], [text("Create your first task to get started!")]),
            ]);
        }

        div(
            [class("space-y-3")],
            tasks.into_iter().map(view_task).collect::<Vec<_>>(),
        )
    }
}

fn view_task(task: &Task) -> Node<Msg> {
    let task_id = task.id;
    let muted = if task.completed { "line-through text-ctp-overlay1" } else { "text-ctp-text" };

    div([
        key(task.id.to_string()),
        class(&format!(
            "group border rounded-xl p-5 bg-ctp-surface0 shadow-sm transition-all duration-300 hover:shadow-lg {}",
            if task.completed { "border-ctp-green bg-ctp-green/10" } else { "border-ctp-surface1 hover:border-ctp-blue" }
        )),
    ], [
        div([class("flex items-start gap-4")], [
            input([
                r#type("checkbox"),
                id(&format!("checkbox-{}", task.id)),
                checked(task.completed),
                on_click(move |_| Msg::ToggleTask(task_id)),
                class("mt-1 h-5 w-5 cursor-pointer"),
            ], []),
            div([class("flex-1 min-w-0")], [
                h3([class(&format!("text-lg font-semibold {}", muted))], [text(&task.title)]),
                match &task.description {
                    Some(description) => p([class(&format!("text-sm mt-1 break-words {}", muted))], [text(description)]),
                    None => span([], []),
                },
                p([class("text-xs text-ctp-subtext0 mt-2")], [text(&task.created_at.format("%Y-%m-%d").to_string())]),
            ]),
            div([class("flex gap-2")], [
                button([
                    on_click(move |_| Msg::EditTask(task_id)),
                    class("inline-flex items-center justify-center w-8 h-8 rounded-lg bg-ctp-blue/20 text-ctp-blue hover:bg-ctp-blue/30 transition-colors duration-200"),
                    r#type("button"),
                ], [text("✏️")]),
                button([
                    on_click(move |_| Msg::DeleteTask(task_id)),
                    class("inline-flex items-center justify-center w-8 h-8 rounded-lg bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30 transition-colors duration-200"),
                    r#type("button"),
                ], [text("🗑️")]),
            ]),
        ]),
    ])
}

fn view_form(form: &TaskForm) -> Node<Msg> {
    let field_class = |invalid: bool| {
        format!(
            "w-full px-3 py-2 bg-ctp-surface0 border rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue {}",
            if invalid { "border-ctp-red" } else { "border-ctp-surface2" }
        )
    };
    let field_error = |message: Option<&'static str>| -> Node<Msg> {
        match message {
            Some(message) => p([class("text-sm text-ctp-red")], [text(message)]),
            None => span([], []),
        }
    };

    div([class("fixed inset-0 z-50 flex items-center justify-center bg-black/50")], [
        div([class("w-full max-w-lg rounded-lg bg-ctp-mantle p-6 shadow-xl border border-ctp-surface1")], [
            h2([class("text-xl font-semibold text-ctp-text mb-4 pb-2 border-b border-ctp-surface2")], [
                text(if form.is_editing() { "Edit Task" } else { "New Task" }),
            ]),
            div([class("space-y-4")], [
                div([class("flex flex-col gap-2")], [
                    label([class("font-semibold")], [text("Title *")]),
                    input([
                        r#type("text"),
                        placeholder("Enter task title"),
                        value(&form.title),
                        on_input(|event| Msg::SetFormTitle(event.value())),
                        class(&field_class(form.errors.title.is_some())),
                    ], []),
                    field_error(form.errors.title),
                ]),
                div([class("flex flex-col gap-2")], [
                    label([class("font-semibold")], [text("Description")]),
                    textarea([
                        placeholder("Enter task description (optional)"),
                        value(&form.description),
                        on_input(|event| Msg::SetFormDescription(event.value())),
                        class(&format!("{} h-24 resize-y", field_class(form.errors.description.is_some()))),
                    ], []),
                    field_error(form.errors.description),
                ]),
                div([class("flex justify-end gap-2 pt-4")], [
                    button([
                        on_click(|_| Msg::CloseForm),
                        class("bg-ctp-overlay0 hover:bg-ctp-overlay1 text-ctp-text font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                        r#type("button"),
                    ], [text("Cancel")]),
                    button([
                        on_click(|_| Msg::SubmitForm),
                        class("bg-ctp-green hover:bg-ctp-teal text-ctp-base font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                        r#type("button"),
                    ], [text(if form.is_editing() { "Update" } else { "Create" })]),
                ]),
            ]),
        ]),
    ])
}
