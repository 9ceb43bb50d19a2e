use std::path::Path;

use axum::{
    extract::{rejection::JsonRejection, Path as UrlPath, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use shared::{CreateTaskRequest, DeleteResponse, Task, UpdateTaskRequest};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::db::{NewTask, TaskDb, TaskPatch};
use crate::error::{ApiError, StorageContext};

/// The full application: JSON API under `/api`, compiled frontend everywhere
/// else.
pub fn app(db: TaskDb, static_dir: &Path) -> Router {
    Router::new()
        .nest("/api", task_routes(db))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub fn task_routes(db: TaskDb) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .with_state(db)
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::validation("Invalid id"))
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::validation("Missing title"));
    }
    Ok(())
}

async fn list_tasks(State(db): State<TaskDb>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = db.list_all().await.context("Failed to get tasks")?;
    Ok(Json(tasks))
}

async fn get_task(
    UrlPath(id): UrlPath<String>,
    State(db): State<TaskDb>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    db.get_one(id)
        .await
        .context("Failed to get task")?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn create_task(
    State(db): State<TaskDb>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(payload) = payload?;
    validate_title(&payload.title)?;

    let task = db
        .create(NewTask {
            title: payload.title,
            description: payload.description,
            completed: payload.completed.unwrap_or(false),
        })
        .await
        .context("Failed to create task")?;
    tracing::info!(id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    UrlPath(id): UrlPath<String>,
    State(db): State<TaskDb>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    if let Some(title) = &payload.title {
        validate_title(title)?;
    }

    let task = db
        .update(id, TaskPatch::from(payload))
        .await
        .context("Failed to update")?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(id, completed = task.completed, "task updated");
    Ok(Json(task))
}

async fn delete_task(
    UrlPath(id): UrlPath<String>,
    State(db): State<TaskDb>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_id(&id)?;
    if !db.delete(id).await.context("Failed to delete")? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(id, "task deleted");
    Ok(Json(DeleteResponse { success: true }))
}
