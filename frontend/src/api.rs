use shared::{CreateTaskRequest, DeleteResponse, ErrorBody, Task, UpdateTaskRequest};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// Prefix for API URLs. Empty means same origin as the page.
const API_BASE: &str = match option_env!("API_BASE") {
    Some(base) => base,
    None => "",
};

fn tasks_url() -> String {
    format!("{API_BASE}/api/tasks")
}

fn task_url(id: i64) -> String {
    format!("{API_BASE}/api/tasks/{id}")
}

/// Sends a request and returns the body text of a 2xx response. Anything
/// else becomes `failure`, with the server's error message appended when it
/// sent one.
async fn send(
    method: &str,
    url: &str,
    body: Option<String>,
    failure: &str,
) -> Result<String, String> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|_| format!("{failure}: could not build request"))?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|_| format!("{failure}: could not set header"))?;
    }

    let window = web_sys::window().ok_or_else(|| format!("{failure}: no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| format!("{failure}: network error"))?
        .into();

    let text_promise = response
        .text()
        .map_err(|_| format!("{failure}: could not read response"))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|_| format!("{failure}: could not read response"))?
        .as_string()
        .unwrap_or_default();

    if !response.ok() {
        return Err(match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => format!("{failure}: {}", body.error),
            Err(_) => format!("{failure} ({})", response.status()),
        });
    }
    Ok(text)
}

fn parse<T: serde::de::DeserializeOwned>(text: &str, failure: &str) -> Result<T, String> {
    serde_json::from_str(text).map_err(|e| format!("{failure}: invalid response ({e})"))
}

pub async fn fetch_tasks() -> Result<Vec<Task>, String> {
    const FAILURE: &str = "Failed to fetch tasks";
    let text = send("GET", &tasks_url(), None, FAILURE).await?;
    parse(&text, FAILURE)
}

pub async fn create_task(draft: CreateTaskRequest) -> Result<Task, String> {
    const FAILURE: &str = "Failed to create task";
    let body = serde_json::to_string(&draft).map_err(|e| format!("{FAILURE}: {e}"))?;
    let text = send("POST", &tasks_url(), Some(body), FAILURE).await?;
    parse(&text, FAILURE)
}

pub async fn update_task(id: i64, patch: UpdateTaskRequest) -> Result<Task, String> {
    const FAILURE: &str = "Failed to update task";
    let body = serde_json::to_string(&patch).map_err(|e| format!("{FAILURE}: {e}"))?;
    let text = send("PUT", &task_url(id), Some(body), FAILURE).await?;
    parse(&text, FAILURE)
}

pub async fn delete_task(id: i64) -> Result<(), String> {
    const FAILURE: &str = "Failed to delete task";
    let text = send("DELETE", &task_url(id), None, FAILURE).await?;
    let ack: DeleteResponse = parse(&text, FAILURE)?;
    if ack.success {
        Ok(())
    } else {
        Err(FAILURE.to_string())
    }
}
