use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::{Form, Json};
use serde::Deserialize;

use super::StatusResponse;
use crate::error::Error;
use crate::server::SharedContext;
use crate::store::Task;

#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub username: String,
    pub content: String,
}

pub async fn list_tasks(
    State(context): State<SharedContext>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Task>>, Error> {
    let tasks = context
        .store
        .blocking(move |store| store.list_tasks(&username))
        .await?;

    Ok(Json(tasks))
}

pub async fn add_task(
    State(context): State<SharedContext>,
    form: Result<Form<TaskForm>, FormRejection>,
) -> Result<Json<StatusResponse>, Error> {
    let Form(form) = form.map_err(|e| Error::Validation(e.body_text()))?;

    let TaskForm { username, content } = form;
    let owner = username.clone();
    let id = context
        .store
        .blocking(move |store| store.add_task(&username, &content))
        .await?;
    log::debug!("Added task {id} for {owner}");

    Ok(Json(StatusResponse::ok("Task added")))
}

/// Deleting a task that does not exist still reports success.
pub async fn delete_task(
    State(context): State<SharedContext>,
    Path(task_id): Path<i64>,
) -> Result<Json<StatusResponse>, Error> {
    let removed = context
        .store
        .blocking(move |store| store.delete_task(task_id))
        .await?;

    if !removed {
        log::debug!("Task {task_id} not found, nothing to delete");
    }

    Ok(Json(StatusResponse::ok("Task deleted")))
}
