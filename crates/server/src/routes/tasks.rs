//! Farm task list and dashboard.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sheti_core::task::sort_for_display;
use sheti_core::{Task, TaskSummary};
use tracing::instrument;

use crate::db::TaskRepository;
use crate::error::Result;
use crate::middleware::RequireUser;
use crate::state::AppState;

/// A task as the list shows it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub is_overdue: bool,
}

impl TaskView {
    fn new(task: Task, today: NaiveDate) -> Self {
        let is_overdue = task.is_overdue(today);
        Self { task, is_overdue }
    }
}

/// New task form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub text: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

async fn sorted_tasks(state: &AppState, owner: &str) -> Result<Vec<Task>> {
    let mut tasks = TaskRepository::new(state.pool()).list_for_user(owner).await?;
    sort_for_display(&mut tasks);
    Ok(tasks)
}

/// The user's tasks: incomplete first, then by due date.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<TaskView>>> {
    let today = state.today();
    let tasks = sorted_tasks(&state, user.owner_key()).await?;
    Ok(Json(
        tasks
            .into_iter()
            .map(|task| TaskView::new(task, today))
            .collect(),
    ))
}

/// Add a task.
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(form): Json<NewTask>,
) -> Result<(StatusCode, Json<TaskView>)> {
    let task = Task::new(&form.text, form.due_date, user.owner_key(), Utc::now())?;
    TaskRepository::new(state.pool()).insert(&task).await?;
    tracing::info!(task_id = %task.id, "Task added");

    Ok((StatusCode::CREATED, Json(TaskView::new(task, state.today()))))
}

/// Flip a task between pending and done.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<TaskView>> {
    let task = TaskRepository::new(state.pool())
        .toggle(&id, user.owner_key())
        .await?;
    Ok(Json(TaskView::new(task, state.today())))
}

/// Delete a task.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    TaskRepository::new(state.pool())
        .delete(&id, user.owner_key())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Dashboard widget data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub greeting_name: String,
    #[serde(flatten)]
    pub tasks: TaskSummary,
}

/// Pending task count and the next tasks due.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Dashboard>> {
    let tasks = sorted_tasks(&state, user.owner_key()).await?;
    Ok(Json(Dashboard {
        greeting_name: user.name,
        tasks: TaskSummary::from_tasks(&tasks),
    }))
}
