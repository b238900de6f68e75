use crate::{
    auth::AuthSession,
    error::AppError,
    models::{Task, TaskInput, TaskQuery},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Retrieves the authenticated user's tasks.
///
/// Only tasks owned by the caller are ever returned, ordered by id.
///
/// ## Query Parameters:
/// - `priority` (optional): Exact match on the task priority (e.g. "High"). An empty
///   value is the same as leaving it out.
///
/// ## Responses:
/// - `200 OK`: A JSON array of `Task` objects.
/// - `401 Unauthorized`: Missing or invalid bearer token.
#[get("")]
pub async fn get_tasks(
    session: AuthSession,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let AuthSession { user, mut db } = session;

    let tasks = Task::list_for_owner(&mut *db, user.id, query_params.priority_filter()).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// `{ "title": ..., "description": ..., "priority": ... }`. Any owner supplied by the
/// client is ignored; the owner is the caller.
///
/// ## Responses:
/// - `200 OK`: The created `Task`.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `422 Unprocessable Entity`: The body is malformed or fails validation.
#[post("")]
pub async fn create_task(
    session: AuthSession,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let AuthSession { user, mut db } = session;

    let task = Task::create(&mut *db, task_data.into_inner(), user.id).await?;

    log::debug!("user id={} created task id={}", user.id, task.id);
    Ok(HttpResponse::Ok().json(task))
}
