//! Course management routes (Admin only)

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAdmin;
use super::types::{AppJson, AppPath, CourseCreatedResponse, CourseRequest, CourseResponse};

/// POST /admin/add_course
async fn add_course(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(request): AppJson<CourseRequest>,
) -> Result<(StatusCode, Json<CourseCreatedResponse>), ApiError> {
    let new_course = request.validate()?;

    debug!("Creating course: {}", new_course.title);

    let course = state.db.insert_course(new_course).await?;

    info!("Admin {} created course {} ({})", admin.subject, course.id, course.title);

    Ok((
        StatusCode::CREATED,
        Json(CourseCreatedResponse {
            message: "Course added successfully".to_string(),
            id: course.id,
        }),
    ))
}

/// GET /admin/view_courses
async fn view_courses(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = state.db.list_courses().await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// PUT /admin/update_course/{course_id}
async fn update_course(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(course_id): AppPath<i64>,
    AppJson(request): AppJson<CourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    let replacement = request.validate()?;

    debug!("Updating course: {}", course_id);

    let course = state
        .db
        .update_course(course_id, replacement)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Course not found: {}", course_id)))?;

    info!("Admin {} updated course {}", admin.subject, course.id);

    Ok(Json(CourseResponse::from(course)))
}

/// DELETE /admin/delete_course/{course_id}
async fn delete_course(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(course_id): AppPath<i64>,
) -> Result<StatusCode, ApiError> {
    debug!("Deleting course: {}", course_id);

    let deleted = state.db.delete_course(course_id).await?;

    if deleted {
        info!("Admin {} deleted course {}", admin.subject, course_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Course not found: {}", course_id)))
    }
}

/// Create admin routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/add_course", post(add_course))
        .route("/admin/view_courses", get(view_courses))
        .route("/admin/update_course/{course_id}", put(update_course))
        .route("/admin/delete_course/{course_id}", delete(delete_course))
}
