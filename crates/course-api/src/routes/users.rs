//! Account and user-facing course routes

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use course_auth::{AuthError, Identity};
use course_db::NewUser;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::{
    AppJson, AppPath, CourseResponse, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest,
};

// ==================== Account Routes ====================

/// POST /user/register
async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let role = request.validate()?;

    debug!("Registering user: {}", request.email);

    let password_hash = state.hasher.hash(&request.password)?;

    let user = state
        .db
        .insert_user(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            role,
        })
        .await?;

    info!("Registered user {} with role {}", user.email, user.role);

    Ok(Json(MessageResponse::new("User registered successfully")))
}

/// POST /user/login
async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    debug!("Login attempt for user: {}", request.email);

    let user = state.db.get_user_by_email(&request.email).await?;

    // Unknown emails still pay for one verification
    let digest = user
        .as_ref()
        .map(|u| u.password_hash.as_str())
        .unwrap_or_else(|| state.hasher.dummy_digest());
    let password_valid = state.hasher.verify(&request.password, digest)?;

    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => {
            metrics::counter!("course_registry_logins_total", "outcome" => "rejected").increment(1);
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let identity = Identity::new(user.email, user.role);
    let access_token = state.tokens.encode(&identity, None)?;

    metrics::counter!("course_registry_logins_total", "outcome" => "accepted").increment(1);
    info!("User {} logged in successfully", identity.subject);

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.tokens.default_ttl().num_seconds(),
    }))
}

// ==================== Catalog Routes ====================

/// GET /user/view_courses
async fn view_courses(
    _caller: RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = state.db.list_courses().await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// POST /user/register_course/{course_id}
///
/// Confirms the course exists. Seats are not reserved and nothing is
/// recorded against the caller.
async fn register_course(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    AppPath(course_id): AppPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let course = state
        .db
        .get_course(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Course not found: {}", course_id)))?;

    info!("User {} registered for course {}", caller.subject, course.id);

    Ok(Json(MessageResponse::new("Course registered successfully")))
}

/// DELETE /user/cancel_registration/{course_id}
async fn cancel_registration(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    AppPath(course_id): AppPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let course = state
        .db
        .get_course(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Course not found: {}", course_id)))?;

    info!("User {} canceled registration for course {}", caller.subject, course.id);

    Ok(Json(MessageResponse::new(
        "Course registration canceled successfully",
    )))
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/view_courses", get(view_courses))
        .route("/user/register_course/{course_id}", post(register_course))
        .route("/user/cancel_registration/{course_id}", delete(cancel_registration))
}
