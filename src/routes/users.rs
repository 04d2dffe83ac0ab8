use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password;
use crate::entities::{cart, customer, location, user};
use crate::error::AppError;
use crate::services::{CustomerAttributes, NewUser, UserService};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the user route group: `/users/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/users/{id}/restore", post(restore_user))
        .route("/users/{id}/verify-email", post(verify_email))
        .route("/users/{id}/cart", get(get_active_cart))
        .route("/users/{id}/customer", post(promote_to_customer))
        .route("/users/{id}/customers", get(list_customers))
        .route("/users/{id}/roles", get(list_roles))
        .route("/users/{id}/locations", get(list_locations))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    first_name: String,
    last_name: String,
    email: String,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    id: Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    full_name: String,
    email_verified: bool,
    email_verified_at: Option<String>,
    created_at: String,
    updated_at: String,
    deleted_at: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            full_name: u.full_name(),
            email_verified: u.has_verified_email(),
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            email_verified_at: u.email_verified_at.map(|t| t.to_rfc3339()),
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
            deleted_at: u.deleted_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartResponse {
    id: Uuid,
    user_id: Uuid,
    active: bool,
    created_at: String,
}

impl From<cart::Model> for CartResponse {
    fn from(c: cart::Model) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            active: c.active,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromoteToCustomerRequest {
    location_id: Option<Uuid>,
    phone: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerResponse {
    id: Uuid,
    user_id: Uuid,
    location_id: Option<Uuid>,
    phone: Option<String>,
    created_at: String,
}

impl From<customer::Model> for CustomerResponse {
    fn from(c: customer::Model) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            location_id: c.location_id,
            phone: c.phone,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationResponse {
    id: Uuid,
    name: String,
    manager_id: Option<Uuid>,
}

impl From<location::Model> for LocationResponse {
    fn from(l: location::Model) -> Self {
        Self {
            id: l.id,
            name: l.name,
            manager_id: l.manager_id,
        }
    }
}

#[derive(Serialize)]
struct RolesResponse {
    roles: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/users`
async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    password::validate_email(&body.email).map_err(AppError::BadRequest)?;

    let first_name = body.first_name.trim();
    let last_name = body.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::BadRequest(
            "First and last name are required.".to_string(),
        ));
    }

    if let Some(ref username) = body.username {
        password::validate_username(username.trim()).map_err(AppError::BadRequest)?;
    }
    if let Some(ref plain) = body.password {
        password::validate_password(plain).map_err(AppError::BadRequest)?;
    }

    let new_user = NewUser {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: body.email,
        username: body.username,
        password: body.password,
    };

    let created =
        UserService::create_user(&state.db, new_user, state.config.username_timezone).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// `GET /api/v1/users/{id}`
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user_model = UserService::find_user(&state.db, id).await?;
    Ok(Json(user_model.into()))
}

/// `DELETE /api/v1/users/{id}`
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    UserService::soft_delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/users/{id}/restore`
async fn restore_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user_model = UserService::restore_user(&state.db, id).await?;
    Ok(Json(user_model.into()))
}

/// `POST /api/v1/users/{id}/verify-email`
async fn verify_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user_model = UserService::mark_email_as_verified(&state.db, id).await?;
    Ok(Json(user_model.into()))
}

/// `GET /api/v1/users/{id}/cart`
async fn get_active_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CartResponse>, AppError> {
    let active = UserService::get_or_create_active_cart(&state.db, id).await?;
    Ok(Json(active.into()))
}

/// `POST /api/v1/users/{id}/customer`
async fn promote_to_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PromoteToCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    let attributes = CustomerAttributes {
        location_id: body.location_id,
        phone: body.phone,
    };

    let created = UserService::promote_to_customer(&state.db, id, attributes).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// `GET /api/v1/users/{id}/customers`
async fn list_customers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let user_model = UserService::find_user(&state.db, id).await?;
    let customers = user_model.customers(&state.db).await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// `GET /api/v1/users/{id}/roles`
async fn list_roles(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RolesResponse>, AppError> {
    let roles = UserService::role_names(&state.db, id).await?;
    Ok(Json(RolesResponse { roles }))
}

/// `GET /api/v1/users/{id}/locations`
async fn list_locations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<LocationResponse>>, AppError> {
    let user_model = UserService::find_user(&state.db, id).await?;
    let locations = user_model.locations(&state.db).await?;
    Ok(Json(locations.into_iter().map(Into::into).collect()))
}
