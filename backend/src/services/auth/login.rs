//! Login handler: checks the password and signs a token carrying role and
//! department.

use crate::auth::{self, create_token};
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::LoginRequest;
use common::responses::LoginResponse;
use log::{info, warn};

/// Handler for `POST /api/auth/login`.
///
/// - `200 OK` with a [`LoginResponse`] on success.
/// - `400 Bad Request` when either field is blank.
/// - `401 Unauthorized` with the same message for unknown users and wrong passwords.
pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = payload.into_inner();
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    let conn = state.open_db()?;
    let user = match auth::verify_credentials(&conn, req.username.trim(), &req.password).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Failed sign-in attempt for '{}'", req.username.trim());
            return Err(e);
        }
    };

    let expires_in = state.config.auth.token_expire_secs;
    let token = create_token(&state.config.auth.jwt_secret, &user, expires_in)
        .map_err(|e| ApiError::Internal(format!("failed to create token: {}", e)))?;

    info!("User '{}' signed in as {}", user.username, user.role.as_str());
    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        role: user.role,
        department: user.department,
        expires_in,
    }))
}
