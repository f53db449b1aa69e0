//! Staff authentication: bcrypt password check and HS256 bearer tokens.

use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use common::model::user::Role;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::sync::LazyLock;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub department: Option<String>,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, Clone)]
pub struct StoredUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub department: Option<String>,
}

pub fn create_token(
    secret: &str,
    user: &StoredUser,
    expire_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    let claims = Claims {
        sub: user.username.clone(),
        role: user.role,
        department: user.department.clone(),
        iat: now,
        exp: now + expire_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn validate_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// The signed-in caller, extracted from `Authorization: Bearer <token>`.
///
/// Handlers taking an `AuthUser` argument are never entered without a valid token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.0.sub
    }

    /// Department the caller is restricted to; `None` means every department.
    pub fn department_scope(&self) -> Option<&str> {
        match self.0.role {
            Role::Operator => None,
            Role::Hod => Some(self.0.department.as_deref().unwrap_or_default()),
        }
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state missing".to_string()))?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("invalid authorization header".to_string()))?;

    validate_token(&state.config.auth.jwt_secret, token)
        .map(AuthUser)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => ApiError::Unauthorized("token expired".to_string()),
            _ => ApiError::Unauthorized("invalid token".to_string()),
        })
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

pub fn find_user(conn: &Connection, username: &str) -> Result<Option<StoredUser>, ApiError> {
    let row = conn
        .query_row(
            "SELECT username, password_hash, role, department FROM users WHERE username = ?1",
            params![username],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((username, password_hash, role, department)) = row else {
        return Ok(None);
    };
    let role = Role::parse(&role)
        .ok_or_else(|| ApiError::Internal(format!("user {} has unknown role '{}'", username, role)))?;
    Ok(Some(StoredUser {
        username,
        password_hash,
        role,
        department,
    }))
}

/// Hash checked when the username does not exist, so both failures cost the same.
///
/// Only dereference on a blocking thread, or call [`warm_dummy_hash`] at startup.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| bcrypt::hash("not-a-real-password", bcrypt::DEFAULT_COST).ok());

/// Computes [`DUMMY_HASH`] ahead of the first login attempt.
pub fn warm_dummy_hash() {
    LazyLock::force(&DUMMY_HASH);
}

/// Checks a username/password pair.
///
/// Unknown user and wrong password are indistinguishable to the caller.
pub async fn verify_credentials(
    conn: &Connection,
    username: &str,
    password: &str,
) -> Result<StoredUser, ApiError> {
    let user = find_user(conn, username)?;
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let password = password.to_string();
    let matches = tokio::task::spawn_blocking(move || {
        let hash = match &stored_hash {
            Some(hash) => hash.as_str(),
            None => DUMMY_HASH.as_deref().unwrap_or_default(),
        };
        bcrypt::verify(password, hash).unwrap_or(false)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("password check failed: {}", e)))?;

    match user {
        Some(u) if matches => Ok(u),
        _ => Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())),
    }
}

pub fn create_user(
    conn: &Connection,
    username: &str,
    password: &str,
    role: Role,
    department: Option<&str>,
    cost: u32,
) -> Result<(), ApiError> {
    let hash = bcrypt::hash(password, cost)
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {}", e)))?;
    conn.execute(
        "INSERT INTO users (username, password_hash, role, department) VALUES (?1, ?2, ?3, ?4)",
        params![username, hash, role.as_str(), department],
    )?;
    Ok(())
}

/// Creates the configured default account when no user exists yet.
pub fn seed_default_user(conn: &Connection, config: &AuthConfig) -> Result<bool, ApiError> {
    let department = config
        .default_department
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    if config.default_role == Role::Hod && department.is_none() {
        return Err(ApiError::Internal(
            "auth.default_department is required when auth.default_role is hod".to_string(),
        ));
    }

    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(false);
    }
    create_user(
        conn,
        &config.default_username,
        &config.default_password,
        config.default_role,
        department,
        bcrypt::DEFAULT_COST,
    )?;
    info!(
        "Seeded default {} account '{}'",
        config.default_role.as_str(),
        config.default_username
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, department: Option<&str>) -> StoredUser {
        StoredUser {
            username: "hod.cse".to_string(),
            password_hash: String::new(),
            role,
            department: department.map(str::to_string),
        }
    }

    #[test]
    fn token_round_trips_claims() {
        let token = create_token("secret", &user(Role::Hod, Some("CSE")), 60).unwrap();
        let claims = validate_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "hod.cse");
        assert_eq!(claims.role, Role::Hod);
        assert_eq!(claims.department.as_deref(), Some("CSE"));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = create_token("secret", &user(Role::Operator, None), 60).unwrap();
        assert!(validate_token("other", &token).is_err());
    }

    #[test]
    fn scope_follows_role() {
        let hod = AuthUser(Claims {
            sub: "h".to_string(),
            role: Role::Hod,
            department: Some("ECE".to_string()),
            iat: 0,
            exp: 0,
        });
        assert_eq!(hod.department_scope(), Some("ECE"));

        let op = AuthUser(Claims {
            role: Role::Operator,
            ..hod.0.clone()
        });
        assert_eq!(op.department_scope(), None);
    }

    #[actix_web::test]
    async fn unknown_user_and_bad_password_look_the_same() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::create_schema(&conn).unwrap();
        create_user(&conn, "op", "right", Role::Operator, None, 4).unwrap();

        let unknown = verify_credentials(&conn, "nobody", "right").await.unwrap_err();
        let wrong = verify_credentials(&conn, "op", "wrong").await.unwrap_err();
        assert_eq!(unknown.to_string(), INVALID_CREDENTIALS);
        assert_eq!(wrong.to_string(), INVALID_CREDENTIALS);

        let ok = verify_credentials(&conn, "op", "right").await.unwrap();
        assert_eq!(ok.role, Role::Operator);
    }

    #[test]
    fn dummy_hash_is_a_real_bcrypt_hash() {
        warm_dummy_hash();
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(!bcrypt::verify("anything", hash).unwrap());
    }

    #[test]
    fn seeding_happens_once() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::create_schema(&conn).unwrap();
        let config = AuthConfig {
            default_password: "pw".to_string(),
            ..AuthConfig::default()
        };
        assert!(seed_default_user(&conn, &config).unwrap());
        assert!(!seed_default_user(&conn, &config).unwrap());
        let seeded = find_user(&conn, &config.default_username).unwrap().unwrap();
        assert_eq!(seeded.role, Role::Operator);
    }

    #[test]
    fn seeds_a_department_head_from_config() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::create_schema(&conn).unwrap();
        let config = AuthConfig {
            default_username: "hod.mech".to_string(),
            default_password: "pw".to_string(),
            default_role: Role::Hod,
            default_department: Some("MECH".to_string()),
            ..AuthConfig::default()
        };
        assert!(seed_default_user(&conn, &config).unwrap());
        let seeded = find_user(&conn, "hod.mech").unwrap().unwrap();
        assert_eq!(seeded.role, Role::Hod);
        assert_eq!(seeded.department.as_deref(), Some("MECH"));
    }

    #[test]
    fn department_head_seed_needs_a_department() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::create_schema(&conn).unwrap();
        let config = AuthConfig {
            default_role: Role::Hod,
            default_department: Some("  ".to_string()),
            ..AuthConfig::default()
        };
        assert!(seed_default_user(&conn, &config).is_err());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
