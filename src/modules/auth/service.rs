use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::utils::jwt::create_access_token;
use crate::modules::profiles::model::{ProfileInfo, Role};
use rollcall_core::errors::AppError;
use rollcall_core::password::{hash_password, verify_password};

use super::model::{AuthResponse, LoginRequest, RegisterRequest};

pub struct AuthService;

impl AuthService {
    /// Creates the account and its profile in a single transaction, so a
    /// failure on either side leaves no orphan row. Profile creation is an
    /// explicit step of registration, not a side effect.
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = $1 OR email = $2")
                .bind(&dto.username)
                .bind(&dto.email)
                .fetch_optional(db)
                .await?;

        if existing.is_some() {
            return Err(AppError::conflict("Username or email already taken"));
        }

        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        let (user_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO users (username, email, password)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&hashed_password)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::conflict("Username or email already taken")
            }
            _ => AppError::from(e),
        })?;

        let (profile_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO profiles (user_id, role)
             VALUES ($1, $2)
             RETURNING id",
        )
        .bind(user_id)
        .bind(dto.role)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let access_token = create_access_token(user_id, &dto.username, dto.role, jwt_config)?;

        Ok(AuthResponse {
            access_token,
            profile: ProfileInfo {
                id: profile_id,
                username: dto.username,
                role: dto.role,
                bio: String::new(),
                image_path: None,
            },
        })
    }

    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct AccountRow {
            user_id: Uuid,
            username: String,
            password: String,
            profile_id: Uuid,
            role: Role,
            bio: String,
            image_path: Option<String>,
        }

        let account = sqlx::query_as::<_, AccountRow>(
            "SELECT u.id AS user_id, u.username, u.password,
                    p.id AS profile_id, p.role, p.bio, p.image_path
             FROM users u
             JOIN profiles p ON p.user_id = u.id
             WHERE u.username = $1",
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        let is_valid = verify_password(&dto.password, &account.password)?;

        if !is_valid {
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        let access_token =
            create_access_token(account.user_id, &account.username, account.role, jwt_config)?;

        Ok(AuthResponse {
            access_token,
            profile: ProfileInfo {
                id: account.profile_id,
                username: account.username,
                role: account.role,
                bio: account.bio,
                image_path: account.image_path,
            },
        })
    }
}
