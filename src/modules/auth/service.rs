use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, create_refresh_token, verify_refresh_token};
use crate::utils::password::{hash_password, verify_password};

use super::model::{
    LoginRequest, LoginResponse, RefreshRequest, RegisterRequestDto, Role, TokenPairResponse, User,
};

pub struct AuthService;

impl AuthService {
    /// Registers a new account with the EMPLOYEE role. Elevated roles are
    /// only ever assigned out of band, never through this endpoint.
    #[instrument(skip(db, dto))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_optional(db)
            .await?;

        if existing.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (first_name, last_name, email, password, role)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, first_name, last_name, email, role, created_at"#,
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(Role::Employee.as_str())
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    /// Verifies credentials and issues an access/refresh token pair.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            first_name: String,
            last_name: String,
            email: String,
            role: String,
            password: String,
            created_at: chrono::DateTime<chrono::Utc>,
        }

        let row = sqlx::query_as::<_, UserWithPassword>(
            r#"SELECT id, first_name, last_name, email, role, password, created_at
               FROM users WHERE email = $1"#,
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(AppError::unauthorized)?;

        if !verify_password(&dto.password, &row.password)? {
            return Err(AppError::unauthorized());
        }

        let role = Role::parse(&row.role).ok_or_else(|| {
            AppError::internal(anyhow::anyhow!("unknown role in users table: {}", row.role))
        })?;

        let access_token = create_access_token(row.id, role, jwt_config)?;
        let refresh_token = create_refresh_token(row.id, role, jwt_config)?;

        Ok(LoginResponse {
            access_token,
            refresh_token,
            user: User {
                id: row.id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                role: row.role,
                created_at: row.created_at,
            },
        })
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    ///
    /// The role is re-read from the database so a demotion takes effect on
    /// the next refresh rather than surviving for the refresh token's life.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn refresh_tokens(
        db: &PgPool,
        dto: RefreshRequest,
        jwt_config: &JwtConfig,
    ) -> Result<(Uuid, TokenPairResponse), AppError> {
        let claims = verify_refresh_token(&dto.refresh_token, jwt_config)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::unauthorized())?;

        let stored_role: Option<(String,)> = sqlx::query_as("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;

        let (role_str,) = stored_role.ok_or_else(AppError::unauthorized)?;
        let role = Role::parse(&role_str).ok_or_else(|| {
            AppError::internal(anyhow::anyhow!("unknown role in users table: {}", role_str))
        })?;

        let tokens = TokenPairResponse {
            access_token: create_access_token(user_id, role, jwt_config)?,
            refresh_token: create_refresh_token(user_id, role, jwt_config)?,
        };

        Ok((user_id, tokens))
    }
}
