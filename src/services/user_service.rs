use crate::config::AppConfig;
use crate::db::is_unique_violation;
use crate::models::user::{
    ChangePasswordRequest, CreateUserRequest, TwoFactorDisableRequest, TwoFactorSetupResponse,
    UpdateUserRequest, User, UserLoginRequest, UserLoginResponse, UserProfile,
    UserRegistrationRequest,
};
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt;
use crate::utils::permissions::Role;
use bcrypt::{hash, verify, DEFAULT_COST};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::MySqlPool;
use validator::Validate;

const TWO_FACTOR_SECRET_LENGTH: usize = 20;

const USER_COLUMNS: &str = "id, name, email, password, role, is_active, two_factor_enabled, \
    two_factor_secret, last_login, created_at";

#[derive(Clone)]
pub struct UserService {
    pool: MySqlPool,
    config: AppConfig,
}

impl UserService {
    pub fn new(pool: MySqlPool, config: AppConfig) -> Self {
        UserService { pool, config }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn insert_user(&self, name: &str, email: &str, password: &str, role: Role) -> AppResult<User> {
        let email = normalize_email(email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest("Email is already registered".into()));
        }

        let hashed_password = hash(password.as_bytes(), DEFAULT_COST)?;

        let result = sqlx::query(
            "INSERT INTO users (name, email, password, role, is_active) VALUES (?, ?, ?, ?, TRUE)",
        )
        .bind(name.trim())
        .bind(&email)
        .bind(hashed_password)
        .bind(role.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Lost a race with another registration for the same address
            if is_unique_violation(&e) {
                AppError::BadRequest("Email is already registered".into())
            } else {
                e.into()
            }
        })?;

        let user_id = result.last_insert_id() as i32;
        tracing::info!(user_id, %role, "user created");
        self.find_by_id(user_id).await
    }

    // Register a new rider account
    pub async fn register_user(&self, request: UserRegistrationRequest) -> AppResult<UserProfile> {
        request.validate()?;
        let user = self
            .insert_user(&request.name, &request.email, &request.password, Role::User)
            .await?;
        Ok(user.into())
    }

    // Login user
    pub async fn login_user(&self, request: UserLoginRequest) -> AppResult<UserLoginResponse> {
        request.validate()?;

        let user = self
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid credentials".into()))?;

        // Verify password
        if !verify(request.password.as_bytes(), &user.password)? {
            tracing::info!(user_id = user.id, "login rejected: wrong password");
            return Err(AppError::AuthError("Invalid credentials".into()));
        }

        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".into()));
        }

        if user.two_factor_enabled {
            let code = request
                .two_factor_code
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| AppError::AuthError("Two-factor code required".into()))?;
            if !self.two_factor_matches(&user, code)? {
                return Err(AppError::AuthError("Invalid two-factor code".into()));
            }
        }

        sqlx::query("UPDATE users SET last_login = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        let token = jwt::generate_token(user.id, &user.email, user.role, &self.config)
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        tracing::info!(user_id = user.id, role = %user.role, "user logged in");
        let user = self.find_by_id(user.id).await?;
        Ok(UserLoginResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn get_profile(&self, user_id: i32) -> AppResult<UserProfile> {
        Ok(self.find_by_id(user_id).await?.into())
    }

    pub async fn change_password(&self, user_id: i32, request: ChangePasswordRequest) -> AppResult<()> {
        request.validate()?;
        let user = self.find_by_id(user_id).await?;

        if !verify(request.current_password.as_bytes(), &user.password)? {
            return Err(AppError::BadRequest("Current password is incorrect".into()));
        }
        if request.current_password == request.new_password {
            return Err(AppError::BadRequest(
                "New password must differ from the current password".into(),
            ));
        }

        let hashed_password = hash(request.new_password.as_bytes(), DEFAULT_COST)?;
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(hashed_password)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id, "password changed");
        Ok(())
    }

    fn two_factor_matches(&self, user: &User, code: &str) -> AppResult<bool> {
        match &user.two_factor_secret {
            Some(secret_hash) => Ok(verify(code.trim().as_bytes(), secret_hash)?),
            None => Ok(false),
        }
    }

    pub async fn setup_two_factor(&self, user_id: i32) -> AppResult<TwoFactorSetupResponse> {
        let user = self.find_by_id(user_id).await?;
        if user.two_factor_enabled {
            return Err(AppError::BadRequest("Two-factor authentication is already enabled".into()));
        }

        let secret = generate_two_factor_secret();
        let secret_hash = hash(secret.as_bytes(), DEFAULT_COST)?;

        sqlx::query("UPDATE users SET two_factor_enabled = TRUE, two_factor_secret = ? WHERE id = ?")
            .bind(secret_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id, "two-factor authentication enabled");
        Ok(TwoFactorSetupResponse { secret })
    }

    pub async fn disable_two_factor(&self, user_id: i32, request: TwoFactorDisableRequest) -> AppResult<()> {
        request.validate()?;
        let user = self.find_by_id(user_id).await?;
        if !user.two_factor_enabled {
            return Err(AppError::BadRequest("Two-factor authentication is not enabled".into()));
        }
        if !verify(request.password.as_bytes(), &user.password)? {
            return Err(AppError::BadRequest("Password is incorrect".into()));
        }
        if !self.two_factor_matches(&user, &request.code)? {
            return Err(AppError::BadRequest("Invalid two-factor code".into()));
        }

        sqlx::query("UPDATE users SET two_factor_enabled = FALSE, two_factor_secret = NULL WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id, "two-factor authentication disabled");
        Ok(())
    }

    pub async fn list_users(&self, role: Option<Role>) -> AppResult<Vec<UserProfile>> {
        let users = match role {
            Some(role) => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {} FROM users WHERE role = ? ORDER BY created_at DESC",
                    USER_COLUMNS
                ))
                .bind(role.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {} FROM users ORDER BY created_at DESC",
                    USER_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserProfile> {
        request.validate()?;
        let user = self
            .insert_user(&request.name, &request.email, &request.password, request.role)
            .await?;
        Ok(user.into())
    }

    pub async fn update_user(
        &self,
        actor_id: i32,
        user_id: i32,
        request: UpdateUserRequest,
    ) -> AppResult<UserProfile> {
        request.validate()?;
        let mut user = self.find_by_id(user_id).await?;

        if actor_id == user_id {
            if request.role.is_some_and(|role| role != user.role) {
                return Err(AppError::BadRequest("You cannot change your own role".into()));
            }
            if request.is_active == Some(false) {
                return Err(AppError::BadRequest("You cannot deactivate your own account".into()));
            }
        }

        if let Some(name) = request.name {
            user.name = name.trim().to_string();
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if let Some(is_active) = request.is_active {
            user.is_active = is_active;
        }

        sqlx::query("UPDATE users SET name = ?, role = ?, is_active = ? WHERE id = ?")
            .bind(&user.name)
            .bind(user.role.to_string())
            .bind(user.is_active)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(actor_id, user_id, "user updated");
        Ok(self.find_by_id(user_id).await?.into())
    }

    pub async fn delete_user(&self, actor_id: i32, user_id: i32) -> AppResult<()> {
        if actor_id == user_id {
            return Err(AppError::BadRequest("You cannot delete your own account".into()));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }

        tracing::info!(actor_id, user_id, "user deleted");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn generate_two_factor_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TWO_FACTOR_SECRET_LENGTH)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect()
}
