//! 账户服务：注册、登录、查询、修改、删除
//!
//! Every write runs inside one transaction that commits on success; any early
//! return drops the transaction, which rolls it back.

use crate::{
    auth::{access, PasswordHasher, PasswordPolicy, TokenStore},
    config::SecurityConfig,
    error::AppError,
    models::user::{DeleteResponse, LoginResponse, RegisterResponse, User, UserResponse},
    repository::{TokenRepository, UserRepository, UserUpdate},
    validation::{Credentials, UserChanges},
};
use sqlx::{PgConnection, PgPool};

pub const USER_NOT_FOUND: &str = "user not found";
pub const INVALID_CREDENTIALS: &str = "Invalid user or password";

pub struct AccountService {
    db: PgPool,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
    tokens: TokenStore,
}

impl AccountService {
    pub fn new(db: PgPool, config: &SecurityConfig) -> Self {
        Self {
            db,
            hasher: PasswordHasher::new(),
            policy: PasswordPolicy::from_config(config),
            tokens: TokenStore::from_config(config),
        }
    }

    pub fn password_policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// 注册用户
    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn register(&self, credentials: Credentials) -> Result<RegisterResponse, AppError> {
        let password_hash = self.hash_password(credentials.password).await?;

        let mut tx = self.db.begin().await?;
        let user = UserRepository::create(&mut tx, &credentials.email, &password_hash).await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(RegisterResponse { id: user.id })
    }

    /// 用户登录，签发令牌
    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: Credentials) -> Result<LoginResponse, AppError> {
        let user = {
            let mut conn = self.db.acquire().await?;
            UserRepository::find_by_email(&mut conn, &credentials.email).await?
        };

        // 用户不存在与密码错误返回相同的错误
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = self
            .verify_password(credentials.password, stored_hash)
            .await?;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::warn!("Login failed");
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        let mut tx = self.db.begin().await?;
        let token = self.tokens.issue(&mut tx, &user).await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(LoginResponse {
            token: token.id.to_string(),
        })
    }

    /// 查询用户（无需认证）
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, user_id: i64) -> Result<UserResponse, AppError> {
        let mut conn = self.db.acquire().await?;
        let user = fetch_user(&mut conn, user_id).await?;

        Ok(UserResponse::from(user))
    }

    /// 修改用户，仅限本人
    #[tracing::instrument(skip(self, token, changes))]
    pub async fn patch_user(
        &self,
        user_id: i64,
        token: Option<&str>,
        changes: UserChanges,
    ) -> Result<UserResponse, AppError> {
        // 先在普通连接上完成鉴权，哈希期间不占用事务
        {
            let mut conn = self.db.acquire().await?;
            self.owned_user(&mut conn, user_id, token).await?;
        }

        let password_hash = match changes.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };
        let update = UserUpdate {
            email: changes.email,
            password_hash,
        };

        // 写事务内重新校验，检查与修改原子完成
        let mut tx = self.db.begin().await?;
        let user = self.owned_user(&mut tx, user_id, token).await?;

        if update.is_empty() {
            return Ok(UserResponse::from(user));
        }

        let updated = UserRepository::update(&mut tx, user.id, &update)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        tx.commit().await?;

        tracing::info!(user_id, "User updated");
        Ok(UserResponse::from(updated))
    }

    /// 删除用户及其令牌，仅限本人
    #[tracing::instrument(skip(self, token))]
    pub async fn delete_user(
        &self,
        user_id: i64,
        token: Option<&str>,
    ) -> Result<DeleteResponse, AppError> {
        let mut tx = self.db.begin().await?;
        let user = self.owned_user(&mut tx, user_id, token).await?;

        let revoked = TokenRepository::delete_by_user(&mut tx, user.id).await?;
        UserRepository::delete(&mut tx, user.id).await?;
        tx.commit().await?;

        tracing::info!(user_id, revoked_tokens = revoked, "User deleted");
        Ok(DeleteResponse { deleted: true })
    }

    /// 目标用户存在 → 令牌有效 → 令牌属于目标用户
    async fn owned_user(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
        token: Option<&str>,
    ) -> Result<User, AppError> {
        let user = fetch_user(conn, user_id).await?;
        let token = self.tokens.resolve(conn, token).await?;
        access::authorize(&token, user.id)?;

        Ok(user)
    }

    async fn verify_password(
        &self,
        password: String,
        stored_hash: Option<String>,
    ) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();

        tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => hasher.verify_dummy(&password),
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }
}

async fn fetch_user(conn: &mut PgConnection, user_id: i64) -> Result<User, AppError> {
    UserRepository::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
}
