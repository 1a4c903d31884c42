//! PostgreSQL Repository Implementations

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    Access, AuditStamp, NewUser, ProfileUpdate, ProfileView, StatusUpdate, UserView,
};
use crate::domain::repository::{CredentialRepository, ProfileRepository, UserQueryRepository};
use crate::domain::value_object::{PageRequest, UserFilter, UserName, UserPassword, UserRole};
use crate::error::{UserError, UserResult};
use crate::infra::query_builder::{self, FilterPredicate, LISTING_JOINS};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

/// PostgreSQL-backed users repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    store_timeout: Duration,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Deadline for a whole store call, transaction included
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Run `fut` under the store deadline.
    ///
    /// On expiry the future is dropped: an open transaction rolls back and
    /// its connection goes back to the pool.
    async fn within_deadline<T, F>(&self, operation: &'static str, fut: F) -> UserResult<T>
    where
        F: Future<Output = UserResult<T>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(UserError::StoreTimeout)
            }
        }
    }
}

fn is_username_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(USERNAME_UNIQUE_CONSTRAINT)
        }
        _ => false,
    }
}

fn parse_role(code: &str) -> UserResult<UserRole> {
    code.parse()
        .map_err(|e| UserError::Internal(format!("Corrupt users.role value: {e}")))
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgUserRepository {
    async fn register(&self, user: &NewUser) -> UserResult<UserId> {
        self.within_deadline("register", async {
            // Rolls back on drop, so every early return below leaves no rows
            let mut tx = self.pool.begin().await?;

            sqlx::query(
                r#"
                INSERT INTO profiles (id, created_at, created_by, updated_at, updated_by)
                VALUES ($1, $2, $3, $2, $3)
                "#,
            )
            .bind(user.profile_id.into_uuid())
            .bind(user.audit.at)
            .bind(&user.audit.by)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO status (id, created_at, created_by, updated_at, updated_by)
                VALUES ($1, $2, $3, $2, $3)
                "#,
            )
            .bind(user.status_id.into_uuid())
            .bind(user.audit.at)
            .bind(&user.audit.by)
            .execute(&mut *tx)
            .await?;

            let inserted = sqlx::query(
                r#"
                INSERT INTO users (
                    id,
                    profile_id,
                    status_id,
                    username,
                    password_hash,
                    role,
                    created_at,
                    created_by,
                    updated_at,
                    updated_by
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $7, $8)
                "#,
            )
            .bind(user.user_id.into_uuid())
            .bind(user.profile_id.into_uuid())
            .bind(user.status_id.into_uuid())
            .bind(user.user_name.as_str())
            .bind(user.password.as_phc_string())
            .bind(user.role.code())
            .bind(user.audit.at)
            .bind(&user.audit.by)
            .execute(&mut *tx)
            .await;

            match inserted {
                Ok(_) => {}
                Err(e) if is_username_violation(&e) => return Err(UserError::UserNameTaken),
                Err(e) => return Err(e.into()),
            }

            tx.commit().await?;

            Ok(user.user_id)
        })
        .await
    }

    async fn find_by_username(&self, user_name: &UserName) -> UserResult<Option<Access>> {
        self.within_deadline("find_by_username", async {
            let row = sqlx::query_as::<_, AccessRow>(
                r#"
                SELECT id, username, password_hash, role
                FROM users
                WHERE username = $1
                "#,
            )
            .bind(user_name.as_str())
            .fetch_optional(&self.pool)
            .await?;

            row.map(AccessRow::into_access).transpose()
        })
        .await
    }

    async fn exists_by_username(&self, user_name: &UserName) -> UserResult<bool> {
        self.within_deadline("exists_by_username", async {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
            )
            .bind(user_name.as_str())
            .fetch_one(&self.pool)
            .await?;

            Ok(exists)
        })
        .await
    }
}

// ============================================================================
// User Query Repository Implementation
// ============================================================================

impl UserQueryRepository for PgUserRepository {
    async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> UserResult<(Vec<UserView>, u64)> {
        let predicate = FilterPredicate::from_filter(filter);

        self.within_deadline("list_users", async {
            // Data and count must see the same rows
            let mut tx = self.pool.begin().await?;
            sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
                .execute(&mut *tx)
                .await?;

            let mut data = query_builder::data_query(&predicate, page);
            let rows = data
                .build_query_as::<UserViewRow>()
                .fetch_all(&mut *tx)
                .await?;

            let mut count = query_builder::count_query(&predicate);
            let total = count
                .build_query_scalar::<i64>()
                .fetch_one(&mut *tx)
                .await?;

            tx.commit().await?;

            let views = rows
                .into_iter()
                .map(UserViewRow::into_view)
                .collect::<UserResult<Vec<_>>>()?;

            Ok((views, total.max(0) as u64))
        })
        .await
    }

    async fn find_profile(&self, user_id: &UserId) -> UserResult<Option<ProfileView>> {
        let sql = format!(
            "SELECT u.id AS user_id, u.username, p.name, u.role, p.gender, p.dob, \
             p.education, p.city, p.province, p.address, p.phone_number, s.job_role, \
             s.status, pl.city AS placement_city, d.name AS department_name \
             {LISTING_JOINS} WHERE u.id = $1"
        );

        self.within_deadline("find_profile", async {
            let row = sqlx::query_as::<_, ProfileViewRow>(&sql)
                .bind(user_id.into_uuid())
                .fetch_optional(&self.pool)
                .await?;

            row.map(ProfileViewRow::into_view).transpose()
        })
        .await
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for PgUserRepository {
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
        audit: &AuditStamp,
    ) -> UserResult<bool> {
        self.within_deadline("update_profile", async {
            let mut tx = self.pool.begin().await?;

            let profile_id = sqlx::query_scalar::<_, Option<Uuid>>(
                "SELECT profile_id FROM users WHERE id = $1 FOR UPDATE",
            )
            .bind(user_id.into_uuid())
            .fetch_optional(&mut *tx)
            .await?;

            let Some(Some(profile_id)) = profile_id else {
                return Ok(false);
            };

            let updated = sqlx::query(
                r#"
                UPDATE profiles SET
                    name = COALESCE($2, name),
                    gender = COALESCE($3, gender),
                    dob = COALESCE($4, dob),
                    education = COALESCE($5, education),
                    address = COALESCE($6, address),
                    city = COALESCE($7, city),
                    province = COALESCE($8, province),
                    phone_number = COALESCE($9, phone_number),
                    updated_at = $10,
                    updated_by = $11
                WHERE id = $1
                "#,
            )
            .bind(profile_id)
            .bind(&update.name)
            .bind(&update.gender)
            .bind(update.dob)
            .bind(&update.education)
            .bind(&update.address)
            .bind(&update.city)
            .bind(&update.province)
            .bind(&update.phone_number)
            .bind(audit.at)
            .bind(&audit.by)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated == 0 {
                return Ok(false);
            }

            touch_user(&mut tx, user_id, audit).await?;
            tx.commit().await?;

            Ok(true)
        })
        .await
    }

    async fn update_status(
        &self,
        user_id: &UserId,
        update: &StatusUpdate,
        audit: &AuditStamp,
    ) -> UserResult<bool> {
        self.within_deadline("update_status", async {
            let mut tx = self.pool.begin().await?;

            let status_id = sqlx::query_scalar::<_, Option<Uuid>>(
                "SELECT status_id FROM users WHERE id = $1 FOR UPDATE",
            )
            .bind(user_id.into_uuid())
            .fetch_optional(&mut *tx)
            .await?;

            let Some(Some(status_id)) = status_id else {
                return Ok(false);
            };

            let updated = sqlx::query(
                r#"
                UPDATE status SET
                    job_role = COALESCE($2, job_role),
                    status = COALESCE($3, status),
                    updated_at = $4,
                    updated_by = $5
                WHERE id = $1
                "#,
            )
            .bind(status_id)
            .bind(&update.job_role)
            .bind(&update.status)
            .bind(audit.at)
            .bind(&audit.by)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated == 0 {
                return Ok(false);
            }

            touch_user(&mut tx, user_id, audit).await?;
            tx.commit().await?;

            Ok(true)
        })
        .await
    }
}

/// Re-stamp the owning user after an edit of one of its linked rows
async fn touch_user(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: &UserId,
    audit: &AuditStamp,
) -> UserResult<()> {
    sqlx::query("UPDATE users SET updated_at = $2, updated_by = $3 WHERE id = $1")
        .bind(user_id.into_uuid())
        .bind(audit.at)
        .bind(&audit.by)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccessRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
}

impl AccessRow {
    fn into_access(self) -> UserResult<Access> {
        Ok(Access {
            user_id: UserId::from_uuid(self.id),
            user_name: UserName::from_db(self.username),
            password: UserPassword::from_db(&self.password_hash)?,
            role: parse_role(&self.role)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserViewRow {
    username: String,
    name: Option<String>,
    role: String,
    gender: Option<String>,
    dob: Option<NaiveDate>,
    education: Option<String>,
    city: Option<String>,
    province: Option<String>,
    address: Option<String>,
    phone_number: Option<String>,
    job_role: Option<String>,
    status: Option<String>,
    placement: Option<String>,
    department_name: Option<String>,
}

impl UserViewRow {
    fn into_view(self) -> UserResult<UserView> {
        Ok(UserView {
            role: parse_role(&self.role)?,
            username: self.username,
            name: self.name,
            gender: self.gender,
            dob: self.dob,
            education: self.education,
            city: self.city,
            province: self.province,
            address: self.address,
            phone_number: self.phone_number,
            job_role: self.job_role,
            status: self.status,
            placement: self.placement,
            department_name: self.department_name,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProfileViewRow {
    user_id: Uuid,
    username: String,
    name: Option<String>,
    role: String,
    gender: Option<String>,
    dob: Option<NaiveDate>,
    education: Option<String>,
    city: Option<String>,
    province: Option<String>,
    address: Option<String>,
    phone_number: Option<String>,
    job_role: Option<String>,
    status: Option<String>,
    placement_city: Option<String>,
    department_name: Option<String>,
}

impl ProfileViewRow {
    fn into_view(self) -> UserResult<ProfileView> {
        Ok(ProfileView {
            role: parse_role(&self.role)?,
            user_id: self.user_id,
            username: self.username,
            name: self.name,
            gender: self.gender,
            dob: self.dob,
            education: self.education,
            city: self.city,
            province: self.province,
            address: self.address,
            phone_number: self.phone_number,
            job_role: self.job_role,
            status: self.status,
            placement_city: self.placement_city,
            department_name: self.department_name,
        })
    }
}
