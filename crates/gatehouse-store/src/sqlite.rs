//! SQLite store (sqlx).

use crate::credentials::{CredentialRecord, CredentialStore, NewCredential};
use crate::error::StoreError;
use crate::profiles::ProfileStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_core::{NewProfile, Profile, ProfileUpdate, Role, UserId};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::fs;
use std::path::Path;
use std::str::FromStr;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Credentials and profiles in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `database_url` and migrate it.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        ensure_parent_dir(options.get_filename())?;
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// A private in-memory database. One pooled connection that never idles
    /// out, so every query sees the same database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        MIGRATOR.run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn ensure_parent_dir(file: &Path) -> Result<(), StoreError> {
    if let Some(parent) = file.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CredentialRow> for CredentialRecord {
    type Error = StoreError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(CredentialRecord {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

const INSERT_CREDENTIAL: &str =
    "INSERT INTO credentials (username, password_hash, role, created_at) VALUES (?, ?, ?, ?)";
const FIND_CREDENTIAL: &str =
    "SELECT id, username, password_hash, role, created_at FROM credentials WHERE username = ?";

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn insert(&self, credential: NewCredential) -> Result<CredentialRecord, StoreError> {
        let created_at = Utc::now();
        let result = sqlx::query(INSERT_CREDENTIAL)
            .bind(&credential.username)
            .bind(&credential.password_hash)
            .bind(credential.role.as_str())
            .bind(created_at)
            .execute(&self.pool)
            .await?;

        Ok(CredentialRecord {
            id: result.last_insert_rowid(),
            username: credential.username,
            password_hash: credential.password_hash,
            role: credential.role,
            created_at,
        })
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let row: Option<CredentialRow> = sqlx::query_as(FIND_CREDENTIAL)
            .bind(username)
            .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRecord::try_from).transpose()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(1) FROM credentials")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count.0).unwrap_or_default())
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    full_name: String,
    email: String,
    phone_number: Option<String>,
    address: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone_number: row.phone_number,
            address: row.address,
        }
    }
}

const LIST_PROFILES: &str =
    "SELECT id, full_name, email, phone_number, address FROM profiles ORDER BY id";
const GET_PROFILE: &str =
    "SELECT id, full_name, email, phone_number, address FROM profiles WHERE id = ?";
const INSERT_PROFILE: &str =
    "INSERT INTO profiles (id, full_name, email, phone_number, address) VALUES (?, ?, ?, ?, ?)";
const EMAIL_IN_USE: &str =
    "SELECT id FROM profiles WHERE email = ? AND (? IS NULL OR id != ?) LIMIT 1";
const UPDATE_PROFILE: &str = "UPDATE profiles SET \
    full_name = CASE WHEN ?1 THEN ?2 ELSE full_name END, \
    email = CASE WHEN ?3 THEN ?4 ELSE email END, \
    phone_number = CASE WHEN ?5 THEN ?6 ELSE phone_number END, \
    address = CASE WHEN ?7 THEN ?8 ELSE address END \
    WHERE id = ?9 \
    RETURNING id, full_name, email, phone_number, address";

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        let rows: Vec<ProfileRow> = sqlx::query_as(LIST_PROFILES)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn get(&self, id: UserId) -> Result<Option<Profile>, StoreError> {
        let row: Option<ProfileRow> = sqlx::query_as(GET_PROFILE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Profile::from))
    }

    async fn email_in_use(
        &self,
        email: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, StoreError> {
        let found: Option<(i64,)> = sqlx::query_as(EMAIL_IN_USE)
            .bind(email)
            .bind(exclude)
            .bind(exclude)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn insert(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        sqlx::query(INSERT_PROFILE)
            .bind(profile.id)
            .bind(&profile.full_name)
            .bind(&profile.email)
            .bind(&profile.phone_number)
            .bind(&profile.address)
            .execute(&self.pool)
            .await?;
        Ok(Profile::from(profile))
    }

    async fn update(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, StoreError> {
        let ProfileUpdate {
            full_name,
            email,
            phone_number,
            address,
        } = update;

        // One statement, so concurrent updates queue on the write lock.
        let row: Option<ProfileRow> = sqlx::query_as(UPDATE_PROFILE)
            .bind(full_name.is_some())
            .bind(full_name)
            .bind(email.is_some())
            .bind(email)
            .bind(phone_number.is_some())
            .bind(phone_number.flatten())
            .bind(address.is_some())
            .bind(address.flatten())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Profile::from))
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
