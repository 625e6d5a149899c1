use sqlx::FromRow;
use time::PrimitiveDateTime;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,                               // autoincrement row id
    pub email: String,                         // unique login email
    pub password_hash: String,                 // SHA-256 hex of the password
    pub created_at: Option<PrimitiveDateTime>, // UTC, filled by the column default
}
