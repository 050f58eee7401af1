//! Diesel row models for user persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Login name.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub username: String,
    /// Email address.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub email: String,
    /// Profile role.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub role: String,
    /// Staff flag.
    #[diesel(sql_type = diesel::sql_types::Bool)]
    pub staff: bool,
    /// Group membership names.
    #[diesel(sql_type = diesel::sql_types::Array<diesel::sql_types::Text>)]
    pub groups: Vec<String>,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Profile role.
    pub role: String,
    /// Staff flag.
    pub staff: bool,
    /// Group membership names.
    pub groups: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
