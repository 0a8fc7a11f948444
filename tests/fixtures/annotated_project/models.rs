use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "userName")]
    pub name: String,
    pub email: Option<String>,
    pub roles: Vec<Role>,
    pub address: Address,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub password_hash: String,
    pub avatar: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub zip: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Member,
}

pub type UserList = Vec<User>;

pub struct UserId(pub u64);

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    #[openapi(format = "email", example = "jane@example.com")]
    pub email: String,
    pub score: f64,
}
