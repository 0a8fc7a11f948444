use crate::models::{CreateUser, User, UserList};

// get_user fetches one user by id.
// @openapi GET /users/{id}
// @openapiParam id in=path, type=int64, description=User identifier
// @openapiTags users
// @openapiSummary Fetch a user
// @openapiResponse 200 application/json User
// @openapiResponse 404 application/json {"error": "not found"}
pub async fn get_user() {}

/// @openapi GET /users
/// @openapiParam page in=query, type=int, default=1
/// @openapiTags users, admin
/// @openapiResponse 200 application/json UserList
pub async fn list_users() {}

/**
 * @openapi POST /users
 * @openapi PUT /users
 * @openapiDesc Creates or replaces a user.
 * @openapiRequest application/json models::CreateUser
 * @openapiResponse 201 application/json User
 * @openapiDeprecated
 */
pub async fn create_user() {}

// @openapi GET /users/{id}/avatar
// @openapiParam id in=path, type=int64
// @openapiResponse 200 application/octet-stream
pub async fn avatar() {}

// @openapi GET /health
// @openapiResponse 200 application/json {status: string, uptime: float64}
pub async fn health() {}

// Helper without any directives.
fn unused() {}
