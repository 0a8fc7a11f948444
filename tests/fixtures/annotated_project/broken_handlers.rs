// @openapi GET /orders
// @openapiResponse 200 application/json Order
pub async fn list_orders() {}

// @openapi GET /ping
// @openapiResponse 200 application/json {"pong": true}
pub async fn ping() {}
