use axum::{response::IntoResponse, response::Json};
use serde::Serialize;

#[derive(Serialize)]
struct Status {
    status: &'static str,
}

pub async fn healthcheck() -> impl IntoResponse {
    Json(Status {
        status: "Available",
    })
}
