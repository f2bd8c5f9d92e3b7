use axum::{
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    extract::{Request, State},
    body::Body,
};
use crate::services::AuthService;

pub async fn require_auth(
    State(auth): State<AuthService>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path();

    if path == "/" || path == "/login" || path.starts_with("/static") {
        return next.run(req).await;
    }

    match auth.current() {
        Some(_) => next.run(req).await,
        None => Redirect::to("/").into_response(),
    }
}
