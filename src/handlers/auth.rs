use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Response, Redirect},
};
use std::fs;
use crate::config::Config;
use crate::errors::AuthError;
use crate::models::LoginForm;
use crate::services::{AuthService, HabitService};

pub async fn serve_login_page(
    State((auth, _, _)): State<(AuthService, HabitService, Config)>,
) -> Response {
    // A live session skips the login form entirely
    if auth.current().is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let login_html = fs::read_to_string("templates/login.html")
        .unwrap_or_else(|_| "Error loading login page".to_string());
    Html(login_html).into_response()
}

#[axum::debug_handler]
pub async fn handle_login(
    State((auth, _, _)): State<(AuthService, HabitService, Config)>,
    Form(login_form): Form<LoginForm>,
) -> Response {
    tracing::info!("Login attempt for mobile: {}", login_form.mobile);

    // Format validation happens here, before the service sees the input.
    // The messages are shown verbatim on the login form.
    if login_form.mobile.len() != 10 || !login_form.mobile.chars().all(|c| c.is_ascii_digit()) {
        return login_error("Mobile number must be 10 digits");
    }
    if login_form.password.len() != 4 || !login_form.password.chars().all(|c| c.is_ascii_digit()) {
        return login_error("Password must be 4 digits");
    }

    match auth.login(&login_form.mobile, &login_form.password) {
        Ok(user) => {
            tracing::info!("Session started for {}", user.mobile);
            Redirect::to("/dashboard").into_response()
        }
        Err(AuthError::InvalidPassword) => {
            tracing::info!("Invalid password for mobile: {}", login_form.mobile);
            login_error("Invalid password")
        }
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            login_error("Server error")
        }
    }
}

#[axum::debug_handler]
pub async fn handle_logout(
    State((auth, _, _)): State<(AuthService, HabitService, Config)>,
) -> Response {
    auth.logout();
    Redirect::to("/").into_response()
}

fn login_error(msg: &str) -> Response {
    Redirect::to(&format!("/?error={}", urlencoding::encode(msg))).into_response()
}
