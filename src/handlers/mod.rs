mod auth;
mod dashboard;

pub use auth::{serve_login_page, handle_login, handle_logout};
pub use dashboard::{serve_dashboard, handle_add_habit, handle_toggle_day, handle_delete_habit};
