use axum::{
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Response, Redirect},
};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::{Habit, HabitForm};
use crate::services::{AuthService, HabitService};

const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

// Fixed palette offered by the add-habit form; free-form values posted by
// other clients are stored as-is.
const COLORS: [&str; 6] = [
    "#EF4444", "#F59E0B", "#10B981", "#3B82F6", "#8B5CF6", "#EC4899",
];

pub async fn serve_dashboard(
    State((auth, habit_service, _)): State<(AuthService, HabitService, Config)>,
) -> AppResult<Response> {
    tracing::info!("Accessing dashboard");

    let user = auth
        .current()
        .ok_or_else(|| AppError::Auth("Not authenticated".into()))?;

    let habits = habit_service.visible_habits();
    tracing::debug!("User {} has {} habits", user.mobile, habits.len());

    // Read and render the template
    let dashboard_html = std::fs::read_to_string("templates/dashboard.html")
        .map_err(|e| {
            tracing::error!("Failed to read dashboard template: {}", e);
            AppError::File(e)
        })?;

    let habits_html = if habits.is_empty() {
        r#"<p class="empty-state">No habits found. Start by adding one!</p>"#.to_string()
    } else {
        habits.iter().map(habit_card).collect::<Vec<_>>().join("\n")
    };

    let palette_html = COLORS.iter().enumerate().map(|(i, color)| {
        format!(
            r#"<label class="swatch">
                <input type="radio" name="color" value="{}"{}>
                <span style="background-color: {}"></span>
            </label>"#,
            color,
            if i == 0 { " checked" } else { "" },
            color
        )
    }).collect::<Vec<_>>().join("\n");

    let dashboard_html = dashboard_html
        .replace("{{mobile}}", &user.mobile)
        .replace("{{palette}}", &palette_html)
        .replace("{{habits}}", &habits_html);

    tracing::info!("Successfully rendered dashboard for user: {}", user.mobile);
    Ok(Html(dashboard_html).into_response())
}

// Builds one habit card: color bar, name and category, the Mon-Sun toggle
// grid, and the delete action.
fn habit_card(habit: &Habit) -> String {
    let days_html = DAY_LABELS.iter().enumerate().map(|(day_index, label)| {
        format!(
            r#"<div class="day-cell">
                <span class="day-label">{}</span>
                <a href="/toggle/{}/{}" class="day-toggle{}" style="--habit-color: {}"></a>
            </div>"#,
            label,
            habit.id,
            day_index,
            if habit.completed_days[day_index] { " done" } else { "" },
            habit.color
        )
    }).collect::<Vec<_>>().join("\n");

    format!(
        r#"<div class="habit-card">
            <div class="habit-info">
                <div class="color-bar" style="background-color: {}"></div>
                <div>
                    <h3>{}</h3>
                    <span class="category">{}</span>
                    <span class="created">since {}</span>
                </div>
            </div>
            <div class="day-grid">
                {}
            </div>
            <a href="/delete/{}" class="delete-btn">Delete</a>
        </div>"#,
        habit.color,
        habit.name,
        habit.category,
        habit.created_at.format("%Y-%m-%d"),
        days_html,
        habit.id
    )
}

#[axum::debug_handler]
pub async fn handle_add_habit(
    State((_, habit_service, _)): State<(AuthService, HabitService, Config)>,
    Form(form): Form<HabitForm>,
) -> AppResult<Response> {
    let name = form.name.trim();
    let category = form.category.trim();

    // Empty fields are the form's problem; the original UI drops the
    // submission silently, so the redirect carries no message.
    if name.is_empty() || category.is_empty() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let color = if form.color.is_empty() {
        COLORS[0]
    } else {
        form.color.as_str()
    };

    habit_service.add_habit(name, category, color)?;
    Ok(Redirect::to("/dashboard").into_response())
}

#[axum::debug_handler]
pub async fn handle_toggle_day(
    State((_, habit_service, _)): State<(AuthService, HabitService, Config)>,
    Path((habit_id, day_index)): Path<(u64, usize)>,
) -> AppResult<Response> {
    habit_service.toggle_day(habit_id, day_index)?;
    Ok(Redirect::to("/dashboard").into_response())
}

#[axum::debug_handler]
pub async fn handle_delete_habit(
    State((_, habit_service, _)): State<(AuthService, HabitService, Config)>,
    Path(habit_id): Path<u64>,
) -> AppResult<Response> {
    habit_service.delete_habit(habit_id)?;
    Ok(Redirect::to("/dashboard").into_response())
}
