mod user;
mod forms;
mod habit;

pub use user::Credential;
pub use forms::{LoginForm, HabitForm};
pub use habit::{Habit, DAYS_PER_WEEK};
