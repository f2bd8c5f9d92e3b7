use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct HabitForm {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub color: String,
}
