use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use chrono::Utc;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Habit, DAYS_PER_WEEK};
use crate::services::store::load_or_default;
use crate::services::{AuthService, FileStore};

const HABITS_KEY: &str = "habits";

/// Owns the habit records of all users. The dashboard only ever sees the
/// subset belonging to the current session, but mutations address the full
/// collection by id. Every mutation persists the full collection back to the
/// store before returning, including the write that empties it.
pub struct HabitService {
    store: FileStore,
    auth: AuthService,
    habits: Arc<Mutex<Vec<Habit>>>,
    next_id: Arc<AtomicU64>,
}

impl HabitService {
    pub fn new(store: FileStore, auth: AuthService) -> Self {
        let habits: Vec<Habit> = load_or_default(&store, HABITS_KEY);

        // Seed the id counter past everything already stored, so ids stay
        // monotonic across restarts and are never reused for live records.
        let next_id = habits.iter().map(|h| h.id).max().map_or(1, |id| id + 1);

        Self {
            store,
            auth,
            habits: Arc::new(Mutex::new(habits)),
            next_id: Arc::new(AtomicU64::new(next_id)),
        }
    }

    /// Creates a habit owned by the current session. Without a session this
    /// is a no-op, matching the dashboard being unreachable while logged out.
    pub fn add_habit(&self, name: &str, category: &str, color: &str) -> StoreResult<()> {
        let Some(user) = self.auth.current() else {
            tracing::warn!("add_habit called without an active session");
            return Ok(());
        };

        let habit = Habit {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            owner_mobile: user.mobile,
            name: name.to_string(),
            category: category.to_string(),
            color: color.to_string(),
            created_at: Utc::now(),
            completed_days: [false; DAYS_PER_WEEK],
        };

        tracing::info!("Adding habit {} ({})", habit.id, habit.name);
        let mut habits = self.habits.lock().unwrap();
        habits.push(habit);
        self.persist(&habits)
    }

    /// Flips one day of the week for the habit with the given id, across the
    /// full collection regardless of owner. An unknown id or a day index
    /// outside Mon..Sun leaves every record unchanged.
    pub fn toggle_day(&self, habit_id: u64, day_index: usize) -> StoreResult<()> {
        if day_index >= DAYS_PER_WEEK {
            tracing::warn!("Ignoring out-of-range day index {}", day_index);
            return Ok(());
        }

        let mut habits = self.habits.lock().unwrap();
        if let Some(habit) = habits.iter_mut().find(|h| h.id == habit_id) {
            habit.completed_days[day_index] = !habit.completed_days[day_index];
        } else {
            tracing::debug!("toggle_day: no habit with id {}", habit_id);
        }
        self.persist(&habits)
    }

    /// Removes the habit with the given id. Deleting an unknown id is an
    /// idempotent no-op.
    pub fn delete_habit(&self, habit_id: u64) -> StoreResult<()> {
        let mut habits = self.habits.lock().unwrap();
        let before = habits.len();
        habits.retain(|h| h.id != habit_id);
        if habits.len() < before {
            tracing::info!("Deleted habit {}", habit_id);
        } else {
            tracing::debug!("delete_habit: no habit with id {}", habit_id);
        }
        self.persist(&habits)
    }

    /// The current session's habits in insertion order. Recomputed on every
    /// call, never stored separately.
    pub fn visible_habits(&self) -> Vec<Habit> {
        let Some(user) = self.auth.current() else {
            return Vec::new();
        };
        self.habits
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.owner_mobile == user.mobile)
            .cloned()
            .collect()
    }

    fn persist(&self, habits: &[Habit]) -> StoreResult<()> {
        let payload = serde_json::to_string(habits).map_err(StoreError::from)?;
        self.store.set(HABITS_KEY, &payload)
    }
}

impl Clone for HabitService {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            auth: self.auth.clone(),
            habits: self.habits.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup(dir: &std::path::Path) -> (AuthService, HabitService) {
        let store = FileStore::open(dir).unwrap();
        let auth = AuthService::new(store.clone());
        let habits = HabitService::new(store, auth.clone());
        (auth, habits)
    }

    #[test]
    fn test_add_without_session_is_noop() {
        let dir = tempdir().unwrap();
        let (_auth, habits) = setup(dir.path());

        habits.add_habit("Run", "Health", "#FF0000").unwrap();

        assert!(habits.visible_habits().is_empty());
        assert!(habits.habits.lock().unwrap().is_empty());
    }

    #[test]
    fn test_add_habit_shape() {
        let dir = tempdir().unwrap();
        let (auth, habits) = setup(dir.path());
        auth.login("9876543210", "1234").unwrap();

        habits.add_habit("Run", "Health", "#FF0000").unwrap();

        let visible = habits.visible_habits();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].owner_mobile, "9876543210");
        assert_eq!(visible[0].name, "Run");
        assert_eq!(visible[0].completed_days, [false; DAYS_PER_WEEK]);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let dir = tempdir().unwrap();
        let (auth, habits) = setup(dir.path());
        auth.login("9876543210", "1234").unwrap();

        habits.add_habit("Run", "Health", "#FF0000").unwrap();
        habits.add_habit("Read", "Mind", "#3B82F6").unwrap();

        let visible = habits.visible_habits();
        assert!(visible[1].id > visible[0].id);
    }

    #[test]
    fn test_toggle_is_involutive() {
        let dir = tempdir().unwrap();
        let (auth, habits) = setup(dir.path());
        auth.login("9876543210", "1234").unwrap();
        habits.add_habit("Run", "Health", "#FF0000").unwrap();
        let id = habits.visible_habits()[0].id;

        habits.toggle_day(id, 3).unwrap();
        assert!(habits.visible_habits()[0].completed_days[3]);

        habits.toggle_day(id, 3).unwrap();
        assert!(!habits.visible_habits()[0].completed_days[3]);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let dir = tempdir().unwrap();
        let (auth, habits) = setup(dir.path());
        auth.login("9876543210", "1234").unwrap();
        habits.add_habit("Run", "Health", "#FF0000").unwrap();
        let id = habits.visible_habits()[0].id;

        habits.toggle_day(id, 7).unwrap();
        habits.toggle_day(id, 100).unwrap();

        assert_eq!(habits.visible_habits()[0].completed_days, [false; DAYS_PER_WEEK]);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let dir = tempdir().unwrap();
        let (auth, habits) = setup(dir.path());
        auth.login("9876543210", "1234").unwrap();
        habits.add_habit("Run", "Health", "#FF0000").unwrap();

        habits.toggle_day(999, 0).unwrap();

        assert_eq!(habits.visible_habits()[0].completed_days, [false; DAYS_PER_WEEK]);
    }

    #[test]
    fn test_habits_are_scoped_to_owner() {
        let dir = tempdir().unwrap();
        let (auth, habits) = setup(dir.path());

        auth.login("1111111111", "1234").unwrap();
        habits.add_habit("Run", "Health", "#FF0000").unwrap();

        // Switching the session switches the visible subset
        auth.login("2222222222", "5678").unwrap();
        assert!(habits.visible_habits().is_empty());

        habits.add_habit("Read", "Mind", "#3B82F6").unwrap();
        let visible = habits.visible_habits();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Read");

        // Both records share the underlying collection
        assert_eq!(habits.habits.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let (auth, habits) = setup(dir.path());
        auth.login("9876543210", "1234").unwrap();
        habits.add_habit("Run", "Health", "#FF0000").unwrap();
        habits.add_habit("Read", "Mind", "#3B82F6").unwrap();
        let id = habits.visible_habits()[0].id;

        habits.delete_habit(id).unwrap();
        assert_eq!(habits.visible_habits().len(), 1);

        habits.delete_habit(id).unwrap();
        assert_eq!(habits.visible_habits().len(), 1);
    }

    #[test]
    fn test_habits_survive_restart() {
        let dir = tempdir().unwrap();
        {
            let (auth, habits) = setup(dir.path());
            auth.login("9876543210", "1234").unwrap();
            habits.add_habit("Run", "Health", "#FF0000").unwrap();
            habits.toggle_day(habits.visible_habits()[0].id, 2).unwrap();
        }

        // The session marker was persisted too, so a fresh pair of services
        // sees the same user and the same records.
        let (_auth, habits) = setup(dir.path());
        let visible = habits.visible_habits();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Run");
        assert!(visible[0].completed_days[2]);
    }

    #[test]
    fn test_id_counter_resumes_past_stored_ids() {
        let dir = tempdir().unwrap();
        let first_id;
        {
            let (auth, habits) = setup(dir.path());
            auth.login("9876543210", "1234").unwrap();
            habits.add_habit("Run", "Health", "#FF0000").unwrap();
            first_id = habits.visible_habits()[0].id;
        }

        let (_auth, habits) = setup(dir.path());
        habits.add_habit("Read", "Mind", "#3B82F6").unwrap();
        let visible = habits.visible_habits();
        assert!(visible[1].id > first_id);
    }

    #[test]
    fn test_deleting_last_habit_persists_empty_collection() {
        let dir = tempdir().unwrap();
        {
            let (auth, habits) = setup(dir.path());
            auth.login("9876543210", "1234").unwrap();
            habits.add_habit("Run", "Health", "#FF0000").unwrap();
            habits.delete_habit(habits.visible_habits()[0].id).unwrap();
        }

        let (_auth, habits) = setup(dir.path());
        assert!(habits.visible_habits().is_empty());
        assert!(habits.habits.lock().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_habits_payload_starts_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("habits", "{ broken").unwrap();

        let auth = AuthService::new(store.clone());
        let habits = HabitService::new(store, auth.clone());

        auth.login("9876543210", "1234").unwrap();
        assert!(habits.visible_habits().is_empty());
    }
}
