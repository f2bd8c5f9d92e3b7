use std::sync::{Arc, Mutex};
use crate::errors::{AuthError, StoreError};
use crate::models::Credential;
use crate::services::store::load_or_default;
use crate::services::FileStore;

const USERS_KEY: &str = "users";
const SESSION_KEY: &str = "currentUser";

/// Owns the credential collection and the at-most-one current session.
///
/// Login has login-or-register semantics: an unseen mobile number is
/// registered on its first attempt, so there is no separate signup flow.
/// Credentials are matched by exact string equality; format checks
/// (10-digit mobile, 4-digit PIN) belong to the login form handler.
pub struct AuthService {
    store: FileStore,
    users: Arc<Mutex<Vec<Credential>>>,
    current: Arc<Mutex<Option<Credential>>>,
}

impl AuthService {
    /// Loads the credential collection and rehydrates a previously persisted
    /// session. The session marker is restored as-is, without re-validating
    /// it against the collection. Corrupt payloads degrade to empty state.
    pub fn new(store: FileStore) -> Self {
        let users: Vec<Credential> = load_or_default(&store, USERS_KEY);
        let current: Option<Credential> = load_or_default(&store, SESSION_KEY);

        if let Some(user) = &current {
            tracing::info!("Restored session for {}", user.mobile);
        }

        Self {
            store,
            users: Arc::new(Mutex::new(users)),
            current: Arc::new(Mutex::new(current)),
        }
    }

    pub fn login(&self, mobile: &str, password: &str) -> Result<Credential, AuthError> {
        let mut users = self.users.lock().unwrap();

        let user = match users.iter().find(|u| u.mobile == mobile) {
            Some(existing) => {
                if existing.password != password {
                    tracing::info!("Rejected login for {}: password mismatch", mobile);
                    return Err(AuthError::InvalidPassword);
                }
                existing.clone()
            }
            None => {
                // Register on first login with an unseen mobile number
                let user = Credential {
                    mobile: mobile.to_string(),
                    password: password.to_string(),
                };
                users.push(user.clone());
                tracing::info!("Registered new user {}", mobile);
                user
            }
        };

        // Both the collection and the session marker are mirrored before a
        // successful login returns
        let payload = serde_json::to_string(&*users).map_err(StoreError::from)?;
        self.store.set(USERS_KEY, &payload)?;
        let payload = serde_json::to_string(&user).map_err(StoreError::from)?;
        self.store.set(SESSION_KEY, &payload)?;
        *self.current.lock().unwrap() = Some(user.clone());
        tracing::info!("User {} logged in", user.mobile);

        Ok(user)
    }

    /// Clears the session in memory and in the store. The credential
    /// collection is untouched. Never fails: a store error here only costs
    /// the persisted marker, so it is logged and swallowed.
    pub fn logout(&self) {
        let previous = self.current.lock().unwrap().take();
        if let Some(user) = previous {
            tracing::info!("User {} logged out", user.mobile);
        }
        if let Err(e) = self.store.remove(SESSION_KEY) {
            tracing::warn!("Failed to clear persisted session: {}", e);
        }
    }

    pub fn current(&self) -> Option<Credential> {
        self.current.lock().unwrap().clone()
    }
}

impl Clone for AuthService {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            users: self.users.clone(),
            current: self.current.clone(),
        }
    }
}
