use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Credential {
    pub mobile: String,    // 10-digit mobile number, unique per user
    pub password: String,  // 4-digit PIN, compared by exact string equality
}
