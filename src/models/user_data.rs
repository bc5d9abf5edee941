use serde::Serialize;
use serde_json::Value;

/// The per-user key/value payload: two independent JSON arrays, replaced
/// wholesale on every write.
#[derive(Serialize, Clone, Debug)]
pub struct UserData {
    /// The user's platform list.
    pub platforms: Value,
    /// The user's game list.
    pub games: Value,
}

impl UserData {
    /// The shape returned before the user has stored anything.
    pub fn empty() -> Self {
        Self {
            platforms: Value::Array(Vec::new()),
            games: Value::Array(Vec::new()),
        }
    }
}
