use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A uniquely identified name entry in the working list.
///
/// Identity (`id`) is independent of the value (`name`): two participants
/// may share a display name and still be drawn or grouped separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
}

impl Participant {
    /// Create a participant with a fresh v4 identity
    pub fn new(name: impl Into<String>) -> Self {
        Participant {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Names of a participant list, in order
pub fn names(participants: &[Participant]) -> Vec<&str> {
    participants.iter().map(|p| p.name.as_str()).collect()
}
