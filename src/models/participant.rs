//! Participant identities: users and squads, and the reference a match slot holds.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a user account.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a squad.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquadId(pub Uuid);

impl SquadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SquadId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who occupies a bracket slot. Solo tournaments seed users, squad tournaments seed squads.
///
/// Serialized as `{"kind": "user", "id": "<uuid>"}`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ParticipantRef {
    User(UserId),
    Squad(SquadId),
}

impl ParticipantRef {
    pub fn user(id: UserId) -> Self {
        ParticipantRef::User(id)
    }

    pub fn squad(id: SquadId) -> Self {
        ParticipantRef::Squad(id)
    }

    pub fn is_user(&self) -> bool {
        matches!(self, ParticipantRef::User(_))
    }

    pub fn is_squad(&self) -> bool {
        matches!(self, ParticipantRef::Squad(_))
    }
}

impl fmt::Display for ParticipantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantRef::User(id) => write!(f, "user:{}", id.0),
            ParticipantRef::Squad(id) => write!(f, "squad:{}", id.0),
        }
    }
}
