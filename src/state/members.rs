//! Study member list held alongside the relay view.

#[cfg(test)]
#[path = "members_test.rs"]
mod members_test;

use serde::{Deserialize, Serialize};

/// Access level of a study member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRole {
    #[default]
    #[serde(rename = "r")]
    Read,
    #[serde(rename = "w")]
    Write,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyMember {
    pub user_id: String,
    #[serde(default)]
    pub role: MemberRole,
}

/// Members of the broadcast study and the viewing user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudyMembers {
    pub members: Vec<StudyMember>,
    /// Signed-in viewer, if any.
    pub my_id: Option<String>,
}

impl StudyMembers {
    #[must_use]
    pub fn new(members: Vec<StudyMember>, my_id: Option<String>) -> Self {
        Self { members, my_id }
    }

    #[must_use]
    pub fn role_of(&self, user_id: &str) -> Option<MemberRole> {
        self.members
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role)
    }

    /// Whether the viewer may write to the study (and so toggle sync).
    #[must_use]
    pub fn can_contribute(&self) -> bool {
        self.my_id
            .as_deref()
            .and_then(|id| self.role_of(id))
            .is_some_and(|role| role == MemberRole::Write)
    }
}
