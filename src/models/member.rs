use serde::{Deserialize, Serialize};

/// Read-only projection of a project membership record.
///
/// `id` is the user's id; it is the key of the member's assignment bucket and
/// the value submitted as `desarrolladorId` at commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub membership_id: i64,
    pub name: String,
    pub email: String,
    pub role_id: Option<i64>,
}

impl TeamMember {
    /// Upper-cased first letter of the display name, used as an avatar.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('?')
    }
}
