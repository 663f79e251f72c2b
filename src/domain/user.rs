use serde::{Deserialize, Serialize};

pub type UserId = u32;

/// A member of the household sharing expenses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

const ROSTER: [(UserId, &str); 3] = [(1, "Zohaib"), (2, "Babar"), (3, "Mustafa")];

/// The fixed roster of users. Users are never created or removed at runtime.
pub fn roster() -> Vec<User> {
    ROSTER.iter().map(|(id, name)| User::new(*id, *name)).collect()
}

pub fn find_user(id: UserId) -> Option<User> {
    ROSTER
        .iter()
        .find(|(uid, _)| *uid == id)
        .map(|(id, name)| User::new(*id, *name))
}

/// Resolve a user from either a numeric id or a case-insensitive name.
pub fn resolve_user(key: &str) -> Option<User> {
    let key = key.trim();
    if let Ok(id) = key.parse::<UserId>() {
        return find_user(id);
    }
    ROSTER
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(key))
        .map(|(id, name)| User::new(*id, *name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_is_fixed() {
        let users = roster();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0], User::new(1, "Zohaib"));
        assert_eq!(users[1], User::new(2, "Babar"));
        assert_eq!(users[2], User::new(3, "Mustafa"));
    }

    #[test]
    fn test_resolve_user_by_id_or_name() {
        assert_eq!(resolve_user("2").map(|u| u.name), Some("Babar".into()));
        assert_eq!(resolve_user("mustafa").map(|u| u.id), Some(3));
        assert_eq!(resolve_user(" ZOHAIB ").map(|u| u.id), Some(1));
        assert!(resolve_user("4").is_none());
        assert!(resolve_user("nobody").is_none());
    }
}
