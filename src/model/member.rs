use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role of a member within the group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Child,
    #[default]
    Other,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Parent => write!(f, "parent"),
            Role::Child => write!(f, "child"),
            Role::Other => write!(f, "other"),
        }
    }
}

/// A roster entry. Immutable for the duration of one analysis.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Member {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub age: Option<u32>,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            age: None,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }
}

/// Check a roster for records the engine cannot work with.
///
/// Returns the first problem found as a human-readable reason.
pub fn validate_roster(members: &[Member]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for member in members {
        if member.id.trim().is_empty() {
            return Err("member with empty id".to_string());
        }
        if member.name.trim().is_empty() {
            return Err(format!("member '{}' has an empty name", member.id));
        }
        if !seen.insert(member.id.as_str()) {
            return Err(format!("duplicate member id '{}'", member.id));
        }
    }
    Ok(())
}
