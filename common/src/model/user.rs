use serde::{Deserialize, Serialize};

/// Staff roles allowed to sign in.
///
/// Operators see every department. Department heads are scoped to their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Operator,
    Hod,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Hod => "hod",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "operator" | "admin" => Some(Role::Operator),
            "hod" => Some(Role::Hod),
            _ => None,
        }
    }
}
