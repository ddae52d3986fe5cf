//! Route category enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

use lessonhub_entity::profile::Role;

/// The categories a route can belong to.
///
/// One parameterized gate checks all of them; each protected category
/// maps to exactly one required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteCategory {
    /// Always reachable, authenticated or not.
    Public,
    /// Student dashboard and catalog.
    StudentArea,
    /// Assistant submission dashboard.
    AssistantArea,
    /// Admin management screens.
    AdminArea,
}

impl RouteCategory {
    /// The role required to enter this category, if any.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::Public => None,
            Self::StudentArea => Some(Role::Student),
            Self::AssistantArea => Some(Role::Assistant),
            Self::AdminArea => Some(Role::Admin),
        }
    }
}

impl fmt::Display for RouteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Public => "public",
            Self::StudentArea => "studentArea",
            Self::AssistantArea => "assistantArea",
            Self::AdminArea => "adminArea",
        };
        write!(f, "{name}")
    }
}
