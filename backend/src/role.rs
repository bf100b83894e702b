use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::InvalidRoleError;

/// Role
///
/// The account type a session was issued for. It decides which dashboard
/// subtree a user may enter and which navigation set the sidebar shows.
/// Assigned by the external identity provider and carried in the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Client,
    Admin,
    Cluster,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Client, Role::Admin, Role::Cluster];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
            Role::Cluster => "cluster",
        }
    }

    /// The landing page of this role's dashboard, e.g. `/dashboard/admin`.
    pub fn dashboard_path(&self) -> String {
        format!("/dashboard/{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Matching is exact: "Admin" or " admin" are rejected rather than normalised.
impl FromStr for Role {
    type Err = InvalidRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "admin" => Ok(Role::Admin),
            "cluster" => Ok(Role::Cluster),
            other => Err(InvalidRoleError(other.to_string())),
        }
    }
}
