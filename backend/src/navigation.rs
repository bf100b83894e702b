use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{error::InvalidRoleError, role::Role};

/// Path the Log Out utility posts to.
pub const LOGOUT_PATH: &str = "/auth/logout";

/// IconRef
///
/// Identifier of a sidebar icon. The frontend shell maps these names onto its
/// icon set; the server never ships icon assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum IconRef {
    LayoutDashboard,
    FileText,
    User,
    Users,
    Network,
    Truck,
    #[serde(rename = "bar-chart-3")]
    BarChart3,
    Settings,
    LogOut,
}

/// NavItem
///
/// One entry of a role's sidebar. Unique by `path` within a navigation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavItem {
    pub path: String,
    pub label: String,
    pub icon: IconRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum UtilityAction {
    OpenSettings,
    LogOut,
}

/// UtilityItem
///
/// The fixed Settings / Log Out row under the sidebar. These are actions,
/// not destinations, so they never take part in active-item matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UtilityItem {
    pub label: String,
    pub icon: IconRef,
    pub action: UtilityAction,
}

/// NavigationModel
///
/// Everything the dashboard layout needs to draw its sidebar for one render.
/// Rebuilt on every request; it has no identity beyond that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavigationModel {
    pub role: Role,
    pub items: Vec<NavItem>,
    /// Path of the item matching the current location, if any.
    pub active_path: Option<String>,
    pub utilities: Vec<UtilityItem>,
}

impl NavigationModel {
    pub fn active_item(&self) -> Option<&NavItem> {
        let active = self.active_path.as_deref()?;
        self.items.iter().find(|item| item.path == active)
    }
}

/// UnknownRolePolicy
///
/// What `resolve_str` does with a role string it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownRolePolicy {
    /// Surface `InvalidRoleError` to the caller.
    #[default]
    Reject,
    /// Log a warning and resolve the client navigation set.
    DefaultClient,
}

impl UnknownRolePolicy {
    /// Reads the `UNKNOWN_ROLE_POLICY` value. Anything unrecognised keeps the strict default.
    pub fn from_env_value(value: &str) -> Self {
        match value.trim() {
            "default-client" => UnknownRolePolicy::DefaultClient,
            _ => UnknownRolePolicy::Reject,
        }
    }
}

// (segment, label, icon) appended after the Dashboard entry, in display order.
const CLIENT_ENTRIES: &[(&str, &str, IconRef)] = &[
    ("submissions", "My Submissions", IconRef::FileText),
    ("profile", "Profile", IconRef::User),
];

const ADMIN_ENTRIES: &[(&str, &str, IconRef)] = &[
    ("users", "Users", IconRef::Users),
    ("clusters", "Clusters", IconRef::Network),
];

const CLUSTER_ENTRIES: &[(&str, &str, IconRef)] = &[
    ("orders", "Orders", IconRef::Truck),
    ("analytics", "Analytics", IconRef::BarChart3),
];

fn role_entries(role: Role) -> &'static [(&'static str, &'static str, IconRef)] {
    match role {
        Role::Client => CLIENT_ENTRIES,
        Role::Admin => ADMIN_ENTRIES,
        Role::Cluster => CLUSTER_ENTRIES,
    }
}

/// navigation_set
///
/// The ordered sidebar entries for `role`. The Dashboard entry is always first
/// and the set is never empty.
pub fn navigation_set(role: Role) -> Vec<NavItem> {
    let base = role.dashboard_path();
    let mut items = Vec::with_capacity(1 + role_entries(role).len());
    items.push(NavItem {
        path: base.clone(),
        label: "Dashboard".to_string(),
        icon: IconRef::LayoutDashboard,
    });
    items.extend(role_entries(role).iter().map(|(segment, label, icon)| NavItem {
        path: format!("{base}/{segment}"),
        label: (*label).to_string(),
        icon: *icon,
    }));
    items
}

pub fn utility_items() -> Vec<UtilityItem> {
    vec![
        UtilityItem {
            label: "Settings".to_string(),
            icon: IconRef::Settings,
            action: UtilityAction::OpenSettings,
        },
        UtilityItem {
            label: "Log Out".to_string(),
            icon: IconRef::LogOut,
            action: UtilityAction::LogOut,
        },
    ]
}

/// True when `current` is `item_path` itself or lies underneath it.
/// `/dashboard/admin` matches `/dashboard/admin/users` but not `/dashboard/administer`.
pub fn matches_item(item_path: &str, current: &str) -> bool {
    match current.strip_prefix(item_path) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// active_path
///
/// Picks the single item that matches `current`. When several do (the
/// Dashboard entry prefixes every other entry) the longest path wins.
pub fn active_path<'a>(items: &'a [NavItem], current: &str) -> Option<&'a str> {
    items
        .iter()
        .filter(|item| matches_item(&item.path, current))
        .max_by_key(|item| item.path.len())
        .map(|item| item.path.as_str())
}

/// resolve
///
/// Builds the navigation model for a known role at `current_path`.
pub fn resolve(role: Role, current_path: &str) -> NavigationModel {
    let items = navigation_set(role);
    let active_path = active_path(&items, current_path).map(str::to_string);
    NavigationModel {
        role,
        items,
        active_path,
        utilities: utility_items(),
    }
}

/// resolve_str
///
/// Same as `resolve`, for a role that arrives as an untrusted string
/// (query parameter, URL segment). Unknown roles follow `policy`.
pub fn resolve_str(
    raw_role: &str,
    current_path: &str,
    policy: UnknownRolePolicy,
) -> Result<NavigationModel, InvalidRoleError> {
    match raw_role.parse::<Role>() {
        Ok(role) => Ok(resolve(role, current_path)),
        Err(err) => match policy {
            UnknownRolePolicy::Reject => Err(err),
            UnknownRolePolicy::DefaultClient => {
                tracing::warn!(role = %raw_role, "unknown role, falling back to client navigation");
                Ok(resolve(Role::Client, current_path))
            }
        },
    }
}
