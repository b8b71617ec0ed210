use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Every role known to the system. Admin dashboards and riders share this one type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    User,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Display, EnumString, EnumIter,
)]
pub enum Permission {
    #[strum(serialize = "users:read")]
    #[serde(rename = "users:read")]
    UsersRead,
    #[strum(serialize = "users:write")]
    #[serde(rename = "users:write")]
    UsersWrite,
    #[strum(serialize = "routes:read")]
    #[serde(rename = "routes:read")]
    RoutesRead,
    #[strum(serialize = "routes:write")]
    #[serde(rename = "routes:write")]
    RoutesWrite,
    #[strum(serialize = "buses:read")]
    #[serde(rename = "buses:read")]
    BusesRead,
    #[strum(serialize = "buses:write")]
    #[serde(rename = "buses:write")]
    BusesWrite,
    #[strum(serialize = "bookings:read")]
    #[serde(rename = "bookings:read")]
    BookingsRead,
    #[strum(serialize = "bookings:write")]
    #[serde(rename = "bookings:write")]
    BookingsWrite,
    #[strum(serialize = "bookings:create")]
    #[serde(rename = "bookings:create")]
    BookingsCreate,
    #[strum(serialize = "bookings:refund")]
    #[serde(rename = "bookings:refund")]
    BookingsRefund,
    #[strum(serialize = "feedback:read")]
    #[serde(rename = "feedback:read")]
    FeedbackRead,
    #[strum(serialize = "feedback:write")]
    #[serde(rename = "feedback:write")]
    FeedbackWrite,
    #[strum(serialize = "dashboard:read")]
    #[serde(rename = "dashboard:read")]
    DashboardRead,
}

use Permission::*;

const SUPER_ADMIN_PERMISSIONS: &[Permission] = &[
    UsersRead,
    UsersWrite,
    RoutesRead,
    RoutesWrite,
    BusesRead,
    BusesWrite,
    BookingsRead,
    BookingsWrite,
    BookingsCreate,
    BookingsRefund,
    FeedbackRead,
    FeedbackWrite,
    DashboardRead,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    UsersRead,
    RoutesRead,
    RoutesWrite,
    BusesRead,
    BusesWrite,
    BookingsRead,
    BookingsWrite,
    BookingsCreate,
    BookingsRefund,
    FeedbackRead,
    FeedbackWrite,
    DashboardRead,
];

const MANAGER_PERMISSIONS: &[Permission] = &[
    RoutesRead,
    BusesRead,
    BookingsRead,
    BookingsWrite,
    BookingsCreate,
    FeedbackRead,
    DashboardRead,
];

const USER_PERMISSIONS: &[Permission] = &[RoutesRead, BusesRead, BookingsCreate];

impl Role {
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::SuperAdmin => SUPER_ADMIN_PERMISSIONS,
            Role::Admin => ADMIN_PERMISSIONS,
            Role::Manager => MANAGER_PERMISSIONS,
            Role::User => USER_PERMISSIONS,
        }
    }

    pub fn has(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Roles holding `permission`, most privileged first.
    pub fn granting(permission: Permission) -> Vec<Role> {
        Role::iter().filter(|role| role.has(permission)).collect()
    }

    /// Staff roles can sign in to the admin dashboards.
    pub fn is_staff(self) -> bool {
        !matches!(self, Role::User)
    }
}
