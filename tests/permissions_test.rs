use bus_booking_system::utils::permissions::{Permission, Role};
use std::str::FromStr;
use strum::IntoEnumIterator;

#[test]
fn test_super_admin_has_every_permission() {
    for permission in Permission::iter() {
        assert!(Role::SuperAdmin.has(permission), "super_admin lacks {}", permission);
    }
}

#[test]
fn test_admin_cannot_manage_users() {
    assert!(Role::Admin.has(Permission::UsersRead));
    assert!(!Role::Admin.has(Permission::UsersWrite));
    assert!(Role::Admin.has(Permission::BookingsRefund));
}

#[test]
fn test_manager_permissions() {
    let expected = [
        Permission::RoutesRead,
        Permission::BusesRead,
        Permission::BookingsRead,
        Permission::BookingsWrite,
        Permission::BookingsCreate,
        Permission::FeedbackRead,
        Permission::DashboardRead,
    ];
    for permission in Permission::iter() {
        assert_eq!(
            Role::Manager.has(permission),
            expected.contains(&permission),
            "manager / {}",
            permission
        );
    }
}

#[test]
fn test_user_can_only_browse_and_book() {
    let granted: Vec<Permission> = Permission::iter().filter(|p| Role::User.has(*p)).collect();
    assert_eq!(
        granted,
        vec![Permission::RoutesRead, Permission::BusesRead, Permission::BookingsCreate]
    );
    assert!(!Role::User.is_staff());
    assert!(Role::Manager.is_staff());
}

#[test]
fn test_roles_granting_permission() {
    assert_eq!(Role::granting(Permission::UsersWrite), vec![Role::SuperAdmin]);
    assert_eq!(
        Role::granting(Permission::BookingsRefund),
        vec![Role::SuperAdmin, Role::Admin]
    );
    assert_eq!(Role::granting(Permission::BookingsCreate), Role::iter().collect::<Vec<_>>());
}

#[test]
fn test_string_forms() {
    assert_eq!(Permission::BookingsRefund.to_string(), "bookings:refund");
    assert_eq!(Permission::from_str("dashboard:read").unwrap(), Permission::DashboardRead);
    assert_eq!(Role::SuperAdmin.to_string(), "super_admin");
    assert_eq!(Role::from_str("manager").unwrap(), Role::Manager);
    assert!(Role::from_str("owner").is_err());
    assert_eq!(
        serde_json::to_string(&Permission::UsersWrite).unwrap(),
        "\"users:write\""
    );
}
