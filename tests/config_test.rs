use bus_booking_system::config::{AppConfig, ConfigError};
use std::collections::HashMap;

fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned())
}

const BASE: [(&str, &str); 2] = [
    ("DATABASE_URL", "mysql://root@localhost/bus"),
    ("JWT_SECRET", "secret"),
];

fn with(extra: (&'static str, &'static str)) -> Vec<(&'static str, &'static str)> {
    let mut vars = BASE.to_vec();
    vars.push(extra);
    vars
}

#[test]
fn test_defaults_applied() {
    let config = load(&BASE).unwrap();
    assert_eq!(config.jwt_expiry_hours, AppConfig::DEFAULT_JWT_EXPIRY_HOURS);
    assert_eq!(config.db_max_connections, AppConfig::DEFAULT_MAX_CONNECTIONS);
    assert_eq!(config.refund_window_days, AppConfig::DEFAULT_REFUND_WINDOW_DAYS);
}

#[test]
fn test_missing_secret_rejected() {
    let result = load(&[("DATABASE_URL", "mysql://root@localhost/bus")]);
    assert!(matches!(result, Err(ConfigError::Missing("JWT_SECRET"))));
}

#[test]
fn test_values_within_range_accepted() {
    let config = load(&with(("REFUND_WINDOW_DAYS", " 30 "))).unwrap();
    assert_eq!(config.refund_window_days, 30);
    let config = load(&with(("JWT_EXPIRY_HOURS", "8760"))).unwrap();
    assert_eq!(config.jwt_expiry_hours, 8760);
}

#[test]
fn test_out_of_range_values_rejected() {
    for (name, value) in [
        ("REFUND_WINDOW_DAYS", "200000000000000"),
        ("REFUND_WINDOW_DAYS", "0"),
        ("REFUND_WINDOW_DAYS", "-3"),
        ("JWT_EXPIRY_HOURS", "9000000000000000"),
        ("JWT_EXPIRY_HOURS", "-1"),
        ("DB_MAX_CONNECTIONS", "0"),
    ] {
        match load(&with((name, value))) {
            Err(ConfigError::Invalid { name: rejected, .. }) => assert_eq!(rejected, name),
            other => panic!("{}={} should be rejected, got {:?}", name, value, other),
        }
    }
}

#[test]
fn test_unparseable_value_rejected() {
    let result = load(&with(("JWT_EXPIRY_HOURS", "a day")));
    assert!(matches!(
        result,
        Err(ConfigError::Invalid { name: "JWT_EXPIRY_HOURS", .. })
    ));
}
