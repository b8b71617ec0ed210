use bus_booking_system::config::AppConfig;
use bus_booking_system::utils::jwt::{decode_token, generate_token, AuthenticatedUser};
use bus_booking_system::utils::error::AppError;
use bus_booking_system::utils::permissions::{Permission, Role};

fn config(secret: &str) -> AppConfig {
    AppConfig::new("mysql://unused@localhost/unused", secret)
}

#[test]
fn test_token_round_trip_carries_identity() {
    let config = config("test-secret");
    let token = generate_token(42, "rider@example.com", Role::Manager, &config).unwrap();
    let claims = decode_token(&token, &config).unwrap();

    assert_eq!(claims.sub, 42);
    assert_eq!(claims.email, "rider@example.com");
    assert_eq!(claims.role, Role::Manager);
    assert_eq!(
        (claims.exp - claims.iat) as i64,
        AppConfig::DEFAULT_JWT_EXPIRY_HOURS * 3600
    );
}

#[test]
fn test_token_signed_with_other_secret_rejected() {
    let token = generate_token(1, "a@example.com", Role::User, &config("one")).unwrap();
    assert!(decode_token(&token, &config("two")).is_err());
}

#[test]
fn test_expired_token_rejected() {
    let mut config = config("test-secret");
    config.jwt_expiry_hours = -2;
    let token = generate_token(1, "a@example.com", Role::User, &config).unwrap();
    assert!(decode_token(&token, &config).is_err());
}

#[test]
fn test_require_reports_missing_permission() {
    let user = AuthenticatedUser {
        user_id: 7,
        email: "rider@example.com".into(),
        role: Role::User,
    };
    assert!(user.require(Permission::BookingsCreate).is_ok());
    match user.require(Permission::BookingsRefund) {
        Err(AppError::Forbidden(message)) => {
            assert_eq!(message, "Insufficient permissions: bookings:refund required")
        }
        other => panic!("expected Forbidden, got {:?}", other),
    }
}
