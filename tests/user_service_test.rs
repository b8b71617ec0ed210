use async_trait::async_trait;
use bus_booking_system::{
    config::AppConfig,
    models::user::{
        ChangePasswordRequest, CreateUserRequest, TwoFactorDisableRequest, UpdateUserRequest,
        UserLoginRequest, UserRegistrationRequest,
    },
    services::user_service::UserService,
    utils::{error::AppError, jwt::decode_token, permissions::Role},
};
use test_context::{test_context, AsyncTestContext};
use tokio::task::JoinSet;

mod common {
    pub mod test_utils;
}
use common::test_utils::TestDb;
use ctor::dtor;

const SECRET: &str = "user-test-secret";

struct UserServiceContext {
    user_service: UserService,
}

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

#[async_trait]
impl AsyncTestContext for UserServiceContext {
    async fn setup() -> Self {
        let pool = TestDb::get_instance()
            .await
            .expect("Failed to get test database instance");
        let user_service = UserService::new(pool, AppConfig::new("unused", SECRET));
        UserServiceContext { user_service }
    }

    async fn teardown(self) {}
}

fn registration(email: &str) -> UserRegistrationRequest {
    UserRegistrationRequest {
        name: "Test User".to_string(),
        email: email.to_string(),
        password: "test_password123".to_string(),
    }
}

fn login(email: &str, password: &str) -> UserLoginRequest {
    UserLoginRequest {
        email: email.to_string(),
        password: password.to_string(),
        two_factor_code: None,
    }
}

#[test_context(UserServiceContext)]
#[tokio::test]
#[ignore = "needs a MySQL server at ADMIN_DATABASE_URL"]
async fn test_user_registration_success(ctx: &UserServiceContext) -> Result<(), AppError> {
    let service = &ctx.user_service;
    let profile = service.register_user(registration("New.Rider@Example.com")).await?;

    assert_eq!(profile.email, "new.rider@example.com");
    assert_eq!(profile.role, Role::User);
    assert!(profile.is_active);
    assert!(!profile.two_factor_enabled);
    Ok(())
}

#[test_context(UserServiceContext)]
#[tokio::test]
#[ignore = "needs a MySQL server at ADMIN_DATABASE_URL"]
async fn test_duplicate_email_rejected(ctx: &UserServiceContext) -> Result<(), AppError> {
    let service = &ctx.user_service;
    service.register_user(registration("dup@example.com")).await?;

    let result = service.register_user(registration("DUP@example.com")).await;
    assert!(matches!(result, Err(AppError::BadRequest(m)) if m == "Email is already registered"));
    Ok(())
}

#[test_context(UserServiceContext)]
#[tokio::test]
#[ignore = "needs a MySQL server at ADMIN_DATABASE_URL"]
async fn test_concurrent_registration_same_email(ctx: &UserServiceContext) -> Result<(), AppError> {
    let mut tasks = JoinSet::new();
    for _ in 0..5 {
        let service = ctx.user_service.clone();
        tasks.spawn(async move { service.register_user(registration("race@example.com")).await });
    }

    let mut registered = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.expect("registration task panicked") {
            Ok(_) => registered += 1,
            Err(AppError::BadRequest(message)) => {
                assert_eq!(message, "Email is already registered")
            }
            Err(other) => panic!("unexpected registration error: {:?}", other),
        }
    }
    assert_eq!(registered, 1);
    Ok(())
}

#[test_context(UserServiceContext)]
#[tokio::test]
#[ignore = "needs a MySQL server at ADMIN_DATABASE_URL"]
async fn test_short_password_rejected(ctx: &UserServiceContext) -> Result<(), AppError> {
    let service = &ctx.user_service;
    let mut request = registration("short@example.com");
    request.password = "short".to_string();

    match service.register_user(request).await {
        Err(AppError::ValidationFailed(errors)) => assert_eq!(errors[0].field, "password"),
        other => panic!("expected validation failure, got {:?}", other),
    }
    Ok(())
}

#[test_context(UserServiceContext)]
#[tokio::test]
#[ignore = "needs a MySQL server at ADMIN_DATABASE_URL"]
async fn test_login_issues_token(ctx: &UserServiceContext) -> Result<(), AppError> {
    let service = &ctx.user_service;
    let profile = service.register_user(registration("login@example.com")).await?;

    let response = service
        .login_user(login("login@example.com", "test_password123"))
        .await?;
    let claims = decode_token(&response.token, &AppConfig::new("unused", SECRET))
        .expect("token decodes");
    assert_eq!(claims.sub, profile.id);
    assert_eq!(claims.role, Role::User);
    assert!(response.user.last_login.is_some());

    let wrong = service.login_user(login("login@example.com", "wrong_password")).await;
    assert!(matches!(wrong, Err(AppError::AuthError(_))));

    let unknown = service.login_user(login("nobody@example.com", "test_password123")).await;
    assert!(matches!(unknown, Err(AppError::AuthError(_))));
    Ok(())
}

#[test_context(UserServiceContext)]
#[tokio::test]
#[ignore = "needs a MySQL server at ADMIN_DATABASE_URL"]
async fn test_change_password(ctx: &UserServiceContext) -> Result<(), AppError> {
    let service = &ctx.user_service;
    let profile = service.register_user(registration("change@example.com")).await?;

    let same = service
        .change_password(
            profile.id,
            ChangePasswordRequest {
                current_password: "test_password123".to_string(),
                new_password: "test_password123".to_string(),
            },
        )
        .await;
    assert!(matches!(same, Err(AppError::BadRequest(_))));

    service
        .change_password(
            profile.id,
            ChangePasswordRequest {
                current_password: "test_password123".to_string(),
                new_password: "another_password".to_string(),
            },
        )
        .await?;

    assert!(service
        .login_user(login("change@example.com", "test_password123"))
        .await
        .is_err());
    service
        .login_user(login("change@example.com", "another_password"))
        .await?;
    Ok(())
}

#[test_context(UserServiceContext)]
#[tokio::test]
#[ignore = "needs a MySQL server at ADMIN_DATABASE_URL"]
async fn test_two_factor_setup_and_disable(ctx: &UserServiceContext) -> Result<(), AppError> {
    let service = &ctx.user_service;
    let profile = service.register_user(registration("twofactor@example.com")).await?;

    let setup = service.setup_two_factor(profile.id).await?;
    assert!(!setup.secret.is_empty());

    let without_code = service
        .login_user(login("twofactor@example.com", "test_password123"))
        .await;
    assert!(matches!(without_code, Err(AppError::AuthError(m)) if m == "Two-factor code required"));

    let mut with_code = login("twofactor@example.com", "test_password123");
    with_code.two_factor_code = Some(setup.secret.clone());
    let response = service.login_user(with_code).await?;
    assert!(response.user.two_factor_enabled);

    service
        .disable_two_factor(
            profile.id,
            TwoFactorDisableRequest {
                password: "test_password123".to_string(),
                code: setup.secret,
            },
        )
        .await?;
    service
        .login_user(login("twofactor@example.com", "test_password123"))
        .await?;
    Ok(())
}

#[test_context(UserServiceContext)]
#[tokio::test]
#[ignore = "needs a MySQL server at ADMIN_DATABASE_URL"]
async fn test_admin_user_management(ctx: &UserServiceContext) -> Result<(), AppError> {
    let service = &ctx.user_service;
    let admin = service
        .create_user(CreateUserRequest {
            name: "Head Office".to_string(),
            email: "head@example.com".to_string(),
            password: "admin_password".to_string(),
            role: Role::SuperAdmin,
        })
        .await?;
    let manager = service
        .create_user(CreateUserRequest {
            name: "Depot Manager".to_string(),
            email: "depot@example.com".to_string(),
            password: "manager_password".to_string(),
            role: Role::Manager,
        })
        .await?;

    let managers = service.list_users(Some(Role::Manager)).await?;
    assert!(managers.iter().any(|u| u.id == manager.id));
    assert!(managers.iter().all(|u| u.role == Role::Manager));

    let demote_self = service
        .update_user(
            admin.id,
            admin.id,
            UpdateUserRequest {
                role: Some(Role::User),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(demote_self, Err(AppError::BadRequest(_))));

    let deactivated = service
        .update_user(
            admin.id,
            manager.id,
            UpdateUserRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
    assert!(!deactivated.is_active);

    let blocked = service
        .login_user(login("depot@example.com", "manager_password"))
        .await;
    assert!(matches!(blocked, Err(AppError::Forbidden(_))));

    assert!(matches!(
        service.delete_user(admin.id, admin.id).await,
        Err(AppError::BadRequest(_))
    ));
    service.delete_user(admin.id, manager.id).await?;
    assert!(matches!(
        service.get_profile(manager.id).await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}
