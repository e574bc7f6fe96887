//! 用户管理与登录测试

mod common;

use common::TestApp;
use halcon_auth_core::Role;
use halcon_errors::AppError;
use halcon_config::SeedConfig;
use order_tracking::application::{CreateUserCommand, LoginRequest, UpdateUserCommand, seed_admin};

fn new_user(username: &str, role: Role) -> CreateUserCommand {
    CreateUserCommand {
        username: username.to_string(),
        password: "secret123".to_string(),
        role: Some(role),
        department: "Logistics".to_string(),
        full_name: "Ana Pérez".to_string(),
        email: "ana@example.com".to_string(),
    }
}

fn login(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_admin_manages_users() {
    let app = TestApp::new();
    let admin = app.staff("admin", Role::Admin).await;

    let created = app.users.create(&admin, new_user("route1", Role::Route)).await.unwrap();
    assert_eq!(created.role, Role::Route);
    assert!(created.is_active);

    let listed = app.users.list(&admin).await.unwrap();
    assert_eq!(listed.len(), 2);

    // 空串与缺省字段不覆盖原值
    let updated = app
        .users
        .update(
            &admin,
            created.id,
            UpdateUserCommand {
                full_name: Some(String::new()),
                department: Some("Fleet".to_string()),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name, "Ana Pérez");
    assert_eq!(updated.department, "Fleet");
    assert!(!updated.is_active);

    app.users.delete(&admin, created.id).await.unwrap();
    assert!(matches!(
        app.users.get(&admin, created.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(app.user_repo.get(&created.id).unwrap().is_deleted());
}

#[tokio::test]
async fn test_user_management_is_admin_only() {
    let app = TestApp::new();
    let sales = app.staff("sales1", Role::Sales).await;

    let err = app.users.list(&sales).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = app
        .users
        .create(&sales, new_user("x", Role::Route))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_create_user_validation() {
    let app = TestApp::new();
    let admin = app.staff("admin", Role::Admin).await;

    let err = app
        .users
        .create(&admin, new_user("admin", Role::Sales))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let short = CreateUserCommand {
        password: "12345".to_string(),
        ..new_user("shorty", Role::Sales)
    };
    let err = app.users.create(&admin, short).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let no_role = CreateUserCommand {
        role: None,
        ..new_user("norole", Role::Sales)
    };
    let err = app.users.create(&admin, no_role).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_login_success_and_uniform_failures() {
    let app = TestApp::new();
    let admin = app.staff("admin", Role::Admin).await;
    let user = app
        .users
        .create(&admin, new_user("warehouse1", Role::Warehouse))
        .await
        .unwrap();

    let response = app.auth.login(login("warehouse1", "secret123")).await.unwrap();
    assert_eq!(response.user.username, "warehouse1");
    assert_eq!(response.user.role, Role::Warehouse);
    let claims = app.tokens.verify(&response.token).unwrap();
    assert_eq!(claims.sub, user.id.to_string());

    let wrong_password = app.auth.login(login("warehouse1", "nope")).await.unwrap_err();
    let unknown_user = app.auth.login(login("ghost", "secret123")).await.unwrap_err();
    for err in [wrong_password, unknown_user] {
        match err {
            AppError::Unauthorized(msg) => assert_eq!(msg, "invalid credentials"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    app.users
        .update(
            &admin,
            user.id,
            UpdateUserCommand {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let inactive = app.auth.login(login("warehouse1", "secret123")).await.unwrap_err();
    assert!(matches!(inactive, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_current_user_profile() {
    let app = TestApp::new();
    let route = app.staff("route1", Role::Route).await;

    let profile = app.auth.current_user(&route).await.unwrap();
    assert_eq!(profile.id, route.user_id);
    assert_eq!(profile.role, Role::Route);
}

#[tokio::test]
async fn test_seed_admin_runs_once() {
    let app = TestApp::new();
    let config = SeedConfig::default();

    assert!(seed_admin(app.user_repo.as_ref(), &config).await.unwrap());
    assert!(!seed_admin(app.user_repo.as_ref(), &config).await.unwrap());

    let response = app.auth.login(login("admin", "admin123")).await.unwrap();
    assert_eq!(response.user.role, Role::Admin);
}

#[tokio::test]
async fn test_seed_admin_disabled() {
    let app = TestApp::new();
    let config = SeedConfig {
        enabled: false,
        ..Default::default()
    };

    assert!(!seed_admin(app.user_repo.as_ref(), &config).await.unwrap());
    assert!(app.auth.login(login("admin", "admin123")).await.is_err());
}

#[tokio::test]
async fn test_unreadable_stored_hash_fails_uniformly() {
    let app = TestApp::new();
    // staff() 写入的是无法解析的占位哈希
    app.staff("legacy", Role::Sales).await;

    match app.auth.login(login("legacy", "secret123")).await.unwrap_err() {
        AppError::Unauthorized(msg) => assert_eq!(msg, "invalid credentials"),
        other => panic!("unexpected error: {other:?}"),
    }
}
