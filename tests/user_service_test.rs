#![allow(clippy::expect_used)]

mod common;

use chrono::{Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, TransactionTrait};
use uuid::Uuid;

use authorization_api::auth::password;
use authorization_api::config::DEFAULT_USERNAME_TIMEZONE;
use authorization_api::entities::{cart, role, user};
use authorization_api::error::AppError;
use authorization_api::services::{CustomerAttributes, NewUser, UserService};
use authorization_api::utils::is_generated_username;

fn new_user(email: &str) -> NewUser {
    NewUser {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: email.to_string(),
        ..Default::default()
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// create_user
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_generates_username_and_password() {
    let db = common::test_db().await;

    let created = UserService::create_user(&db, new_user("jane@example.com"), DEFAULT_USERNAME_TIMEZONE)
        .await
        .expect("create failed");

    assert!(is_generated_username(&created.username), "{}", created.username);
    assert!(created.password_hash.starts_with("$argon2id$"));
    assert_eq!(created.full_name(), "Jane Doe");
    assert!(!created.has_verified_email());
    assert!(!created.is_trashed());
}

#[tokio::test]
async fn create_user_keeps_explicit_username_and_password() {
    let db = common::test_db().await;

    let created = UserService::create_user(
        &db,
        NewUser {
            username: Some("  jane_doe ".to_string()),
            password: Some("Password123".to_string()),
            ..new_user("  Jane@Example.COM ")
        },
        DEFAULT_USERNAME_TIMEZONE,
    )
    .await
    .expect("create failed");

    assert_eq!(created.username, "jane_doe");
    assert_eq!(created.email, "jane@example.com");
    assert!(password::verify_password("Password123", &created.password_hash).unwrap_or(false));
}

#[tokio::test]
async fn blank_username_and_password_are_treated_as_absent() {
    let db = common::test_db().await;

    let mut created = Vec::new();
    for (i, blank) in ["", "   "].into_iter().enumerate() {
        let user_model = UserService::create_user(
            &db,
            NewUser {
                username: Some(blank.to_string()),
                password: Some(blank.to_string()),
                ..new_user(&format!("blank{i}@example.com"))
            },
            DEFAULT_USERNAME_TIMEZONE,
        )
        .await
        .expect("create failed");
        assert!(is_generated_username(&user_model.username), "{}", user_model.username);
        created.push(user_model);
    }
    assert_ne!(created[0].username, created[1].username);

    for (i, blank) in ["", "   "].into_iter().enumerate() {
        let login = UserService::verify_credentials(&db, &format!("blank{i}@example.com"), blank)
            .await
            .expect("verify failed");
        assert!(login.is_none());
    }
}

#[tokio::test]
async fn generated_usernames_are_distinct() {
    let db = common::test_db().await;

    let mut usernames = std::collections::HashSet::new();
    for i in 0..20 {
        let created = common::create_user(&db, &format!("user{i}@example.com")).await;
        assert!(usernames.insert(created.username));
    }
}

#[tokio::test]
async fn username_uniqueness_includes_soft_deleted_users() {
    let db = common::test_db().await;

    let first = UserService::create_user(
        &db,
        NewUser {
            username: Some("taken_name".to_string()),
            ..new_user("first@example.com")
        },
        DEFAULT_USERNAME_TIMEZONE,
    )
    .await
    .expect("create failed");
    UserService::soft_delete_user(&db, first.id)
        .await
        .expect("delete failed");

    assert!(
        UserService::username_exists(&db, "taken_name")
            .await
            .unwrap_or(false)
    );

    let result = UserService::create_user(
        &db,
        NewUser {
            username: Some("taken_name".to_string()),
            ..new_user("second@example.com")
        },
        DEFAULT_USERNAME_TIMEZONE,
    )
    .await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "{result:?}");
}

#[tokio::test]
async fn create_user_duplicate_email_is_conflict() {
    let db = common::test_db().await;
    common::create_user(&db, "dup@example.com").await;

    let result =
        UserService::create_user(&db, new_user("DUP@example.com"), DEFAULT_USERNAME_TIMEZONE)
            .await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "{result:?}");
}

// ──────────────────────────────────────────────────────────────────────────────
// Soft delete, restore, verification, credentials
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn soft_deleted_user_is_hidden_but_restorable() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "gone@example.com").await;

    let deleted = UserService::soft_delete_user(&db, created.id)
        .await
        .expect("delete failed");
    assert!(deleted.is_trashed());

    assert!(matches!(
        UserService::find_user(&db, created.id).await,
        Err(AppError::NotFound(_))
    ));
    let trashed = UserService::find_user_with_trashed(&db, created.id)
        .await
        .expect("row should still exist");
    assert!(trashed.deleted_at.is_some());

    let restored = UserService::restore_user(&db, created.id)
        .await
        .expect("restore failed");
    assert!(!restored.is_trashed());
    assert!(UserService::find_user(&db, created.id).await.is_ok());
}

#[tokio::test]
async fn operations_join_a_callers_transaction() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "txn@example.com").await;

    let txn = db.begin().await.expect("begin failed");
    UserService::get_or_create_active_cart(&txn, created.id)
        .await
        .expect("cart failed");
    UserService::mark_email_as_verified(&txn, created.id)
        .await
        .expect("verify failed");
    UserService::soft_delete_user(&txn, created.id)
        .await
        .expect("delete failed");
    txn.rollback().await.expect("rollback failed");

    let reloaded = UserService::find_user(&db, created.id)
        .await
        .expect("user should survive rollback");
    assert!(!reloaded.has_verified_email());
    assert!(
        UserService::active_cart(&db, created.id)
            .await
            .expect("lookup failed")
            .is_none()
    );
}

#[tokio::test]
async fn mark_email_as_verified_is_stable() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "verify@example.com").await;

    let first = UserService::mark_email_as_verified(&db, created.id)
        .await
        .expect("verify failed");
    assert!(first.has_verified_email());

    let second = UserService::mark_email_as_verified(&db, created.id)
        .await
        .expect("verify failed");
    assert_eq!(first.email_verified_at, second.email_verified_at);
}

#[tokio::test]
async fn verify_credentials() {
    let db = common::test_db().await;
    let created = UserService::create_user(
        &db,
        NewUser {
            password: Some("Password123".to_string()),
            ..new_user("login@example.com")
        },
        DEFAULT_USERNAME_TIMEZONE,
    )
    .await
    .expect("create failed");

    let found = UserService::verify_credentials(&db, "LOGIN@example.com", "Password123")
        .await
        .expect("lookup failed");
    assert_eq!(found.map(|u| u.id), Some(created.id));

    let wrong = UserService::verify_credentials(&db, "login@example.com", "Password124")
        .await
        .expect("lookup failed");
    assert!(wrong.is_none());

    let unknown = UserService::verify_credentials(&db, "nobody@example.com", "Password123")
        .await
        .expect("lookup failed");
    assert!(unknown.is_none());

    UserService::soft_delete_user(&db, created.id)
        .await
        .expect("delete failed");
    let trashed = UserService::verify_credentials(&db, "login@example.com", "Password123")
        .await
        .expect("lookup failed");
    assert!(trashed.is_none());
}

// ──────────────────────────────────────────────────────────────────────────────
// Carts
// ──────────────────────────────────────────────────────────────────────────────

async fn insert_cart(
    db: &sea_orm::DatabaseConnection,
    user_id: Uuid,
    active: bool,
    age: Duration,
) -> cart::Model {
    let created_at = (Utc::now() - age).fixed_offset();
    cart::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        active: Set(active),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
    .expect("failed to insert cart")
}

#[tokio::test]
async fn get_or_create_active_cart_is_idempotent() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "cart@example.com").await;

    let first = UserService::get_or_create_active_cart(&db, created.id)
        .await
        .expect("cart failed");
    let second = UserService::get_or_create_active_cart(&db, created.id)
        .await
        .expect("cart failed");

    assert_eq!(first.id, second.id);
    assert!(first.active);
    assert_eq!(first.user_id, created.id);
    assert_eq!(cart::Entity::find().count(&db).await.unwrap_or_default(), 1);
}

#[tokio::test]
async fn active_cart_prefers_most_recent_and_ignores_inactive() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "carts@example.com").await;

    insert_cart(&db, created.id, true, Duration::hours(3)).await;
    let newest_active = insert_cart(&db, created.id, true, Duration::hours(2)).await;
    insert_cart(&db, created.id, false, Duration::hours(1)).await;

    let found = UserService::get_or_create_active_cart(&db, created.id)
        .await
        .expect("cart failed");
    assert_eq!(found.id, newest_active.id);
    assert_eq!(cart::Entity::find().count(&db).await.unwrap_or_default(), 3);
}

#[tokio::test]
async fn inactive_carts_lead_to_a_new_cart() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "old@example.com").await;
    let old = insert_cart(&db, created.id, false, Duration::hours(1)).await;

    assert!(
        UserService::active_cart(&db, created.id)
            .await
            .expect("lookup failed")
            .is_none()
    );

    let fresh = UserService::get_or_create_active_cart(&db, created.id)
        .await
        .expect("cart failed");
    assert_ne!(fresh.id, old.id);
    assert!(fresh.active);
}

#[tokio::test]
async fn active_cart_for_unknown_user_is_not_found() {
    let db = common::test_db().await;

    let result = UserService::get_or_create_active_cart(&db, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

// ──────────────────────────────────────────────────────────────────────────────
// Roles
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn promote_to_customer_grants_role_and_creates_customer() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "buyer@example.com").await;

    let customer = UserService::promote_to_customer(
        &db,
        created.id,
        CustomerAttributes {
            phone: Some("555-0100".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("promotion failed");

    assert_eq!(customer.user_id, created.id);
    assert_eq!(customer.phone.as_deref(), Some("555-0100"));
    assert!(
        UserService::has_role(&db, created.id, role::CUSTOMER)
            .await
            .unwrap_or(false)
    );
}

#[tokio::test]
async fn promote_to_customer_twice_keeps_one_role() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "repeat@example.com").await;

    for _ in 0..2 {
        UserService::promote_to_customer(&db, created.id, CustomerAttributes::default())
            .await
            .expect("promotion failed");
    }

    let roles = UserService::role_names(&db, created.id)
        .await
        .expect("roles failed");
    assert_eq!(roles, vec!["Customer".to_string()]);
    assert_eq!(role::Entity::find().count(&db).await.unwrap_or_default(), 1);

    let customers = created.customers(&db).await.expect("customers failed");
    assert_eq!(customers.len(), 2);
}

#[tokio::test]
async fn failed_promotion_rolls_back_role() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "rollback@example.com").await;

    // No such location: the customer insert violates its foreign key
    let result = UserService::promote_to_customer(
        &db,
        created.id,
        CustomerAttributes {
            location_id: Some(Uuid::new_v4()),
            phone: None,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Conflict(_))), "{result:?}");
    assert!(
        !UserService::has_role(&db, created.id, role::CUSTOMER)
            .await
            .unwrap_or(true)
    );
    assert_eq!(role::Entity::find().count(&db).await.unwrap_or_default(), 0);
}

#[tokio::test]
async fn role_names_are_case_sensitive() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "roles@example.com").await;

    UserService::assign_role(&db, created.id, "Manager")
        .await
        .expect("assign failed");
    UserService::assign_role(&db, created.id, "Manager")
        .await
        .expect("assign failed");

    assert!(UserService::has_role(&db, created.id, "Manager").await.unwrap_or(false));
    assert!(!UserService::has_role(&db, created.id, "manager").await.unwrap_or(true));
    assert!(!UserService::has_role(&db, created.id, role::CUSTOMER).await.unwrap_or(true));
}

#[tokio::test]
async fn password_hash_is_never_serialized() {
    let db = common::test_db().await;
    let created = common::create_user(&db, "hidden@example.com").await;

    let stored = user::Entity::find_by_id(created.id)
        .one(&db)
        .await
        .expect("lookup failed")
        .expect("user missing");
    let json = serde_json::to_value(&stored).unwrap_or_default();

    assert!(json.get("password_hash").is_none());
    assert_eq!(json["username"], created.username);
}
