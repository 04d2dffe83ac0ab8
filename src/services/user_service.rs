use chrono::Utc;
use chrono_tz::Tz;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::auth::password;
use crate::entities::{cart, customer, role, user, user_role};
use crate::error::AppError;
use crate::utils::generate_username;

/// Maximum attempts to generate a unique username
const MAX_USERNAME_GENERATION_ATTEMPTS: u32 = 10;

/// Attributes for a new account.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Generated when `None` or blank.
    pub username: Option<String>,
    /// A random password is hashed when `None` or blank.
    pub password: Option<String>,
}

/// Attributes of the customer record created by [`UserService::promote_to_customer`].
#[derive(Debug, Clone, Default)]
pub struct CustomerAttributes {
    pub location_id: Option<Uuid>,
    pub phone: Option<String>,
}

pub struct UserService;

impl UserService {
    /// Create a new account.
    ///
    /// Assigns a generated unique username when none is given and hashes a
    /// random credential when no password is given.
    ///
    /// # Errors
    ///
    /// [`AppError::Conflict`] when the email or an explicit username is already
    /// taken, [`AppError::Internal`] when no free username could be generated
    /// or hashing fails.
    pub async fn create_user<C: ConnectionTrait>(
        db: &C,
        new_user: NewUser,
        tz: Tz,
    ) -> Result<user::Model, AppError> {
        let username = match new_user.username.filter(|s| !s.trim().is_empty()) {
            Some(username) => username.trim().to_string(),
            None => Self::generate_unique_username(db, tz).await?,
        };

        let supplied_password = new_user.password.filter(|s| !s.trim().is_empty());
        let generated_password = supplied_password.is_none();
        let plain = supplied_password.unwrap_or_else(password::random_password);
        let password_hash = password::hash_password(&plain)?;

        let now = Utc::now().fixed_offset();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(new_user.first_name.trim().to_string()),
            last_name: Set(new_user.last_name.trim().to_string()),
            email: Set(normalize_email(&new_user.email)),
            username: Set(username),
            password_hash: Set(password_hash),
            email_verified_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let created = model.insert(db).await.map_err(AppError::from_db)?;

        tracing::info!(
            user_id = %created.id,
            username = %created.username,
            generated_password,
            "User created"
        );

        Ok(created)
    }

    /// Generate a username that no account (soft-deleted ones included) holds yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] after `MAX_USERNAME_GENERATION_ATTEMPTS`
    /// collisions or on a storage error.
    pub async fn generate_unique_username<C: ConnectionTrait>(
        db: &C,
        tz: Tz,
    ) -> Result<String, AppError> {
        Self::generate_unique_username_with(db, || generate_username(Utc::now(), tz)).await
    }

    async fn generate_unique_username_with<C, F>(
        db: &C,
        mut candidates: F,
    ) -> Result<String, AppError>
    where
        C: ConnectionTrait,
        F: FnMut() -> String,
    {
        for attempt in 1..=MAX_USERNAME_GENERATION_ATTEMPTS {
            let candidate = candidates();

            if !Self::username_exists(db, &candidate).await? {
                return Ok(candidate);
            }

            tracing::debug!(attempt, username = %candidate, "Generated username taken, retrying");
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "Failed to generate unique username after {MAX_USERNAME_GENERATION_ATTEMPTS} attempts"
        )))
    }

    /// Whether any account, including soft-deleted ones, holds `username`.
    pub async fn username_exists<C: ConnectionTrait>(
        db: &C,
        username: &str,
    ) -> Result<bool, AppError> {
        let count = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    /// Find an account that has not been soft-deleted.
    pub async fn find_user<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))
    }

    /// Find an account whether or not it has been soft-deleted.
    pub async fn find_user_with_trashed<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))
    }

    /// Mark an account as deleted without removing the row.
    pub async fn soft_delete_user<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<user::Model, AppError> {
        let user_model = Self::find_user(db, id).await?;

        let now = Utc::now().fixed_offset();
        let mut active: user::ActiveModel = user_model.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(db).await?;

        tracing::info!(user_id = %id, "User soft-deleted");
        Ok(updated)
    }

    /// Undo a soft delete. Restoring an account that is not deleted is a no-op.
    pub async fn restore_user<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<user::Model, AppError> {
        let user_model = Self::find_user_with_trashed(db, id).await?;
        if !user_model.is_trashed() {
            return Ok(user_model);
        }

        let mut active: user::ActiveModel = user_model.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(db).await?;

        tracing::info!(user_id = %id, "User restored");
        Ok(updated)
    }

    /// Record the email verification time. Already verified accounts keep their timestamp.
    pub async fn mark_email_as_verified<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
    ) -> Result<user::Model, AppError> {
        let user_model = Self::find_user(db, id).await?;
        if user_model.has_verified_email() {
            return Ok(user_model);
        }

        let now = Utc::now().fixed_offset();
        let mut active: user::ActiveModel = user_model.into();
        active.email_verified_at = Set(Some(now));
        active.updated_at = Set(now);
        Ok(active.update(db).await?)
    }

    /// Look up an account by email and check its password.
    ///
    /// Returns `None` for unknown emails, soft-deleted accounts and wrong passwords.
    pub async fn verify_credentials<C: ConnectionTrait>(
        db: &C,
        email: &str,
        plain_password: &str,
    ) -> Result<Option<user::Model>, AppError> {
        let Some(user_model) = user::Entity::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .filter(user::Column::DeletedAt.is_null())
            .one(db)
            .await?
        else {
            return Ok(None);
        };

        if password::verify_password(plain_password, &user_model.password_hash)? {
            Ok(Some(user_model))
        } else {
            Ok(None)
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Carts
    // ─────────────────────────────────────────────────────────────────────────

    /// The most recently created active cart of a user, if any.
    pub async fn active_cart<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> Result<Option<cart::Model>, AppError> {
        Ok(cart::Entity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .filter(cart::Column::Active.eq(true))
            .order_by_desc(cart::Column::CreatedAt)
            .one(db)
            .await?)
    }

    /// Return the user's active cart, creating an empty one if there is none.
    ///
    /// Repeated calls return the same cart while it stays active.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] if the user does not exist or is soft-deleted.
    pub async fn get_or_create_active_cart<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> Result<cart::Model, AppError> {
        let user_model = Self::find_user(db, user_id).await?;

        if let Some(existing) = Self::active_cart(db, user_model.id).await? {
            return Ok(existing);
        }

        let now = Utc::now().fixed_offset();
        let created = cart::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_model.id),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(AppError::from_db)?;

        tracing::info!(user_id = %user_model.id, cart_id = %created.id, "Active cart created");
        Ok(created)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Roles
    // ─────────────────────────────────────────────────────────────────────────

    /// Grant the `Customer` role and create a customer record linked to the user.
    ///
    /// Both writes happen in one transaction. Calling this again for the same
    /// user keeps a single role assignment and adds another customer record.
    pub async fn promote_to_customer(
        db: &DatabaseConnection,
        user_id: Uuid,
        attributes: CustomerAttributes,
    ) -> Result<customer::Model, AppError> {
        let txn = db.begin().await?;

        let user_model = Self::find_user(&txn, user_id).await?;
        Self::assign_role(&txn, user_model.id, role::CUSTOMER).await?;

        let now = Utc::now().fixed_offset();
        let created = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_model.id),
            location_id: Set(attributes.location_id),
            phone: Set(attributes.phone),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(AppError::from_db)?;

        txn.commit().await?;

        tracing::info!(user_id = %user_model.id, customer_id = %created.id, "User promoted to customer");
        Ok(created)
    }

    /// Assign the role named `name`, creating the role if it does not exist yet.
    pub async fn assign_role<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        name: &str,
    ) -> Result<role::Model, AppError> {
        let role_model = Self::find_or_create_role(db, name).await?;

        let assigned = user_role::Entity::find_by_id((user_id, role_model.id))
            .one(db)
            .await?;

        if assigned.is_none() {
            user_role::ActiveModel {
                user_id: Set(user_id),
                role_id: Set(role_model.id),
            }
            .insert(db)
            .await
            .map_err(AppError::from_db)?;

            tracing::debug!(user_id = %user_id, role = %role_model.name, "Role assigned");
        }

        Ok(role_model)
    }

    async fn find_or_create_role<C: ConnectionTrait>(
        db: &C,
        name: &str,
    ) -> Result<role::Model, AppError> {
        let existing = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(db)
            .await?;

        if let Some(role_model) = existing {
            return Ok(role_model);
        }

        role::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(db)
        .await
        .map_err(AppError::from_db)
    }

    /// Whether the user holds the role named `name` (case-sensitive).
    pub async fn has_role<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
        name: &str,
    ) -> Result<bool, AppError> {
        let count = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .inner_join(user_role::Entity)
            .filter(user_role::Column::UserId.eq(user_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    /// Names of every role the user holds, sorted.
    pub async fn role_names<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> Result<Vec<String>, AppError> {
        let user_model = Self::find_user(db, user_id).await?;
        let roles = user_model.roles(db).await?;
        Ok(roles.into_iter().map(|r| r.name).collect())
    }
}

/// Emails are stored trimmed and lower-cased.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
