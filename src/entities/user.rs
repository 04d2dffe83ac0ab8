use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder};
use serde::{Deserialize, Serialize};

use super::{
    alternate_email, block, cart, contact, customer, location, note, participant, post, role,
    voucher,
};

/// Value stored in `note.noteable_type` for notes attached to a user.
pub const NOTEABLE_TYPE: &str = "user";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_verified_at: Option<DateTimeWithTimeZone>,
    pub stripe_id: Option<String>,
    pub pm_type: Option<String>,
    pub pm_last_four: Option<String>,
    pub trial_ends_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cart::Entity")]
    Carts,
    #[sea_orm(has_many = "super::customer::Entity")]
    Customers,
    #[sea_orm(has_many = "super::participant::Entity")]
    Participants,
    #[sea_orm(has_many = "super::contact::Entity")]
    Contacts,
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
    #[sea_orm(has_many = "super::block::Entity")]
    Blocks,
    #[sea_orm(has_many = "super::note::Entity")]
    NotesCreated,
    #[sea_orm(has_many = "super::voucher::Entity")]
    VouchersCreated,
    #[sea_orm(has_many = "super::alternate_email::Entity")]
    AlternateEmails,
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,
    #[sea_orm(has_many = "super::location_user::Entity")]
    LocationUsers,
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Carts.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::block::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blocks.def()
    }
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NotesCreated.def()
    }
}

impl Related<super::voucher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VouchersCreated.def()
    }
}

impl Related<super::alternate_email::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlternateEmails.def()
    }
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl Related<super::location_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocationUsers.def()
    }
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::User.def().rev())
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        super::location_user::Relation::Location.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::location_user::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// First and last name joined by a single space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub const fn has_verified_email(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Whether the account has been soft-deleted.
    #[must_use]
    pub const fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether a customer record exists at the payment provider.
    #[must_use]
    pub const fn has_payment_customer(&self) -> bool {
        self.stripe_id.is_some()
    }

    /// Whether the account's trial period is still running at `now`.
    #[must_use]
    pub fn on_trial(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.trial_ends_at.is_some_and(|ends_at| ends_at > now)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Relationship navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Locations the user is attached to through `location_user`.
    pub async fn locations<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<location::Model>, DbErr> {
        self.find_related(location::Entity)
            .order_by_asc(location::Column::Name)
            .all(db)
            .await
    }

    /// Locations where the user is the manager.
    pub async fn managed_locations<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<location::Model>, DbErr> {
        location::Entity::find()
            .filter(location::Column::ManagerId.eq(self.id))
            .order_by_asc(location::Column::Name)
            .all(db)
            .await
    }

    pub async fn customers<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<customer::Model>, DbErr> {
        self.find_related(customer::Entity)
            .order_by_asc(customer::Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn participants<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<participant::Model>, DbErr> {
        self.find_related(participant::Entity).all(db).await
    }

    /// Notes written about this user (polymorphic `noteable` target).
    pub async fn notes<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<note::Model>, DbErr> {
        note::Entity::find()
            .filter(note::Column::NoteableType.eq(NOTEABLE_TYPE))
            .filter(note::Column::NoteableId.eq(self.id))
            .order_by_asc(note::Column::CreatedAt)
            .all(db)
            .await
    }

    /// Notes authored by this user, whatever they are attached to.
    pub async fn notes_created<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<note::Model>, DbErr> {
        self.find_related(note::Entity)
            .order_by_asc(note::Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn contacts<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<contact::Model>, DbErr> {
        self.find_related(contact::Entity).all(db).await
    }

    pub async fn posts<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<post::Model>, DbErr> {
        self.find_related(post::Entity).all(db).await
    }

    pub async fn blocks<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<block::Model>, DbErr> {
        self.find_related(block::Entity).all(db).await
    }

    pub async fn vouchers_created<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<voucher::Model>, DbErr> {
        self.find_related(voucher::Entity).all(db).await
    }

    /// Every cart the user has owned, newest first.
    pub async fn carts<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<cart::Model>, DbErr> {
        self.find_related(cart::Entity)
            .order_by_desc(cart::Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn alternate_emails<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<alternate_email::Model>, DbErr> {
        self.find_related(alternate_email::Entity).all(db).await
    }

    pub async fn roles<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<role::Model>, DbErr> {
        self.find_related(role::Entity)
            .order_by_asc(role::Column::Name)
            .all(db)
            .await
    }
}
