pub mod alternate_email;
pub mod block;
pub mod cart;
pub mod contact;
pub mod customer;
pub mod location;
pub mod location_user;
pub mod note;
pub mod participant;
pub mod post;
pub mod role;
pub mod user;
pub mod user_role;
pub mod voucher;
