//! Authorization API - user accounts for the commerce platform
//!
//! This crate owns the user record and the behaviour attached to it:
//! - Account creation with generated unique usernames and hashed credentials
//! - Soft delete, restore and email verification
//! - Active-cart lookup or creation
//! - Promotion of a user to the `Customer` role
//! - Navigation to the records other modules keep about a user

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
