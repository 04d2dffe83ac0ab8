pub mod username;

pub use username::{generate_username, is_generated_username};
