pub mod extract;
pub mod health;
pub mod pro_profile;
pub mod user;
pub mod validate;
pub mod webhook;
