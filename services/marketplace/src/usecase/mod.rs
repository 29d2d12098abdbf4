pub mod pro_profile;
pub mod user;
pub mod webhook;
