pub mod pro_profile;
pub mod repository;
pub mod user;
pub mod webhook;
