//! Domain value types shared across Booklin services.
//!
//! Pure value objects with no framework dependencies. Parsing is the only
//! way to build one, so a held value is always valid.

pub mod email;
pub mod pro_profile;
pub mod siret;
pub mod user;
