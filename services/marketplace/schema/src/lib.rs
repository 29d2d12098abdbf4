//! sea-orm entities for the marketplace database.

pub mod pro_profiles;
pub mod processed_webhook_events;
pub mod users;
