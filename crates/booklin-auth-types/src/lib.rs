//! Auth types shared across Booklin services.
//!
//! Sessions are authenticated by Clerk at the gateway; services only read the
//! identity the gateway forwards.

pub mod identity;
