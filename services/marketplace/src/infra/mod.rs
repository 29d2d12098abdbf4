pub mod db;
pub mod svix;
