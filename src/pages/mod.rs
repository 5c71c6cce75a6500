pub mod chat;
pub mod classifier;
pub mod home;
pub mod not_found;
