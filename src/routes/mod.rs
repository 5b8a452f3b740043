//! API Routes

pub mod admin;
pub mod auth;
pub mod complaints;
pub mod health;
