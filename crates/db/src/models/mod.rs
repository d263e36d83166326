//! Row models and DTOs shared by the repositories and the store.

pub mod booking;
pub mod user;
