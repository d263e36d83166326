//! HTTP handler functions, grouped by resource.

pub mod admin;
pub mod auth;
pub mod booking;
pub mod trainer;
