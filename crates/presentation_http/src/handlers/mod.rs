//! HTTP request handlers

pub mod digest;
pub mod health;
