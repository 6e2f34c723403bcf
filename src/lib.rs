// Strava Token - Library root for testing

pub mod auth;
pub mod config;
pub mod error;
