// Keepsake client - networking core for the Keepsake digital-legacy service

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod models;
