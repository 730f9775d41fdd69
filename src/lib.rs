//! Outfit recommendation service
//!
//! Scores wardrobe items against per-day weather and scenario context,
//! assembles rule-based outfits, and reconciles untrusted AI-generated
//! proposals into valid, non-conflicting suggestions.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
