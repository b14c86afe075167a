//! Community - a small bulletin board
//!
//! Boards hold articles; articles carry comments, images and hashtags.
//! Mutations are gated by a per-row password instead of user accounts.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
