//! Kernel Discovery Module
//!
//! Handles interactions with the package database, including:
//! - The database seam (libalpm and in-memory backends)
//! - Kernel enumeration and headers correlation

pub mod database;
pub mod manager;
pub mod memory;
