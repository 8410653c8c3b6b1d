//! Yet Another Diet Assistant (YADA) Library
//!
//! Food catalog, recursive calorie resolution, daily intake log with undo,
//! and profile-based calorie targets.

pub mod build_info;
pub mod config;
pub mod console;
pub mod error;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod storage;
pub mod tools;
pub mod tracker;
