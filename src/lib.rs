// src/lib.rs
pub mod analysis;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod frontend;
pub mod pipeline;
pub mod reduce;
pub mod report;
pub mod tokens;
