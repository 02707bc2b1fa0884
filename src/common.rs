// src/common.rs

pub mod error;
pub mod fields;
pub mod format;
