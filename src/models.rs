// src/models.rs

pub mod metrics;
pub mod raw;
pub mod report;
pub mod theme;
