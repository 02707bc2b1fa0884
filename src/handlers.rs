// src/handlers.rs

pub mod reports;
