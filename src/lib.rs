// src/lib.rs
pub mod api;
pub mod controller;
pub mod errors;
pub mod picker;
pub mod state;
pub mod types;
