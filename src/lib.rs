// src/lib.rs

//! Teacher ratings aggregator library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
