// src/models/mod.rs

//! Domain models for the ratings aggregator.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod poll;
mod rating;
mod teacher;

// Re-export all public types
pub use config::{
    Config, DEFAULT_PAGE_COUNT, ListingConfig, OutputConfig, PollBoardConfig, RatingSiteConfig,
    TransportConfig,
};
pub use poll::{PollDistribution, Sentiment};
pub use rating::{MergedRating, NumericRating, PLACEHOLDER, PageCount, PageOrigin, RatingSource};
pub use teacher::{TeacherAttributes, TeacherName, canonicalize_yo};
