//! Service layer for the ratings aggregator.
//!
//! This module contains the clients for:
//! - The VK poll board (`PollBoardClient`)
//! - professorrating.org (`RatingSiteClient`)
//! - The faculty listing pages (`ListingClient`)

mod listing;
mod poll_board;
mod rating_site;

pub use listing::{ListingClient, parse_departments, parse_teachers};
pub use poll_board::{PollBoardClient, TopicIndex};
pub use rating_site::RatingSiteClient;
