// src/pipeline/aggregate.rs

//! Multi-source rating aggregation.
//!
//! Both sources are queried concurrently for the same set of teachers. A
//! source contributes only when its whole call succeeded; the aggregation as a
//! whole fails only when neither did.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{
    Config, MergedRating, NumericRating, PLACEHOLDER, PollDistribution, RatingSource, TeacherName,
};
use crate::services::{PollBoardClient, RatingSiteClient};
use crate::utils::http::Transport;

/// Queries both rating sources and merges their answers per teacher.
pub struct Aggregator {
    poll_board: PollBoardClient,
    rating_site: RatingSiteClient,
}

impl Aggregator {
    pub fn new(poll_board: PollBoardClient, rating_site: RatingSiteClient) -> Self {
        Self {
            poll_board,
            rating_site,
        }
    }

    /// Build both source clients over a shared transport.
    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let concurrency = config.transport.max_concurrent;
        let poll_board =
            PollBoardClient::new(Arc::clone(&transport), &config.poll_board, concurrency);
        let rating_site = RatingSiteClient::new(transport, &config.rating_site, concurrency)?;
        Ok(Self::new(poll_board, rating_site))
    }

    /// Merged ratings for exactly the requested teachers.
    ///
    /// Teachers a source has nothing for get the placeholder in that slot.
    /// Returns `AppError::BothSourcesFailed` when neither source succeeded.
    pub async fn aggregate(
        &self,
        names: &[TeacherName],
    ) -> Result<BTreeMap<TeacherName, MergedRating>> {
        log::info!("Fetching ratings for {} teachers", names.len());

        let (polls, ratings) = tokio::join!(
            self.poll_board.ratings_for(names),
            self.rating_site.ratings_for(names),
        );

        let polls = accept(RatingSource::PollBoard, polls);
        let ratings = accept(RatingSource::RatingSite, ratings);
        if polls.is_none() && ratings.is_none() {
            return Err(AppError::BothSourcesFailed);
        }

        Ok(merge(names, polls.as_ref(), ratings.as_ref()))
    }
}

/// Keep a source's map only if the whole call succeeded.
fn accept<T>(source: RatingSource, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            log::warn!("{} unavailable: {}", source, error);
            None
        }
    }
}

/// Build one record per requested name from whatever the sources returned.
pub fn merge(
    names: &[TeacherName],
    polls: Option<&HashMap<TeacherName, PollDistribution>>,
    ratings: Option<&HashMap<TeacherName, NumericRating>>,
) -> BTreeMap<TeacherName, MergedRating> {
    names
        .iter()
        .map(|name| {
            let poll_board = polls
                .and_then(|polls| polls.get(name))
                .map_or_else(|| PLACEHOLDER.to_string(), PollDistribution::formatted);
            let rating_site = ratings
                .and_then(|ratings| ratings.get(name))
                .map_or_else(|| PLACEHOLDER.to_string(), NumericRating::to_string);
            (
                name.clone(),
                MergedRating {
                    poll_board,
                    rating_site,
                },
            )
        })
        .collect()
}
