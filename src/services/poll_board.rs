//! Poll board service.
//!
//! Every teacher has a topic on the VK community board, and the topic's poll
//! carries the vote breakdown. Topics are enumerated page by page, resolved by
//! title and their polls fetched concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{PollBoardConfig, PollDistribution, RatingSource, Sentiment, TeacherName};
use crate::utils::http::{Params, Transport, endpoint};

const GET_TOPICS: &str = "board.getTopics";
const GET_COMMENTS: &str = "board.getComments";

/// Topic title to topic id, built fresh for every lookup.
pub type TopicIndex = HashMap<TeacherName, u64>;

/// VK API reply: either `response` or `error` is set.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<T>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error_code: i64,
    #[serde(default)]
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct TopicsPage {
    count: u32,
    #[serde(default)]
    items: Vec<Topic>,
}

#[derive(Debug, Deserialize)]
struct Topic {
    id: u64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct Comments {
    poll: Option<Poll>,
}

#[derive(Debug, Deserialize)]
struct Poll {
    votes: u64,
    #[serde(default)]
    answers: Vec<PollAnswer>,
}

#[derive(Debug, Deserialize)]
struct PollAnswer {
    text: String,
    rate: f64,
}

/// Client for the teacher poll board.
pub struct PollBoardClient {
    transport: Arc<dyn Transport>,
    config: PollBoardConfig,
    concurrency: usize,
}

impl PollBoardClient {
    /// Create a new poll board client.
    pub fn new(transport: Arc<dyn Transport>, config: &PollBoardConfig, concurrency: usize) -> Self {
        Self {
            transport,
            config: config.clone(),
            concurrency: concurrency.max(1),
        }
    }

    /// Poll distributions for the requested teachers.
    ///
    /// Teachers without a topic, without a poll, or whose poll cannot be
    /// understood are left out. Fails when topic discovery fails or when no
    /// teacher ends up with a rating.
    pub async fn ratings_for(
        &self,
        names: &[TeacherName],
    ) -> Result<HashMap<TeacherName, PollDistribution>> {
        let topics = self.discover_topics().await?;

        let jobs: Vec<(&TeacherName, u64)> = names
            .iter()
            .filter_map(|name| topics.get(name).map(|id| (name, *id)))
            .collect();
        log::debug!(
            "{} of {} teachers have a board topic",
            jobs.len(),
            names.len()
        );

        let mut polls = stream::iter(jobs)
            .map(|(name, topic_id)| async move { (name, self.fetch_poll(topic_id).await) })
            .buffer_unordered(self.concurrency);

        let mut ratings = HashMap::new();
        while let Some((name, result)) = polls.next().await {
            match result {
                Ok(Some(poll)) => {
                    ratings.insert(name.clone(), poll);
                }
                Ok(None) => log::debug!("No poll in topic of {}", name),
                Err(error) => log::warn!("Skipping poll of {}: {}", name, error),
            }
        }

        if ratings.is_empty() {
            return Err(AppError::EmptyResult(RatingSource::PollBoard));
        }
        log::info!("Poll board: {} ratings collected", ratings.len());
        Ok(ratings)
    }

    /// Enumerate every board topic.
    ///
    /// The first request only learns the topic count; pages of
    /// `page_size` topics are then requested concurrently. A single failed
    /// page fails the whole discovery.
    pub async fn discover_topics(&self) -> Result<TopicIndex> {
        let total = self
            .fetch_topics(0, 0)
            .await
            .map_err(AppError::discovery)?
            .count;

        let page_size = self.config.page_size.max(1);
        let offsets: Vec<u32> = (0..total).step_by(page_size as usize).collect();
        log::debug!("Board has {} topics in {} pages", total, offsets.len());

        let pages: Vec<TopicsPage> = stream::iter(offsets)
            .map(|offset| self.fetch_topics(offset, page_size))
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await
            .map_err(AppError::discovery)?;

        Ok(pages
            .into_iter()
            .flat_map(|page| page.items)
            .map(|topic| (TeacherName::new(&topic.title), topic.id))
            .collect())
    }

    /// Fetch and interpret the poll of one topic.
    ///
    /// `Ok(None)` means the topic simply has no poll.
    pub async fn fetch_poll(&self, topic_id: u64) -> Result<Option<PollDistribution>> {
        let mut params = self.base_params();
        params.push(("topic_id", topic_id.to_string()));
        params.push(("count", "0".to_string()));

        let comments: Comments = self.call(GET_COMMENTS, params).await?;
        let Some(poll) = comments.poll else {
            return Ok(None);
        };

        let mut distribution = PollDistribution {
            total: poll.votes,
            ..PollDistribution::default()
        };
        for answer in poll.answers {
            let sentiment = Sentiment::classify(&answer.text)
                .ok_or(AppError::UnparseableLabel { label: answer.text })?;
            distribution.set(sentiment, answer.rate);
        }
        Ok(Some(distribution))
    }

    async fn fetch_topics(&self, offset: u32, count: u32) -> Result<TopicsPage> {
        let mut params = self.base_params();
        params.push(("count", count.to_string()));
        params.push(("offset", offset.to_string()));
        self.call(GET_TOPICS, params).await
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Params) -> Result<T> {
        let body = self
            .transport
            .post(&self.config.api_url, method, &params)
            .await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;

        match envelope {
            Envelope {
                response: Some(response),
                ..
            } => Ok(response),
            Envelope {
                error: Some(error), ..
            } => Err(AppError::transport(
                endpoint(&self.config.api_url, method),
                format!("API error {}: {}", error.error_code, error.error_msg),
            )),
            _ => Err(AppError::transport(
                endpoint(&self.config.api_url, method),
                "reply has no response object",
            )),
        }
    }

    fn base_params(&self) -> Params {
        vec![
            ("group_id", self.config.group_id.to_string()),
            ("access_token", self.config.access_token.clone()),
            ("v", self.config.api_version.clone()),
        ]
    }
}
