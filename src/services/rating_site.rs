//! Rating site service.
//!
//! professorrating.org lists teachers with a numeric rating, ten per page.
//! Pages carry no markup worth selecting on, so names and ratings are pulled
//! out with two regex passes and paired by position after the layout has been
//! checked.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::{
    NumericRating, PageCount, PageOrigin, RatingSiteConfig, RatingSource, TeacherName,
    canonicalize_yo,
};
use crate::utils::http::{Params, Transport};

const NAME_PATTERN: &str = r"[а-яА-Я][а-яА-Я ]*";
const RATING_PATTERN: &str = r"\d+\.\d+";
const SUMMARY_PATTERN: &str = r"\d+ по \d+ из (\d+)";

/// Client for the paginated rating site.
pub struct RatingSiteClient {
    transport: Arc<dyn Transport>,
    config: RatingSiteConfig,
    concurrency: usize,
    name_re: Regex,
    rating_re: Regex,
    summary_re: Regex,
}

impl RatingSiteClient {
    /// Create a new rating site client.
    pub fn new(
        transport: Arc<dyn Transport>,
        config: &RatingSiteConfig,
        concurrency: usize,
    ) -> Result<Self> {
        Ok(Self {
            transport,
            config: config.clone(),
            concurrency: concurrency.max(1),
            name_re: Regex::new(NAME_PATTERN)?,
            rating_re: Regex::new(RATING_PATTERN)?,
            summary_re: Regex::new(SUMMARY_PATTERN)?,
        })
    }

    /// Ratings of the requested teachers.
    ///
    /// Every page is fetched concurrently; a failed page only loses its own
    /// entries. When a name shows up on several pages the page that arrives
    /// last wins, and arrival order is not defined.
    pub async fn ratings_for(
        &self,
        names: &[TeacherName],
    ) -> Result<HashMap<TeacherName, NumericRating>> {
        let count = self.total_pages().await;
        let pages: Vec<u32> = (0..count.pages)
            .step_by(self.config.page_step.max(1) as usize)
            .collect();
        let page_total = pages.len();

        let mut results = stream::iter(pages)
            .map(|page| async move { (page, self.parse_page(page).await) })
            .buffer_unordered(self.concurrency);

        let mut ratings = HashMap::new();
        let mut failed_pages = 0;
        while let Some((page, result)) = results.next().await {
            match result {
                Ok(pairs) => {
                    for (name, rating) in pairs {
                        if rating.is_rated() {
                            ratings.insert(name, rating);
                        }
                    }
                }
                Err(error) => {
                    failed_pages += 1;
                    log::warn!("Rating page {} skipped: {}", page, error);
                }
            }
        }

        let wanted: HashSet<&TeacherName> = names.iter().collect();
        ratings.retain(|name, _| wanted.contains(name));

        log::info!(
            "Rating site: {} ratings matched ({} of {} pages failed)",
            ratings.len(),
            failed_pages,
            page_total
        );
        if ratings.is_empty() {
            return Err(AppError::EmptyResult(RatingSource::RatingSite));
        }
        Ok(ratings)
    }

    /// Number of listing pages.
    ///
    /// Never fails: when the summary cannot be read the configured fallback is
    /// returned and tagged as such.
    pub async fn total_pages(&self) -> PageCount {
        let reported = self
            .transport
            .post(&self.config.summary_url, "", &Params::new())
            .await
            .map(|body| self.parse_summary(&body));

        match reported {
            Ok(Some(pages)) => PageCount {
                pages,
                origin: PageOrigin::Reported,
            },
            Ok(None) => self.fallback_pages("page summary not found"),
            Err(error) => self.fallback_pages(&error.to_string()),
        }
    }

    /// Fetch one page and pair its names with their ratings.
    pub async fn parse_page(&self, page: u32) -> Result<Vec<(TeacherName, NumericRating)>> {
        let params: Params = vec![
            ("page", page.to_string()),
            ("id", self.config.department_id.to_string()),
            ("typePR", self.config.listing_type.to_string()),
        ];
        let body = self
            .transport
            .post(&self.config.base_url, &self.config.page_method, &params)
            .await?;
        self.extract_pairs(page, &body)
    }

    fn extract_pairs(&self, page: u32, body: &str) -> Result<Vec<(TeacherName, NumericRating)>> {
        let text = canonicalize_yo(body);
        let raw_names: Vec<&str> = self.name_re.find_iter(&text).map(|m| m.as_str()).collect();
        let ratings: Vec<&str> = self.rating_re.find_iter(&text).map(|m| m.as_str()).collect();

        let names = group_names(
            &raw_names,
            self.config.name_repeats.max(1),
            self.config.trailing_noise,
        )
        .map_err(|message| AppError::page_layout(page, message))?;

        if names.len() != ratings.len() {
            return Err(AppError::page_layout(
                page,
                format!("{} names but {} ratings", names.len(), ratings.len()),
            ));
        }

        Ok(names
            .into_iter()
            .zip(ratings.into_iter().map(NumericRating::new))
            .collect())
    }

    fn parse_summary(&self, body: &str) -> Option<u32> {
        self.summary_re
            .captures(body)
            .and_then(|caps| caps.get(1))
            .and_then(|total| total.as_str().parse().ok())
    }

    fn fallback_pages(&self, reason: &str) -> PageCount {
        log::warn!(
            "Unable to get number of pages from {} ({}). Assuming {} pages.",
            RatingSource::RatingSite,
            reason,
            self.config.fallback_page_count
        );
        PageCount {
            pages: self.config.fallback_page_count,
            origin: PageOrigin::Fallback,
        }
    }
}

/// Collapse the repeated name matches of a page into one name per entry.
///
/// The page body repeats every name `repeats` times in a row and ends with
/// `noise` unrelated matches. Anything else means the layout changed.
fn group_names(
    raw: &[&str],
    repeats: usize,
    noise: usize,
) -> std::result::Result<Vec<TeacherName>, String> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if raw.len() < noise {
        return Err(format!(
            "{} name matches, expected at least {}",
            raw.len(),
            noise
        ));
    }

    let entries = &raw[..raw.len() - noise];
    if entries.len() % repeats != 0 {
        return Err(format!(
            "{} name matches do not split into groups of {}",
            entries.len(),
            repeats
        ));
    }

    entries
        .chunks(repeats)
        .map(|group| {
            let name = TeacherName::new(group[0]);
            if group.iter().all(|other| TeacherName::new(other) == name) {
                Ok(name)
            } else {
                Err(format!("name group starting with '{name}' is not uniform"))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::{ScriptedTransport, param, refused};

    const SUMMARY_URL: &str = "kafedra.php";
    const PAGE_URL: &str = "page_helper.php";

    /// Page body in the site's layout: each name four times, then footer noise.
    fn page_body(entries: &[(&str, &str)]) -> String {
        let mut body = String::from("<div>");
        for (name, _) in entries {
            for _ in 0..4 {
                body.push_str(&format!("<a>{name}</a>|"));
            }
        }
        for (_, rating) in entries {
            body.push_str(&format!("<b>{rating}</b>"));
        }
        body.push_str("<p>Все права защищены</p><p>Контакты</p><p>Реклама</p></div>");
        body
    }

    fn site(transport: ScriptedTransport) -> (Arc<ScriptedTransport>, RatingSiteClient) {
        let transport = Arc::new(transport);
        let client =
            RatingSiteClient::new(transport.clone(), &RatingSiteConfig::default(), 8).unwrap();
        (transport, client)
    }

    fn names(raw: &[&str]) -> Vec<TeacherName> {
        raw.iter().map(|n| TeacherName::new(n)).collect()
    }

    #[test]
    fn test_group_names() {
        let raw = ["Иванов", "Иванов", "Петров", "Петров", "x", "y"];
        assert_eq!(group_names(&raw, 2, 2).unwrap(), names(&["Иванов", "Петров"]));
    }

    #[test]
    fn test_group_names_rejects_broken_layout() {
        let uneven = ["Иванов", "Иванов", "Петров", "x", "y"];
        assert!(group_names(&uneven, 2, 2).is_err());

        let shuffled = ["Иванов", "Петров", "Петров", "Иванов", "x", "y"];
        assert!(group_names(&shuffled, 2, 2).is_err());
    }

    #[tokio::test]
    async fn test_parse_page_pairs_names_and_ratings() {
        let (transport, client) = site(ScriptedTransport::new(|_, _| {
            Ok(page_body(&[("Алёшин Иван", "4.3"), ("Петров Петр", "0.0")]))
        }));

        let pairs = client.parse_page(20).await.unwrap();
        assert_eq!(
            pairs,
            vec![
                (TeacherName::new("Алешин Иван"), NumericRating::new("4.3")),
                (TeacherName::new("Петров Петр"), NumericRating::new("0.0")),
            ]
        );

        let sent = &transport.calls_to(PAGE_URL)[0];
        assert_eq!(param(sent, "page"), Some("20"));
        assert_eq!(param(sent, "id"), Some("2445"));
        assert_eq!(param(sent, "typePR"), Some("4"));
    }

    #[tokio::test]
    async fn test_parse_page_rejects_count_mismatch() {
        let (_, client) = site(ScriptedTransport::new(|_, _| {
            let mut body = page_body(&[("Иванов Иван", "4.3")]);
            body.push_str("<b>3.9</b>");
            Ok(body)
        }));

        let result = client.parse_page(0).await;
        assert!(matches!(result, Err(AppError::PageLayout { page: 0, .. })));
    }

    #[tokio::test]
    async fn test_total_pages_reported() {
        let (_, client) = site(ScriptedTransport::new(|_, _| {
            Ok("Показаны записи с 1 по 10 из 57".to_string())
        }));

        let count = client.total_pages().await;
        assert_eq!(count.pages, 57);
        assert_eq!(count.origin, PageOrigin::Reported);
    }

    #[tokio::test]
    async fn test_total_pages_falls_back() {
        let (_, offline) = site(ScriptedTransport::offline());
        let count = offline.total_pages().await;
        assert_eq!(count.pages, crate::models::DEFAULT_PAGE_COUNT);
        assert_eq!(count.origin, PageOrigin::Fallback);

        let (_, garbled) = site(ScriptedTransport::new(|_, _| Ok("nothing".to_string())));
        assert_eq!(garbled.total_pages().await.origin, PageOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_ratings_for_requests_every_step() {
        let (transport, client) = site(ScriptedTransport::new(|url, params| {
            if url.contains(SUMMARY_URL) {
                return Ok("с 1 по 10 из 30".to_string());
            }
            match param(params, "page") {
                Some("0") => Ok(page_body(&[("Иванов Иван", "4.3")])),
                Some("10") => Ok(page_body(&[("Петров Петр", "0.0")])),
                Some("20") => Ok(page_body(&[("Сидоров Сидор", "3.1")])),
                _ => Err(refused(url)),
            }
        }));

        let requested = names(&["Иванов Иван", "Петров Петр", "Кузнецов Кузьма"]);
        let ratings = client.ratings_for(&requested).await.unwrap();

        assert_eq!(transport.calls_to(PAGE_URL).len(), 3);
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings["Иванов Иван"].as_str(), "4.3");
        assert!(!ratings.contains_key("Петров Петр"));
        assert!(!ratings.contains_key("Сидоров Сидор"));
    }

    #[tokio::test]
    async fn test_ratings_for_survives_failed_page() {
        let (_, client) = site(ScriptedTransport::new(|url, params| {
            if url.contains(SUMMARY_URL) {
                return Ok("1 по 10 из 20".to_string());
            }
            match param(params, "page") {
                Some("0") => Err(refused(url)),
                _ => Ok(page_body(&[("Иванов Иван", "4.3")])),
            }
        }));

        let ratings = client.ratings_for(&names(&["Иванов Иван"])).await.unwrap();
        assert_eq!(ratings.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_keeps_one_page_value() {
        let (_, client) = site(ScriptedTransport::new(|url, params| {
            if url.contains(SUMMARY_URL) {
                return Ok("1 по 10 из 20".to_string());
            }
            match param(params, "page") {
                Some("0") => Ok(page_body(&[("Иванов Иван", "4.3")])),
                _ => Ok(page_body(&[("Иванов Иван", "3.7")])),
            }
        }));

        let ratings = client.ratings_for(&names(&["Иванов Иван"])).await.unwrap();
        let value = ratings["Иванов Иван"].as_str();
        assert!(value == "4.3" || value == "3.7");
    }

    #[tokio::test]
    async fn test_ratings_for_empty_is_failure() {
        let (_, client) = site(ScriptedTransport::new(|url, _| {
            if url.contains(SUMMARY_URL) {
                return Ok("1 по 10 из 10".to_string());
            }
            Ok(page_body(&[("Иванов Иван", "0.0")]))
        }));

        let result = client.ratings_for(&names(&["Иванов Иван"])).await;
        assert!(matches!(
            result,
            Err(AppError::EmptyResult(RatingSource::RatingSite))
        ));
    }
}
