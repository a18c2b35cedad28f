//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Page count assumed when the rating site's summary page cannot be read.
pub const DEFAULT_PAGE_COUNT: u32 = 214;

/// Largest page the poll board API serves for topic listings.
const MAX_TOPIC_PAGE_SIZE: u32 = 100;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP behavior shared by every source
    #[serde(default)]
    pub transport: TransportConfig,

    /// Poll board (VK API) settings
    #[serde(default)]
    pub poll_board: PollBoardConfig,

    /// Rating site (professorrating.org) settings
    #[serde(default)]
    pub rating_site: RatingSiteConfig,

    /// Faculty listing pages
    #[serde(default)]
    pub listing: ListingConfig,

    /// Table rendering
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.transport.user_agent.trim().is_empty() {
            return Err(AppError::validation("transport.user_agent is empty"));
        }
        if self.transport.timeout_secs == 0 {
            return Err(AppError::validation("transport.timeout_secs must be > 0"));
        }
        if self.transport.max_concurrent == 0 {
            return Err(AppError::validation("transport.max_concurrent must be > 0"));
        }
        if self.poll_board.access_token.trim().is_empty() {
            return Err(AppError::validation("poll_board.access_token is empty"));
        }
        if self.poll_board.page_size == 0 || self.poll_board.page_size > MAX_TOPIC_PAGE_SIZE {
            return Err(AppError::validation(format!(
                "poll_board.page_size must be within 1..={MAX_TOPIC_PAGE_SIZE}"
            )));
        }
        if self.rating_site.page_step == 0 {
            return Err(AppError::validation("rating_site.page_step must be > 0"));
        }
        if self.rating_site.name_repeats == 0 {
            return Err(AppError::validation("rating_site.name_repeats must be > 0"));
        }

        for url in [
            &self.poll_board.api_url,
            &self.rating_site.base_url,
            &self.rating_site.summary_url,
            &self.listing.teachers_url,
            &self.listing.departments_url,
        ] {
            Url::parse(url)?;
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum in-flight requests per fan-out
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// VK board API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollBoardConfig {
    /// API root, methods are appended as path segments
    #[serde(default = "defaults::vk_api_url")]
    pub api_url: String,

    /// Community whose board holds the teacher topics
    #[serde(default = "defaults::vk_group_id")]
    pub group_id: u64,

    /// Static service token sent with every request
    #[serde(default = "defaults::vk_access_token")]
    pub access_token: String,

    /// API version string
    #[serde(default = "defaults::vk_api_version")]
    pub api_version: String,

    /// Topics requested per page during discovery
    #[serde(default = "defaults::vk_page_size")]
    pub page_size: u32,
}

impl Default for PollBoardConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::vk_api_url(),
            group_id: defaults::vk_group_id(),
            access_token: defaults::vk_access_token(),
            api_version: defaults::vk_api_version(),
            page_size: defaults::vk_page_size(),
        }
    }
}

/// professorrating.org settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSiteConfig {
    /// Base URL of the page helper endpoint
    #[serde(default = "defaults::pr_base_url")]
    pub base_url: String,

    /// Script serving one page of listings
    #[serde(default = "defaults::pr_page_method")]
    pub page_method: String,

    /// Page carrying the "1 по 10 из N" summary
    #[serde(default = "defaults::pr_summary_url")]
    pub summary_url: String,

    /// Department identifier (`id` parameter)
    #[serde(default = "defaults::pr_department_id")]
    pub department_id: u32,

    /// Listing type (`typePR` parameter)
    #[serde(default = "defaults::pr_listing_type")]
    pub listing_type: u32,

    /// Distance between consecutive `page` values
    #[serde(default = "defaults::pr_page_step")]
    pub page_step: u32,

    /// Page count used when the summary cannot be read
    #[serde(default = "defaults::pr_fallback_page_count")]
    pub fallback_page_count: u32,

    /// How many times each name is repeated in a page body
    #[serde(default = "defaults::pr_name_repeats")]
    pub name_repeats: usize,

    /// Name-like matches trailing the real entries on every page
    #[serde(default = "defaults::pr_trailing_noise")]
    pub trailing_noise: usize,
}

impl Default for RatingSiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::pr_base_url(),
            page_method: defaults::pr_page_method(),
            summary_url: defaults::pr_summary_url(),
            department_id: defaults::pr_department_id(),
            listing_type: defaults::pr_listing_type(),
            page_step: defaults::pr_page_step(),
            fallback_page_count: defaults::pr_fallback_page_count(),
            name_repeats: defaults::pr_name_repeats(),
            trailing_noise: defaults::pr_trailing_noise(),
        }
    }
}

/// Faculty website pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Staff table page
    #[serde(default = "defaults::teachers_url")]
    pub teachers_url: String,

    /// Department structure page
    #[serde(default = "defaults::departments_url")]
    pub departments_url: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            teachers_url: defaults::teachers_url(),
            departments_url: defaults::departments_url(),
        }
    }
}

/// Table output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Spaces added on each side of the widest cell in a column
    #[serde(default = "defaults::cell_padding")]
    pub cell_padding: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cell_padding: defaults::cell_padding(),
        }
    }
}

mod defaults {
    // Transport defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; ratings/0.1)".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn max_concurrent() -> usize {
        32
    }

    // Poll board defaults
    pub fn vk_api_url() -> String {
        "https://api.vk.com/method".into()
    }
    pub fn vk_group_id() -> u64 {
        42037
    }
    pub fn vk_access_token() -> String {
        "01a5cc4c01a5cc4c01a5cc4c5a01d1d56f001a501a5cc4c5ec869fd79e0861db86f6ec3".into()
    }
    pub fn vk_api_version() -> String {
        "5.124".into()
    }
    pub fn vk_page_size() -> u32 {
        100
    }

    // Rating site defaults
    pub fn pr_base_url() -> String {
        "https://professorrating.org/blocks".into()
    }
    pub fn pr_page_method() -> String {
        "page_helper.php".into()
    }
    pub fn pr_summary_url() -> String {
        "https://professorrating.org/kafedra.php?id=2445".into()
    }
    pub fn pr_department_id() -> u32 {
        2445
    }
    pub fn pr_listing_type() -> u32 {
        4
    }
    pub fn pr_page_step() -> u32 {
        10
    }
    pub fn pr_fallback_page_count() -> u32 {
        super::DEFAULT_PAGE_COUNT
    }
    pub fn pr_name_repeats() -> usize {
        4
    }
    pub fn pr_trailing_noise() -> usize {
        3
    }

    // Listing defaults
    pub fn teachers_url() -> String {
        "http://www.apmath.spbu.ru/ru/staff/".into()
    }
    pub fn departments_url() -> String {
        "http://www.apmath.spbu.ru/ru/structure/depts/".into()
    }

    // Output defaults
    pub fn cell_padding() -> usize {
        1
    }
}
