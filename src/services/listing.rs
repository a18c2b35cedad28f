//! Faculty listing service.
//!
//! Reads the staff table and the department structure page of the faculty
//! website.

use std::collections::BTreeMap;
use std::sync::Arc;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{ListingConfig, TeacherAttributes, TeacherName};
use crate::utils::http::{Params, Transport};

/// Client for the faculty website.
pub struct ListingClient {
    transport: Arc<dyn Transport>,
    config: ListingConfig,
}

impl ListingClient {
    pub fn new(transport: Arc<dyn Transport>, config: &ListingConfig) -> Self {
        Self {
            transport,
            config: config.clone(),
        }
    }

    /// Fetch the staff table.
    pub async fn teachers(&self) -> Result<BTreeMap<TeacherName, TeacherAttributes>> {
        let html = self.fetch(&self.config.teachers_url).await?;
        parse_teachers(&html)
    }

    /// Fetch the list of departments.
    pub async fn departments(&self) -> Result<Vec<String>> {
        let html = self.fetch(&self.config.departments_url).await?;
        parse_departments(&html)
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        self.transport.post(url, "", &Params::new()).await
    }
}

/// Parse staff rows: name, degree, department, rank.
///
/// Rows whose first cell holds no Cyrillic text are headers or layout noise
/// and are skipped.
pub fn parse_teachers(html: &str) -> Result<BTreeMap<TeacherName, TeacherAttributes>> {
    let document = Html::parse_document(html);
    let row_sel = parse_selector("tr")?;
    let cell_sel = parse_selector("td")?;

    let mut teachers = BTreeMap::new();
    for row in document.select(&row_sel) {
        let cells: Vec<String> = row
            .select(&cell_sel)
            .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
            .collect();

        let Some(first) = cells.first() else {
            continue;
        };
        let name = TeacherName::new(first);
        if !name.as_str().chars().any(is_cyrillic) {
            continue;
        }

        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        teachers.insert(
            name,
            TeacherAttributes {
                degree: cell(1),
                department: cell(2),
                rank: cell(3),
            },
        );
    }
    Ok(teachers)
}

/// Parse department names from the `li > a` links of the structure page.
pub fn parse_departments(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let link_sel = parse_selector("li > a")?;

    Ok(document
        .select(&link_sel)
        .map(|link| collapse_whitespace(&link.text().collect::<String>()))
        .filter(|name| !name.is_empty())
        .collect())
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}
