// src/pipeline/report.rs

//! Teacher and department reports.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::models::{Config, MergedRating, RatingSource, TeacherAttributes, TeacherName};
use crate::pipeline::Aggregator;
use crate::services::ListingClient;
use crate::utils::http::Transport;
use crate::utils::table::render_table;

/// Which part of a report could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStage {
    TeacherListing,
    TeacherRatings,
    DepartmentListing,
}

impl ReportStage {
    /// Classify a teachers report failure.
    pub fn of_teachers_error(error: &AppError) -> Self {
        match error {
            AppError::BothSourcesFailed => ReportStage::TeacherRatings,
            _ => ReportStage::TeacherListing,
        }
    }

    /// What the user was trying to get, for error messages.
    pub fn subject(&self) -> &'static str {
        match self {
            ReportStage::TeacherListing => "information about teachers",
            ReportStage::TeacherRatings => "teachers' rating",
            ReportStage::DepartmentListing => "list of departments",
        }
    }
}

/// Build the teachers table: listing attributes plus both ratings.
pub async fn run_teachers(config: &Config, transport: Arc<dyn Transport>) -> Result<String> {
    let start = Instant::now();

    let listing = ListingClient::new(Arc::clone(&transport), &config.listing);
    let teachers = listing.teachers().await?;
    log::info!("Loaded {} teachers from the staff listing", teachers.len());

    let names: Vec<TeacherName> = teachers.keys().cloned().collect();
    let aggregator = Aggregator::from_config(config, transport)?;
    let ratings = aggregator.aggregate(&names).await?;

    log::info!("Teachers report ready in {:.1?}", start.elapsed());
    Ok(render_table(
        &teacher_rows(&teachers, &ratings),
        config.output.cell_padding,
    ))
}

/// Build the departments table.
pub async fn run_departments(config: &Config, transport: Arc<dyn Transport>) -> Result<String> {
    let listing = ListingClient::new(transport, &config.listing);
    let departments = listing.departments().await?;
    log::info!("Loaded {} departments", departments.len());

    Ok(render_table(
        &department_rows(&departments),
        config.output.cell_padding,
    ))
}

/// Header plus one row per teacher, sorted by name.
pub fn teacher_rows(
    teachers: &BTreeMap<TeacherName, TeacherAttributes>,
    ratings: &BTreeMap<TeacherName, MergedRating>,
) -> Vec<Vec<String>> {
    let mut header: Vec<String> = ["name", "degree", "department", "rank"]
        .into_iter()
        .map(String::from)
        .collect();
    header.extend(RatingSource::ALL.iter().map(|s| s.column_title().to_string()));

    let unrated = MergedRating::unrated();
    let mut rows = vec![header];
    for (name, attributes) in teachers {
        let rating = ratings.get(name).unwrap_or(&unrated);
        let mut row = vec![
            name.to_string(),
            attributes.degree.clone(),
            attributes.department.clone(),
            attributes.rank.clone(),
        ];
        row.extend(RatingSource::ALL.iter().map(|s| rating.slot(*s).to_string()));
        rows.push(row);
    }
    rows
}

/// Header plus one row per department.
pub fn department_rows(departments: &[String]) -> Vec<Vec<String>> {
    std::iter::once(vec!["department name".to_string()])
        .chain(departments.iter().map(|d| vec![d.clone()]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PLACEHOLDER;
    use crate::utils::testing::ScriptedTransport;

    #[test]
    fn test_teacher_rows() {
        let teachers = BTreeMap::from([
            (
                TeacherName::new("Петров Петр"),
                TeacherAttributes {
                    degree: "д.т.н.".to_string(),
                    department: "Кафедра информатики".to_string(),
                    rank: "профессор".to_string(),
                },
            ),
            (TeacherName::new("Иванов Иван"), TeacherAttributes::default()),
        ]);
        let ratings = BTreeMap::from([(
            TeacherName::new("Петров Петр"),
            MergedRating {
                poll_board: PLACEHOLDER.to_string(),
                rating_site: "4.3".to_string(),
            },
        )]);

        let rows = teacher_rows(&teachers, &ratings);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][4], "VK rating");
        assert_eq!(rows[0][5], "professorrating.org");
        assert_eq!(rows[1][0], "Иванов Иван");
        assert_eq!(rows[1][4..], [PLACEHOLDER, PLACEHOLDER]);
        assert_eq!(
            rows[2][..],
            [
                "Петров Петр",
                "д.т.н.",
                "Кафедра информатики",
                "профессор",
                PLACEHOLDER,
                "4.3"
            ]
        );
    }

    #[test]
    fn test_department_rows() {
        let rows = department_rows(&["Кафедра информатики".to_string()]);
        assert_eq!(rows, vec![vec!["department name"], vec!["Кафедра информатики"]]);
    }

    #[test]
    fn test_failure_stage() {
        assert_eq!(
            ReportStage::of_teachers_error(&AppError::BothSourcesFailed),
            ReportStage::TeacherRatings
        );
        let offline = AppError::transport("http://www.apmath.spbu.ru/ru/staff/", "timeout");
        assert_eq!(
            ReportStage::of_teachers_error(&offline).subject(),
            "information about teachers"
        );
    }

    #[tokio::test]
    async fn test_run_departments() {
        let transport = Arc::new(ScriptedTransport::new(|url, _| {
            assert!(url.ends_with("/structure/depts/"));
            Ok("<ul><li><a href=\"/x\">Кафедра информатики</a></li></ul>".to_string())
        }));

        let table = run_departments(&Config::default(), transport).await.unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("department name"));
        assert!(lines[2].contains("Кафедра информатики"));
    }

    #[tokio::test]
    async fn test_run_teachers_offline() {
        let result = run_teachers(&Config::default(), Arc::new(ScriptedTransport::offline())).await;
        let error = result.unwrap_err();
        assert_eq!(
            ReportStage::of_teachers_error(&error),
            ReportStage::TeacherListing
        );
    }
}
