//! Incident list filtering.

use chrono::NaiveDate;
use entity::sea_orm_active_enums::Severity;
use serde::Serialize;
use uuid::Uuid;

use super::IncidentView;

/// Criteria for narrowing the incident list. An absent criterion matches
/// every incident.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidentFilter {
    pub category:  Option<Uuid>,
    pub severity:  Option<Severity>,
    /// Matched against the incident's student's group.
    pub group:     Option<Uuid>,
    /// Inclusive lower bound on `date`.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub date_to:   Option<NaiveDate>,
}

impl IncidentFilter {
    pub fn is_empty(&self) -> bool { *self == Self::default() }

    pub fn matches(&self, view: &IncidentView) -> bool {
        let incident = &view.incident;

        self.category.map_or(true, |id| incident.category_id == id) &&
            self.severity.map_or(true, |s| incident.severity == s) &&
            self.group.map_or(true, |id| view.group_id == Some(id)) &&
            self.date_from.map_or(true, |from| incident.date >= from) &&
            self.date_to.map_or(true, |to| incident.date <= to)
    }
}

/// Returns the incidents matching `filter`, in input order.
///
/// The input slice is left untouched.
pub fn filter_incidents(incidents: &[IncidentView], filter: &IncidentFilter) -> Vec<IncidentView> {
    incidents
        .iter()
        .filter(|view| filter.matches(view))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::view;

    fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

    #[test]
    fn test_empty_filter_matches_everything() {
        let all = vec![
            view(Severity::Low, "2024-01-01", Some("Talking"), None),
            view(Severity::High, "2023-06-30", None, None),
        ];
        assert!(IncidentFilter::default().is_empty());
        assert_eq!(filter_incidents(&all, &IncidentFilter::default()), all);
    }

    #[test]
    fn test_group_and_inclusive_date_range() {
        let g1 = Uuid::new_v4();
        let g2 = Uuid::new_v4();
        let all = vec![
            view(Severity::Low, "2024-01-01", None, Some((g1, "5A"))),
            view(Severity::Low, "2024-01-31", None, Some((g1, "5A"))),
            view(Severity::Low, "2024-02-01", None, Some((g1, "5A"))),
            view(Severity::Low, "2024-01-15", None, Some((g2, "5B"))),
            view(Severity::Low, "2024-01-15", None, None),
        ];

        let filter = IncidentFilter {
            group: Some(g1),
            date_from: Some(date("2024-01-01")),
            date_to: Some(date("2024-01-31")),
            ..Default::default()
        };
        let result = filter_incidents(&all, &filter);

        assert_eq!(result, vec![all[0].clone(), all[1].clone()]);
    }

    #[test]
    fn test_category_and_severity() {
        let all = vec![
            view(Severity::High, "2024-01-01", Some("Bullying"), None),
            view(Severity::Low, "2024-01-01", Some("Bullying"), None),
        ];
        let category = all[0].incident.category_id;

        let by_category = filter_incidents(
            &all,
            &IncidentFilter {
                category: Some(category),
                ..Default::default()
            },
        );
        assert_eq!(by_category, vec![all[0].clone()]);

        let by_severity = filter_incidents(
            &all,
            &IncidentFilter {
                severity: Some(Severity::Low),
                ..Default::default()
            },
        );
        assert_eq!(by_severity, vec![all[1].clone()]);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let all = vec![
            view(Severity::High, "2024-01-01", None, None),
            view(Severity::Low, "2024-01-02", None, None),
        ];
        let before = all.clone();

        let _ = filter_incidents(
            &all,
            &IncidentFilter {
                severity: Some(Severity::Medium),
                ..Default::default()
            },
        );

        assert_eq!(all, before);
    }
}
