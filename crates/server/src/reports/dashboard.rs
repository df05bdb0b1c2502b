//! Dashboard aggregation.
//!
//! [`aggregate`] reduces an incident list to counts. It never sorts: callers
//! pass incidents newest first and `recent` keeps that order.

use std::collections::BTreeMap;

use entity::sea_orm_active_enums::Severity;
use serde::Serialize;

use super::IncidentView;

/// Bucket for incidents whose category cannot be resolved.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Bucket for incidents whose student's group cannot be resolved.
pub const UNGROUPED: &str = "Ungrouped";

/// Number of incidents kept in [`Dashboard::recent`].
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub low:    usize,
    pub medium: usize,
    pub high:   usize,
}

impl SeverityCounts {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub total:       usize,
    pub by_severity: SeverityCounts,
    pub by_category: BTreeMap<String, usize>,
    pub by_group:    BTreeMap<String, usize>,
    /// First [`RECENT_LIMIT`] incidents of the input, in input order.
    pub recent:      Vec<IncidentView>,
}

/// Aggregates incidents into dashboard counts.
pub fn aggregate(incidents: &[IncidentView]) -> Dashboard {
    let mut dashboard = Dashboard {
        total: incidents.len(),
        recent: incidents.iter().take(RECENT_LIMIT).cloned().collect(),
        ..Default::default()
    };

    for view in incidents {
        dashboard.by_severity.record(view.incident.severity);

        let category = view.category_name.as_deref().unwrap_or(UNCATEGORIZED);
        *dashboard
            .by_category
            .entry(category.to_string())
            .or_default() += 1;

        let group = view.group_name.as_deref().unwrap_or(UNGROUPED);
        *dashboard.by_group.entry(group.to_string()).or_default() += 1;
    }

    dashboard
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::reports::fixtures::view;

    #[test]
    fn test_empty_input() {
        let dashboard = aggregate(&[]);
        assert_eq!(dashboard.total, 0);
        assert_eq!(dashboard.by_severity, SeverityCounts::default());
        assert!(dashboard.by_category.is_empty());
        assert!(dashboard.by_group.is_empty());
        assert!(dashboard.recent.is_empty());
        assert_eq!(dashboard, Dashboard::default());
    }

    #[test]
    fn test_counts() {
        let g = Uuid::new_v4();
        let incidents = vec![
            view(Severity::High, "2024-01-03", Some("Bullying"), Some((g, "5A"))),
            view(Severity::High, "2024-01-02", Some("Bullying"), Some((g, "5A"))),
            view(Severity::Low, "2024-01-01", Some("Late"), None),
        ];

        let dashboard = aggregate(&incidents);

        assert_eq!(dashboard.total, 3);
        assert_eq!(
            dashboard.by_severity,
            SeverityCounts {
                low:    1,
                medium: 0,
                high:   2,
            }
        );
        assert_eq!(dashboard.by_category.get("Bullying"), Some(&2));
        assert_eq!(dashboard.by_category.get("Late"), Some(&1));
        assert_eq!(dashboard.by_group.get("5A"), Some(&2));
        assert_eq!(dashboard.by_group.get(UNGROUPED), Some(&1));
    }

    #[test]
    fn test_missing_category_is_uncategorized() {
        let dashboard = aggregate(&[view(Severity::Medium, "2024-01-01", None, None)]);
        assert_eq!(dashboard.by_category.get(UNCATEGORIZED), Some(&1));
        assert_eq!(dashboard.by_category.len(), 1);
    }

    #[test]
    fn test_recent_keeps_first_ten_in_input_order() {
        let incidents: Vec<_> = (1 ..= 12)
            .map(|day| view(Severity::Low, &format!("2024-01-{:02}", day), None, None))
            .collect();

        let dashboard = aggregate(&incidents);

        assert_eq!(dashboard.recent.len(), RECENT_LIMIT);
        assert_eq!(dashboard.recent, incidents[.. RECENT_LIMIT].to_vec());
    }

    #[test]
    fn test_counts_stable_under_reordering() {
        let g = Uuid::new_v4();
        let mut incidents = vec![
            view(Severity::High, "2024-01-03", Some("Bullying"), Some((g, "5A"))),
            view(Severity::Low, "2024-01-02", Some("Late"), Some((g, "5A"))),
            view(Severity::Medium, "2024-01-01", None, None),
        ];

        let forward = aggregate(&incidents);
        incidents.reverse();
        let backward = aggregate(&incidents);

        assert_eq!(forward.total, backward.total);
        assert_eq!(forward.by_severity, backward.by_severity);
        assert_eq!(forward.by_category, backward.by_category);
        assert_eq!(forward.by_group, backward.by_group);
        assert_ne!(forward.recent, backward.recent);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let incidents = vec![
            view(Severity::High, "2024-01-03", Some("Bullying"), None),
            view(Severity::Low, "2024-01-02", None, None),
        ];
        assert_eq!(aggregate(&incidents), aggregate(&incidents));
    }
}
