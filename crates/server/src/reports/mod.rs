//! # Incident Reports
//!
//! Pure transforms over an already-fetched incident list: joining display
//! names, filtering, dashboard aggregation and CSV export. Nothing in this
//! module touches the database.

pub mod csv;
pub mod dashboard;
pub mod filter;

use std::collections::HashMap;

use entity::{categories, groups, incidents, students, users};
use serde::Serialize;
use uuid::Uuid;

pub use self::{
    csv::{export_csv, export_filename, CSV_HEADER},
    dashboard::{aggregate, Dashboard, SeverityCounts, RECENT_LIMIT, UNCATEGORIZED, UNGROUPED},
    filter::{filter_incidents, IncidentFilter},
};

/// An incident with the display names of everything it references.
///
/// A name is `None` when the referenced row is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentView {
    #[serde(flatten)]
    pub incident:      incidents::Model,
    pub student_name:  Option<String>,
    /// Group of the incident's student.
    pub group_id:      Option<Uuid>,
    pub group_name:    Option<String>,
    pub category_name: Option<String>,
    pub teacher_name:  Option<String>,
}

/// Id-keyed lookup tables built once per fetch.
#[derive(Debug, Default)]
pub struct Lookup {
    students:   HashMap<Uuid, (String, Uuid)>,
    groups:     HashMap<Uuid, String>,
    categories: HashMap<Uuid, String>,
    teachers:   HashMap<Uuid, String>,
}

impl Lookup {
    pub fn new(
        students: &[students::Model],
        groups: &[groups::Model],
        categories: &[categories::Model],
        teachers: &[users::Model],
    ) -> Self {
        Self {
            students:   students
                .iter()
                .map(|s| (s.id, (s.name.clone(), s.group_id)))
                .collect(),
            groups:     groups.iter().map(|g| (g.id, g.name.clone())).collect(),
            categories: categories.iter().map(|c| (c.id, c.name.clone())).collect(),
            teachers:   teachers
                .iter()
                .map(|u| (u.id, u.display_name.clone()))
                .collect(),
        }
    }

    /// Joins one incident against the tables.
    pub fn view(&self, incident: incidents::Model) -> IncidentView {
        let student = self.students.get(&incident.student_id);
        let group_id = student.map(|(_, group_id)| *group_id);

        IncidentView {
            student_name: student.map(|(name, _)| name.clone()),
            group_name: group_id.and_then(|id| self.groups.get(&id).cloned()),
            group_id,
            category_name: self.categories.get(&incident.category_id).cloned(),
            teacher_name: self.teachers.get(&incident.teacher_id).cloned(),
            incident,
        }
    }

    /// Joins every incident, preserving input order.
    pub fn views(&self, incidents: Vec<incidents::Model>) -> Vec<IncidentView> {
        incidents
            .into_iter()
            .map(|incident| self.view(incident))
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use chrono::Utc;
    use entity::sea_orm_active_enums::Severity;

    use super::*;

    #[test]
    fn test_lookup_joins_through_student_group() {
        let group = groups::Model {
            id:         Uuid::new_v4(),
            name:       "5A".to_string(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let student = students::Model {
            id:         Uuid::new_v4(),
            name:       "Ana".to_string(),
            group_id:   group.id,
            created_at: Utc::now(),
        };
        let lookup = Lookup::new(&[student.clone()], &[group.clone()], &[], &[]);

        let view = lookup.view(fixtures::incident(
            student.id,
            Uuid::new_v4(),
            Severity::Low,
            "2024-01-05",
        ));

        assert_eq!(view.student_name.as_deref(), Some("Ana"));
        assert_eq!(view.group_id, Some(group.id));
        assert_eq!(view.group_name.as_deref(), Some("5A"));
        assert_eq!(view.category_name, None);
        assert_eq!(view.teacher_name, None);
    }

    #[test]
    fn test_lookup_missing_student_has_no_group() {
        let view = Lookup::default().view(fixtures::incident(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Severity::High,
            "2024-01-05",
        ));
        assert_eq!(view.group_id, None);
        assert_eq!(view.group_name, None);
    }
}
