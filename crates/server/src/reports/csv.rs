//! CSV export of the filtered incident list.
//!
//! Every field is wrapped in double quotes. Embedded quotes are written
//! as-is, so a description containing `"` yields a malformed row.

use chrono::NaiveDate;

use super::IncidentView;

pub const CSV_HEADER: [&str; 7] = [
    "Date",
    "Student",
    "Group",
    "Category",
    "Severity",
    "Description",
    "Teacher",
];

fn row<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(|field| format!("\"{}\"", field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders incidents as CSV text: the header line, then one line per
/// incident, joined with `\n` and no trailing newline.
///
/// Unresolved names render as empty fields.
pub fn export_csv(incidents: &[IncidentView]) -> String {
    let mut lines = Vec::with_capacity(incidents.len() + 1);
    lines.push(row(CSV_HEADER));

    for view in incidents {
        let date = view.incident.date.format("%Y-%m-%d").to_string();
        lines.push(row([
            date.as_str(),
            view.student_name.as_deref().unwrap_or(""),
            view.group_name.as_deref().unwrap_or(""),
            view.category_name.as_deref().unwrap_or(""),
            view.incident.severity.as_str(),
            view.incident.description.as_str(),
            view.teacher_name.as_deref().unwrap_or(""),
        ]));
    }

    lines.join("\n")
}

/// Download name for an export made on `day`.
pub fn export_filename(day: NaiveDate) -> String { format!("incidents-{}.csv", day.format("%Y%m%d")) }

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::Severity;
    use uuid::Uuid;

    use super::*;
    use crate::reports::fixtures::view;

    #[test]
    fn test_header_only_for_empty_list() {
        assert_eq!(
            export_csv(&[]),
            "\"Date\",\"Student\",\"Group\",\"Category\",\"Severity\",\"Description\",\"Teacher\""
        );
    }

    #[test]
    fn test_rows() {
        let incidents = vec![
            view(
                Severity::High,
                "2024-03-01",
                Some("Bullying"),
                Some((Uuid::new_v4(), "5A")),
            ),
            view(Severity::Low, "2024-02-29", None, None),
        ];

        let csv = export_csv(&incidents);
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "\"2024-03-01\",\"Ana\",\"5A\",\"Bullying\",\"high\",\"Talking during exam\",\"Mr. Ruiz\""
        );
        assert_eq!(
            lines[2],
            "\"2024-02-29\",\"Ana\",\"\",\"\",\"low\",\"Talking during exam\",\"Mr. Ruiz\""
        );
    }

    #[test]
    fn test_quotes_are_not_escaped() {
        let mut incident = view(Severity::Low, "2024-01-01", None, None);
        incident.incident.description = "said \"no\"".to_string();

        let csv = export_csv(&[incident]);
        assert!(csv.contains(",\"said \"no\"\","));
    }

    #[test]
    fn test_filename() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(export_filename(day), "incidents-20240301.csv");
    }
}
