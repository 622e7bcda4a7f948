use chrono::NaiveDate;

use super::RegistrationRow;

const HEADER: [&str; 5] = ["Name", "Phone", "Location", "Event", "Registration Date"];

/// Renders rows as CSV. Every data field is double-quoted; embedded quotes
/// are doubled.
pub fn to_csv(rows: &[RegistrationRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADER.join(","));
    lines.extend(rows.iter().map(|row| {
        [&row.name, &row.phone, &row.location, &row.event, &row.date]
            .iter()
            .map(|field| quote(field))
            .collect::<Vec<_>>()
            .join(",")
    }));
    lines.join("\n")
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("registrations-{}.csv", today.format("%Y-%m-%d"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
