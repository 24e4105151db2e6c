use std::fmt::Write;

use usuarios_api::UserRecord;
use usuarios_directory::Page;

const HEADERS: [&str; 6] = ["ID", "First name", "Last name", "Email", "Username", "Status"];
const EMPTY_ROW: &str = "No results found.";

fn cells(record: &UserRecord) -> [String; 6] {
    let fields = &record.fields;
    [
        record.id.to_string(),
        fields.first_name.clone(),
        fields.last_name.clone(),
        fields.email.clone(),
        fields.username.clone(),
        fields.status.label().to_string(),
    ]
}

/// Render a page as an aligned text table with a pagination footer.
pub fn page_table(page: &Page<'_>) -> String {
    let rows: Vec<[String; 6]> = page.rows.iter().map(|record| cells(record)).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));

    if rows.is_empty() {
        let _ = writeln!(out, "{EMPTY_ROW}");
    }
    for row in &rows {
        push_line(&mut out, row, &widths);
    }

    let _ = write!(
        out,
        "Page {} of {} ({} users)",
        page.number,
        page.total_pages.max(1),
        page.total_rows
    );
    out
}

fn push_line(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join("  ").trim_end());
}

/// One-line summary of a record.
pub fn record_line(record: &UserRecord) -> String {
    let fields = &record.fields;
    format!(
        "#{} {} {} <{}> @{} [{}]",
        record.id,
        fields.first_name,
        fields.last_name,
        fields.email,
        fields.username,
        fields.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use usuarios_api::{Status, UserDraft, UserId};

    fn record(id: u64, name: &str, status: Status) -> UserRecord {
        UserRecord::new(
            UserId::new(id),
            UserDraft {
                first_name: name.into(),
                last_name: "Sapon".into(),
                email: format!("{}@correo.com", name.to_lowercase()),
                username: name.to_lowercase(),
                status,
                ..UserDraft::default()
            },
        )
    }

    #[test]
    fn renders_rows_and_footer() {
        let a = record(1, "Miguel", Status::Active);
        let b = record(12, "Ana", Status::Inactive);
        let page = Page {
            rows: vec![&a, &b],
            number: 2,
            total_pages: 2,
            total_rows: 12,
        };

        let table = page_table(&page);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("ID  First name"));
        assert!(lines[2].starts_with("1   Miguel"));
        assert!(lines[3].contains("Inactive"));
        assert_eq!(lines.last().copied(), Some("Page 2 of 2 (12 users)"));
    }

    #[test]
    fn renders_empty_page() {
        let page = Page {
            rows: Vec::new(),
            number: 1,
            total_pages: 0,
            total_rows: 0,
        };
        let table = page_table(&page);
        assert!(table.contains(EMPTY_ROW));
        assert!(table.ends_with("Page 1 of 1 (0 users)"));
    }

    #[test]
    fn record_line_format() {
        let line = record_line(&record(7, "Marco", Status::Active));
        assert_eq!(line, "#7 Marco Sapon <marco@correo.com> @marco [Active]");
    }
}
