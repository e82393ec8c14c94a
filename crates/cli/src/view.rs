use common::api::SiteSummary;

/// Render rows as a plain left-aligned table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    out.push_str(header_line.join("  ").trim_end());
    out.push('\n');

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    out
}

pub fn site_row(site: &SiteSummary) -> Vec<String> {
    vec![
        site.site_id.to_string(),
        site.name.clone(),
        site.url.clone(),
        site.status.as_str().to_string(),
        site.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]
}

pub const SITE_HEADERS: &[&str] = &["ID", "NAME", "URL", "STATUS", "UPDATED"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let rendered = render_table(
            &["A", "B"],
            &[
                vec!["x".into(), "longer".into()],
                vec!["yy".into(), "b".into()],
            ],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "A   B");
        assert_eq!(lines[1], "x   longer");
        assert_eq!(lines[2], "yy  b");
    }
}
