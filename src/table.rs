use crate::models::Listing;

const MAX_COL_WIDTH: usize = 120;
const HEADER: [&str; 6] = ["No:", "Title:", "Year:", "Rating:", "Uploaded:", "Synopsis:"];
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Renders the listing as an aligned table, one row per movie, numbered by
/// position.
pub fn render_listing(listing: &Listing, color: bool) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(listing.movies().len() + 2);
    rows.push(HEADER.iter().map(|h| h.to_string()).collect());
    rows.push(HEADER.iter().map(|h| "-".repeat(h.len())).collect());
    for (i, m) in listing.movies().iter().enumerate() {
        rows.push(vec![
            i.to_string(),
            cell(&m.title),
            m.year.to_string(),
            m.rating.to_string(),
            cell(&m.date_uploaded),
            cell(&m.synopsis),
        ]);
    }

    let mut widths = [0usize; HEADER.len()];
    for row in &rows {
        for (w, c) in widths.iter_mut().zip(row) {
            *w = (*w).max(c.chars().count());
        }
    }

    let mut out = String::new();
    for (n, row) in rows.iter().enumerate() {
        let last = row.len() - 1;
        let line = row
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let pad = if i == last {
                    0
                } else {
                    widths[i] - c.chars().count()
                };
                let text = format!("{c}{}", " ".repeat(pad));
                if color && n < 2 {
                    format!("{GREEN}{text}{RESET}")
                } else {
                    text
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn cell(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_COL_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_COL_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}
