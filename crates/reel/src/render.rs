//! 🍽️ render.rs, snapshots in, tables out. A table so comfy it has lumbar support.
//!
//! The dashboard hides the document id column, same as the listing always has. The id is
//! bookkeeping; people want titles.

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::NOTHING, presets::UTF8_FULL};

use crate::records::{MOVIE_FIELDS, MovieRow};
use crate::views::Summary;

/// 🔢 Formats a number with commas. "1000 films" → "1,000 films". You're welcome, eyes.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// 📋 One row per movie, four columns, no id.
pub fn movies_table<'a>(rows: impl IntoIterator<Item = &'a MovieRow>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(MOVIE_FIELDS.to_vec());
    for row in rows {
        table.add_row(row.record.columns().to_vec());
    }
    table
}

/// 🎥 The director picker, as a one-column list.
pub fn directors_table(directors: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["director"]);
    for director in directors {
        table.add_row(vec![*director]);
    }
    table
}

/// 📊 The three headline numbers (plus skips, when there are any).
pub fn summary_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    // -- NOTHING preset because metrics look better floating. and also the borders looked bad.
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut metric = |label: &str, value: usize| {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format_number(value as u64)).set_alignment(CellAlignment::Right),
        ]);
    };
    metric("Total movies", summary.total_movies);
    metric("Unique directors", summary.unique_directors);
    metric("Unique genres", summary.unique_genres);
    if summary.skipped > 0 {
        metric("Skipped documents", summary.skipped);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MovieRecord;

    #[test]
    fn the_one_where_big_numbers_get_commas() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn the_one_where_the_listing_hides_the_id() {
        let rows = vec![MovieRow {
            doc_id: "d41d8cd98f00b204e9800998ecf8427e".into(),
            record: MovieRecord::new("Heat", "WB", "Mann", "Crime"),
        }];
        let rendered = movies_table(&rows).to_string();
        assert!(rendered.contains("Heat"));
        assert!(rendered.contains("director"));
        assert!(!rendered.contains("d41d8cd98f00b204e9800998ecf8427e"));
    }

    #[test]
    fn the_one_where_skips_only_show_up_when_they_happen() {
        let clean = Summary {
            total_movies: 1000,
            unique_directors: 3,
            unique_genres: 2,
            columns: 4,
            skipped: 0,
        };
        let rendered = summary_table(&clean).to_string();
        assert!(rendered.contains("1,000"));
        assert!(!rendered.contains("Skipped"));

        let messy = Summary { skipped: 2, ..clean };
        assert!(summary_table(&messy).to_string().contains("Skipped documents"));
    }
}
