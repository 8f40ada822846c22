//! Awards dataset cleaning.
//!
//! Turns the raw nominations table (one row per nominee, every ceremony since
//! 1927) into the film-level nominations the pipeline cares about: feature
//! film categories from 2000 onwards, with a `yes`/`no` winner label.

use crate::frame::Frame;
use crate::types::{LedgerError, LedgerResult, Nomination, Winner};

/// Columns of the raw dataset that carry nothing the pipeline joins on.
pub const DROPPED_COLUMNS: [&str; 10] = [
    "class",
    "ceremony",
    "nomid",
    "name",
    "nominees",
    "nomineeids",
    "detail",
    "note",
    "citation",
    "multifilmnomination",
];

/// Categories kept after cleaning.
pub const FILM_CATEGORIES: [&str; 3] = [
    "best picture",
    "animated feature film",
    "international feature film",
];

/// Earliest ceremony year kept.
pub const MIN_YEAR: i32 = 2000;

/// Clean the raw awards table.
///
/// The source frame is left untouched. A year that is neither multi-year
/// (`"1927/28"`) nor an integer, or a winner flag that is not boolean-like,
/// aborts the whole clean with an error naming the line.
pub fn clean_awards(raw: &Frame) -> LedgerResult<Vec<Nomination>> {
    let frame = raw
        .with_lowercase_columns()
        .with_lowercase_cells()
        .without_columns(&DROPPED_COLUMNS);

    let year_col = frame.require_column("year")?;
    let filmid_col = frame.require_column("filmid")?;
    let category_col = frame.require_column("category")?;
    let canonical_col = frame.column_index("canonicalcategory");
    let film_col = frame.column_index("film");
    let winner_col = frame.column_index("winner");

    let mut multi_year = 0usize;
    let mut nominations = Vec::new();

    for (i, row) in frame.rows().iter().enumerate() {
        let line = i + 2;

        let raw_year = row[year_col].trim();
        if raw_year.contains('/') {
            multi_year += 1;
            continue;
        }
        let year: i32 = raw_year.parse().map_err(|_| LedgerError::InvalidYear {
            line,
            value: raw_year.to_string(),
        })?;
        if year < MIN_YEAR {
            continue;
        }

        let category = row[category_col].trim();
        let canonical = canonical_col.map(|c| row[c].trim());
        if !FILM_CATEGORIES.contains(&canonical.unwrap_or(category)) {
            continue;
        }

        let winner = recode_winner(winner_col.map(|c| row[c].as_str()), line)?;

        nominations.push(Nomination {
            year,
            canonical_category: canonical.map(str::to_string),
            category: category.to_string(),
            film: film_col
                .map(|c| row[c].trim().to_string())
                .filter(|f| !f.is_empty()),
            filmid: row[filmid_col].trim().to_string(),
            winner,
        });
    }

    tracing::info!(
        "cleaned awards: {} of {} rows kept ({} multi-year rows dropped)",
        nominations.len(),
        raw.len(),
        multi_year
    );
    Ok(nominations)
}

/// Missing flags count as "no"; `1`/`true` is "yes", `0`/`false` is "no".
fn recode_winner(raw: Option<&str>, line: usize) -> LedgerResult<Winner> {
    match raw.map(str::trim).unwrap_or_default() {
        "" | "0" | "0.0" | "false" => Ok(Winner::No),
        "1" | "1.0" | "true" => Ok(Winner::Yes),
        other => Err(LedgerError::InvalidWinner {
            line,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [&str; 16] = [
        "Ceremony",
        "Year",
        "Class",
        "CanonicalCategory",
        "Category",
        "NomId",
        "Film",
        "FilmId",
        "Name",
        "Nominees",
        "NomineeIds",
        "Winner",
        "Detail",
        "Note",
        "Citation",
        "MultifilmNomination",
    ];

    fn row<'a>(year: &'a str, category: &'a str, film: &'a str, id: &'a str, winner: &'a str) -> [&'a str; 16] {
        [
            "1", year, "Title", category, category, "n1", film, id, "Someone", "", "", winner, "",
            "", "", "",
        ]
    }

    fn awards(rows: &[[&str; 16]]) -> Frame {
        let rows: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        Frame::from_rows("awards", &HEADER, &rows).unwrap()
    }

    #[test]
    fn test_three_row_scenario_keeps_only_valid_row() {
        let raw = awards(&[
            row("1927/28", "BEST PICTURE", "Wings", "tt0018578", "True"),
            row("1999", "BEST PICTURE", "American Beauty", "tt0169547", "True"),
            row("2005", "BEST PICTURE", "Crash", "tt0375679", "True"),
        ]);
        let cleaned = clean_awards(&raw).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].year, 2005);
        assert_eq!(cleaned[0].film.as_deref(), Some("crash"));
        assert_eq!(cleaned[0].category, "best picture");
        assert_eq!(cleaned[0].winner, Winner::Yes);
    }

    #[test]
    fn test_category_filter_and_winner_recode() {
        let raw = awards(&[
            row("2019", "BEST PICTURE", "Parasite", "tt6751668", "True"),
            row("2019", "INTERNATIONAL FEATURE FILM", "Parasite", "tt6751668", "True"),
            row("2019", "ACTOR IN A LEADING ROLE", "Joker", "tt7286456", "True"),
            row("2019", "ANIMATED FEATURE FILM", "Klaus", "tt4729430", ""),
        ]);
        let cleaned = clean_awards(&raw).unwrap();
        assert_eq!(cleaned.len(), 3);
        for nomination in &cleaned {
            assert!(nomination.year >= MIN_YEAR);
            assert!(FILM_CATEGORIES.contains(&nomination.category.as_str()));
        }
        assert_eq!(cleaned[2].winner, Winner::No);
    }

    #[test]
    fn test_canonical_category_drives_filter() {
        let mut foreign = row("2005", "INTERNATIONAL FEATURE FILM", "Tsotsi", "tt0468565", "True");
        foreign[4] = "FOREIGN LANGUAGE FILM";
        let cleaned = clean_awards(&awards(&[foreign])).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(
            cleaned[0].canonical_category.as_deref(),
            Some("international feature film")
        );
        assert_eq!(cleaned[0].category, "foreign language film");
    }

    #[test]
    fn test_dropped_columns_do_not_matter() {
        let raw = Frame::from_rows(
            "awards",
            &["YEAR", "CATEGORY", "FILMID"],
            &[&["2010", "Best Picture", "tt1504320"]],
        )
        .unwrap();
        let cleaned = clean_awards(&raw).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].winner, Winner::No);
        assert_eq!(cleaned[0].film, None);
    }

    #[test]
    fn test_non_numeric_year_names_the_line() {
        let raw = awards(&[
            row("2005", "BEST PICTURE", "Crash", "tt0375679", "True"),
            row("two thousand", "BEST PICTURE", "Crash", "tt0375679", "True"),
        ]);
        let err = clean_awards(&raw).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidYear { line: 3, .. }));
    }

    #[test]
    fn test_unknown_winner_flag_is_rejected() {
        let raw = awards(&[row("2005", "BEST PICTURE", "Crash", "tt0375679", "maybe")]);
        let err = clean_awards(&raw).unwrap_err();
        assert_eq!(err.to_string(), "Line 2: invalid winner flag 'maybe'");
    }

    #[test]
    fn test_source_frame_is_not_modified() {
        let raw = awards(&[row("2005", "BEST PICTURE", "Crash", "tt0375679", "True")]);
        let before = raw.clone();
        clean_awards(&raw).unwrap();
        assert_eq!(raw, before);
    }
}
