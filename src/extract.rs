use std::sync::LazyLock;

use regex::Regex;

static RE_DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+\.\s+\w+)\s+–\s+(\d+\.\s+\w+\s+\d{4})").expect("invalid regex: date range")
});

static RE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})").expect("invalid regex: year"));

static RE_BIBLE_READING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Bibellesung:\s+([^(]+)(?:\(([^)]+)\))?").expect("invalid regex: bible reading")
});

static RE_SONG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("invalid regex: song number"));

static RE_LESSON_GLUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(th|lmd)(Lektion)").expect("invalid regex: lesson glue"));

static RE_LEADING_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("invalid regex: leading index"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Pulls the start and end date out of a week header such as
/// "3. Juni – 9. Juni 2024". The start fragment usually carries no year;
/// it is copied over from the end fragment. Non-matching input yields
/// two empty strings.
pub fn week_date_range(date_header: &str) -> DateRange {
    let Some(caps) = RE_DATE_RANGE.captures(date_header) else {
        return DateRange {
            start: String::new(),
            end: String::new(),
        };
    };

    let mut start = caps[1].to_string();
    let end = caps[2].to_string();

    let tail: String = start.chars().rev().take(4).collect();
    if !tail.chars().any(|c| c.is_ascii_digit()) {
        if let Some(year) = RE_YEAR.captures(&end) {
            start = format!("{} {}", start, &year[1]);
        }
    }

    DateRange { start, end }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibleReading {
    pub scripture: String,
    pub lesson: String,
}

/// Splits a heading like "Bibellesung: Sprüche 6:1-26 (th Lektion 10)"
/// into the scripture reference and the optional lesson code.
pub fn bible_reading_details(title: &str) -> BibleReading {
    let Some(caps) = RE_BIBLE_READING.captures(title) else {
        return BibleReading {
            scripture: String::new(),
            lesson: String::new(),
        };
    };

    BibleReading {
        scripture: caps[1].trim().to_string(),
        lesson: caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    }
}

/// First integer substring in the text, or 0 when there is none or it
/// does not fit the number type.
pub fn song_number(song_text: &str) -> u32 {
    RE_SONG_NUMBER
        .find(song_text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// The site occasionally renders lesson references without the space
/// between the code prefix and "Lektion" ("thLektion 10"). Inserts it;
/// already well-formed text passes through unchanged.
pub fn fix_lesson_format(text: &str) -> String {
    RE_LESSON_GLUE.replace_all(text, "$1 $2").into_owned()
}

/// Strips the "1. " enumeration prefix the site puts on talk headings.
pub fn strip_leading_index(title: &str) -> String {
    RE_LEADING_INDEX.replace(title, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_copies_year_into_start() {
        let range = week_date_range("3. Juni – 9. Juni 2024");
        assert_eq!(range.start, "3. Juni 2024");
        assert_eq!(range.end, "9. Juni 2024");
    }

    #[test]
    fn date_range_of_unmatched_header_is_empty() {
        let range = week_date_range("Programm für diese Woche");
        assert_eq!(range.start, "");
        assert_eq!(range.end, "");
    }

    #[test]
    fn bible_reading_with_lesson() {
        let details = bible_reading_details("Bibellesung: Sprüche 6:1-26 (th Lektion 10)");
        assert_eq!(details.scripture, "Sprüche 6:1-26");
        assert_eq!(details.lesson, "th Lektion 10");
    }

    #[test]
    fn bible_reading_without_lesson() {
        let details = bible_reading_details("Bibellesung: Psalm 23:1-6");
        assert_eq!(details.scripture, "Psalm 23:1-6");
        assert_eq!(details.lesson, "");
    }

    #[test]
    fn song_number_takes_first_integer() {
        assert_eq!(song_number("Lied 95 und Gebet"), 95);
        assert_eq!(song_number("LIED 151"), 151);
        assert_eq!(song_number("Lied und Gebet"), 0);
        assert_eq!(song_number(""), 0);
    }

    #[test]
    fn song_number_overflow_yields_zero() {
        assert_eq!(song_number("Lied 99999999999999999999"), 0);
    }

    #[test]
    fn lesson_format_inserts_missing_space() {
        assert_eq!(fix_lesson_format("thLektion 10"), "th Lektion 10");
        assert_eq!(
            fix_lesson_format("lmdLektion 4, Punkt 3"),
            "lmd Lektion 4, Punkt 3"
        );
    }

    #[test]
    fn lesson_format_is_idempotent() {
        let once = fix_lesson_format("thLektion 10");
        let twice = fix_lesson_format(&once);
        assert_eq!(once, twice);

        assert_eq!(fix_lesson_format("th Lektion 10"), "th Lektion 10");
    }

    #[test]
    fn leading_index_is_stripped() {
        assert_eq!(strip_leading_index("3. Geistige Schätze"), "Geistige Schätze");
        assert_eq!(strip_leading_index("Geistige Schätze"), "Geistige Schätze");
    }
}
