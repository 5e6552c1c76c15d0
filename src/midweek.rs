use log::{debug, warn};
use scraper::Html;

use crate::dom::{child_containing, find_containing, next_matching_after, sel, text_of};
use crate::extract::{
    BibleReading, bible_reading_details, fix_lesson_format, song_number, strip_leading_index,
};
use crate::models::{
    DEFAULT_MIDWEEK_SONG, FieldMinistryAssignment, LivingAssignment, MidweekMeeting,
};

/// Extracts the midweek agenda from a parsed week page.
///
/// Every step is optional: a missed selector leaves the field at its
/// zero value and parsing continues. Zeroed song numbers are replaced
/// with the documented default at the end, so the returned record is
/// always well-formed.
pub fn parse_midweek(doc: &Html) -> MidweekMeeting {
    debug!("Parsing midweek meeting structure");
    let mut data = MidweekMeeting::unresolved();

    if let Some(song) = opening_song(doc) {
        data.opening_song = song;
    }
    if let Some(song) = living_as_christians_song(doc) {
        data.living_as_christians.living_as_christians_song = song;
    }
    if let Some(song) = closing_song(doc) {
        data.closing_song = song;
    }

    if let Some(title) = treasures_talk_title(doc) {
        data.treasures_from_gods_word.talk_title = title;
    }
    if let Some(reading) = bible_reading(doc) {
        data.treasures_from_gods_word.bible_reading_scripture = reading.scripture;
        data.treasures_from_gods_word.bible_reading_lesson = reading.lesson;
    }

    data.apply_yourself_to_field_ministry
        .field_ministry_assignments = field_ministry_assignments(doc);
    data.living_as_christians.assignments = living_assignments(doc);

    apply_song_defaults(&mut data);
    data
}

/// First music-icon heading on the page, or failing that any heading
/// link mentioning "Lied".
fn opening_song(doc: &Html) -> Option<u32> {
    let link = doc
        .select(&sel("h3.dc-icon--music a"))
        .next()
        .or_else(|| doc.select(&sel("h3 a")).find(|a| text_of(*a).contains("Lied")))?;

    let text = text_of(link);
    let number = song_number(&text);
    debug!("Opening song: {text:?} -> {number}");
    Some(number)
}

/// Music heading directly after the sheep-icon section, or the first
/// song link in a heading following the section marker text.
fn living_as_christians_song(doc: &Html) -> Option<u32> {
    let link = doc
        .select(&sel("div.dc-icon--sheep + h3.dc-icon--music"))
        .next()
        .and_then(|heading| heading.select(&sel("a")).next())
        .or_else(|| {
            let marker = find_containing(doc, &sel("div"), "UNSER LEBEN ALS CHRIST")?;
            let heading = next_matching_after(doc, marker, &sel("h3"))?;
            child_containing(heading, &sel("a"), "Lied")
        })?;

    let text = text_of(link);
    let number = song_number(&text);
    debug!("Living as Christians song: {text:?} -> {number}");
    Some(number)
}

fn closing_song(doc: &Html) -> Option<u32> {
    let heading = find_containing(doc, &sel("h3"), "Schlussworte")?;
    let link = child_containing(heading, &sel("a"), "Lied")?;

    let text = text_of(link);
    let number = song_number(&text);
    debug!("Closing song: {text:?} -> {number}");
    Some(number)
}

/// Heading of the talk that opens the gem-icon section, with its
/// enumeration prefix removed.
fn treasures_talk_title(doc: &Html) -> Option<String> {
    let section_present = doc.select(&sel("div.dc-icon--gem")).next().is_some()
        || find_containing(doc, &sel("div"), "SCHÄTZE AUS GOTTES WORT").is_some();
    if !section_present {
        warn!("Treasures section not found on page");
        return None;
    }

    let heading = doc
        .select(&sel("div.dc-icon--gem + div h3"))
        .next()
        .or_else(|| {
            let marker = find_containing(doc, &sel("h2"), "SCHÄTZE AUS GOTTES WORT")?;
            next_matching_after(doc, marker, &sel("h3"))
        })?;

    let title = strip_leading_index(&text_of(heading));
    debug!("Treasures talk title: {title:?}");
    Some(title)
}

/// Scripture reference and lesson code for the Bible reading. Primary
/// route goes through the indented block under the heading; when that
/// block is missing, the heading text itself carries the reference.
fn bible_reading(doc: &Html) -> Option<BibleReading> {
    let heading = find_containing(doc, &sel("h3"), "Bibellesung")?;

    if let Some(container) = next_matching_after(doc, heading, &sel("div.du-margin-inlineStart--5"))
    {
        let scripture = container.select(&sel("a.b")).next().map(text_of);
        let lesson = child_containing(container, &sel("a"), "th Lektion")
            .map(|link| fix_lesson_format(&text_of(link)));

        if scripture.is_some() || lesson.is_some() {
            let reading = BibleReading {
                scripture: scripture.unwrap_or_default(),
                lesson: lesson.unwrap_or_default(),
            };
            debug!("Bible reading: {reading:?}");
            return Some(reading);
        }
    }

    let parsed = bible_reading_details(&text_of(heading));
    if parsed.scripture.is_empty() {
        return None;
    }
    debug!("Bible reading taken from heading text: {parsed:?}");
    Some(BibleReading {
        scripture: parsed.scripture,
        lesson: fix_lesson_format(&parsed.lesson),
    })
}

/// Assignment headings of the wheat-icon section. The section heading
/// shares the style class with the assignments and is filtered out by
/// text; at most three assignments belong to this part of the meeting.
fn field_ministry_assignments(doc: &Html) -> Vec<FieldMinistryAssignment> {
    let section_present = doc.select(&sel("div.dc-icon--wheat")).next().is_some()
        || find_containing(doc, &sel("div"), "UNS IM DIENST VERBESSERN").is_some();
    if !section_present {
        warn!("Field ministry section not found on page");
        return Vec::new();
    }

    let mut assignments = Vec::new();
    for heading in doc.select(&sel("h3.du-fontSize--base.du-color--gold-700")) {
        let heading_text = text_of(heading);
        if heading_text.starts_with("UNS IM DIENST VERBESSERN") {
            continue;
        }
        let title = strip_leading_index(&heading_text);

        let mut lesson = String::new();
        if let Some(desc) = next_matching_after(doc, heading, &sel("div.du-margin-inlineStart--5"))
        {
            if let Some(paragraph) = desc.select(&sel("p.du-color--textSubdued")).next() {
                let desc_text = text_of(paragraph);
                lesson = match desc_text.split_once("INFORMELL.") {
                    Some((_, rest)) => rest.trim().to_string(),
                    None => desc_text,
                };
            }

            if let Some(link) = child_containing(desc, &sel("a"), "lmd") {
                let detail = fix_lesson_format(&text_of(link));
                if detail.contains("Lektion") {
                    if lesson.is_empty() {
                        lesson = detail;
                    } else {
                        lesson = format!("{lesson} ({detail})");
                    }
                }
            }
        }

        debug!("Field ministry assignment: {title} - {lesson}");
        assignments.push(FieldMinistryAssignment {
            title,
            lesson,
            duration: 4,
            id: (assignments.len() + 1).to_string(),
        });
    }

    assignments.truncate(3);
    assignments
}

/// Assignment headings of the sheep-icon section, skipping the section
/// heading and the song heading.
fn living_assignments(doc: &Html) -> Vec<LivingAssignment> {
    let section_present = doc.select(&sel("div.dc-icon--sheep")).next().is_some()
        || find_containing(doc, &sel("div"), "UNSER LEBEN ALS CHRIST").is_some();
    if !section_present {
        warn!("Living as Christians section not found on page");
        return Vec::new();
    }

    let mut assignments = Vec::new();
    for heading in doc.select(&sel("h3.du-fontSize--base.du-color--maroon-600")) {
        let heading_text = text_of(heading);
        if heading_text.starts_with("UNSER LEBEN ALS CHRIST") || heading_text.contains("Lied") {
            continue;
        }
        let title = strip_leading_index(&heading_text);

        let lowered = title.to_lowercase();
        let duration = if lowered.contains("bibelstudium") || lowered.contains("aktuelles") {
            10
        } else {
            5
        };

        debug!("Living as Christians assignment: {title} ({duration} min)");
        assignments.push(LivingAssignment {
            title,
            duration,
            id: (assignments.len() + 1).to_string(),
        });
    }
    assignments
}

fn apply_song_defaults(data: &mut MidweekMeeting) {
    if data.opening_song == 0 {
        warn!("Opening song unresolved, defaulting to {DEFAULT_MIDWEEK_SONG}");
        data.opening_song = DEFAULT_MIDWEEK_SONG;
    }
    if data.living_as_christians.living_as_christians_song == 0 {
        warn!("Living as Christians song unresolved, defaulting to {DEFAULT_MIDWEEK_SONG}");
        data.living_as_christians.living_as_christians_song = DEFAULT_MIDWEEK_SONG;
    }
    if data.closing_song == 0 {
        warn!("Closing song unresolved, defaulting to {DEFAULT_MIDWEEK_SONG}");
        data.closing_song = DEFAULT_MIDWEEK_SONG;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK_PAGE: &str = r##"
        <html><body>
            <h3 class="dc-icon--music"><a href="#">LIED 95 und Gebet</a></h3>

            <div class="dc-icon--gem"><h2>SCHÄTZE AUS GOTTES WORT</h2></div>
            <div>
                <h3>1. Vertraue auf Jehova wie Hiskia</h3>
            </div>
            <h3>3. Bibellesung (4 Min.)</h3>
            <div class="du-margin-inlineStart--5">
                <p><a class="b" href="#">Sprüche 6:1-26</a>
                   (<a href="#">th Lektion 10</a>)</p>
            </div>

            <div class="dc-icon--wheat">
                <h3 class="du-fontSize--base du-color--gold-700">UNS IM DIENST VERBESSERN</h3>
            </div>
            <h3 class="du-fontSize--base du-color--gold-700">4. Gespräche beginnen</h3>
            <div class="du-margin-inlineStart--5">
                <p class="du-color--textSubdued">INFORMELL. Sprich mit jemandem über eine gute Nachricht.</p>
                <p><a href="#">lmdLektion 1, Punkt 3</a></p>
            </div>
            <h3 class="du-fontSize--base du-color--gold-700">5. Interesse wecken</h3>
            <div class="du-margin-inlineStart--5">
                <p class="du-color--textSubdued">VON HAUS ZU HAUS. Biete ein Studium an.</p>
            </div>
            <h3 class="du-fontSize--base du-color--gold-700">6. Vortrag</h3>
            <div class="du-margin-inlineStart--5">
                <p><a href="#">lmdLektion 7</a></p>
            </div>

            <div class="dc-icon--sheep"><h2>UNSER LEBEN ALS CHRIST</h2></div>
            <h3 class="dc-icon--music du-fontSize--base du-color--maroon-600"><a href="#">Lied 2</a></h3>
            <h3 class="du-fontSize--base du-color--maroon-600">7. Bleib behütet</h3>
            <h3 class="du-fontSize--base du-color--maroon-600">8. Aktuelles</h3>
            <h3 class="du-fontSize--base du-color--maroon-600">9. Versammlungsbibelstudium</h3>

            <h3>Schlussworte (3 Min.) | <a href="#">Lied 126 und Gebet</a></h3>
        </body></html>
    "##;

    #[test]
    fn parses_complete_week_page() {
        let doc = Html::parse_document(WEEK_PAGE);
        let data = parse_midweek(&doc);

        assert_eq!(data.opening_song, 95);
        assert_eq!(data.closing_song, 126);
        assert_eq!(data.living_as_christians.living_as_christians_song, 2);

        let treasures = &data.treasures_from_gods_word;
        assert_eq!(treasures.talk_title, "Vertraue auf Jehova wie Hiskia");
        assert_eq!(treasures.bible_reading_scripture, "Sprüche 6:1-26");
        assert_eq!(treasures.bible_reading_lesson, "th Lektion 10");
        assert_eq!(treasures.talk_duration, 10);
        assert_eq!(treasures.bible_reading_duration, 4);
    }

    #[test]
    fn field_ministry_assignments_combine_description_and_lesson() {
        let doc = Html::parse_document(WEEK_PAGE);
        let assignments = field_ministry_assignments(&doc);

        assert_eq!(assignments.len(), 3);
        assert_eq!(assignments[0].title, "Gespräche beginnen");
        assert_eq!(
            assignments[0].lesson,
            "Sprich mit jemandem über eine gute Nachricht. (lmd Lektion 1, Punkt 3)"
        );
        assert_eq!(assignments[1].title, "Interesse wecken");
        assert_eq!(assignments[1].lesson, "VON HAUS ZU HAUS. Biete ein Studium an.");
        assert_eq!(assignments[2].title, "Vortrag");
        assert_eq!(assignments[2].lesson, "lmd Lektion 7");
        assert!(assignments.iter().all(|a| a.duration == 4));
        assert_eq!(
            assignments.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
            ["1", "2", "3"]
        );
    }

    #[test]
    fn field_ministry_assignments_are_capped_at_three() {
        let extra = WEEK_PAGE.replace(
            r#"<div class="dc-icon--sheep">"#,
            r#"<h3 class="du-fontSize--base du-color--gold-700">10. Noch eine Aufgabe</h3>
               <div class="dc-icon--sheep">"#,
        );
        let doc = Html::parse_document(&extra);
        let assignments = field_ministry_assignments(&doc);

        assert_eq!(assignments.len(), 3);
        assert!(assignments.iter().all(|a| a.title != "Noch eine Aufgabe"));
    }

    #[test]
    fn living_assignments_skip_section_heading_and_song() {
        let doc = Html::parse_document(WEEK_PAGE);
        let assignments = living_assignments(&doc);

        assert_eq!(assignments.len(), 3);
        assert_eq!(assignments[0].title, "Bleib behütet");
        assert_eq!(assignments[0].duration, 5);
        assert_eq!(assignments[1].title, "Aktuelles");
        assert_eq!(assignments[1].duration, 10);
        assert_eq!(assignments[2].title, "Versammlungsbibelstudium");
        assert_eq!(assignments[2].duration, 10);
    }

    #[test]
    fn empty_page_degrades_to_defaults() {
        let doc = Html::parse_document("<html><body><p>Wartungsarbeiten</p></body></html>");
        let data = parse_midweek(&doc);

        assert_eq!(data.opening_song, 1);
        assert_eq!(data.closing_song, 1);
        assert_eq!(data.living_as_christians.living_as_christians_song, 1);
        assert_eq!(data.treasures_from_gods_word.talk_title, "");
        assert_eq!(data.treasures_from_gods_word.bible_reading_scripture, "");
        assert!(
            data.apply_yourself_to_field_ministry
                .field_ministry_assignments
                .is_empty()
        );
        assert!(data.living_as_christians.assignments.is_empty());
    }

    #[test]
    fn opening_song_falls_back_to_any_song_link() {
        let doc = Html::parse_document(
            r##"<html><body><h3><a href="#">Lied 42 und Gebet</a></h3></body></html>"##,
        );
        assert_eq!(opening_song(&doc), Some(42));
    }

    #[test]
    fn treasures_title_falls_back_to_marker_heading() {
        let doc = Html::parse_document(
            r#"<html><body>
                <div><h2>SCHÄTZE AUS GOTTES WORT</h2></div>
                <h3>2. Lerne aus Fehlern</h3>
            </body></html>"#,
        );
        assert_eq!(treasures_talk_title(&doc), Some("Lerne aus Fehlern".to_string()));
    }

    #[test]
    fn bible_reading_falls_back_to_heading_text() {
        let doc = Html::parse_document(
            r#"<html><body>
                <h3>Bibellesung: Psalm 23:1-6 (thLektion 2)</h3>
            </body></html>"#,
        );
        let reading = bible_reading(&doc).unwrap();
        assert_eq!(reading.scripture, "Psalm 23:1-6");
        assert_eq!(reading.lesson, "th Lektion 2");
    }

    #[test]
    fn living_song_falls_back_to_marker_div() {
        let doc = Html::parse_document(
            r##"<html><body>
                <div>UNSER LEBEN ALS CHRIST</div>
                <h3><a href="#">Lied 33</a></h3>
            </body></html>"##,
        );
        assert_eq!(living_as_christians_song(&doc), Some(33));
    }
}
