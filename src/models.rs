use serde::Serialize;

/// Song number the midweek parser falls back to when a song heading
/// cannot be located on the page.
pub const DEFAULT_MIDWEEK_SONG: u32 = 1;

/// Weekend song defaults, applied when the study article yields no
/// usable song links.
pub const DEFAULT_WEEKEND_OPENING_SONG: u32 = 11;
pub const DEFAULT_WEEKEND_MIDDLE_SONG: u32 = 18;
pub const DEFAULT_WEEKEND_CLOSING_SONG: u32 = 107;

/// One scraped week. Either half is `None` when the week page itself
/// could not be fetched; the orchestrator substitutes the fallback
/// records before serializing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingWeek {
    pub midweek_meeting: Option<MidweekMeeting>,
    pub weekend_meeting: Option<WeekendMeeting>,
}

impl MeetingWeek {
    pub fn empty() -> Self {
        MeetingWeek {
            midweek_meeting: None,
            weekend_meeting: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MidweekMeeting {
    pub opening_song: u32,
    pub treasures_from_gods_word: TreasuresSection,
    pub apply_yourself_to_field_ministry: FieldMinistrySection,
    pub living_as_christians: LivingAsChristiansSection,
    pub closing_song: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuresSection {
    pub talk_title: String,
    pub talk_duration: u32,
    pub spiritual_gems_duration: u32,
    pub bible_reading_scripture: String,
    pub bible_reading_lesson: String,
    pub bible_reading_duration: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMinistrySection {
    pub field_ministry_assignments: Vec<FieldMinistryAssignment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMinistryAssignment {
    pub title: String,
    pub lesson: String,
    pub duration: u32,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivingAsChristiansSection {
    pub living_as_christians_song: u32,
    pub assignments: Vec<LivingAssignment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivingAssignment {
    pub title: String,
    pub duration: u32,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekendMeeting {
    pub opening_song: u32,
    pub middle_song: u32,
    pub closing_song: u32,
    pub public_talk_title: String,
    pub public_talk_duration: u32,
    pub watchtower_study_title: String,
    pub watchtower_study_duration: u32,
}

impl MidweekMeeting {
    /// Zero-valued record the parser fills in field by field. Durations
    /// are fixed by the meeting format and never scraped.
    pub fn unresolved() -> Self {
        MidweekMeeting {
            opening_song: 0,
            treasures_from_gods_word: TreasuresSection {
                talk_title: String::new(),
                talk_duration: 10,
                spiritual_gems_duration: 10,
                bible_reading_scripture: String::new(),
                bible_reading_lesson: String::new(),
                bible_reading_duration: 4,
            },
            apply_yourself_to_field_ministry: FieldMinistrySection {
                field_ministry_assignments: Vec::new(),
            },
            living_as_christians: LivingAsChristiansSection {
                living_as_christians_song: 0,
                assignments: Vec::new(),
            },
            closing_song: 0,
        }
    }

    /// Complete stand-in record, written when the week page could not be
    /// fetched at all.
    pub fn fallback() -> Self {
        MidweekMeeting {
            opening_song: 11,
            treasures_from_gods_word: TreasuresSection {
                talk_title: "Was wir von den Ameisen lernen können".to_string(),
                talk_duration: 10,
                spiritual_gems_duration: 10,
                bible_reading_scripture: "Sprüche 6:1-26".to_string(),
                bible_reading_lesson: "th Lektion 10".to_string(),
                bible_reading_duration: 4,
            },
            apply_yourself_to_field_ministry: FieldMinistrySection {
                field_ministry_assignments: vec![
                    FieldMinistryAssignment {
                        title: "Gespräche beginnen".to_string(),
                        lesson: "lmd Lektion 4, Punkt 3".to_string(),
                        duration: 4,
                        id: "1".to_string(),
                    },
                    FieldMinistryAssignment {
                        title: "Gespräche beginnen".to_string(),
                        lesson: "lmd Lektion 3, Punkt 3".to_string(),
                        duration: 4,
                        id: "2".to_string(),
                    },
                    FieldMinistryAssignment {
                        title: "Gespräche beginnen".to_string(),
                        lesson: "lmd Lektion 5, Punkt 3".to_string(),
                        duration: 4,
                        id: "3".to_string(),
                    },
                ],
            },
            living_as_christians: LivingAsChristiansSection {
                living_as_christians_song: 2,
                assignments: vec![
                    LivingAssignment {
                        title: "Jehovas Schöpfung gibt uns Gründe zur Freude – Faszinierende Tiere"
                            .to_string(),
                        duration: 5,
                        id: "1".to_string(),
                    },
                    LivingAssignment {
                        title: "Aktuelles".to_string(),
                        duration: 10,
                        id: "2".to_string(),
                    },
                    LivingAssignment {
                        title: "Versammlungsbibelstudium".to_string(),
                        duration: 30,
                        id: "3".to_string(),
                    },
                ],
            },
            closing_song: 126,
        }
    }
}

impl WeekendMeeting {
    pub fn unresolved() -> Self {
        WeekendMeeting {
            opening_song: 0,
            middle_song: 0,
            closing_song: 0,
            public_talk_title: String::new(),
            public_talk_duration: 30,
            watchtower_study_title: String::new(),
            watchtower_study_duration: 60,
        }
    }

    pub fn fallback() -> Self {
        WeekendMeeting {
            opening_song: DEFAULT_WEEKEND_OPENING_SONG,
            middle_song: DEFAULT_WEEKEND_MIDDLE_SONG,
            closing_song: DEFAULT_WEEKEND_CLOSING_SONG,
            public_talk_title: "Öffentlicher Vortrag".to_string(),
            public_talk_duration: 30,
            watchtower_study_title: "Was wir durch das Lösegeld lernen".to_string(),
            watchtower_study_duration: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let week = MeetingWeek {
            midweek_meeting: Some(MidweekMeeting::fallback()),
            weekend_meeting: Some(WeekendMeeting::fallback()),
        };
        let value = serde_json::to_value(&week).unwrap();

        assert!(value.get("midweekMeeting").is_some());
        assert!(value.get("weekendMeeting").is_some());

        let midweek = &value["midweekMeeting"];
        assert_eq!(midweek["openingSong"], 11);
        assert_eq!(
            midweek["treasuresFromGodsWord"]["bibleReadingLesson"],
            "th Lektion 10"
        );
        assert_eq!(
            midweek["applyYourselfToFieldMinistry"]["fieldMinistryAssignments"]
                .as_array()
                .unwrap()
                .len(),
            3
        );
        assert_eq!(midweek["livingAsChristians"]["livingAsChristiansSong"], 2);

        let weekend = &value["weekendMeeting"];
        assert_eq!(weekend["openingSong"], 11);
        assert_eq!(weekend["middleSong"], 18);
        assert_eq!(weekend["closingSong"], 107);
        assert_eq!(weekend["publicTalkDuration"], 30);
        assert_eq!(weekend["watchtowerStudyDuration"], 60);
    }

    #[test]
    fn empty_week_serializes_null_halves() {
        let value = serde_json::to_value(MeetingWeek::empty()).unwrap();
        assert!(value["midweekMeeting"].is_null());
        assert!(value["weekendMeeting"].is_null());
    }

    #[test]
    fn pretty_json_preserves_non_ascii() {
        let json = serde_json::to_string_pretty(&MidweekMeeting::fallback()).unwrap();
        assert!(json.contains("Sprüche 6:1-26"));
        assert!(json.contains("  \"openingSong\": 11"));
    }
}
