use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Duration, Local, NaiveDate, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::kv_store;

/// Raw row of the key-value table backing the store.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = kv_store)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
}

/// Supported interface languages. `de` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::De, Language::En, Language::Es];

    pub fn code(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// English name of the language, used when instructing the remote model.
    pub fn prompt_name(self) -> &'static str {
        match self {
            Language::De => "German",
            Language::En => "English",
            Language::Es => "Spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language code '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" => Ok(Language::De),
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(UnknownLanguage(other.to_owned())),
        }
    }
}

/// Care metadata attached to an identification and to every saved plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareInfo {
    pub water_interval_days: u32,
    pub light: String,
    pub temp: String,
}

/// Outcome of identifying a photo. Only becomes a [`Plant`] when saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResult {
    pub name: String,
    pub botanical_name: String,
    pub confidence: f64,
    pub care_info: CareInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A plant in the user's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub name: String,
    pub botanical_name: String,
    pub image_uri: String,
    pub date_added: DateTime<Utc>,
    pub care_info: CareInfo,
    pub last_watered: DateTime<Utc>,
    /// Newest first.
    #[serde(default)]
    pub watering_history: Vec<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
}

impl Plant {
    /// Builds a new plant from an identification. The creation time doubles
    /// as the first watering.
    pub fn from_identification(
        id: String,
        result: &IdentificationResult,
        image_uri: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: result.name.clone(),
            botanical_name: result.botanical_name.clone(),
            image_uri,
            date_added: now,
            care_info: result.care_info.clone(),
            last_watered: now,
            watering_history: vec![now],
            description: result.description.clone(),
            notifications_enabled: Some(false),
        }
    }

    pub fn is_watered_on(&self, day: NaiveDate) -> bool {
        self.last_watered.with_timezone(&Local).date_naive() == day
    }

    /// Records a watering at `at`. Returns `false` without touching anything
    /// when the plant was already watered on the same local calendar day.
    pub fn water(&mut self, at: DateTime<Utc>, history_cap: usize) -> bool {
        if self.is_watered_on(at.with_timezone(&Local).date_naive()) {
            return false;
        }
        self.watering_history.insert(0, at);
        self.watering_history.truncate(history_cap.max(1));
        self.last_watered = at;
        true
    }

    /// Same wall-clock time `water_interval_days` local calendar days after
    /// the last watering.
    pub fn next_watering(&self) -> DateTime<Utc> {
        self.next_watering_in(&Local)
    }

    pub fn next_watering_in<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Utc> {
        let interval = self.care_info.water_interval_days;
        self.last_watered
            .with_timezone(tz)
            .checked_add_days(Days::new(u64::from(interval)))
            .map(|due| due.with_timezone(&Utc))
            // The wall-clock time fell into a DST gap.
            .unwrap_or_else(|| self.last_watered + Duration::days(i64::from(interval)))
    }

    /// Local calendar day the plant is due.
    pub fn due_date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        let watered_on = self.last_watered.with_timezone(tz).date_naive();
        watered_on
            .checked_add_days(Days::new(u64::from(self.care_info.water_interval_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn needs_water(&self, now: DateTime<Utc>) -> bool {
        self.needs_water_in(now, &Local)
    }

    pub fn needs_water_in<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> bool {
        self.days_until_watering_in(now, tz) <= 0
    }

    /// Whole local days until the due date; zero or negative when due.
    pub fn days_until_watering(&self, now: DateTime<Utc>) -> i64 {
        self.days_until_watering_in(now, &Local)
    }

    pub fn days_until_watering_in<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> i64 {
        let today = now.with_timezone(tz).date_naive();
        (self.due_date_in(tz) - today).num_days()
    }

    pub fn reminders_enabled(&self) -> bool {
        self.notifications_enabled.unwrap_or(false)
    }

    /// Case-insensitive substring match on name or botanical name.
    pub fn matches(&self, query: &str) -> bool {
        matches_names(&self.name, &self.botanical_name, query)
    }
}

pub(crate) fn matches_names(name: &str, botanical_name: &str, query: &str) -> bool {
    let query = query.to_lowercase();
    name.to_lowercase().contains(&query) || botanical_name.to_lowercase().contains(&query)
}

#[cfg(test)]
pub(crate) fn sample_result(name: &str, botanical_name: &str) -> IdentificationResult {
    IdentificationResult {
        name: name.to_owned(),
        botanical_name: botanical_name.to_owned(),
        confidence: 0.9,
        care_info: CareInfo {
            water_interval_days: 7,
            light: "Partial Shade".to_owned(),
            temp: "18-24°C".to_owned(),
        },
        description: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveDateTime};
    use proptest::prelude::*;

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .single()
            .expect("unambiguous local time")
            .with_timezone(&Utc)
    }

    fn plant_added_at(at: DateTime<Utc>) -> Plant {
        Plant::from_identification(
            "p1".into(),
            &sample_result("Monstera", "Monstera deliciosa"),
            "data:image/jpeg;base64,AAAA".into(),
            at,
        )
    }

    #[test]
    fn new_plant_counts_creation_as_first_watering() {
        let now = local(2024, 5, 1, 9);
        let plant = plant_added_at(now);
        assert_eq!(plant.watering_history, vec![now]);
        assert_eq!(plant.last_watered, now);
        assert_eq!(plant.notifications_enabled, Some(false));
    }

    #[test]
    fn watering_twice_on_the_same_day_is_a_no_op() {
        let mut plant = plant_added_at(local(2024, 5, 1, 9));
        let next_day = local(2024, 5, 2, 8);
        assert!(plant.water(next_day, 10));
        assert!(!plant.water(local(2024, 5, 2, 20), 10));
        assert_eq!(plant.watering_history.len(), 2);
        assert_eq!(plant.last_watered, next_day);
    }

    #[test]
    fn next_watering_follows_the_interval() {
        let plant = plant_added_at(local(2024, 5, 1, 9));
        assert_eq!(plant.next_watering(), local(2024, 5, 8, 9));
        assert!(!plant.needs_water(local(2024, 5, 7, 23)));
        assert!(plant.needs_water(local(2024, 5, 8, 0)));
    }

    #[test]
    fn language_codes_parse() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::En));
        assert_eq!(" es ".parse::<Language>(), Ok(Language::Es));
        assert!("fr".parse::<Language>().is_err());
    }

    /// Central European time around the 2024 spring-forward switch
    /// (2024-03-31 01:00 UTC).
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    impl SpringForward {
        fn switch() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2024, 3, 31)
                .and_then(|d| d.and_hms_opt(1, 0, 0))
                .unwrap()
        }

        fn winter() -> FixedOffset {
            FixedOffset::east_opt(3600).unwrap()
        }

        fn summer() -> FixedOffset {
            FixedOffset::east_opt(7200).unwrap()
        }
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            SpringForward
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let switch_local = Self::switch() + chrono::Duration::hours(1);
            if *local < switch_local {
                LocalResult::Single(Self::winter())
            } else if *local >= switch_local + chrono::Duration::hours(1) {
                LocalResult::Single(Self::summer())
            } else {
                LocalResult::None
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch() {
                Self::winter()
            } else {
                Self::summer()
            }
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn schedule_counts_calendar_days_across_spring_forward() {
        let mut plant = plant_added_at(utc(2024, 3, 30, 22, 30));
        plant.care_info.water_interval_days = 1;
        let tz = SpringForward;

        assert_eq!(plant.due_date_in(&tz), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        let due = plant.next_watering_in(&tz).with_timezone(&tz);
        assert_eq!(due.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(due.naive_local().time(), chrono::NaiveTime::from_hms_opt(23, 30, 0).unwrap());

        // 23:45 local summer time on the due day.
        let late_evening = utc(2024, 3, 31, 21, 45);
        assert!(plant.needs_water_in(late_evening, &tz));
        assert_eq!(plant.days_until_watering_in(late_evening, &tz), 0);
        assert!(!plant.needs_water_in(utc(2024, 3, 30, 22, 50), &tz));
    }

    #[test]
    fn plant_json_uses_camel_case_keys() {
        let plant = plant_added_at(local(2024, 5, 1, 9));
        let json = serde_json::to_value(&plant).expect("serializes");
        assert!(json.get("botanicalName").is_some());
        assert!(json.get("wateringHistory").is_some());
        assert_eq!(json["careInfo"]["waterIntervalDays"], 7);
    }

    #[test]
    fn missing_history_deserializes_empty() {
        let json = r#"{
            "id": "x", "name": "Aloe", "botanicalName": "Aloe vera",
            "imageUri": "u", "dateAdded": "2024-05-01T09:00:00Z",
            "careInfo": {"waterIntervalDays": 14, "light": "Sunny", "temp": "20-30°C"},
            "lastWatered": "2024-05-01T09:00:00Z"
        }"#;
        let plant: Plant = serde_json::from_str(json).expect("parses");
        assert!(plant.watering_history.is_empty());
        assert!(!plant.reminders_enabled());
    }

    proptest! {
        #[test]
        fn history_stays_capped_and_headed_by_last_watered(days in prop::collection::vec(1u32..3, 0..40)) {
            let mut at = local(2024, 1, 1, 12);
            let mut plant = plant_added_at(at);
            for step in days {
                at += Duration::days(i64::from(step));
                plant.water(at, 10);
                prop_assert!(plant.watering_history.len() <= 10);
                prop_assert_eq!(plant.watering_history[0], plant.last_watered);
            }
        }
    }
}
