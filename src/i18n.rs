//! Localized notices and care texts.
//!
//! Every [`Message`] is matched for every [`Language`], so a missing
//! translation is a compile error.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    PlantAdded,
    Watered,
    PlantDeleted,
    ReminderOn,
    ReminderOff,
    ReminderPermissionNeeded,
    NotificationsUnsupported,
    AnalysisFailed,
    /// `{0}`: interval in days.
    CareTextWater,
    /// `{0}`: light requirement.
    CareTextLight,
    /// `{0}`: temperature range.
    CareTextTemp,
    /// `{0}`: formatted date.
    NextWatering,
    /// `{0}`: formatted date.
    LastWatered,
    WaterToday,
    /// `{0}`: days until watering.
    InXDays,
}

pub fn text(language: Language, message: Message) -> &'static str {
    use Message::*;

    match language {
        Language::De => match message {
            PlantAdded => "Pflanze erfolgreich hinzugefügt",
            Watered => "Pflanze wurde gegossen!",
            PlantDeleted => "Pflanze entfernt.",
            ReminderOn => "Aktiviert",
            ReminderOff => "Deaktiviert",
            ReminderPermissionNeeded => "Berechtigung für Benachrichtigungen erforderlich.",
            NotificationsUnsupported => "Benachrichtigungen werden nicht unterstützt.",
            AnalysisFailed => "Fehler bei der Analyse.",
            CareTextWater => "Bodenfeuchtigkeit alle {0} Tage prüfen.",
            CareTextLight => "Ideal für Standorte: {0}.",
            CareTextTemp => "Wohlfühltemperatur: {0}.",
            NextWatering => "Nächstes Gießen: {0}",
            LastWatered => "Zuletzt gegossen: {0}",
            WaterToday => "Heute gießen",
            InXDays => "In {0} Tagen",
        },
        Language::En => match message {
            PlantAdded => "Plant successfully added",
            Watered => "Plant watered!",
            PlantDeleted => "Plant removed.",
            ReminderOn => "Enabled",
            ReminderOff => "Disabled",
            ReminderPermissionNeeded => "Notification permission required.",
            NotificationsUnsupported => "Notifications are not supported.",
            AnalysisFailed => "Analysis failed.",
            CareTextWater => "Check soil moisture every {0} days.",
            CareTextLight => "Ideal location: {0}.",
            CareTextTemp => "Ideal temperature: {0}.",
            NextWatering => "Next watering: {0}",
            LastWatered => "Last watered: {0}",
            WaterToday => "Water today",
            InXDays => "In {0} days",
        },
        Language::Es => match message {
            PlantAdded => "Planta añadida con éxito",
            Watered => "¡Planta regada!",
            PlantDeleted => "Planta eliminada.",
            ReminderOn => "Activado",
            ReminderOff => "Desactivado",
            ReminderPermissionNeeded => "Permiso de notificación requerido.",
            NotificationsUnsupported => "Las notificaciones no son compatibles.",
            AnalysisFailed => "Error en el análisis.",
            CareTextWater => "Revisar humedad cada {0} días.",
            CareTextLight => "Ubicación ideal: {0}.",
            CareTextTemp => "Temperatura ideal: {0}.",
            NextWatering => "Próximo riego: {0}",
            LastWatered => "Último riego: {0}",
            WaterToday => "Regar hoy",
            InXDays => "En {0} días",
        },
    }
}

/// Localized text with `{0}` replaced by `arg`.
pub fn format(language: Language, message: Message, arg: impl std::fmt::Display) -> String {
    text(language, message).replace("{0}", &arg.to_string())
}

/// Numeric date the way each locale writes it, e.g. `31.3.2024`.
pub fn date(language: Language, date: NaiveDate) -> String {
    let (d, m, y) = (date.day(), date.month(), date.year());
    match language {
        Language::De => format!("{d}.{m}.{y}"),
        Language::En => format!("{m}/{d}/{y}"),
        Language::Es => format!("{d}/{m}/{y}"),
    }
}

/// Weekday with day and month, e.g. `Sonntag, 31.3.`.
pub fn weekday_date(language: Language, date: NaiveDate) -> String {
    let weekday = weekday_name(language, date.weekday());
    let (d, m) = (date.day(), date.month());
    match language {
        Language::De => format!("{weekday}, {d}.{m}."),
        Language::En => format!("{weekday}, {m}/{d}"),
        Language::Es => format!("{weekday}, {d}/{m}"),
    }
}

fn weekday_name(language: Language, weekday: Weekday) -> &'static str {
    use Weekday::*;

    let names = match language {
        Language::De => ["Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag", "Sonntag"],
        Language::En => ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"],
        Language::Es => ["lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo"],
    };
    let index = match weekday {
        Mon => 0,
        Tue => 1,
        Wed => 2,
        Thu => 3,
        Fri => 4,
        Sat => 5,
        Sun => 6,
    };
    names[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_filled() {
        assert_eq!(
            format(Language::En, Message::CareTextWater, 7),
            "Check soil moisture every 7 days."
        );
        assert_eq!(format(Language::Es, Message::InXDays, 3), "En 3 días");
    }

    #[test]
    fn dates_follow_locale_order() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(date(Language::De, day), "31.3.2024");
        assert_eq!(date(Language::En, day), "3/31/2024");
        assert_eq!(weekday_date(Language::De, day), "Sonntag, 31.3.");
        assert_eq!(weekday_date(Language::Es, day), "domingo, 31/3");
    }

    #[test]
    fn templates_agree_on_placeholders_across_languages() {
        let messages = [
            Message::PlantAdded,
            Message::Watered,
            Message::PlantDeleted,
            Message::ReminderOn,
            Message::ReminderOff,
            Message::ReminderPermissionNeeded,
            Message::NotificationsUnsupported,
            Message::AnalysisFailed,
            Message::CareTextWater,
            Message::CareTextLight,
            Message::CareTextTemp,
            Message::NextWatering,
            Message::LastWatered,
            Message::WaterToday,
            Message::InXDays,
        ];
        for message in messages {
            let with_arg: Vec<_> = Language::ALL
                .iter()
                .map(|&l| text(l, message).contains("{0}"))
                .collect();
            assert!(with_arg.iter().all(|&b| b == with_arg[0]), "{message:?}");
        }
    }
}
