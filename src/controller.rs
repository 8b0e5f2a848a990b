//! Application state and every user-initiated transition on it.
//!
//! The controller owns the plant list, the scan flow, the open detail view
//! and pending notices. Views read [`AppSnapshot`]s and call transition
//! methods; nothing else mutates state.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog;
use crate::error::ActionError;
use crate::i18n::{self, Message};
use crate::identify::{Identification, IdentificationSource};
use crate::models::{IdentificationResult, Language, Plant};
use crate::progress::Progress;
use crate::store::PlantStore;

pub const DEFAULT_HISTORY_CAP: usize = 10;

pub type SharedController = Arc<Mutex<AppController>>;

/// Locks the shared controller. A panic in another holder doesn't leave the
/// state half-written, so a poisoned lock is taken over.
pub fn lock(controller: &SharedController) -> MutexGuard<'_, AppController> {
    controller.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Platform notification permission as reported by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// Not decided yet; the user can still be asked.
    Ask,
    Unsupported,
}

pub trait NotificationPermission {
    fn status(&self) -> Permission;
    fn request(&self) -> Permission;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    #[default]
    Idle,
    Capturing,
    Analyzing,
    Result,
}

#[derive(Debug, Default)]
struct ScanFlow {
    phase: ScanPhase,
    image: Option<String>,
    progress: Progress,
    pending: Option<IdentificationResult>,
    source: Option<IdentificationSource>,
}

/// Handed out when an analysis starts. Results carrying an older generation
/// belong to a flow the user already closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    pub generation: u64,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub message: Message,
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshot {
    pub phase: ScanPhase,
    pub progress: f32,
    pub image: Option<String>,
    pub result: Option<IdentificationResult>,
    pub source: Option<IdentificationSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDetail {
    pub plant: Plant,
    pub watered_today: bool,
    pub next_watering: DateTime<Utc>,
    pub next_watering_text: String,
    pub last_watered_text: String,
    pub water_text: String,
    pub light_text: String,
    pub temp_text: String,
}

/// A plant as listed in the collection, with its watering badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantCard {
    #[serde(flatten)]
    pub plant: Plant,
    pub needs_water: bool,
    pub watering_label: String,
}

/// Read-only view of the whole application state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub language: Language,
    pub plants: Vec<PlantCard>,
    pub plants_to_water: usize,
    pub scan: ScanSnapshot,
    pub detail: Option<PlantDetail>,
    pub toast: Option<Notice>,
    pub alert: Option<Notice>,
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub history_cap: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
        }
    }
}

pub struct AppController {
    store: PlantStore,
    clock: Box<dyn Clock>,
    settings: ControllerSettings,
    language: Language,
    plants: Vec<Plant>,
    scan: ScanFlow,
    generation: u64,
    selected: Option<String>,
    toast: Option<Message>,
    alert: Option<Message>,
}

impl AppController {
    pub fn new(mut store: PlantStore, settings: ControllerSettings) -> Self {
        let plants = store.list_plants();
        let language = store.language_preference();
        info!(plants = plants.len(), %language, "Loaded saved state");

        Self {
            store,
            clock: Box::new(SystemClock),
            settings,
            language,
            plants,
            scan: ScanFlow::default(),
            generation: 0,
            selected: None,
            toast: None,
            alert: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn into_shared(self) -> SharedController {
        Arc::new(Mutex::new(self))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.store.set_language_preference(language);
        info!(%language, "Language changed");
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn scan_phase(&self) -> ScanPhase {
        self.scan.phase
    }

    /// Filters the collection by name or botanical name, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Plant> {
        self.plants.iter().filter(|p| p.matches(query)).collect()
    }

    pub fn open_scanner(&mut self) {
        if self.scan.phase == ScanPhase::Idle {
            self.scan.phase = ScanPhase::Capturing;
        }
    }

    /// Resets the scan flow from any phase. A running analysis keeps going
    /// in the background but its result is discarded.
    pub fn close_scanner(&mut self) {
        if self.scan.phase == ScanPhase::Analyzing {
            info!(generation = self.generation, "Scan closed during analysis");
        }
        self.reset_scan();
    }

    /// Starts analysing a captured photo. Only valid while the scanner is open.
    pub fn begin_analysis(&mut self, image_uri: String) -> Result<AnalysisTicket, ActionError> {
        match self.scan.phase {
            ScanPhase::Capturing => {}
            ScanPhase::Analyzing => return Err(ActionError::AnalysisRunning),
            ScanPhase::Idle | ScanPhase::Result => return Err(ActionError::ScannerClosed),
        }
        self.generation += 1;
        self.scan = ScanFlow {
            phase: ScanPhase::Analyzing,
            image: Some(image_uri),
            ..ScanFlow::default()
        };
        info!(generation = self.generation, language = %self.language, "Analysis started");

        Ok(AnalysisTicket {
            generation: self.generation,
            language: self.language,
        })
    }

    /// One cosmetic progress step. Returns `false` once the timer should stop.
    pub fn tick_progress(&mut self, generation: u64) -> bool {
        if !self.is_current_analysis(generation) || self.scan.progress.is_complete() {
            return false;
        }
        self.scan.progress.advance(&mut rand::thread_rng());
        true
    }

    /// Snaps progress to 100 and parks the result until [`Self::reveal_result`].
    /// Returns `false` if the flow was closed in the meantime.
    pub fn complete_analysis(&mut self, generation: u64, identification: Identification) -> bool {
        if !self.is_current_analysis(generation) {
            debug!(generation, "Discarding identification for a closed scan");
            return false;
        }
        info!(
            generation,
            name = %identification.result.name,
            source = ?identification.source,
            "Analysis complete"
        );
        self.scan.progress.complete();
        self.scan.pending = Some(identification.result);
        self.scan.source = Some(identification.source);
        true
    }

    pub fn reveal_result(&mut self, generation: u64) -> bool {
        if !self.is_current_analysis(generation) || self.scan.pending.is_none() {
            return false;
        }
        self.scan.phase = ScanPhase::Result;
        true
    }

    pub fn fail_analysis(&mut self, generation: u64) {
        if !self.is_current_analysis(generation) {
            return;
        }
        warn!(generation, "Analysis aborted");
        self.reset_scan();
        self.alert = Some(Message::AnalysisFailed);
    }

    /// Shows a catalog entry as if it had just been scanned, so it can be saved.
    pub fn preview_catalog_entry(&mut self, index: usize) -> Result<(), ActionError> {
        if self.scan.phase == ScanPhase::Analyzing {
            return Err(ActionError::AnalysisRunning);
        }
        let entry = catalog::entry(index, self.language).ok_or(ActionError::CatalogIndex(index))?;

        self.generation += 1;
        let mut progress = Progress::default();
        progress.complete();
        self.scan = ScanFlow {
            phase: ScanPhase::Result,
            image: Some(entry.image_uri.to_owned()),
            progress,
            pending: Some(entry.to_identification()),
            source: None,
        };
        Ok(())
    }

    /// Turns the pending identification into a saved plant.
    pub fn save_pending(&mut self) -> Result<Plant, ActionError> {
        if self.scan.phase != ScanPhase::Result {
            return Err(ActionError::NothingPending);
        }
        let (Some(result), Some(image)) = (self.scan.pending.as_ref(), self.scan.image.as_ref()) else {
            return Err(ActionError::NothingPending);
        };

        let plant = Plant::from_identification(
            self.fresh_id(),
            result,
            image.clone(),
            self.clock.now(),
        );
        info!(plant_id = %plant.id, name = %plant.name, "Plant saved");

        self.store.save(plant.clone());
        self.plants.insert(0, plant.clone());
        self.reset_scan();
        self.toast = Some(Message::PlantAdded);
        Ok(plant)
    }

    pub fn select_plant(&mut self, id: &str) -> Result<(), ActionError> {
        self.find(id)?;
        self.selected = Some(id.to_owned());
        Ok(())
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// Waters a plant. Returns `Ok(false)` when it was already watered today.
    pub fn water(&mut self, id: &str) -> Result<bool, ActionError> {
        let now = self.clock.now();
        let cap = self.settings.history_cap;
        let index = self.find(id)?;

        let plant = &mut self.plants[index];
        if !plant.water(now, cap) {
            debug!(plant_id = %id, "Already watered today");
            return Ok(false);
        }
        info!(plant_id = %id, history = plant.watering_history.len(), "Plant watered");

        self.store.update(&self.plants[index]);
        self.toast = Some(Message::Watered);
        Ok(true)
    }

    /// Removes a plant. Unknown ids are ignored and return `false`.
    pub fn delete(&mut self, id: &str) -> bool {
        self.store.delete(id);
        let before = self.plants.len();
        self.plants.retain(|p| p.id != id);
        let removed = self.plants.len() != before;

        self.selected = None;
        if removed {
            info!(plant_id = %id, "Plant deleted");
            self.toast = Some(Message::PlantDeleted);
        }
        removed
    }

    /// Flips the reminder flag. Enabling needs notification permission; if it
    /// is missing the flag stays off and an alert is raised. Returns the flag
    /// after the call.
    pub fn toggle_reminder(
        &mut self,
        id: &str,
        permission: &dyn NotificationPermission,
    ) -> Result<bool, ActionError> {
        let index = self.find(id)?;
        if self.plants[index].reminders_enabled() {
            self.set_reminder(index, false);
            return Ok(false);
        }

        let granted = match permission.status() {
            Permission::Granted => Permission::Granted,
            Permission::Ask => permission.request(),
            other => other,
        };
        match granted {
            Permission::Granted => {
                self.set_reminder(index, true);
                Ok(true)
            }
            Permission::Unsupported => {
                self.alert = Some(Message::NotificationsUnsupported);
                Ok(false)
            }
            Permission::Denied | Permission::Ask => {
                self.alert = Some(Message::ReminderPermissionNeeded);
                Ok(false)
            }
        }
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn plants_to_water(&self) -> usize {
        let now = self.clock.now();
        self.plants.iter().filter(|p| p.needs_water(now)).count()
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let scan = &self.scan;
        let phase = scan.phase;
        let revealed = phase == ScanPhase::Result;

        AppSnapshot {
            language: self.language,
            plants: self.plants.iter().map(|p| self.card(p)).collect(),
            plants_to_water: self.plants_to_water(),
            scan: ScanSnapshot {
                phase,
                progress: scan.progress.value(),
                image: scan.image.clone(),
                result: scan.pending.clone().filter(|_| revealed),
                source: scan.source.filter(|_| revealed),
            },
            detail: self
                .selected
                .as_deref()
                .and_then(|id| self.plants.iter().find(|p| p.id == id))
                .map(|p| self.detail(p)),
            toast: self.toast.map(|m| self.notice(m)),
            alert: self.alert.map(|m| self.notice(m)),
        }
    }

    fn card(&self, plant: &Plant) -> PlantCard {
        let days = plant.days_until_watering(self.clock.now());
        let watering_label = if days <= 0 {
            i18n::text(self.language, Message::WaterToday).to_owned()
        } else {
            i18n::format(self.language, Message::InXDays, days)
        };
        PlantCard {
            plant: plant.clone(),
            needs_water: days <= 0,
            watering_label,
        }
    }

    fn detail(&self, plant: &Plant) -> PlantDetail {
        let today = self.clock.now().with_timezone(&Local).date_naive();
        let care = &plant.care_info;
        let next_watering = plant.next_watering();
        let next_day = next_watering.with_timezone(&Local).date_naive();
        let last_day = plant.last_watered.with_timezone(&Local).date_naive();
        PlantDetail {
            plant: plant.clone(),
            watered_today: plant.is_watered_on(today),
            next_watering,
            next_watering_text: i18n::format(
                self.language,
                Message::NextWatering,
                i18n::weekday_date(self.language, next_day),
            ),
            last_watered_text: i18n::format(
                self.language,
                Message::LastWatered,
                i18n::date(self.language, last_day),
            ),
            water_text: i18n::format(self.language, Message::CareTextWater, care.water_interval_days),
            light_text: i18n::format(self.language, Message::CareTextLight, &care.light),
            temp_text: i18n::format(self.language, Message::CareTextTemp, &care.temp),
        }
    }

    fn notice(&self, message: Message) -> Notice {
        Notice {
            message,
            text: i18n::text(self.language, message),
        }
    }

    fn set_reminder(&mut self, index: usize, enabled: bool) {
        self.plants[index].notifications_enabled = Some(enabled);
        self.store.update(&self.plants[index]);
        self.toast = Some(if enabled {
            Message::ReminderOn
        } else {
            Message::ReminderOff
        });
        info!(plant_id = %self.plants[index].id, enabled, "Reminder toggled");
    }

    fn find(&self, id: &str) -> Result<usize, ActionError> {
        self.plants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ActionError::PlantNotFound(id.to_owned()))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.plants.iter().all(|p| p.id != id) {
                return id;
            }
        }
    }

    fn is_current_analysis(&self, generation: u64) -> bool {
        generation == self.generation && self.scan.phase == ScanPhase::Analyzing
    }

    fn reset_scan(&mut self) {
        self.generation += 1;
        self.scan = ScanFlow::default();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::sample_result;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    /// Clock whose time tests can move.
    #[derive(Clone)]
    pub(crate) struct ManualClock(pub Arc<Mutex<DateTime<Utc>>>);

    impl ManualClock {
        pub(crate) fn at(time: DateTime<Utc>) -> Self {
            Self(Arc::new(Mutex::new(time)))
        }

        pub(crate) fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    struct FixedPermission {
        status: Permission,
        answer: Permission,
    }

    impl NotificationPermission for FixedPermission {
        fn status(&self) -> Permission {
            self.status
        }

        fn request(&self) -> Permission {
            self.answer
        }
    }

    fn permission(status: Permission, answer: Permission) -> FixedPermission {
        FixedPermission { status, answer }
    }

    fn noon() -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    pub(crate) fn controller() -> (AppController, ManualClock) {
        let clock = ManualClock::at(noon());
        let store = PlantStore::open(":memory:").unwrap();
        let controller = AppController::new(store, ControllerSettings::default()).with_clock(clock.clone());
        (controller, clock)
    }

    fn identification(name: &str) -> Identification {
        Identification {
            result: sample_result(name, &format!("{name} botanica")),
            source: IdentificationSource::FallbackUsed,
        }
    }

    fn scan_and_save(controller: &mut AppController, name: &str) -> Plant {
        controller.open_scanner();
        let ticket = controller.begin_analysis("data:image/jpeg;base64,AAAA".into()).unwrap();
        assert!(controller.complete_analysis(ticket.generation, identification(name)));
        assert!(controller.reveal_result(ticket.generation));
        controller.save_pending().unwrap()
    }

    #[test]
    fn scan_flow_walks_through_every_phase() {
        let (mut c, _) = controller();
        assert_eq!(c.scan_phase(), ScanPhase::Idle);
        c.open_scanner();
        assert_eq!(c.scan_phase(), ScanPhase::Capturing);

        let ticket = c.begin_analysis("data:image/jpeg;base64,AAAA".into()).unwrap();
        assert_eq!(c.scan_phase(), ScanPhase::Analyzing);
        for _ in 0..500 {
            assert!(c.tick_progress(ticket.generation));
        }
        assert_eq!(c.snapshot().scan.progress, 90.0);

        assert!(c.complete_analysis(ticket.generation, identification("Monstera")));
        let held = c.snapshot();
        assert_eq!(held.scan.progress, 100.0);
        assert_eq!(held.scan.phase, ScanPhase::Analyzing);
        assert!(held.scan.result.is_none());
        assert!(!c.tick_progress(ticket.generation));

        assert!(c.reveal_result(ticket.generation));
        let shown = c.snapshot();
        assert_eq!(shown.scan.phase, ScanPhase::Result);
        assert_eq!(shown.scan.result.unwrap().name, "Monstera");
        assert_eq!(shown.scan.source, Some(IdentificationSource::FallbackUsed));

        c.save_pending().unwrap();
        assert_eq!(c.scan_phase(), ScanPhase::Idle);
    }

    #[test]
    fn save_puts_fresh_plant_at_the_head() {
        let (mut c, _) = controller();
        let first = scan_and_save(&mut c, "Aloe");
        let second = scan_and_save(&mut c, "Basil");

        assert_ne!(first.id, second.id);
        assert_eq!(c.plants()[0], second);
        assert_eq!(c.store.list_plants()[0], second);
        assert_eq!(second.watering_history, vec![noon()]);
        assert_eq!(c.snapshot().toast.unwrap().message, Message::PlantAdded);
    }

    #[test]
    fn save_without_result_is_rejected() {
        let (mut c, _) = controller();
        assert_eq!(c.save_pending(), Err(ActionError::NothingPending));
        c.open_scanner();
        c.begin_analysis("data:image/jpeg;base64,AAAA".into()).unwrap();
        assert_eq!(c.save_pending(), Err(ActionError::NothingPending));
    }

    #[test]
    fn closing_discards_a_late_result() {
        let (mut c, _) = controller();
        c.open_scanner();
        let ticket = c.begin_analysis("data:image/jpeg;base64,AAAA".into()).unwrap();
        c.close_scanner();

        assert!(!c.tick_progress(ticket.generation));
        assert!(!c.complete_analysis(ticket.generation, identification("Aloe")));
        assert!(!c.reveal_result(ticket.generation));
        let snapshot = c.snapshot();
        assert_eq!(snapshot.scan.phase, ScanPhase::Idle);
        assert_eq!(snapshot.scan.progress, 0.0);
        assert!(snapshot.scan.image.is_none());
    }

    #[test]
    fn failed_analysis_returns_to_idle_with_alert() {
        let (mut c, _) = controller();
        c.set_language(Language::En);
        c.open_scanner();
        let ticket = c.begin_analysis("data:image/jpeg;base64,AAAA".into()).unwrap();
        c.fail_analysis(ticket.generation);

        let snapshot = c.snapshot();
        assert_eq!(snapshot.scan.phase, ScanPhase::Idle);
        assert!(snapshot.scan.image.is_none());
        assert_eq!(snapshot.alert.unwrap().text, "Analysis failed.");
    }

    #[test]
    fn second_analysis_while_running_is_rejected() {
        let (mut c, _) = controller();
        c.open_scanner();
        c.begin_analysis("data:a".into()).unwrap();
        assert_eq!(c.begin_analysis("data:b".into()), Err(ActionError::AnalysisRunning));
    }

    #[test]
    fn analysis_needs_an_open_scanner() {
        let (mut c, _) = controller();
        assert_eq!(c.begin_analysis("data:a".into()), Err(ActionError::ScannerClosed));
        assert_eq!(c.scan_phase(), ScanPhase::Idle);

        c.preview_catalog_entry(0).unwrap();
        assert_eq!(c.begin_analysis("data:a".into()), Err(ActionError::ScannerClosed));
        assert_eq!(c.scan_phase(), ScanPhase::Result);
    }

    #[test]
    fn watering_twice_in_one_day_adds_one_entry() {
        let (mut c, clock) = controller();
        let plant = scan_and_save(&mut c, "Aloe");
        clock.advance(Duration::days(1));

        assert_eq!(c.water(&plant.id), Ok(true));
        assert_eq!(c.water(&plant.id), Ok(false));

        let stored = &c.store.list_plants()[0];
        assert_eq!(stored.watering_history.len(), 2);
        assert_eq!(stored.watering_history[0], stored.last_watered);
        assert_eq!(stored.last_watered, noon() + Duration::days(1));
    }

    #[test]
    fn watering_history_is_capped() {
        let (mut c, clock) = controller();
        let plant = scan_and_save(&mut c, "Aloe");
        for _ in 0..25 {
            clock.advance(Duration::days(1));
            assert_eq!(c.water(&plant.id), Ok(true));
        }
        let watered = &c.plants()[0];
        assert_eq!(watered.watering_history.len(), DEFAULT_HISTORY_CAP);
        assert_eq!(watered.watering_history[0], watered.last_watered);
    }

    #[test]
    fn watering_unknown_plant_is_an_error() {
        let (mut c, _) = controller();
        assert_eq!(c.water("nope"), Err(ActionError::PlantNotFound("nope".into())));
    }

    #[test]
    fn detail_view_tracks_watering_and_closes_on_delete() {
        let (mut c, clock) = controller();
        let plant = scan_and_save(&mut c, "Aloe");
        c.select_plant(&plant.id).unwrap();
        assert!(c.snapshot().detail.unwrap().watered_today);

        clock.advance(Duration::days(2));
        assert!(!c.snapshot().detail.unwrap().watered_today);
        c.water(&plant.id).unwrap();
        let detail = c.snapshot().detail.unwrap();
        assert!(detail.watered_today);
        assert_eq!(detail.next_watering, noon() + Duration::days(9));

        assert!(c.delete(&plant.id));
        assert!(c.snapshot().detail.is_none());
    }

    #[test]
    fn delete_is_idempotent() {
        let (mut c, _) = controller();
        let keep = scan_and_save(&mut c, "Aloe");
        let gone = scan_and_save(&mut c, "Basil");
        c.dismiss_toast();

        assert!(!c.delete("missing"));
        assert_eq!(c.plants().len(), 2);
        assert!(c.snapshot().toast.is_none());

        assert!(c.delete(&gone.id));
        assert_eq!(c.plants(), [keep.clone()]);
        assert_eq!(c.store.list_plants(), vec![keep]);
    }

    #[test]
    fn reminder_needs_permission_to_turn_on() {
        let (mut c, _) = controller();
        let plant = scan_and_save(&mut c, "Aloe");

        let denied = permission(Permission::Denied, Permission::Denied);
        assert_eq!(c.toggle_reminder(&plant.id, &denied), Ok(false));
        assert_eq!(c.snapshot().alert.unwrap().message, Message::ReminderPermissionNeeded);
        assert!(!c.plants()[0].reminders_enabled());

        let unsupported = permission(Permission::Unsupported, Permission::Unsupported);
        assert_eq!(c.toggle_reminder(&plant.id, &unsupported), Ok(false));
        assert_eq!(c.snapshot().alert.unwrap().message, Message::NotificationsUnsupported);

        let asked = permission(Permission::Ask, Permission::Granted);
        assert_eq!(c.toggle_reminder(&plant.id, &asked), Ok(true));
        assert!(c.store.list_plants()[0].reminders_enabled());

        // Turning off never consults the permission.
        assert_eq!(c.toggle_reminder(&plant.id, &denied), Ok(false));
        assert!(!c.store.list_plants()[0].reminders_enabled());
    }

    #[test]
    fn search_filters_in_memory_plants() {
        let (mut c, _) = controller();
        scan_and_save(&mut c, "Monstera");
        scan_and_save(&mut c, "Aloe");

        let hits: Vec<_> = c.search("MON").into_iter().map(|p| p.name.as_str()).collect();
        assert_eq!(hits, ["Monstera"]);
        assert_eq!(c.search("").len(), 2);
        assert!(c.search("cactus").is_empty());
    }

    #[test]
    fn catalog_preview_can_be_saved() {
        let (mut c, _) = controller();
        c.set_language(Language::Es);
        c.preview_catalog_entry(0).unwrap();
        let plant = c.save_pending().unwrap();

        assert_eq!(plant.name, "Costilla de Adán");
        assert!(plant.image_uri.starts_with("https://"));
        assert_eq!(
            c.preview_catalog_entry(99),
            Err(ActionError::CatalogIndex(99))
        );
    }

    #[test]
    fn state_is_restored_from_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("state.db");
        let url = url.to_str().unwrap();

        let saved = {
            let mut c = AppController::new(PlantStore::open(url).unwrap(), ControllerSettings::default());
            c.set_language(Language::En);
            scan_and_save(&mut c, "Aloe")
        };

        let c = AppController::new(PlantStore::open(url).unwrap(), ControllerSettings::default());
        assert_eq!(c.language(), Language::En);
        assert_eq!(c.plants(), [saved]);
    }

    #[test]
    fn snapshot_counts_thirsty_plants_and_localizes_care() {
        let (mut c, clock) = controller();
        c.set_language(Language::De);
        let plant = scan_and_save(&mut c, "Aloe");
        assert_eq!(c.snapshot().plants_to_water, 0);

        clock.advance(Duration::days(7));
        assert_eq!(c.snapshot().plants_to_water, 1);

        c.select_plant(&plant.id).unwrap();
        let detail = c.snapshot().detail.unwrap();
        assert_eq!(detail.water_text, "Bodenfeuchtigkeit alle 7 Tage prüfen.");
        // Saved on Saturday 2024-06-01, due Saturday 2024-06-08.
        assert_eq!(detail.last_watered_text, "Zuletzt gegossen: 1.6.2024");
        assert_eq!(detail.next_watering_text, "Nächstes Gießen: Samstag, 8.6.");
    }

    #[test]
    fn cards_count_down_to_the_next_watering() {
        let (mut c, clock) = controller();
        c.set_language(Language::En);
        scan_and_save(&mut c, "Aloe");

        let snapshot = c.snapshot();
        let card = &snapshot.plants[0];
        assert_eq!(card.watering_label, "In 7 days");
        assert!(!card.needs_water);

        clock.advance(Duration::days(5));
        assert_eq!(c.snapshot().plants[0].watering_label, "In 2 days");

        clock.advance(Duration::days(3));
        let snapshot = c.snapshot();
        let card = &snapshot.plants[0];
        assert_eq!(card.watering_label, "Water today");
        assert!(card.needs_water);
        assert_eq!(card.plant.name, "Aloe");
    }
}
