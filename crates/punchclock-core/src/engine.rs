//! Core attendance engine

use chrono::{DateTime, Datelike, Local, NaiveDate};
use punchclock_api::{
    AttendanceRecord, AttendanceStatus, AttendanceSummary, DayState, Location, PunchDecision,
    PunchRejection, SlotKey, TodayView,
};
use punchclock_config::{CorruptStatePolicy, SeedPolicy, Settings};
use punchclock_store::{Store, seed_records};
use punchclock_util::{PunchclockError, Result, UserId, clock_time_of, day_of};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    AttendanceAction, AttendanceLedger, Geofence, GeofenceVerdict, SlotState, Transition,
    TransitionRules, marked, transition,
};

/// Engine handle shared by async callers; the mutex makes every mutation a
/// single writer.
pub type SharedEngine = Arc<tokio::sync::Mutex<AttendanceEngine>>;

/// The attendance engine
pub struct AttendanceEngine {
    ledger: AttendanceLedger,
    store: Arc<dyn Store>,
    geofence: Geofence,
    rules: TransitionRules,
}

impl AttendanceEngine {
    /// Create an engine over an already built ledger
    pub fn new(ledger: AttendanceLedger, store: Arc<dyn Store>, settings: &Settings) -> Self {
        let geofence = Geofence::from_policy(&settings.geofence);
        let rules = TransitionRules {
            strict_punch_out: settings.attendance.strict_punch_out,
        };

        info!(
            records = ledger.len(),
            radius_meters = geofence.radius_meters(),
            geofence_enabled = settings.geofence.enabled,
            strict_punch_out = rules.strict_punch_out,
            "Attendance engine initialized"
        );

        Self {
            ledger,
            store,
            geofence,
            rules,
        }
    }

    /// Load persisted attendance, falling back to the seed dataset.
    ///
    /// Seeded data is written back right away; loaded data is left as stored.
    pub fn load(store: Arc<dyn Store>, settings: &Settings) -> Result<Self> {
        let policy = &settings.attendance;

        let (records, seeded) = match store.load_records() {
            Ok(Some(records)) => (records, false),
            Ok(None) => {
                debug!(seed = ?policy.seed, "No persisted attendance, seeding");
                (initial_records(policy.seed), true)
            }
            Err(e) if e.is_corrupt_data() => match policy.on_corrupt_state {
                CorruptStatePolicy::Fail => return Err(PunchclockError::corrupt(e.to_string())),
                CorruptStatePolicy::Seed => {
                    warn!(error = %e, "Persisted attendance is corrupt, replacing with seed data");
                    (initial_records(policy.seed), true)
                }
            },
            Err(e) => return Err(PunchclockError::store(e.to_string())),
        };

        let (ledger, shadowed) = AttendanceLedger::from_records(records);
        for duplicate in &shadowed {
            warn!(
                record_id = %duplicate.id,
                user_id = %duplicate.user_id,
                date = %duplicate.date,
                "Duplicate attendance record kept; the earlier record for the day is used"
            );
        }

        let engine = Self::new(ledger, store, settings);
        if seeded {
            engine.persist();
        }
        Ok(engine)
    }

    /// Wrap the engine for sharing across tasks
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    pub fn geofence(&self) -> &Geofence {
        &self.geofence
    }

    /// All records in insertion order
    pub fn records(&self) -> &[AttendanceRecord] {
        self.ledger.records()
    }

    /// Set a user's status for a day (today when `date` is `None`).
    ///
    /// Never checks the geofence and never fails.
    pub fn mark(
        &mut self,
        user_id: UserId,
        status: AttendanceStatus,
        date: Option<NaiveDate>,
        now: DateTime<Local>,
    ) -> AttendanceRecord {
        let slot = SlotKey::new(user_id, date.unwrap_or_else(|| day_of(&now)));
        let current = self.ledger.get(&slot).map(SlotState::of);
        let next = marked(current, status, clock_time_of(&now));

        let record = self.write(slot, next);
        info!(user_id = %user_id, date = %slot.date, status = %status, "Attendance marked");
        record
    }

    /// Punch in for today
    pub fn punch_in(
        &mut self,
        user_id: UserId,
        location: Option<Location>,
        now: DateTime<Local>,
    ) -> PunchDecision {
        self.punch(user_id, AttendanceAction::PunchIn { location }, location, now)
    }

    /// Punch out for today; needs a record for the day
    pub fn punch_out(
        &mut self,
        user_id: UserId,
        location: Option<Location>,
        now: DateTime<Local>,
    ) -> PunchDecision {
        self.punch(user_id, AttendanceAction::PunchOut { location }, location, now)
    }

    fn punch(
        &mut self,
        user_id: UserId,
        action: AttendanceAction,
        location: Option<Location>,
        now: DateTime<Local>,
    ) -> PunchDecision {
        let slot = SlotKey::new(user_id, day_of(&now));

        let verdict = self.geofence.evaluate(location.as_ref());
        if let GeofenceVerdict::Outside { distance_meters } = verdict {
            info!(
                user_id = %user_id,
                distance_meters,
                radius_meters = self.geofence.radius_meters(),
                "Punch rejected outside geofence"
            );
            return PunchDecision::Rejected {
                reason: PunchRejection::OutsideGeofence {
                    distance_meters,
                    radius_meters: self.geofence.radius_meters(),
                },
            };
        }
        debug!(user_id = %user_id, verdict = ?verdict, "Geofence passed");

        let current = self.ledger.get(&slot).map(SlotState::of);
        match transition(current, action, slot.date, clock_time_of(&now), self.rules) {
            Transition::Write(next) => {
                let record = self.write(slot, next);
                info!(
                    user_id = %user_id,
                    date = %slot.date,
                    action = ?action,
                    "Punch recorded"
                );
                PunchDecision::Accepted(record)
            }
            Transition::Refuse(reason) => {
                info!(user_id = %user_id, date = %slot.date, reason = ?reason, "Punch refused");
                PunchDecision::Rejected { reason }
            }
        }
    }

    fn write(&mut self, slot: SlotKey, next: SlotState) -> AttendanceRecord {
        let record = self.ledger.get_or_insert_with(slot, |id| {
            AttendanceRecord::new(id, slot.user_id, slot.date, next.status)
        });
        next.apply_to(record);
        let record = record.clone();

        self.persist();
        record
    }

    /// Write the whole sequence to the store. Failures are logged only.
    fn persist(&self) {
        if self.ledger.is_empty() {
            return;
        }

        if let Err(e) = self.store.save_records(self.ledger.records()) {
            warn!(error = %e, records = self.ledger.len(), "Failed to persist attendance records");
        }
    }

    /// Records for one day, in insertion order
    pub fn by_date(&self, date: NaiveDate) -> Vec<AttendanceRecord> {
        self.ledger.by_date(date).cloned().collect()
    }

    /// Records for one user, in insertion order
    pub fn by_user(&self, user_id: UserId) -> Vec<AttendanceRecord> {
        self.ledger.by_user(user_id).cloned().collect()
    }

    pub fn summary_for_user(&self, user_id: UserId) -> AttendanceSummary {
        AttendanceSummary::from_records(self.ledger.by_user(user_id))
    }

    pub fn day_state(&self, user_id: UserId, date: NaiveDate) -> DayState {
        DayState::of(self.ledger.get(&SlotKey::new(user_id, date)))
    }

    /// Today's punch state for a user
    pub fn today(&self, user_id: UserId, now: DateTime<Local>) -> TodayView {
        let date = day_of(&now);
        TodayView::new(date, self.ledger.get(&SlotKey::new(user_id, date)).cloned())
    }

    /// A user's records within one calendar month, newest day first
    pub fn history_for_month(&self, user_id: UserId, year: i32, month: u32) -> Vec<AttendanceRecord> {
        let mut records: Vec<AttendanceRecord> = self
            .ledger
            .by_user(user_id)
            .filter(|r| r.date.year() == year && r.date.month() == month)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }
}

fn initial_records(policy: SeedPolicy) -> Vec<AttendanceRecord> {
    match policy {
        SeedPolicy::Builtin => seed_records(),
        SeedPolicy::Empty => Vec::new(),
    }
}
