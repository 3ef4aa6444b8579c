//! Attendance record ledger
//!
//! Holds the canonical record sequence in insertion order, with an index that
//! makes `(user, date)` a structural key rather than a scanned convention.

use chrono::NaiveDate;
use punchclock_api::{AttendanceRecord, SlotKey};
use punchclock_util::{RecordId, UserId};
use std::collections::HashMap;

/// The in-memory record set
#[derive(Debug, Clone)]
pub struct AttendanceLedger {
    records: Vec<AttendanceRecord>,
    slots: HashMap<SlotKey, usize>,
    next_id: RecordId,
}

impl AttendanceLedger {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            slots: HashMap::new(),
            next_id: RecordId::new(1),
        }
    }

    /// Build a ledger from a loaded sequence.
    ///
    /// Every record is kept in place, but only the first record for a slot is
    /// indexed; later records for the same slot are shadowed and returned so
    /// the caller can report them. The id counter starts past the largest id
    /// seen.
    pub fn from_records(
        records: impl IntoIterator<Item = AttendanceRecord>,
    ) -> (Self, Vec<AttendanceRecord>) {
        let mut ledger = Self::new();
        let mut shadowed = Vec::new();

        for record in records {
            if record.id >= ledger.next_id {
                ledger.next_id = record.id.next();
            }

            let slot = record.slot();
            if ledger.slots.contains_key(&slot) {
                shadowed.push(record.clone());
            } else {
                ledger.slots.insert(slot, ledger.records.len());
            }
            ledger.records.push(record);
        }

        (ledger, shadowed)
    }

    /// All records, oldest insertion first, shadowed ones included
    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record that owns the slot
    pub fn get(&self, slot: &SlotKey) -> Option<&AttendanceRecord> {
        self.slots.get(slot).map(|&index| &self.records[index])
    }

    /// The slot's record, appending one built by `build` if the slot is empty
    pub fn get_or_insert_with(
        &mut self,
        slot: SlotKey,
        build: impl FnOnce(RecordId) -> AttendanceRecord,
    ) -> &mut AttendanceRecord {
        let index = match self.slots.get(&slot) {
            Some(&index) => index,
            None => {
                let id = self.next_id;
                self.next_id = id.next();

                let mut record = build(id);
                record.id = id;
                record.user_id = slot.user_id;
                record.date = slot.date;

                let index = self.records.len();
                self.slots.insert(slot, index);
                self.records.push(record);
                index
            }
        };

        &mut self.records[index]
    }

    /// One user's records, in insertion order
    pub fn by_user(&self, user_id: UserId) -> impl Iterator<Item = &AttendanceRecord> {
        self.records.iter().filter(move |r| r.user_id == user_id)
    }

    /// One day's records, in insertion order
    pub fn by_date(&self, date: NaiveDate) -> impl Iterator<Item = &AttendanceRecord> {
        self.records.iter().filter(move |r| r.date == date)
    }
}

impl Default for AttendanceLedger {
    fn default() -> Self {
        Self::new()
    }
}
