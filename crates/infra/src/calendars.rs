use stockplan_calendar::{Calendar, CalendarStore};
use stockplan_core::{CalendarName, StoreError};

use crate::keyed_store::{InMemoryKeyedStore, KeyedStore};

/// In-memory configuration calendars for tests/dev.
#[derive(Debug)]
pub struct InMemoryCalendarStore {
    calendars: InMemoryKeyedStore<CalendarName, Calendar>,
}

impl InMemoryCalendarStore {
    pub fn new() -> Self {
        Self {
            calendars: InMemoryKeyedStore::new("calendars"),
        }
    }

    pub fn add(&self, calendar: Calendar) -> Result<(), StoreError> {
        self.calendars.put(calendar)
    }
}

impl Default for InMemoryCalendarStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarStore for InMemoryCalendarStore {
    fn calendar(&self, name: &CalendarName) -> Result<Option<Calendar>, StoreError> {
        self.calendars.get(name)
    }
}
