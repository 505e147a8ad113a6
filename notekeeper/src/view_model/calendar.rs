use crate::error::{NoteKeeperError, Result};
use crate::notes::{timestamp, NoteDraft};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

/// Day string format used by calendar widgets
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Calendar screen state
///
/// Notes composed after a day is picked carry the start of that day in the
/// local time zone as their creation date and the calendar icon. Without a selection the draft is a
/// plain note stamped at save time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarComposer {
    selected: Option<NaiveDate>,
}

impl CalendarComposer {
    /// Composer with no day selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a day given as `YYYY-MM-DD`
    ///
    /// Days whose start cannot be stored as a note date are rejected and the
    /// previous selection is kept.
    pub fn select_day(&mut self, day: &str) -> Result<NaiveDate> {
        let date = NaiveDate::parse_from_str(day.trim(), DAY_FORMAT)
            .map_err(|e| NoteKeeperError::InvalidDate(format!("'{day}': {e}")))?;
        let start = start_of_day(date).ok_or_else(|| {
            NoteKeeperError::InvalidDate(format!("'{day}' has no local midnight"))
        })?;
        timestamp::check_range(start)?;

        self.selected = Some(date);
        Ok(date)
    }

    /// Currently selected day
    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// Local start of the selected day, as a UTC instant
    pub fn selected_date(&self) -> Option<DateTime<Utc>> {
        self.selected.and_then(start_of_day)
    }

    /// Draft a note for the selected day
    pub fn draft(&self, title: impl Into<String>, description: impl Into<String>) -> NoteDraft {
        match self.selected_date() {
            Some(date) => NoteDraft::calendar(title, description, date),
            None => NoteDraft::note(title, description),
        }
    }

    /// Clear the selection
    pub fn reset(&mut self) {
        self.selected = None;
    }
}

/// Local midnight of `day`
///
/// When a DST jump skips midnight the day starts an hour later.
fn start_of_day(day: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            let shifted = midnight.checked_add_signed(Duration::hours(1))?;
            Local.from_local_datetime(&shifted).earliest()
        })
        .map(|start| start.with_timezone(&Utc))
}
