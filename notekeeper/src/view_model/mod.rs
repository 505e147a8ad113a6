//! Screen state for note-taking front ends
//!
//! These types hold what a UI needs between user actions and contain no
//! rendering code:
//!
//! - [`NoteBrowser`] is the home screen: the note list, its search box and
//!   the total count shown in the header.
//! - [`CalendarComposer`] is the calendar screen: a selected day and the
//!   draft it produces.

/// Home screen
pub mod browser;
/// Calendar screen
pub mod calendar;

pub use browser::NoteBrowser;
pub use calendar::CalendarComposer;
