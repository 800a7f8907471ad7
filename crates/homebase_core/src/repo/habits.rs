//! Habit check-ins.

use super::{RepoResult, Repository};
use crate::model::habits::{Habit, HabitEntry};
use chrono::NaiveDate;

impl Repository<'_> {
    /// Flips the check-in of `habit_id` on `date` and returns the new state.
    ///
    /// Checking in creates the single entry for that day; un-checking removes
    /// it.
    pub fn toggle_habit_entry(&mut self, habit_id: &str, date: NaiveDate) -> RepoResult<bool> {
        self.require::<Habit>(habit_id)?;
        let existing = self
            .doc
            .habit_entries
            .iter()
            .find(|entry| entry.habit_id == habit_id && entry.date == date)
            .map(|entry| entry.id.clone());

        match existing {
            Some(id) => {
                self.remove::<HabitEntry>(&id)?;
                Ok(false)
            }
            None => {
                self.add(HabitEntry::new(habit_id, date))?;
                Ok(true)
            }
        }
    }
}
