//! Planner card moves.

use super::{not_found, RepoResult, Repository};
use crate::model::entity::{ContainerKey, Entity, Ordered};
use crate::model::planner::{Card, Day, Location};
use crate::ordering::{append_order, apply_order};
use chrono::{Days, NaiveDate};

impl Repository<'_> {
    /// Drops a card into `location` and applies `ordered_ids` as the new
    /// sibling order of that container.
    ///
    /// A dated card dropped on another weekday keeps its week: the date moves
    /// to the target weekday of the same Monday-to-Sunday week. A card missing
    /// from `ordered_ids` is appended after its new siblings.
    pub fn move_card(
        &mut self,
        id: &str,
        location: Location,
        ordered_ids: &[String],
    ) -> RepoResult<()> {
        let now = self.now;
        let tail = append_order(&self.doc.cards, &ContainerKey::Planner(location));
        let card = self
            .doc
            .cards
            .get_mut(id)
            .ok_or_else(|| not_found(Card::KIND, id))?;

        let moved = card.location != location;
        if let (Some(date), Some(day)) = (card.date, location.day) {
            card.date = Some(shift_to_weekday(date, day));
        }
        card.location = location;
        card.enforce_date_invariant();
        if moved {
            card.order = tail;
        }
        card.touch(now);

        let container = card.container();
        apply_order(&mut self.doc.cards, &container, ordered_ids);
        Ok(())
    }
}

/// Same week as `date`, on `day`.
fn shift_to_weekday(date: NaiveDate, day: Day) -> NaiveDate {
    let current = Day::of(date).index();
    let target = day.index();
    let shifted = if target >= current {
        date.checked_add_days(Days::new((target - current).unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new((current - target).unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::shift_to_weekday;
    use crate::model::planner::Day;
    use chrono::NaiveDate;

    #[test]
    fn shift_stays_inside_monday_based_week() {
        let friday = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(
            shift_to_weekday(friday, Day::Mon),
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
        assert_eq!(
            shift_to_weekday(friday, Day::Sun),
            NaiveDate::from_ymd_opt(2025, 1, 12).unwrap()
        );
    }
}
