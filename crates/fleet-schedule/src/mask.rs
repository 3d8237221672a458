//! Weekday service masks.
//!
//! A [`WeekdayMask`] is the set of weekdays on which a template runs, packed
//! into one byte (bit `n` = `n` days after Monday).  Masks are `Copy` and all
//! operations are branch-free bit math, so templates can be filtered by
//! weekday in tight expansion loops without allocation.

use std::fmt;

use chrono::Weekday;

/// All seven weekdays in Monday-first order.
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A set of weekdays, one bit per day.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeekdayMask(u8);

impl WeekdayMask {
    /// No days selected.  A template must never be active with this mask.
    pub const EMPTY: WeekdayMask = WeekdayMask(0);
    /// Every day of the week.
    pub const ALL: WeekdayMask = WeekdayMask(0b0111_1111);
    /// Monday through Friday.
    pub const WEEKDAYS: WeekdayMask = WeekdayMask(0b0001_1111);
    /// Saturday and Sunday.
    pub const WEEKEND: WeekdayMask = WeekdayMask(0b0110_0000);

    #[inline(always)]
    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    /// Build a mask from a slice of days.  Duplicates are harmless.
    pub fn from_days(days: &[Weekday]) -> Self {
        days.iter().copied().collect()
    }

    #[inline]
    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    #[inline]
    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !Self::bit(day);
    }

    #[inline]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of selected days (0..=7).
    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the selected days in Monday-first order.
    pub fn days(self) -> impl Iterator<Item = Weekday> {
        WEEK.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for WeekdayMask {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut mask = WeekdayMask::EMPTY;
        for day in iter {
            mask.insert(day);
        }
        mask
    }
}

impl fmt::Display for WeekdayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for day in self.days() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{day}")?;
            first = false;
        }
        Ok(())
    }
}
