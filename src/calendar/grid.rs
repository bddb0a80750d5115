use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Month,
    Week,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Month => ViewMode::Week,
            ViewMode::Week => ViewMode::Month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column headers in display order.
    pub fn day_names(self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }

    /// Number of columns between the week start and `date`.
    pub fn offset_of(self, date: NaiveDate) -> u32 {
        match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        }
    }
}

/// Cells of the visible grid. `None` is a padding cell before the first of the month.
pub fn build(reference: NaiveDate, mode: ViewMode, week_start: WeekStart) -> Vec<Option<NaiveDate>> {
    match mode {
        ViewMode::Month => {
            let first = first_of_month(reference);
            let offset = week_start.offset_of(first) as usize;
            let len = days_in_month(first.year(), first.month());

            let mut cells = vec![None; offset];
            cells.extend(first.iter_days().take(len as usize).map(Some));
            cells
        }
        ViewMode::Week => week_start_of(reference, week_start)
            .iter_days()
            .take(7)
            .map(Some)
            .collect(),
    }
}

pub fn week_start_of(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    date - Duration::days(week_start.offset_of(date) as i64)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(start), Some(end)) => end.signed_duration_since(start).num_days() as u32,
        _ => 30,
    }
}

/// Step one page back (`-1`) or forward (`1`). Month steps clamp the day,
/// so Jan 31 + 1 month lands on the last day of February.
pub fn shift(reference: NaiveDate, mode: ViewMode, step: i32) -> NaiveDate {
    match mode {
        ViewMode::Week => reference + Duration::weeks(step as i64),
        ViewMode::Month => {
            let months = reference.year() * 12 + reference.month0() as i32 + step;
            let year = months.div_euclid(12);
            let month = months.rem_euclid(12) as u32 + 1;
            let day = reference.day().min(days_in_month(year, month));
            NaiveDate::from_ymd_opt(year, month, day).unwrap_or(reference)
        }
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_grid_pads_to_first_weekday() {
        // June 1st 2025 is a Sunday, March 1st 2025 a Saturday.
        let june = build(date(2025, 6, 17), ViewMode::Month, WeekStart::Sunday);
        assert_eq!(june.len(), 30);
        assert_eq!(june[0], Some(date(2025, 6, 1)));

        let march = build(date(2025, 3, 9), ViewMode::Month, WeekStart::Sunday);
        assert_eq!(march.iter().take_while(|c| c.is_none()).count(), 6);
        assert_eq!(march.iter().filter(|c| c.is_some()).count(), 31);
        assert_eq!(march.last().copied().flatten(), Some(date(2025, 3, 31)));
    }

    #[test]
    fn month_grid_respects_monday_start() {
        let march = build(date(2025, 3, 9), ViewMode::Month, WeekStart::Monday);
        assert_eq!(march.iter().take_while(|c| c.is_none()).count(), 5);
    }

    #[test]
    fn month_grid_counts_hold_for_every_month() {
        for year in [2023, 2024] {
            for month in 1..=12 {
                let cells = build(date(year, month, 1), ViewMode::Month, WeekStart::Sunday);
                let first = date(year, month, 1);
                let empties = cells.iter().take_while(|c| c.is_none()).count();
                assert_eq!(empties as u32, first.weekday().num_days_from_sunday());
                assert_eq!(
                    cells.len() - empties,
                    days_in_month(year, month) as usize
                );
                assert!(cells[empties..].iter().all(Option::is_some));
            }
        }
    }

    #[test]
    fn week_grid_is_seven_contiguous_days() {
        // Wednesday
        let cells = build(date(2025, 1, 1), ViewMode::Week, WeekStart::Sunday);
        assert_eq!(cells.len(), 7);
        assert_eq!(cells[0], Some(date(2024, 12, 29)));
        for pair in cells.windows(2) {
            let (a, b) = (pair[0].unwrap(), pair[1].unwrap());
            assert_eq!(b - a, Duration::days(1));
        }

        let monday = build(date(2025, 1, 1), ViewMode::Week, WeekStart::Monday);
        assert_eq!(monday[0], Some(date(2024, 12, 30)));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn shift_clamps_and_wraps_years() {
        assert_eq!(shift(date(2025, 1, 31), ViewMode::Month, 1), date(2025, 2, 28));
        assert_eq!(shift(date(2025, 1, 15), ViewMode::Month, -1), date(2024, 12, 15));
        assert_eq!(shift(date(2024, 12, 30), ViewMode::Week, 1), date(2025, 1, 6));
    }
}
