use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An optionally bounded date window used to filter summary queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct DateWindow {
    /// Inclusive lower bound (YYYY-MM-DD); unbounded when absent.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound (YYYY-MM-DD); unbounded when absent.
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Whether the given date falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn unbounded_window_contains_everything() {
        let window = DateWindow::default();
        assert!(window.contains(d(1999, 1, 1)));
        assert!(window.contains(d(2050, 12, 31)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let window = DateWindow::new(Some(d(2026, 3, 1)), Some(d(2026, 3, 31)));
        assert!(window.contains(d(2026, 3, 1)));
        assert!(window.contains(d(2026, 3, 31)));
        assert!(!window.contains(d(2026, 2, 28)));
        assert!(!window.contains(d(2026, 4, 1)));
    }
}
