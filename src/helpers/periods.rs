use crate::schemas::TicketSummaryQuery;
use common::DateWindow;

/// Resolve the summary query's optional bounds into a date window.
pub fn resolve_window(query: &TicketSummaryQuery) -> DateWindow {
    DateWindow::new(query.start_date, query.end_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn missing_bounds_stay_open() {
        let query = TicketSummaryQuery {
            account: None,
            start_date: None,
            end_date: Some(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()),
        };
        let window = resolve_window(&query);
        assert_eq!(window.start, None);
        assert!(window.contains(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()));
    }
}
