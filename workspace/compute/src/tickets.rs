use common::{DateWindow, TicketSummary, TicketTypeSummary};
use model::entities::ticket::{self, TravelType};
use rust_decimal::Decimal;
use tracing::debug;

fn type_label(travel_type: TravelType) -> &'static str {
    match travel_type {
        TravelType::Train => "Train",
        TravelType::Bus => "Bus",
        TravelType::Flight => "Flight",
    }
}

/// Groups tickets by travel type and sums count, billed amount and profit
/// per type and overall. A single O(n) pass; the per-type profit totals
/// re-sum to the overall total by construction.
///
/// Tickets outside the window (by journey date) or on a different account
/// are skipped. Types with no tickets are omitted from `by_type`.
pub fn summarize(
    tickets: &[ticket::Model],
    account: Option<&str>,
    window: DateWindow,
) -> TicketSummary {
    let mut groups: Vec<(TravelType, TicketTypeSummary)> = Vec::new();
    let mut ticket_count = 0u64;
    let mut amount_total = Decimal::ZERO;
    let mut profit_total = Decimal::ZERO;

    for ticket in tickets {
        if let Some(account) = account {
            if ticket.account != account {
                continue;
            }
        }
        if !window.contains(ticket.journey_date) {
            continue;
        }

        ticket_count += 1;
        amount_total += ticket.amount;
        profit_total += ticket.profit;

        match groups.iter_mut().find(|(t, _)| *t == ticket.travel_type) {
            Some((_, group)) => {
                group.count += 1;
                group.amount_total += ticket.amount;
                group.profit_total += ticket.profit;
            }
            None => groups.push((
                ticket.travel_type,
                TicketTypeSummary {
                    travel_type: type_label(ticket.travel_type).to_string(),
                    count: 1,
                    amount_total: ticket.amount,
                    profit_total: ticket.profit,
                },
            )),
        }
    }

    // Fixed Train/Bus/Flight ordering so chart segments stay stable.
    groups.sort_by_key(|(t, _)| match t {
        TravelType::Train => 0,
        TravelType::Bus => 1,
        TravelType::Flight => 2,
    });

    debug!(
        ticket_count,
        groups = groups.len(),
        "summarized tickets by travel type"
    );

    TicketSummary {
        by_type: groups.into_iter().map(|(_, g)| g).collect(),
        ticket_count,
        amount_total,
        profit_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn make_ticket(
        travel_type: TravelType,
        account: &str,
        date: NaiveDate,
        amount: Decimal,
        profit: Decimal,
    ) -> ticket::Model {
        let now = Utc::now();
        ticket::Model {
            id: 0,
            passenger_name: "p".to_string(),
            pnr: None,
            travel_type,
            account: account.to_string(),
            journey_date: date,
            fare: amount - profit,
            amount,
            profit,
            paid: false,
            refunded: false,
            refund_date: None,
            refund_amount: None,
            cancellation_charge: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn per_type_profits_sum_to_overall_total() {
        let tickets = vec![
            make_ticket(TravelType::Train, "a", d(2026, 1, 5), Decimal::new(150000, 2), Decimal::new(10000, 2)),
            make_ticket(TravelType::Train, "a", d(2026, 1, 9), Decimal::new(98000, 2), Decimal::new(7500, 2)),
            make_ticket(TravelType::Flight, "a", d(2026, 2, 1), Decimal::new(620000, 2), Decimal::new(45000, 2)),
            make_ticket(TravelType::Bus, "b", d(2026, 2, 3), Decimal::new(40000, 2), Decimal::new(5000, 2)),
        ];

        let summary = summarize(&tickets, None, DateWindow::default());

        assert_eq!(summary.ticket_count, 4);
        let per_type: Decimal = summary.by_type.iter().map(|g| g.profit_total).sum();
        assert_eq!(per_type, summary.profit_total);
        assert_eq!(summary.profit_total, Decimal::new(67500, 2));
    }

    #[test]
    fn groups_keep_train_bus_flight_order() {
        let tickets = vec![
            make_ticket(TravelType::Flight, "a", d(2026, 1, 1), Decimal::ONE, Decimal::ONE),
            make_ticket(TravelType::Train, "a", d(2026, 1, 2), Decimal::ONE, Decimal::ONE),
            make_ticket(TravelType::Bus, "a", d(2026, 1, 3), Decimal::ONE, Decimal::ONE),
        ];

        let summary = summarize(&tickets, None, DateWindow::default());
        let labels: Vec<&str> = summary.by_type.iter().map(|g| g.travel_type.as_str()).collect();
        assert_eq!(labels, vec!["Train", "Bus", "Flight"]);
    }

    #[test]
    fn account_and_window_filters_apply() {
        let tickets = vec![
            make_ticket(TravelType::Train, "a", d(2026, 1, 5), Decimal::new(100, 0), Decimal::new(10, 0)),
            make_ticket(TravelType::Train, "b", d(2026, 1, 6), Decimal::new(100, 0), Decimal::new(10, 0)),
            make_ticket(TravelType::Train, "a", d(2026, 3, 1), Decimal::new(100, 0), Decimal::new(10, 0)),
        ];

        let window = DateWindow::new(Some(d(2026, 1, 1)), Some(d(2026, 1, 31)));
        let summary = summarize(&tickets, Some("a"), window);

        assert_eq!(summary.ticket_count, 1);
        assert_eq!(summary.profit_total, Decimal::new(10, 0));
    }

    #[test]
    fn empty_input_gives_zero_totals() {
        let summary = summarize(&[], None, DateWindow::default());
        assert!(summary.by_type.is_empty());
        assert_eq!(summary.ticket_count, 0);
        assert_eq!(summary.profit_total, Decimal::ZERO);
    }
}
