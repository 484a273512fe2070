use std::collections::BTreeMap;

use common::AccountOutstanding;
use model::entities::{payment, ticket};
use rust_decimal::Decimal;
use tracing::debug;

/// Per-account remaining due: the profit on unpaid tickets less the
/// partial payments the account has made. Settling payments never enter
/// this figure; they already flipped their tickets to paid.
///
/// Accounts are keyed by their free-text label; an account appears as
/// soon as it has either an unpaid ticket or a partial payment, so a
/// fully settled account with leftover partial credit shows a negative
/// due rather than vanishing.
pub fn outstanding(
    tickets: &[ticket::Model],
    payments: &[payment::Model],
    account: Option<&str>,
) -> Vec<AccountOutstanding> {
    let mut accounts: BTreeMap<&str, AccountOutstanding> = BTreeMap::new();

    for ticket in tickets {
        if let Some(account) = account {
            if ticket.account != account {
                continue;
            }
        }
        if ticket.paid {
            continue;
        }
        let slot = accounts
            .entry(ticket.account.as_str())
            .or_insert_with(|| AccountOutstanding {
                account: ticket.account.clone(),
                unpaid_profit: Decimal::ZERO,
                partial_paid: Decimal::ZERO,
                outstanding_due: Decimal::ZERO,
                unpaid_ticket_count: 0,
            });
        slot.unpaid_profit += ticket.profit;
        slot.unpaid_ticket_count += 1;
    }

    for payment in payments {
        if !payment.is_partial {
            continue;
        }
        if let Some(account) = account {
            if payment.account != account {
                continue;
            }
        }
        let slot = accounts
            .entry(payment.account.as_str())
            .or_insert_with(|| AccountOutstanding {
                account: payment.account.clone(),
                unpaid_profit: Decimal::ZERO,
                partial_paid: Decimal::ZERO,
                outstanding_due: Decimal::ZERO,
                unpaid_ticket_count: 0,
            });
        slot.partial_paid += payment.amount;
    }

    let mut result: Vec<AccountOutstanding> = accounts.into_values().collect();
    for summary in &mut result {
        summary.outstanding_due = summary.unpaid_profit - summary.partial_paid;
    }
    debug!(accounts = result.len(), "computed outstanding dues");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use model::entities::ticket::TravelType;

    fn make_ticket(account: &str, profit: Decimal, paid: bool) -> ticket::Model {
        let now = Utc::now();
        ticket::Model {
            id: 0,
            passenger_name: "p".to_string(),
            pnr: None,
            travel_type: TravelType::Train,
            account: account.to_string(),
            journey_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            fare: Decimal::ZERO,
            amount: Decimal::ZERO,
            profit,
            paid,
            refunded: false,
            refund_date: None,
            refund_amount: None,
            cancellation_charge: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_payment(account: &str, amount: Decimal, is_partial: bool) -> payment::Model {
        let now = Utc::now();
        payment::Model {
            id: 0,
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            amount,
            period: None,
            account: account.to_string(),
            is_partial,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn partial_payments_reduce_the_due() {
        let tickets = vec![
            make_ticket("a", Decimal::new(500, 0), false),
            make_ticket("a", Decimal::new(300, 0), false),
            make_ticket("a", Decimal::new(900, 0), true),
        ];
        let payments = vec![
            make_payment("a", Decimal::new(200, 0), true),
            // Settling payments do not touch the due.
            make_payment("a", Decimal::new(900, 0), false),
        ];

        let result = outstanding(&tickets, &payments, None);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].unpaid_profit, Decimal::new(800, 0));
        assert_eq!(result[0].partial_paid, Decimal::new(200, 0));
        assert_eq!(result[0].outstanding_due, Decimal::new(600, 0));
        assert_eq!(result[0].unpaid_ticket_count, 2);
    }

    #[test]
    fn accounts_group_independently() {
        let tickets = vec![
            make_ticket("a", Decimal::new(100, 0), false),
            make_ticket("b", Decimal::new(250, 0), false),
        ];
        let result = outstanding(&tickets, &[], None);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].account, "a");
        assert_eq!(result[1].account, "b");
        assert_eq!(result[1].outstanding_due, Decimal::new(250, 0));
    }

    #[test]
    fn account_filter_narrows_the_report() {
        let tickets = vec![
            make_ticket("a", Decimal::new(100, 0), false),
            make_ticket("b", Decimal::new(250, 0), false),
        ];
        let result = outstanding(&tickets, &[], Some("b"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].account, "b");
    }

    #[test]
    fn overpaid_account_shows_negative_due() {
        let tickets = vec![make_ticket("a", Decimal::new(100, 0), false)];
        let payments = vec![make_payment("a", Decimal::new(400, 0), true)];
        let result = outstanding(&tickets, &payments, None);
        assert_eq!(result[0].outstanding_due, Decimal::new(-300, 0));
    }
}
