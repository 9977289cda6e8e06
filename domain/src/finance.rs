//! Finance dashboard figures.
//!
//! Revenue combines the billing provider's mirrored charges with payments
//! recorded in the back office. All amounts are integer cents; mixed
//! currencies are summed as-is.

use crate::billing_charges;
use crate::billing_subscriptions;
use crate::error::Error;
use crate::payments;
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Utc};
use entity_api::{billing, client_activity_period, coach_payment, payment, payment_slot};
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

/// Days in the month subscriptions are normalized to.
const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FinanceKpis {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub gross_revenue_cents: i64,
    pub refunds_cents: i64,
    pub net_revenue_cents: i64,
    pub mrr_cents: i64,
    pub active_subscriptions: u64,
    pub new_subscriptions: u64,
    pub churned_subscriptions: u64,
    /// Churned subscriptions divided by those active at `start`
    pub churn_rate: f64,
    pub coach_payouts_cents: i64,
    pub gross_margin_cents: i64,
    pub outstanding_receivables_cents: i64,
    pub active_clients: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthlyRevenue {
    /// First day of the calendar month
    pub month: NaiveDate,
    pub charge_revenue_cents: i64,
    pub payment_revenue_cents: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubscriptionMovement {
    pub new_subscriptions: u64,
    pub churned_subscriptions: u64,
    pub churn_rate: f64,
}

/// The half-open timestamp window `[start 00:00, end + 1 day 00:00)` in UTC.
fn window(start: NaiveDate, end: NaiveDate) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>), Error> {
    if start > end {
        return Err(Error::validation("start: must be on or before end"));
    }
    let until = end
        .checked_add_days(Days::new(1))
        .ok_or_else(|| Error::validation("end: date is out of range"))?;
    Ok((midnight(start), midnight(until)))
}

fn midnight(day: NaiveDate) -> DateTime<FixedOffset> {
    day.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
        .fixed_offset()
}

/// Monthly value of one subscription in cents, before rounding.
pub fn normalized_monthly_cents(subscription: &billing_subscriptions::Model) -> f64 {
    let factor = match subscription.interval.as_str() {
        "day" => DAYS_PER_MONTH,
        "week" => 52.0 / 12.0,
        "month" => 1.0,
        "year" => 1.0 / 12.0,
        other => {
            warn!(
                "Subscription {} has unknown interval {other}",
                subscription.id
            );
            return 0.0;
        }
    };
    let interval_count = subscription.interval_count.max(1) as f64;
    subscription.unit_amount_cents as f64 * subscription.quantity as f64 * factor / interval_count
}

/// Monthly recurring revenue of the revenue generating subscriptions.
pub fn monthly_recurring_cents(subscriptions: &[billing_subscriptions::Model]) -> i64 {
    subscriptions
        .iter()
        .filter(|s| s.is_revenue_generating())
        .map(normalized_monthly_cents)
        .sum::<f64>()
        .round() as i64
}

/// New, churned and churn rate for subscriptions over `[from, until)`.
pub fn subscription_movement(
    subscriptions: &[billing_subscriptions::Model],
    from: DateTime<FixedOffset>,
    until: DateTime<FixedOffset>,
) -> SubscriptionMovement {
    let in_window = |at: &DateTime<FixedOffset>| *at >= from && *at < until;

    let new_subscriptions = subscriptions
        .iter()
        .filter(|s| in_window(&s.created_at))
        .count() as u64;
    let churned_subscriptions = subscriptions
        .iter()
        .filter(|s| s.canceled_at.as_ref().is_some_and(in_window))
        .count() as u64;
    let active_at_start = subscriptions
        .iter()
        .filter(|s| s.created_at < from && s.canceled_at.map_or(true, |at| at >= from))
        .count() as u64;

    let churn_rate = if active_at_start == 0 {
        0.0
    } else {
        churned_subscriptions as f64 / active_at_start as f64
    };

    SubscriptionMovement {
        new_subscriptions,
        churned_subscriptions,
        churn_rate,
    }
}

fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Buckets revenue into one entry per calendar month from `start` through `end`.
pub fn monthly_revenue_series(
    start: NaiveDate,
    end: NaiveDate,
    charges: &[billing_charges::Model],
    payments: &[payments::Model],
) -> Vec<MonthlyRevenue> {
    let mut series = Vec::new();
    let mut month = month_start(start);
    while month <= end {
        series.push(MonthlyRevenue {
            month,
            charge_revenue_cents: 0,
            payment_revenue_cents: 0,
            total_cents: 0,
        });
        match month.checked_add_months(chrono::Months::new(1)) {
            Some(next) => month = next,
            None => break,
        }
    }

    let bucket = |at: &DateTime<FixedOffset>| {
        let day = month_start(at.with_timezone(&Utc).date_naive());
        series.iter().position(|entry| entry.month == day)
    };

    let charge_buckets: Vec<(usize, i64)> = charges
        .iter()
        .filter_map(|c| bucket(&c.created_at).map(|i| (i, c.amount_cents - c.amount_refunded_cents)))
        .collect();
    let payment_buckets: Vec<(usize, i64)> = payments
        .iter()
        .filter_map(|p| bucket(&p.paid_at).map(|i| (i, p.amount_cents)))
        .collect();

    for (index, cents) in charge_buckets {
        series[index].charge_revenue_cents += cents;
    }
    for (index, cents) in payment_buckets {
        series[index].payment_revenue_cents += cents;
    }
    for entry in series.iter_mut() {
        entry.total_cents = entry.charge_revenue_cents + entry.payment_revenue_cents;
    }
    series
}

pub async fn kpis(db: &DatabaseConnection, start: NaiveDate, end: NaiveDate) -> Result<FinanceKpis, Error> {
    let (from, until) = window(start, end)?;
    debug!("Computing finance KPIs for {start}..={end}");

    let charges = billing::find_succeeded_charges(db, from, until).await?;
    let payments = payment::find_paid_between(db, from, until).await?;
    let revenue_subscriptions = billing::find_revenue_subscriptions(db).await?;
    let live_subscriptions = billing::find_subscriptions_live_between(db, from, until).await?;
    let payouts = coach_payment::find_payouts_ending_between(db, start, end).await?;
    let outstanding = payment_slot::find_outstanding(db, end).await?;
    let active_clients = client_activity_period::count_active_clients(db, start, end).await?;

    let gross_revenue_cents = charges.iter().map(|c| c.amount_cents).sum::<i64>()
        + payments.iter().map(|p| p.amount_cents).sum::<i64>();
    let refunds_cents = charges.iter().map(|c| c.amount_refunded_cents).sum::<i64>();
    let net_revenue_cents = gross_revenue_cents - refunds_cents;
    let coach_payouts_cents = payouts.iter().map(|p| p.amount_cents).sum::<i64>();
    let movement = subscription_movement(&live_subscriptions, from, until);

    Ok(FinanceKpis {
        start,
        end,
        gross_revenue_cents,
        refunds_cents,
        net_revenue_cents,
        mrr_cents: monthly_recurring_cents(&revenue_subscriptions),
        active_subscriptions: revenue_subscriptions.len() as u64,
        new_subscriptions: movement.new_subscriptions,
        churned_subscriptions: movement.churned_subscriptions,
        churn_rate: movement.churn_rate,
        coach_payouts_cents,
        gross_margin_cents: net_revenue_cents - coach_payouts_cents,
        outstanding_receivables_cents: outstanding.iter().map(|s| s.amount_due_cents).sum(),
        active_clients,
    })
}

pub async fn monthly_revenue(
    db: &DatabaseConnection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<MonthlyRevenue>, Error> {
    let (from, until) = window(start, end)?;

    let charges = billing::find_succeeded_charges(db, from, until).await?;
    let payments = payment::find_paid_between(db, from, until).await?;

    Ok(monthly_revenue_series(start, end, &charges, &payments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Id;
    use entity::payment_method::PaymentMethod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn subscription(interval: &str, interval_count: i32, unit_amount_cents: i64) -> billing_subscriptions::Model {
        billing_subscriptions::Model {
            id: format!("sub_{interval}_{interval_count}"),
            customer_id: "cus_1".to_string(),
            customer_email: None,
            status: "active".to_string(),
            unit_amount_cents,
            currency: "usd".to_string(),
            interval: interval.to_string(),
            interval_count,
            quantity: 1,
            current_period_start: midnight(date(2024, 1, 1)),
            current_period_end: midnight(date(2024, 2, 1)),
            canceled_at: None,
            created_at: midnight(date(2023, 6, 1)),
        }
    }

    #[test]
    fn yearly_subscriptions_contribute_a_twelfth() {
        let yearly = subscription("year", 1, 120_000);
        assert_eq!(monthly_recurring_cents(&[yearly]), 10_000);
    }

    #[test]
    fn weekly_subscriptions_scale_by_52_over_12() {
        let weekly = subscription("week", 1, 1_200);
        assert_eq!(monthly_recurring_cents(&[weekly]), 5_200);

        let every_other_week = subscription("week", 2, 1_200);
        assert_eq!(monthly_recurring_cents(&[every_other_week]), 2_600);
    }

    #[test]
    fn daily_and_quantity_multiply() {
        let daily = billing_subscriptions::Model {
            quantity: 2,
            ..subscription("day", 1, 100)
        };
        assert_eq!(monthly_recurring_cents(&[daily]), 6_000);
    }

    #[test]
    fn only_active_and_past_due_count_towards_mrr() {
        let canceled = billing_subscriptions::Model {
            status: "canceled".to_string(),
            ..subscription("month", 1, 5_000)
        };
        let past_due = billing_subscriptions::Model {
            status: "past_due".to_string(),
            ..subscription("month", 1, 5_000)
        };
        assert_eq!(monthly_recurring_cents(&[canceled, past_due]), 5_000);
    }

    #[test]
    fn churn_rate_is_churned_over_active_at_start() {
        let from = midnight(date(2024, 3, 1));
        let until = midnight(date(2024, 4, 1));
        let churned = billing_subscriptions::Model {
            canceled_at: Some(midnight(date(2024, 3, 15))),
            ..subscription("month", 1, 5_000)
        };
        let retained = subscription("month", 1, 5_000);
        let joined = billing_subscriptions::Model {
            created_at: midnight(date(2024, 3, 10)),
            ..subscription("month", 1, 5_000)
        };

        let movement = subscription_movement(&[churned, retained, joined], from, until);

        assert_eq!(movement.new_subscriptions, 1);
        assert_eq!(movement.churned_subscriptions, 1);
        assert_eq!(movement.churn_rate, 0.5);
    }

    #[test]
    fn churn_rate_is_zero_without_subscribers() {
        let from = midnight(date(2024, 3, 1));
        let until = midnight(date(2024, 4, 1));
        assert_eq!(subscription_movement(&[], from, until).churn_rate, 0.0);
    }

    #[test]
    fn window_rejects_start_after_end() {
        assert!(window(date(2024, 3, 2), date(2024, 3, 1)).is_err());
        let (from, until) = window(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert_eq!(until - from, chrono::Duration::days(31));
    }

    #[test]
    fn monthly_series_covers_every_month_in_range() {
        let now = midnight(date(2024, 2, 10));
        let charge = billing_charges::Model {
            id: "ch_1".to_string(),
            customer_id: "cus_1".to_string(),
            amount_cents: 5_000,
            amount_refunded_cents: 1_000,
            currency: "usd".to_string(),
            status: "succeeded".to_string(),
            created_at: now,
        };
        let payment = payments::Model {
            id: Id::new_v4(),
            client_id: Id::new_v4(),
            payment_plan_id: None,
            payment_slot_id: None,
            amount_cents: 2_500,
            currency: "USD".to_string(),
            method: PaymentMethod::Cash,
            paid_at: midnight(date(2024, 3, 31)),
            reference: None,
            created_at: now,
            updated_at: now,
        };

        let series = monthly_revenue_series(date(2024, 1, 15), date(2024, 3, 31), &[charge], &[payment]);

        assert_eq!(
            series.iter().map(|m| m.month).collect::<Vec<_>>(),
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
        );
        assert_eq!(series[0].total_cents, 0);
        assert_eq!(series[1].charge_revenue_cents, 4_000);
        assert_eq!(series[2].payment_revenue_cents, 2_500);
        assert_eq!(series[2].total_cents, 2_500);
    }
}
