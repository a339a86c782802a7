//! Naive linear expense forecast

use super::types::{Forecast, MonthlyTrend, Trend};

/// Project expenses from the last two buckets (in bucket order)
///
/// With fewer than two buckets the forecast is the last bucket's expense
/// (or 0) with no three-month projection and no trend.
pub fn forecast(monthly: &MonthlyTrend) -> Forecast {
    let expenses: Vec<f64> = monthly.values().map(|b| b.expense).collect();

    match expenses.as_slice() {
        [.., second_last, last] => {
            let growth = last - second_last;
            Forecast {
                next_month: (last + growth).round(),
                in_3_months: Some((last + 3.0 * growth).round()),
                trend: Some(if growth > 0.0 {
                    Trend::Upward
                } else {
                    Trend::Downward
                }),
            }
        }
        [only] => Forecast {
            next_month: *only,
            in_3_months: None,
            trend: None,
        },
        [] => Forecast {
            next_month: 0.0,
            in_3_months: None,
            trend: None,
        },
    }
}

/// Average monthly expense over the buckets present, rounded
pub fn monthly_average(expense: f64, bucket_count: usize) -> f64 {
    if bucket_count == 0 {
        return 0.0;
    }
    (expense / bucket_count as f64).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::{MonthKey, MonthlyBucket};

    fn trend(expenses: &[f64]) -> MonthlyTrend {
        let mut trend = MonthlyTrend::new();
        for (i, e) in expenses.iter().enumerate() {
            trend.insert(
                MonthKey {
                    year: 2026,
                    month: i as u32 + 1,
                },
                MonthlyBucket {
                    income: 0.0,
                    expense: *e,
                },
            );
        }
        trend
    }

    #[test]
    fn test_upward_projection() {
        let f = forecast(&trend(&[1000.0, 1500.0]));
        assert_eq!(f.next_month, 2000.0);
        assert_eq!(f.in_3_months, Some(3000.0));
        assert_eq!(f.trend, Some(Trend::Upward));
    }

    #[test]
    fn test_only_last_two_buckets_matter() {
        let f = forecast(&trend(&[9000.0, 1500.0, 1000.0]));
        assert_eq!(f.next_month, 500.0);
        assert_eq!(f.in_3_months, Some(-500.0));
        assert_eq!(f.trend, Some(Trend::Downward));
    }

    #[test]
    fn test_flat_is_downward() {
        let f = forecast(&trend(&[300.0, 300.0]));
        assert_eq!(f.next_month, 300.0);
        assert_eq!(f.trend, Some(Trend::Downward));
    }

    #[test]
    fn test_single_bucket_has_no_trend() {
        let f = forecast(&trend(&[42.5]));
        assert_eq!(f.next_month, 42.5);
        assert_eq!(f.in_3_months, None);
        assert_eq!(f.trend, None);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let f = forecast(&trend(&[10.0, 10.25]));
        // 10.25 + 0.25 = 10.5
        assert_eq!(f.next_month, 11.0);
    }

    #[test]
    fn test_monthly_average() {
        assert_eq!(monthly_average(2500.0, 2), 1250.0);
        assert_eq!(monthly_average(10.0, 3), 3.0);
        assert_eq!(monthly_average(10.0, 0), 0.0);
    }
}
