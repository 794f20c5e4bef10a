//! Aggregate statistics for the dashboard.
//!
//! Everything here is computed client-side from the full bike and
//! maintenance lists; nothing is cached between invocations.

use chrono::Datelike;

use crate::api::types::{Bike, Maintenance};
use crate::api::{ApiClient, ApiResult};
use crate::maintenance::sort_newest_first;

/// Size of the "recent maintenances" slice.
pub const RECENT_LIMIT: usize = 5;

const MONTHS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// One bar of the monthly chart.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    /// pt-BR month abbreviation, e.g. `mar`
    pub label: String,
    pub cost: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_bikes: usize,
    pub total_maintenances: usize,
    pub total_spent: f64,
    /// Zero when there are no maintenance records.
    pub average_cost: f64,
    /// Most recent records by service date, newest first.
    pub recent: Vec<Maintenance>,
    /// `recent` grouped by calendar month in first-seen order.
    pub monthly: Vec<MonthlyPoint>,
}

impl DashboardStats {
    pub fn compute(bikes: &[Bike], mut maintenances: Vec<Maintenance>) -> Self {
        let total_maintenances = maintenances.len();
        let total_spent: f64 = maintenances.iter().map(Maintenance::cost_or_zero).sum();
        let average_cost = if total_maintenances == 0 {
            0.0
        } else {
            total_spent / total_maintenances as f64
        };

        sort_newest_first(&mut maintenances);
        maintenances.truncate(RECENT_LIMIT);
        let monthly = group_by_month(&maintenances);

        Self {
            total_bikes: bikes.len(),
            total_maintenances,
            total_spent,
            average_cost,
            recent: maintenances,
            monthly,
        }
    }
}

/// pt-BR abbreviation for a 1-based month number.
pub fn month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS_PT_BR.get(i as usize))
        .copied()
        .unwrap_or("?")
}

fn group_by_month(records: &[Maintenance]) -> Vec<MonthlyPoint> {
    let mut points: Vec<MonthlyPoint> = Vec::new();
    for record in records {
        let Some(date) = record.service_datetime() else {
            continue;
        };
        let (year, month) = (date.year(), date.month());
        match points.iter_mut().find(|p| p.year == year && p.month == month) {
            Some(point) => {
                point.cost += record.cost_or_zero();
                point.count += 1;
            }
            None => points.push(MonthlyPoint {
                year,
                month,
                label: month_label(month).to_string(),
                cost: record.cost_or_zero(),
                count: 1,
            }),
        }
    }
    points
}

/// Fetches bikes and maintenances concurrently and aggregates them.
///
/// # Errors
/// Fails if either fetch fails; the two failures are not distinguished.
pub async fn load(client: &ApiClient) -> ApiResult<DashboardStats> {
    let bikes = client.bikes();
    let maintenances = client.maintenances();
    let (bikes, maintenances) = tokio::try_join!(bikes.list(), maintenances.list())?;
    tracing::debug!(
        bikes = bikes.len(),
        maintenances = maintenances.len(),
        "dashboard data loaded"
    );
    Ok(DashboardStats::compute(&bikes, maintenances))
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    use super::*;
    use crate::api::test_support::setup;
    use crate::maintenance::fixtures::record;

    #[test]
    fn test_empty_average_is_zero() {
        let stats = DashboardStats::compute(&[], Vec::new());
        assert_eq!(stats.total_maintenances, 0);
        assert_eq!(stats.total_spent, 0.0);
        assert_eq!(stats.average_cost, 0.0);
        assert!(stats.average_cost.is_finite());
        assert!(stats.recent.is_empty());
        assert!(stats.monthly.is_empty());
    }

    #[test]
    fn test_totals_treat_missing_cost_as_zero() {
        let records = vec![
            record(1, 1, "a", "2024-01-01", Some(100.0)),
            record(2, 1, "b", "2024-01-02", None),
            record(3, 1, "c", "2024-01-03", Some(50.0)),
        ];
        let stats = DashboardStats::compute(&[], records);
        assert_eq!(stats.total_spent, 150.0);
        assert_eq!(stats.average_cost, 50.0);
    }

    #[test]
    fn test_recent_and_monthly() {
        let records = vec![
            record(1, 1, "a", "2023-11-20", Some(10.0)),
            record(2, 1, "b", "2024-03-05", Some(20.0)),
            record(3, 1, "c", "2024-03-01", Some(30.0)),
            record(4, 1, "d", "2024-02-10", None),
            record(5, 1, "e", "2023-03-15", Some(5.0)),
            record(6, 1, "f", "2024-01-15", Some(40.0)),
            record(7, 1, "g", "not a date", Some(1.0)),
        ];
        let stats = DashboardStats::compute(&[], records);

        let ids: Vec<i64> = stats.recent.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 6, 1]);
        assert_eq!(stats.total_maintenances, 7);

        let monthly: Vec<(&str, f64, usize)> = stats
            .monthly
            .iter()
            .map(|p| (p.label.as_str(), p.cost, p.count))
            .collect();
        assert_eq!(
            monthly,
            vec![("mar", 50.0, 2), ("fev", 0.0, 1), ("jan", 40.0, 1), ("nov", 10.0, 1)]
        );
    }

    #[test]
    fn test_same_month_different_years_are_separate() {
        let records = vec![
            record(1, 1, "a", "2024-03-01", Some(1.0)),
            record(2, 1, "b", "2023-03-01", Some(2.0)),
        ];
        let stats = DashboardStats::compute(&[], records);
        assert_eq!(stats.monthly.len(), 2);
        assert_eq!(stats.monthly[0].year, 2024);
        assert_eq!(stats.monthly[1].year, 2023);
    }

    #[test]
    fn test_month_label_bounds() {
        assert_eq!(month_label(1), "jan");
        assert_eq!(month_label(12), "dez");
        assert_eq!(month_label(0), "?");
        assert_eq!(month_label(13), "?");
    }

    #[tokio::test]
    async fn test_load_fetches_both_resources() {
        let (server, _dir, client) = setup().await;
        client.session().set("abc").unwrap();

        Mock::given(method("GET"))
            .and(path("/bikes"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "brand": "Caloi", "model": "Elite"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/maintenances"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "bike_id": 1, "service_type": "Revisão",
                 "cost": 120.5, "service_date": "2024-03-01T00:00:00"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let stats = load(&client).await.unwrap();
        assert_eq!(stats.total_bikes, 1);
        assert_eq!(stats.total_spent, 120.5);
        assert_eq!(stats.monthly[0].label, "mar");
    }

    #[tokio::test]
    async fn test_load_fails_when_either_fetch_fails() {
        let (server, _dir, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/bikes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/maintenances"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(load(&client).await.is_err());
    }
}
