//! View-model handlers behind the metrics panel, the record table and the charts.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use indexmap::IndexMap;
use log::debug;

use crate::error::DashboardError;
use crate::models::{
    ChartData, ChartPoint, ChartType, DailyRegistration, DashboardMetrics, DashboardState,
    KycRecord, KycRow, KycStatus, MonthlyCount, StatusBadge,
};
use crate::services::KycDataSource;

const RED: &str = "RGB(255, 0, 0)";
const ORANGE: &str = "RGB(255, 165, 0)";
const GREEN: &str = "RGB(0, 128, 0)";

/// Length of the verified-user trend, in months.
pub const TREND_MONTHS: u32 = 12;

/// Date range and status constraints applied to the record table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KycFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<String>,
}

impl KycFilter {
    /// Builds a filter from raw widget inputs. Empty strings count as absent.
    pub fn parse(
        from: Option<&str>,
        to: Option<&str>,
        status: Option<&str>,
    ) -> Result<Self, DashboardError> {
        Ok(KycFilter {
            from: non_empty(from).map(parse_date_input).transpose()?,
            to: non_empty(to).map(parse_date_input).transpose()?,
            status: non_empty(status).map(str::to_string),
        })
    }

    /// The date range only applies when both bounds are set.
    fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.from.zip(self.to)
    }

    pub fn matches(&self, record: &KycRecord) -> Result<bool, DashboardError> {
        if let Some((from, to)) = self.date_range() {
            let created = record.created_at()?.date_naive();
            if created < from || created > to {
                return Ok(false);
            }
        }

        if let Some(status) = &self.status {
            if record.status.as_str() != status {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, keeping only the date.
pub fn parse_date_input(input: &str) -> Result<NaiveDate, DashboardError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(input).map(|dt| dt.date_naive()))
        .map_err(|_| DashboardError::InvalidDate(input.to_string()))
}

// ==================== METRICS ====================

/// REJECTED records only contribute to the total.
pub fn dashboard_metrics(records: &[KycRecord]) -> DashboardMetrics {
    let count = |status: KycStatus| records.iter().filter(|r| r.status == status).count();

    DashboardMetrics {
        all_user_count: records.len(),
        pending_count: count(KycStatus::Pending),
        verified_count: count(KycStatus::Verified),
        blacklisted_count: count(KycStatus::Blacklisted),
    }
}

pub async fn get_dashboard_metrics(
    source: &dyn KycDataSource,
) -> Result<DashboardMetrics, DashboardError> {
    let records = source.fetch_all_records().await?;
    Ok(dashboard_metrics(&records))
}

// ==================== RECORD TABLE ====================

pub fn list_kyc(records: &[KycRecord], filter: &KycFilter) -> Result<Vec<KycRow>, DashboardError> {
    let mut rows = Vec::new();
    for record in records {
        if filter.matches(record)? {
            rows.push(KycRow::from_record(record)?);
        }
    }
    Ok(rows)
}

pub async fn get_all_kyc(
    source: &dyn KycDataSource,
    filter: &KycFilter,
) -> Result<Vec<KycRow>, DashboardError> {
    let records = source.fetch_all_records().await?;
    let rows = list_kyc(&records, filter)?;
    debug!("Listed {} of {} KYC records ({:?})", rows.len(), records.len(), filter);
    Ok(rows)
}

/// Badge for a status cell. Unrecognised input renders as VERIFIED.
pub fn kyc_status_color(status: &str) -> StatusBadge {
    let (status, color) = match status.parse::<KycStatus>() {
        Ok(KycStatus::Blacklisted) => (KycStatus::Blacklisted, RED),
        Ok(KycStatus::Rejected) => (KycStatus::Rejected, RED),
        Ok(KycStatus::Pending) => (KycStatus::Pending, ORANGE),
        _ => (KycStatus::Verified, GREEN),
    };

    StatusBadge {
        status: status.to_string(),
        color: color.to_string(),
    }
}

// ==================== CHARTS ====================

pub fn line_chart_data(series: &[DailyRegistration]) -> Vec<ChartPoint> {
    series
        .iter()
        .map(|d| ChartPoint {
            x: d.day.format("%m/%d").to_string(),
            y: d.count,
        })
        .collect()
}

/// One point per status, in the order statuses first appear.
pub fn pie_chart_data(records: &[KycRecord]) -> Vec<ChartPoint> {
    let mut counts: IndexMap<KycStatus, u64> = IndexMap::new();
    for record in records {
        *counts.entry(record.status).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(status, count)| ChartPoint {
            x: status.to_string(),
            y: count,
        })
        .collect()
}

pub fn return_chart_type(chart_index: i64) -> ChartType {
    ChartType::from_index(chart_index)
}

pub async fn chart_data(
    state: &DashboardState,
    source: &dyn KycDataSource,
) -> Result<ChartData, DashboardError> {
    let chart_type = return_chart_type(i64::from(state.chart_index()));

    let data = match chart_type {
        ChartType::LineChart => line_chart_data(&source.fetch_daily_registrations(None).await?),
        ChartType::PieChart => pie_chart_data(&source.fetch_all_records().await?),
    };

    Ok(ChartData { chart_type, data })
}

pub async fn daily_reg_users_by_status(
    source: &dyn KycDataSource,
    status: Option<KycStatus>,
) -> Result<Vec<ChartPoint>, DashboardError> {
    let series = source.fetch_daily_registrations(status).await?;

    Ok(series
        .iter()
        .map(|d| ChartPoint {
            x: d.day.format("%m/%d/%Y").to_string(),
            y: d.count,
        })
        .collect())
}

// ==================== MONTHLY TREND ====================

/// First day of the trend window: the 1st of the month eleven months back.
/// Only fails when `today` sits at the lower edge of the representable range.
fn trend_window_start(today: NaiveDate) -> Result<NaiveDate, DashboardError> {
    today
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(TREND_MONTHS - 1)))
        .ok_or_else(|| DashboardError::DateOutOfRange(today.to_string()))
}

/// VERIFIED records per month over the trailing window ending at `now`.
///
/// Always yields [`TREND_MONTHS`] entries in chronological order; months
/// without verifications are reported with a zero count.
pub fn verified_users_by_month(
    records: &[KycRecord],
    now: DateTime<Utc>,
) -> Result<Vec<MonthlyCount>, DashboardError> {
    let window_start = trend_window_start(now.date_naive())?;

    let mut counts: HashMap<(i32, u32), u64> = HashMap::new();
    for record in records.iter().filter(|r| r.status == KycStatus::Verified) {
        let created = record.created_at()?;
        if created.date_naive() >= window_start && created <= now {
            *counts.entry((created.year(), created.month())).or_insert(0) += 1;
        }
    }

    (0..TREND_MONTHS)
        .map(|offset| {
            let month = window_start
                .checked_add_months(Months::new(offset))
                .ok_or_else(|| DashboardError::DateOutOfRange(window_start.to_string()))?;

            Ok(MonthlyCount {
                month_year: month.format("%b %Y").to_string(),
                count: counts.get(&(month.year(), month.month())).copied().unwrap_or(0),
            })
        })
        .collect()
}

pub async fn get_verified_users_by_month(
    source: &dyn KycDataSource,
    now: DateTime<Utc>,
) -> Result<Vec<MonthlyCount>, DashboardError> {
    let records = source.fetch_all_records().await?;
    verified_users_by_month(&records, now)
}
