// ── Sales dashboard windows ──
//
// Date-window arithmetic for the dashboard loader: the comparison window
// shifted back by whole years, and the per-calendar-month breakdown with
// the first and last months clipped to the exact window bounds.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use showroom_api::{SalesWindow, Vehicle};

/// The dashboard's selected window plus how far back the comparison
/// window lags it, in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub past_range: u32,
}

impl DateWindow {
    /// Start of `now`'s calendar year (UTC) up to `now`.
    pub fn year_to_date(now: DateTime<Utc>, past_range: u32) -> Option<Self> {
        let start = NaiveDate::from_yo_opt(now.year(), 1)?
            .and_time(NaiveTime::MIN)
            .and_utc();
        Some(Self {
            start,
            end: now,
            past_range,
        })
    }

    pub fn current(&self) -> SalesWindow {
        SalesWindow {
            start_date: self.start,
            end_date: self.end,
        }
    }

    /// Both bounds moved back `past_range` years. Feb 29 lands on Feb 28.
    pub fn past(&self) -> Option<SalesWindow> {
        let shift = Months::new(self.past_range.checked_mul(12)?);
        Some(SalesWindow {
            start_date: self.start.checked_sub_months(shift)?,
            end_date: self.end.checked_sub_months(shift)?,
        })
    }
}

/// Split a window into calendar months. Interior boundaries fall on the
/// first instant of each month; the outer ones keep the window's own
/// instants. An empty or inverted window yields no months.
pub fn monthly_windows(window: SalesWindow) -> Vec<SalesWindow> {
    let mut months = Vec::new();
    let mut cursor = window.start_date;

    while cursor < window.end_date {
        let boundary = next_month_start(cursor).map_or(window.end_date, |b| b.min(window.end_date));
        months.push(SalesWindow {
            start_date: cursor,
            end_date: boundary,
        });
        cursor = boundary;
    }

    months
}

fn next_month_start(at: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (year, month) = if at.month() == 12 {
        (at.year() + 1, 1)
    } else {
        (at.year(), at.month() + 1)
    };
    Some(
        NaiveDate::from_ymd_opt(year, month, 1)?
            .and_time(NaiveTime::MIN)
            .and_utc(),
    )
}

/// Aggregate of the vehicles sold inside one monthly sub-window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub units: usize,
    /// Sum of sold prices, falling back to list price when unset.
    pub revenue: i64,
}

impl MonthlySales {
    pub fn from_sales(window: SalesWindow, sold: &[Vehicle]) -> Self {
        Self {
            start: window.start_date,
            end: window.end_date,
            units: sold.len(),
            revenue: sold
                .iter()
                .map(|v| v.sold_price.unwrap_or(v.price))
                .fold(0, i64::saturating_add),
        }
    }
}
