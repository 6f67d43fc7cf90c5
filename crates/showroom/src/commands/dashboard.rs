//! Dashboard command handler: monthly sales for a window against the
//! same window some years back.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use showroom_core::{AppState, DateWindow, Intent, MonthlySales};

use crate::cli::{DashboardArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, thousands};
use crate::session::Session;

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Units")]
    units: usize,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "Past units")]
    past_units: String,
    #[tabled(rename = "Past revenue")]
    past_revenue: String,
}

/// The rendered dashboard. Serialized as-is for json/yaml output.
#[derive(Debug, Serialize)]
struct Report {
    window: DateWindow,
    current: Vec<MonthlySales>,
    past: Vec<MonthlySales>,
    current_units: usize,
    current_revenue: i64,
    past_units: usize,
    past_revenue: i64,
}

impl Report {
    fn from_state(state: &AppState, window: DateWindow) -> Self {
        let dashboard = &state.dashboard;
        Self {
            window,
            current: dashboard.current_monthly.to_vec(),
            past: dashboard.past_monthly.to_vec(),
            current_units: dashboard.current_sales.len(),
            current_revenue: dashboard.current_revenue(),
            past_units: dashboard.past_sales.len(),
            past_revenue: dashboard.past_revenue(),
        }
    }

    fn rows(&self) -> Vec<MonthRow> {
        let mut rows: Vec<MonthRow> = self
            .current
            .iter()
            .enumerate()
            .map(|(i, month)| {
                let past = self.past.get(i);
                MonthRow {
                    month: month.start.format("%Y-%m").to_string(),
                    units: month.units,
                    revenue: thousands(month.revenue),
                    past_units: past.map_or_else(|| "-".into(), |p| p.units.to_string()),
                    past_revenue: past.map_or_else(|| "-".into(), |p| thousands(p.revenue)),
                }
            })
            .collect();
        rows.push(MonthRow {
            month: "Total".into(),
            units: self.current_units,
            revenue: thousands(self.current_revenue),
            past_units: self.past_units.to_string(),
            past_revenue: thousands(self.past_revenue),
        });
        rows
    }
}

fn detail(report: &Report) -> String {
    let header = format!(
        "{} to {}, compared with {} year(s) earlier",
        report.window.start.format("%Y-%m-%d"),
        report.window.end.format("%Y-%m-%d %H:%M"),
        report.window.past_range
    );
    format!("{header}\n{}", output::render_table(&report.rows()))
}

/// Midnight UTC at the start of `date`.
fn start_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// The requested bounds, `to` inclusive, over the current window.
fn requested_window(
    args: &DashboardArgs,
    current: DateWindow,
) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, CliError> {
    if args.from.is_none() && args.to.is_none() {
        return Ok(None);
    }
    let start = args.from.map_or(current.start, start_of);
    let end = match args.to {
        Some(to) => to
            .checked_add_days(Days::new(1))
            .map(start_of)
            .ok_or_else(|| CliError::Validation {
                field: "to".into(),
                reason: format!("{to} is out of range"),
            })?,
        None => current.end,
    };
    if start > end {
        return Err(CliError::Validation {
            field: "from".into(),
            reason: "the window starts after it ends".into(),
        });
    }
    Ok(Some((start, end)))
}

pub async fn handle(
    session: &Session,
    args: DashboardArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let dashboard_status = |s: &AppState| s.dashboard.status;

    let state = session.settled(dashboard_status).await?;
    let current = state
        .dashboard
        .window
        .ok_or_else(|| CliError::Internal("dashboard window was not initialised".into()))?;

    if let Some((start, end)) = requested_window(&args, current)? {
        session
            .controller
            .dispatch(Intent::SetDateRange { start, end })?;
    }
    if let Some(years) = args.past_range {
        session.controller.dispatch(Intent::SetPastRange(years))?;
    }

    let state = session.settled(dashboard_status).await?;
    let window = state
        .dashboard
        .window
        .ok_or_else(|| CliError::Internal("dashboard window was cleared".into()))?;
    let report = Report::from_state(&state, window);

    let out = output::render_single(&global.output, &report, detail, |r| {
        format!("{} {}", r.current_units, r.current_revenue)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
