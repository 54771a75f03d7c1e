//! User activity report
//!
//! Joins `/api/users`, the usage summary, the session log and the pending
//! list into one row per registered user, with the seconds spent inside a
//! selected date range.
//!
//! - Users are keyed by the digits of their mobile number, else `id_<id>`;
//!   a later duplicate replaces an earlier one in place.
//! - Summary rows only enrich users that exist; they never add rows.
//! - A session belongs to a user when user id, mobile or email match (fields
//!   absent on either side never match) and its start day (else its
//!   last-session day) falls inside the range.
//! - Rows are sorted by in-range seconds, busiest first.

use crate::http::ConsoleApi;
use crate::users::ApprovalOverrides;
use crate::{ClientError, ClientResult};
use chrono::{Days, Months, NaiveDate};
use serde::Serialize;
use shared::models::{ApprovalStatus, PendingUser, User, UserId, UserSession, UserSummary};
use shared::util::digits_only;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

/// Selectable report span, starting on the selected day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportRange {
    #[default]
    Day,
    Week,
    Month,
    ThreeMonths,
    SixMonths,
}

impl ReportRange {
    pub const ALL: [ReportRange; 5] = [
        ReportRange::Day,
        ReportRange::Week,
        ReportRange::Month,
        ReportRange::ThreeMonths,
        ReportRange::SixMonths,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ReportRange::Day => "1d",
            ReportRange::Week => "1w",
            ReportRange::Month => "1m",
            ReportRange::ThreeMonths => "3m",
            ReportRange::SixMonths => "6m",
        }
    }

    /// Inclusive `(start, end)` days
    ///
    /// Month spans end the day before the same day-of-month `n` months
    /// later; days past the end of a shorter month clamp to its last day.
    pub fn span(&self, start: NaiveDate) -> (NaiveDate, NaiveDate) {
        let end = match self {
            ReportRange::Day => Some(start),
            ReportRange::Week => start.checked_add_days(Days::new(6)),
            ReportRange::Month => add_months_minus_day(start, 1),
            ReportRange::ThreeMonths => add_months_minus_day(start, 3),
            ReportRange::SixMonths => add_months_minus_day(start, 6),
        };
        (start, end.unwrap_or(start))
    }
}

fn add_months_minus_day(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start
        .checked_add_months(Months::new(months))?
        .checked_sub_days(Days::new(1))
}

impl fmt::Display for ReportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ReportRange {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportRange::ALL
            .into_iter()
            .find(|range| range.code() == s)
            .ok_or_else(|| ClientError::validation(format!("Unknown range `{s}`")))
    }
}

/// `3723` → `1h 2m 3s`; zero → `0s`
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    [(h, "h"), (m, "m"), (s, "s")]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One report line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub user_id: UserId,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub gst_number: String,
    pub range_seconds: u64,
    pub range_sessions: usize,
    pub total_time: String,
    pub total_sessions: u64,
    pub last_session: String,
    pub is_pending: bool,
    /// Id to approve/reject with
    pub pending_id: Option<UserId>,
    pub approval: Option<ApprovalStatus>,
    pub created_at: Option<String>,
}

impl ActivityRow {
    pub fn range_time(&self) -> String {
        format_duration(self.range_seconds)
    }
}

/// Inputs of [`build_report`]
#[derive(Debug, Clone, Default)]
pub struct ReportSources {
    pub users: Vec<User>,
    pub summaries: Vec<UserSummary>,
    pub sessions: Vec<UserSession>,
    pub pending: Vec<PendingUser>,
}

struct Merged<'a> {
    user: &'a User,
    summary: Option<&'a UserSummary>,
}

fn user_key(mobile: Option<&str>, id: Option<&UserId>) -> Option<String> {
    let digits = mobile.map(digits_only).unwrap_or_default();
    if !digits.is_empty() {
        return Some(digits);
    }
    id.map(|id| format!("id_{id}"))
}

fn same(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if !a.is_empty() && a == b)
}

/// Build report rows for the inclusive day span `range`
pub fn build_report(
    sources: &ReportSources,
    range: (NaiveDate, NaiveDate),
    overrides: &HashMap<String, ApprovalStatus>,
) -> Vec<ActivityRow> {
    let mut merged: Vec<Merged<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for user in &sources.users {
        let Some(key) = user_key(user.mobile.as_deref(), Some(&user.id)) else {
            continue;
        };
        let entry = Merged {
            user,
            summary: None,
        };
        match index.get(&key) {
            Some(&i) => merged[i] = entry,
            None => {
                index.insert(key, merged.len());
                merged.push(entry);
            }
        }
    }

    for summary in &sources.summaries {
        let key = user_key(summary.user_mobile.as_deref(), summary.user_id.as_ref());
        if let Some(&i) = key.as_ref().and_then(|key| index.get(key)) {
            merged[i].summary = Some(summary);
        }
    }

    let (start, end) = range;
    let mut rows: Vec<ActivityRow> = merged
        .into_iter()
        .map(|Merged { user, summary }| {
            let email = summary.and_then(|s| s.user_email.as_deref());

            let in_range: Vec<&UserSession> = sources
                .sessions
                .iter()
                .filter(|s| {
                    s.user_id.as_ref() == Some(&user.id)
                        || same(s.user_mobile.as_deref(), user.mobile.as_deref())
                        || same(s.user_email.as_deref(), email)
                })
                .filter(|s| s.day().is_some_and(|day| day >= start && day <= end))
                .collect();
            let range_seconds = in_range.iter().map(|s| s.duration_secs()).sum();

            let pending = sources.pending.iter().find(|p| {
                same(p.mobile.as_deref(), user.mobile.as_deref())
                    || same(p.email.as_deref(), email)
                    || p.id.as_ref() == Some(&user.id)
            });
            let status_pending = user.is_pending();
            let pending_id = pending
                .and_then(|p| p.id.clone())
                .or_else(|| status_pending.then(|| user.id.clone()));

            let mobile = user
                .mobile
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "N/A".to_string());

            ActivityRow {
                user_id: user.id.clone(),
                name: user.display_name(),
                email: email.map(str::to_string).unwrap_or_else(|| mobile.clone()),
                mobile,
                gst_number: user
                    .gst_number
                    .clone()
                    .filter(|g| !g.trim().is_empty())
                    .unwrap_or_else(|| "N/A".to_string()),
                range_seconds,
                range_sessions: in_range.len(),
                total_time: summary
                    .and_then(|s| s.total_time_formatted.clone())
                    .unwrap_or_else(|| {
                        format_duration(summary.and_then(|s| s.total_time_spent).unwrap_or(0))
                    }),
                total_sessions: summary.and_then(|s| s.total_sessions).unwrap_or(0),
                last_session: summary
                    .and_then(|s| s.last_session_formatted.clone())
                    .unwrap_or_else(|| "Never".to_string()),
                is_pending: pending.is_some() || status_pending,
                pending_id,
                approval: overrides.get(user.id.as_str().trim()).copied(),
                created_at: user.created_at.clone(),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.range_seconds.cmp(&a.range_seconds));
    rows
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Mobile")]
    mobile: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "GST Number")]
    gst_number: &'a str,
    #[serde(rename = "Time In Range")]
    range_time: String,
    #[serde(rename = "Sessions In Range")]
    range_sessions: usize,
    #[serde(rename = "Total Time")]
    total_time: &'a str,
    #[serde(rename = "Total Sessions")]
    total_sessions: u64,
    #[serde(rename = "Last Session")]
    last_session: &'a str,
    #[serde(rename = "Status")]
    status: &'a str,
}

/// Report as CSV text with a header line
pub fn export_csv(rows: &[ActivityRow]) -> ClientResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        let status = match (row.approval, row.is_pending) {
            (Some(status), _) => status.as_str(),
            (None, true) => "pending",
            (None, false) => "active",
        };
        writer.serialize(CsvRow {
            name: &row.name,
            mobile: &row.mobile,
            email: &row.email,
            gst_number: &row.gst_number,
            range_time: row.range_time(),
            range_sessions: row.range_sessions,
            total_time: &row.total_time,
            total_sessions: row.total_sessions,
            last_session: &row.last_session,
            status,
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ClientError::Storage(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

#[derive(Debug)]
struct ReportState {
    day: NaiveDate,
    range: ReportRange,
    rows: Vec<ActivityRow>,
}

/// Stateful report controller
pub struct UserActivityReport {
    api: Arc<dyn ConsoleApi>,
    overrides: Arc<ApprovalOverrides>,
    state: Mutex<ReportState>,
}

impl UserActivityReport {
    pub fn new(api: Arc<dyn ConsoleApi>, overrides: Arc<ApprovalOverrides>, day: NaiveDate) -> Self {
        Self {
            api,
            overrides,
            state: Mutex::new(ReportState {
                day,
                range: ReportRange::Day,
                rows: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ReportState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn rows(&self) -> Vec<ActivityRow> {
        self.state().rows.clone()
    }

    pub fn selection(&self) -> (NaiveDate, ReportRange) {
        let state = self.state();
        (state.day, state.range)
    }

    /// Load the report for `day` and `range`
    ///
    /// The summary is required; users, sessions and pending lists degrade to
    /// empty when unavailable.
    pub async fn load(&self, day: NaiveDate, range: ReportRange) -> ClientResult<Vec<ActivityRow>> {
        {
            let mut state = self.state();
            state.day = day;
            state.range = range;
        }

        let (users, summaries, sessions, pending) = tokio::join!(
            self.api.list_users(),
            self.api.user_summary(),
            self.api.user_sessions(),
            self.api.pending_users(),
        );
        let summaries = summaries.inspect_err(|e| tracing::error!("Failed to fetch user summary: {e}"))?;
        let sources = ReportSources {
            users: users.unwrap_or_else(|e| {
                tracing::warn!("Could not fetch users: {e}");
                Vec::new()
            }),
            summaries,
            sessions: sessions.unwrap_or_else(|e| {
                tracing::warn!("Could not fetch sessions: {e}");
                Vec::new()
            }),
            pending: pending.unwrap_or_else(|e| {
                tracing::warn!("Could not fetch pending approvals: {e}");
                Vec::new()
            }),
        };

        let span = range.span(day);
        tracing::debug!(from = %span.0, to = %span.1, %range, "Building activity report");
        let rows = build_report(&sources, span, &self.overrides.snapshot());

        let mut state = self.state();
        if state.day == day && state.range == range {
            state.rows = rows.clone();
        }
        Ok(rows)
    }

    /// Re-run the last selection
    pub async fn reload(&self) -> ClientResult<Vec<ActivityRow>> {
        let (day, range) = self.selection();
        self.load(day, range).await
    }

    pub fn export_csv(&self) -> ClientResult<String> {
        export_csv(&self.state().rows)
    }
}

impl fmt::Debug for UserActivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserActivityReport")
            .field("selection", &self.selection())
            .finish_non_exhaustive()
    }
}
