//! View-model logic shared by the text output and the TUI.

use appwrite_dashboard_api::models::{DashboardStats, EnrichedSession, NamedCount, SessionDetails, TimeBucket};
use appwrite_dashboard_api::user_agent::DeviceClass;
use chrono::{DateTime, Utc};

/// Numbers shown on the summary cards.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCards {
    pub total_users: u64,
    pub active_sessions: u64,
    pub new_users: u64,
    pub sessions_per_user: f64,
}

impl SummaryCards {
    pub fn from_stats(stats: &DashboardStats) -> Self {
        let sessions_per_user = if stats.total_users == 0 {
            0.0
        } else {
            let ratio = stats.active_sessions as f64 / stats.total_users as f64;
            (ratio * 100.0).round() / 100.0
        };

        Self {
            total_users: stats.total_users,
            active_sessions: stats.active_sessions,
            new_users: stats.new_users,
            sessions_per_user,
        }
    }
}

/// Largest entry of a histogram; on ties the later entry wins.
pub fn most_used(data: &[NamedCount]) -> Option<&NamedCount> {
    data.iter().max_by_key(|c| c.value)
}

/// Busiest time-of-day bucket, later bucket on ties.
pub fn peak_time(data: &[TimeBucket]) -> Option<&TimeBucket> {
    data.iter().max_by_key(|b| b.sessions)
}

/// Client-side filter of the session table.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub device: Option<DeviceClass>,
    pub search: Option<String>,
}

impl SessionFilter {
    /// Parse a `--device` value; `all` or an unknown value disables the filter.
    pub fn parse_device(raw: &str) -> Option<DeviceClass> {
        DeviceClass::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn matches(&self, session: &EnrichedSession) -> bool {
        if let Some(device) = self.device {
            if session.device != device {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                session.user_email.to_lowercase().contains(&needle)
                    || session.user_id.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    pub fn apply<'a>(&self, sessions: &'a [EnrichedSession]) -> Vec<&'a EnrichedSession> {
        sessions.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Expand/collapse state of the session table.
///
/// At most one row is expanded. Its detail is fetched on expand and
/// dropped on collapse; nothing is cached per row.
#[derive(Debug, Default)]
pub struct ExpandState {
    expanded: Option<String>,
    detail: Option<SessionDetails>,
}

impl ExpandState {
    /// Toggle a row. Returns the session id whose detail must be fetched.
    pub fn toggle(&mut self, session_id: &str) -> Option<String> {
        self.detail = None;
        if self.expanded.as_deref() == Some(session_id) {
            self.expanded = None;
            None
        } else {
            self.expanded = Some(session_id.to_string());
            Some(session_id.to_string())
        }
    }

    /// Store a fetched detail if it still belongs to the expanded row.
    pub fn set_detail(&mut self, detail: Option<SessionDetails>) {
        self.detail = detail.filter(|d| self.expanded.as_deref() == Some(d.session.id.as_str()));
    }

    pub fn is_expanded(&self, session_id: &str) -> bool {
        self.expanded.as_deref() == Some(session_id)
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn detail(&self) -> Option<&SessionDetails> {
        self.detail.as_ref()
    }

    pub fn clear(&mut self) {
        self.expanded = None;
        self.detail = None;
    }
}

/// "3 hours ago" style age.
pub fn relative_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }

    let (value, unit) = match secs {
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s => (s / 86_400, "day"),
    };
    format!("{} {}{} ago", value, unit, if value == 1 { "" } else { "s" })
}

/// Horizontal bar scaled against `max`.
pub fn bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(len.min(width))
}

pub fn status_label(session: &EnrichedSession) -> &'static str {
    if session.active {
        "Active"
    } else {
        "Inactive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appwrite_dashboard_api::models::{SessionAction, UNKNOWN_LOCATION};
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2024-06-15T12:00:00Z".parse().unwrap()
    }

    fn session(id: &str, email: &str, device: DeviceClass) -> EnrichedSession {
        EnrichedSession {
            id: id.to_string(),
            user_id: format!("user-{}", id),
            user_email: email.to_string(),
            user_name: String::new(),
            device,
            browser: "Chrome 120".to_string(),
            os: "Windows 10".to_string(),
            ip: "10.0.0.1".to_string(),
            location: UNKNOWN_LOCATION.to_string(),
            start_time: now(),
            last_active: now(),
            expires_at: now() + Duration::hours(1),
            duration: 60,
            active: true,
            provider: "email".to_string(),
            current: false,
        }
    }

    fn details(id: &str) -> SessionDetails {
        let session = session(id, "a@example.com", DeviceClass::Desktop);
        SessionDetails {
            actions: vec![SessionAction::login(session.start_time)],
            session,
        }
    }

    #[test]
    fn test_summary_cards() {
        let stats = DashboardStats {
            total_users: 3,
            active_sessions: 2,
            new_users: 1,
            user_growth: 33.3,
            session_growth: 66.7,
        };
        let cards = SummaryCards::from_stats(&stats);
        assert_eq!(cards.sessions_per_user, 0.67);

        let empty = SummaryCards::from_stats(&DashboardStats::default());
        assert_eq!(empty.sessions_per_user, 0.0);
    }

    #[test]
    fn test_most_used_prefers_later_on_tie() {
        let data = vec![
            NamedCount::new("Mobile", 3),
            NamedCount::new("Desktop", 5),
            NamedCount::new("Tablet", 5),
        ];
        assert_eq!(most_used(&data).unwrap().name, "Tablet");
        assert!(most_used(&[]).is_none());
    }

    #[test]
    fn test_peak_time() {
        let data = vec![
            TimeBucket {
                time: "00:00".to_string(),
                sessions: 1,
            },
            TimeBucket {
                time: "09:00".to_string(),
                sessions: 4,
            },
            TimeBucket {
                time: "12:00".to_string(),
                sessions: 2,
            },
        ];
        assert_eq!(peak_time(&data).unwrap().time, "09:00");
    }

    #[test]
    fn test_filter_by_device_and_search() {
        let sessions = vec![
            session("1", "ada@example.com", DeviceClass::Mobile),
            session("2", "bob@example.com", DeviceClass::Desktop),
            session("3", "ADA.work@example.com", DeviceClass::Desktop),
        ];

        let by_search = SessionFilter {
            device: None,
            search: Some("ada".to_string()),
        };
        assert_eq!(by_search.apply(&sessions).len(), 2);

        let by_both = SessionFilter {
            device: SessionFilter::parse_device("desktop"),
            search: Some("ada".to_string()),
        };
        let ids: Vec<&str> = by_both.apply(&sessions).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["3"]);

        let by_user_id = SessionFilter {
            device: None,
            search: Some("user-2".to_string()),
        };
        assert_eq!(by_user_id.apply(&sessions).len(), 1);

        assert_eq!(SessionFilter::default().apply(&sessions).len(), 3);
    }

    #[test]
    fn test_parse_device() {
        assert_eq!(SessionFilter::parse_device("Mobile"), Some(DeviceClass::Mobile));
        assert_eq!(SessionFilter::parse_device("tablet"), Some(DeviceClass::Tablet));
        assert_eq!(SessionFilter::parse_device("all"), None);
    }

    #[test]
    fn test_expand_then_collapse_clears_detail() {
        let mut state = ExpandState::default();

        assert_eq!(state.toggle("s1"), Some("s1".to_string()));
        state.set_detail(Some(details("s1")));
        assert!(state.is_expanded("s1"));
        assert!(state.detail().is_some());

        assert_eq!(state.toggle("s1"), None);
        assert!(!state.is_expanded("s1"));
        assert!(state.detail().is_none());
    }

    #[test]
    fn test_expanding_another_row_replaces_previous() {
        let mut state = ExpandState::default();
        state.toggle("s1");
        state.set_detail(Some(details("s1")));

        assert_eq!(state.toggle("s2"), Some("s2".to_string()));
        assert!(!state.is_expanded("s1"));
        assert!(state.detail().is_none());

        // A late response for the old row is ignored
        state.set_detail(Some(details("s1")));
        assert!(state.detail().is_none());
    }

    #[test]
    fn test_relative_age() {
        assert_eq!(relative_age(now() - Duration::seconds(10), now()), "just now");
        assert_eq!(relative_age(now() - Duration::minutes(1), now()), "1 minute ago");
        assert_eq!(relative_age(now() - Duration::hours(3), now()), "3 hours ago");
        assert_eq!(relative_age(now() - Duration::days(2), now()), "2 days ago");
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(5, 10, 10).chars().count(), 5);
        assert_eq!(bar(10, 10, 20).chars().count(), 20);
        assert_eq!(bar(3, 0, 10), "");
    }
}
