//! Plain-text output of the one-shot subcommands.

use appwrite_dashboard_api::models::{EnrichedSession, GrowthPoint, NamedCount, SessionDetails, TimeBucket};
use appwrite_dashboard_api::upstream::User;
use chrono::Utc;

use crate::view::{self, SummaryCards};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const BAR_WIDTH: usize = 40;

fn rule() {
    println!("{}{}{}", CYAN, "=".repeat(60), RESET);
}

fn heading(title: &str) {
    println!("\n{}{}{}", BOLD, title, RESET);
}

fn status_colored(session: &EnrichedSession) -> String {
    let color = if session.active { GREEN } else { RED };
    format!("{}{}{}", color, view::status_label(session), RESET)
}

pub fn summary(cards: &SummaryCards, recent: &[User]) {
    rule();
    println!("Total users:        {}", cards.total_users);
    println!("Active sessions:    {}", cards.active_sessions);
    println!("New users (24h):    {}", cards.new_users);
    println!("Sessions per user:  {:.2}", cards.sessions_per_user);
    rule();

    heading("Recent users");
    if recent.is_empty() {
        println!("  No users found");
        return;
    }

    let now = Utc::now();
    println!("  {:<24} {:<32} {}", "NAME", "EMAIL", "JOINED");
    for user in recent {
        let name = if user.name.is_empty() { "-" } else { user.name.as_str() };
        println!(
            "  {:<24} {:<32} {}",
            name,
            user.email,
            view::relative_age(user.created_at, now)
        );
    }
}

pub fn sessions(sessions: &[&EnrichedSession], total: usize) {
    println!("Showing {} of {} active sessions", sessions.len(), total);
    if sessions.is_empty() {
        return;
    }

    println!(
        "\n  {:<22} {:<30} {:<8} {:<16} {:<16} {:<10}",
        "SESSION", "USER", "DEVICE", "BROWSER", "OS", "STATUS"
    );
    for s in sessions {
        println!(
            "  {:<22} {:<30} {:<8} {:<16} {:<16} {}",
            s.id,
            s.user_email,
            s.device,
            s.browser,
            s.os,
            status_colored(s)
        );
    }
}

pub fn session_details(details: &SessionDetails) {
    let s = &details.session;
    rule();
    println!("Session:   {}", s.id);
    println!("Status:    {}", status_colored(s));
    println!("User:      {} ({})", s.user_email, s.user_id);
    println!("Device:    {} / {} / {}", s.device, s.browser, s.os);
    println!("IP:        {}", s.ip);
    println!("Location:  {}", s.location);
    println!("Provider:  {}", s.provider);
    println!("Started:   {}", s.start_time.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Expires:   {}", s.expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Duration:  {} minutes", s.duration);
    rule();

    heading("Timeline");
    for action in &details.actions {
        println!(
            "  {}  {:<8} {}",
            action.timestamp.format("%Y-%m-%d %H:%M"),
            action.kind,
            action.details
        );
    }
}

fn named_bars(data: &[NamedCount]) {
    let max = data.iter().map(|c| c.value).max().unwrap_or(0);
    for c in data {
        println!("  {:<20} {:>5} {}", c.name, c.value, view::bar(c.value, max, BAR_WIDTH));
    }
}

pub fn analytics(devices: &[NamedCount], locations: &[NamedCount], times: &[TimeBucket]) {
    heading("Sessions by device");
    named_bars(devices);
    if let Some(top) = view::most_used(devices) {
        println!("  Most used: {}{}{}", GREEN, top.name, RESET);
    }

    heading("Sessions by location");
    named_bars(locations);
    if let Some(top) = view::most_used(locations) {
        println!("  Top location: {}{}{}", GREEN, top.name, RESET);
    }

    heading("Sessions by time of day");
    let max = times.iter().map(|b| b.sessions).max().unwrap_or(0);
    for b in times {
        println!("  {:<6} {:>5} {}", b.time, b.sessions, view::bar(b.sessions, max, BAR_WIDTH));
    }
    if let Some(peak) = view::peak_time(times) {
        println!("  Peak: {}{}{}", GREEN, peak.time, RESET);
    }
}

pub fn growth(points: &[GrowthPoint], total_users: u64) {
    let joined: u64 = points.iter().map(|p| p.users).sum();
    heading(&format!("New users per day ({} of {} total)", joined, total_users));
    if points.is_empty() {
        println!("  No sign-ups in this window");
        return;
    }
    let max = points.iter().map(|p| p.users).max().unwrap_or(0);
    for p in points {
        println!("  {} {:>5} {}", p.date, p.users, view::bar(p.users, max, BAR_WIDTH));
    }
}
