//! Best-effort user-agent parsing.
//!
//! Only the handful of fields the dashboard shows are extracted: browser,
//! operating system and a coarse device type. Desktop agents carry no
//! device type, mirroring what mainstream UA parsers report.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A named product with an optional version, e.g. `Chrome 120.0.6099.71`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub version: Option<String>,
}

impl Product {
    fn new(name: &str, version: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            version: version.filter(|v| !v.is_empty()).map(str::to_string),
        }
    }
}

/// Parsed view of a user-agent string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAgent {
    pub browser: Option<Product>,
    pub os: Option<Product>,
    /// `mobile` or `tablet`; `None` for desktops and unknown agents.
    pub device_type: Option<String>,
}

/// Coarse device class shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeviceClass {
    Mobile,
    Desktop,
    Tablet,
}

impl DeviceClass {
    pub const ALL: [DeviceClass; 3] = [DeviceClass::Mobile, DeviceClass::Desktop, DeviceClass::Tablet];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "Mobile",
            DeviceClass::Desktop => "Desktop",
            DeviceClass::Tablet => "Tablet",
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classify a device-type token.
///
/// Matching is a case-insensitive substring test for `mobile`, `tablet` and
/// `desktop`. Anything else, including a missing token, is a desktop.
pub fn classify_device(device_type: Option<&str>) -> DeviceClass {
    let token = device_type.unwrap_or_default().to_ascii_lowercase();
    if token.contains("mobile") {
        DeviceClass::Mobile
    } else if token.contains("tablet") {
        DeviceClass::Tablet
    } else {
        DeviceClass::Desktop
    }
}

/// `"Chrome 120"`, `"Chrome"` or `"Unknown"`. Only the major version is shown.
pub fn browser_label(browser: Option<&Product>) -> String {
    match browser {
        Some(Product { name, version: Some(v) }) => {
            format!("{} {}", name, v.split('.').next().unwrap_or(v))
        }
        Some(Product { name, version: None }) => name.clone(),
        None => "Unknown".to_string(),
    }
}

/// `"Windows 10"`, `"Android 14"`, `"Linux"` or `"Unknown"`.
pub fn os_label(os: Option<&Product>) -> String {
    match os {
        Some(Product { name, version: Some(v) }) => format!("{} {}", name, v),
        Some(Product { name, version: None }) => name.clone(),
        None => "Unknown".to_string(),
    }
}

static BROWSERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    // Order matters: Chromium derivatives also advertise Chrome and Safari.
    [
        ("Edge", r"Edg(?:e|A|iOS)?/([\d.]+)"),
        ("Opera", r"(?:OPR|Opera)/([\d.]+)"),
        ("Samsung Internet", r"SamsungBrowser/([\d.]+)"),
        ("Firefox", r"(?:Firefox|FxiOS)/([\d.]+)"),
        ("Chrome", r"(?:Chrome|CriOS)/([\d.]+)"),
        ("Safari", r"Version/([\d.]+).*Safari/"),
        ("IE", r"MSIE ([\d.]+)"),
        ("IE", r"Trident/.*rv:([\d.]+)"),
    ]
    .into_iter()
    .filter_map(|(name, pattern)| Regex::new(pattern).ok().map(|re| (name, re)))
    .collect()
});

static WINDOWS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"Windows NT ([\d.]+)").ok());
static IOS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?:iPhone|iPad|iPod).*? OS ([\d_]+)").ok());
static ANDROID: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"Android ([\d.]+)").ok());
static MACOS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"Mac OS X ([\d_.]+)").ok());

fn capture<'a>(re: &Lazy<Option<Regex>>, ua: &'a str) -> Option<&'a str> {
    let re: &Option<Regex> = re;
    re.as_ref()?.captures(ua)?.get(1).map(|m| m.as_str())
}

fn windows_version(nt: &str) -> &str {
    match nt {
        "10.0" => "10",
        "6.3" => "8.1",
        "6.2" => "8",
        "6.1" => "7",
        "6.0" => "Vista",
        "5.1" | "5.2" => "XP",
        other => other,
    }
}

fn parse_browser(ua: &str) -> Option<Product> {
    BROWSERS.iter().find_map(|(name, re)| {
        re.captures(ua)
            .map(|caps| Product::new(name, caps.get(1).map(|m| m.as_str())))
    })
}

fn parse_os(ua: &str) -> Option<Product> {
    if ua.contains("Windows") {
        let version = capture(&WINDOWS, ua).map(windows_version);
        return Some(Product::new("Windows", version));
    }
    if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
        let version = capture(&IOS, ua).map(|v| v.replace('_', "."));
        return Some(Product::new("iOS", version.as_deref()));
    }
    if ua.contains("Android") {
        return Some(Product::new("Android", capture(&ANDROID, ua)));
    }
    if ua.contains("CrOS") {
        return Some(Product::new("Chrome OS", None));
    }
    if ua.contains("Mac OS X") || ua.contains("Macintosh") {
        let version = capture(&MACOS, ua).map(|v| v.replace('_', "."));
        return Some(Product::new("macOS", version.as_deref()));
    }
    if ua.contains("Linux") {
        return Some(Product::new("Linux", None));
    }
    None
}

fn parse_device_type(ua: &str) -> Option<String> {
    let android = ua.contains("Android");
    let mobile_marker = ua.contains("Mobi");

    if ua.contains("iPad") || ua.contains("Tablet") || (android && !mobile_marker) {
        return Some("tablet".to_string());
    }
    if mobile_marker || ua.contains("iPhone") || ua.contains("iPod") || ua.contains("Windows Phone") {
        return Some("mobile".to_string());
    }
    None
}

/// Parse a raw user-agent string.
pub fn parse(ua: &str) -> UserAgent {
    let ua = ua.trim();
    if ua.is_empty() {
        return UserAgent::default();
    }

    UserAgent {
        browser: parse_browser(ua),
        os: parse_os(ua),
        device_type: parse_device_type(ua),
    }
}
