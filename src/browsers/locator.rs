use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

/// Browsers with known data layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BrowserKind {
    Chrome,
    Edge,
    Firefox,
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserKind::Chrome => write!(f, "Chrome"),
            BrowserKind::Edge => write!(f, "Edge"),
            BrowserKind::Firefox => write!(f, "Firefox"),
        }
    }
}

impl FromStr for BrowserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chrome" => Ok(BrowserKind::Chrome),
            "edge" => Ok(BrowserKind::Edge),
            "firefox" => Ok(BrowserKind::Firefox),
            other => Err(format!("unknown browser '{}'", other)),
        }
    }
}

/// Per-browser data categories that can be sized and cleaned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    Cache,
    Cookies,
    History,
    Downloads,
    LocalStorage,
}

impl DataCategory {
    pub const ALL: &'static [DataCategory] = &[
        DataCategory::Cache,
        DataCategory::Cookies,
        DataCategory::History,
        DataCategory::Downloads,
        DataCategory::LocalStorage,
    ];
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataCategory::Cache => write!(f, "cache"),
            DataCategory::Cookies => write!(f, "cookies"),
            DataCategory::History => write!(f, "history"),
            DataCategory::Downloads => write!(f, "downloads"),
            DataCategory::LocalStorage => write!(f, "local_storage"),
        }
    }
}

impl FromStr for DataCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cache" => Ok(DataCategory::Cache),
            "cookies" => Ok(DataCategory::Cookies),
            "history" => Ok(DataCategory::History),
            "downloads" => Ok(DataCategory::Downloads),
            "local_storage" | "local-storage" | "storage" => Ok(DataCategory::LocalStorage),
            other => Err(format!("unknown data category '{}'", other)),
        }
    }
}

/// A browser's discovered data locations.
///
/// Built once per cleaning session by probing well-known paths under the
/// user profile; never persisted. For multi-profile browsers only the
/// first discovered profile is used — a documented simplification, not
/// full multi-profile support.
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub browser: BrowserKind,
    /// The profile directory the category paths were derived from
    pub profile_dir: PathBuf,
    paths: HashMap<DataCategory, PathBuf>,
}

impl BrowserProfile {
    /// A browser counts as detected if any category path exists on disk
    pub fn detected(&self) -> bool {
        self.paths.values().any(|p| p.exists())
    }

    /// The candidate path for a category (may not exist on disk)
    pub fn path(&self, category: DataCategory) -> Option<&Path> {
        self.paths.get(&category).map(PathBuf::as_path)
    }

    /// Size in bytes of one category's data; 0 when absent
    pub fn size_of(&self, category: DataCategory) -> u64 {
        self.path(category).map(path_size).unwrap_or(0)
    }

    /// Sizes of every category plus their total, in bytes
    pub fn sizes(&self) -> (HashMap<DataCategory, u64>, u64) {
        let sizes: HashMap<DataCategory, u64> = DataCategory::ALL
            .iter()
            .map(|&c| (c, self.size_of(c)))
            .collect();
        let total = sizes.values().sum();
        (sizes, total)
    }
}

/// Discover detected browsers under the current user's home directory
pub fn discover_browsers() -> Vec<BrowserProfile> {
    match dirs::home_dir() {
        Some(home) => probe_browsers(&home),
        None => Vec::new(),
    }
}

/// Probe browser layouts under an explicit home directory.
/// Returns only browsers with at least one existing category path.
pub fn probe_browsers(home: &Path) -> Vec<BrowserProfile> {
    let mut profiles = Vec::new();

    for &kind in &[BrowserKind::Chrome, BrowserKind::Edge] {
        let profile_dir = chromium_profile_dir(home, kind);
        let profile = BrowserProfile {
            browser: kind,
            paths: chromium_paths(home, kind, &profile_dir),
            profile_dir,
        };
        if profile.detected() {
            profiles.push(profile);
        }
    }

    if let Some(profile_dir) = first_firefox_profile(home) {
        let profile = BrowserProfile {
            browser: BrowserKind::Firefox,
            paths: firefox_paths(home, &profile_dir),
            profile_dir,
        };
        if profile.detected() {
            profiles.push(profile);
        }
    }

    profiles
}

/// Sizes per category for several browsers, computed in parallel
pub fn all_sizes(profiles: &[BrowserProfile]) -> Vec<(BrowserKind, HashMap<DataCategory, u64>, u64)> {
    profiles
        .par_iter()
        .map(|p| {
            let (sizes, total) = p.sizes();
            (p.browser, sizes, total)
        })
        .collect()
}

/// Default profile directory of a Chromium-based browser
pub fn chromium_profile_dir(home: &Path, kind: BrowserKind) -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = home.join("AppData").join("Local");
        match kind {
            BrowserKind::Chrome => base.join("Google").join("Chrome"),
            BrowserKind::Edge => base.join("Microsoft").join("Edge"),
            BrowserKind::Firefox => base.join("Mozilla").join("Firefox"),
        }
        .join("User Data")
        .join("Default")
    }
    #[cfg(target_os = "macos")]
    {
        let base = home.join("Library").join("Application Support");
        match kind {
            BrowserKind::Chrome => base.join("Google").join("Chrome"),
            BrowserKind::Edge => base.join("Microsoft Edge"),
            BrowserKind::Firefox => base.join("Firefox"),
        }
        .join("Default")
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let name = match kind {
            BrowserKind::Chrome => "google-chrome",
            BrowserKind::Edge => "microsoft-edge",
            BrowserKind::Firefox => "firefox",
        };
        home.join(".config").join(name).join("Default")
    }
}

fn chromium_paths(
    home: &Path,
    kind: BrowserKind,
    profile_dir: &Path,
) -> HashMap<DataCategory, PathBuf> {
    let cache = chromium_cache_dir(home, kind, profile_dir);
    HashMap::from([
        (DataCategory::Cache, cache),
        (DataCategory::Cookies, profile_dir.join("Cookies")),
        (DataCategory::History, profile_dir.join("History")),
        // Download history lives in the History store for Chromium browsers
        (DataCategory::Downloads, profile_dir.join("History")),
        (DataCategory::LocalStorage, profile_dir.join("Local Storage")),
    ])
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn chromium_cache_dir(home: &Path, kind: BrowserKind, _profile_dir: &Path) -> PathBuf {
    let name = match kind {
        BrowserKind::Chrome => "google-chrome",
        BrowserKind::Edge => "microsoft-edge",
        BrowserKind::Firefox => "firefox",
    };
    home.join(".cache").join(name).join("Default").join("Cache")
}

#[cfg(any(target_os = "windows", target_os = "macos"))]
fn chromium_cache_dir(_home: &Path, _kind: BrowserKind, profile_dir: &Path) -> PathBuf {
    profile_dir.join("Cache")
}

/// Root directory holding Firefox profiles
pub fn firefox_profiles_root(home: &Path) -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        home.join("AppData")
            .join("Roaming")
            .join("Mozilla")
            .join("Firefox")
            .join("Profiles")
    }
    #[cfg(target_os = "macos")]
    {
        home.join("Library")
            .join("Application Support")
            .join("Firefox")
            .join("Profiles")
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        home.join(".mozilla").join("firefox")
    }
}

/// First Firefox profile directory, by sorted name for determinism.
/// Additional profiles are ignored (known limitation).
fn first_firefox_profile(home: &Path) -> Option<PathBuf> {
    let root = firefox_profiles_root(home);
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(&root)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs.into_iter().next()
}

fn firefox_paths(home: &Path, profile_dir: &Path) -> HashMap<DataCategory, PathBuf> {
    #[cfg(target_os = "windows")]
    let cache = {
        let name = profile_dir.file_name().unwrap_or_default();
        home.join("AppData")
            .join("Local")
            .join("Mozilla")
            .join("Firefox")
            .join("Profiles")
            .join(name)
            .join("cache2")
    };
    #[cfg(not(target_os = "windows"))]
    let cache = {
        let _ = home;
        profile_dir.join("cache2")
    };

    HashMap::from([
        (DataCategory::Cache, cache),
        (DataCategory::Cookies, profile_dir.join("cookies.sqlite")),
        (DataCategory::History, profile_dir.join("places.sqlite")),
        (DataCategory::Downloads, profile_dir.join("downloads.sqlite")),
        (DataCategory::LocalStorage, profile_dir.join("storage")),
    ])
}

/// Total size of a file, or the recursive file-size sum for a directory.
/// Unreadable entries are skipped, not fatal to the aggregate.
pub fn path_size(path: &Path) -> u64 {
    if !path.exists() {
        return 0;
    }
    if path.is_file() {
        return std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    }
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
        .sum()
}
