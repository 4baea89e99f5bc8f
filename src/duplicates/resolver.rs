use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::walker::FileDescriptor;

/// Policy deciding which member of a duplicate group is the suggested
/// keeper. The keeper is always ordered first in the group; everything
/// after it is offered for deletion. The policy only orders suggestions:
/// deletion itself operates on an explicit caller-chosen path list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeepPolicy {
    /// Keep the most recently modified file (presumed the live copy)
    #[default]
    NewestFirst,
    /// Keep the oldest file (presumed the original)
    OldestFirst,
    /// Keep the file with the shortest path (presumed the canonical location)
    ShortestPath,
}

impl KeepPolicy {
    /// Order group members so the keep candidate is first
    pub fn order(&self, members: &mut [FileDescriptor]) {
        match self {
            // Files without a readable mtime sort last
            KeepPolicy::NewestFirst => members.sort_by(|a, b| b.modified.cmp(&a.modified)),
            KeepPolicy::OldestFirst => members.sort_by(|a, b| {
                match (a.modified, b.modified) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            }),
            KeepPolicy::ShortestPath => members.sort_by(|a, b| {
                let la = a.path.as_os_str().len();
                let lb = b.path.as_os_str().len();
                la.cmp(&lb).then_with(|| a.path.cmp(&b.path))
            }),
        }
    }
}

impl FromStr for KeepPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" | "newest_first" => Ok(KeepPolicy::NewestFirst),
            "oldest" | "oldest_first" => Ok(KeepPolicy::OldestFirst),
            "shortest-path" | "shortest_path" => Ok(KeepPolicy::ShortestPath),
            other => Err(format!(
                "unknown keep policy '{}' (expected newest, oldest, or shortest-path)",
                other
            )),
        }
    }
}
