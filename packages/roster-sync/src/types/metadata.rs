//! Run metadata published with every successful commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display format for the last-updated stamp, e.g. `2026-10-18 14:03:22 UTC`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Time of the last trustworthy run, formatted for end users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    #[serde(rename = "lastUpdatedAt")]
    pub last_updated_at: String,
}

impl RunMetadata {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            last_updated_at: time.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
