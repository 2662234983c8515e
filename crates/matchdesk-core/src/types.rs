//! Core data types for the matchdesk admin console
//!
//! These mirror the JSON the admin backend speaks, so every struct uses
//! camelCase field names on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// User identifier type
pub type UserId = String;

/// Match identifier type
pub type MatchId = String;

/// Photo identifier type
pub type PhotoId = String;

/// Report identifier type
pub type ReportId = String;

/// A user as listed by the admin backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Self-reported gender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Free-form location label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Whether the profile passed verification
    #[serde(default)]
    pub is_verified: bool,
    /// When the account was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Short label used in pickers: `name <email>`
    pub fn label(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

/// Match lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Both users can still talk
    #[default]
    Active,
    /// One side ended the match
    Unmatched,
    /// Match lapsed without conversation
    Expired,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Unmatched => write!(f, "unmatched"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// A mutual match between two users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Unique identifier
    pub id: MatchId,
    /// First participant
    pub user1_id: UserId,
    /// First participant's display name
    #[serde(default)]
    pub user1_name: String,
    /// Second participant
    pub user2_id: UserId,
    /// Second participant's display name
    #[serde(default)]
    pub user2_name: String,
    /// Current status
    #[serde(default)]
    pub status: MatchStatus,
    /// Compatibility score in the 0-100 range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_score: Option<f64>,
    /// When the match was created
    pub matched_at: DateTime<Utc>,
    /// Last message exchanged, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<DateTime<Utc>>,
}

/// Photo moderation status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStatus {
    /// Waiting for a moderator
    #[default]
    Pending,
    /// Visible on the profile
    Approved,
    /// Hidden from the profile
    Rejected,
}

impl std::fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A profile photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Unique identifier
    pub id: PhotoId,
    /// Owner of the photo
    pub user_id: UserId,
    /// Public URL
    pub url: String,
    /// Moderation status
    #[serde(default)]
    pub status: PhotoStatus,
    /// Whether this is the profile's primary photo
    #[serde(default)]
    pub is_primary: bool,
    /// Upload time
    pub uploaded_at: DateTime<Utc>,
}

/// Report review status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Not yet looked at
    #[default]
    Pending,
    /// Seen by a moderator, no decision yet
    Reviewed,
    /// Action taken against the reported user
    Resolved,
    /// Closed without action
    Dismissed,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Reviewed => write!(f, "reviewed"),
            Self::Resolved => write!(f, "resolved"),
            Self::Dismissed => write!(f, "dismissed"),
        }
    }
}

/// A user report awaiting moderation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Unique identifier
    pub id: ReportId,
    /// Who filed the report
    pub reporter_id: UserId,
    /// Who was reported
    pub reported_user_id: UserId,
    /// Short reason category
    pub reason: String,
    /// Free-form details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Review status
    #[serde(default)]
    pub status: ReportStatus,
    /// When the report was filed
    pub created_at: DateTime<Utc>,
}

/// Application-wide settings editable from the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_age_range"))]
pub struct AppSettings {
    /// Youngest age allowed to sign up
    #[validate(range(min = 18, message = "minimum age must be at least 18"))]
    pub min_age: u32,
    /// Oldest age shown in discovery
    #[validate(range(max = 100, message = "maximum age must be at most 100"))]
    pub max_age: u32,
    /// Discovery radius in kilometres
    #[validate(range(min = 1, message = "distance must be positive"))]
    pub max_distance_km: u32,
    /// Swipes allowed per user per day
    #[validate(range(min = 1, message = "daily swipe limit must be positive"))]
    pub daily_swipe_limit: u32,
    /// Whether uploaded photos wait for moderation
    pub require_photo_moderation: bool,
    /// Whether the app is in maintenance mode
    pub maintenance_mode: bool,
}

fn validate_age_range(settings: &AppSettings) -> Result<(), validator::ValidationError> {
    if settings.max_age < settings.min_age {
        let mut err = validator::ValidationError::new("age_range");
        err.message = Some("maximum age must not be below minimum age".into());
        return Err(err);
    }
    Ok(())
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 99,
            max_distance_km: 100,
            daily_swipe_limit: 100,
            require_photo_moderation: true,
            maintenance_mode: false,
        }
    }
}

/// Headline numbers for the overview page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Registered users
    pub total_users: u64,
    /// Users active in the last 24 hours
    pub active_users: u64,
    /// All matches ever created
    pub total_matches: u64,
    /// Sign-ups since midnight UTC
    pub new_signups_today: u64,
    /// Reports awaiting review
    pub pending_reports: u64,
    /// Photos awaiting moderation
    pub pending_photos: u64,
}

/// Kind of recent activity entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A user signed up
    Signup,
    /// Two users matched
    Match,
    /// A user was reported
    Report,
    /// A photo was uploaded
    PhotoUpload,
}

/// One entry of the recent activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    /// Unique identifier
    pub id: String,
    /// Entry kind
    pub kind: ActivityKind,
    /// Human readable description
    pub description: String,
    /// When it happened
    pub timestamp: DateTime<Utc>,
}

/// User count for one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStat {
    /// Location label
    pub location: String,
    /// Number of users in that location
    pub user_count: u64,
}

/// One day of the analytics series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetric {
    /// Calendar day
    pub date: NaiveDate,
    /// Sign-ups that day
    pub signups: u64,
    /// Matches that day
    pub matches: u64,
}

/// Analytics for a trailing window of days
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Window length in days
    pub days: u32,
    /// Per-day series, oldest first
    pub series: Vec<DailyMetric>,
}

impl Analytics {
    /// Total sign-ups across the window
    pub fn total_signups(&self) -> u64 {
        self.series.iter().map(|d| d.signups).sum()
    }

    /// Total matches across the window
    pub fn total_matches(&self) -> u64 {
        self.series.iter().map(|d| d.matches).sum()
    }
}

/// One page of a listing along with the total number of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Items across all pages
    pub total: u64,
}

impl<T> Page<T> {
    /// An empty page with a zero total
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Filters for the matches listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFilters {
    /// Only matches in this status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MatchStatus>,
    /// Case-insensitive search over participant names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Filters for the media listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoFilters {
    /// Only photos in this status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PhotoStatus>,
    /// Only photos owned by this user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Filters for the moderation listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    /// Only reports in this status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
}

/// A client-chosen file held by the upload dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    /// File name without directories
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Declared MIME type
    pub mime_type: Option<String>,
    /// Where the file lives locally
    pub path: PathBuf,
}

/// One row-level failure of a bulk upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadError {
    /// Spreadsheet row number (header is row 1, 0 when no row applies)
    pub row: usize,
    /// Human readable message
    pub message: String,
    /// The original row, when the failure could be tied to one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Outcome of one bulk upload attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadResult {
    /// Whether the upload as a whole succeeded
    pub success: bool,
    /// Rows the backend looked at
    pub total_processed: usize,
    /// Rows that produced a user
    pub success_count: usize,
    /// Rows that failed
    pub error_count: usize,
    /// Per-row failures, in row order
    #[serde(default)]
    pub errors: Vec<UploadError>,
    /// Users created, in row order
    #[serde(default)]
    pub created_user_ids: Vec<UserId>,
}

impl BulkUploadResult {
    /// Synthesize the single-error result used when the upload could not run at all
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            total_processed: 0,
            success_count: 0,
            error_count: 1,
            errors: vec![UploadError {
                row: 0,
                message: message.into(),
                data: None,
            }],
            created_user_ids: Vec::new(),
        }
    }

    /// Whether the counts add up
    pub const fn is_consistent(&self) -> bool {
        matches!(
            self.success_count.checked_add(self.error_count),
            Some(sum) if sum == self.total_processed
        )
    }
}

/// Backend reply to a manual swipe creation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeCreationResponse {
    /// Whether the swipes were queued
    pub success: bool,
    /// Server-reported error, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of swipes created
    #[serde(default)]
    pub created: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use validator::Validate;

    #[test]
    fn test_user_deserializes_camel_case() {
        let json = r#"{"id":"u1","name":"Ana","email":"ana@example.com","isVerified":true,"age":29}"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.id, "u1");
        assert!(user.is_verified);
        assert_eq!(user.age, Some(29));
        assert!(user.location.is_none());
        assert_eq!(user.label(), "Ana <ana@example.com>");
    }

    #[test]
    fn test_match_status_wire_format() {
        let json = serde_json::to_string(&MatchStatus::Unmatched).unwrap();
        assert_eq!(json, "\"unmatched\"");
        assert_eq!(MatchStatus::Expired.to_string(), "expired");
    }

    #[test]
    fn test_failed_result_shape() {
        let result = BulkUploadResult::failed("network timeout");

        assert!(!result.success);
        assert_eq!(result.total_processed, 0);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "network timeout");
        assert!(result.errors[0].data.is_none());
    }

    #[test]
    fn test_result_consistency() {
        let result = BulkUploadResult {
            success: true,
            total_processed: 5,
            success_count: 3,
            error_count: 2,
            ..BulkUploadResult::default()
        };
        assert!(result.is_consistent());
        // The synthesized failure counts one error against zero processed rows.
        assert!(!BulkUploadResult::failed("x").is_consistent());
    }

    #[test]
    fn test_result_consistency_with_overflowing_counts() {
        let result = BulkUploadResult {
            total_processed: 0,
            success_count: usize::MAX,
            error_count: 1,
            ..BulkUploadResult::default()
        };
        assert!(!result.is_consistent());
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(AppSettings::default().validate().is_ok());
    }

    #[test]
    fn test_settings_reject_inverted_age_range() {
        let settings = AppSettings {
            min_age: 40,
            max_age: 30,
            ..AppSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_analytics_totals() {
        let analytics = Analytics {
            days: 2,
            series: vec![
                DailyMetric {
                    date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    signups: 10,
                    matches: 4,
                },
                DailyMetric {
                    date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                    signups: 7,
                    matches: 6,
                },
            ],
        };
        assert_eq!(analytics.total_signups(), 17);
        assert_eq!(analytics.total_matches(), 10);
    }
}
