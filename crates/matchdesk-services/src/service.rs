//! Admin service trait
//!
//! Every dashboard page and dialog talks to the backend through this trait,
//! so the HTTP client and the in-memory backend are interchangeable.

use crate::csv_import::UserCsvRow;
use crate::error::ServiceResult;
use async_trait::async_trait;
use matchdesk_core::types::{
    ActivityItem, Analytics, AppSettings, BulkUploadResult, DashboardStats, LocationStat, Match,
    MatchFilters, MatchId, Page, Photo, PhotoFilters, PhotoId, PhotoStatus, Report,
    ReportFilters, ReportId, ReportStatus, SwipeCreationResponse, User, UserId,
};

/// Operations the admin backend exposes to the console
#[async_trait]
pub trait AdminService: Send + Sync {
    /// One page of matches, 1-based `page`
    async fn get_matches(
        &self,
        page: u32,
        page_size: u32,
        filters: &MatchFilters,
    ) -> ServiceResult<Page<Match>>;

    /// End an active match on behalf of moderation
    async fn end_match(&self, match_id: &MatchId) -> ServiceResult<()>;

    /// One page of photos, 1-based `page`
    async fn get_photos(
        &self,
        page: u32,
        page_size: u32,
        filters: &PhotoFilters,
    ) -> ServiceResult<Page<Photo>>;

    /// Approve or reject a photo
    async fn moderate_photo(&self, photo_id: &PhotoId, status: PhotoStatus) -> ServiceResult<()>;

    /// One page of user reports, 1-based `page`
    async fn get_reports(
        &self,
        page: u32,
        page_size: u32,
        filters: &ReportFilters,
    ) -> ServiceResult<Page<Report>>;

    /// Move a report to a new review status
    async fn update_report_status(
        &self,
        report_id: &ReportId,
        status: ReportStatus,
    ) -> ServiceResult<()>;

    /// One page of users, 1-based `page`
    async fn get_users(&self, page: u32, page_size: u32) -> ServiceResult<Vec<User>>;

    /// Queue swipes from `from_user_id` toward each target
    async fn create_swipes_for_user(
        &self,
        from_user_id: &UserId,
        target_user_ids: &[UserId],
    ) -> ServiceResult<SwipeCreationResponse>;

    /// Create users (and their photos) from parsed spreadsheet rows
    async fn bulk_upload_users(&self, rows: &[UserCsvRow]) -> ServiceResult<BulkUploadResult>;

    /// Headline numbers for the overview page
    async fn get_dashboard_stats(&self) -> ServiceResult<DashboardStats>;

    /// Most recent activity, newest first
    async fn get_recent_activity(&self, limit: u32) -> ServiceResult<Vec<ActivityItem>>;

    /// Locations with the most users, largest first
    async fn get_top_locations(&self, limit: u32) -> ServiceResult<Vec<LocationStat>>;

    /// Daily sign-up and match series for the trailing `days`
    async fn get_analytics(&self, days: u32) -> ServiceResult<Analytics>;

    /// Current application settings
    async fn get_settings(&self) -> ServiceResult<AppSettings>;

    /// Replace application settings, returning what the backend stored
    async fn update_settings(&self, settings: &AppSettings) -> ServiceResult<AppSettings>;

    /// Get service name
    fn name(&self) -> &str;
}
