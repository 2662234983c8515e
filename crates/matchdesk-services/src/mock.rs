//! In-memory admin service for tests and offline use

use crate::csv_import::{UserCsvRow, spreadsheet_row};
use crate::error::{ServiceError, ServiceResult};
use crate::service::AdminService;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use matchdesk_core::types::{
    ActivityItem, ActivityKind, Analytics, AppSettings, BulkUploadResult, DailyMetric,
    DashboardStats, LocationStat, Match, MatchFilters, MatchId, MatchStatus, Page, Photo,
    PhotoFilters, PhotoId, PhotoStatus, Report, ReportFilters, ReportId, ReportStatus,
    SwipeCreationResponse, UploadError, User, UserId,
};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::{Duration, sleep};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default)]
struct Store {
    users: Vec<User>,
    matches: Vec<Match>,
    photos: Vec<Photo>,
    reports: Vec<Report>,
    swipes: Vec<(UserId, UserId)>,
    activity: Vec<ActivityItem>,
    settings: AppSettings,
}

/// In-memory admin backend
///
/// Holds users, matches, photos and reports behind a lock and implements the
/// full [`AdminService`] contract over them. Can be told to fail every call or
/// to delay every call, and records which operations were invoked.
#[derive(Debug)]
pub struct MockAdminService {
    store: RwLock<Store>,

    /// Mock processing delay
    delay_ms: u64,

    /// Failure message returned by every call, when set
    failure: Option<String>,

    /// When set, every call waits for one permit before answering
    gate: Option<Arc<Notify>>,

    /// Operations invoked, in call order
    calls: Mutex<Vec<&'static str>>,
}

impl MockAdminService {
    /// Create an empty backend
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
            delay_ms: 0,
            failure: None,
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delay every call, for exercising in-flight and ordering behaviour
    pub const fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Fail every call with [`ServiceError::Remote`] carrying `message`
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Hold every call until `gate` hands out a permit
    ///
    /// The call is recorded before it waits, so [`Self::call_count`] shows
    /// calls that are still held.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Seed users
    pub fn with_users(self, users: Vec<User>) -> Self {
        self.store.write().users = users;
        self
    }

    /// Seed matches
    pub fn with_matches(self, matches: Vec<Match>) -> Self {
        self.store.write().matches = matches;
        self
    }

    /// Seed photos
    pub fn with_photos(self, photos: Vec<Photo>) -> Self {
        self.store.write().photos = photos;
        self
    }

    /// Seed reports
    pub fn with_reports(self, reports: Vec<Report>) -> Self {
        self.store.write().reports = reports;
        self
    }

    /// Seed settings
    pub fn with_settings(self, settings: AppSettings) -> Self {
        self.store.write().settings = settings;
        self
    }

    /// A small but complete data set for offline demos
    pub fn with_sample_data() -> Self {
        let now = Utc::now();
        let people = [
            ("Ana Silva", "Lisbon", 29),
            ("Ben Okafor", "London", 34),
            ("Chloe Martin", "Paris", 27),
            ("Diego Ruiz", "Madrid", 31),
            ("Elif Kaya", "London", 26),
            ("Farid Haddad", "Paris", 38),
            ("Greta Lund", "Lisbon", 45),
        ];

        let users: Vec<User> = people
            .iter()
            .enumerate()
            .map(|(i, (name, location, age))| User {
                id: format!("u{}", i + 1),
                name: (*name).to_string(),
                email: format!(
                    "{}@example.com",
                    name.to_ascii_lowercase().replace(' ', ".")
                ),
                phone: None,
                age: Some(*age),
                gender: None,
                location: Some((*location).to_string()),
                is_verified: i % 2 == 0,
                created_at: Some(now - ChronoDuration::days(i64::try_from(i).unwrap_or(0) * 3)),
            })
            .collect();

        let pair = |id: &str, a: usize, b: usize, status, score, days_ago| Match {
            id: id.to_string(),
            user1_id: users[a].id.clone(),
            user1_name: users[a].name.clone(),
            user2_id: users[b].id.clone(),
            user2_name: users[b].name.clone(),
            status,
            compatibility_score: score,
            matched_at: now - ChronoDuration::days(days_ago),
            last_message_at: None,
        };
        let matches = vec![
            pair("m1", 0, 1, MatchStatus::Active, Some(91.0), 1),
            pair("m2", 2, 3, MatchStatus::Active, Some(78.5), 2),
            pair("m3", 4, 5, MatchStatus::Unmatched, Some(64.0), 5),
            pair("m4", 0, 3, MatchStatus::Expired, None, 12),
        ];

        let photos = users
            .iter()
            .enumerate()
            .map(|(i, user)| Photo {
                id: format!("p{}", i + 1),
                user_id: user.id.clone(),
                url: format!("https://img.example.com/{}.jpg", user.id),
                status: match i % 3 {
                    0 => PhotoStatus::Pending,
                    1 => PhotoStatus::Approved,
                    _ => PhotoStatus::Rejected,
                },
                is_primary: true,
                uploaded_at: now - ChronoDuration::hours(i64::try_from(i).unwrap_or(0)),
            })
            .collect();

        let reports = vec![
            Report {
                id: "r1".to_string(),
                reporter_id: "u2".to_string(),
                reported_user_id: "u6".to_string(),
                reason: "spam".to_string(),
                description: Some("Sends the same link to everyone".to_string()),
                status: ReportStatus::Pending,
                created_at: now - ChronoDuration::hours(3),
            },
            Report {
                id: "r2".to_string(),
                reporter_id: "u1".to_string(),
                reported_user_id: "u4".to_string(),
                reason: "fake_profile".to_string(),
                description: None,
                status: ReportStatus::Reviewed,
                created_at: now - ChronoDuration::days(2),
            },
        ];

        Self::new()
            .with_users(users)
            .with_matches(matches)
            .with_photos(photos)
            .with_reports(reports)
    }

    /// Operations invoked so far, in call order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    /// How many times `operation` was invoked
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == operation).count()
    }

    /// Swipes created so far as `(from, to)` pairs
    pub fn swipes(&self) -> Vec<(UserId, UserId)> {
        self.store.read().swipes.clone()
    }

    /// Users currently stored
    pub fn users(&self) -> Vec<User> {
        self.store.read().users.clone()
    }

    async fn enter(&self, operation: &'static str) -> ServiceResult<()> {
        self.calls.lock().push(operation);

        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }

        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match self.failure {
            Some(ref message) => Err(ServiceError::remote(message.clone())),
            None => Ok(()),
        }
    }

    fn record_activity(store: &mut Store, kind: ActivityKind, description: String) {
        store.activity.push(ActivityItem {
            id: Uuid::new_v4().to_string(),
            kind,
            description,
            timestamp: Utc::now(),
        });
    }

    fn create_user(store: &mut Store, row: &UserCsvRow) -> UserId {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        store.users.push(User {
            id: id.clone(),
            name: row.name.trim().to_string(),
            email: row.email.trim().to_ascii_lowercase(),
            phone: row.phone.clone(),
            age: row.age,
            gender: row.gender.clone(),
            location: row.location.clone(),
            is_verified: row.is_verified.unwrap_or(false),
            created_at: Some(now),
        });

        let status = if store.settings.require_photo_moderation {
            PhotoStatus::Pending
        } else {
            PhotoStatus::Approved
        };
        for (i, url) in row.photo_urls().into_iter().enumerate() {
            store.photos.push(Photo {
                id: Uuid::new_v4().to_string(),
                user_id: id.clone(),
                url: url.to_string(),
                status,
                is_primary: i == 0,
                uploaded_at: now,
            });
        }

        Self::record_activity(store, ActivityKind::Signup, format!("{} joined", row.name.trim()));
        id
    }
}

impl Default for MockAdminService {
    fn default() -> Self {
        Self::new()
    }
}

fn paginate<T: Clone>(items: &[T], page: u32, page_size: u32) -> Page<T> {
    let page_size = page_size.max(1) as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(page_size);

    Page {
        items: items.iter().skip(start).take(page_size).cloned().collect(),
        total: items.len() as u64,
    }
}

fn day_of(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

#[async_trait]
impl AdminService for MockAdminService {
    async fn get_matches(
        &self,
        page: u32,
        page_size: u32,
        filters: &MatchFilters,
    ) -> ServiceResult<Page<Match>> {
        self.enter("get_matches").await?;
        let store = self.store.read();
        let search = filters
            .search
            .as_deref()
            .map(str::to_lowercase)
            .filter(|s| !s.is_empty());

        let filtered: Vec<Match> = store
            .matches
            .iter()
            .filter(|m| filters.status.is_none_or(|s| m.status == s))
            .filter(|m| {
                search.as_ref().is_none_or(|needle| {
                    m.user1_name.to_lowercase().contains(needle)
                        || m.user2_name.to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect();

        Ok(paginate(&filtered, page, page_size))
    }

    async fn end_match(&self, match_id: &MatchId) -> ServiceResult<()> {
        self.enter("end_match").await?;
        let mut store = self.store.write();
        let entry = store
            .matches
            .iter_mut()
            .find(|m| &m.id == match_id)
            .ok_or_else(|| ServiceError::not_found(format!("match {match_id}")))?;
        entry.status = MatchStatus::Unmatched;
        Ok(())
    }

    async fn get_photos(
        &self,
        page: u32,
        page_size: u32,
        filters: &PhotoFilters,
    ) -> ServiceResult<Page<Photo>> {
        self.enter("get_photos").await?;
        let store = self.store.read();
        let filtered: Vec<Photo> = store
            .photos
            .iter()
            .filter(|p| filters.status.is_none_or(|s| p.status == s))
            .filter(|p| filters.user_id.as_ref().is_none_or(|u| &p.user_id == u))
            .cloned()
            .collect();

        Ok(paginate(&filtered, page, page_size))
    }

    async fn moderate_photo(&self, photo_id: &PhotoId, status: PhotoStatus) -> ServiceResult<()> {
        self.enter("moderate_photo").await?;
        let mut store = self.store.write();
        let photo = store
            .photos
            .iter_mut()
            .find(|p| &p.id == photo_id)
            .ok_or_else(|| ServiceError::not_found(format!("photo {photo_id}")))?;
        photo.status = status;
        Ok(())
    }

    async fn get_reports(
        &self,
        page: u32,
        page_size: u32,
        filters: &ReportFilters,
    ) -> ServiceResult<Page<Report>> {
        self.enter("get_reports").await?;
        let store = self.store.read();
        let filtered: Vec<Report> = store
            .reports
            .iter()
            .filter(|r| filters.status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();

        Ok(paginate(&filtered, page, page_size))
    }

    async fn update_report_status(
        &self,
        report_id: &ReportId,
        status: ReportStatus,
    ) -> ServiceResult<()> {
        self.enter("update_report_status").await?;
        let mut store = self.store.write();
        let report = store
            .reports
            .iter_mut()
            .find(|r| &r.id == report_id)
            .ok_or_else(|| ServiceError::not_found(format!("report {report_id}")))?;
        report.status = status;
        Ok(())
    }

    async fn get_users(&self, page: u32, page_size: u32) -> ServiceResult<Vec<User>> {
        self.enter("get_users").await?;
        Ok(paginate(&self.store.read().users, page, page_size).items)
    }

    async fn create_swipes_for_user(
        &self,
        from_user_id: &UserId,
        target_user_ids: &[UserId],
    ) -> ServiceResult<SwipeCreationResponse> {
        self.enter("create_swipes_for_user").await?;
        let mut store = self.store.write();

        let rejection = if target_user_ids.is_empty() {
            Some("No target users given".to_string())
        } else if !store.users.iter().any(|u| &u.id == from_user_id) {
            Some(format!("User {from_user_id} does not exist"))
        } else if let Some(missing) = target_user_ids
            .iter()
            .find(|t| !store.users.iter().any(|u| &u.id == *t))
        {
            Some(format!("User {missing} does not exist"))
        } else if target_user_ids.contains(from_user_id) {
            Some("A user cannot swipe on themselves".to_string())
        } else {
            None
        };

        if let Some(error) = rejection {
            return Ok(SwipeCreationResponse {
                success: false,
                error: Some(error),
                created: 0,
            });
        }

        for target in target_user_ids {
            store.swipes.push((from_user_id.clone(), target.clone()));
        }
        debug!(from = %from_user_id, count = target_user_ids.len(), "Created manual swipes");

        Ok(SwipeCreationResponse {
            success: true,
            error: None,
            created: target_user_ids.len(),
        })
    }

    async fn bulk_upload_users(&self, rows: &[UserCsvRow]) -> ServiceResult<BulkUploadResult> {
        self.enter("bulk_upload_users").await?;
        let mut store = self.store.write();

        let mut seen: HashSet<String> = store
            .users
            .iter()
            .map(|u| u.email.to_ascii_lowercase())
            .collect();
        let mut errors = Vec::new();
        let mut created_user_ids = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let row_number = spreadsheet_row(index);
            let email = row.email.trim().to_ascii_lowercase();

            let outcome = row.validate().and_then(|()| {
                if seen.contains(&email) {
                    Err(format!("Email already registered: {email}"))
                } else {
                    Ok(())
                }
            });

            match outcome {
                Ok(()) => {
                    seen.insert(email);
                    created_user_ids.push(Self::create_user(&mut store, row));
                }
                Err(message) => errors.push(UploadError {
                    row: row_number,
                    message,
                    data: Some(row.to_json()),
                }),
            }
        }

        info!(
            processed = rows.len(),
            created = created_user_ids.len(),
            failed = errors.len(),
            "Bulk upload processed"
        );

        Ok(BulkUploadResult {
            success: errors.is_empty(),
            total_processed: rows.len(),
            success_count: created_user_ids.len(),
            error_count: errors.len(),
            errors,
            created_user_ids,
        })
    }

    async fn get_dashboard_stats(&self) -> ServiceResult<DashboardStats> {
        self.enter("get_dashboard_stats").await?;
        let store = self.store.read();
        let today = day_of(Utc::now());

        let active: HashSet<&UserId> = store
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Active)
            .flat_map(|m| [&m.user1_id, &m.user2_id])
            .collect();

        Ok(DashboardStats {
            total_users: store.users.len() as u64,
            active_users: active.len() as u64,
            total_matches: store.matches.len() as u64,
            new_signups_today: store
                .users
                .iter()
                .filter(|u| u.created_at.is_some_and(|c| day_of(c) == today))
                .count() as u64,
            pending_reports: store
                .reports
                .iter()
                .filter(|r| r.status == ReportStatus::Pending)
                .count() as u64,
            pending_photos: store
                .photos
                .iter()
                .filter(|p| p.status == PhotoStatus::Pending)
                .count() as u64,
        })
    }

    async fn get_recent_activity(&self, limit: u32) -> ServiceResult<Vec<ActivityItem>> {
        self.enter("get_recent_activity").await?;
        let mut activity = self.store.read().activity.clone();
        activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        activity.truncate(limit as usize);
        Ok(activity)
    }

    async fn get_top_locations(&self, limit: u32) -> ServiceResult<Vec<LocationStat>> {
        self.enter("get_top_locations").await?;
        let store = self.store.read();

        let mut counts: HashMap<&str, u64> = HashMap::new();
        for location in store.users.iter().filter_map(|u| u.location.as_deref()) {
            *counts.entry(location).or_default() += 1;
        }

        let mut stats: Vec<LocationStat> = counts
            .into_iter()
            .map(|(location, user_count)| LocationStat {
                location: location.to_string(),
                user_count,
            })
            .collect();
        stats.sort_by(|a, b| {
            b.user_count
                .cmp(&a.user_count)
                .then_with(|| a.location.cmp(&b.location))
        });
        stats.truncate(limit as usize);
        Ok(stats)
    }

    async fn get_analytics(&self, days: u32) -> ServiceResult<Analytics> {
        self.enter("get_analytics").await?;
        let store = self.store.read();
        let today = day_of(Utc::now());

        let mut series: BTreeMap<NaiveDate, DailyMetric> = (0..days)
            .map(|offset| today - ChronoDuration::days(i64::from(offset)))
            .map(|date| {
                (
                    date,
                    DailyMetric {
                        date,
                        signups: 0,
                        matches: 0,
                    },
                )
            })
            .collect();

        for created in store.users.iter().filter_map(|u| u.created_at) {
            if let Some(metric) = series.get_mut(&day_of(created)) {
                metric.signups += 1;
            }
        }
        for m in &store.matches {
            if let Some(metric) = series.get_mut(&day_of(m.matched_at)) {
                metric.matches += 1;
            }
        }

        Ok(Analytics {
            days,
            series: series.into_values().collect(),
        })
    }

    async fn get_settings(&self) -> ServiceResult<AppSettings> {
        self.enter("get_settings").await?;
        Ok(self.store.read().settings.clone())
    }

    async fn update_settings(&self, settings: &AppSettings) -> ServiceResult<AppSettings> {
        self.enter("update_settings").await?;
        settings
            .validate()
            .map_err(|e| ServiceError::from(matchdesk_core::Error::from(e)))?;
        let mut store = self.store.write();
        store.settings = settings.clone();
        Ok(store.settings.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
