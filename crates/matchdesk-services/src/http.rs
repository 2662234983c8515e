//! HTTP implementation of the admin service
//!
//! Talks JSON to `{base_url}/api/admin/...`. Error bodies of the form
//! `{"error": "..."}` are surfaced verbatim as [`ServiceError::Remote`].

use crate::csv_import::{UserCsvRow, spreadsheet_row};
use crate::error::{ServiceError, ServiceResult};
use crate::service::AdminService;
use async_trait::async_trait;
use matchdesk_core::config::ServiceConfig;
use matchdesk_core::types::{
    ActivityItem, Analytics, AppSettings, BulkUploadResult, DashboardStats, LocationStat, Match,
    MatchFilters, MatchId, Page, Photo, PhotoFilters, PhotoId, PhotoStatus, Report,
    ReportFilters, ReportId, ReportStatus, SwipeCreationResponse, UploadError, User, UserId,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct MatchesEnvelope {
    matches: Vec<Match>,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct PhotosEnvelope {
    photos: Vec<Photo>,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ReportsEnvelope {
    reports: Vec<Report>,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSwipesBody<'a> {
    from_user_id: &'a str,
    target_user_ids: &'a [UserId],
}

#[derive(Debug, Serialize)]
struct BulkUploadBody<'a> {
    rows: Vec<&'a UserCsvRow>,
}

#[derive(Debug, Serialize)]
struct StatusBody<S> {
    status: S,
}

/// Admin service backed by the real admin API
#[derive(Debug, Clone)]
pub struct HttpAdminService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAdminService {
    /// Create a client from the service section of the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ServiceConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api/admin{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(ref api_key) = self.api_key {
            request = request.header("X-API-Key", api_key);
        }

        request
    }

    async fn execute(&self, request: RequestBuilder, what: &str) -> ServiceResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(status = status.as_u16(), "{what} succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.is_empty());

        warn!(status = status.as_u16(), "{what} failed");
        Err(message.map_or(
            ServiceError::Status {
                status: status.as_u16(),
            },
            ServiceError::Remote,
        ))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> ServiceResult<T> {
        let response = self.execute(request, what).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fold rows that never left the client into the backend's result
    ///
    /// `sent` maps each row the backend saw to its index in the spreadsheet;
    /// backend row numbers are translated back through it.
    fn merge_unsent_rows(
        mut result: BulkUploadResult,
        sent: &[usize],
        unsent: Vec<UploadError>,
    ) -> BulkUploadResult {
        for error in &mut result.errors {
            if let Some(&index) = error
                .row
                .checked_sub(spreadsheet_row(0))
                .and_then(|i| sent.get(i))
            {
                error.row = spreadsheet_row(index);
            }
        }

        let unsent_count = unsent.len();
        result.errors.extend(unsent);
        result.errors.sort_by_key(|e| e.row);
        result.total_processed = result.total_processed.saturating_add(unsent_count);
        result.error_count = result.error_count.saturating_add(unsent_count);
        result.success = result.success && unsent_count == 0;
        result
    }

    fn page_query(page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        vec![("page", page.to_string()), ("pageSize", page_size.to_string())]
    }
}

#[async_trait]
impl AdminService for HttpAdminService {
    async fn get_matches(
        &self,
        page: u32,
        page_size: u32,
        filters: &MatchFilters,
    ) -> ServiceResult<Page<Match>> {
        let mut query = Self::page_query(page, page_size);
        if let Some(status) = filters.status {
            query.push(("status", status.to_string()));
        }
        if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }

        let envelope: MatchesEnvelope = self
            .fetch(self.request(Method::GET, "/matches").query(&query), "get_matches")
            .await?;

        Ok(Page {
            items: envelope.matches,
            total: envelope.total,
        })
    }

    async fn end_match(&self, match_id: &MatchId) -> ServiceResult<()> {
        let path = format!("/matches/{}/end", urlencoding::encode(match_id));
        self.execute(self.request(Method::POST, &path), "end_match")
            .await?;
        Ok(())
    }

    async fn get_photos(
        &self,
        page: u32,
        page_size: u32,
        filters: &PhotoFilters,
    ) -> ServiceResult<Page<Photo>> {
        let mut query = Self::page_query(page, page_size);
        if let Some(status) = filters.status {
            query.push(("status", status.to_string()));
        }
        if let Some(ref user_id) = filters.user_id {
            query.push(("userId", user_id.clone()));
        }

        let envelope: PhotosEnvelope = self
            .fetch(self.request(Method::GET, "/photos").query(&query), "get_photos")
            .await?;

        Ok(Page {
            items: envelope.photos,
            total: envelope.total,
        })
    }

    async fn moderate_photo(&self, photo_id: &PhotoId, status: PhotoStatus) -> ServiceResult<()> {
        let path = format!("/photos/{}", urlencoding::encode(photo_id));
        self.execute(
            self.request(Method::PATCH, &path)
                .json(&StatusBody { status }),
            "moderate_photo",
        )
        .await?;
        Ok(())
    }

    async fn get_reports(
        &self,
        page: u32,
        page_size: u32,
        filters: &ReportFilters,
    ) -> ServiceResult<Page<Report>> {
        let mut query = Self::page_query(page, page_size);
        if let Some(status) = filters.status {
            query.push(("status", status.to_string()));
        }

        let envelope: ReportsEnvelope = self
            .fetch(self.request(Method::GET, "/reports").query(&query), "get_reports")
            .await?;

        Ok(Page {
            items: envelope.reports,
            total: envelope.total,
        })
    }

    async fn update_report_status(
        &self,
        report_id: &ReportId,
        status: ReportStatus,
    ) -> ServiceResult<()> {
        let path = format!("/reports/{}", urlencoding::encode(report_id));
        self.execute(
            self.request(Method::PATCH, &path)
                .json(&StatusBody { status }),
            "update_report_status",
        )
        .await?;
        Ok(())
    }

    async fn get_users(&self, page: u32, page_size: u32) -> ServiceResult<Vec<User>> {
        let envelope: UsersEnvelope = self
            .fetch(
                self.request(Method::GET, "/users")
                    .query(&Self::page_query(page, page_size)),
                "get_users",
            )
            .await?;
        Ok(envelope.users)
    }

    async fn create_swipes_for_user(
        &self,
        from_user_id: &UserId,
        target_user_ids: &[UserId],
    ) -> ServiceResult<SwipeCreationResponse> {
        let body = CreateSwipesBody {
            from_user_id: from_user_id.as_str(),
            target_user_ids,
        };
        self.fetch(
            self.request(Method::POST, "/swipes").json(&body),
            "create_swipes_for_user",
        )
        .await
    }

    async fn bulk_upload_users(&self, rows: &[UserCsvRow]) -> ServiceResult<BulkUploadResult> {
        let mut sent = Vec::new();
        let mut body = BulkUploadBody { rows: Vec::new() };
        let mut unsent = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            if row.cell_errors.is_empty() {
                sent.push(index);
                body.rows.push(row);
            } else {
                unsent.push(UploadError {
                    row: spreadsheet_row(index),
                    message: row.cell_errors.join("; "),
                    data: Some(row.to_json()),
                });
            }
        }

        let result = if body.rows.is_empty() {
            BulkUploadResult {
                success: true,
                ..BulkUploadResult::default()
            }
        } else {
            self.fetch(
                self.request(Method::POST, "/users/bulk").json(&body),
                "bulk_upload_users",
            )
            .await?
        };

        if !unsent.is_empty() {
            debug!(unsent = unsent.len(), "Rows with unreadable cells kept back");
        }
        Ok(Self::merge_unsent_rows(result, &sent, unsent))
    }

    async fn get_dashboard_stats(&self) -> ServiceResult<DashboardStats> {
        self.fetch(self.request(Method::GET, "/stats"), "get_dashboard_stats")
            .await
    }

    async fn get_recent_activity(&self, limit: u32) -> ServiceResult<Vec<ActivityItem>> {
        self.fetch(
            self.request(Method::GET, "/activity")
                .query(&[("limit", limit)]),
            "get_recent_activity",
        )
        .await
    }

    async fn get_top_locations(&self, limit: u32) -> ServiceResult<Vec<LocationStat>> {
        self.fetch(
            self.request(Method::GET, "/locations/top")
                .query(&[("limit", limit)]),
            "get_top_locations",
        )
        .await
    }

    async fn get_analytics(&self, days: u32) -> ServiceResult<Analytics> {
        self.fetch(
            self.request(Method::GET, "/analytics")
                .query(&[("days", days)]),
            "get_analytics",
        )
        .await
    }

    async fn get_settings(&self) -> ServiceResult<AppSettings> {
        self.fetch(self.request(Method::GET, "/settings"), "get_settings")
            .await
    }

    async fn update_settings(&self, settings: &AppSettings) -> ServiceResult<AppSettings> {
        self.fetch(
            self.request(Method::PUT, "/settings").json(settings),
            "update_settings",
        )
        .await
    }

    fn name(&self) -> &str {
        "http"
    }
}
