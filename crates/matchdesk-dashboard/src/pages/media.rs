//! Media page: uploaded photos and their moderation status

use super::{format_timestamp, pagination_line, render_table};
use crate::query::{ListController, ListQuery};
use matchdesk_core::types::{Page, Photo, PhotoFilters, PhotoId, PhotoStatus, UserId};
use matchdesk_services::{AdminService, ServiceResult};
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

/// Fetch one page of photos for `query`
pub async fn fetch_photos(
    service: &dyn AdminService,
    query: &ListQuery<PhotoFilters>,
) -> ServiceResult<Page<Photo>> {
    service
        .get_photos(query.page, query.page_size, &query.filters)
        .await
}

/// Photo counts by status on the visible page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhotoSummary {
    /// Awaiting review
    pub pending: usize,
    /// Approved
    pub approved: usize,
    /// Rejected
    pub rejected: usize,
}

impl PhotoSummary {
    /// Count statuses on a page of photos
    pub fn from_items(items: &[Photo]) -> Self {
        items.iter().fold(Self::default(), |mut acc, photo| {
            match photo.status {
                PhotoStatus::Pending => acc.pending += 1,
                PhotoStatus::Approved => acc.approved += 1,
                PhotoStatus::Rejected => acc.rejected += 1,
            }
            acc
        })
    }
}

/// Photo list with status and owner filters
pub struct MediaPage {
    service: Arc<dyn AdminService>,
    list: ListController<PhotoFilters, Photo>,
}

impl MediaPage {
    /// Create the page; nothing is fetched until [`Self::load`]
    pub fn new(service: Arc<dyn AdminService>, page_size: u32) -> Self {
        Self {
            service,
            list: ListController::new("photos", page_size),
        }
    }

    /// Fetch the current page
    pub async fn load(&mut self) -> bool {
        let service = Arc::clone(&self.service);
        self.list
            .refresh(|query| async move { fetch_photos(service.as_ref(), &query).await })
            .await
    }

    /// Filter by moderation status and refetch from page 1
    pub async fn set_status(&mut self, status: Option<PhotoStatus>) -> bool {
        let filters = PhotoFilters {
            status,
            ..self.list.query().filters.clone()
        };
        self.list.set_filters(filters);
        self.load().await
    }

    /// Filter by owner and refetch from page 1
    pub async fn set_user(&mut self, user_id: Option<UserId>) -> bool {
        let filters = PhotoFilters {
            user_id,
            ..self.list.query().filters.clone()
        };
        self.list.set_filters(filters);
        self.load().await
    }

    /// Replace filters and page in one step, then fetch once
    pub async fn load_with(&mut self, filters: PhotoFilters, page: u32) -> bool {
        self.list.set_filters(filters);
        self.list.set_page(page);
        self.load().await
    }

    /// Move to `page` and refetch
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        self.list.set_page(page);
        self.load().await
    }

    /// Approve a photo, then refetch
    pub async fn approve(&mut self, photo_id: &PhotoId) -> crate::Result<()> {
        self.moderate(photo_id, PhotoStatus::Approved).await
    }

    /// Reject a photo, then refetch
    pub async fn reject(&mut self, photo_id: &PhotoId) -> crate::Result<()> {
        self.moderate(photo_id, PhotoStatus::Rejected).await
    }

    async fn moderate(&mut self, photo_id: &PhotoId, status: PhotoStatus) -> crate::Result<()> {
        self.service.moderate_photo(photo_id, status).await?;
        info!(photo_id = %photo_id, %status, "Moderated photo");
        self.load().await;
        Ok(())
    }

    /// Photos on the current page
    pub fn items(&self) -> &[Photo] {
        self.list.items()
    }

    /// List controller, for query and loading state
    pub const fn list(&self) -> &ListController<PhotoFilters, Photo> {
        &self.list
    }

    /// Summary cards for the current page
    pub fn summary(&self) -> PhotoSummary {
        PhotoSummary::from_items(self.list.items())
    }

    /// Render the page as text
    pub fn render(&self) -> String {
        let summary = self.summary();
        let mut out = String::from("Media\n");
        let _ = writeln!(
            out,
            "Pending: {}  Approved: {}  Rejected: {}\n",
            summary.pending, summary.approved, summary.rejected
        );

        let rows: Vec<Vec<String>> = self
            .list
            .items()
            .iter()
            .map(|p| {
                vec![
                    p.id.clone(),
                    p.user_id.clone(),
                    p.status.to_string(),
                    if p.is_primary { "yes" } else { "" }.to_string(),
                    format_timestamp(p.uploaded_at),
                    p.url.clone(),
                ]
            })
            .collect();
        out.push_str(&render_table(
            &["ID", "User", "Status", "Primary", "Uploaded", "URL"],
            &rows,
        ));

        let _ = writeln!(
            out,
            "{}",
            pagination_line(
                self.list.query().page,
                self.list.total_pages(),
                self.list.state().total
            )
        );
        out
    }
}

impl std::fmt::Debug for MediaPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPage")
            .field("service", &self.service.name())
            .field("list", &self.list)
            .finish()
    }
}
