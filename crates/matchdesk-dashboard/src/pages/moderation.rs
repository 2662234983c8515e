//! Moderation page: user reports

use super::{format_timestamp, pagination_line, render_table};
use crate::query::{ListController, ListQuery};
use matchdesk_core::types::{Page, Report, ReportFilters, ReportId, ReportStatus};
use matchdesk_services::{AdminService, ServiceResult};
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

/// Fetch one page of reports for `query`
pub async fn fetch_reports(
    service: &dyn AdminService,
    query: &ListQuery<ReportFilters>,
) -> ServiceResult<Page<Report>> {
    service
        .get_reports(query.page, query.page_size, &query.filters)
        .await
}

/// Report counts by status on the visible page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Not looked at yet
    pub pending: usize,
    /// Looked at, no decision
    pub reviewed: usize,
    /// Action taken
    pub resolved: usize,
    /// Closed without action
    pub dismissed: usize,
}

impl ReportSummary {
    /// Count statuses on a page of reports
    pub fn from_items(items: &[Report]) -> Self {
        let mut summary = Self::default();
        for report in items {
            match report.status {
                ReportStatus::Pending => summary.pending += 1,
                ReportStatus::Reviewed => summary.reviewed += 1,
                ReportStatus::Resolved => summary.resolved += 1,
                ReportStatus::Dismissed => summary.dismissed += 1,
            }
        }
        summary
    }
}

/// Report queue with a status filter
pub struct ModerationPage {
    service: Arc<dyn AdminService>,
    list: ListController<ReportFilters, Report>,
}

impl ModerationPage {
    /// Create the page; nothing is fetched until [`Self::load`]
    pub fn new(service: Arc<dyn AdminService>, page_size: u32) -> Self {
        Self {
            service,
            list: ListController::new("reports", page_size),
        }
    }

    /// Fetch the current page
    pub async fn load(&mut self) -> bool {
        let service = Arc::clone(&self.service);
        self.list
            .refresh(|query| async move { fetch_reports(service.as_ref(), &query).await })
            .await
    }

    /// Filter by status and refetch from page 1
    pub async fn set_status(&mut self, status: Option<ReportStatus>) -> bool {
        self.list.set_filters(ReportFilters { status });
        self.load().await
    }

    /// Replace filters and page in one step, then fetch once
    pub async fn load_with(&mut self, filters: ReportFilters, page: u32) -> bool {
        self.list.set_filters(filters);
        self.list.set_page(page);
        self.load().await
    }

    /// Move to `page` and refetch
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        self.list.set_page(page);
        self.load().await
    }

    /// Move a report to `status`, then refetch
    pub async fn set_report_status(
        &mut self,
        report_id: &ReportId,
        status: ReportStatus,
    ) -> crate::Result<()> {
        self.service.update_report_status(report_id, status).await?;
        info!(report_id = %report_id, %status, "Updated report");
        self.load().await;
        Ok(())
    }

    /// Mark a report resolved
    pub async fn resolve(&mut self, report_id: &ReportId) -> crate::Result<()> {
        self.set_report_status(report_id, ReportStatus::Resolved).await
    }

    /// Dismiss a report
    pub async fn dismiss(&mut self, report_id: &ReportId) -> crate::Result<()> {
        self.set_report_status(report_id, ReportStatus::Dismissed).await
    }

    /// Reports on the current page
    pub fn items(&self) -> &[Report] {
        self.list.items()
    }

    /// List controller, for query and loading state
    pub const fn list(&self) -> &ListController<ReportFilters, Report> {
        &self.list
    }

    /// Summary cards for the current page
    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_items(self.list.items())
    }

    /// Render the page as text
    pub fn render(&self) -> String {
        let s = self.summary();
        let mut out = String::from("Moderation\n");
        let _ = writeln!(
            out,
            "Pending: {}  Reviewed: {}  Resolved: {}  Dismissed: {}\n",
            s.pending, s.reviewed, s.resolved, s.dismissed
        );

        let rows: Vec<Vec<String>> = self
            .list
            .items()
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.reported_user_id.clone(),
                    r.reporter_id.clone(),
                    r.reason.clone(),
                    r.status.to_string(),
                    format_timestamp(r.created_at),
                    r.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        out.push_str(&render_table(
            &[
                "ID",
                "Reported",
                "Reporter",
                "Reason",
                "Status",
                "Created",
                "Details",
            ],
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

impl std::fmt::Debug for ModerationPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationPage")
            .field("service", &self.service.name())
            .field("list", &self.list)
            .finish()
    }
}
