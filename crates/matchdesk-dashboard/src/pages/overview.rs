//! Overview page: headline stats, activity feed, top locations and analytics
//!
//! The four sections are fetched concurrently. A failed section is logged and
//! shown empty; the others still render.

use super::{format_timestamp, render_table};
use matchdesk_core::config::DashboardConfig;
use matchdesk_core::types::{ActivityItem, ActivityKind, Analytics, DashboardStats, LocationStat};
use matchdesk_services::{AdminService, ServiceResult};
use std::fmt::Write;
use std::sync::Arc;
use tracing::error;

/// Locations listed in the top locations section
const TOP_LOCATIONS: u32 = 5;

/// Dashboard landing page
pub struct OverviewPage {
    service: Arc<dyn AdminService>,
    activity_limit: u32,
    analytics_days: u32,
    stats: DashboardStats,
    activity: Vec<ActivityItem>,
    locations: Vec<LocationStat>,
    analytics: Analytics,
    failed_sections: Vec<&'static str>,
}

fn settle<T: Default>(
    section: &'static str,
    result: ServiceResult<T>,
    failed: &mut Vec<&'static str>,
) -> T {
    result.unwrap_or_else(|e| {
        error!(section, error = %e, "Failed to load overview section");
        failed.push(section);
        T::default()
    })
}

impl OverviewPage {
    /// Create the page; nothing is fetched until [`Self::load`]
    pub fn new(service: Arc<dyn AdminService>, config: &DashboardConfig) -> Self {
        Self {
            service,
            activity_limit: config.activity_limit,
            analytics_days: config.analytics_days,
            stats: DashboardStats::default(),
            activity: Vec::new(),
            locations: Vec::new(),
            analytics: Analytics::default(),
            failed_sections: Vec::new(),
        }
    }

    /// Fetch every section concurrently
    ///
    /// Returns `true` when all sections loaded.
    pub async fn load(&mut self) -> bool {
        let service = self.service.as_ref();
        let (stats, activity, locations, analytics) = tokio::join!(
            service.get_dashboard_stats(),
            service.get_recent_activity(self.activity_limit),
            service.get_top_locations(TOP_LOCATIONS),
            service.get_analytics(self.analytics_days),
        );

        let mut failed = Vec::new();
        self.stats = settle("stats", stats, &mut failed);
        self.activity = settle("activity", activity, &mut failed);
        self.locations = settle("locations", locations, &mut failed);
        self.analytics = settle("analytics", analytics, &mut failed);
        self.failed_sections = failed;
        self.failed_sections.is_empty()
    }

    /// Headline numbers
    pub const fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Recent activity, newest first
    pub fn activity(&self) -> &[ActivityItem] {
        &self.activity
    }

    /// Top locations by user count
    pub fn locations(&self) -> &[LocationStat] {
        &self.locations
    }

    /// Daily series
    pub const fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    /// Sections that failed on the last load
    pub fn failed_sections(&self) -> &[&'static str] {
        &self.failed_sections
    }

    /// Render the page as text
    pub fn render(&self) -> String {
        let s = &self.stats;
        let mut out = String::from("Overview\n");
        let _ = writeln!(
            out,
            "Users: {}  Active: {}  Matches: {}  New today: {}",
            s.total_users, s.active_users, s.total_matches, s.new_signups_today
        );
        let _ = writeln!(
            out,
            "Pending reports: {}  Pending photos: {}\n",
            s.pending_reports, s.pending_photos
        );

        out.push_str("Recent activity\n");
        if self.activity.is_empty() {
            out.push_str("  No recent activity\n");
        }
        for item in &self.activity {
            let _ = writeln!(
                out,
                "  {}  {:<12}  {}",
                format_timestamp(item.timestamp),
                kind_label(item.kind),
                item.description
            );
        }

        out.push_str("\nTop locations\n");
        let rows: Vec<Vec<String>> = self
            .locations
            .iter()
            .map(|l| vec![l.location.clone(), l.user_count.to_string()])
            .collect();
        out.push_str(&render_table(&["Location", "Users"], &rows));

        let _ = writeln!(
            out,
            "\nLast {} days: {} signups, {} matches",
            self.analytics.days,
            self.analytics.total_signups(),
            self.analytics.total_matches()
        );
        out
    }
}

const fn kind_label(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Signup => "signup",
        ActivityKind::Match => "match",
        ActivityKind::Report => "report",
        ActivityKind::PhotoUpload => "photo upload",
    }
}

impl std::fmt::Debug for OverviewPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverviewPage")
            .field("service", &self.service.name())
            .field("stats", &self.stats)
            .field("activity", &self.activity.len())
            .field("locations", &self.locations.len())
            .field("failed_sections", &self.failed_sections)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use matchdesk_services::{MockAdminService, UserCsvRow};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_load_all_sections() {
        let service = Arc::new(MockAdminService::with_sample_data());
        let rows = vec![UserCsvRow {
            name: "Zoe".to_string(),
            email: "zoe@example.com".to_string(),
            ..UserCsvRow::default()
        }];
        service.bulk_upload_users(&rows).await.unwrap();

        let mut page = OverviewPage::new(service, &DashboardConfig::default());
        assert!(page.load().await);

        assert_eq!(page.stats().total_users, 8);
        assert_eq!(page.stats().total_matches, 4);
        assert_eq!(page.stats().pending_reports, 1);
        assert_eq!(page.activity().len(), 1);
        assert_eq!(page.locations().len(), 4);
        assert_eq!(page.analytics().series.len(), 30);
        assert!(page.failed_sections().is_empty());

        let text = page.render();
        assert!(text.contains("Users: 8"));
        assert!(text.contains("Zoe joined"));
    }

    #[tokio::test]
    async fn test_failures_degrade_to_empty_sections() {
        let service = Arc::new(MockAdminService::new().with_failure("down"));
        let mut page = OverviewPage::new(service, &DashboardConfig::default());

        assert!(!page.load().await);

        assert_eq!(
            page.failed_sections(),
            &["stats", "activity", "locations", "analytics"]
        );
        assert_eq!(page.stats(), &DashboardStats::default());
        assert!(page.render().contains("No recent activity"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sections_fetched_concurrently() {
        let service = Arc::new(MockAdminService::with_sample_data().with_delay(200));
        let mut page = OverviewPage::new(service.clone(), &DashboardConfig::default());

        let started = tokio::time::Instant::now();
        page.load().await;

        // Four sequential calls would take 800ms of virtual time.
        assert!(started.elapsed() < std::time::Duration::from_millis(400));
        assert_eq!(service.calls().len(), 4);
    }
}
