//! Matches page

use super::{format_timestamp, pagination_line, render_table};
use crate::query::{ListController, ListQuery};
use matchdesk_core::types::{Match, MatchFilters, MatchId, MatchStatus, Page};
use matchdesk_services::{AdminService, ServiceResult};
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

/// Fetch one page of matches for `query`
pub async fn fetch_matches(
    service: &dyn AdminService,
    query: &ListQuery<MatchFilters>,
) -> ServiceResult<Page<Match>> {
    service
        .get_matches(query.page, query.page_size, &query.filters)
        .await
}

/// Summary cards, computed from the visible page only
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    /// Matches on this page
    pub on_page: usize,
    /// Active matches on this page
    pub active: usize,
    /// Mean compatibility of scored matches on this page
    pub average_compatibility: Option<f64>,
}

impl MatchSummary {
    /// Summarize a page of matches
    #[allow(clippy::cast_precision_loss)]
    pub fn from_items(items: &[Match]) -> Self {
        let scores: Vec<f64> = items.iter().filter_map(|m| m.compatibility_score).collect();
        let average_compatibility = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        Self {
            on_page: items.len(),
            active: items
                .iter()
                .filter(|m| m.status == MatchStatus::Active)
                .count(),
            average_compatibility,
        }
    }
}

/// Matches list with status filter and name search
pub struct MatchesPage {
    service: Arc<dyn AdminService>,
    list: ListController<MatchFilters, Match>,
}

impl MatchesPage {
    /// Create the page; nothing is fetched until [`Self::load`]
    pub fn new(service: Arc<dyn AdminService>, page_size: u32) -> Self {
        Self {
            service,
            list: ListController::new("matches", page_size),
        }
    }

    /// Fetch the current page
    pub async fn load(&mut self) -> bool {
        let service = Arc::clone(&self.service);
        self.list
            .refresh(|query| async move { fetch_matches(service.as_ref(), &query).await })
            .await
    }

    /// Filter by status and refetch from page 1
    pub async fn set_status(&mut self, status: Option<MatchStatus>) -> bool {
        let filters = MatchFilters {
            status,
            ..self.list.query().filters.clone()
        };
        self.list.set_filters(filters);
        self.load().await
    }

    /// Search by user name and refetch from page 1
    pub async fn set_search(&mut self, search: Option<String>) -> bool {
        let filters = MatchFilters {
            search: search.filter(|s| !s.trim().is_empty()),
            ..self.list.query().filters.clone()
        };
        self.list.set_filters(filters);
        self.load().await
    }

    /// Replace filters and page in one step, then fetch once
    pub async fn load_with(&mut self, filters: MatchFilters, page: u32) -> bool {
        self.list.set_filters(filters);
        self.list.set_page(page);
        self.load().await
    }

    /// Move to `page` and refetch
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        self.list.set_page(page);
        self.load().await
    }

    /// End a match, then refetch the current page
    pub async fn end_match(&mut self, match_id: &MatchId) -> crate::Result<()> {
        self.service.end_match(match_id).await?;
        info!(match_id = %match_id, "Ended match");
        self.load().await;
        Ok(())
    }

    /// Matches on the current page
    pub fn items(&self) -> &[Match] {
        self.list.items()
    }

    /// List controller, for query and loading state
    pub const fn list(&self) -> &ListController<MatchFilters, Match> {
        &self.list
    }

    /// Summary cards for the current page
    pub fn summary(&self) -> MatchSummary {
        MatchSummary::from_items(self.list.items())
    }

    /// Render the page as text
    pub fn render(&self) -> String {
        let summary = self.summary();
        let mut out = String::from("Matches\n");
        let _ = writeln!(
            out,
            "Active on page: {}  Average compatibility: {}\n",
            summary.active,
            summary
                .average_compatibility
                .map_or_else(|| "-".to_string(), |avg| format!("{avg:.1}%"))
        );

        let rows: Vec<Vec<String>> = self
            .list
            .items()
            .iter()
            .map(|m| {
                vec![
                    m.id.clone(),
                    format!("{} & {}", m.user1_name, m.user2_name),
                    m.status.to_string(),
                    m.compatibility_score
                        .map_or_else(|| "-".to_string(), |s| format!("{s:.0}%")),
                    format_timestamp(m.matched_at),
                ]
            })
            .collect();
        out.push_str(&render_table(
            &["ID", "Users", "Status", "Score", "Matched"],
            &rows,
        ));

        let state = self.list.state();
        let _ = writeln!(
            out,
            "{}",
            pagination_line(self.list.query().page, self.list.total_pages(), state.total)
        );
        out
    }
}

impl std::fmt::Debug for MatchesPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchesPage")
            .field("service", &self.service.name())
            .field("list", &self.list)
            .finish()
    }
}
