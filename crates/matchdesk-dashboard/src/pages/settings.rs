//! Settings page: edit and save application settings

use crate::{DashboardError, Result};
use matchdesk_core::types::AppSettings;
use matchdesk_services::AdminService;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

/// Loaded settings plus an editable draft
pub struct SettingsPage {
    service: Arc<dyn AdminService>,
    loaded: Option<AppSettings>,
    draft: AppSettings,
    error: Option<String>,
}

impl SettingsPage {
    /// Create the page; nothing is fetched until [`Self::load`]
    pub fn new(service: Arc<dyn AdminService>) -> Self {
        Self {
            service,
            loaded: None,
            draft: AppSettings::default(),
            error: None,
        }
    }

    /// Fetch current settings, discarding any unsaved edits
    pub async fn load(&mut self) -> bool {
        match self.service.get_settings().await {
            Ok(settings) => {
                self.draft = settings.clone();
                self.loaded = Some(settings);
                self.error = None;
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to load settings");
                self.loaded = None;
                self.draft = AppSettings::default();
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Settings as last loaded or saved
    pub const fn loaded(&self) -> Option<&AppSettings> {
        self.loaded.as_ref()
    }

    /// Settings being edited
    pub const fn draft(&self) -> &AppSettings {
        &self.draft
    }

    /// Change the draft
    pub fn edit(&mut self, change: impl FnOnce(&mut AppSettings)) {
        change(&mut self.draft);
    }

    /// Whether the draft differs from what was loaded
    pub fn is_dirty(&self) -> bool {
        self.loaded.as_ref() != Some(&self.draft)
    }

    /// Throw away unsaved edits
    pub fn discard(&mut self) {
        if let Some(ref loaded) = self.loaded {
            self.draft = loaded.clone();
        }
    }

    /// Last load or save error
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check the draft without saving
    pub fn validate(&self) -> Result<()> {
        self.draft.validate().map_err(|e| {
            match matchdesk_core::Error::from(e) {
                matchdesk_core::Error::Validation { message, .. } => {
                    DashboardError::validation(message)
                }
                other => DashboardError::from(other),
            }
        })
    }

    /// Validate and save the draft
    ///
    /// On success the backend's copy replaces both the loaded settings and
    /// the draft.
    pub async fn save(&mut self) -> Result<()> {
        if let Err(e) = self.validate() {
            self.error = Some(e.to_string());
            return Err(e);
        }

        match self.service.update_settings(&self.draft).await {
            Ok(saved) => {
                info!(
                    min_age = saved.min_age,
                    max_age = saved.max_age,
                    maintenance_mode = saved.maintenance_mode,
                    "Saved application settings"
                );
                self.draft = saved.clone();
                self.loaded = Some(saved);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to save settings");
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Render the draft as text
    pub fn render(&self) -> String {
        let s = &self.draft;
        let flag = |on: bool| if on { "on" } else { "off" };

        let mut out = String::from("Settings\n");
        let _ = writeln!(out, "  Age range:          {}-{}", s.min_age, s.max_age);
        let _ = writeln!(out, "  Max distance:       {} km", s.max_distance_km);
        let _ = writeln!(out, "  Daily swipe limit:  {}", s.daily_swipe_limit);
        let _ = writeln!(
            out,
            "  Photo moderation:   {}",
            flag(s.require_photo_moderation)
        );
        let _ = writeln!(out, "  Maintenance mode:   {}", flag(s.maintenance_mode));
        if self.is_dirty() {
            out.push_str("  (unsaved changes)\n");
        }
        if let Some(ref error) = self.error {
            let _ = writeln!(out, "  Error: {error}");
        }
        out
    }
}

impl std::fmt::Debug for SettingsPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsPage")
            .field("service", &self.service.name())
            .field("loaded", &self.loaded)
            .field("draft", &self.draft)
            .field("error", &self.error)
            .finish()
    }
}
