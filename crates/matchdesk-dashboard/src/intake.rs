//! File intake for the bulk upload dialog
//!
//! Drag-and-drop and the file picker both end up here. Only an accepted
//! spreadsheet ever replaces the held file; anything else leaves it alone.

use matchdesk_core::types::SelectedFile;
use matchdesk_core::utils::is_accepted_spreadsheet;
use tracing::{debug, warn};

/// How the operator offered a file
#[derive(Debug, Clone)]
pub enum FileGesture {
    /// One or more files dropped on the dialog; only the first is considered
    Drop(Vec<SelectedFile>),
    /// The picker closed, with a file or cancelled
    Picker(Option<SelectedFile>),
}

/// What happened to an offered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// File is now held
    Accepted {
        /// Name of the held file
        name: String,
    },
    /// File was not a spreadsheet; the held file is unchanged
    Rejected {
        /// Name of the rejected file
        name: String,
    },
    /// Picker cancelled or empty drop; nothing changed
    Ignored,
}

/// Holds at most one selected spreadsheet
#[derive(Debug, Default, Clone)]
pub struct FileIntake {
    selected: Option<SelectedFile>,
}

impl FileIntake {
    /// Create an empty intake
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// Handle a drop or picker gesture
    pub fn handle(&mut self, gesture: FileGesture) -> IntakeOutcome {
        let candidate = match gesture {
            FileGesture::Drop(files) => files.into_iter().next(),
            FileGesture::Picker(file) => file,
        };

        match candidate {
            Some(file) => self.offer(file),
            None => {
                debug!("File gesture carried no file");
                IntakeOutcome::Ignored
            }
        }
    }

    /// Offer a single file
    pub fn offer(&mut self, file: SelectedFile) -> IntakeOutcome {
        if !is_accepted_spreadsheet(file.mime_type.as_deref(), &file.name) {
            warn!(
                name = %file.name,
                mime_type = file.mime_type.as_deref().unwrap_or("unknown"),
                "Rejected file that is not a CSV or spreadsheet"
            );
            return IntakeOutcome::Rejected { name: file.name };
        }

        debug!(name = %file.name, size = file.size, "Selected upload file");
        let name = file.name.clone();
        self.selected = Some(file);
        IntakeOutcome::Accepted { name }
    }

    /// Currently held file
    pub const fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Drop the held file
    pub fn clear(&mut self) {
        self.selected = None;
    }
}
