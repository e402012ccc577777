use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

use super::{ChartSwitch, DocumentView};

/// Process-wide dashboard state; requests take the lock for their whole handler.
pub type SharedState = tokio::sync::Mutex<DashboardState>;

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub all_user_count: usize,
    pub pending_count: usize,
    pub verified_count: usize,
    pub blacklisted_count: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentSwitch {
    Increase,
    Decrease,
}

/// UI state shared by the dashboard widgets for the lifetime of the process.
///
/// `doc_index` stays within the loaded document set and `chart_index`
/// within `0..=1`; every mutation below saturates instead of wrapping.
#[derive(Debug, Serialize, Clone, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    doc_index: usize,
    selected_status: String,
    chart_index: u8,
    active_record: Option<String>,
    kyc_documents: Vec<DocumentView>,
}

impl DashboardState {
    pub const MAX_CHART_INDEX: u8 = 1;

    pub fn initialize(&mut self) {
        self.doc_index = 0;
        self.selected_status.clear();
    }

    pub fn doc_index(&self) -> usize {
        self.doc_index
    }

    pub fn selected_status(&self) -> &str {
        &self.selected_status
    }

    pub fn set_selected_status(&mut self, status: impl Into<String>) {
        self.selected_status = status.into();
    }

    pub fn chart_index(&self) -> u8 {
        self.chart_index
    }

    pub fn active_record(&self) -> Option<&str> {
        self.active_record.as_deref()
    }

    pub fn documents(&self) -> &[DocumentView] {
        &self.kyc_documents
    }

    /// Replaces the stored documents. Switching to another record restarts
    /// the viewer at the first document; a shorter reload clamps the index.
    pub fn store_documents(&mut self, kyc_id: &str, documents: Vec<DocumentView>) {
        if self.active_record.as_deref() != Some(kyc_id) {
            self.active_record = Some(kyc_id.to_string());
            self.doc_index = 0;
        } else if self.doc_index >= documents.len() {
            self.doc_index = documents.len().saturating_sub(1);
        }
        self.kyc_documents = documents;
    }

    /// Moves the viewer one document. Returns whether the index changed.
    pub fn switch_document(&mut self, action: DocumentSwitch, total: usize) -> bool {
        match action {
            DocumentSwitch::Increase => {
                if total == 0 || self.doc_index >= total - 1 {
                    return false;
                }
                self.doc_index += 1;
            }
            DocumentSwitch::Decrease => {
                if self.doc_index == 0 {
                    return false;
                }
                self.doc_index -= 1;
            }
        }
        true
    }

    /// Moves the chart carousel. Returns whether the index changed.
    pub fn switch_chart(&mut self, action: ChartSwitch) -> bool {
        match action {
            ChartSwitch::Right => {
                if self.chart_index >= Self::MAX_CHART_INDEX {
                    return false;
                }
                self.chart_index += 1;
            }
            ChartSwitch::Left => {
                if self.chart_index == 0 {
                    return false;
                }
                self.chart_index -= 1;
            }
        }
        true
    }
}
