//! Document viewer paging and the document upload workflow.

use log::{debug, error, info};

use crate::error::DashboardError;
use crate::models::{
    DashboardState, DocumentSwitch, DocumentType, DocumentView, NewKycDocument, SelectOption,
    UploadRefresh,
};
use crate::services::dashboard::{get_all_kyc, KycFilter};
use crate::services::{AlertKind, DashboardHost, KycDataSource};

pub const UPLOAD_MODAL: &str = "mdl_uploadFile";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "KYC Entry Created";
pub const UPLOAD_FAILURE_MESSAGE: &str = "Error creating KYC";

/// Loads the documents of `kyc_id` into the viewer and makes it the active record.
pub async fn set_kyc_document(
    state: &mut DashboardState,
    source: &dyn KycDataSource,
    kyc_id: &str,
) -> Result<(), DashboardError> {
    let documents = source.fetch_documents(kyc_id).await?;
    let views = documents.iter().map(DocumentView::from).collect();
    state.store_documents(kyc_id, views);
    debug!("Stored {} documents for KYC {}", documents.len(), kyc_id);
    Ok(())
}

/// Pages the viewer through the active record's documents, stopping at both ends.
///
/// The active record's documents are reloaded first so the index is bounded
/// by the same set the viewer displays.
pub async fn handle_document_switch(
    state: &mut DashboardState,
    source: &dyn KycDataSource,
    action: DocumentSwitch,
) -> Result<bool, DashboardError> {
    if let Some(kyc_id) = state.active_record().map(str::to_string) {
        set_kyc_document(state, source, &kyc_id).await?;
    }
    let total = state.documents().len();

    let moved = state.switch_document(action, total);
    debug!("Document switch {:?}: index {} of {}", action, state.doc_index(), total);
    Ok(moved)
}

/// Catalogue types not yet uploaded, in catalogue order. Matching is case-sensitive.
pub fn missing_document_options(uploaded: &[&str]) -> Vec<SelectOption> {
    DocumentType::CATALOGUE
        .iter()
        .map(DocumentType::label)
        .filter(|label| !uploaded.contains(label))
        .map(SelectOption::same)
        .collect()
}

pub async fn return_user_document_type_options(
    source: &dyn KycDataSource,
    kyc_id: &str,
) -> Result<Vec<SelectOption>, DashboardError> {
    let documents = source.fetch_documents(kyc_id).await?;
    let uploaded: Vec<&str> = documents.iter().map(|d| d.document_type.as_str()).collect();
    Ok(missing_document_options(&uploaded))
}

/// Creates a document and refreshes everything that depends on it.
///
/// Any failure stops the chain, is logged, and is reported through an
/// error alert; the upload modal stays open in that case.
pub async fn add_kyc_document(
    state: &mut DashboardState,
    source: &dyn KycDataSource,
    host: &mut dyn DashboardHost,
    kyc_id: &str,
    filter: &KycFilter,
    document: NewKycDocument,
) -> Option<UploadRefresh> {
    match submit_and_refresh(state, source, kyc_id, filter, document).await {
        Ok(refresh) => {
            host.close_modal(UPLOAD_MODAL);
            host.show_alert(UPLOAD_SUCCESS_MESSAGE, AlertKind::Success);
            info!("KYC document added to {}", kyc_id);
            Some(refresh)
        }
        Err(e) => {
            error!("Failed to add KYC document to {}: {}", kyc_id, e);
            host.show_alert(UPLOAD_FAILURE_MESSAGE, AlertKind::Error);
            None
        }
    }
}

async fn submit_and_refresh(
    state: &mut DashboardState,
    source: &dyn KycDataSource,
    kyc_id: &str,
    filter: &KycFilter,
    document: NewKycDocument,
) -> Result<UploadRefresh, DashboardError> {
    source.create_document(kyc_id, document).await?;

    let rows = get_all_kyc(source, filter).await?;
    set_kyc_document(state, source, kyc_id).await?;
    // Must run after the viewer refresh so the new upload is excluded
    let document_options = return_user_document_type_options(source, kyc_id).await?;

    Ok(UploadRefresh {
        rows,
        document_options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KycStatus;
    use crate::services::testing::{record, InMemorySource};
    use crate::services::HostEffects;

    fn labels(options: &[SelectOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    fn upload(document_type: &str) -> NewKycDocument {
        NewKycDocument {
            document_type: document_type.to_string(),
            file_ref: "scan.pdf".to_string(),
        }
    }

    #[test]
    fn missing_options_exclude_uploaded_types() {
        let options = missing_document_options(&["Passport"]);
        assert_eq!(labels(&options), ["Driver's license", "Utility bill", "Phone bill"]);
        assert!(options.iter().all(|o| o.label == o.value));
    }

    #[test]
    fn missing_options_match_case_sensitively() {
        let options = missing_document_options(&["passport", "Phone bill"]);
        assert_eq!(labels(&options), ["Passport", "Driver's license", "Utility bill"]);
        assert_eq!(missing_document_options(&[]).len(), 4);
    }

    #[rocket::async_test]
    async fn document_switch_saturates_on_the_active_record() {
        let ada = record("Ada", KycStatus::Pending, "2024-01-15 09:00:00");
        let kyc_id = ada.id.to_hex();
        let source = InMemorySource::with_records(vec![ada]);
        source.add_document(&kyc_id, "Passport");
        source.add_document(&kyc_id, "Utility bill");

        let mut state = DashboardState::default();
        assert!(!handle_document_switch(&mut state, &source, DocumentSwitch::Increase).await.unwrap());

        set_kyc_document(&mut state, &source, &kyc_id).await.unwrap();
        assert_eq!(state.documents().len(), 2);

        assert!(!handle_document_switch(&mut state, &source, DocumentSwitch::Decrease).await.unwrap());
        assert!(handle_document_switch(&mut state, &source, DocumentSwitch::Increase).await.unwrap());
        assert!(!handle_document_switch(&mut state, &source, DocumentSwitch::Increase).await.unwrap());
        assert_eq!(state.doc_index(), 1);
    }

    #[rocket::async_test]
    async fn document_switch_follows_documents_added_after_loading() {
        let ada = record("Ada", KycStatus::Pending, "2024-01-15 09:00:00");
        let kyc_id = ada.id.to_hex();
        let source = InMemorySource::with_records(vec![ada]);
        source.add_document(&kyc_id, "Passport");

        let mut state = DashboardState::default();
        set_kyc_document(&mut state, &source, &kyc_id).await.unwrap();
        assert_eq!(state.documents().len(), 1);

        source.add_document(&kyc_id, "Utility bill");
        source.add_document(&kyc_id, "Phone bill");

        for _ in 0..3 {
            handle_document_switch(&mut state, &source, DocumentSwitch::Increase).await.unwrap();
            assert!(state.doc_index() < state.documents().len());
        }
        assert_eq!(state.documents().len(), 3);
        assert_eq!(state.doc_index(), 2);
    }

    #[rocket::async_test]
    async fn document_switch_clamps_after_documents_are_removed() {
        let ada = record("Ada", KycStatus::Pending, "2024-01-15 09:00:00");
        let kyc_id = ada.id.to_hex();
        let source = InMemorySource::with_records(vec![ada]);
        source.add_document(&kyc_id, "Passport");
        source.add_document(&kyc_id, "Utility bill");
        source.add_document(&kyc_id, "Phone bill");

        let mut state = DashboardState::default();
        set_kyc_document(&mut state, &source, &kyc_id).await.unwrap();
        handle_document_switch(&mut state, &source, DocumentSwitch::Increase).await.unwrap();
        handle_document_switch(&mut state, &source, DocumentSwitch::Increase).await.unwrap();
        assert_eq!(state.doc_index(), 2);

        source.documents.lock().unwrap().truncate(1);

        assert!(!handle_document_switch(&mut state, &source, DocumentSwitch::Increase).await.unwrap());
        assert_eq!(state.documents().len(), 1);
        assert_eq!(state.doc_index(), 0);
    }

    #[rocket::async_test]
    async fn successful_upload_refreshes_and_closes_the_modal() {
        let ada = record("Ada", KycStatus::Pending, "2024-01-15 09:00:00");
        let kyc_id = ada.id.to_hex();
        let source = InMemorySource::with_records(vec![ada]);
        source.add_document(&kyc_id, "Passport");

        let mut state = DashboardState::default();
        let mut host = HostEffects::default();

        let refresh = add_kyc_document(
            &mut state,
            &source,
            &mut host,
            &kyc_id,
            &KycFilter::default(),
            upload("Utility bill"),
        )
        .await
        .unwrap();

        assert_eq!(refresh.rows.len(), 1);
        assert_eq!(labels(&refresh.document_options), ["Driver's license", "Phone bill"]);
        assert_eq!(state.active_record(), Some(kyc_id.as_str()));
        assert_eq!(state.documents().len(), 2);
        assert_eq!(host.closed_modals, [UPLOAD_MODAL]);
        assert_eq!(host.alerts.len(), 1);
        assert_eq!(host.alerts[0].message, UPLOAD_SUCCESS_MESSAGE);
        assert_eq!(host.alerts[0].kind, AlertKind::Success);
    }

    #[rocket::async_test]
    async fn failed_mutation_alerts_without_side_effects() {
        let ada = record("Ada", KycStatus::Pending, "2024-01-15 09:00:00");
        let kyc_id = ada.id.to_hex();
        let source = InMemorySource {
            records: vec![ada],
            fail_create: true,
            ..Default::default()
        };

        let mut state = DashboardState::default();
        let mut host = HostEffects::default();

        let refresh = add_kyc_document(
            &mut state,
            &source,
            &mut host,
            &kyc_id,
            &KycFilter::default(),
            upload("Passport"),
        )
        .await;

        assert!(refresh.is_none());
        assert!(host.closed_modals.is_empty());
        assert_eq!(host.alerts.len(), 1);
        assert_eq!(host.alerts[0].message, UPLOAD_FAILURE_MESSAGE);
        assert_eq!(host.alerts[0].kind, AlertKind::Error);
        assert_eq!(state.active_record(), None);
    }

    #[rocket::async_test]
    async fn failure_later_in_the_chain_is_also_caught() {
        let ada = record("Ada", KycStatus::Pending, "2024-01-15 09:00:00");
        let kyc_id = ada.id.to_hex();
        let source = InMemorySource {
            records: vec![ada],
            fail_records: true,
            ..Default::default()
        };

        let mut state = DashboardState::default();
        let mut host = HostEffects::default();

        let refresh = add_kyc_document(
            &mut state,
            &source,
            &mut host,
            &kyc_id,
            &KycFilter::default(),
            upload("Passport"),
        )
        .await;

        assert!(refresh.is_none());
        assert_eq!(host.alerts[0].kind, AlertKind::Error);
        assert!(host.closed_modals.is_empty());
    }
}
