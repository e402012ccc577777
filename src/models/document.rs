use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

/// The fixed catalogue of supporting documents a user may upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Passport,
    DriversLicense,
    UtilityBill,
    PhoneBill,
}

impl DocumentType {
    pub const CATALOGUE: [DocumentType; 4] = [
        DocumentType::Passport,
        DocumentType::DriversLicense,
        DocumentType::UtilityBill,
        DocumentType::PhoneBill,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Passport => "Passport",
            DocumentType::DriversLicense => "Driver's license",
            DocumentType::UtilityBill => "Utility bill",
            DocumentType::PhoneBill => "Phone bill",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::CATALOGUE.into_iter().find(|t| t.label() == label)
    }
}

/// A supporting document stored in the `kyc_documents` collection.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KycDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub kyc_id: ObjectId,
    // Catalogue label, kept as a plain string so legacy rows still load
    pub document_type: String,
    pub file_ref: String,
    pub created_at: BsonDateTime,
}

#[derive(Debug, Deserialize, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewKycDocument {
    pub document_type: String,
    pub file_ref: String,
}

/// Display shape of a document held in the dashboard state.
#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: Option<String>,
    pub document_type: String,
    pub file_ref: String,
    pub uploaded_at: Option<String>,
}

impl From<&KycDocument> for DocumentView {
    fn from(document: &KycDocument) -> Self {
        DocumentView {
            id: document.id.map(|id| id.to_hex()),
            document_type: document.document_type.clone(),
            file_ref: document.file_ref.clone(),
            uploaded_at: document.created_at.try_to_rfc3339_string().ok(),
        }
    }
}

/// `{label, value}` pair consumed by select widgets.
#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn same(value: &str) -> Self {
        SelectOption {
            label: value.to_string(),
            value: value.to_string(),
        }
    }
}

/// Data refreshed after a successful upload.
#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRefresh {
    pub rows: Vec<super::KycRow>,
    pub document_options: Vec<SelectOption>,
}
