//! In-memory data source and record builders shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::error::DashboardError;
use crate::models::{DailyRegistration, KycDocument, KycRecord, KycStatus, NewKycDocument};
use crate::services::KycDataSource;

/// `"2024-01-15 10:30:00"` as a stored timestamp.
pub fn at(timestamp: &str) -> BsonDateTime {
    let parsed = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap();
    BsonDateTime::from_millis(parsed.and_utc().timestamp_millis())
}

pub fn record(first_name: &str, status: KycStatus, created: &str) -> KycRecord {
    KycRecord {
        id: ObjectId::new(),
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        date_of_birth: "1990-04-12".to_string(),
        address: "12 Harbour Street".to_string(),
        phone: "+15550100".to_string(),
        status,
        reason: None,
        comment: Some("checked".to_string()),
        created: at(created),
    }
}

pub fn day(y: i32, m: u32, d: u32, count: u64) -> DailyRegistration {
    DailyRegistration {
        day: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        count,
    }
}

#[derive(Default)]
pub struct InMemorySource {
    pub records: Vec<KycRecord>,
    pub documents: Mutex<Vec<KycDocument>>,
    pub fail_create: bool,
    pub fail_records: bool,
}

impl InMemorySource {
    pub fn with_records(records: Vec<KycRecord>) -> Self {
        InMemorySource {
            records,
            ..Default::default()
        }
    }

    pub fn add_document(&self, kyc_id: &str, document_type: &str) {
        self.documents.lock().unwrap().push(KycDocument {
            id: Some(ObjectId::new()),
            kyc_id: ObjectId::parse_str(kyc_id).unwrap(),
            document_type: document_type.to_string(),
            file_ref: format!("{}.pdf", document_type.to_lowercase().replace(' ', "_")),
            created_at: BsonDateTime::now(),
        });
    }
}

#[rocket::async_trait]
impl KycDataSource for InMemorySource {
    async fn fetch_all_records(&self) -> Result<Vec<KycRecord>, DashboardError> {
        if self.fail_records {
            return Err(DashboardError::DataSource("records unavailable".to_string()));
        }
        Ok(self.records.clone())
    }

    async fn fetch_documents(&self, kyc_id: &str) -> Result<Vec<KycDocument>, DashboardError> {
        let kyc_id = crate::services::data_source::parse_object_id(kyc_id)?;
        Ok(self.documents.lock().unwrap()
            .iter()
            .filter(|d| d.kyc_id == kyc_id)
            .cloned()
            .collect())
    }

    async fn create_document(
        &self,
        kyc_id: &str,
        document: NewKycDocument,
    ) -> Result<KycDocument, DashboardError> {
        if self.fail_create {
            return Err(DashboardError::DataSource("insert rejected".to_string()));
        }
        let created = KycDocument {
            id: Some(ObjectId::new()),
            kyc_id: crate::services::data_source::parse_object_id(kyc_id)?,
            document_type: document.document_type,
            file_ref: document.file_ref,
            created_at: BsonDateTime::now(),
        };
        self.documents.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn fetch_daily_registrations(
        &self,
        status: Option<KycStatus>,
    ) -> Result<Vec<DailyRegistration>, DashboardError> {
        if self.fail_records {
            return Err(DashboardError::DataSource("records unavailable".to_string()));
        }

        let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for record in self.records.iter().filter(|r| status.is_none_or(|s| r.status == s)) {
            *per_day.entry(record.created_at()?.date_naive()).or_insert(0) += 1;
        }

        Ok(per_day
            .into_iter()
            .map(|(day, count)| DailyRegistration { day, count })
            .collect())
    }
}
