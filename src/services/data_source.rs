use chrono::NaiveDate;
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime as BsonDateTime, Document};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use rocket::futures::TryStreamExt;

use crate::error::DashboardError;
use crate::models::{DailyRegistration, KycDocument, KycRecord, KycStatus, NewKycDocument};

/// Read/write access to KYC data used by the dashboard handlers.
#[rocket::async_trait]
pub trait KycDataSource: Send + Sync {
    async fn fetch_all_records(&self) -> Result<Vec<KycRecord>, DashboardError>;

    /// Documents attached to one record, oldest first.
    async fn fetch_documents(&self, kyc_id: &str) -> Result<Vec<KycDocument>, DashboardError>;

    async fn create_document(
        &self,
        kyc_id: &str,
        document: NewKycDocument,
    ) -> Result<KycDocument, DashboardError>;

    /// Registrations per calendar day in ascending order, optionally for one status.
    async fn fetch_daily_registrations(
        &self,
        status: Option<KycStatus>,
    ) -> Result<Vec<DailyRegistration>, DashboardError>;
}

pub type DynKycSource = Box<dyn KycDataSource>;

pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, DashboardError> {
    ObjectId::parse_str(id).map_err(|_| DashboardError::InvalidId(id.to_string()))
}

pub struct MongoKycSource {
    db: Database,
    kyc_collection: String,
    document_collection: String,
}

impl MongoKycSource {
    pub fn new(db: Database) -> Self {
        MongoKycSource {
            db,
            kyc_collection: crate::config::Config::kyc_collection(),
            document_collection: crate::config::Config::document_collection(),
        }
    }

    fn records(&self) -> Collection<KycRecord> {
        self.db.collection::<KycRecord>(&self.kyc_collection)
    }

    fn documents(&self) -> Collection<KycDocument> {
        self.db.collection::<KycDocument>(&self.document_collection)
    }
}

#[rocket::async_trait]
impl KycDataSource for MongoKycSource {
    async fn fetch_all_records(&self) -> Result<Vec<KycRecord>, DashboardError> {
        let records: Vec<KycRecord> = self.records()
            .find(None, None)
            .await?
            .try_collect()
            .await?;

        Ok(records)
    }

    async fn fetch_documents(&self, kyc_id: &str) -> Result<Vec<KycDocument>, DashboardError> {
        let kyc_id = parse_object_id(kyc_id)?;

        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .build();

        let documents: Vec<KycDocument> = self.documents()
            .find(doc! { "kyc_id": kyc_id }, find_options)
            .await?
            .try_collect()
            .await?;

        Ok(documents)
    }

    async fn create_document(
        &self,
        kyc_id: &str,
        document: NewKycDocument,
    ) -> Result<KycDocument, DashboardError> {
        let kyc_id = parse_object_id(kyc_id)?;

        let document = KycDocument {
            id: None,
            kyc_id,
            document_type: document.document_type,
            file_ref: document.file_ref,
            created_at: BsonDateTime::now(),
        };

        let result = self.documents()
            .insert_one(&document, None)
            .await?;

        Ok(KycDocument {
            id: result.inserted_id.as_object_id(),
            ..document
        })
    }

    async fn fetch_daily_registrations(
        &self,
        status: Option<KycStatus>,
    ) -> Result<Vec<DailyRegistration>, DashboardError> {
        let mut pipeline = Vec::new();
        if let Some(status) = status {
            pipeline.push(doc! { "$match": { "status": status.as_str() } });
        }
        pipeline.push(doc! {
            "$group": {
                "_id": { "$dateToString": { "format": "%Y-%m-%d", "date": "$created" } },
                "count": { "$sum": 1 },
            }
        });
        pipeline.push(doc! { "$sort": { "_id": 1 } });

        let rows: Vec<Document> = self.records()
            .aggregate(pipeline, None)
            .await?
            .try_collect()
            .await?;

        rows.iter().map(daily_registration_from_row).collect()
    }
}

/// Decodes one `{_id: "YYYY-MM-DD", count}` row of the registration aggregation.
fn daily_registration_from_row(row: &Document) -> Result<DailyRegistration, DashboardError> {
    let day = row.get_str("_id")
        .map_err(|e| DashboardError::DataSource(format!("Aggregation row without day: {}", e)))?;
    let day = NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| DashboardError::InvalidDate(day.to_string()))?;

    let count = match row.get("count") {
        Some(Bson::Int32(n)) => i64::from(*n),
        Some(Bson::Int64(n)) => *n,
        _ => return Err(DashboardError::DataSource("Aggregation row without count".to_string())),
    };

    Ok(DailyRegistration {
        day,
        count: count.max(0) as u64,
    })
}
