use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum KycStatus {
    Pending,
    Verified,
    Blacklisted,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Pending => "PENDING",
            KycStatus::Verified => "VERIFIED",
            KycStatus::Blacklisted => "BLACKLISTED",
            KycStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KycStatus {
    type Err = ();

    /// Exact, case-sensitive match on the stored status names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(KycStatus::Pending),
            "VERIFIED" => Ok(KycStatus::Verified),
            "BLACKLISTED" => Ok(KycStatus::Blacklisted),
            "REJECTED" => Ok(KycStatus::Rejected),
            _ => Err(()),
        }
    }
}

/// A KYC submission as stored in the `kycs` collection. Read-only here.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KycRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: String,
    pub address: String,
    pub phone: String,
    pub status: KycStatus,
    pub reason: Option<String>,
    pub comment: Option<String>,
    pub created: BsonDateTime,
}

impl KycRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn created_at(&self) -> Result<DateTime<Utc>, DashboardError> {
        let millis = self.created.timestamp_millis();
        DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            DashboardError::InvalidTimestamp {
                record_id: self.id.to_hex(),
                millis,
            }
        })
    }
}

/// One line of the record table.
#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct KycRow {
    pub id: String,
    pub full_name: String,
    pub created: String,
    pub status: KycStatus,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "DOB")]
    pub dob: String,
    pub address: String,
    pub phone: String,
    pub reason: Option<String>,
    pub comment: Option<String>,
}

impl KycRow {
    pub fn from_record(record: &KycRecord) -> Result<Self, DashboardError> {
        let created = record.created_at()?;

        Ok(KycRow {
            id: record.id.to_hex(),
            full_name: record.full_name(),
            // e.g. "Mon Jan 15 2024"
            created: created.format("%a %b %d %Y").to_string(),
            status: record.status,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            dob: record.date_of_birth.clone(),
            address: record.address.clone(),
            phone: record.phone.clone(),
            reason: record.reason.clone(),
            comment: record.comment.clone(),
        })
    }
}
