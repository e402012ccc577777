pub mod dashboard;
pub mod data_source;
pub mod documents;
pub mod host;
pub mod jwt;

#[cfg(test)]
pub mod testing;

pub use data_source::{DynKycSource, KycDataSource, MongoKycSource};
pub use host::{AlertKind, DashboardHost, HostEffects};
