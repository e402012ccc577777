pub mod kyc;
pub mod document;
pub mod chart;
pub mod dashboard;

pub use kyc::*;
pub use document::*;
pub use chart::*;
pub use dashboard::*;
