pub mod document;
pub mod message;
pub mod query;
pub mod session;
pub mod status;
pub mod taxpayer;
