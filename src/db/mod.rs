pub mod auth;
pub mod campaigns;
pub mod collections;
pub mod connection;
pub mod leads;
