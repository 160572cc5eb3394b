//! Address Book projection and vCard 3.0 rendering for IPD backups.

pub mod contact;
pub mod export;
pub mod vcard;

pub use contact::project;
pub use export::{contacts, export_vcards, ExportOptions};
pub use vcard::render;
