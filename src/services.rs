// src/services.rs

pub mod audit_service;
pub mod collector_service;
pub mod consolidated_service;
pub mod pdf_layout;
pub mod pdf_service;
pub mod report_tables;
pub mod spreadsheet_service;

pub use audit_service::AuditService;
pub use collector_service::CollectorService;
pub use consolidated_service::ConsolidatedService;
pub use pdf_service::PdfService;
pub use spreadsheet_service::SpreadsheetService;
