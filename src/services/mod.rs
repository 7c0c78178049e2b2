pub mod bonus;
pub mod comment_service;
pub mod ingest;
pub mod insights;
pub mod kpis;
pub mod upload_engine;
pub mod waterfall;
