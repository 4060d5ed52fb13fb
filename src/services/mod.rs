pub mod artwork_service;
pub mod auth_service;
pub mod storage;
