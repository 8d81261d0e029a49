//! Infrastructure layer - database storage

pub mod storage;
