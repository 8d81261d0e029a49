//! API layer - REST endpoints and the native in-process client

pub mod native;
pub mod rest;
