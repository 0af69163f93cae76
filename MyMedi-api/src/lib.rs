// MyMedi-api lib.rs
//
// HTTP surface of MyMedi: JSON handlers, server-rendered pages and the
// OpenAPI documentation.

// Public modules
pub mod api;
pub mod entities;
pub mod openapi;
