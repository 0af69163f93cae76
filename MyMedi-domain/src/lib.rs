// MyMedi Domain
// This crate contains the business logic for the MyMedi health companion

// Outbound AI and maps clients
pub mod clients;

// Environment configuration
pub mod config;

// Domain entities
pub mod entities;

// Service error type
pub mod error;

// Health checks and system status
pub mod health;

// Static rule tables used by the analysis services
pub mod rules;

// Services that implement business logic
pub mod services;

// Re-export the database module from my_medi_data for convenience
pub use my_medi_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
