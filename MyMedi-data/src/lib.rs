// MyMedi Data
// Persistence for feedback, accuracy tracking and the specialist review queue

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
