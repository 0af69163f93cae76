// Public entities for the MyMedi API
// Response shapes that only exist at the HTTP boundary

// Error bodies shared by the handlers
pub mod common;
