//! Outbound clients for the hosted AI and maps providers

pub mod generation;
pub mod maps;

pub use generation::{GeneratedText, GenerationError, GenerationRequest, InlineImage, OpenAiClient, TextGenerator};
pub use maps::{GoogleMapsClient, MapsClient, MapsError, NearbySearch};
