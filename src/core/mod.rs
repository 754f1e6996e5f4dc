pub mod client;
pub mod voices;
