pub mod client;
pub mod models;
pub mod scale;

pub use client::VueClient;
pub use scale::Scale;
