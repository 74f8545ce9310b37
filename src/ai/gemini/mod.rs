pub mod client;
pub mod generate;
pub mod models;
pub mod types;

pub use client::GeminiHttpClient;
pub use generate::GeminiTransport;
pub use models::GeminiModelLister;
