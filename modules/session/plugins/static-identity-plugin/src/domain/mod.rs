pub mod client;
pub mod service;

pub use client::StaticIdentityClient;
pub use service::Service;
