//! Cache provider implementations

pub mod upstash;

pub use upstash::UpstashRestCache;
