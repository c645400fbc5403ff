//! Test helpers for code that depends on the platform backend traits.
mod fake_platform;

pub use fake_platform::FakePlatform;
