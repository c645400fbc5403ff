pub mod helpers;
mod secret;

pub use helpers::mask_secret;
pub use secret::Secret;
