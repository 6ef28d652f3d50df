// Configuration modules
pub mod settings;

pub use settings::{ProviderKind, Settings};
