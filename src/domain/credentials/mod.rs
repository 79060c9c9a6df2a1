//! Provider selection and session credentials

mod credential;
mod provider_kind;

pub use credential::ProviderCredentials;
pub use provider_kind::ProviderKind;
