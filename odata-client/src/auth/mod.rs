//! Authentication
//!
//! The service context asks a [`TokenProvider`] for a bearer token before each
//! request. Acquiring, caching and refreshing tokens is up to the provider.

mod token;

pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
