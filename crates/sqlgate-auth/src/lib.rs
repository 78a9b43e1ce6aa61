//! Authentication and authorization (spec §4.11, component C11).
//!
//! Authentication resolves a bearer credential to a [`Principal`].
//! Authorization is a separate, narrower question answered per
//! `(principal, table, capability)` by a [`GrantStore`] — holding one
//! capability on a table never implies another.

mod authn;
mod grants;
mod principal;

pub use authn::{Authenticator, ChainAuthenticator, JwtAuthenticator, StaticAuthenticator};
pub use grants::{AllowAllGrantStore, GrantStore, InMemoryGrantStore};
pub use principal::Principal;
