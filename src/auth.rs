//! Auth-domain identifiers, PKCE parameters, and token bundles.

pub mod grant;
pub mod id;
pub mod pkce;
pub mod token;

pub use grant::*;
pub use id::*;
pub use pkce::*;
pub use token::{bundle::*, secret::*};
