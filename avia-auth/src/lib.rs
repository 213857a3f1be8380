pub mod idp;
pub mod jwks;
pub mod verifier;

pub use idp::{IdentityProviderClient, IdpError, TokenResponse};
pub use jwks::{JwksCache, JwksError, DEFAULT_JWKS_TTL};
pub use verifier::{AuthError, TokenVerifier, VerifiedIdentity, VerifierConfig};
