pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::TokenClaims;
pub use claims::TOKEN_LIFETIME_DAYS;
pub use errors::JwtError;
pub use handler::JwtHandler;
