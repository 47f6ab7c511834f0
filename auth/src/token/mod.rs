pub mod codec;
pub mod errors;
pub mod resolution;
pub mod secrets;

pub use codec::TokenCodec;
pub use errors::SecretSetError;
pub use errors::VerificationFailure;
pub use resolution::Rejection;
pub use resolution::Resolution;
pub use secrets::SecretSet;
