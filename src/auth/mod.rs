/// Authentication module
///
/// Password hashing, signed access/refresh token issuance and verification,
/// bearer header classification, and the refresh exchange.

mod bearer;
mod claims;
mod password;
mod refresh;
mod tokens;

pub use bearer::authenticate;
pub use bearer::BearerToken;
pub use bearer::BEARER_SCHEME;
pub use claims::Claims;
pub use claims::Subject;
pub use password::hash_password;
pub use password::verify_password;
pub use password::verify_login;
pub use refresh::refresh_session;
pub use tokens::decode_with;
pub use tokens::now;
pub use tokens::Secret;
pub use tokens::TokenClass;
pub use tokens::TokenPair;
pub use tokens::TokenService;
