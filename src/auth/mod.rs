//! Authentication: flat-file user list plus stateless signed tokens.
//!
//! Independent of the document pipeline. Users live in a single JSON file
//! rewritten wholesale on every registration; sessions are HS256 tokens
//! with a fixed 24-hour lifetime and no server-side revocation — logout is
//! the client discarding its token.

pub mod routes;
pub mod store;
pub mod token;

pub use store::{UserRecord, UserStore};
pub use token::{issue_token, verify_token};
