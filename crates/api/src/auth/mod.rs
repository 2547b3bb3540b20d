//! Bearer token handling. Tokens are issued by the identity provider that
//! shares `JWT_SECRET`; this service only verifies them.

pub mod jwt;
