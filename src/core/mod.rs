//! Core infrastructure: credentials, HTTP transport, request plumbing.

pub mod credentials;
pub mod rest;
pub mod transport;

pub use credentials::{hash_password, CredentialKey, Credentials};
pub use rest::{RestContext, TokenSlot, AUTH_COOKIE};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};
