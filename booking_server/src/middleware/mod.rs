mod access_gate;
mod acl;
mod hmac;

pub use access_gate::{AccessGateMiddlewareFactory, AccessGateMiddlewareService};
pub use acl::{AclMiddlewareFactory, AclMiddlewareService};
pub use hmac::{HmacMiddlewareFactory, HmacMiddlewareService};
