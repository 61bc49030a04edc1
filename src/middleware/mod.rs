/// Middleware module
///
/// Custom middleware guarding protected routes.

mod bearer_gate;

pub use bearer_gate::BearerGate;
