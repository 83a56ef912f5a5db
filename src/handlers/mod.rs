// handlers/mod.rs - Two route tiers
//
// Public (no session): /health
// Proxied (session required): everything under the controller API mount,
// each route family gated by its own authorization rule before forwarding.

pub mod health;
pub mod proxy;

pub use health::health;
