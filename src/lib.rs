//! OIDC Bridge - Account provisioning from verified OpenID Connect identities
//!
//! This crate reconciles a transient, externally-authenticated principal with
//! a durable local account: claim extraction with fallback rules, policy-gated
//! auto-provisioning, and the transient-to-persistent account exchange.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
