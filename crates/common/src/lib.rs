//! Core building blocks for the Berth NAS console.
//!
//! This crate provides the pieces with real invariants, kept free of any
//! HTTP concerns so they can be tested in isolation:
//! - Sandbox (root confinement for user-supplied paths)
//! - Classification (text/image/video detection for delivery decisions)
//! - Capability tokens (short-lived signed access for unauthenticated delivery)

pub mod capability;
pub mod classify;
pub mod sandbox;

pub mod prelude {
    pub use crate::capability::{
        CapabilityClaims, CapabilityError, CapabilityKey, DeliveryMode, MAX_TTL_SECS,
        MIN_TTL_SECS,
    };
    pub use crate::classify::{image_mime, is_text_name, looks_like_text, video_mime};
    pub use crate::sandbox::{Sandbox, SandboxError};
}
