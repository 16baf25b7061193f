//! Short-lived credential handling.
//!
//! Two kinds of tokens flow through the gateway:
//! - a *builder token*, fetched from the vendor REST API, which authorizes
//!   task-lifecycle calls (see [`BuilderTokenCache`]);
//! - *media tokens*, derived locally per (channel, uid), which authorize the
//!   audio-subscribing and text-publishing bot identities inside a channel
//!   (see [`MediaTokenBuilder`]).

mod builder;
mod media;

pub use builder::{BuilderToken, BuilderTokenCache};
pub use media::MediaTokenBuilder;
