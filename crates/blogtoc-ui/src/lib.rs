//! blogtoc UI Library
//!
//! Browser-side behaviour of article pages, expressed as plain state types so
//! the page generator can render it and any host can drive it.
//!
//! - [`share`] - Twitter/Facebook share links
//! - [`scroll`] - header scroll effect, return-to-top button and scoped scroll subscriptions

pub mod scroll;
pub mod share;

pub use scroll::{
    ButtonStyle, HeaderEffect, ReturnTopButton, ScrollBehavior, ScrollEvents, ScrollHandler,
    ScrollSubscription, ScrollTo,
};
pub use share::{ShareLink, ShareTarget, share_links};
