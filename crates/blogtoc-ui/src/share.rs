//! Social share links.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Feature string for the share popup window.
pub const POPUP_FEATURES: &str =
    "menubar=no,toolbar=no,resizable=yes,scrollbars=yes,height=400,width=600";

/// Share targets offered on article pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    Twitter,
    Facebook,
}

impl ShareTarget {
    /// All targets in display order.
    pub const ALL: [ShareTarget; 2] = [ShareTarget::Twitter, ShareTarget::Facebook];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Twitter => "Twitter",
            Self::Facebook => "Facebook",
        }
    }

    /// Popup window name; Twitter reuses an unnamed window, Facebook opens a new one.
    pub fn window_name(&self) -> &'static str {
        match self {
            Self::Twitter => "",
            Self::Facebook => "_blank",
        }
    }

    /// Share URL for a page.
    pub fn url(&self, page_url: &str, title: &str) -> String {
        match self {
            Self::Twitter => twitter_url(page_url, title),
            Self::Facebook => facebook_url(page_url),
        }
    }
}

/// A ready-to-render share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    pub target: ShareTarget,
    pub href: String,
}

/// Share links for every target.
pub fn share_links(page_url: &str, title: &str) -> Vec<ShareLink> {
    ShareTarget::ALL
        .iter()
        .map(|target| ShareLink {
            target: *target,
            href: target.url(page_url, title),
        })
        .collect()
}

/// Percent-encode like `encodeURIComponent`.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Twitter intent URL.
pub fn twitter_url(page_url: &str, title: &str) -> String {
    format!(
        "https://twitter.com/share?url={}&text={}",
        encode_component(page_url),
        encode_component(title)
    )
}

/// Facebook sharer URL.
pub fn facebook_url(page_url: &str) -> String {
    format!(
        "https://www.facebook.com/sharer.php?src=bm&u={}",
        encode_component(page_url)
    )
}
