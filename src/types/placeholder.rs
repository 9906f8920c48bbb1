use serde::{Deserialize, Serialize};

/// Title shown for a placeholder whose address carries no title.
pub const UNTITLED: &str = "Untitled";

/// The original identity of a suspended tab, as carried in the placeholder address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderReference {
    pub original_url: String,
    pub original_title: String,
}

/// Classification of a tab address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Browser-internal or privileged page. Never tracked or suspended.
    Internal,
    /// Our own placeholder page.
    Placeholder,
    /// Any other page.
    Normal,
}

/// What the placeholder page renders: the decoded identity plus the active theme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderPage {
    pub original_url: String,
    pub original_title: String,
    pub theme: super::settings::ThemeMode,
}
