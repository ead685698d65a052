/// Active-tab data returned by `chrome.tabs.query`
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// The fields of a browser tab the popup reads. `url` is absent when the
/// extension lacks permission for the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabInfo {
    pub id: Option<i32>,
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// URL of the first tab in a `{active: true, currentWindow: true}` query result
pub fn active_tab_url(tabs: &[TabInfo]) -> Result<String> {
    let tab = tabs
        .first()
        .ok_or_else(|| Error::Collaborator("No active tab".to_string()))?;

    let raw = tab
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or_else(|| Error::Collaborator("Active tab URL is not accessible".to_string()))?;

    // Keep the browser's exact text; only reject strings that are not URLs
    Url::parse(raw).map_err(|e| Error::Collaborator(format!("Invalid tab URL: {}", e)))?;

    Ok(raw.to_string())
}
