use wasm_bindgen::JsValue;

pub(crate) const DEFAULT_SEARCH_INDEX_URL: &str = "/search-index.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    pub search_index_url: String,
}

impl SiteConfig {
    /// Read overrides from `window.ENV`, falling back to the defaults.
    pub fn new() -> Self {
        web_sys::window()
            .and_then(|w| w.get("ENV"))
            .map(|env| Self::from_env(&env))
            .unwrap_or_default()
    }

    /// `SEARCH_INDEX_URL` wins over the lower-case spelling. Anything that is
    /// not an object with a string value leaves the default in place.
    pub fn from_env(env: &JsValue) -> Self {
        if env.is_undefined() || !env.is_object() {
            return Self::default();
        }

        for key in ["SEARCH_INDEX_URL", "search_index_url"] {
            if let Ok(url) = js_sys::Reflect::get(env, &key.into()) {
                if let Some(url_str) = url.as_string() {
                    return Self {
                        search_index_url: url_str,
                    };
                }
            }
        }

        Self::default()
    }

    /// Absolute index URL for the current page origin.
    pub fn search_index_url_for_page(&self) -> String {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        resolve_url(&origin, &self.search_index_url)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            search_index_url: DEFAULT_SEARCH_INDEX_URL.to_string(),
        }
    }
}

/// reqwest needs absolute URLs, so site-relative paths are joined onto `origin`.
pub(crate) fn resolve_url(origin: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || origin.is_empty() {
        return url.to_string();
    }

    let origin = origin.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{origin}{url}")
    } else {
        format!("{origin}/{url}")
    }
}
