/// Cover shown when an entity has no usable cover of its own.
pub const DEFAULT_COVER_URL: &str = "https://www.shutterstock.com/shutterstock/photos/2629945729/display_1500/stock-photo-uk-flag-with-pen-on-english-language-book-2629945729.jpg";

/// Pick the cover to display: the candidate if it is non-blank, else the default.
pub fn resolve_cover(candidate: Option<&str>) -> &str {
    match candidate {
        Some(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_COVER_URL,
    }
}
