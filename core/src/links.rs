//! Outbound search links for a recipe title.

use url::Url;

const WEB_SEARCH: &str = "https://www.google.com/search";
const VIDEO_SEARCH: &str = "https://www.youtube.com/results";

/// Web search for `recipe {title}`.
pub fn web_search_link(title: &str) -> String {
    with_query(WEB_SEARCH, "q", &format!("recipe {title}"))
}

/// Video search for `how to make {title} recipe`.
pub fn video_search_link(title: &str) -> String {
    with_query(VIDEO_SEARCH, "search_query", &format!("how to make {title} recipe"))
}

fn with_query(base: &str, key: &str, value: &str) -> String {
    match Url::parse_with_params(base, &[(key, value)]) {
        Ok(url) => url.to_string(),
        Err(_) => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_title() {
        assert_eq!(
            web_search_link("Mac & Cheese"),
            "https://www.google.com/search?q=recipe+Mac+%26+Cheese"
        );
        assert_eq!(
            video_search_link("Pad Thai"),
            "https://www.youtube.com/results?search_query=how+to+make+Pad+Thai+recipe"
        );
    }
}
