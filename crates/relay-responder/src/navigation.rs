//! Site keyword to URL table for tab-open requests.

/// Fixed site table. The first keyword contained in the message wins.
const SITES: &[(&str, &str)] = &[
    ("github", "https://github.com"),
    ("linkedin", "https://linkedin.com"),
    ("upwork", "https://upwork.com"),
    ("fiverr", "https://fiverr.com"),
    ("freelancer", "https://freelancer.com"),
    ("behance", "https://behance.net"),
    ("dribbble", "https://dribbble.com"),
    ("stackoverflow", "https://stackoverflow.com"),
    ("google", "https://google.com"),
    ("youtube", "https://youtube.com"),
    ("twitter", "https://twitter.com"),
    ("facebook", "https://facebook.com"),
];

/// Look up the first site keyword contained in `text` (case-insensitive).
pub fn find_url(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    SITES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, url)| *url)
}
