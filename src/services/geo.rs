use crate::domain::constants::FALLBACK_COORDINATES;
use crate::domain::models::Coordinates;
use regex::Regex;
use std::sync::LazyLock;

struct Matcher {
    name: &'static str,
    pattern: Regex,
}

impl Matcher {
    fn try_match(&self, link: &str) -> Option<Coordinates> {
        let caps = self.pattern.captures(link)?;
        let lat = caps.get(1)?.as_str().parse().ok()?;
        let lng = caps.get(2)?.as_str().parse().ok()?;
        Some(Coordinates { lat, lng })
    }
}

// Priority order; the first matcher that fires wins. Digits are ASCII only.
static MATCHERS: LazyLock<Vec<Matcher>> = LazyLock::new(|| {
    [
        ("at", r"@(-?[0-9]+\.[0-9]+),(-?[0-9]+\.[0-9]+)"),
        ("q", r"q=(-?[0-9]+\.[0-9]+),(-?[0-9]+\.[0-9]+)"),
        ("ll", r"ll=(-?[0-9]+\.[0-9]+),(-?[0-9]+\.[0-9]+)"),
    ]
    .into_iter()
    .map(|(name, pattern)| Matcher {
        name,
        pattern: Regex::new(pattern).expect("valid coordinate pattern"),
    })
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located {
    pub coordinates: Coordinates,
    /// Name of the matcher that fired, or `"fallback"`.
    pub matched: &'static str,
}

pub fn locate(map_url: &str) -> Located {
    MATCHERS
        .iter()
        .find_map(|m| {
            m.try_match(map_url).map(|coordinates| Located {
                coordinates,
                matched: m.name,
            })
        })
        .unwrap_or(Located {
            coordinates: FALLBACK_COORDINATES,
            matched: "fallback",
        })
}

/// Coordinates embedded in a map link, or the fallback location.
///
/// Values are not range-checked.
pub fn extract_coordinates(map_url: &str) -> Coordinates {
    locate(map_url).coordinates
}
