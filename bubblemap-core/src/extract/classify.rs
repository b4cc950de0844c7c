//! Media outlet classification: online/offline and reach-index kind.

use crate::types::Category;
use serde::{Deserialize, Serialize};

const ONLINE_MEDIA: &[&str] = &[
    "whatsapp", "gmail", "google", "facebook", "youtube", "instagram", "tik tok", "tiktok", "x",
    "pinterest", "linkedin", "snapchat", "spotify", "podcast", "twitch", "diario online",
    "radio online", "tv online",
];

const SOCIAL_MEDIA: &[&str] = &[
    "facebook", "instagram", "tiktok", "tik tok", "whatsapp", "youtube", "x", "pinterest",
    "linkedin", "snapchat",
];

const INTERNET_MEDIA: &[&str] = &[
    "gmail", "google", "podcast", "spotify", "twitch", "diario online", "radio online", "tv online",
];

/// Audience-reach (ATP) family a media outlet is sized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AtpKind {
    TvGeneral,
    SocialMedia,
    Internet,
    Radio,
    Ooh,
    Cine,
    Diario,
}

impl AtpKind {
    /// Label used by the `ATP <label>` rows of the spreadsheet
    pub fn label(self) -> &'static str {
        match self {
            AtpKind::TvGeneral => "TV general",
            AtpKind::SocialMedia => "Internet Social Media",
            AtpKind::Internet => "Internet",
            AtpKind::Radio => "Radio",
            AtpKind::Ooh => "OOH",
            AtpKind::Cine => "Cine",
            AtpKind::Diario => "Diario",
        }
    }

    /// Classify a media outlet by name. Returns `None` for outlets with no ATP family.
    pub fn for_media(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        if contains_word(&name, "tv paga") || contains_word(&name, "tv abierta") {
            return Some(AtpKind::TvGeneral);
        }
        if SOCIAL_MEDIA.iter().any(|m| contains_word(&name, m)) {
            return Some(AtpKind::SocialMedia);
        }
        if INTERNET_MEDIA.iter().any(|m| contains_word(&name, m)) {
            return Some(AtpKind::Internet);
        }
        let online = contains_word(&name, "online");
        if contains_word(&name, "radio") && !online {
            return Some(AtpKind::Radio);
        }
        if contains_word(&name, "ooh") {
            return Some(AtpKind::Ooh);
        }
        if contains_word(&name, "cine") {
            return Some(AtpKind::Cine);
        }
        if contains_word(&name, "diario") && !online {
            return Some(AtpKind::Diario);
        }
        None
    }
}

/// Reach index used when the spreadsheet carries no matching `ATP` row.
pub fn default_reach(kind: Option<AtpKind>, category: Category) -> f64 {
    match (kind, category) {
        (Some(AtpKind::TvGeneral), _) => 41.34,
        (Some(AtpKind::SocialMedia), _) => 39.45,
        (_, Category::Online) => 17.74,
        _ => 27.35,
    }
}

/// Online when the name mentions a known online outlet, offline otherwise.
pub fn classify_media(name: &str) -> Category {
    let name = name.trim().to_lowercase();
    if ONLINE_MEDIA.iter().any(|m| contains_word(&name, m)) {
        Category::Online
    } else {
        Category::Offline
    }
}

/// `needle` occurs in `haystack` bounded by non-alphanumeric characters.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_media() {
        assert_eq!(classify_media("Instagram"), Category::Online);
        assert_eq!(classify_media("Tik Tok"), Category::Online);
        assert_eq!(classify_media("X (Twitter)"), Category::Online);
        assert_eq!(classify_media("Radio Online"), Category::Online);
        assert_eq!(classify_media("Radio AM/FM"), Category::Offline);
        assert_eq!(classify_media("TV Paga"), Category::Offline);
        // "x" only counts as a whole word
        assert_eq!(classify_media("Taxi OOH"), Category::Offline);
    }

    #[test]
    fn test_atp_kind() {
        assert_eq!(AtpKind::for_media("TV Abierta"), Some(AtpKind::TvGeneral));
        assert_eq!(AtpKind::for_media("Facebook"), Some(AtpKind::SocialMedia));
        assert_eq!(AtpKind::for_media("Spotify"), Some(AtpKind::Internet));
        assert_eq!(AtpKind::for_media("Diario Online"), Some(AtpKind::Internet));
        assert_eq!(AtpKind::for_media("Radio AM"), Some(AtpKind::Radio));
        assert_eq!(AtpKind::for_media("Vía pública OOH"), Some(AtpKind::Ooh));
        assert_eq!(AtpKind::for_media("Cine"), Some(AtpKind::Cine));
        assert_eq!(AtpKind::for_media("Diario papel"), Some(AtpKind::Diario));
        assert_eq!(AtpKind::for_media("Revistas"), None);
    }

    #[test]
    fn test_default_reach() {
        assert_eq!(default_reach(Some(AtpKind::TvGeneral), Category::Offline), 41.34);
        assert_eq!(default_reach(Some(AtpKind::SocialMedia), Category::Online), 39.45);
        assert_eq!(default_reach(Some(AtpKind::Internet), Category::Online), 17.74);
        assert_eq!(default_reach(None, Category::Offline), 27.35);
    }
}
