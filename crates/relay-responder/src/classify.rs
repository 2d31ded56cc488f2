//! Ordered keyword classification.

/// Response categories, listed in the priority order they are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Open-a-website intent.
    Navigation,
    /// Capability summary request.
    Help,
    /// Freelance advice request.
    Freelance,
    /// Job offer inquiry.
    Offers,
    /// Anything else; echoed back.
    Echo,
}

/// One classification rule: a category and the keywords that select it.
struct Rule {
    category: Category,
    keywords: &'static [&'static str],
}

/// Rules evaluated top to bottom; the first keyword hit wins, so earlier
/// rules shadow later ones ("open help" is navigation, not help).
const RULES: &[Rule] = &[
    Rule {
        category: Category::Navigation,
        keywords: &["open", "visit", "go to", "navigate"],
    },
    Rule {
        category: Category::Help,
        keywords: &["help", "what can you do", "commands"],
    },
    Rule {
        category: Category::Freelance,
        keywords: &["freelance", "work", "project", "client"],
    },
    Rule {
        category: Category::Offers,
        keywords: &["offer", "offers", "job", "jobs"],
    },
];

/// Classify one chat message by case-insensitive keyword containment.
///
/// Exactly one category is chosen per message; ties are broken by rule
/// order, never by match specificity.
pub fn classify(text: &str) -> Category {
    let lowered = text.to_lowercase();
    for rule in RULES {
        if rule.keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return rule.category;
        }
    }
    Category::Echo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_keywords() {
        assert_eq!(classify("open github"), Category::Navigation);
        assert_eq!(classify("please visit linkedin"), Category::Navigation);
        assert_eq!(classify("go to upwork"), Category::Navigation);
        assert_eq!(classify("navigate home"), Category::Navigation);
    }

    #[test]
    fn test_help_keywords() {
        assert_eq!(classify("help"), Category::Help);
        assert_eq!(classify("what can you do"), Category::Help);
        assert_eq!(classify("show commands"), Category::Help);
    }

    #[test]
    fn test_freelance_keywords() {
        assert_eq!(classify("freelance tips please"), Category::Freelance);
        assert_eq!(classify("my client is late"), Category::Freelance);
    }

    #[test]
    fn test_offer_keywords() {
        assert_eq!(classify("any job offers?"), Category::Offers);
        assert_eq!(classify("jobs available"), Category::Offers);
    }

    #[test]
    fn test_echo_fallback() {
        assert_eq!(classify("hello there"), Category::Echo);
        assert_eq!(classify(""), Category::Echo);
    }

    #[test]
    fn test_navigation_beats_help() {
        assert_eq!(classify("open help for me"), Category::Navigation);
    }

    #[test]
    fn test_help_beats_freelance() {
        assert_eq!(classify("what can you do about my work"), Category::Help);
    }

    #[test]
    fn test_freelance_beats_offers() {
        assert_eq!(classify("freelance job hunting"), Category::Freelance);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("OPEN GITHUB"), Category::Navigation);
        assert_eq!(classify("Help Me"), Category::Help);
    }
}
