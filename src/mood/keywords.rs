use super::MoodLabel;

pub struct KeywordRule {
    pub mood: MoodLabel,
    pub keywords: &'static [&'static str],
}

pub const ANGER_KEYWORDS: &[&str] = &[
    "angry",
    "furious",
    "annoyed",
    "frustrated",
    "rage",
    "mad",
    "irritated",
];
pub const CALM_KEYWORDS: &[&str] = &["calm", "peaceful", "relaxed", "tranquil", "chill", "serene"];
pub const FEAR_KEYWORDS: &[&str] = &[
    "anxious",
    "scared",
    "afraid",
    "fear",
    "terrified",
    "anxiety",
    "panic",
];
pub const SURPRISE_KEYWORDS: &[&str] = &["surprised", "shocked", "stunned", "amazed", "unexpected"];

/// Checked in this order, first hit wins.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        mood: MoodLabel::Angry,
        keywords: ANGER_KEYWORDS,
    },
    KeywordRule {
        mood: MoodLabel::Calm,
        keywords: CALM_KEYWORDS,
    },
    KeywordRule {
        mood: MoodLabel::Fear,
        keywords: FEAR_KEYWORDS,
    },
    KeywordRule {
        mood: MoodLabel::Surprise,
        keywords: SURPRISE_KEYWORDS,
    },
];

/// Returns the mood of the first rule with a keyword contained in `lower_text`,
/// along with the keyword that matched. Plain substring containment: "scared"
/// matches inside "scaredy-cat", "mad" inside "made".
pub fn match_keywords(lower_text: &str) -> Option<(MoodLabel, &'static str)> {
    KEYWORD_RULES.iter().find_map(|rule| {
        rule.keywords
            .iter()
            .find(|keyword| lower_text.contains(*keyword))
            .map(|keyword| (rule.mood, *keyword))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_rule_matches_its_own_keywords() {
        for rule in KEYWORD_RULES {
            for keyword in rule.keywords {
                let text = format!("today i am {} about it", keyword);
                let (mood, _) = match_keywords(&text).unwrap();
                assert_eq!(mood, rule.mood, "keyword {}", keyword);
            }
        }
    }

    #[test]
    fn earlier_rules_win() {
        assert_eq!(
            match_keywords("i feel calm but furious"),
            Some((MoodLabel::Angry, "furious"))
        );
        assert_eq!(
            match_keywords("scared and amazed"),
            Some((MoodLabel::Fear, "scared"))
        );
        assert_eq!(
            match_keywords("stunned yet peaceful"),
            Some((MoodLabel::Calm, "peaceful"))
        );
    }

    #[test]
    fn matches_inside_longer_words() {
        assert_eq!(
            match_keywords("i am a scaredy-cat"),
            Some((MoodLabel::Fear, "scared"))
        );
        assert_eq!(
            match_keywords("i made a cake"),
            Some((MoodLabel::Angry, "mad"))
        );
    }

    #[test]
    fn no_match_on_plain_text() {
        assert_eq!(
            match_keywords("i feel completely overwhelmed by work and need to relax"),
            None
        );
        assert_eq!(match_keywords(""), None);
    }

    #[test]
    fn expects_lowercase_input() {
        assert_eq!(match_keywords("FURIOUS"), None);
    }
}
