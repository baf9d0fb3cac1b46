//! Prompt policy for concept synthesis.
//!
//! # Invariants
//! - Keyword matching is case-insensitive substring matching on either source.
//! - Keyword hits select the challenge template; everything else gets the
//!   concept template.

/// Game modes that switch synthesis to the challenge template.
pub const CHALLENGE_KEYWORDS: &[&str] = &[
    "bedwars",
    "skywars",
    "duels",
    "hunger games",
    "build battle",
    "survival games",
    "the walls",
];

/// Template family chosen for a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// One concrete, measurable in-game video challenge.
    Challenge,
    /// One concrete video concept.
    Concept,
}

/// Chooses the template for two source texts.
pub fn select_template(first: &str, second: &str) -> PromptTemplate {
    let first = first.to_lowercase();
    let second = second.to_lowercase();
    let involves_game_mode = CHALLENGE_KEYWORDS
        .iter()
        .any(|keyword| first.contains(keyword) || second.contains(keyword));

    if involves_game_mode {
        PromptTemplate::Challenge
    } else {
        PromptTemplate::Concept
    }
}

/// Builds the full synthesis prompt for two source texts.
pub fn build_prompt(first: &str, second: &str) -> String {
    match select_template(first, second) {
        PromptTemplate::Challenge => format!(
            "By combining \"{first}\" and \"{second}\", generate ONE creative and engaging \
             video challenge that could be filmed. The challenge must be concrete, measurable, \
             and push for a specific in-game action. Do not start with an introduction. \
             State the challenge directly. Example: Win a Bedwars game without ever buying a sword."
        ),
        PromptTemplate::Concept => format!(
            "By combining \"{first}\" and \"{second}\", generate ONE unique and concrete \
             video concept. Do not start with an introduction. State the video concept \
             directly. Example: A video series on advanced building mechanics in Minecraft, \
             exploring complex redstone techniques and innovative architectural designs."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_in_either_source_selects_challenge() {
        assert_eq!(select_template("BedWars", "speedrun"), PromptTemplate::Challenge);
        assert_eq!(
            select_template("no armor", "Hunger Games finals"),
            PromptTemplate::Challenge
        );
    }

    #[test]
    fn plain_sources_select_concept() {
        assert_eq!(select_template("redstone", "castles"), PromptTemplate::Concept);
    }

    #[test]
    fn prompt_quotes_both_sources_verbatim() {
        let prompt = build_prompt("Redstone", "Castles");
        assert!(prompt.contains("\"Redstone\""));
        assert!(prompt.contains("\"Castles\""));
        assert!(prompt.contains("video concept"));
    }
}
