//! "Film personality" derived from the most-watched genre.

use serde::Serialize;

/// (genre, article, archetype, description, emoji)
const ARCHETYPES: [(&str, &str, &str, &str, &str); 10] = [
    ("Action", "an", "Action Enthusiast", "who loves adrenaline and excitement!", "💥"),
    ("Adventure", "an", "Adventurer", "who loves to explore new worlds!", "🗺️"),
    ("Comedy", "a", "Comedy Connoisseur", "with a great sense of humor!", "😂"),
    ("Drama", "a", "Drama Guru", "who appreciates the depth of human stories!", "🎭"),
    ("Sci-fi", "a", "Sci-Fi Visionary", "with a big imagination for the future!", "🚀"),
    ("Horror", "a", "Thrill Seeker", "who enjoys the suspense and scares!", "👻"),
    ("Thriller", "a", "Mystery Solver", "who loves clever plots and tension!", "🕵️"),
    ("Romance", "a", "Romantic", "at heart who enjoys emotional stories!", "❤️"),
    ("Animation", "an", "Animation Aficionado", "with a creative soul!", "🎨"),
    ("Fantasy", "a", "Fantasy Wanderer", "who believes in magical worlds!", "🧙"),
];

const FALLBACK: &str = "you have a unique and diverse taste in film!";

/// The personality label for one top genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Personality {
    pub top_genre: String,
    /// None when the genre has no dedicated archetype
    pub archetype: Option<&'static str>,
    pub sentence: String,
}

impl Personality {
    /// Look up the archetype for a genre (ASCII case-insensitive)
    pub fn for_genre(genre: &str) -> Self {
        let entry = ARCHETYPES
            .iter()
            .find(|(name, ..)| name.eq_ignore_ascii_case(genre.trim()));

        match entry {
            Some((_, article, archetype, description, emoji)) => Self {
                top_genre: genre.to_string(),
                archetype: Some(*archetype),
                sentence: format!("you are {} {} {} {}", article, archetype, description, emoji),
            },
            None => Self {
                top_genre: genre.to_string(),
                archetype: None,
                sentence: FALLBACK.to_string(),
            },
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Your most-watched genre is {}. It looks like {}",
            self.top_genre, self.sentence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_genre() {
        let p = Personality::for_genre("Action");
        assert_eq!(p.archetype, Some("Action Enthusiast"));
        assert_eq!(
            p.sentence,
            "you are an Action Enthusiast who loves adrenaline and excitement! 💥"
        );
        assert!(p.summary().starts_with("Your most-watched genre is Action."));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(Personality::for_genre("SCI-FI").archetype, Some("Sci-Fi Visionary"));
    }

    #[test]
    fn test_unknown_genre_falls_back() {
        let p = Personality::for_genre("Western");
        assert_eq!(p.archetype, None);
        assert_eq!(p.sentence, FALLBACK);
    }
}
