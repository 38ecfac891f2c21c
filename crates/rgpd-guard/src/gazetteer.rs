//! Gazetteer recognizers for person names and locations
//!
//! Names are found from a given-name list followed by capitalised surname
//! tokens, or from an honorific followed by a capitalised name. Places come
//! from per-language lists of countries and cities.

use crate::error::Result;
use crate::recognizer::Recognizer;
use crate::types::{EntitySpan, EntityType, Language};
use regex::Regex;
use std::collections::HashSet;

const FULL_NAME_SCORE: f32 = 0.85;
const GIVEN_NAME_SCORE: f32 = 0.5;
const LOCATION_SCORE: f32 = 0.85;

/// Maximum number of surname tokens following a given name
const MAX_SURNAME_TOKENS: usize = 2;

const GIVEN_NAMES_EN: &[&str] = &[
    "Alice", "Amanda", "Andrew", "Anna", "Anthony", "Barbara", "Benjamin", "Charles", "Charlotte",
    "Christopher", "Daniel", "David", "Donald", "Elizabeth", "Emily", "Emma", "George", "Grace",
    "Hannah", "Jack", "James", "Jane", "Jennifer", "Jessica", "John", "Joseph", "Karen", "Laura",
    "Linda", "Lisa", "Margaret", "Mark", "Mary", "Matthew", "Michael", "Nancy", "Olivia",
    "Patricia", "Paul", "Richard", "Robert", "Sarah", "Sophia", "Steven", "Susan", "Thomas",
    "William",
];

const GIVEN_NAMES_FR: &[&str] = &[
    "Adrien", "Alain", "Alexandre", "Amélie", "Anne", "Antoine", "Aurélie", "Bernard", "Camille",
    "Caroline", "Catherine", "Cécile", "Chloé", "Christine", "Claire", "Claude", "Daniel", "David",
    "Élise", "Émilie", "Emma", "François", "Françoise", "Guillaume", "Hélène", "Hugo", "Isabelle",
    "Jacques", "Jean", "Jeanne", "Julie", "Julien", "Laurent", "Léa", "Louis", "Louise", "Lucas",
    "Manon", "Marc", "Marie", "Martine", "Mathieu", "Michel", "Nathalie", "Nicolas", "Olivier",
    "Patrick", "Paul", "Philippe", "Pierre", "Sophie", "Stéphane", "Sylvie", "Thomas", "Valérie",
    "Yasmine", "Youssef", "Fatima", "Mohamed", "Karim", "Nadia", "John", "Mary",
];

const HONORIFICS_EN: &[&str] = &["Mrs", "Miss", "Ms", "Mr", "Dr", "Sir"];

const HONORIFICS_FR: &[&str] = &[
    "Mademoiselle", "Madame", "Monsieur", "Mlle", "Mme", "Me", "Dr", "M",
];

const PLACES_EN: &[&str] = &[
    "United States", "United Kingdom", "New York", "Los Angeles", "San Francisco", "England",
    "France", "Germany", "Spain", "Italy", "Canada", "Morocco", "Belgium", "Switzerland",
    "Ireland", "Portugal", "China", "Japan", "India", "Brazil", "London", "Paris", "Berlin",
    "Madrid", "Rome", "Dublin", "Chicago", "Boston", "Toronto", "Montreal", "Sydney", "Brussels",
    "Geneva", "Lisbon", "Casablanca", "Rabat", "Tokyo", "Manchester", "Edinburgh",
];

const PLACES_FR: &[&str] = &[
    "États-Unis", "Royaume-Uni", "Pays-Bas", "Côte d'Ivoire", "Saint-Étienne", "Aix-en-Provence",
    "Clermont-Ferrand", "Le Havre", "France", "Allemagne", "Espagne", "Italie", "Belgique",
    "Suisse", "Maroc", "Algérie", "Tunisie", "Sénégal", "Canada", "Portugal", "Luxembourg",
    "Angleterre", "Paris", "Lyon", "Marseille", "Toulouse", "Nice", "Nantes", "Strasbourg",
    "Montpellier", "Bordeaux", "Lille", "Rennes", "Reims", "Grenoble", "Dijon", "Angers",
    "Toulon", "Brest", "Tours", "Limoges", "Rouen", "Orléans", "Besançon", "Bruxelles", "Genève",
    "Lausanne", "Londres", "Berlin", "Madrid", "Rome", "Casablanca", "Rabat", "Tanger", "Fès",
    "Marrakech", "Montréal", "Québec", "Alger", "Tunis", "Dakar", "Île-de-France", "Bretagne",
    "Normandie", "Provence", "Corse", "Alsace",
];

/// Capitalised word, possibly hyphenated or with an apostrophe
const CAPITALISED_TOKEN: &str = r"\b\p{Lu}[\p{L}\p{M}'’\-]*";

/// Person-name recognizer
pub struct PersonRecognizer {
    tokens: Regex,
    english: NameRules,
    french: NameRules,
}

struct NameRules {
    given_names: HashSet<&'static str>,
    honorific: Regex,
}

impl NameRules {
    fn new(given_names: &[&'static str], honorifics: &[&str]) -> Result<Self> {
        let alternation = honorifics
            .iter()
            .map(|h| regex::escape(h))
            .collect::<Vec<_>>()
            .join("|");
        // Honorific, optional dot, then one or two capitalised words
        let honorific = Regex::new(&format!(
            r"\b(?:{alternation})\.?[ \t]+(\p{{Lu}}[\p{{L}}\p{{M}}'’\-]*(?:[ \t]+\p{{Lu}}[\p{{L}}\p{{M}}'’\-]*)?)"
        ))?;
        Ok(Self {
            given_names: given_names.iter().copied().collect(),
            honorific,
        })
    }

    fn is_given_name(&self, token: &str) -> bool {
        self.given_names.contains(token)
            || token
                .split('-')
                .next()
                .is_some_and(|first| first != token && self.given_names.contains(first))
    }
}

impl PersonRecognizer {
    /// Build the recognizer and its per-language rules
    pub fn new() -> Result<Self> {
        Ok(Self {
            tokens: Regex::new(CAPITALISED_TOKEN)?,
            english: NameRules::new(GIVEN_NAMES_EN, HONORIFICS_EN)?,
            french: NameRules::new(GIVEN_NAMES_FR, HONORIFICS_FR)?,
        })
    }

    fn rules(&self, language: Language) -> &NameRules {
        match language {
            Language::English => &self.english,
            Language::French => &self.french,
        }
    }

    /// Capitalised tokens as `(start, end)`, trailing punctuation trimmed
    fn capitalised_tokens(&self, text: &str) -> Vec<(usize, usize)> {
        self.tokens
            .find_iter(text)
            .map(|m| {
                let trimmed = m.as_str().trim_end_matches(['\'', '’', '-']);
                (m.start(), m.start() + trimmed.len())
            })
            .collect()
    }
}

/// Whether two tokens are separated by spaces or tabs only
fn adjacent(text: &str, left_end: usize, right_start: usize) -> bool {
    right_start > left_end
        && text[left_end..right_start]
            .chars()
            .all(|c| c == ' ' || c == '\t')
}

impl Recognizer for PersonRecognizer {
    fn name(&self) -> &str {
        "person"
    }

    fn entity_type(&self) -> EntityType {
        EntityType::Person
    }

    fn context_words(&self, language: Language) -> &[&'static str] {
        match language {
            Language::English => &["name", "contact", "signed", "dear"],
            Language::French => &["nom", "prénom", "contact", "signé", "cher", "chère"],
        }
    }

    fn analyze(&self, text: &str, language: Language) -> Result<Vec<EntitySpan>> {
        let rules = self.rules(language);
        let mut spans = Vec::new();

        let tokens = self.capitalised_tokens(text);
        let mut i = 0;
        while i < tokens.len() {
            let (start, first_end) = tokens[i];
            if !rules.is_given_name(&text[start..first_end]) {
                i += 1;
                continue;
            }

            let mut end = first_end;
            let mut j = i + 1;
            while j < tokens.len()
                && j - i <= MAX_SURNAME_TOKENS
                && adjacent(text, end, tokens[j].0)
            {
                end = tokens[j].1;
                j += 1;
            }

            let (score, pattern) = if j > i + 1 {
                (FULL_NAME_SCORE, "full_name")
            } else {
                (GIVEN_NAME_SCORE, "given_name")
            };
            spans.push(EntitySpan::new(
                EntityType::Person,
                start,
                end,
                score,
                format!("person:{pattern}"),
            ));
            i = j;
        }

        for caps in rules.honorific.captures_iter(text) {
            if let Some(name) = caps.get(1) {
                let trimmed = name.as_str().trim_end_matches(['\'', '’', '-']);
                spans.push(EntitySpan::new(
                    EntityType::Person,
                    name.start(),
                    name.start() + trimmed.len(),
                    FULL_NAME_SCORE,
                    "person:honorific",
                ));
            }
        }

        Ok(spans)
    }
}

/// Location recognizer backed by a list of places per language
pub struct LocationRecognizer {
    english: Regex,
    french: Regex,
}

impl LocationRecognizer {
    /// Build the recognizer
    pub fn new() -> Result<Self> {
        Ok(Self {
            english: place_regex(PLACES_EN)?,
            french: place_regex(PLACES_FR)?,
        })
    }
}

/// One alternation over all places, longest first so multi-word names win
fn place_regex(places: &[&str]) -> Result<Regex> {
    let mut sorted: Vec<&str> = places.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = sorted
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!(r"\b(?:{alternation})\b"))?)
}

impl Recognizer for LocationRecognizer {
    fn name(&self) -> &str {
        "location"
    }

    fn entity_type(&self) -> EntityType {
        EntityType::Location
    }

    fn context_words(&self, language: Language) -> &[&'static str] {
        match language {
            Language::English => &["city", "address", "lives in", "born in", "located"],
            Language::French => &["ville", "adresse", "habite", "né à", "née à", "domicilié"],
        }
    }

    fn analyze(&self, text: &str, language: Language) -> Result<Vec<EntitySpan>> {
        let places = match language {
            Language::English => &self.english,
            Language::French => &self.french,
        };
        Ok(places
            .find_iter(text)
            .map(|m| {
                EntitySpan::new(
                    EntityType::Location,
                    m.start(),
                    m.end(),
                    LOCATION_SCORE,
                    "location:gazetteer",
                )
            })
            .collect())
    }
}
