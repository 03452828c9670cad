//! Deck assembly: shuffling and the marathon pool.

use crate::types::VocabItem;
use rand::seq::SliceRandom;
use rand::Rng;

/// Category id of the failed-words drill. Never shown on a leaderboard.
pub const FAILED_WORDS_CATEGORY: &str = "failed_words";

/// Default number of words in a marathon run.
pub const DEFAULT_MARATHON_LIMIT: usize = 200;

/// Categories pooled by the A1 marathon.
pub const A1_CATEGORIES: &[&str] = &[
    "colors",
    "numbers",
    "time",
    "countries_languages",
    "directions",
    "basic_phrases",
    "communication",
    "w_questions",
    "prepositions",
    "pronouns",
    "conversation_particles",
    "negation",
    "time_expressions",
    "possesive_pronouns",
    "demonstratives",
    "quantifiers",
    "family",
    "clothing",
    "home_furniture",
    "people_descriptions",
    "school",
    "work_jobs",
    "transport",
    "hobbies_free_time",
    "media_technology",
    "food_drinks",
    "household_items",
    "everyday_objects",
    "toys",
    "weather",
    "animals",
    "nature",
    "geography_basics",
    "city_places",
    "common_verbs",
    "daily_activities",
    "modal_verbs",
    "transport_verbs",
    "common_adjectives",
    "feelings",
    "sizes_measurements",
];

/// Categories the marathon for `level` draws from.
pub fn marathon_categories(level: &str) -> &'static [&'static str] {
    if level.eq_ignore_ascii_case("a1") {
        A1_CATEGORIES
    } else {
        &[]
    }
}

/// Category id a marathon session is saved under.
pub fn marathon_category_id(level: &str) -> String {
    format!("{}_marathon", level.to_lowercase())
}

/// Shuffle a deck in place.
pub fn shuffle<R: Rng + ?Sized>(items: &mut [VocabItem], rng: &mut R) {
    items.shuffle(rng);
}

/// Shuffle a pooled word list and keep at most `limit` words.
pub fn marathon_deck<R: Rng + ?Sized>(
    mut pool: Vec<VocabItem>,
    limit: usize,
    rng: &mut R,
) -> Vec<VocabItem> {
    pool.shuffle(rng);
    pool.truncate(limit);
    pool
}
