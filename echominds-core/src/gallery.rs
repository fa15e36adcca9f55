//! Built-in character gallery shown before the backend has any characters.

use crate::error::{EchoMindsError, EchoMindsResult};
use crate::models::{Category, Character};

struct Seed {
    id: &'static str,
    name: &'static str,
    avatar: &'static str,
    description: &'static str,
    greeting: &'static str,
    chat_count: u64,
    category: &'static str,
    tags: &'static [&'static str],
}

const SEED_CHARACTERS: &[Seed] = &[
    Seed {
        id: "1",
        name: "Luna",
        avatar: "🌙",
        description: "Seorang astrologer misterius yang bisa membaca bintang dan memberikan advice tentang kehidupan",
        greeting: "Halo! Aku Luna. Mau aku bacakan bintang-mu hari ini?",
        chat_count: 15243,
        category: "Assistant",
        tags: &["astrology", "wisdom", "friendly"],
    },
    Seed {
        id: "2",
        name: "Kai",
        avatar: "⚔️",
        description: "Swordmaster dari dunia fantasy yang siap melatihmu menjadi warrior terkuat",
        greeting: "Selamat datang, murid baru. Siap untuk berlatih?",
        chat_count: 23102,
        category: "Anime",
        tags: &["fantasy", "mentor", "action"],
    },
    Seed {
        id: "3",
        name: "Dr. Nova",
        avatar: "🔬",
        description: "Ilmuwan jenius yang membantu menjelaskan konsep sains dengan cara yang fun dan mudah dipahami",
        greeting: "Hai! Ada eksperimen menarik yang ingin kita coba hari ini?",
        chat_count: 8934,
        category: "Assistant",
        tags: &["science", "teacher", "smart"],
    },
    Seed {
        id: "4",
        name: "Yuki",
        avatar: "❄️",
        description: "Gadis pemalu dari Jepang yang suka membaca manga dan mendengarkan musik",
        greeting: "A-ah... halo. Senang bertemu denganmu...",
        chat_count: 31205,
        category: "Anime",
        tags: &["shy", "cute", "slice of life"],
    },
    Seed {
        id: "5",
        name: "Shadow",
        avatar: "🎭",
        description: "Detective misterius yang ahli memecahkan kasus-kasus sulit",
        greeting: "Hmm... ada kasus menarik untukku?",
        chat_count: 12789,
        category: "Roleplay",
        tags: &["mystery", "detective", "thriller"],
    },
    Seed {
        id: "6",
        name: "Aria",
        avatar: "🎵",
        description: "Idol terkenal yang ramah dan suka berinteraksi dengan fans",
        greeting: "Kyaa~! Akhirnya kita bisa ngobrol! ♪",
        chat_count: 45672,
        category: "Anime",
        tags: &["idol", "cheerful", "music"],
    },
    Seed {
        id: "7",
        name: "Rex",
        avatar: "🦖",
        description: "Dinosaurus yang bisa berbicara dan penuh dengan fun facts tentang sejarah",
        greeting: "ROAR! Oh maaf... maksudku, halo! Mau belajar tentang zaman dinosaurus?",
        chat_count: 6543,
        category: "OC",
        tags: &["dinosaur", "funny", "educational"],
    },
    Seed {
        id: "8",
        name: "Zen",
        avatar: "🧘",
        description: "Meditation guru yang membantu kamu menemukan inner peace dan ketenangan",
        greeting: "Tarik napas... hembuskan perlahan. Welcome, friend.",
        chat_count: 9876,
        category: "Assistant",
        tags: &["meditation", "calm", "wellness"],
    },
];

const SEED_CATEGORIES: &[(&str, &str, &str, u64)] = &[
    ("anime", "Anime", "🎌", 2341),
    ("game", "Game", "🎮", 1876),
    ("assistant", "Assistant", "🤖", 987),
    ("roleplay", "Roleplay", "🎭", 1543),
    ("oc", "Original", "✨", 3210),
    ("movie", "Movie & TV", "🎬", 1234),
];

impl Seed {
    fn to_character(&self) -> Character {
        Character {
            id: self.id.to_string(),
            name: self.name.to_string(),
            avatar: self.avatar.to_string(),
            description: self.description.to_string(),
            greeting: Some(self.greeting.to_string()),
            personality: None,
            system_prompt: None,
            example_dialogues: Vec::new(),
            emotional_hooks: Vec::new(),
            chat_count: self.chat_count,
            category: Some(self.category.to_string()),
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Read-only character catalogue.
#[derive(Debug, Clone)]
pub struct Gallery {
    characters: Vec<Character>,
    categories: Vec<Category>,
}

impl Gallery {
    /// Gallery filled with the built-in seed characters.
    pub fn seeded() -> Self {
        Self {
            characters: SEED_CHARACTERS.iter().map(Seed::to_character).collect(),
            categories: SEED_CATEGORIES
                .iter()
                .map(|(id, name, icon, count)| Category {
                    id: id.to_string(),
                    name: name.to_string(),
                    icon: icon.to_string(),
                    character_count: Some(*count),
                })
                .collect(),
        }
    }

    /// Gallery over characters fetched from the backend, keeping the seed categories.
    pub fn with_characters(characters: Vec<Character>) -> Self {
        Self {
            characters,
            ..Self::seeded()
        }
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn find(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Settles a backend lookup against the gallery.
    ///
    /// A failed lookup falls back to the seed entry with the same id. When the
    /// gallery has no such entry either, a 404 becomes `CharacterNotFound` and any
    /// other failure is returned unchanged.
    pub fn resolve(
        &self,
        id: &str,
        fetched: EchoMindsResult<Character>,
    ) -> EchoMindsResult<Character> {
        match fetched {
            Ok(character) => Ok(character),
            Err(e) => match self.find(id) {
                Some(character) => Ok(character.clone()),
                None if e.status() == Some(404) => {
                    Err(EchoMindsError::CharacterNotFound(id.to_string()))
                }
                None => Err(e),
            },
        }
    }

    /// Characters whose category matches `category` by id or display name.
    ///
    /// Seed characters label their category "OC" while the category list calls it
    /// "Original", so both the category id and its name are accepted.
    pub fn by_category(&self, category: &str) -> Vec<&Character> {
        let wanted = category.trim().to_lowercase();
        let aliases: Vec<String> = self
            .categories
            .iter()
            .filter(|c| c.id == wanted || c.name.to_lowercase() == wanted)
            .flat_map(|c| [c.id.clone(), c.name.to_lowercase()])
            .chain(std::iter::once(wanted.clone()))
            .collect();

        self.characters
            .iter()
            .filter(|c| {
                c.category
                    .as_deref()
                    .map(|cat| aliases.contains(&cat.to_lowercase()))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Case-insensitive match over name, description and tags.
    pub fn search(&self, query: &str) -> Vec<&Character> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.characters.iter().collect();
        }

        self.characters
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&query)
                    || c.description.to_lowercase().contains(&query)
                    || c.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Top `limit` characters by chat count.
    pub fn popular(&self, limit: usize) -> Vec<&Character> {
        let mut sorted: Vec<&Character> = self.characters.iter().collect();
        sorted.sort_by(|a, b| b.chat_count.cmp(&a.chat_count));
        sorted.truncate(limit);
        sorted
    }
}

impl Default for Gallery {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_gallery() {
        let gallery = Gallery::seeded();
        assert_eq!(gallery.characters().len(), 8);
        assert_eq!(gallery.categories().len(), 6);
        assert_eq!(gallery.find("3").unwrap().name, "Dr. Nova");
        assert!(gallery.find("99").is_none());
    }

    #[test]
    fn test_resolve_prefers_backend_then_gallery() {
        let gallery = Gallery::seeded();
        let mut remote = gallery.find("3").unwrap().clone();
        remote.name = "Remote Nova".to_string();

        let resolved = gallery.resolve("3", Ok(remote)).unwrap();
        assert_eq!(resolved.name, "Remote Nova");

        let not_found = EchoMindsError::Api {
            message: "no such character".to_string(),
            status: 404,
            data: serde_json::Value::Null,
        };
        let resolved = gallery.resolve("3", Err(not_found)).unwrap();
        assert_eq!(resolved.name, "Dr. Nova");
    }

    #[test]
    fn test_resolve_unknown_id_is_character_not_found() {
        let gallery = Gallery::seeded();
        let not_found = EchoMindsError::Api {
            message: "no such character".to_string(),
            status: 404,
            data: serde_json::Value::Null,
        };

        let err = gallery.resolve("99", Err(not_found)).unwrap_err();
        assert!(matches!(err, EchoMindsError::CharacterNotFound(ref id) if id == "99"));
        assert_eq!(err.error_code(), "E3002");

        let offline = EchoMindsError::Network {
            message: "connection refused".to_string(),
        };
        let err = gallery.resolve("99", Err(offline)).unwrap_err();
        assert!(matches!(err, EchoMindsError::Network { .. }));
    }

    #[test]
    fn test_by_category() {
        let gallery = Gallery::seeded();
        let anime: Vec<&str> = gallery
            .by_category("anime")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(anime, vec!["Kai", "Yuki", "Aria"]);

        assert_eq!(gallery.by_category("Assistant").len(), 3);
        assert!(gallery.by_category("movie").is_empty());
    }

    #[test]
    fn test_by_category_original_alias() {
        let gallery = Gallery::seeded();
        let originals = gallery.by_category("Original");
        assert_eq!(originals.len(), 1);
        assert_eq!(originals[0].name, "Rex");
        assert_eq!(gallery.by_category("oc").len(), 1);
    }

    #[test]
    fn test_search() {
        let gallery = Gallery::seeded();
        assert_eq!(gallery.search("DETECTIVE")[0].name, "Shadow");
        assert_eq!(gallery.search("bintang")[0].name, "Luna");
        assert_eq!(gallery.search("").len(), 8);
        assert!(gallery.search("spaceship").is_empty());
    }

    #[test]
    fn test_popular() {
        let gallery = Gallery::seeded();
        let top: Vec<&str> = gallery.popular(3).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(top, vec!["Aria", "Yuki", "Kai"]);
        assert_eq!(gallery.popular(100).len(), 8);
    }
}
