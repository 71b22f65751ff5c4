//! Keyword-based categorization of repositories.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::github::Repository;

/// Category tags, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "AI")]
    Ai,
    Programming,
    Design,
    Game,
    #[serde(rename = "Utility Tools")]
    Utility,
    Other,
}

impl Category {
    /// All categories in priority order; `Other` last.
    pub const ALL: [Category; 6] = [
        Category::Ai,
        Category::Programming,
        Category::Design,
        Category::Game,
        Category::Utility,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ai => "AI",
            Category::Programming => "Programming",
            Category::Design => "Design",
            Category::Game => "Game",
            Category::Utility => "Utility Tools",
            Category::Other => "Other",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Ai => AI_KEYWORDS,
            Category::Programming => PROGRAMMING_KEYWORDS,
            Category::Design => DESIGN_KEYWORDS,
            Category::Game => GAME_KEYWORDS,
            Category::Utility => UTILITY_KEYWORDS,
            Category::Other => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const AI_KEYWORDS: &[&str] = &[
    "ai",
    "artificial-intelligence",
    "machine-learning",
    "ml",
    "deep-learning",
    "neural-network",
    "nlp",
    "natural-language-processing",
    "gpt",
    "llm",
    "large-language-model",
    "openai",
    "tensorflow",
    "pytorch",
    "huggingface",
    "transformers",
    "bert",
    "chatbot",
    "computer-vision",
    "cv",
];

const PROGRAMMING_KEYWORDS: &[&str] = &[
    "programming",
    "language",
    "compiler",
    "interpreter",
    "framework",
    "library",
    "sdk",
    "api",
    "backend",
    "frontend",
    "fullstack",
    "web-development",
    "mobile-development",
    "development",
    "coding",
    "algorithm",
    "data-structure",
    "database",
    "sql",
    "nosql",
    "javascript",
    "typescript",
    "python",
    "java",
    "rust",
    "go",
    "c++",
    "c#",
    "php",
    "ruby",
];

const DESIGN_KEYWORDS: &[&str] = &[
    "design",
    "ui",
    "ux",
    "user-interface",
    "user-experience",
    "graphic",
    "css",
    "animation",
    "illustration",
    "figma",
    "sketch",
    "adobe",
    "photoshop",
    "illustrator",
    "typography",
    "color",
    "layout",
    "responsive",
    "web-design",
    "mobile-design",
];

const GAME_KEYWORDS: &[&str] = &[
    "game",
    "gaming",
    "gamedev",
    "game-development",
    "unity",
    "unreal",
    "godot",
    "engine",
    "game-engine",
    "3d",
    "2d",
    "arcade",
    "rpg",
    "fps",
    "mmorpg",
    "puzzle",
    "strategy",
    "simulation",
    "vr",
    "ar",
    "virtual-reality",
    "augmented-reality",
];

const UTILITY_KEYWORDS: &[&str] = &[
    "utility",
    "tool",
    "cli",
    "command-line",
    "automation",
    "productivity",
    "workflow",
    "devops",
    "ci-cd",
    "continuous-integration",
    "deployment",
    "monitoring",
    "logging",
    "testing",
    "security",
    "backup",
    "converter",
    "formatter",
    "linter",
    "analyzer",
];

/// Assigns a repository to the first category with a matching keyword.
///
/// Matching is case-insensitive over description, language, name and topics.
/// A keyword matches when it occurs anywhere in that text, equals a topic,
/// or (for dashed keywords) equals a topic once its dashes are removed.
pub fn categorize(repo: &Repository) -> Category {
    let topics: Vec<String> = repo.topics.iter().map(|t| t.to_lowercase()).collect();
    let haystack = format!(
        "{} {} {} {}",
        repo.description.as_deref().unwrap_or_default(),
        repo.language.as_deref().unwrap_or_default(),
        repo.name,
        topics.join(" ")
    )
    .to_lowercase();

    Category::ALL
        .into_iter()
        .find(|category| {
            category
                .keywords()
                .iter()
                .any(|keyword| matches_keyword(&haystack, &topics, keyword))
        })
        .unwrap_or(Category::Other)
}

fn matches_keyword(haystack: &str, topics: &[String], keyword: &str) -> bool {
    if haystack.contains(keyword) || topics.iter().any(|t| t == keyword) {
        return true;
    }
    if keyword.contains('-') {
        let squashed = keyword.replace('-', "");
        return topics.iter().any(|t| *t == squashed);
    }
    false
}
