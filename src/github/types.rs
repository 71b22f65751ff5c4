use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A starred repository as returned by `GET /users/{user}/starred`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(deserialize_with = "deserialize_url")]
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub stargazers_count: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Repository {
    /// Parses one page body. Any malformed item fails the whole page.
    pub fn parse_page(body: &str) -> Result<Vec<Repository>, serde_json::Error> {
        serde_json::from_str(body)
    }
}

fn deserialize_url<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    reqwest::Url::parse(&raw)
        .map_err(|e| serde::de::Error::custom(format!("invalid html_url {:?}: {}", raw, e)))?;
    Ok(raw)
}
