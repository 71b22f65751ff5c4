//! Grouping categorized repositories and writing them to disk.

use anyhow::{Context, Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::category::{Category, categorize};
use crate::github::Repository;
use crate::runtime::Runtime;

/// A repository together with its category, as written to the output file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategorizedRepo {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stargazers_count: Option<u64>,
}

impl CategorizedRepo {
    pub fn from_repository(repo: Repository) -> Self {
        let category = categorize(&repo);
        Self {
            id: repo.id,
            name: repo.name,
            url: repo.html_url,
            description: repo.description,
            language: repo.language,
            topics: repo.topics,
            category,
            stargazers_count: repo.stargazers_count,
        }
    }
}

/// One list per category; serialized as an object keyed by category name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Output {
    #[serde(rename = "AI")]
    pub ai: Vec<CategorizedRepo>,
    #[serde(rename = "Programming")]
    pub programming: Vec<CategorizedRepo>,
    #[serde(rename = "Design")]
    pub design: Vec<CategorizedRepo>,
    #[serde(rename = "Game")]
    pub game: Vec<CategorizedRepo>,
    #[serde(rename = "Utility Tools")]
    pub utility: Vec<CategorizedRepo>,
    #[serde(rename = "Other")]
    pub other: Vec<CategorizedRepo>,
}

impl Output {
    /// Groups repositories by category, keeping their relative order.
    pub fn group(repos: Vec<CategorizedRepo>) -> Self {
        let mut output = Output::default();
        for repo in repos {
            output.bucket_mut(repo.category).push(repo);
        }
        output
    }

    pub fn bucket(&self, category: Category) -> &[CategorizedRepo] {
        match category {
            Category::Ai => &self.ai,
            Category::Programming => &self.programming,
            Category::Design => &self.design,
            Category::Game => &self.game,
            Category::Utility => &self.utility,
            Category::Other => &self.other,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<CategorizedRepo> {
        match category {
            Category::Ai => &mut self.ai,
            Category::Programming => &mut self.programming,
            Category::Design => &mut self.design,
            Category::Game => &mut self.game,
            Category::Utility => &mut self.utility,
            Category::Other => &mut self.other,
        }
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.bucket(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every entry sits under the key of its own category.
    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            if let Some(stray) = self.bucket(category).iter().find(|r| r.category != category) {
                bail!(
                    "Repository {} is tagged {} but listed under {}",
                    stray.name,
                    stray.category,
                    category
                );
            }
        }
        Ok(())
    }
}

/// Groups `repos` by category and writes them as pretty-printed JSON to `path`,
/// creating the parent directory if needed.
#[tracing::instrument(skip(runtime, repos))]
pub fn write_output<R: Runtime>(
    runtime: &R,
    repos: Vec<CategorizedRepo>,
    path: &Path,
) -> Result<()> {
    write_output_inner(runtime, repos, path).context("Failed to write output")
}

fn write_output_inner<R: Runtime>(
    runtime: &R,
    repos: Vec<CategorizedRepo>,
    path: &Path,
) -> Result<()> {
    let output = Output::group(repos);
    output.validate()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!("Ensuring output directory {} exists", parent.display());
        runtime.create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    runtime.write(path, json.as_bytes())?;

    debug!("Wrote {} repositories to {}", output.len(), path.display());
    Ok(())
}
