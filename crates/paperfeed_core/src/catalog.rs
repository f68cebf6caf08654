//! Bundled paper catalog.
//!
//! # Responsibility
//! - Load the read-only paper collection once at startup.
//! - Reject catalogs that break identity invariants.
//!
//! # Invariants
//! - Every paper passes `Paper::validate()`.
//! - Paper ids are unique within the catalog.
//! - The catalog is immutable after construction.

use crate::model::paper::{Paper, PaperId, PaperValidationError};
use log::{error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Catalog loading errors.
#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidPaper { index: usize, source: PaperValidationError },
    DuplicateId(PaperId),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read catalog: {err}"),
            Self::Parse(err) => write!(f, "failed to parse catalog: {err}"),
            Self::InvalidPaper { index, source } => {
                write!(f, "invalid paper at index {index}: {source}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate paper id in catalog: {id}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidPaper { source, .. } => Some(source),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Immutable, validated paper collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperCatalog {
    papers: Vec<Paper>,
}

impl PaperCatalog {
    /// Builds a catalog from already-decoded papers.
    ///
    /// # Errors
    /// - `InvalidPaper` when a record fails validation.
    /// - `DuplicateId` when two records share an id.
    pub fn from_papers(papers: Vec<Paper>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(papers.len());
        for (index, paper) in papers.iter().enumerate() {
            paper
                .validate()
                .map_err(|source| CatalogError::InvalidPaper { index, source })?;
            if !seen.insert(paper.id.as_str()) {
                return Err(CatalogError::DuplicateId(paper.id.clone()));
            }
        }
        Ok(Self { papers })
    }

    /// Parses a JSON array of papers.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let papers: Vec<Paper> = serde_json::from_str(json)?;
        let catalog = Self::from_papers(papers);
        match &catalog {
            Ok(loaded) => info!(
                "event=catalog_load module=catalog status=ok papers={}",
                loaded.len()
            ),
            Err(err) => error!(
                "event=catalog_load module=catalog status=error error={}",
                err
            ),
        }
        catalog
    }

    /// Reads and parses a JSON catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Looks up one paper by id.
    pub fn get(&self, id: &str) -> Option<&Paper> {
        self.papers.iter().find(|paper| paper.id == id)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for paper in &self.papers {
            if !categories.contains(&paper.category.as_str()) {
                categories.push(paper.category.as_str());
            }
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, PaperCatalog};
    use crate::model::paper::Paper;

    #[test]
    fn rejects_duplicate_ids() {
        let err = PaperCatalog::from_papers(vec![
            Paper::new("a", "One", "Robotics"),
            Paper::new("a", "Two", "Robotics"),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "a"));
    }

    #[test]
    fn rejects_blank_ids_with_index() {
        let err = PaperCatalog::from_papers(vec![
            Paper::new("a", "One", "Robotics"),
            Paper::new("", "Two", "Robotics"),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPaper { index: 1, .. }));
    }

    #[test]
    fn blank_title_does_not_reject_the_catalog() {
        let catalog = PaperCatalog::from_json_str(
            r#"[
                {"id":"a","title":"A","abstract":"","authors":[],"category":"Robotics"},
                {"id":"b","title":"","abstract":"","authors":[],"category":"Robotics","year":"2022"}
            ]"#,
        )
        .expect("blank title should still load");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("b").map(|paper| paper.title.as_str()), Some(""));
        assert_eq!(catalog.get("b").and_then(|paper| paper.year), Some(2022));
    }

    #[test]
    fn parses_json_and_lists_categories() {
        let catalog = PaperCatalog::from_json_str(
            r#"[
                {"id":"a","title":"A","abstract":"","authors":[],"category":"Robotics"},
                {"id":"b","title":"B","abstract":"","authors":[],"category":"Machine Learning","year":2023},
                {"id":"c","title":"C","abstract":"","authors":[],"category":"Robotics"}
            ]"#,
        )
        .expect("catalog should parse");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.categories(), vec!["Robotics", "Machine Learning"]);
        assert_eq!(catalog.get("b").and_then(|paper| paper.year), Some(2023));
    }

    #[test]
    fn empty_array_is_a_valid_catalog() {
        let catalog = PaperCatalog::from_json_str("[]").expect("empty catalog parses");
        assert!(catalog.is_empty());
    }
}
