//! Keyword department classifier
//!
//! Routes a complaint by scanning its description for department keywords.
//! The first department whose keyword list matches wins.

use async_trait::async_trait;

use crate::domain::Department;
use crate::ports::{Classification, ClassifierError, DepartmentClassifier};

struct Route {
    department: Department,
    category: &'static str,
    keywords: &'static [&'static str],
}

const ROUTES: &[Route] = &[
    Route {
        department: Department::Water,
        category: "Water Supply Issue",
        keywords: &["water", "tap", "pipeline", "leak", "sewage", "drain"],
    },
    Route {
        department: Department::Electricity,
        category: "Power Issue",
        keywords: &["electric", "light", "power", "streetlight", "electrical", "outage"],
    },
    Route {
        department: Department::Roads,
        category: "Road Damage",
        keywords: &["road", "pothole", "pavement", "traffic", "footpath"],
    },
    Route {
        department: Department::Waste,
        category: "Waste Collection",
        keywords: &["garbage", "waste", "dump", "trash", "litter"],
    },
    Route {
        department: Department::Healthcare,
        category: "Health Services",
        keywords: &["hospital", "doctor", "clinic", "health", "medical"],
    },
];

const UNMATCHED_CATEGORY: &str = "General";

#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    reject_unmatched: bool,
}

impl KeywordClassifier {
    pub fn new(reject_unmatched: bool) -> Self {
        Self { reject_unmatched }
    }

    fn route(text: &str) -> Option<&'static Route> {
        let text = text.to_lowercase();
        ROUTES
            .iter()
            .find(|route| route.keywords.iter().any(|k| text.contains(k)))
    }
}

#[async_trait]
impl DepartmentClassifier for KeywordClassifier {
    async fn classify(&self, description: &str) -> Result<Classification, ClassifierError> {
        if description.trim().is_empty() {
            return Err(ClassifierError("empty description".into()));
        }

        match Self::route(description) {
            Some(route) => Ok(Classification {
                category: route.category.to_string(),
                department: route.department,
            }),
            None if self.reject_unmatched => {
                Err(ClassifierError("no department matches the description".into()))
            }
            None => Ok(Classification {
                category: UNMATCHED_CATEGORY.to_string(),
                department: Department::Unassigned,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_routes_by_keyword() {
        let classifier = KeywordClassifier::default();
        let roads = classifier.classify("Huge pothole near the school").await.unwrap();
        assert_eq!(roads.department, Department::Roads);
        assert_eq!(roads.category, "Road Damage");

        let water = classifier.classify("TAP has been dry for days").await.unwrap();
        assert_eq!(water.department, Department::Water);
    }

    #[tokio::test]
    async fn test_unmatched_goes_unassigned() {
        let classifier = KeywordClassifier::new(false);
        let result = classifier.classify("noisy neighbours").await.unwrap();
        assert_eq!(result.department, Department::Unassigned);
        assert_eq!(result.category, UNMATCHED_CATEGORY);
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_unmatched() {
        let classifier = KeywordClassifier::new(true);
        assert!(classifier.classify("noisy neighbours").await.is_err());
        assert!(classifier.classify("   ").await.is_err());
    }
}
