use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The customer pain point, wish, or desire driving the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Opportunity {
    pub description: String,
    pub who: Option<String>,
    pub context: Option<String>,
    pub frequency: Option<String>,
    pub impact: Option<String>,
    pub current_solutions: Option<String>,
    pub additional_notes: Option<String>,
}

/// Product and business context gathered in phase 2. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductContext {
    pub icp: Option<String>,
    pub vision: Option<String>,
    pub product_description: Option<String>,
    pub primary_metric: Option<String>,
    pub constraints: Option<String>,
}

impl ProductContext {
    pub fn provided_count(&self) -> usize {
        [
            &self.icp,
            &self.vision,
            &self.product_description,
            &self.primary_metric,
            &self.constraints,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}

/// Named evaluation criteria with integer importance weights in [1,5].
///
/// `criteria_list` preserves collection order; `weights` holds exactly one
/// entry per listed name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CriteriaSet {
    pub criteria_list: Vec<String>,
    pub weights: HashMap<String, u8>,
}

impl CriteriaSet {
    pub fn new(pairs: Vec<(String, u8)>) -> Self {
        let mut criteria_list = Vec::with_capacity(pairs.len());
        let mut weights = HashMap::with_capacity(pairs.len());
        for (name, weight) in pairs {
            weights.insert(name.clone(), weight);
            criteria_list.push(name);
        }
        Self { criteria_list, weights }
    }

    pub fn is_empty(&self) -> bool {
        self.criteria_list.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria_list.len()
    }

    /// Name/weight pairs in collection order.
    pub fn pairs(&self) -> Vec<(&str, u8)> {
        self.criteria_list
            .iter()
            .map(|name| (name.as_str(), self.weights.get(name).copied().unwrap_or(0)))
            .collect()
    }

    /// Pairs sorted by descending weight; ties keep collection order.
    pub fn pairs_by_weight_desc(&self) -> Vec<(&str, u8)> {
        let mut pairs = self.pairs();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs
    }

    pub fn total_weight(&self) -> u32 {
        self.pairs().iter().map(|(_, w)| *w as u32).sum()
    }

    /// Mean importance weight. None for an empty set; callers must reject
    /// empty sets before any scoring.
    pub fn average_weight(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.total_weight() as f64 / self.len() as f64)
    }
}

/// A competitor or alternative-solution reference with optional observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitiveInsight {
    pub url: String,
    pub notes: Option<String>,
}

/// A seed idea the user provides to calibrate generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleIdea {
    pub id: usize,
    pub description: String,
    pub word_count: usize,
    pub char_count: usize,
}

impl ExampleIdea {
    /// Word and character counts are derived from the description here and
    /// nowhere else.
    pub fn new(id: usize, description: String) -> Self {
        let word_count = description.split_whitespace().count();
        let char_count = description.chars().count();
        Self { id, description, word_count, char_count }
    }
}

/// Aggregate shape of the collected examples, used in the phase 5 summary.
#[derive(Debug, Clone, Serialize)]
pub struct ExamplePatterns {
    pub avg_length: usize,
    pub avg_word_count: usize,
    pub detail_level: &'static str,
}

impl ExamplePatterns {
    pub fn analyze(examples: &[ExampleIdea]) -> Option<Self> {
        if examples.is_empty() {
            return None;
        }
        let avg_length = examples.iter().map(|e| e.char_count).sum::<usize>() / examples.len();
        let avg_word_count = examples.iter().map(|e| e.word_count).sum::<usize>() / examples.len();
        let detail_level = if avg_length > 300 {
            "detailed"
        } else if avg_length > 100 {
            "concise"
        } else {
            "brief"
        };
        Some(Self { avg_length, avg_word_count, detail_level })
    }
}

/// One generated solution idea. `rank` is set on at most the top three
/// ideas of a result set and ranks are a contiguous 1..=3 when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedIdea {
    pub title: String,
    pub content: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u8>,
}

/// Everything a session collects, owned exclusively by the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub opportunity: Opportunity,
    pub context: ProductContext,
    pub criteria: CriteriaSet,
    pub competitive_insights: Vec<CompetitiveInsight>,
    pub example_ideas: Vec<ExampleIdea>,
    pub generated_ideas: Vec<GeneratedIdea>,
    pub phase: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(pairs: &[(&str, u8)]) -> CriteriaSet {
        CriteriaSet::new(pairs.iter().map(|(n, w)| (n.to_string(), *w)).collect())
    }

    #[test]
    fn test_pairs_keep_collection_order() {
        let set = criteria(&[("impact", 5), ("effort", 2), ("innovation", 4)]);
        let names: Vec<&str> = set.pairs().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["impact", "effort", "innovation"]);
    }

    #[test]
    fn test_pairs_by_weight_desc_breaks_ties_by_collection_order() {
        let set = criteria(&[("confidence", 3), ("impact", 5), ("effort", 3), ("innovation", 5)]);
        let sorted: Vec<&str> = set.pairs_by_weight_desc().iter().map(|(n, _)| *n).collect();
        assert_eq!(sorted, vec!["impact", "innovation", "confidence", "effort"]);
    }

    #[test]
    fn test_average_weight() {
        let set = criteria(&[("a", 5), ("b", 3)]);
        assert_eq!(set.average_weight(), Some(4.0));
    }

    #[test]
    fn test_average_weight_empty_is_none() {
        assert!(CriteriaSet::default().average_weight().is_none());
    }

    #[test]
    fn test_example_idea_derives_counts() {
        let idea = ExampleIdea::new(1, "a smart onboarding checklist".to_string());
        assert_eq!(idea.word_count, 4);
        assert_eq!(idea.char_count, 28);
    }

    #[test]
    fn test_pattern_analysis_detail_levels() {
        let brief = vec![ExampleIdea::new(1, "short".to_string())];
        assert_eq!(ExamplePatterns::analyze(&brief).unwrap().detail_level, "brief");

        let concise = vec![ExampleIdea::new(1, "x".repeat(150))];
        assert_eq!(ExamplePatterns::analyze(&concise).unwrap().detail_level, "concise");

        let detailed = vec![ExampleIdea::new(1, "x".repeat(400))];
        assert_eq!(ExamplePatterns::analyze(&detailed).unwrap().detail_level, "detailed");
    }

    #[test]
    fn test_pattern_analysis_empty() {
        assert!(ExamplePatterns::analyze(&[]).is_none());
    }

    #[test]
    fn test_provided_count() {
        let mut ctx = ProductContext::default();
        assert_eq!(ctx.provided_count(), 0);
        ctx.icp = Some("indie developers".to_string());
        ctx.primary_metric = Some("weekly active teams".to_string());
        assert_eq!(ctx.provided_count(), 2);
    }
}
