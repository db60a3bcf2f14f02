//! Tree-walking evaluation of compiled HQL expressions.

use crate::histogram::FrequencyModels;
use crate::query::parser::QueryNode;

/// Evaluates expression trees against the frequency models of one document
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    models: FrequencyModels<'a>,
}

impl<'a> Evaluator<'a> {
    pub fn new(models: FrequencyModels<'a>) -> Self {
        Self { models }
    }

    pub fn eval(&self, node: &QueryNode) -> bool {
        match node {
            QueryNode::And(children) => children.iter().all(|c| self.eval(c)),
            QueryNode::Or(children) => children.iter().any(|c| self.eval(c)),
            QueryNode::Not(child) => !self.eval(child),
            QueryNode::GreaterThan { terms, threshold } => self.sum(terms) > *threshold,
            QueryNode::Value(term) => self.models.contains(term),
        }
    }

    /// Summed counts of `terms`, each looked up in its own model
    fn sum(&self, terms: &[String]) -> u64 {
        terms
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(self.models.count(t)))
    }
}

/// Evaluate a single expression against a document
pub fn matches(node: &QueryNode, models: FrequencyModels<'_>) -> bool {
    Evaluator::new(models).eval(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Histogram;

    fn value(t: &str) -> QueryNode {
        QueryNode::Value(t.to_string())
    }

    fn hist(entries: &[(&str, u64)]) -> Histogram {
        entries.iter().map(|&(t, c)| (t, c)).collect()
    }

    fn gt(terms: &[&str], threshold: u64) -> QueryNode {
        QueryNode::GreaterThan {
            terms: terms.iter().map(|t| t.to_string()).collect(),
            threshold,
        }
    }

    #[test]
    fn test_value_presence() {
        let h = hist(&[("a", 1)]);
        let m = FrequencyModels::single(&h);
        assert!(matches(&value("a"), m));
        assert!(!matches(&value("b"), m));
    }

    #[test]
    fn test_and_or_truth_tables() {
        let h = hist(&[("t", 1)]);
        let m = FrequencyModels::single(&h);
        let (t, f) = (value("t"), value("f"));

        assert!(matches(&QueryNode::And(vec![t.clone(), t.clone()]), m));
        assert!(!matches(&QueryNode::And(vec![t.clone(), f.clone()]), m));
        assert!(!matches(&QueryNode::And(vec![f.clone(), f.clone()]), m));

        assert!(matches(&QueryNode::Or(vec![f.clone(), t.clone()]), m));
        assert!(matches(&QueryNode::Or(vec![t.clone(), t.clone()]), m));
        assert!(!matches(&QueryNode::Or(vec![f.clone(), f]), m));
    }

    #[test]
    fn test_double_negation() {
        let h = hist(&[("a", 1)]);
        let m = FrequencyModels::single(&h);
        for node in [value("a"), value("b"), gt(&["a"], 0), gt(&["a"], 1)] {
            let twice = QueryNode::Not(Box::new(QueryNode::Not(Box::new(node.clone()))));
            assert_eq!(matches(&twice, m), matches(&node, m));
            let once = QueryNode::Not(Box::new(node.clone()));
            assert_ne!(matches(&once, m), matches(&node, m));
        }
    }

    #[test]
    fn test_greater_than_is_strict() {
        let above = hist(&[("w", 11)]);
        let equal = hist(&[("w", 10)]);
        assert!(matches(&gt(&["w"], 10), FrequencyModels::single(&above)));
        assert!(!matches(&gt(&["w"], 10), FrequencyModels::single(&equal)));
    }

    #[test]
    fn test_greater_than_sums_terms_across_models() {
        let single = hist(&[("a", 3), ("b", 2)]);
        let compound = hist(&[("a b", 4)]);
        let m = FrequencyModels::with_compound(&single, &compound);

        assert!(matches(&gt(&["a", "b", "a b", "missing"], 8), m));
        assert!(!matches(&gt(&["a", "b", "a b", "missing"], 9), m));
    }

    #[test]
    fn test_greater_than_zero_threshold_needs_one_occurrence() {
        let empty = Histogram::new();
        assert!(!matches(&gt(&["x"], 0), FrequencyModels::single(&empty)));
    }

    #[test]
    fn test_compound_lookup() {
        let single = Histogram::new();
        let compound = hist(&[("a b", 1)]);
        assert!(matches(
            &value("a b"),
            FrequencyModels::with_compound(&single, &compound)
        ));

        // Without a compound model the single model answers
        let single = hist(&[("a b", 1)]);
        assert!(matches(&value("a b"), FrequencyModels::single(&single)));

        let empty = Histogram::new();
        assert!(!matches(&value("a b"), FrequencyModels::single(&empty)));
    }

    #[test]
    fn test_saturating_sum() {
        let h = hist(&[("a", u64::MAX), ("b", 5)]);
        assert!(matches(&gt(&["a", "b"], u64::MAX - 1), FrequencyModels::single(&h)));
    }
}
