//! Rule-registry pattern recognizer for Labwise.
//!
//! `RuleRegistry` implements the `PatternRecognizer` trait from
//! `labwise-core`. Recognition is a single pass over the registered rules in
//! registration order:
//!
//! 1. A rule whose required tests are not all present is skipped.
//! 2. Otherwise its `evaluate` runs and every finding it returns is kept.
//!
//! Rules are independent. The registry never merges, ranks, or suppresses
//! findings, even when two of them disagree.

use tracing::debug;

use labwise_contracts::{
    classified::ClassifiedSet,
    patient::PatientContext,
    pattern::{MedicationEffect, PatternFinding},
};
use labwise_core::traits::PatternRecognizer;

use crate::rules::{
    anemia::AnemiaSubtypeRule, glycemic::GlycemicRule, kidney::AzotemiaRule,
    liver::LiverInjuryRule, medication::MedicationCrossCheck, thyroid::ThyroidRule,
};

/// One cross-test pattern rule.
pub trait PatternRule: Send + Sync {
    /// Stable identifier used in logs.
    fn id(&self) -> &str;

    /// Catalog keys that must all be present for the rule to run.
    fn required_tests(&self) -> &[&str];

    /// Evaluate the rule. Only called when every required test is present.
    fn evaluate(&self, values: &ClassifiedSet, patient: &PatientContext) -> Vec<PatternFinding>;
}

/// The Labwise pattern recognizer.
///
/// Holds an ordered list of rules. Additional rules can be registered at
/// startup by the hosting application without touching the analyzer.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn PatternRule>>,
}

impl RuleRegistry {
    /// Create a registry with no rules registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in rule, using `effects` for the
    /// medication cross-check.
    pub fn with_default_rules(effects: &[MedicationEffect]) -> Self {
        let mut registry = Self::new();
        registry.register_rule(Box::new(AnemiaSubtypeRule));
        registry.register_rule(Box::new(LiverInjuryRule));
        registry.register_rule(Box::new(ThyroidRule));
        registry.register_rule(Box::new(AzotemiaRule));
        registry.register_rule(Box::new(GlycemicRule));
        registry.register_rule(Box::new(MedicationCrossCheck::new(effects.to_vec())));
        registry
    }

    /// Append `rule`; it runs after every rule registered before it.
    pub fn register_rule(&mut self, rule: Box<dyn PatternRule>) {
        self.rules.push(rule);
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

impl PatternRecognizer for RuleRegistry {
    fn recognize(&self, values: &ClassifiedSet, patient: &PatientContext) -> Vec<PatternFinding> {
        let mut findings = Vec::new();

        for rule in &self.rules {
            if !values.contains_all(rule.required_tests()) {
                debug!(
                    rule_id = %rule.id(),
                    required = ?rule.required_tests(),
                    "required tests missing; rule skipped"
                );
                continue;
            }

            let found = rule.evaluate(values, patient);
            for finding in &found {
                debug!(
                    rule_id = %rule.id(),
                    finding = %finding.name,
                    qualifier = ?finding.qualifier,
                    "pattern fired"
                );
            }
            findings.extend(found);
        }

        findings
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use labwise_contracts::{
        classified::ClassifiedSet,
        patient::{Gender, PatientContext},
        pattern::{PatternFinding, Qualifier},
    };
    use labwise_core::traits::PatternRecognizer;

    use super::{PatternRule, RuleRegistry};
    use crate::rules::fixtures::{classify, patient};

    struct AlwaysFires(&'static str, &'static [&'static str]);

    impl PatternRule for AlwaysFires {
        fn id(&self) -> &str {
            self.0
        }

        fn required_tests(&self) -> &[&str] {
            self.1
        }

        fn evaluate(&self, _values: &ClassifiedSet, _patient: &PatientContext) -> Vec<PatternFinding> {
            vec![PatternFinding {
                name: self.0.to_string(),
                evidence: vec![],
                qualifier: Qualifier::Possible,
                note: None,
            }]
        }
    }

    #[test]
    fn rules_run_only_when_required_tests_present() {
        let mut registry = RuleRegistry::new();
        registry.register_rule(Box::new(AlwaysFires("needs-hgb", &["hemoglobin"])));
        registry.register_rule(Box::new(AlwaysFires("needs-tsh", &["tsh"])));

        let values = classify(Gender::Male, &[("Hemoglobin", 14.0)]);
        let findings = registry.recognize(&values, &patient(Gender::Male, &[]));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "needs-hgb");
    }

    #[test]
    fn findings_follow_registration_order() {
        let mut registry = RuleRegistry::new();
        registry.register_rule(Box::new(AlwaysFires("second", &[])));
        registry.register_rule(Box::new(AlwaysFires("first", &[])));

        let findings = registry.recognize(&ClassifiedSet::default(), &patient(Gender::Female, &[]));
        let names: Vec<&str> = findings.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn default_registry_lists_builtin_rules() {
        let registry = RuleRegistry::with_default_rules(&[]);
        assert_eq!(
            registry.rule_ids(),
            vec!["anemia-subtype", "liver-injury", "thyroid-function", "azotemia", "glycemic-status", "medication-cross-check"]
        );
    }

    #[test]
    fn independent_patterns_fire_together() {
        let registry = RuleRegistry::with_default_rules(&[]);
        let values = classify(
            Gender::Female,
            &[
                ("Hemoglobin", 9.5),
                ("MCV", 72.0),
                ("TSH", 9.0),
                ("Free_T4", 0.5),
            ],
        );

        let findings = registry.recognize(&values, &patient(Gender::Female, &[]));
        let names: Vec<&str> = findings.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["microcytic anemia", "primary hypothyroidism pattern"]);
    }
}
