use labwise_contracts::{
    classified::{ClassifiedSet, Direction},
    patient::PatientContext,
    pattern::PatternFinding,
};

use crate::recognizer::PatternRule;
use crate::rules::finding;

const TSH: &str = "tsh";
const FREE_T4: &str = "free_t4";

/// TSH read against free T4.
pub struct ThyroidRule;

impl PatternRule for ThyroidRule {
    fn id(&self) -> &str {
        "thyroid-function"
    }

    fn required_tests(&self) -> &[&str] {
        &[TSH, FREE_T4]
    }

    fn evaluate(&self, values: &ClassifiedSet, _patient: &PatientContext) -> Vec<PatternFinding> {
        let (Some(tsh), Some(ft4)) = (values.get(TSH), values.get(FREE_T4)) else {
            return vec![];
        };

        use Direction::{High, Low};
        let (name, note) = match (tsh.direction, ft4.direction) {
            (Some(High), Some(Low)) => ("primary hypothyroidism pattern", "high TSH with low free T4"),
            (Some(High), None) => (
                "subclinical hypothyroidism pattern",
                "high TSH with free T4 in range; repeat testing confirms persistence",
            ),
            (Some(Low), Some(High)) => ("hyperthyroidism pattern", "suppressed TSH with high free T4"),
            (Some(Low), None) => (
                "subclinical hyperthyroidism pattern",
                "suppressed TSH with free T4 in range",
            ),
            (Some(Low), Some(Low)) | (None, Some(Low)) => (
                "central hypothyroidism pattern",
                "low free T4 without a compensating TSH rise",
            ),
            (Some(High), Some(High)) => (
                "discordant thyroid profile",
                "TSH and free T4 both high; assay interference or TSH-secreting causes are possible",
            ),
            (None, Some(High)) | (None, None) => return vec![],
        };

        vec![finding(name, &[tsh, ft4], &[tsh, ft4], Some(note.to_string()))]
    }
}

#[cfg(test)]
mod tests {
    use labwise_contracts::patient::Gender;

    use super::ThyroidRule;
    use crate::recognizer::PatternRule;
    use crate::rules::fixtures::{classify, patient};

    fn name_for(tsh: f64, ft4: f64) -> Option<String> {
        let values = classify(Gender::Female, &[("TSH", tsh), ("Free_T4", ft4)]);
        ThyroidRule
            .evaluate(&values, &patient(Gender::Female, &[]))
            .into_iter()
            .next()
            .map(|f| f.name)
    }

    #[test]
    fn tsh_and_free_t4_combinations() {
        assert_eq!(name_for(9.0, 0.5).as_deref(), Some("primary hypothyroidism pattern"));
        assert_eq!(name_for(6.0, 1.2).as_deref(), Some("subclinical hypothyroidism pattern"));
        assert_eq!(name_for(0.1, 2.5).as_deref(), Some("hyperthyroidism pattern"));
        assert_eq!(name_for(0.2, 1.2).as_deref(), Some("subclinical hyperthyroidism pattern"));
        assert_eq!(name_for(1.0, 0.5).as_deref(), Some("central hypothyroidism pattern"));
        assert_eq!(name_for(8.0, 2.5).as_deref(), Some("discordant thyroid profile"));
    }

    #[test]
    fn euthyroid_values_do_not_fire() {
        assert_eq!(name_for(2.0, 1.2), None);
    }
}
