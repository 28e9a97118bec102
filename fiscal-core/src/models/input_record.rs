use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{LegalStructure, RevenueBand};
use crate::parsing::{coerce_amount, parse_amount};

/// Errors from the single gate the form applies before showing results.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("expected profit is required")]
    MissingExpectedProfit,

    #[error("expected profit must be a positive amount, got '{0}'")]
    NonPositiveExpectedProfit(String),
}

/// Answers collected by the six-step intake form.
///
/// Every field is free text exactly as the form submits it; absent fields
/// deserialize to the empty string. Interpretation happens through the
/// accessor methods, which never fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputRecord {
    // Company identity
    pub company_name: String,
    pub current_status: String,
    pub has_partners: String,
    pub partner_count: String,
    pub partner_percentages: String,

    // Business structure
    pub economic_sector: String,
    pub business_model: String,
    pub expected_revenue: String,
    pub has_employees: String,
    pub has_international_activity: String,

    // Accounting data
    pub annual_income: String,
    pub annual_expenses: String,
    pub annual_investment: String,
    pub activity_type: String,
    pub current_legal_form: String,
    pub cnae: String,
    pub expected_profit: String,

    // Tax strategy
    pub preferred_tax_structure: String,
    pub seeking_investors: String,
    pub has_special_deductions: String,
    pub interested_in_advanced_structures: String,

    // Operational data
    pub province: String,
    pub city: String,
    pub accounting_software: String,
    pub audit_required: String,

    // Risk profile
    pub has_inspections: String,
    pub risk_level: String,
}

fn is_affirmative(value: &str) -> bool {
    !matches!(value.trim(), "" | "no" | "none")
}

/// Company name shown when the form left it blank.
pub const DEFAULT_COMPANY_NAME: &str = "Empresa";

impl InputRecord {
    /// Company name, or [`DEFAULT_COMPANY_NAME`] when blank.
    pub fn company_name_or_default(&self) -> &str {
        match self.company_name.trim() {
            "" => DEFAULT_COMPANY_NAME,
            name => name,
        }
    }

    pub fn revenue_band(&self) -> RevenueBand {
        RevenueBand::parse(&self.expected_revenue)
    }

    /// Representative annual revenue for the selected band (0 when unknown).
    pub fn revenue(&self) -> Decimal {
        self.revenue_band().representative_amount()
    }

    /// Revenue used for simulation: the band amount, or the typed annual
    /// income when no band was selected.
    pub fn effective_revenue(&self) -> Decimal {
        match self.revenue_band() {
            RevenueBand::Unknown => coerce_amount(&self.annual_income).max(Decimal::ZERO),
            band => band.representative_amount(),
        }
    }

    pub fn has_partners(&self) -> bool {
        self.has_partners.trim() == "yes"
    }

    /// Number of partners; unparseable or empty values count as zero.
    pub fn partner_count(&self) -> u32 {
        self.partner_count.trim().parse().unwrap_or(0)
    }

    /// True for any answer other than blank, "no" or "none" (the form offers
    /// "few" and "many"). Deliberately broader than a strict `"yes"` match:
    /// every staffed tier adds the employee expense surcharge.
    pub fn has_employees(&self) -> bool {
        is_affirmative(&self.has_employees)
    }

    /// True for any answer other than blank, "no" or "none" (the form offers
    /// "occasional" and "regular"). Deliberately broader than a strict
    /// `"yes"` match, so occasional exporters also match export rules.
    pub fn has_international_activity(&self) -> bool {
        is_affirmative(&self.has_international_activity)
    }

    /// Special-deduction tags ticked on the form (`rdi`, `startup`, ...).
    pub fn special_deductions(&self) -> impl Iterator<Item = &str> {
        self.has_special_deductions
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty() && *tag != "none")
    }

    pub fn has_special_deduction(
        &self,
        tag: &str,
    ) -> bool {
        self.special_deductions().any(|t| t == tag)
    }

    /// Preferred structure, or `None` for "unsure" and blank answers.
    pub fn preferred_structure(&self) -> Option<LegalStructure> {
        LegalStructure::parse(&self.preferred_tax_structure)
    }

    pub fn expected_profit_amount(&self) -> Decimal {
        coerce_amount(&self.expected_profit)
    }

    /// The form's only gate before the results step: expected profit must be
    /// present and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when the profit is missing, non-numeric or not
    /// positive.
    pub fn validate_for_results(&self) -> Result<(), InputError> {
        if self.expected_profit.trim().is_empty() {
            return Err(InputError::MissingExpectedProfit);
        }
        match parse_amount(&self.expected_profit) {
            Ok(profit) if profit > Decimal::ZERO => Ok(()),
            _ => Err(InputError::NonPositiveExpectedProfit(
                self.expected_profit.clone(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn deserializes_camel_case_form_payload_with_missing_fields() {
        let json = r#"{
            "companyName": "Acme",
            "expectedRevenue": "30.000€ - 100.000€",
            "hasPartners": "yes",
            "hasSpecialDeductions": "rdi,startup,"
        }"#;

        let record: InputRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.company_name, "Acme");
        assert_eq!(record.revenue(), dec!(65000));
        assert!(record.has_partners());
        assert_eq!(record.economic_sector, "");
        assert_eq!(
            record.special_deductions().collect::<Vec<_>>(),
            vec!["rdi", "startup"]
        );
    }

    #[test]
    fn blank_company_name_falls_back_to_default() {
        let mut record = InputRecord {
            company_name: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(record.company_name_or_default(), "Empresa");

        record.company_name = " Acme ".to_string();
        assert_eq!(record.company_name_or_default(), "Acme");
    }

    #[test]
    fn flags_default_to_no() {
        let record = InputRecord::default();

        assert!(!record.has_partners());
        assert!(!record.has_employees());
        assert!(!record.has_international_activity());
        assert!(!record.has_special_deduction("startup"));
        assert_eq!(record.revenue(), Decimal::ZERO);
    }

    #[test]
    fn employee_and_international_answers_from_the_form_count_as_yes() {
        let record = InputRecord {
            has_employees: "few".to_string(),
            has_international_activity: "occasional".to_string(),
            ..Default::default()
        };

        assert!(record.has_employees());
        assert!(record.has_international_activity());

        let record = InputRecord {
            has_employees: "none".to_string(),
            has_international_activity: " no ".to_string(),
            ..Default::default()
        };

        assert!(!record.has_employees());
        assert!(!record.has_international_activity());
    }

    #[test]
    fn none_tag_is_not_a_special_deduction() {
        let record = InputRecord {
            has_special_deductions: "none,".to_string(),
            ..Default::default()
        };

        assert_eq!(record.special_deductions().count(), 0);
    }

    #[test]
    fn special_deduction_matches_whole_tags_only() {
        let record = InputRecord {
            has_special_deductions: "audiovisual,".to_string(),
            ..Default::default()
        };

        assert!(record.has_special_deduction("audiovisual"));
        assert!(!record.has_special_deduction("audio"));
    }

    #[test]
    fn partner_count_ignores_garbage() {
        let record = InputRecord {
            partner_count: "tres".to_string(),
            ..Default::default()
        };

        assert_eq!(record.partner_count(), 0);
    }

    #[test]
    fn validate_for_results_requires_positive_profit() {
        let mut record = InputRecord::default();
        assert_eq!(
            record.validate_for_results(),
            Err(InputError::MissingExpectedProfit)
        );

        record.expected_profit = "0".to_string();
        assert_eq!(
            record.validate_for_results(),
            Err(InputError::NonPositiveExpectedProfit("0".to_string()))
        );

        record.expected_profit = "abc".to_string();
        assert!(record.validate_for_results().is_err());

        record.expected_profit = "40.000".to_string();
        assert_eq!(record.validate_for_results(), Ok(()));
        assert_eq!(record.expected_profit_amount(), dec!(40000));
    }

    #[test]
    fn effective_revenue_prefers_band_over_typed_income() {
        let mut record = InputRecord {
            annual_income: "48.000".to_string(),
            ..Default::default()
        };
        assert_eq!(record.effective_revenue(), dec!(48000));

        record.expected_revenue = "Menos de 30.000€".to_string();
        assert_eq!(record.effective_revenue(), dec!(25000));
    }

    #[test]
    fn preferred_structure_ignores_unsure() {
        let record = InputRecord {
            preferred_tax_structure: "unsure".to_string(),
            ..Default::default()
        };

        assert_eq!(record.preferred_structure(), None);
    }
}
