use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Applicability, DeductionMeta, LegalStructure};

/// A deduction that survived validation, with the caveats to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedDeduction {
    pub name: String,
    pub warnings: Vec<String>,
}

/// Applicability and incompatibility metadata for known deductions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeductionCatalog {
    entries: BTreeMap<String, DeductionMeta>,
}

impl DeductionCatalog {
    pub fn new(entries: BTreeMap<String, DeductionMeta>) -> Self {
        Self { entries }
    }

    /// Corporate-tax deductions referenced by the built-in rules.
    pub fn spanish_defaults() -> Self {
        const STARTUP_RATE: &str = "Tipo reducido IS para startups (15% primeros dos períodos)";

        let company_only = |incompatible_with: &[&str], warnings: &[&str]| DeductionMeta {
            applicable_to: Applicability::LimitedCompany,
            incompatible_with: incompatible_with.iter().map(|s| (*s).to_string()).collect(),
            warnings: warnings.iter().map(|s| (*s).to_string()).collect(),
        };

        let entries = [
            (STARTUP_RATE, company_only(&[], &[])),
            (
                "Reserva de capitalización (10% sobre beneficios retenidos)",
                company_only(&[STARTUP_RATE], &["Límite máximo por empresa"]),
            ),
            (
                "Deducción del 25% sobre gastos I+D+i",
                company_only(&[], &["Esta deducción requiere informe motivado"]),
            ),
            (
                "Deducción adicional del 17% si supera la media de los dos años anteriores",
                company_only(&[], &[]),
            ),
            (
                "Deducción del 8% sobre inversiones en activos afectos a I+D+i",
                company_only(&[], &[]),
            ),
            (
                "Exención en IS por rentas obtenidas en el extranjero",
                company_only(&[], &[]),
            ),
            (
                "Deducción por doble imposición internacional",
                company_only(&[], &[]),
            ),
        ]
        .into_iter()
        .map(|(name, meta)| (name.to_string(), meta))
        .collect();

        Self { entries }
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&DeductionMeta> {
        self.entries.get(name)
    }

    fn incompatible(
        &self,
        a: &str,
        b: &str,
    ) -> bool {
        self.get(a).is_some_and(|meta| meta.is_incompatible_with(b))
            || self.get(b).is_some_and(|meta| meta.is_incompatible_with(a))
    }

    /// Filters `names` down to the deductions `target` can claim together.
    ///
    /// Names are processed in order. A known deduction is dropped when it is
    /// company-only and `target` is not incorporated, or when it conflicts (in either direction) with a
    /// deduction already accepted, so the first of two incompatible names
    /// wins. Unknown names pass through without warnings.
    pub fn validate<S: AsRef<str>>(
        &self,
        names: &[S],
        target: LegalStructure,
    ) -> Vec<ValidatedDeduction> {
        let mut accepted: Vec<ValidatedDeduction> = Vec::new();

        for name in names.iter().map(AsRef::as_ref) {
            let Some(meta) = self.get(name) else {
                accepted.push(ValidatedDeduction {
                    name: name.to_string(),
                    warnings: Vec::new(),
                });
                continue;
            };

            if !meta.applicable_to.allows(target) {
                debug!(deduction = name, %target, "deduction not applicable");
                continue;
            }

            if let Some(conflict) = accepted.iter().find(|a| self.incompatible(name, &a.name)) {
                debug!(
                    deduction = name,
                    conflicts_with = %conflict.name,
                    "incompatible deduction skipped"
                );
                continue;
            }

            accepted.push(ValidatedDeduction {
                name: name.to_string(),
                warnings: meta.warnings.clone(),
            });
        }

        accepted
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const STARTUP: &str = "Tipo reducido IS para startups (15% primeros dos períodos)";
    const RESERVE: &str = "Reserva de capitalización (10% sobre beneficios retenidos)";
    const RDI: &str = "Deducción del 25% sobre gastos I+D+i";

    fn names(validated: &[ValidatedDeduction]) -> Vec<&str> {
        validated.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn company_only_deductions_are_dropped_for_self_employed() {
        let catalog = DeductionCatalog::spanish_defaults();

        let validated = catalog.validate(
            &[STARTUP, "Gastos de formación (100% deducibles)", RDI],
            LegalStructure::SelfEmployed,
        );

        assert_eq!(names(&validated), vec!["Gastos de formación (100% deducibles)"]);
    }

    #[test]
    fn first_of_incompatible_pair_wins() {
        let catalog = DeductionCatalog::spanish_defaults();

        let startup_first = catalog.validate(&[STARTUP, RESERVE], LegalStructure::LimitedCompany);
        let reserve_first = catalog.validate(&[RESERVE, STARTUP], LegalStructure::LimitedCompany);

        assert_eq!(names(&startup_first), vec![STARTUP]);
        assert_eq!(names(&reserve_first), vec![RESERVE]);
    }

    #[test]
    fn accepted_deductions_carry_their_warnings() {
        let catalog = DeductionCatalog::spanish_defaults();

        let validated = catalog.validate(&[RDI], LegalStructure::LimitedCompany);

        assert_eq!(
            validated,
            vec![ValidatedDeduction {
                name: RDI.to_string(),
                warnings: vec!["Esta deducción requiere informe motivado".to_string()],
            }]
        );
    }

    #[test]
    fn unknown_names_pass_without_warnings() {
        let catalog = DeductionCatalog::spanish_defaults();

        let validated = catalog.validate(&["IVA 0% en exportaciones"], LegalStructure::SelfEmployed);

        assert_eq!(names(&validated), vec!["IVA 0% en exportaciones"]);
        assert!(validated[0].warnings.is_empty());
    }

    #[test]
    fn cooperatives_may_claim_company_deductions() {
        let catalog = DeductionCatalog::spanish_defaults();

        let validated = catalog.validate(&[STARTUP], LegalStructure::Cooperative);

        assert_eq!(names(&validated), vec![STARTUP]);
    }

    #[test]
    fn catalog_deserializes_from_json() {
        let json = format!(
            r#"{{"{RESERVE}": {{"applicableTo": "sl", "incompatibleWith": ["{STARTUP}"]}}}}"#
        );

        let catalog: DeductionCatalog = serde_json::from_str(&json).unwrap();

        assert!(catalog.get(RESERVE).unwrap().is_incompatible_with(STARTUP));
        assert_eq!(
            catalog.get(RESERVE).unwrap().applicable_to,
            Applicability::LimitedCompany
        );
    }

    #[test]
    fn self_employed_only_deduction_is_kept_for_company_target() {
        let json = r#"{"Gastos de suministros": {"applicableTo": "autonomo"}}"#;
        let catalog: DeductionCatalog = serde_json::from_str(json).unwrap();

        let validated = catalog.validate(&["Gastos de suministros"], LegalStructure::LimitedCompany);

        assert_eq!(names(&validated), vec!["Gastos de suministros"]);
    }

    // ---------------------------------------------------------------
    // Proptest: no incompatible pair survives validation
    // ---------------------------------------------------------------

    use proptest::prelude::*;
    use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence, RngAlgorithm};

    fn deduction_proptest_config() -> ProptestConfig {
        ProptestConfig {
            cases: 64,
            source_file: Some(file!()),
            failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
                "proptest-regressions",
            ))),
            rng_algorithm: RngAlgorithm::ChaCha,
            ..ProptestConfig::default()
        }
    }

    /// Names drawn mostly from the catalog, with some unknown ones mixed in.
    fn names_strategy() -> impl Strategy<Value = Vec<String>> {
        let catalog = DeductionCatalog::spanish_defaults();
        let mut pool: Vec<String> = catalog.entries.keys().cloned().collect();
        pool.push("Gastos de representación".to_string());
        pool.push("IVA 0% en exportaciones".to_string());
        prop::collection::vec(prop::sample::select(pool), 0..12)
    }

    fn target_strategy() -> impl Strategy<Value = LegalStructure> {
        prop_oneof![
            Just(LegalStructure::SelfEmployed),
            Just(LegalStructure::LimitedCompany),
            Just(LegalStructure::Cooperative),
            Just(LegalStructure::CivilPartnership),
        ]
    }

    proptest! {
        #![proptest_config(deduction_proptest_config())]

        #[test]
        fn validate_never_returns_incompatible_pair(
            requested in names_strategy(),
            target in target_strategy(),
        ) {
            let catalog = DeductionCatalog::spanish_defaults();

            let validated = catalog.validate(requested.as_slice(), target);

            for (i, a) in validated.iter().enumerate() {
                for b in &validated[i + 1..] {
                    prop_assert!(
                        !catalog.incompatible(&a.name, &b.name),
                        "{} and {} are incompatible",
                        a.name,
                        b.name
                    );
                }
                if let Some(meta) = catalog.get(&a.name) {
                    prop_assert!(
                        !(meta.applicable_to == Applicability::LimitedCompany
                            && !target.is_incorporated()),
                        "{} is company-only",
                        a.name
                    );
                }
            }
        }
    }
}
