use std::collections::BTreeMap;

use rust_decimal_macros::dec;

use crate::models::*;

pub(crate) fn spanish_brackets() -> IncomeTaxSchedule {
    let rows = [
        (dec!(0), Some(dec!(12450)), dec!(19)),
        (dec!(12450), Some(dec!(20200)), dec!(24)),
        (dec!(20200), Some(dec!(35200)), dec!(30)),
        (dec!(35200), Some(dec!(60000)), dec!(37)),
        (dec!(60000), Some(dec!(300000)), dec!(47)),
        (dec!(300000), None, dec!(47)),
    ];
    IncomeTaxSchedule::new(
        rows.into_iter()
            .map(|(min, max, rate)| RateBracket { min, max, rate })
            .collect(),
    )
    .unwrap()
}

/// 2024 policy used across the unit tests.
pub(crate) fn test_config() -> FiscalYearConfig {
    let sector_ratios: BTreeMap<String, _> = [
        ("Tecnología e Informática", dec!(0.35)),
        ("Consultoría y Servicios Profesionales", dec!(0.25)),
        ("Comercio", dec!(0.60)),
        ("Hostelería y Restauración", dec!(0.65)),
        ("Construcción", dec!(0.55)),
        ("Industria", dec!(0.50)),
        ("Educación", dec!(0.20)),
        ("Salud", dec!(0.30)),
    ]
    .into_iter()
    .map(|(sector, ratio)| (sector.to_string(), ratio))
    .collect();

    FiscalYearConfig {
        tax_year: 2024,
        income_tax: spanish_brackets(),
        corporate: CorporateTaxPolicy {
            general_rate: dec!(25),
            reduced_rate: dec!(15),
            preferential_threshold: dec!(300000),
            cooperative_rate: dec!(20),
        },
        vat: VatPolicy {
            rate: dec!(21),
            effective_factor: dec!(0.8),
        },
        contributions: ContributionPolicy {
            self_employed_minimum_monthly: dec!(294.30),
            monthly_base_floor: dec!(900),
            monthly_base_ceiling: dec!(4070),
            self_employed_rate: dec!(0.3065),
            employee_rate: dec!(0.2955),
            months: 12,
        },
        expenses: ExpensePolicy {
            sector_ratios,
            default_ratio: dec!(0.30),
            employee_surcharge: dec!(0.15),
            max_ratio: dec!(0.70),
        },
        compensation: CompensationPolicy {
            salary_ratio: dec!(0.30),
            company_salary_cap: dec!(60000),
            cooperative_salary_cap: dec!(50000),
        },
    }
}

pub(crate) fn tech_input(revenue_label: &str) -> InputRecord {
    InputRecord {
        company_name: "Acme Software".to_string(),
        economic_sector: "Tecnología e Informática".to_string(),
        expected_revenue: revenue_label.to_string(),
        has_employees: "no".to_string(),
        has_partners: "no".to_string(),
        expected_profit: "40000".to_string(),
        ..Default::default()
    }
}
