//! Built-in Spanish rule and regime tables (2024 regulations).

use rust_decimal::Decimal;

use crate::models::{FiscalRule, LegalStructure, RuleCondition, TaxRegime};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// The six default recommendation rules, in priority order.
pub fn default_rules() -> Vec<FiscalRule> {
    vec![
        FiscalRule {
            id: "low_revenue_autonomo".to_string(),
            name: "Facturación baja - Régimen de autónomos".to_string(),
            condition: RuleCondition::RevenueBelow {
                amount: Decimal::from(30_000),
            },
            recommendation: "Para facturaciones inferiores a 30.000€, el régimen de autónomos es más beneficioso fiscalmente.".to_string(),
            structure: Some(LegalStructure::SelfEmployed),
            deductions: strings(&[
                "Gastos de suministros (30% máximo sin justificación)",
                "Amortización de vehículo (50% uso profesional)",
                "Gastos de formación (100% deducibles)",
            ]),
            risks: strings(&["Retenciones del 15% en facturas a empresas"]),
            priority: 1,
        },
        FiscalRule {
            id: "medium_revenue_partners_sl".to_string(),
            name: "Facturación media con socios - Sociedad Limitada".to_string(),
            condition: RuleCondition::All {
                conditions: vec![
                    RuleCondition::RevenueBetween {
                        min: Decimal::from(30_000),
                        max: Decimal::from(100_000),
                    },
                    RuleCondition::HasPartners,
                ],
            },
            recommendation: "Con socios y facturación entre 30.000€-100.000€, la SL permite mejor reparto de beneficios.".to_string(),
            structure: Some(LegalStructure::LimitedCompany),
            deductions: strings(&[
                "Gastos de constitución (100% deducibles)",
                "Sueldos de administradores",
                "Gastos de representación",
            ]),
            risks: strings(&[
                "Obligación de llevar contabilidad mercantil",
                "Depósito de cuentas en Registro Mercantil",
            ]),
            priority: 2,
        },
        FiscalRule {
            id: "high_revenue_sl".to_string(),
            name: "Facturación alta - Sociedad Limitada obligatoria".to_string(),
            condition: RuleCondition::RevenueAbove {
                amount: Decimal::from(100_000),
            },
            recommendation: "Para facturaciones superiores a 100.000€, la SL ofrece ventajas fiscales significativas.".to_string(),
            structure: Some(LegalStructure::LimitedCompany),
            deductions: strings(&[
                "Tipo reducido IS para startups (15% primeros dos períodos)",
                "Reserva de capitalización (10% sobre beneficios retenidos)",
                "Libertad de amortización para inversiones",
            ]),
            risks: strings(&["Auditoría obligatoria si supera límites del art. 263 LSC"]),
            priority: 3,
        },
        FiscalRule {
            id: "rdi_deductions".to_string(),
            name: "Deducciones por I+D+i".to_string(),
            condition: RuleCondition::SpecialDeduction {
                tag: "rdi".to_string(),
            },
            recommendation: "Las actividades de I+D+i tienen importantes deducciones fiscales.".to_string(),
            structure: None,
            deductions: strings(&[
                "Deducción del 25% sobre gastos I+D+i",
                "Deducción adicional del 17% si supera la media de los dos años anteriores",
                "Deducción del 8% sobre inversiones en activos afectos a I+D+i",
            ]),
            risks: strings(&[
                "Requiere documentación técnica específica",
                "Posible inspección especializada",
            ]),
            priority: 4,
        },
        FiscalRule {
            id: "tech_sector_benefits".to_string(),
            name: "Beneficios sector tecnológico".to_string(),
            condition: RuleCondition::Sector {
                name: "Tecnología e Informática".to_string(),
            },
            recommendation: "El sector tecnológico tiene ventajas fiscales específicas.".to_string(),
            structure: None,
            deductions: strings(&[
                "Amortización libre de equipos informáticos",
                "Gastos de desarrollo de software (100% deducibles)",
                "Formación tecnológica de empleados",
            ]),
            risks: Vec::new(),
            priority: 5,
        },
        FiscalRule {
            id: "export_benefits".to_string(),
            name: "Beneficios por exportación".to_string(),
            condition: RuleCondition::InternationalActivity,
            recommendation: "Las empresas exportadoras tienen incentivos fiscales.".to_string(),
            structure: None,
            deductions: strings(&[
                "Exención en IS por rentas obtenidas en el extranjero",
                "Deducción por doble imposición internacional",
                "IVA 0% en exportaciones",
            ]),
            risks: Vec::new(),
            priority: 6,
        },
    ]
}

/// Reference regimes. The first entry doubles as the fallback
/// recommendation.
pub fn default_regimes() -> Vec<TaxRegime> {
    vec![
        TaxRegime {
            kind: LegalStructure::SelfEmployed,
            name: "Autónomo - Estimación Directa Simplificada".to_string(),
            income_tax_rate: Some(Decimal::from(19)),
            corporate_tax_rate: None,
            vat_rate: Decimal::from(21),
            min_revenue: None,
            max_revenue: Some(Decimal::from(600_000)),
            social_security_base: Some(Decimal::new(95_000, 2)),
        },
        TaxRegime {
            kind: LegalStructure::SelfEmployed,
            name: "Autónomo - Estimación Objetiva (Módulos)".to_string(),
            income_tax_rate: Some(Decimal::from(19)),
            corporate_tax_rate: None,
            vat_rate: Decimal::from(21),
            min_revenue: None,
            max_revenue: Some(Decimal::from(250_000)),
            social_security_base: Some(Decimal::new(95_000, 2)),
        },
        TaxRegime {
            kind: LegalStructure::LimitedCompany,
            name: "Sociedad Limitada".to_string(),
            income_tax_rate: None,
            corporate_tax_rate: Some(Decimal::from(25)),
            vat_rate: Decimal::from(21),
            min_revenue: None,
            max_revenue: None,
            social_security_base: None,
        },
        TaxRegime {
            kind: LegalStructure::Cooperative,
            name: "Cooperativa de Trabajo Asociado".to_string(),
            income_tax_rate: None,
            corporate_tax_rate: Some(Decimal::from(20)),
            vat_rate: Decimal::from(21),
            min_revenue: None,
            max_revenue: None,
            social_security_base: None,
        },
        TaxRegime {
            kind: LegalStructure::CivilPartnership,
            name: "Comunidad de Bienes".to_string(),
            income_tax_rate: Some(Decimal::from(19)),
            corporate_tax_rate: None,
            vat_rate: Decimal::from(21),
            min_revenue: None,
            max_revenue: None,
            social_security_base: Some(Decimal::new(95_000, 2)),
        },
    ]
}
