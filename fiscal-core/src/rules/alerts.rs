//! Profile-driven alerts and the upcoming filing calendar.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::InputRecord;

/// Revenue above which statutory audit becomes mandatory.
const AUDIT_REVENUE_THRESHOLD: Decimal = Decimal::from_parts(600_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiscalAlert {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const AUDIT_ALERT: FiscalAlert = FiscalAlert {
    id: "audit_alert",
    title: "Auditoría obligatoria",
    description: "Al superar 600.000€ de ingresos, la ley exige auditar las cuentas (art. 263 LSC).",
};

const PARTNERS_PACT: FiscalAlert = FiscalAlert {
    id: "partners_pact",
    title: "Pactos de socios",
    description: "Es recomendable formalizar pactos de socios que regulen las entradas, salidas y reparto de beneficios.",
};

const DOUBLE_TAXATION: FiscalAlert = FiscalAlert {
    id: "double_taxation",
    title: "Doble imposición",
    description: "Revise convenios para evitar la doble imposición internacional y presente los modelos correspondientes.",
};

const LEGAL_CHANGE: FiscalAlert = FiscalAlert {
    id: "legal_change",
    title: "Cambio de forma jurídica",
    description: "El cambio de forma jurídica implica gastos notariales, registros y diversos trámites administrativos.",
};

/// Alerts that apply to the business profile, in a fixed order.
pub fn fiscal_alerts(input: &InputRecord) -> Vec<FiscalAlert> {
    let mut alerts = Vec::new();

    if input.revenue() > AUDIT_REVENUE_THRESHOLD {
        alerts.push(AUDIT_ALERT);
    }
    if input.has_partners() {
        alerts.push(PARTNERS_PACT);
    }
    if input.has_international_activity() {
        alerts.push(DOUBLE_TAXATION);
    }

    let preferred = input.preferred_tax_structure.trim();
    if input.current_status.trim() == "operational" && !preferred.is_empty() && preferred != "unsure"
    {
        alerts.push(LEGAL_CHANGE);
    }

    alerts
}

/// A tax form and the next date it must be filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxObligation {
    pub model: &'static str,
    pub due_date: NaiveDate,
}

const SPANISH_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

impl TaxObligation {
    /// Due date in the short Spanish form, e.g. `20 oct 2024`.
    pub fn due_date_es(&self) -> String {
        let month = SPANISH_MONTHS[self.due_date.month0() as usize];
        format!(
            "{:02} {} {}",
            self.due_date.day(),
            month,
            self.due_date.year()
        )
    }
}

/// Filing calendar: form name and the (month, day) deadlines in a year.
const FILING_CALENDAR: [(&str, &[(u32, u32)]); 3] = [
    // Annual corporate tax return
    ("Modelo 200", &[(7, 25)]),
    // Quarterly VAT
    ("Modelo 303", &[(1, 30), (4, 20), (7, 20), (10, 20)]),
    // Quarterly withholdings
    ("Modelo 111", &[(1, 20), (4, 20), (7, 20), (10, 20)]),
];

fn next_occurrence(
    month: u32,
    day: u32,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year > today {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    }
}

/// Next deadline strictly after `today` for each form in the calendar.
pub fn upcoming_obligations(today: NaiveDate) -> Vec<TaxObligation> {
    FILING_CALENDAR
        .iter()
        .filter_map(|(model, deadlines)| {
            deadlines
                .iter()
                .filter_map(|(month, day)| next_occurrence(*month, *day, today))
                .min()
                .map(|due_date| TaxObligation {
                    model: *model,
                    due_date,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(
        year: i32,
        month: u32,
        day: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn alert_ids(input: &InputRecord) -> Vec<&'static str> {
        fiscal_alerts(input).iter().map(|a| a.id).collect()
    }

    // =========================================================================
    // fiscal_alerts
    // =========================================================================

    #[test]
    fn no_alerts_for_empty_profile() {
        assert!(fiscal_alerts(&InputRecord::default()).is_empty());
    }

    #[test]
    fn audit_alert_above_six_hundred_thousand() {
        let input = InputRecord {
            expected_revenue: "300.000€ - 1M€".to_string(),
            ..Default::default()
        };

        assert_eq!(alert_ids(&input), vec!["audit_alert"]);
    }

    #[test]
    fn no_audit_alert_for_mid_revenue() {
        let input = InputRecord {
            expected_revenue: "100.000€ - 300.000€".to_string(),
            ..Default::default()
        };

        assert!(alert_ids(&input).is_empty());
    }

    #[test]
    fn every_alert_in_order() {
        let input = InputRecord {
            expected_revenue: "Más de 1M€".to_string(),
            has_partners: "yes".to_string(),
            has_international_activity: "occasional".to_string(),
            current_status: "operational".to_string(),
            preferred_tax_structure: "sl".to_string(),
            ..Default::default()
        };

        assert_eq!(
            alert_ids(&input),
            vec!["audit_alert", "partners_pact", "double_taxation", "legal_change"]
        );
    }

    #[test]
    fn unsure_preference_does_not_raise_legal_change() {
        let input = InputRecord {
            current_status: "operational".to_string(),
            preferred_tax_structure: "unsure".to_string(),
            ..Default::default()
        };

        assert!(alert_ids(&input).is_empty());
    }

    #[test]
    fn legal_change_requires_operational_business() {
        let input = InputRecord {
            current_status: "planning".to_string(),
            preferred_tax_structure: "sl".to_string(),
            ..Default::default()
        };

        assert!(alert_ids(&input).is_empty());
    }

    // =========================================================================
    // upcoming_obligations
    // =========================================================================

    #[test]
    fn obligations_mid_year() {
        let obligations = upcoming_obligations(date(2024, 5, 1));

        assert_eq!(
            obligations,
            vec![
                TaxObligation {
                    model: "Modelo 200",
                    due_date: date(2024, 7, 25)
                },
                TaxObligation {
                    model: "Modelo 303",
                    due_date: date(2024, 7, 20)
                },
                TaxObligation {
                    model: "Modelo 111",
                    due_date: date(2024, 7, 20)
                },
            ]
        );
    }

    #[test]
    fn deadline_on_today_rolls_forward() {
        let obligations = upcoming_obligations(date(2024, 7, 25));

        assert_eq!(obligations[0].due_date, date(2025, 7, 25));
        assert_eq!(obligations[1].due_date, date(2024, 10, 20));
    }

    #[test]
    fn late_in_year_wraps_to_january() {
        let obligations = upcoming_obligations(date(2024, 10, 21));

        assert_eq!(obligations[1].due_date, date(2025, 1, 30));
        assert_eq!(obligations[2].due_date, date(2025, 1, 20));
    }

    #[test]
    fn between_january_deadlines() {
        // Withholdings due on the 20th have passed, VAT on the 30th has not
        let obligations = upcoming_obligations(date(2025, 1, 25));

        assert_eq!(obligations[1].due_date, date(2025, 1, 30));
        assert_eq!(obligations[2].due_date, date(2025, 4, 20));
    }

    #[test]
    fn due_date_es_uses_spanish_month_abbreviation() {
        let obligation = TaxObligation {
            model: "Modelo 303",
            due_date: date(2025, 1, 5),
        };

        assert_eq!(obligation.due_date_es(), "05 ene 2025");
    }
}
