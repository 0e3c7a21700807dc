use crate::model::{ChildKind, FormState, YesNo};

/// Coerces free-form field text to a finite number. Empty, non-numeric and
/// non-finite input all count as zero; this is the only validation the form
/// fields get.
pub fn to_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Totals {
    pub child_expenses: f64,
    pub general: f64,
    pub taxi_income: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
}

/// Pure breakdown of the form: recomputed on every render, never cached.
/// Daily pocket money is scaled by 30 to approximate a month. Taxi income
/// counts only while both the car and taxi answers are "yes".
pub fn compute_totals(form: &FormState) -> Totals {
    let child_expenses: f64 = form
        .children
        .iter()
        .map(|child| match child.kind {
            ChildKind::Infant => {
                to_number(&child.doctor) + to_number(&child.milk) + to_number(&child.diapers)
            }
            ChildKind::Student => {
                to_number(&child.school)
                    + to_number(&child.transport)
                    + to_number(&child.stationery)
                    + to_number(&child.daily) * 30.0
            }
        })
        .sum();

    let general = to_number(&form.food) + to_number(&form.services);
    let taxi_income = if form.car == YesNo::Yes && form.taxi == YesNo::Yes {
        to_number(&form.taxi_income)
    } else {
        0.0
    };
    let total_income = to_number(&form.salary) + taxi_income;
    let total_expenses = general + child_expenses;
    let balance = total_income - total_expenses;

    Totals {
        child_expenses,
        general,
        taxi_income,
        total_income,
        total_expenses,
        balance,
    }
}

fn format_with_commas(value: i64) -> String {
    let is_negative = value < 0;
    // unsigned_abs: i64::MIN (the saturated cast of any huge negative input)
    // has no i64 absolute value.
    let digits = value
        .unsigned_abs()
        .to_string()
        .chars()
        .rev()
        .collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    let formatted: String = out.into_iter().rev().collect();
    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Zero-decimal display of an amount with thousands separators. Rounding
/// happens only here; the totals stay unrounded.
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format_with_commas(value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChildEntry, FormField};

    #[test]
    fn coercion_is_total_and_defaults_to_zero() {
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("   "), 0.0);
        assert_eq!(to_number("abc"), 0.0);
        assert_eq!(to_number("12abc"), 0.0);
        assert_eq!(to_number("inf"), 0.0);
        assert_eq!(to_number("1200000"), 1_200_000.0);
        assert_eq!(to_number(" 42 "), 42.0);
        assert_eq!(to_number("-300"), -300.0);
        assert_eq!(to_number("2.5"), 2.5);
        assert_eq!(to_number("1e3"), 1000.0);
    }

    fn infant(doctor: &str, milk: &str, diapers: &str) -> ChildEntry {
        ChildEntry {
            doctor: doctor.to_string(),
            milk: milk.to_string(),
            diapers: diapers.to_string(),
            ..ChildEntry::default()
        }
    }

    #[test]
    fn infant_contribution_sums_its_three_costs() {
        let mut form = FormState::default();
        form.children_count = "1".to_string();
        form.children = vec![infant("10000", "5000", "3000")];
        assert_eq!(compute_totals(&form).child_expenses, 18_000.0);
    }

    #[test]
    fn student_contribution_scales_daily_by_thirty() {
        let mut form = FormState::default();
        form.children_count = "1".to_string();
        form.children = vec![ChildEntry {
            kind: ChildKind::Student,
            school: "50000".to_string(),
            transport: "10000".to_string(),
            stationery: "2000".to_string(),
            daily: "1000".to_string(),
            ..ChildEntry::default()
        }];
        assert_eq!(compute_totals(&form).child_expenses, 92_000.0);
    }

    #[test]
    fn student_ignores_infant_fields_and_vice_versa() {
        let mut form = FormState::default();
        form.children_count = "1".to_string();
        let mut child = infant("10000", "5000", "3000");
        child.kind = ChildKind::Student;
        child.school = "20000".to_string();
        form.children = vec![child];
        assert_eq!(compute_totals(&form).child_expenses, 20_000.0);
    }

    #[test]
    fn balance_is_income_minus_expenses() {
        let mut form = FormState::default();
        form.salary = "1000000".to_string();
        form.food = "100000".to_string();
        form.services = "50000".to_string();

        let totals = compute_totals(&form);
        assert_eq!(totals.total_income, 1_000_000.0);
        assert_eq!(totals.total_expenses, 150_000.0);
        assert_eq!(totals.balance, 850_000.0);
    }

    #[test]
    fn balance_can_go_negative() {
        let mut form = FormState::default();
        form.salary = "100000".to_string();
        form.food = "250000".to_string();
        assert_eq!(compute_totals(&form).balance, -150_000.0);
    }

    #[test]
    fn taxi_income_needs_both_car_and_taxi() {
        let mut form = FormState::default();
        form.salary = "500000".to_string();
        form.taxi_income = "200000".to_string();

        form.car = YesNo::Yes;
        form.taxi = YesNo::Yes;
        assert_eq!(compute_totals(&form).total_income, 700_000.0);

        form.taxi = YesNo::No;
        assert_eq!(compute_totals(&form).total_income, 500_000.0);

        // Turning the car off gates the stored taxi income out entirely.
        let form = form
            .set_field(FormField::Taxi(YesNo::Yes))
            .set_field(FormField::Car(YesNo::No));
        let totals = compute_totals(&form);
        assert_eq!(totals.taxi_income, 0.0);
        assert_eq!(totals.total_income, 500_000.0);
    }

    #[test]
    fn currency_formatting_groups_and_rounds() {
        assert_eq!(format_currency(0.0), "0");
        assert_eq!(format_currency(850_000.0), "850,000");
        assert_eq!(format_currency(1_234_567.6), "1,234,568");
        assert_eq!(format_currency(-92_000.0), "-92,000");
        assert_eq!(format_currency(f64::NAN), "0");
    }

    #[test]
    fn currency_formatting_survives_extreme_magnitudes() {
        // Inputs are permissive, so values like "-1e300" can reach the
        // formatter; the cast saturates and the display must not panic.
        assert_eq!(format_currency(-1e300), "-9,223,372,036,854,775,808");
        assert_eq!(format_currency(1e300), "9,223,372,036,854,775,807");
        assert_eq!(format_currency(f64::NEG_INFINITY), "0");
        assert_eq!(format_currency(i64::MIN as f64), "-9,223,372,036,854,775,808");
    }
}
