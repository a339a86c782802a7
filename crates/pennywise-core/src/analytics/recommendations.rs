//! Rule-based recommendations
//!
//! Rules are evaluated in table order and every matching rule contributes
//! its message.

/// Values the rules look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    pub next_month_forecast: f64,
    pub monthly_avg_expense: f64,
    pub savings_rate: i64,
    pub expense_to_income_ratio: f64,
    pub top_category_share: f64,
}

pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&Signals) -> bool,
    pub message: &'static str,
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "upward_trend",
        applies: |s: &Signals| s.next_month_forecast > s.monthly_avg_expense,
        message: "Your spending is trending upward — consider reviewing high-expense categories.",
    },
    Rule {
        name: "low_savings",
        applies: |s: &Signals| s.savings_rate < 20,
        message: "Increase your savings rate to at least 20% to improve financial health.",
    },
    Rule {
        name: "high_expense_ratio",
        applies: |s: &Signals| s.expense_to_income_ratio > 0.7,
        message: "Expenses exceed 70% of income. Reduce discretionary spend.",
    },
    Rule {
        name: "category_concentration",
        applies: |s: &Signals| s.top_category_share > 0.35,
        message: "One category makes up more than 35% of your spending — diversify your expenses.",
    },
];

pub fn recommend(signals: &Signals) -> Vec<String> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(signals))
        .map(|rule| rule.message.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> Signals {
        Signals {
            next_month_forecast: 100.0,
            monthly_avg_expense: 100.0,
            savings_rate: 50,
            expense_to_income_ratio: 0.5,
            top_category_share: 0.2,
        }
    }

    fn rule_message(name: &str) -> String {
        RULES
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.message.to_string())
            .unwrap()
    }

    #[test]
    fn test_no_rules_fire_for_healthy_signals() {
        assert!(recommend(&healthy()).is_empty());
    }

    #[test]
    fn test_boundaries_do_not_fire() {
        let s = Signals {
            savings_rate: 20,
            expense_to_income_ratio: 0.7,
            top_category_share: 0.35,
            ..healthy()
        };
        assert!(recommend(&s).is_empty());
    }

    #[test]
    fn test_all_rules_fire_in_table_order() {
        let s = Signals {
            next_month_forecast: 500.0,
            monthly_avg_expense: 100.0,
            savings_rate: -10,
            expense_to_income_ratio: 1.1,
            top_category_share: 0.9,
        };
        let recs = recommend(&s);
        assert_eq!(
            recs,
            vec![
                rule_message("upward_trend"),
                rule_message("low_savings"),
                rule_message("high_expense_ratio"),
                rule_message("category_concentration"),
            ]
        );
    }

    #[test]
    fn test_rules_are_independent() {
        let s = Signals {
            top_category_share: 0.8,
            ..healthy()
        };
        assert_eq!(recommend(&s), vec![rule_message("category_concentration")]);
    }
}
