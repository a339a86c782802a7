//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TransactionStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 5, 20)
    }

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            role: None,
        }
    }

    fn setup_user(db: &Database) -> User {
        db.register_user(&new_user("Test User", "test@example.com"))
            .unwrap()
    }

    fn salary(amount: f64, d: NaiveDate) -> NewIncome {
        NewIncome {
            source: "Acme Corp".to_string(),
            amount,
            category: IncomeCategory::Salary,
            date: Some(d),
            notes: None,
            status: None,
            is_recurring: false,
            recurrence: Recurrence::None,
        }
    }

    fn spend(description: &str, amount: f64, category: &str, d: NaiveDate) -> NewExpense {
        NewExpense {
            description: Some(description.to_string()),
            amount,
            category: category.to_string(),
            date: Some(d),
            ..Default::default()
        }
    }

    #[test]
    fn test_schema_tables_exist() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
                 ('users', 'incomes', 'expenses', 'budgets', 'goals', 'alerts', 'reports', 'audit_log')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 8);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::in_memory().unwrap();
        setup_user(&db);

        // Reopening the same file reruns migrations without losing data
        let reopened = Database::new_unencrypted(db.path()).unwrap();
        assert_eq!(reopened.count_users().unwrap(), 1);
    }

    // ========== Users ==========

    #[test]
    fn test_register_and_authenticate() {
        let db = Database::in_memory().unwrap();
        let user = db
            .register_user(&new_user("  Ada  ", "Ada@Example.com"))
            .unwrap();

        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, Role::User);

        let logged_in = db.authenticate("ADA@example.com ", "secret123").unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[test]
    fn test_authenticate_failures_share_message() {
        let db = Database::in_memory().unwrap();
        setup_user(&db);

        let wrong_password = db.authenticate("test@example.com", "nope").unwrap_err();
        let unknown_email = db.authenticate("ghost@example.com", "secret123").unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, Error::Auth(_)));
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let db = Database::in_memory().unwrap();
        setup_user(&db);

        let err = db
            .register_user(&new_user("Other", "TEST@example.com"))
            .unwrap_err();
        match err {
            Error::Conflict(msg) => {
                assert_eq!(msg, "This email is already registered. Please login instead.")
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_password_hash_not_stored_in_plaintext() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        let conn = db.conn().unwrap();

        let hash: String = conn
            .query_row(
                "SELECT password_hash FROM users WHERE id = ?",
                [user.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_ne!(hash, "secret123");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_update_profile() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        let updated = db
            .update_profile(
                user.id,
                &ProfileUpdate {
                    name: Some("New Name".to_string()),
                    bio: Some("Saving for a boat".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.bio.as_deref(), Some("Saving for a boat"));
        // Untouched fields survive
        assert_eq!(updated.email, "test@example.com");
    }

    #[test]
    fn test_update_profile_email_conflict() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        db.register_user(&new_user("Other", "other@example.com"))
            .unwrap();

        let result = db.update_profile(
            user.id,
            &ProfileUpdate {
                email: Some("other@example.com".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::Conflict(_))));

        // Keeping your own email is fine
        let result = db.update_profile(
            user.id,
            &ProfileUpdate {
                email: Some("Test@Example.com".to_string()),
                ..Default::default()
            },
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_change_password() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        let err = db
            .change_password(user.id, "wrong-old", "newpass1")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid data: Old password is incorrect");

        db.change_password(user.id, "secret123", "newpass1").unwrap();
        assert!(db.authenticate("test@example.com", "secret123").is_err());
        assert!(db.authenticate("test@example.com", "newpass1").is_ok());
    }

    #[test]
    fn test_set_role_and_list_users() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        db.register_user(&new_user("Second", "second@example.com"))
            .unwrap();

        let promoted = db.set_user_role(user.id, Role::Admin).unwrap();
        assert!(promoted.is_admin());

        let users = db.list_users().unwrap();
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_delete_user_cascades() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        db.create_income(user.id, &salary(100.0, today()), today())
            .unwrap();
        db.create_expense(user.id, &spend("Lunch", 12.0, "Food", today()), today())
            .unwrap();

        assert!(db.delete_user(user.id).unwrap());
        assert!(db.get_user(user.id).unwrap().is_none());

        let conn = db.conn().unwrap();
        let orphans: i64 = conn
            .query_row(
                "SELECT (SELECT COUNT(*) FROM incomes) + (SELECT COUNT(*) FROM expenses)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    // ========== Incomes ==========

    #[test]
    fn test_income_crud() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        let income = db
            .create_income(user.id, &salary(2500.0, date(2026, 5, 1)), today())
            .unwrap();
        assert_eq!(income.status, IncomeStatus::Pending);
        assert_eq!(income.next_recurrence_date, None);

        let mut changed = salary(2600.0, date(2026, 5, 2));
        changed.notes = Some("raise".to_string());
        let updated = db
            .update_income(user.id, income.id, &changed, today())
            .unwrap()
            .unwrap();
        assert_eq!(updated.amount, 2600.0);
        assert_eq!(updated.notes.as_deref(), Some("raise"));

        let received = db
            .mark_income_received(user.id, income.id)
            .unwrap()
            .unwrap();
        assert_eq!(received.status, IncomeStatus::Received);

        assert!(db.delete_income(user.id, income.id).unwrap());
        assert!(db.list_incomes(user.id).unwrap().is_empty());
    }

    #[test]
    fn test_income_recurrence_date() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        let mut input = salary(1000.0, date(2026, 5, 1));
        input.is_recurring = true;
        input.recurrence = Recurrence::Biweekly;

        let income = db.create_income(user.id, &input, today()).unwrap();
        assert_eq!(income.next_recurrence_date, Some(date(2026, 6, 3)));

        // Recurring flag without an interval schedules nothing
        input.recurrence = Recurrence::None;
        let income = db.create_income(user.id, &input, today()).unwrap();
        assert_eq!(income.next_recurrence_date, None);
    }

    #[test]
    fn test_income_rejects_small_amount() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        let result = db.create_income(user.id, &salary(0.5, today()), today());
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_incomes_are_scoped_to_owner() {
        let db = Database::in_memory().unwrap();
        let owner = setup_user(&db);
        let other = db
            .register_user(&new_user("Other", "other@example.com"))
            .unwrap();

        let income = db
            .create_income(owner.id, &salary(100.0, today()), today())
            .unwrap();

        assert!(db.get_income(other.id, income.id).unwrap().is_none());
        assert!(db
            .mark_income_received(other.id, income.id)
            .unwrap()
            .is_none());
        assert!(!db.delete_income(other.id, income.id).unwrap());
        assert!(db.list_incomes(other.id).unwrap().is_empty());
    }

    #[test]
    fn test_incomes_listed_newest_first() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        db.create_income(user.id, &salary(1.0, date(2026, 1, 1)), today())
            .unwrap();
        db.create_income(user.id, &salary(2.0, date(2026, 3, 1)), today())
            .unwrap();

        let incomes = db.list_incomes(user.id).unwrap();
        assert_eq!(incomes[0].date, date(2026, 3, 1));
        assert_eq!(incomes[1].date, date(2026, 1, 1));
    }

    // ========== Expenses ==========

    #[test]
    fn test_expense_crud() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        let expense = db
            .create_expense(
                user.id,
                &NewExpense {
                    title: Some("Coffee".to_string()),
                    amount: 4.5,
                    category: "Food".to_string(),
                    ..Default::default()
                },
                today(),
            )
            .unwrap();

        assert_eq!(expense.description, "Coffee");
        assert_eq!(expense.payment_method, "Cash");
        assert_eq!(expense.date, today());
        assert!(!expense.is_recurring);

        let updated = db
            .update_expense(
                user.id,
                expense.id,
                &ExpenseUpdate {
                    amount: Some(5.0),
                    payment_method: Some("Card".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.amount, 5.0);
        assert_eq!(updated.payment_method, "Card");
        assert_eq!(updated.category, "Food");

        let recurring = db
            .mark_expense_recurring(user.id, expense.id)
            .unwrap()
            .unwrap();
        assert!(recurring.is_recurring);

        assert!(db.delete_expense(user.id, expense.id).unwrap());
        assert!(db.get_expense(user.id, expense.id).unwrap().is_none());
    }

    #[test]
    fn test_expense_update_validation() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        let expense = db
            .create_expense(user.id, &spend("Lunch", 10.0, "Food", today()), today())
            .unwrap();

        let result = db.update_expense(
            user.id,
            expense.id,
            &ExpenseUpdate {
                amount: Some(-3.0),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    // ========== Transactions ==========

    fn seed_transactions(db: &Database, user_id: i64) {
        db.create_income(user_id, &salary(3000.0, date(2026, 1, 31)), today())
            .unwrap();
        db.create_expense(user_id, &spend("Rent", 1200.0, "Housing", date(2026, 2, 1)), today())
            .unwrap();
        db.create_expense(user_id, &spend("Groceries", 200.0, "Food", date(2026, 2, 10)), today())
            .unwrap();
        db.create_expense(user_id, &spend("Dinner", 80.0, "Food", date(2026, 3, 5)), today())
            .unwrap();
    }

    #[test]
    fn test_list_transactions_unions_incomes_and_expenses() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        seed_transactions(&db, user.id);

        let all = db
            .list_transactions(user.id, &TransactionFilter::default())
            .unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].description, "Dinner");
        assert_eq!(all[3].transaction_type, TransactionType::Income);
        assert_eq!(all[3].description, "Acme Corp");
    }

    #[test]
    fn test_list_transactions_filters() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        seed_transactions(&db, user.id);

        let food = db
            .list_transactions(
                user.id,
                &TransactionFilter {
                    category: Some("Food".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(food.len(), 2);

        let incomes = db
            .list_transactions(
                user.id,
                &TransactionFilter {
                    transaction_type: Some(TransactionType::Income),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(incomes.len(), 1);

        let february = db
            .list_transactions(
                user.id,
                &TransactionFilter {
                    start_date: Some(date(2026, 2, 1)),
                    end_date: Some(date(2026, 2, 28)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(february.len(), 2);

        // A lone start date is ignored
        let start_only = db
            .list_transactions(
                user.id,
                &TransactionFilter {
                    start_date: Some(date(2026, 3, 1)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(start_only.len(), 4);
    }

    #[test]
    fn test_monthly_summary() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        seed_transactions(&db, user.id);
        db.create_expense(user.id, &spend("Old", 999.0, "Food", date(2025, 12, 1)), today())
            .unwrap();

        let rows = db.monthly_summary(user.id, 2026).unwrap();
        let feb_expense = rows
            .iter()
            .find(|r| r.month == 2 && r.transaction_type == TransactionType::Expense)
            .unwrap();
        assert_eq!(feb_expense.total, 1400.0);
        assert!(rows.iter().all(|r| r.month <= 3));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_category_summary() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        seed_transactions(&db, user.id);

        let all = db.category_summary(user.id, None).unwrap();
        assert_eq!(all[0].category, "Salary");
        assert_eq!(all[0].total, 3000.0);

        let expenses = db
            .category_summary(user.id, Some(TransactionType::Expense))
            .unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].category, "Housing");
        assert_eq!(expenses[1].total, 280.0);
    }

    #[test]
    fn test_transactions_between_sorted_ascending() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        seed_transactions(&db, user.id);

        let txs = db
            .transactions_between(user.id, date(2026, 2, 1), date(2026, 12, 31))
            .unwrap();
        assert_eq!(txs.len(), 3);
        assert!(txs.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(txs[0].date, date(2026, 2, 1));

        // Upper bound is inclusive
        let txs = db
            .transactions_between(user.id, date(2026, 1, 1), date(2026, 2, 10))
            .unwrap();
        assert_eq!(txs.len(), 3);
        assert_eq!(txs.last().unwrap().date, date(2026, 2, 10));
    }

    // ========== Budgets ==========

    #[test]
    fn test_budget_crud() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        let budget = db
            .create_budget(
                user.id,
                &NewBudget {
                    category: "Food".to_string(),
                    budget: 400.0,
                    spent: 0.0,
                    month: Some("2026-05".to_string()),
                },
            )
            .unwrap();
        assert!(!budget.exceeded);
        assert_eq!(budget.remaining(), 400.0);

        let updated = db
            .update_budget(
                user.id,
                budget.id,
                &BudgetUpdate {
                    spent: Some(150.0),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.spent, 150.0);

        let exceeded = db
            .mark_budget_exceeded(user.id, budget.id)
            .unwrap()
            .unwrap();
        assert!(exceeded.exceeded);

        assert_eq!(db.list_budgets(user.id).unwrap().len(), 1);
        assert!(db.delete_budget(user.id, budget.id).unwrap());
    }

    #[test]
    fn test_budget_requires_positive_amount() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        let result = db.create_budget(
            user.id,
            &NewBudget {
                category: "Food".to_string(),
                budget: 0.0,
                spent: 0.0,
                month: None,
            },
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    // ========== Goals ==========

    #[test]
    fn test_goal_crud_and_progress() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        let goal = db
            .create_goal(
                user.id,
                &NewGoal {
                    title: "Emergency fund".to_string(),
                    target_amount: 1000.0,
                    saved_amount: 250.0,
                    deadline: date(2026, 12, 31),
                    completed: false,
                },
            )
            .unwrap();
        assert_eq!(goal.progress, 25.0);

        let updated = db
            .update_goal(
                user.id,
                goal.id,
                &GoalUpdate {
                    saved_amount: Some(500.0),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.progress, 50.0);

        let done = db.complete_goal(user.id, goal.id).unwrap().unwrap();
        assert!(done.completed);

        assert!(db.delete_goal(user.id, goal.id).unwrap());
        assert!(db.list_goals(user.id).unwrap().is_empty());
    }

    // ========== Alerts ==========

    #[test]
    fn test_alert_lifecycle() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        let alert = db
            .create_alert(
                user.id,
                &NewAlert {
                    message: "Food budget at 90%".to_string(),
                    level: AlertLevel::Warning,
                },
            )
            .unwrap();
        assert!(!alert.read);
        assert_eq!(db.count_unread_alerts(user.id).unwrap(), 1);

        let read = db.mark_alert_read(user.id, alert.id).unwrap().unwrap();
        assert!(read.read);
        assert_eq!(db.count_unread_alerts(user.id).unwrap(), 0);

        assert!(db.delete_alert(user.id, alert.id).unwrap());
        assert!(db.list_alerts(user.id).unwrap().is_empty());
    }

    #[test]
    fn test_alert_requires_message() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        let result = db.create_alert(
            user.id,
            &NewAlert {
                message: "   ".to_string(),
                level: AlertLevel::Info,
            },
        );
        assert!(result.is_err());
    }

    // ========== Reports ==========

    #[test]
    fn test_generate_report_snapshots_totals() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        seed_transactions(&db, user.id);
        db.create_budget(
            user.id,
            &NewBudget {
                category: "Food".to_string(),
                budget: 500.0,
                spent: 0.0,
                month: None,
            },
        )
        .unwrap();

        let report = db
            .generate_report(
                Some(user.id),
                &NewReport {
                    title: "Q1".to_string(),
                    report_type: ReportType::Quarterly,
                },
            )
            .unwrap();

        assert_eq!(report.summary.total_income, 3000.0);
        assert_eq!(report.summary.total_expenses, 1480.0);
        assert_eq!(report.summary.total_budgets, 500.0);
        assert_eq!(report.report_type, ReportType::Quarterly);

        let document = db.get_report_document(report.id).unwrap().unwrap();
        assert!(document.starts_with("section,label,amount"));
        assert!(document.contains("summary,total_income,3000.00"));
        assert!(document.contains("category,Housing,1200.00"));
        assert_eq!(report.checksum, reports::checksum(&document));
        assert_eq!(report.checksum.len(), 64);
    }

    #[test]
    fn test_report_list_and_delete() {
        let db = Database::in_memory().unwrap();
        let first = db
            .generate_report(
                None,
                &NewReport {
                    title: "Empty".to_string(),
                    report_type: ReportType::Monthly,
                },
            )
            .unwrap();
        assert_eq!(first.summary, ReportSummary::default());

        assert_eq!(db.list_reports().unwrap().len(), 1);
        assert!(db.delete_report(first.id).unwrap());
        assert!(db.get_report(first.id).unwrap().is_none());
        assert!(db.get_report_document(first.id).unwrap().is_none());
    }

    #[test]
    fn test_report_requires_title() {
        let db = Database::in_memory().unwrap();
        let result = db.generate_report(
            None,
            &NewReport {
                title: " ".to_string(),
                report_type: ReportType::Custom,
            },
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    // ========== Admin ==========

    #[test]
    fn test_user_spending_reports() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);
        let idle = db
            .register_user(&new_user("Idle", "idle@example.com"))
            .unwrap();
        db.create_expense(user.id, &spend("Lunch", 100.0, "Food", today()), today())
            .unwrap();
        db.create_budget(
            user.id,
            &NewBudget {
                category: "Food".to_string(),
                budget: 300.0,
                spent: 0.0,
                month: None,
            },
        )
        .unwrap();

        let reports = db.user_spending_reports().unwrap();
        assert_eq!(reports.len(), 2);

        let active = reports.iter().find(|r| r.user_id == user.id).unwrap();
        assert_eq!(active.total_spent, 100.0);
        assert_eq!(active.total_budget, 300.0);
        assert_eq!(active.utilization, 33.3);

        let idle_report = reports.iter().find(|r| r.user_id == idle.id).unwrap();
        assert_eq!(idle_report.utilization, 0.0);
    }

    #[test]
    fn test_expenses_by_user() {
        let db = Database::in_memory().unwrap();
        let small = setup_user(&db);
        let big = db
            .register_user(&new_user("Big", "big@example.com"))
            .unwrap();
        db.register_user(&new_user("Nothing", "none@example.com"))
            .unwrap();

        db.create_expense(small.id, &spend("a", 10.0, "Food", today()), today())
            .unwrap();
        db.create_expense(big.id, &spend("b", 70.0, "Food", today()), today())
            .unwrap();
        db.create_expense(big.id, &spend("c", 30.0, "Fun", today()), today())
            .unwrap();

        let totals = db.expenses_by_user().unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].user_id, big.id);
        assert_eq!(totals[0].total_spent, 100.0);
    }

    // ========== Audit ==========

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();
        let user = setup_user(&db);

        db.log_audit(Some(user.id), "create", Some("expense"), Some(7), None)
            .unwrap();
        db.log_audit(None, "login_failed", None, None, Some("ghost@example.com"))
            .unwrap();

        let entries = db.list_audit_log(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "login_failed");
        assert_eq!(entries[0].user_id, None);
        assert_eq!(entries[1].entity_id, Some(7));

        assert_eq!(db.list_audit_log(1).unwrap().len(), 1);
    }
}
