//! Domain models for Pennywise

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validation;

// ========== Users ==========

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user (password hash is never part of this struct)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Registration input
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl NewUser {
    /// Trim the name, normalize the email, and check required fields
    pub fn normalized(&self) -> Result<NewUser> {
        let name = self.name.trim();
        let email = validation::normalize_email(&self.email);

        if name.is_empty() || email.is_empty() || self.password.is_empty() {
            return Err(Error::InvalidData(
                "Name, email, and password are required".to_string(),
            ));
        }
        if !validation::is_valid_email(&email) {
            return Err(Error::InvalidData(
                "Please enter a valid email address".to_string(),
            ));
        }
        validation::check_password(&self.password)?;

        Ok(NewUser {
            name: name.to_string(),
            email,
            password: self.password.clone(),
            role: self.role,
        })
    }
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            let len = name.trim().chars().count();
            if !(2..=40).contains(&len) {
                return Err(Error::InvalidData(
                    "Name must be between 2 and 40 characters".to_string(),
                ));
            }
        }
        if let Some(email) = &self.email {
            if !validation::is_valid_email(&validation::normalize_email(email)) {
                return Err(Error::InvalidData(
                    "Please enter a valid email address".to_string(),
                ));
            }
        }
        if let Some(phone) = self.phone_number.as_deref().filter(|p| !p.is_empty()) {
            if !validation::is_valid_phone(phone) {
                return Err(Error::InvalidData("Invalid phone number".to_string()));
            }
        }
        if self.address.as_deref().map_or(0, |a| a.chars().count()) > 200 {
            return Err(Error::InvalidData(
                "Address must be at most 200 characters".to_string(),
            ));
        }
        if self.bio.as_deref().map_or(0, |b| b.chars().count()) > 300 {
            return Err(Error::InvalidData(
                "Bio must be at most 300 characters".to_string(),
            ));
        }
        if let Some(url) = self.photo_url.as_deref().filter(|u| !u.is_empty()) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::InvalidData("Photo URL must be a valid URI".to_string()));
            }
        }
        Ok(())
    }
}

/// Admin-side user update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

// ========== Transactions ==========

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unified view over incomes and expenses
///
/// `id` is the id of the underlying income or expense row; pair it with
/// `transaction_type` to identify the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    /// Always non-negative; direction comes from `transaction_type`
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: String,
}

/// Per-month total for one transaction type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummaryRow {
    pub month: u32,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub total: f64,
}

/// Per-category total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummaryRow {
    pub category: String,
    pub total: f64,
}

// ========== Incomes ==========

/// Allowed income categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeCategory {
    Salary,
    Freelance,
    Business,
    Investments,
    Rental,
    Dividends,
    Pension,
    #[serde(rename = "Social Security")]
    SocialSecurity,
    Gifts,
    Other,
}

impl IncomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Business => "Business",
            Self::Investments => "Investments",
            Self::Rental => "Rental",
            Self::Dividends => "Dividends",
            Self::Pension => "Pension",
            Self::SocialSecurity => "Social Security",
            Self::Gifts => "Gifts",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for IncomeCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "salary" => Ok(Self::Salary),
            "freelance" => Ok(Self::Freelance),
            "business" => Ok(Self::Business),
            "investments" => Ok(Self::Investments),
            "rental" => Ok(Self::Rental),
            "dividends" => Ok(Self::Dividends),
            "pension" => Ok(Self::Pension),
            "social security" | "social_security" => Ok(Self::SocialSecurity),
            "gifts" => Ok(Self::Gifts),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown income category: {}", s)),
        }
    }
}

impl std::fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an income has actually arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IncomeStatus {
    Received,
    #[default]
    Pending,
    Cancelled,
}

impl IncomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for IncomeStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "received" => Ok(Self::Received),
            "pending" => Ok(Self::Pending),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown income status: {}", s)),
        }
    }
}

/// Recurrence interval for recurring incomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Next occurrence after `from`, or `None` for non-recurring
    ///
    /// Month arithmetic clamps to the last day of shorter months.
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::None => None,
            Self::Daily => from.checked_add_days(chrono::Days::new(1)),
            Self::Weekly => from.checked_add_days(chrono::Days::new(7)),
            Self::Biweekly => from.checked_add_days(chrono::Days::new(14)),
            Self::Monthly => from.checked_add_months(Months::new(1)),
            Self::Quarterly => from.checked_add_months(Months::new(3)),
            Self::Yearly => from.checked_add_months(Months::new(12)),
        }
    }
}

impl std::str::FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown recurrence: {}", s)),
        }
    }
}

/// An income record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub user_id: i64,
    pub source: String,
    pub amount: f64,
    pub category: IncomeCategory,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub status: IncomeStatus,
    pub is_recurring: bool,
    pub recurrence: Recurrence,
    pub next_recurrence_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Income input (used for both create and full update)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewIncome {
    pub source: String,
    pub amount: f64,
    pub category: IncomeCategory,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<IncomeStatus>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl NewIncome {
    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(Error::InvalidData("Income source is required".to_string()));
        }
        if !self.amount.is_finite() || self.amount < 1.0 {
            return Err(Error::InvalidData(
                "Amount must be greater than or equal to 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Next recurrence date relative to `today`, when this income recurs
    pub fn next_recurrence(&self, today: NaiveDate) -> Option<NaiveDate> {
        if self.is_recurring {
            self.recurrence.next_date(today)
        } else {
            None
        }
    }
}

// ========== Expenses ==========

/// An expense record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub payment_method: String,
    pub date: NaiveDate,
    pub notes: String,
    pub is_recurring: bool,
    pub created_at: DateTime<Utc>,
}

/// Expense input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewExpense {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewExpense {
    /// Resolve description/title fallbacks and defaults against `today`
    pub fn resolve(&self, today: NaiveDate) -> Result<ResolvedExpense> {
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .or_else(|| self.title.as_deref().map(str::trim).filter(|t| !t.is_empty()))
            .ok_or_else(|| Error::InvalidData("Description is required".to_string()))?
            .to_string();

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidData("Valid amount is required".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("Category is required".to_string()));
        }

        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&description)
            .to_string();

        Ok(ResolvedExpense {
            title,
            description,
            amount: self.amount,
            category: self.category.trim().to_string(),
            payment_method: self
                .payment_method
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .unwrap_or("Cash")
                .to_string(),
            date: self.date.unwrap_or(today),
            notes: self.notes.as_deref().unwrap_or("").trim().to_string(),
        })
    }
}

/// Expense input after defaults are applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExpense {
    pub description: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub payment_method: String,
    pub date: NaiveDate,
    pub notes: String,
}

/// Partial expense update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_recurring: Option<bool>,
}

impl ExpenseUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(Error::InvalidData("Valid amount is required".to_string()));
            }
        }
        if matches!(self.category.as_deref(), Some(c) if c.trim().is_empty()) {
            return Err(Error::InvalidData("Category is required".to_string()));
        }
        if matches!(self.description.as_deref(), Some(d) if d.trim().is_empty()) {
            return Err(Error::InvalidData("Description is required".to_string()));
        }
        Ok(())
    }
}

// ========== Budgets ==========

/// A per-category spending budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    pub month: Option<String>,
    pub exceeded: bool,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Amount left before the budget is used up (negative when over)
    pub fn remaining(&self) -> f64 {
        self.budget - self.spent
    }
}

/// Budget input
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub budget: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub month: Option<String>,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() || !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(Error::InvalidData(
                "Category and budget amount are required".to_string(),
            ));
        }
        if !self.spent.is_finite() || self.spent < 0.0 {
            return Err(Error::InvalidData("Spent must not be negative".to_string()));
        }
        Ok(())
    }
}

/// Partial budget update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetUpdate {
    pub category: Option<String>,
    pub budget: Option<f64>,
    pub spent: Option<f64>,
    pub month: Option<String>,
    pub exceeded: Option<bool>,
}

// ========== Goals ==========

/// A savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub target_amount: f64,
    pub saved_amount: f64,
    pub deadline: NaiveDate,
    pub completed: bool,
    /// Saved / target as a percentage, capped at 100
    pub progress: f64,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn compute_progress(saved: f64, target: f64) -> f64 {
        if target <= 0.0 {
            return 0.0;
        }
        ((saved / target) * 100.0).clamp(0.0, 100.0)
    }
}

/// Goal input
#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
    pub title: String,
    pub target_amount: f64,
    #[serde(default)]
    pub saved_amount: f64,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty()
            || !self.target_amount.is_finite()
            || self.target_amount <= 0.0
        {
            return Err(Error::InvalidData(
                "Title, target amount, and deadline are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial goal update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub target_amount: Option<f64>,
    pub saved_amount: Option<f64>,
    pub deadline: Option<NaiveDate>,
    pub completed: Option<bool>,
}

// ========== Alerts ==========

/// Alert severity shown in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    #[default]
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl std::str::FromStr for AlertLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            _ => Err(format!("Unknown alert level: {}", s)),
        }
    }
}

/// A user-facing notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub level: AlertLevel,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Alert input
#[derive(Debug, Clone, Deserialize)]
pub struct NewAlert {
    pub message: String,
    #[serde(default)]
    pub level: AlertLevel,
}

// ========== Reports ==========

/// Reporting period of a generated report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
    Custom,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("Unknown report type: {}", s)),
        }
    }
}

/// Global totals captured when a report is generated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ReportSummary {
    pub total_expenses: f64,
    pub total_income: f64,
    pub total_budgets: f64,
}

/// A generated report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub title: String,
    pub report_type: ReportType,
    pub created_by: Option<i64>,
    pub summary: ReportSummary,
    /// SHA-256 of the rendered CSV document
    pub checksum: String,
    pub generated_at: DateTime<Utc>,
}

/// Report generation input
#[derive(Debug, Clone, Deserialize)]
pub struct NewReport {
    pub title: String,
    #[serde(default, rename = "type", alias = "report_type")]
    pub report_type: ReportType,
}

// ========== Admin ==========

/// Budget utilization for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSpendingReport {
    pub user_id: i64,
    pub name: String,
    pub total_spent: f64,
    pub total_budget: f64,
    /// Spent / budget as a percentage with one decimal, 0 without budgets
    pub utilization: f64,
}

/// Total expenses for one user (bar chart data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserExpenseTotal {
    pub user_id: i64,
    pub name: String,
    pub total_spent: f64,
}
