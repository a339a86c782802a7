//! User account commands

use anyhow::{Context, Result};
use pennywise_core::db::Database;
use pennywise_core::models::{NewUser, Role, User};

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Create one with: pennywise users add");
        return Ok(());
    }

    println!("👥 Users ({})", users.len());
    println!();
    println!("{:>5}  {:<6}  {:<30}  NAME", "ID", "ROLE", "EMAIL");
    for user in &users {
        println!(
            "{:>5}  {:<6}  {:<30}  {}",
            user.id,
            user.role.as_str(),
            user.email,
            user.name
        );
    }

    Ok(())
}

pub fn cmd_users_add(
    db: &Database,
    name: &str,
    email: &str,
    password: &str,
    admin: bool,
) -> Result<User> {
    let role = if admin { Role::Admin } else { Role::User };
    let user = db
        .register_user(&NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Some(role),
        })
        .context("Failed to create user")?;

    println!("✅ Created {} {} ({})", user.role, user.id, user.email);
    Ok(user)
}

pub fn cmd_users_promote(db: &Database, email: &str) -> Result<()> {
    let user = db
        .get_user_by_email(email)?
        .with_context(|| format!("No user with email {}", email))?;

    if user.is_admin() {
        println!("ℹ️  {} is already an admin", user.email);
        return Ok(());
    }

    db.set_user_role(user.id, Role::Admin)?;
    tracing::info!(user_id = user.id, "Promoted user to admin");
    db.log_audit(None, "promote", Some("user"), Some(user.id), Some("via cli"))?;
    println!("✅ Promoted {} to admin", user.email);
    Ok(())
}
