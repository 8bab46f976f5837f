//! User display formatting
//!
//! Formats users for terminal output in table and detail views.

use crate::models::User;

/// Format a list of users as a table
pub fn format_user_list(users: &[User], date_format: &str) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let name_width = users
        .iter()
        .map(|u| u.full_name().chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let email_width = users
        .iter()
        .map(|u| u.email.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:<name_width$}  {:<email_width$}  {:<8}  {}\n",
        "ID",
        "Name",
        "Email",
        "Status",
        "Born",
        name_width = name_width,
        email_width = email_width,
    ));
    output.push_str(&format!(
        "{:->4}  {:-<name_width$}  {:-<email_width$}  {:-<8}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        email_width = email_width,
    ));

    for user in users {
        output.push_str(&format!(
            "{:>4}  {:<name_width$}  {:<email_width$}  {:<8}  {}\n",
            user.id,
            user.full_name(),
            user.email,
            status_label(user),
            user.date_of_birth.format(date_format),
            name_width = name_width,
            email_width = email_width,
        ));
    }

    output.push_str(&format!("\nTotal: {} users", users.len()));
    output
}

/// Format a single user's details
pub fn format_user_details(user: &User, date_format: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("User:     {}\n", user.full_name()));
    output.push_str(&format!("ID:       {}\n", user.id));
    output.push_str(&format!("Forename: {}\n", user.forename));
    output.push_str(&format!("Surname:  {}\n", user.surname));
    output.push_str(&format!("Email:    {}\n", user.email));
    output.push_str(&format!("Status:   {}\n", status_label(user)));
    output.push_str(&format!(
        "Born:     {}",
        user.date_of_birth.format(date_format)
    ));
    output
}

fn status_label(user: &User) -> &'static str {
    if user.is_active {
        "Active"
    } else {
        "Inactive"
    }
}
