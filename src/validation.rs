//! Input checks shared by services. Each returns the message to show for the
//! offending field.

pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters".to_string());
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err("Invalid email format".to_string()),
    };

    if local.is_empty() || domain.is_empty() {
        return Err("Invalid email format".to_string());
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email format".to_string());
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Emails are matched case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_tenant_name(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if len < 2 {
        return Err("Tenant name must be at least 2 characters".to_string());
    }
    if len > 100 {
        return Err("Tenant name must be at most 100 characters".to_string());
    }
    if name.chars().any(char::is_control) {
        return Err("Tenant name cannot contain control characters".to_string());
    }
    Ok(())
}

pub fn validate_person_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if name.chars().count() > 100 {
        return Err("Name must be at most 100 characters".to_string());
    }
    Ok(())
}

pub fn validate_sku(sku: &str) -> Result<(), String> {
    if sku.is_empty() {
        return Err("SKU is required".to_string());
    }
    if sku.len() > 64 {
        return Err("SKU must be at most 64 characters".to_string());
    }
    if !sku.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) {
        return Err("SKU can only contain letters, numbers, hyphen, underscore and dot".to_string());
    }
    Ok(())
}

pub fn validate_product_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Product name is required".to_string());
    }
    if name.chars().count() > 200 {
        return Err("Product name must be at most 200 characters".to_string());
    }
    Ok(())
}

pub fn validate_rejection_reason(reason: &str) -> Result<(), String> {
    if reason.chars().count() > 500 {
        return Err("Rejection reason must be at most 500 characters".to_string());
    }
    Ok(())
}
