use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;
use crate::services::UserService;

/// Bootstrap a super admin straight into the database
pub async fn create_super_admin(
    email: &str,
    password: &str,
    name: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let user = UserService::connect()
        .await?
        .create_super_admin(email, password, name)
        .await?;
    DatabaseManager::close_all().await;

    output_success(
        &output_format,
        &format!("Super admin {} created", user.email),
        Some(json!({ "id": user.id, "email": user.email })),
    )
}
