use clap::Args;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::database::models::Role;
use crate::services::accounts::{create_account, AccountError, AccountRequest};
use crate::{config, store_from_config};

#[derive(Debug, Args)]
pub struct CreateAdminArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
}

pub async fn handle(args: CreateAdminArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();
    if config.database.url.is_none() {
        tracing::warn!("DATABASE_URL not set; the admin will only exist for this process");
    }
    let store = store_from_config(&config.database).await?;

    let request = AccountRequest {
        email: &args.email,
        password: &args.password,
        first_name: &args.first_name,
        last_name: &args.last_name,
        role: Role::Admin,
    };
    let profile = match create_account(store.as_ref(), request).await {
        Ok(profile) => profile,
        Err(AccountError::AlreadyExists) => anyhow::bail!("an account for {} already exists", args.email),
        Err(e) => return Err(e.into()),
    };

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "id": profile.id, "email": profile.email, "role": profile.role })
        ),
        OutputFormat::Text => println!("Created admin {} ({})", profile.email, profile.id),
    }
    Ok(())
}
