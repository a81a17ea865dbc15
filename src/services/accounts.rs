use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{hash_password, AuthError};
use crate::database::models::{EmployeeStatus, NewEmployee, NewProfile, Profile, Role};
use crate::database::store::NewAccount;
use crate::database::{Store, StoreError};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("User already exists")]
    AlreadyExists,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AccountError::AlreadyExists,
            other => AccountError::Store(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: Role,
}

/// Emails are stored and looked up trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates credential, profile and an active employee row hired today.
/// Used by self-registration and by the `create-admin` command.
pub async fn create_account(store: &dyn Store, request: AccountRequest<'_>) -> Result<Profile, AccountError> {
    let email = normalize_email(request.email);
    if store.get_profile_by_email(&email).await?.is_some() {
        return Err(AccountError::AlreadyExists);
    }

    let now = Utc::now();
    let account = NewAccount {
        password_hash: hash_password(request.password)?,
        profile: NewProfile {
            user_id: Uuid::new_v4(),
            email,
            first_name: request.first_name.to_string(),
            last_name: request.last_name.to_string(),
            phone: None,
            role: request.role,
            employee_number: Some(format!("EMP{}", now.timestamp_millis())),
        },
        employee: NewEmployee {
            department_id: None,
            hire_date: now.date_naive(),
            hourly_rate: None,
            status: EmployeeStatus::Active,
        },
    };

    let (profile, employee) = store.register_account(account).await?;
    tracing::info!(profile_id = %profile.id, employee_id = %employee.id, role = %profile.role, "Account created");
    Ok(profile)
}
