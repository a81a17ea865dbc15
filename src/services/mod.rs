pub mod accounts;
pub mod leave_balance;
pub mod reports;
pub mod time_accounting;
