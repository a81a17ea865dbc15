use chrono::Datelike;
use serde::Serialize;

use crate::config::LeaveConfig;
use crate::database::models::{ApprovalStatus, LeaveRequest, LeaveType};

/// Remaining days per leave type for the current year
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalance {
    pub vacation: i32,
    pub sick: i32,
    pub personal: i32,
    pub comp_time: i32,
}

/// Entitlements minus approved days starting in `year`. Unpaid leave does
/// not draw down any balance.
pub fn remaining(entitlement: &LeaveConfig, requests: &[LeaveRequest], year: i32) -> LeaveBalance {
    let mut balance = LeaveBalance {
        vacation: entitlement.vacation_days,
        sick: entitlement.sick_days,
        personal: entitlement.personal_days,
        comp_time: entitlement.comp_time_days,
    };

    let approved = requests
        .iter()
        .filter(|r| r.status == ApprovalStatus::Approved && r.start_date.year() == year);

    for request in approved {
        match request.leave_type {
            LeaveType::Vacation => balance.vacation -= request.days,
            LeaveType::Sick => balance.sick -= request.days,
            LeaveType::Personal => balance.personal -= request.days,
            LeaveType::CompTime => balance.comp_time -= request.days,
            LeaveType::Unpaid => {}
        }
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn request(leave_type: LeaveType, start: (i32, u32, u32), days: i32, status: ApprovalStatus) -> LeaveRequest {
        let start = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            leave_type,
            start_date: start,
            end_date: start,
            days,
            reason: None,
            status,
            approved_by: None,
            approved_at: None,
            comments: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn subtracts_only_approved_days_in_year() {
        let requests = vec![
            request(LeaveType::Vacation, (2024, 7, 1), 5, ApprovalStatus::Approved),
            request(LeaveType::Vacation, (2024, 8, 1), 3, ApprovalStatus::Pending),
            request(LeaveType::Vacation, (2023, 12, 28), 2, ApprovalStatus::Approved),
            request(LeaveType::Sick, (2024, 2, 1), 1, ApprovalStatus::Approved),
            request(LeaveType::CompTime, (2024, 3, 1), 2, ApprovalStatus::Rejected),
            request(LeaveType::Unpaid, (2024, 4, 1), 10, ApprovalStatus::Approved),
        ];
        let balance = remaining(&LeaveConfig::default(), &requests, 2024);
        assert_eq!(
            balance,
            LeaveBalance { vacation: 20, sick: 4, personal: 3, comp_time: 8 }
        );
    }
}
