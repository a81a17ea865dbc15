use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{Employee, EmployeeStatus, Profile, Task, WorkHour, WorkStatus};
use crate::services::time_accounting;

/// Inclusive date window for `GET /api/reports/summary`
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportRange {
    fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| date >= start) && self.end_date.map_or(true, |end| date <= end)
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TaskProductivity {
    pub task: String,
    pub hours: Decimal,
    pub count: u32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EmployeeHours {
    pub name: String,
    pub hours: Decimal,
    pub tasks: u32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DailyHours {
    pub date: NaiveDate,
    pub hours: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_employees: u32,
    pub total_hours: Decimal,
    pub total_tasks: u32,
    pub productivity_by_task: Vec<TaskProductivity>,
    pub employee_stats: Vec<EmployeeHours>,
    pub daily_hours: Vec<DailyHours>,
}

/// Rows the summary is computed from, as loaded from the store
pub struct ReportInput<'a> {
    pub work_hours: &'a [WorkHour],
    pub tasks: &'a [Task],
    pub employees: &'a [Employee],
    pub profiles: &'a [Profile],
}

fn row_hours(work_hour: &WorkHour) -> Decimal {
    if let Some(total) = work_hour.total_hours {
        return total;
    }
    match work_hour.end_time {
        Some(end) => time_accounting::total_hours(work_hour.start_time, end, work_hour.break_time_minutes)
            .unwrap_or_else(|_| time_accounting::elapsed_hours(work_hour.start_time, end)),
        None => Decimal::ZERO,
    }
}

/// Aggregates completed work hours whose start date is in `range`.
/// Rows whose task or employee profile cannot be resolved are left out.
pub fn build_report(input: ReportInput<'_>, range: ReportRange) -> ReportSummary {
    let tasks: HashMap<Uuid, &Task> = input.tasks.iter().map(|t| (t.id, t)).collect();
    let profiles: HashMap<Uuid, &Profile> = input.profiles.iter().map(|p| (p.id, p)).collect();
    let names: HashMap<Uuid, String> = input
        .employees
        .iter()
        .filter_map(|e| profiles.get(&e.profile_id).map(|p| (e.id, p.full_name())))
        .collect();

    let mut total_hours = Decimal::ZERO;
    let mut by_task: HashMap<Uuid, TaskProductivity> = HashMap::new();
    let mut by_employee: HashMap<Uuid, EmployeeHours> = HashMap::new();
    let mut by_day: HashMap<NaiveDate, Decimal> = HashMap::new();

    for work_hour in input.work_hours {
        if work_hour.status != WorkStatus::Completed {
            continue;
        }
        let date = work_hour.start_time.date_naive();
        if !range.contains(date) {
            continue;
        }
        let (Some(task), Some(name)) = (tasks.get(&work_hour.task_id), names.get(&work_hour.employee_id)) else {
            continue;
        };

        let hours = row_hours(work_hour);
        total_hours += hours;

        let task_entry = by_task.entry(task.id).or_insert_with(|| TaskProductivity {
            task: task.name.clone(),
            hours: Decimal::ZERO,
            count: 0,
        });
        task_entry.hours += hours;
        task_entry.count += 1;

        let employee_entry = by_employee.entry(work_hour.employee_id).or_insert_with(|| EmployeeHours {
            name: name.clone(),
            hours: Decimal::ZERO,
            tasks: 0,
        });
        employee_entry.hours += hours;
        employee_entry.tasks += 1;

        *by_day.entry(date).or_insert(Decimal::ZERO) += hours;
    }

    let mut productivity_by_task: Vec<_> = by_task.into_values().collect();
    productivity_by_task.sort_by(|a, b| b.hours.cmp(&a.hours).then_with(|| a.task.cmp(&b.task)));

    let mut employee_stats: Vec<_> = by_employee.into_values().collect();
    employee_stats.sort_by(|a, b| b.hours.cmp(&a.hours).then_with(|| a.name.cmp(&b.name)));

    let mut daily_hours: Vec<_> = by_day
        .into_iter()
        .map(|(date, hours)| DailyHours { date, hours })
        .collect();
    daily_hours.sort_by_key(|d| d.date);

    ReportSummary {
        total_employees: input
            .employees
            .iter()
            .filter(|e| e.status == EmployeeStatus::Active)
            .count() as u32,
        total_hours,
        total_tasks: input.tasks.iter().filter(|t| t.is_active).count() as u32,
        productivity_by_task,
        employee_stats,
        daily_hours,
    }
}
