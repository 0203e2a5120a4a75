use pretty_assertions::assert_eq;

use leave_engine::database::models::LeaveUsage;
use leave_engine::test_utils::{company_with_policy, employee};

mod common;

use common::{TestEngine, date, month};

#[tokio::test]
async fn accrue_persists_the_computed_total() {
    let engine = TestEngine::new();
    let company = company_with_policy(1.5, 18.0, None);
    let mut emp = employee(company.id, Some(date(2024, 1, 15)));
    engine.employees.insert(emp.clone());

    engine
        .accrual
        .accrue(&mut emp, company.leave_policy().as_ref(), date(2024, 4, 10))
        .await
        .unwrap();

    assert_eq!(emp.total_leave_available, 6.0);
    assert_eq!(emp.last_accrued_month, Some(month("2024-04")));

    let stored = engine
        .accrual
        .load_employee(emp.id, company.id)
        .await
        .unwrap();
    assert_eq!(stored.total_leave_available, 6.0);
    assert_eq!(engine.employees.save_count(), 1);
}

#[tokio::test]
async fn accrue_twice_with_identical_inputs_is_idempotent() {
    let engine = TestEngine::new();
    let company = company_with_policy(1.5, 18.0, None);
    let mut emp = employee(company.id, Some(date(2024, 1, 15)));
    emp.manual_adjustment = 2.0;
    engine.employees.insert(emp.clone());

    let policy = company.leave_policy();
    engine
        .accrual
        .accrue(&mut emp, policy.as_ref(), date(2024, 4, 10))
        .await
        .unwrap();
    let first = emp.total_leave_available;

    engine
        .accrual
        .accrue(&mut emp, policy.as_ref(), date(2024, 4, 10))
        .await
        .unwrap();

    assert_eq!(emp.total_leave_available, first);
    assert_eq!(emp.manual_adjustment, 2.0);
}

#[tokio::test]
async fn degenerate_policy_is_a_silent_no_op() {
    let engine = TestEngine::new();
    let company = company_with_policy(0.0, 18.0, None);
    let mut emp = employee(company.id, Some(date(2024, 1, 15)));
    emp.total_leave_available = 4.0;
    engine.employees.insert(emp.clone());

    engine
        .accrual
        .accrue(&mut emp, company.leave_policy().as_ref(), date(2024, 4, 10))
        .await
        .unwrap();

    // Nothing recomputed, nothing written.
    assert_eq!(emp.total_leave_available, 4.0);
    assert_eq!(engine.employees.save_count(), 0);
}

#[tokio::test]
async fn manual_adjustment_survives_repeated_accrual_runs() {
    let engine = TestEngine::new();
    let company = company_with_policy(1.5, 18.0, None);
    let mut emp = employee(company.id, Some(date(2024, 1, 15)));
    engine.employees.insert(emp.clone());

    let policy = company.leave_policy();
    engine
        .accrual
        .set_manual_adjustment(&mut emp, policy.as_ref(), 3.0, date(2024, 4, 10))
        .await
        .unwrap();
    assert_eq!(emp.total_leave_available, 9.0);

    for _ in 0..3 {
        engine
            .accrual
            .accrue(&mut emp, policy.as_ref(), date(2024, 4, 10))
            .await
            .unwrap();
    }

    assert_eq!(emp.manual_adjustment, 3.0);
    assert_eq!(emp.total_leave_available, 9.0);
    assert_eq!(engine.employees.get(emp.id).unwrap().manual_adjustment, 3.0);
}

#[tokio::test]
async fn manual_adjustment_without_policy_still_persists() {
    let engine = TestEngine::new();
    let company = company_with_policy(0.0, 0.0, None);
    let mut emp = employee(company.id, Some(date(2024, 1, 15)));
    engine.employees.insert(emp.clone());

    engine
        .accrual
        .set_manual_adjustment(&mut emp, company.leave_policy().as_ref(), 5.0, date(2024, 4, 10))
        .await
        .unwrap();

    assert_eq!(emp.total_leave_available, 5.0);
    assert_eq!(engine.employees.get(emp.id).unwrap().manual_adjustment, 5.0);
}

#[tokio::test]
async fn refresh_balances_projects_caps_and_persists_once() {
    let engine = TestEngine::new();
    let company = company_with_policy(1.5, 18.0, None);
    let mut emp = employee(company.id, Some(date(2024, 1, 15)));
    emp.leave_usage = LeaveUsage {
        paid: 4.0,
        casual: 1.0,
        sick: 0.0,
        unpaid: 2.5,
    };
    engine.employees.insert(emp.clone());

    engine
        .accrual
        .refresh_balances(&mut emp, company.leave_policy().as_ref(), date(2024, 4, 10))
        .await
        .unwrap();

    // caps from the fixture company: paid 12, casual 6, sick 6
    assert_eq!(emp.leave_balances.paid, 8.0);
    assert_eq!(emp.leave_balances.casual, 5.0);
    assert_eq!(emp.leave_balances.sick, 6.0);
    assert_eq!(emp.leave_balances.unpaid, 2.5);
    // 4 months at 1.5, minus nothing: base 6.0 capped by 18 - 5 used
    assert_eq!(emp.total_leave_available, 6.0);
    assert_eq!(engine.employees.save_count(), 1);
}

#[tokio::test]
async fn refresh_balances_without_policy_zeroes_the_caps() {
    let engine = TestEngine::new();
    let company = company_with_policy(0.0, 0.0, None);
    let mut emp = employee(company.id, None);
    emp.leave_usage = LeaveUsage {
        paid: 2.0,
        casual: 0.0,
        sick: 0.0,
        unpaid: 1.0,
    };
    emp.total_leave_available = 7.0;
    engine.employees.insert(emp.clone());

    engine
        .accrual
        .refresh_balances(&mut emp, company.leave_policy().as_ref(), date(2024, 4, 10))
        .await
        .unwrap();

    assert_eq!(emp.leave_balances.paid, 0.0);
    assert_eq!(emp.leave_balances.unpaid, 1.0);
    // the accrued total is left alone when no policy is active
    assert_eq!(emp.total_leave_available, 7.0);
}

#[tokio::test]
async fn usage_caps_the_accrued_base() {
    let engine = TestEngine::new();
    let company = company_with_policy(1.5, 18.0, None);
    let mut emp = employee(company.id, Some(date(2023, 1, 1)));
    emp.leave_usage = LeaveUsage {
        paid: 10.0,
        casual: 4.0,
        sick: 2.0,
        unpaid: 30.0,
    };
    engine.employees.insert(emp.clone());

    engine
        .accrual
        .accrue(&mut emp, company.leave_policy().as_ref(), date(2024, 4, 10))
        .await
        .unwrap();

    // potential is 24 but only 18 - 16 = 2 of the entitlement remains;
    // the 30 unpaid days never count against it
    assert_eq!(emp.total_leave_available, 2.0);
}

#[tokio::test]
async fn policy_start_later_than_joining_date_wins() {
    let engine = TestEngine::new();
    let company = company_with_policy(1.0, 18.0, Some(date(2024, 3, 1)));
    let mut emp = employee(company.id, Some(date(2024, 1, 15)));
    engine.employees.insert(emp.clone());

    engine
        .accrual
        .accrue(&mut emp, company.leave_policy().as_ref(), date(2024, 4, 10))
        .await
        .unwrap();

    // Mar + Apr
    assert_eq!(emp.total_leave_available, 2.0);
}

#[tokio::test]
async fn employee_who_has_not_started_accruing_gets_zero_base() {
    let engine = TestEngine::new();
    let company = company_with_policy(1.5, 18.0, None);
    let mut emp = employee(company.id, Some(date(2025, 2, 1)));
    emp.manual_adjustment = 1.5;
    engine.employees.insert(emp.clone());

    engine
        .accrual
        .accrue(&mut emp, company.leave_policy().as_ref(), date(2024, 4, 10))
        .await
        .unwrap();

    assert_eq!(emp.total_leave_available, 1.5);
}
