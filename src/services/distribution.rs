use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::database::models::{Leave, LeaveAllocations, YearMonth};

use super::finite_or_zero;

/// The slice of a leave's allocation attributed to one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthShare {
    pub paid: f64,
    pub casual: f64,
    pub sick: f64,
    pub unpaid: f64,
    pub total: f64,
}

/// Splits a leave's per-type allocation across the calendar months its
/// date range overlaps, weighted by working days (Saturdays and Sundays
/// excluded; no holiday calendar).
///
/// No rounding happens here; callers round once at final aggregation so
/// error does not compound across months.
pub fn distribute(leave: &Leave) -> BTreeMap<YearMonth, MonthShare> {
    distribute_range(leave.start_date, leave.end_date, &leave.allocations)
}

/// Same as [`distribute`], with the leave's start clipped forward to
/// `clip_start`. Days before the clip never count.
pub fn distribute_clipped(
    leave: &Leave,
    clip_start: NaiveDate,
) -> BTreeMap<YearMonth, MonthShare> {
    let start = leave.start_date.max(clip_start);
    distribute_range(start, leave.end_date, &leave.allocations)
}

fn distribute_range(
    start: NaiveDate,
    end: NaiveDate,
    allocations: &LeaveAllocations,
) -> BTreeMap<YearMonth, MonthShare> {
    let mut shares = BTreeMap::new();
    if start > end {
        return shares;
    }

    let mut working_days: BTreeMap<YearMonth, u32> = BTreeMap::new();
    let mut day = start;
    loop {
        if !is_weekend(day) {
            *working_days.entry(YearMonth::from_date(day)).or_insert(0) += 1;
        }
        if day >= end {
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    let paid = finite_or_zero(allocations.paid);
    let casual = finite_or_zero(allocations.casual);
    let sick = finite_or_zero(allocations.sick);
    let unpaid = finite_or_zero(allocations.unpaid);

    let total_working: u32 = working_days.values().sum();
    if total_working == 0 {
        // Weekend-only range: the whole allocation lands in the month
        // containing the start date.
        let total = paid + casual + sick + unpaid;
        if total > 0.0 {
            shares.insert(
                YearMonth::from_date(start),
                MonthShare {
                    paid,
                    casual,
                    sick,
                    unpaid,
                    total,
                },
            );
        }
        return shares;
    }

    for (month, days) in working_days {
        let ratio = f64::from(days) / f64::from(total_working);
        let share = MonthShare {
            paid: paid * ratio,
            casual: casual * ratio,
            sick: sick * ratio,
            unpaid: unpaid * ratio,
            total: (paid + casual + sick + unpaid) * ratio,
        };
        shares.insert(month, share);
    }

    shares
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}
