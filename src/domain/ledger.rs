use chrono::NaiveDate;
use thiserror::Error;

use super::{Bill, DayZone, TotalCents, UserId, categories, roster};

/// Sum of amounts of bills recorded by a single user.
pub fn total_for_user(user_id: UserId, bills: &[Bill]) -> TotalCents {
    sum_amounts(bills.iter().filter(|b| b.user_id == user_id))
}

/// Sum of amounts of bills in a single category.
pub fn total_for_category(category_id: &str, bills: &[Bill]) -> TotalCents {
    sum_amounts(bills.iter().filter(|b| b.category == category_id))
}

pub fn grand_total(bills: &[Bill]) -> TotalCents {
    sum_amounts(bills.iter())
}

fn sum_amounts<'a>(bills: impl Iterator<Item = &'a Bill>) -> TotalCents {
    bills.map(|b| TotalCents::from(b.amount)).sum()
}

/// Per-user totals in roster order.
pub fn user_totals(bills: &[Bill]) -> Vec<(super::User, TotalCents)> {
    roster()
        .into_iter()
        .map(|u| {
            let total = total_for_user(u.id, bills);
            (u, total)
        })
        .collect()
}

/// Per-category totals in category order.
pub fn category_totals(bills: &[Bill]) -> Vec<(super::Category, TotalCents)> {
    categories()
        .into_iter()
        .map(|c| {
            let total = total_for_category(&c.id, bills);
            (c, total)
        })
        .collect()
}

/// Filter bills by search term and optional calendar day, newest first.
/// The sort is stable: bills with identical timestamps keep insertion order.
pub fn search_bills(
    bills: &[Bill],
    term: &str,
    date_filter: Option<NaiveDate>,
    zone: &DayZone,
) -> Vec<Bill> {
    let mut matches: Vec<Bill> = bills
        .iter()
        .filter(|b| b.matches_term(term))
        .filter(|b| date_filter.is_none_or(|day| b.calendar_date(zone) == day))
        .cloned()
        .collect();
    matches.sort_by(|a, b| b.date.cmp(&a.date));
    matches
}

/// Input validation failures. Each maps to the single message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a user")]
    MissingUser,

    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error("Please select a category")]
    MissingCategory,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("You can only delete your own bills")]
    NotOwner,
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::domain::{Cents, User};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn sample() -> Vec<Bill> {
        let zohaib = User::new(1, "Zohaib");
        let babar = User::new(2, "Babar");
        let mustafa = User::new(3, "Mustafa");
        vec![
            Bill::new(&zohaib, 5000, at(2024, 1, 1, 9), "food").with_description("Lunch"),
            Bill::new(&babar, 1250, at(2024, 1, 3, 9), "transport").with_description("Taxi"),
            Bill::new(&zohaib, 2000, at(2024, 1, 2, 9), "utilities"),
            Bill::new(&mustafa, 799, at(2024, 1, 2, 18), "food").with_description("Snacks"),
        ]
    }

    fn utc() -> DayZone {
        DayZone::Utc
    }

    #[test]
    fn test_totals_empty() {
        assert_eq!(grand_total(&[]), 0);
        assert_eq!(total_for_user(1, &[]), 0);
        assert_eq!(total_for_category("food", &[]), 0);
    }

    #[test]
    fn test_totals() {
        let bills = sample();
        assert_eq!(total_for_user(1, &bills), 7000);
        assert_eq!(total_for_user(2, &bills), 1250);
        assert_eq!(total_for_user(9, &bills), 0);
        assert_eq!(total_for_category("food", &bills), 5799);
        assert_eq!(total_for_category("other", &bills), 0);
        assert_eq!(grand_total(&bills), 9049);
    }

    #[test]
    fn test_user_totals_sum_to_grand_total() {
        let bills = sample();
        let sum: TotalCents = user_totals(&bills).iter().map(|(_, t)| t).sum();
        assert_eq!(sum, grand_total(&bills), "Per-user totals must cover every bill");

        let sum: TotalCents = category_totals(&bills).iter().map(|(_, t)| t).sum();
        assert_eq!(sum, grand_total(&bills));
    }

    #[test]
    fn test_search_orders_newest_first() {
        let bills = sample();
        let found = search_bills(&bills, "", None, &utc());
        let amounts: Vec<Cents> = found.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![1250, 799, 2000, 5000]);
    }

    #[test]
    fn test_search_ties_keep_insertion_order() {
        let user = User::new(1, "Zohaib");
        let when = at(2024, 5, 5, 5);
        let bills = vec![
            Bill::new(&user, 100, when, "food"),
            Bill::new(&user, 200, when, "food"),
            Bill::new(&user, 300, when, "food"),
        ];
        let found = search_bills(&bills, "", None, &utc());
        let amounts: Vec<Cents> = found.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![100, 200, 300]);
    }

    #[test]
    fn test_search_by_text_and_amount() {
        let bills = sample();

        let found = search_bills(&bills, "taxi", None, &utc());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_name, "Babar");

        let found = search_bills(&bills, "zohaib", None, &utc());
        assert_eq!(found.len(), 2);

        let found = search_bills(&bills, "7.99", None, &utc());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, 799);
    }

    #[test]
    fn test_search_with_date_filter() {
        let bills = sample();
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let found = search_bills(&bills, "", Some(day), &utc());
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|b| b.date.date_naive() == day));

        let found = search_bills(&bills, "lunch", Some(day), &utc());
        assert!(found.is_empty());
    }

    #[test]
    fn test_totals_do_not_overflow() {
        let user = User::new(1, "Zohaib");
        let bills = vec![
            Bill::new(&user, Cents::MAX, at(2024, 1, 1, 9), "food"),
            Bill::new(&user, Cents::MAX, at(2024, 1, 2, 9), "food"),
        ];
        let expected = TotalCents::from(Cents::MAX) * 2;
        assert_eq!(grand_total(&bills), expected);
        assert_eq!(total_for_user(1, &bills), expected);
        assert_eq!(total_for_category("food", &bills), expected);
    }

    #[test]
    fn test_search_date_filter_in_named_zone() {
        let user = User::new(1, "Zohaib");
        let zone = DayZone::parse("Europe/Berlin").unwrap();
        let summer_day = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        // Local midnight of July 10th in summer time
        let bills = vec![Bill::new(&user, 100, at(2024, 7, 9, 22), "food")];

        assert_eq!(search_bills(&bills, "", Some(summer_day), &zone).len(), 1);
        assert!(search_bills(&bills, "", Some(summer_day), &utc()).is_empty());
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::MissingUser.to_string(), "Please select a user");
        assert_eq!(
            ValidationError::NotOwner.to_string(),
            "You can only delete your own bills"
        );
    }
}
