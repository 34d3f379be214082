//! Builders for domain primitives used across tests.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::domain::{SalesDataset, SalesRecord, StoreId};

/// First week of every generated series: Friday 2010-02-05.
pub fn first_week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 2, 5).expect("valid date")
}

/// The `n`th week (1-based) after [`first_week`], seven days apart.
pub fn week(n: u64) -> NaiveDate {
    first_week() + Days::new(7 * n.saturating_sub(1))
}

/// Create a record for `store` in week `n`.
pub fn record(store: u32, n: u64, sales: Decimal) -> SalesRecord {
    SalesRecord::new(StoreId::new(store), week(n), sales)
}

/// Build a dataset from `(store, week, sales)` triples.
///
/// # Panics
///
/// Panics if two triples share a store and week.
pub fn dataset(rows: &[(u32, u64, Decimal)]) -> SalesDataset {
    let records = rows
        .iter()
        .map(|&(store, n, sales)| record(store, n, sales))
        .collect();
    SalesDataset::from_records(records).expect("test rows must be unique per store and week")
}

/// Two stores over two weeks: store 1 1000 → 1200, store 2 500 → 400.
pub fn worked_example() -> SalesDataset {
    dataset(&[
        (1, 1, Decimal::from(1000)),
        (2, 1, Decimal::from(500)),
        (1, 2, Decimal::from(1200)),
        (2, 2, Decimal::from(400)),
    ])
}

/// `stores` stores over `weeks` weeks; store `s` sells `100 * s + week`.
pub fn series(stores: u32, weeks: u64) -> SalesDataset {
    let rows: Vec<(u32, u64, Decimal)> = (1..=weeks)
        .flat_map(|n| (1..=stores).map(move |s| (s, n, Decimal::from(100 * u64::from(s) + n))))
        .collect();
    dataset(&rows)
}

/// CSV text for a raw sales file in the input layout.
pub fn sales_csv(rows: &[(u32, &str, &str)]) -> String {
    let mut csv = String::from("Store,Date,Weekly_Sales,Holiday_Flag\n");
    for (store, date, sales) in rows {
        csv.push_str(&format!("{store},{date},{sales},0\n"));
    }
    csv
}
