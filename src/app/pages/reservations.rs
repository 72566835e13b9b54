//! Admin reservation overview, grouped by arrival month.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use dioxus::prelude::*;

use crate::app::client::use_admin_api;
use crate::app::components::{ErrorAlert, Spinner};
use crate::app::guard::AdminPage;
use crate::app::models::Reservation;

#[component]
pub fn Reservations() -> Element {
    rsx! {
        AdminPage { title: "Reservations", nav_active: "reservations",
            ReservationsPanel {}
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct MonthGroup {
    label: String,
    reservations: Vec<Reservation>,
}

/// Buckets by (year, month) of the start date, oldest month first, each sorted by arrival.
fn group_by_month(reservations: Vec<Reservation>) -> Vec<MonthGroup> {
    let mut months: BTreeMap<(i32, u32), Vec<Reservation>> = BTreeMap::new();
    for r in reservations {
        months
            .entry((r.start_date.year(), r.start_date.month()))
            .or_default()
            .push(r);
    }
    months
        .into_iter()
        .map(|((year, month), mut reservations)| {
            reservations.sort_by_key(|r| r.start_date);
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|| format!("{year}-{month:02}"));
            MonthGroup { label, reservations }
        })
        .collect()
}

#[component]
fn ReservationsPanel() -> Element {
    let api = use_admin_api();

    let mut reservations = use_resource(move || {
        let api = api.clone();
        async move { api.reservations().await }
    });

    let groups = match reservations.read().clone() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            return rsx! {
                ErrorAlert { message: e.to_string(), on_retry: move |_| reservations.restart() }
            }
        }
        Some(Ok(list)) => group_by_month(list.items),
    };

    rsx! {
        h1 { "Reservations" }
        if groups.is_empty() {
            p { class: "text-muted", "No reservations yet." }
        }
        for group in groups {
            section { key: "{group.label}",
                h2 { "{group.label} ({group.reservations.len()})" }
                table { class: "data",
                    thead {
                        tr {
                            th { "Guest" }
                            th { "Email" }
                            th { "Phone" }
                            th { "Arrival" }
                            th { "Departure" }
                            th { "Nights" }
                            th { "Total" }
                            th { "Discount" }
                        }
                    }
                    tbody {
                        for r in group.reservations {
                            tr {
                                td { "{r.guest_name()}" }
                                td { "{r.email}" }
                                td { "{r.tel}" }
                                td { "{r.start_date}" }
                                td { "{r.end_date}" }
                                td { "{r.nights()}" }
                                td { "{r.total_price:.2}" }
                                td { "{r.discount:.2}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(name: &str, start: (i32, u32, u32), nights: i64) -> Reservation {
        let start_date = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        Reservation {
            firstname: name.into(),
            start_date,
            end_date: start_date + chrono::Duration::days(nights),
            ..Default::default()
        }
    }

    #[test]
    fn groups_are_chronological() {
        let groups = group_by_month(vec![
            booking("late", (2026, 11, 20), 2),
            booking("second", (2026, 10, 15), 1),
            booking("first", (2026, 10, 3), 3),
            booking("earlier year", (2025, 12, 30), 4),
        ]);

        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["December 2025", "October 2026", "November 2026"]);

        let october: Vec<_> = groups[1]
            .reservations
            .iter()
            .map(|r| r.firstname.as_str())
            .collect();
        assert_eq!(october, ["first", "second"]);
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(group_by_month(Vec::new()).is_empty());
    }
}
