use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use common::{DateWindow, FuelSummary, SpendBreakdown, VehicleFuelSummary};
use model::entities::fuel_entry::{self, FuelEntryType};
use model::entities::vehicle;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{ComputeError, Result};

/// A fuel-log entry decorated with its read-time derivations. Only
/// refueling entries with an odometer reading ever get a distance.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFuelEntry {
    pub entry: fuel_entry::Model,
    /// Kilometers since the previous odometer baseline.
    pub distance: Option<i32>,
    /// Kilometers per liter of the current fill, rounded to 2 decimals.
    pub mileage: Option<Decimal>,
}

/// Total spend of one entry, falling back to liters x price per liter
/// when no explicit total was recorded.
pub fn entry_total(entry: &fuel_entry::Model) -> Decimal {
    match entry.total {
        Some(total) => total,
        None => match (entry.liters, entry.price_per_liter) {
            (Some(liters), Some(price)) => liters * price,
            _ => Decimal::ZERO,
        },
    }
}

/// Decorates entries with distance and mileage, preserving input order.
///
/// Per vehicle, refueling entries with an odometer are walked in date
/// order. An entry flagged `missed_previous_refuel` starts a fresh
/// baseline and gets no distance of its own; otherwise the distance is
/// the delta to the nearest earlier baseline and the mileage divides it
/// by the current fill's liters. An odometer that goes backwards also
/// resets the baseline.
pub fn decorate(entries: Vec<fuel_entry::Model>) -> Vec<DerivedFuelEntry> {
    let mut per_vehicle: BTreeMap<i32, Vec<&fuel_entry::Model>> = BTreeMap::new();
    for entry in &entries {
        if entry.entry_type == FuelEntryType::Refueling && entry.odometer.is_some() {
            per_vehicle.entry(entry.vehicle_id).or_default().push(entry);
        }
    }

    let mut derived: HashMap<i32, (i32, Option<Decimal>)> = HashMap::new();
    for refuels in per_vehicle.values_mut() {
        refuels.sort_by_key(|e| (e.date, e.odometer, e.id));

        let mut baseline: Option<i32> = None;
        for entry in refuels.iter() {
            let Some(odometer) = entry.odometer else {
                continue;
            };
            if !entry.missed_previous_refuel {
                if let Some(prev) = baseline {
                    let distance = odometer - prev;
                    if distance >= 0 {
                        let mileage = match entry.liters {
                            Some(liters) if liters > Decimal::ZERO => {
                                Some((Decimal::from(distance) / liters).round_dp(2))
                            }
                            _ => None,
                        };
                        derived.insert(entry.id, (distance, mileage));
                    }
                }
            }
            baseline = Some(odometer);
        }
    }

    entries
        .into_iter()
        .map(|entry| {
            let (distance, mileage) = match derived.get(&entry.id) {
                Some((distance, mileage)) => (Some(*distance), *mileage),
                None => (None, None),
            };
            DerivedFuelEntry {
                entry,
                distance,
                mileage,
            }
        })
        .collect()
}

/// Kilometers clocked since the vehicle's most recent service entry that
/// carries an odometer reading. `None` when the vehicle has no such
/// service entry or no later reading.
pub fn km_since_last_service(entries: &[&fuel_entry::Model]) -> Option<i32> {
    let last_odometer = last_odometer(entries)?;
    let service_odometer = entries
        .iter()
        .filter(|e| e.entry_type == FuelEntryType::Service && e.odometer.is_some())
        .max_by_key(|e| (e.date, e.id))
        .and_then(|e| e.odometer)?;

    let km = last_odometer - service_odometer;
    (km >= 0).then_some(km)
}

fn last_odometer(entries: &[&fuel_entry::Model]) -> Option<i32> {
    entries
        .iter()
        .filter(|e| e.odometer.is_some())
        .max_by_key(|e| (e.date, e.odometer, e.id))
        .and_then(|e| e.odometer)
}

fn first_of_month(date: NaiveDate) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| ComputeError::Date(format!("no first day for month of {date}")))
}

fn end_of_month(date: NaiveDate) -> Result<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| ComputeError::Date(format!("no last day for month of {date}")))
}

fn accumulate(bucket: &mut SpendBreakdown, entry: &fuel_entry::Model) {
    let total = entry_total(entry);
    match entry.entry_type {
        FuelEntryType::Refueling => {
            bucket.fuel_spend += total;
            bucket.liters += entry.liters.unwrap_or(Decimal::ZERO);
        }
        FuelEntryType::Service | FuelEntryType::Repair => {
            bucket.service_spend += total;
        }
    }
    bucket.total_spend += total;
}

/// Rolls the fuel log up per vehicle into current-month, last-month and
/// year-to-date buckets, each split into fuel vs service spend, plus the
/// km-since-last-service figure. `today` anchors the buckets.
pub fn vehicle_summaries(
    entries: &[fuel_entry::Model],
    vehicles: &[vehicle::Model],
    today: NaiveDate,
) -> Result<FuelSummary> {
    let current_start = first_of_month(today)?;
    let current_window = DateWindow::new(Some(current_start), Some(end_of_month(today)?));
    let last_month_end = current_start
        .pred_opt()
        .ok_or_else(|| ComputeError::Date(format!("no day before {current_start}")))?;
    let last_window = DateWindow::new(Some(first_of_month(last_month_end)?), Some(last_month_end));
    let ytd_start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
        .ok_or_else(|| ComputeError::Date(format!("no January 1 in year of {today}")))?;
    let ytd_window = DateWindow::new(Some(ytd_start), Some(today));

    let mut per_vehicle: BTreeMap<i32, Vec<&fuel_entry::Model>> = BTreeMap::new();
    for entry in entries {
        per_vehicle.entry(entry.vehicle_id).or_default().push(entry);
    }

    let mut summaries = Vec::with_capacity(per_vehicle.len());
    for (vehicle_id, vehicle_entries) in &per_vehicle {
        let mut current_month = SpendBreakdown::zero();
        let mut last_month = SpendBreakdown::zero();
        let mut year_to_date = SpendBreakdown::zero();

        for entry in vehicle_entries {
            if current_window.contains(entry.date) {
                accumulate(&mut current_month, entry);
            }
            if last_window.contains(entry.date) {
                accumulate(&mut last_month, entry);
            }
            if ytd_window.contains(entry.date) {
                accumulate(&mut year_to_date, entry);
            }
        }

        summaries.push(VehicleFuelSummary {
            vehicle_id: *vehicle_id,
            vehicle_name: vehicles
                .iter()
                .find(|v| v.id == *vehicle_id)
                .map(|v| v.name.clone()),
            current_month,
            last_month,
            year_to_date,
            last_odometer: last_odometer(vehicle_entries),
            km_since_last_service: km_since_last_service(vehicle_entries),
        });
    }

    debug!(vehicles = summaries.len(), "rolled up fuel log");
    Ok(FuelSummary {
        vehicles: summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dec(value: i64, scale: u32) -> Decimal {
        Decimal::new(value, scale)
    }

    struct EntrySpec {
        id: i32,
        date: NaiveDate,
        vehicle_id: i32,
        entry_type: FuelEntryType,
        odometer: Option<i32>,
        liters: Option<Decimal>,
        price_per_liter: Option<Decimal>,
        total: Option<Decimal>,
        missed: bool,
    }

    fn make_entry(spec: EntrySpec) -> fuel_entry::Model {
        let now = Utc::now();
        fuel_entry::Model {
            id: spec.id,
            date: spec.date,
            vehicle_id: spec.vehicle_id,
            entry_type: spec.entry_type,
            odometer: spec.odometer,
            liters: spec.liters,
            price_per_liter: spec.price_per_liter,
            total: spec.total,
            notes: None,
            missed_previous_refuel: spec.missed,
            created_at: now,
            updated_at: now,
        }
    }

    fn refuel(id: i32, date: NaiveDate, odometer: i32, liters: Decimal) -> fuel_entry::Model {
        make_entry(EntrySpec {
            id,
            date,
            vehicle_id: 1,
            entry_type: FuelEntryType::Refueling,
            odometer: Some(odometer),
            liters: Some(liters),
            price_per_liter: Some(dec(100, 0)),
            total: None,
            missed: false,
        })
    }

    #[test]
    fn mileage_reference_vector() {
        // Refuels at 1000, 1200 and 1450 km with 10 and 12 liter fills.
        let entries = vec![
            refuel(1, d(2026, 1, 1), 1000, dec(8, 0)),
            refuel(2, d(2026, 1, 10), 1200, dec(10, 0)),
            refuel(3, d(2026, 1, 20), 1450, dec(12, 0)),
        ];

        let derived = decorate(entries);

        assert_eq!(derived[0].distance, None);
        assert_eq!(derived[0].mileage, None);
        assert_eq!(derived[1].distance, Some(200));
        assert_eq!(derived[1].mileage, Some(dec(2000, 2))); // 20.00
        assert_eq!(derived[2].distance, Some(250));
        assert_eq!(derived[2].mileage, Some(dec(2083, 2))); // 20.83
    }

    #[test]
    fn missed_refuel_starts_a_new_baseline() {
        let mut missed = refuel(2, d(2026, 1, 10), 1200, dec(10, 0));
        missed.missed_previous_refuel = true;
        let entries = vec![
            refuel(1, d(2026, 1, 1), 1000, dec(8, 0)),
            missed,
            refuel(3, d(2026, 1, 20), 1450, dec(12, 0)),
        ];

        let derived = decorate(entries);

        // The flagged entry gets no distance but still anchors the next one.
        assert_eq!(derived[1].distance, None);
        assert_eq!(derived[2].distance, Some(250));
    }

    #[test]
    fn entries_without_odometer_are_passed_over() {
        let mut blank = refuel(2, d(2026, 1, 10), 0, dec(9, 0));
        blank.odometer = None;
        let entries = vec![
            refuel(1, d(2026, 1, 1), 1000, dec(8, 0)),
            blank,
            refuel(3, d(2026, 1, 20), 1450, dec(12, 0)),
        ];

        let derived = decorate(entries);

        assert_eq!(derived[1].distance, None);
        // Baseline skips the odometer-less fill and reaches back to 1000.
        assert_eq!(derived[2].distance, Some(450));
    }

    #[test]
    fn service_entries_never_get_mileage() {
        let entries = vec![
            refuel(1, d(2026, 1, 1), 1000, dec(8, 0)),
            make_entry(EntrySpec {
                id: 2,
                date: d(2026, 1, 5),
                vehicle_id: 1,
                entry_type: FuelEntryType::Service,
                odometer: Some(1100),
                liters: None,
                price_per_liter: None,
                total: Some(dec(350000, 2)),
                missed: false,
            }),
            refuel(3, d(2026, 1, 20), 1450, dec(12, 0)),
        ];

        let derived = decorate(entries);

        assert_eq!(derived[1].distance, None);
        // The service reading is not a refuel baseline either.
        assert_eq!(derived[2].distance, Some(450));
    }

    #[test]
    fn spend_split_resums_to_bucket_total() {
        let today = d(2026, 3, 15);
        let entries = vec![
            // Explicit total
            make_entry(EntrySpec {
                id: 1,
                date: d(2026, 3, 2),
                vehicle_id: 1,
                entry_type: FuelEntryType::Refueling,
                odometer: Some(5000),
                liters: Some(dec(20, 0)),
                price_per_liter: Some(dec(100, 0)),
                total: Some(dec(200000, 2)),
                missed: false,
            }),
            // Derived total: 10 L x 102.50
            make_entry(EntrySpec {
                id: 2,
                date: d(2026, 3, 9),
                vehicle_id: 1,
                entry_type: FuelEntryType::Refueling,
                odometer: Some(5200),
                liters: Some(dec(10, 0)),
                price_per_liter: Some(dec(10250, 2)),
                total: None,
                missed: false,
            }),
            make_entry(EntrySpec {
                id: 3,
                date: d(2026, 3, 11),
                vehicle_id: 1,
                entry_type: FuelEntryType::Service,
                odometer: None,
                liters: None,
                price_per_liter: None,
                total: Some(dec(120000, 2)),
                missed: false,
            }),
            make_entry(EntrySpec {
                id: 4,
                date: d(2026, 3, 12),
                vehicle_id: 1,
                entry_type: FuelEntryType::Repair,
                odometer: None,
                liters: None,
                price_per_liter: None,
                total: Some(dec(45000, 2)),
                missed: false,
            }),
        ];

        let summary = vehicle_summaries(&entries, &[], today).unwrap();
        assert_eq!(summary.vehicles.len(), 1);
        let bucket = &summary.vehicles[0].current_month;

        assert_eq!(bucket.fuel_spend, dec(302500, 2)); // 2000 + 1025
        assert_eq!(bucket.service_spend, dec(165000, 2)); // 1200 + 450
        assert_eq!(bucket.total_spend, bucket.fuel_spend + bucket.service_spend);
        assert_eq!(bucket.liters, dec(30, 0));
    }

    #[test]
    fn buckets_are_anchored_on_today() {
        let today = d(2026, 3, 15);
        let entries = vec![
            refuel(1, d(2026, 2, 10), 4000, dec(10, 0)),
            refuel(2, d(2026, 3, 5), 4300, dec(10, 0)),
            refuel(3, d(2025, 12, 28), 3500, dec(10, 0)),
        ];

        let summary = vehicle_summaries(&entries, &[], today).unwrap();
        let vehicle = &summary.vehicles[0];

        assert_eq!(vehicle.current_month.fuel_spend, dec(1000, 0));
        assert_eq!(vehicle.last_month.fuel_spend, dec(1000, 0));
        // Year-to-date spans both 2026 entries but not December 2025.
        assert_eq!(vehicle.year_to_date.fuel_spend, dec(2000, 0));
    }

    #[test]
    fn km_since_last_service_uses_latest_readings() {
        let entries = vec![
            refuel(1, d(2026, 1, 1), 1000, dec(8, 0)),
            make_entry(EntrySpec {
                id: 2,
                date: d(2026, 1, 15),
                vehicle_id: 1,
                entry_type: FuelEntryType::Service,
                odometer: Some(1300),
                liters: None,
                price_per_liter: None,
                total: Some(dec(3000, 0)),
                missed: false,
            }),
            refuel(3, d(2026, 2, 1), 1900, dec(10, 0)),
        ];
        let refs: Vec<&fuel_entry::Model> = entries.iter().collect();

        assert_eq!(km_since_last_service(&refs), Some(600));
    }

    #[test]
    fn km_since_last_service_without_service_entry_is_none() {
        let entries = vec![refuel(1, d(2026, 1, 1), 1000, dec(8, 0))];
        let refs: Vec<&fuel_entry::Model> = entries.iter().collect();
        assert_eq!(km_since_last_service(&refs), None);
    }

    #[test]
    fn vehicle_names_resolve_when_the_vehicle_still_exists() {
        let now = Utc::now();
        let vehicles = vec![vehicle::Model {
            id: 1,
            name: "Swift".to_string(),
            vehicle_type: vehicle::VehicleType::Car,
            color: None,
            model: None,
            capacity: None,
            plate: None,
            created_at: now,
            updated_at: now,
        }];
        let entries = vec![refuel(1, d(2026, 3, 1), 1000, dec(8, 0))];

        let summary = vehicle_summaries(&entries, &vehicles, d(2026, 3, 15)).unwrap();
        assert_eq!(summary.vehicles[0].vehicle_name.as_deref(), Some("Swift"));

        // A deleted vehicle leaves the rollup in place, nameless.
        let summary = vehicle_summaries(&entries, &[], d(2026, 3, 15)).unwrap();
        assert_eq!(summary.vehicles[0].vehicle_name, None);
    }
}
