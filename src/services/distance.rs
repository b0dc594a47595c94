//! Cálculo de la distancia recorrida
//!
//! La distancia de un viaje es la diferencia con el odómetro del registro anterior
//! del mismo vehículo, o el propio odómetro si no hay anterior.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::TripRecord;
use crate::services::preceding::preceding_of;

pub fn traveled_distance(odometer_at_end: i64, preceding: Option<&TripRecord>) -> i64 {
    match preceding {
        Some(previous) => odometer_at_end - previous.odometer_at_end,
        None => odometer_at_end,
    }
}

/// Distancia de `subject` frente al resto de registros de su vehículo
pub fn derive_distance(records: &[TripRecord], subject: &TripRecord) -> i64 {
    traveled_distance(subject.odometer_at_end, preceding_of(records, subject))
}

/// Recalcula la distancia de todos los registros de `view`.
///
/// Devuelve los registros cuya distancia cambió, más los listados en `always`
/// aunque no hayan cambiado (registros nuevos o editados que hay que guardar).
pub fn rederive_distances(view: &[TripRecord], always: &HashSet<Uuid>) -> Vec<TripRecord> {
    view.iter()
        .filter_map(|record| {
            let distance = derive_distance(view, record);
            if distance != record.traveled_distance || always.contains(&record.id) {
                let mut updated = record.clone();
                updated.traveled_distance = distance;
                Some(updated)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::trip;

    #[test]
    fn first_record_uses_its_own_odometer() {
        let vehicle = Uuid::new_v4();
        let first = trip(vehicle, "2024-01-10", 100);
        assert_eq!(derive_distance(&[first.clone()], &first), 100);
    }

    #[test]
    fn second_record_subtracts_predecessor() {
        let vehicle = Uuid::new_v4();
        let first = trip(vehicle, "2024-01-10", 100);
        let second = trip(vehicle, "2024-01-12", 150);
        let records = vec![first.clone(), second.clone()];
        assert_eq!(derive_distance(&records, &second), 50);
        assert_eq!(derive_distance(&records, &first), 100);
    }

    #[test]
    fn derivation_is_idempotent() {
        let vehicle = Uuid::new_v4();
        let records = vec![trip(vehicle, "2024-01-10", 100), trip(vehicle, "2024-01-11", 130)];
        let subject = &records[1];
        assert_eq!(derive_distance(&records, subject), derive_distance(&records, subject));
    }

    #[test]
    fn rederive_reports_stale_successors() {
        let vehicle = Uuid::new_v4();
        let mut first = trip(vehicle, "2024-01-10", 100);
        let mut second = trip(vehicle, "2024-01-12", 150);
        second.traveled_distance = 50;
        first.odometer_at_end = 120;
        first.traveled_distance = 120;

        let changed = rederive_distances(&[first.clone(), second.clone()], &HashSet::new());
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].id, second.id);
        assert_eq!(changed[0].traveled_distance, 30);
    }

    #[test]
    fn rederive_always_returns_forced_records() {
        let vehicle = Uuid::new_v4();
        let first = trip(vehicle, "2024-01-10", 100);
        let forced: HashSet<Uuid> = [first.id].into_iter().collect();
        let changed = rederive_distances(&[first.clone()], &forced);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].traveled_distance, 100);
    }
}
