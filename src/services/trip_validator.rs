//! Validación de registros de kilometraje
//!
//! Comprueba que un lote de registros nuevos o editados es coherente con el resto
//! de registros del vehículo: fechas en orden, odómetro creciente y al menos 1 km
//! por viaje.

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{CheckScope, TripRecord};
use crate::services::preceding::preceding_of;
use crate::utils::errors::RuleViolation;

/// Registro a validar junto con los grupos de campos que se tocaron
#[derive(Debug, Clone)]
pub struct TripCandidate {
    pub record: TripRecord,
    pub scope: CheckScope,
}

impl TripCandidate {
    pub fn created(record: TripRecord) -> Self {
        Self {
            record,
            scope: CheckScope::ALL,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TripValidator {
    today: NaiveDate,
}

impl TripValidator {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Valida `candidates` contra `existing` (los registros ya guardados del vehículo).
    ///
    /// Los candidatos se evalúan por fecha de salida ascendente. Las búsquedas del
    /// registro anterior ven el estado posterior a la escritura: los guardados que no
    /// forman parte del lote más todos los candidatos.
    pub fn validate(
        &self,
        existing: &[TripRecord],
        candidates: &[TripCandidate],
    ) -> Result<(), RuleViolation> {
        let batch_ids: HashSet<Uuid> = candidates.iter().map(|c| c.record.id).collect();
        let others: Vec<&TripRecord> = existing
            .iter()
            .filter(|record| !batch_ids.contains(&record.id))
            .collect();

        let mut view: Vec<&TripRecord> = others.clone();
        view.extend(candidates.iter().map(|c| &c.record));

        let mut ordered: Vec<&TripCandidate> = candidates.iter().collect();
        ordered.sort_by_key(|c| c.record.departure_date);

        for candidate in ordered {
            self.check_intrinsic(candidate)?;

            if candidate.scope.dates {
                check_insertion_order(&others, &candidate.record)?;
            }
            if candidate.scope.odometer {
                check_odometer_sequence(view.iter().copied(), &candidate.record)?;
            }
        }

        Ok(())
    }

    /// Reglas que no dependen de otros registros
    fn check_intrinsic(&self, candidate: &TripCandidate) -> Result<(), RuleViolation> {
        let record = &candidate.record;
        if candidate.scope.dates {
            if record.departure_date > record.return_date {
                return Err(RuleViolation::InvalidDateRange);
            }
            if record.departure_date > self.today || record.return_date > self.today {
                return Err(RuleViolation::FutureDateNotAllowed);
            }
        }
        if candidate.scope.odometer && record.odometer_at_end < 1 {
            return Err(RuleViolation::NonPositiveOdometer);
        }
        Ok(())
    }
}

/// Ningún otro registro del vehículo puede haber vuelto después de esta salida
fn check_insertion_order(others: &[&TripRecord], record: &TripRecord) -> Result<(), RuleViolation> {
    let later_on_file = others.iter().any(|other| {
        other.vehicle_id == record.vehicle_id && other.return_date > record.departure_date
    });
    if later_on_file {
        return Err(RuleViolation::OutOfOrderInsertion);
    }
    Ok(())
}

/// Repite las reglas de odómetro sobre los registros cuya distancia se recalculó
/// tras una edición, para que ningún sucesor quede por debajo de su anterior.
pub fn check_rederived(view: &[TripRecord], touched: &[TripRecord]) -> Result<(), RuleViolation> {
    for record in touched {
        check_odometer_sequence(view, record)?;
    }
    Ok(())
}

fn check_odometer_sequence<'a, I>(view: I, record: &TripRecord) -> Result<(), RuleViolation>
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    if let Some(previous) = preceding_of(view, record) {
        if previous.odometer_at_end > record.odometer_at_end {
            return Err(RuleViolation::OdometerRegression);
        }
        if record.odometer_at_end - previous.odometer_at_end < 1 {
            return Err(RuleViolation::TripTooShort);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{date, trip, trip_span};

    fn validator() -> TripValidator {
        TripValidator::new(date("2024-06-30"))
    }

    fn create(record: &TripRecord) -> Vec<TripCandidate> {
        vec![TripCandidate::created(record.clone())]
    }

    #[test]
    fn accepts_first_record_of_a_vehicle() {
        let record = trip(Uuid::new_v4(), "2024-01-10", 100);
        assert_eq!(validator().validate(&[], &create(&record)), Ok(()));
    }

    #[test]
    fn accepts_append_in_order() {
        let vehicle = Uuid::new_v4();
        let first = trip(vehicle, "2024-01-10", 100);
        let second = trip(vehicle, "2024-01-12", 150);
        assert_eq!(validator().validate(&[first], &create(&second)), Ok(()));
    }

    #[test]
    fn accepts_several_trips_on_the_same_day() {
        let vehicle = Uuid::new_v4();
        let morning = trip(vehicle, "2024-01-10", 100);
        let evening = trip(vehicle, "2024-01-10", 140);
        assert_eq!(validator().validate(&[morning], &create(&evening)), Ok(()));
    }

    #[test]
    fn rejects_insertion_before_a_later_return() {
        let vehicle = Uuid::new_v4();
        let existing = vec![trip(vehicle, "2024-01-10", 100), trip(vehicle, "2024-01-12", 150)];
        let between = trip(vehicle, "2024-01-11", 120);
        assert_eq!(
            validator().validate(&existing, &create(&between)),
            Err(RuleViolation::OutOfOrderInsertion)
        );
    }

    #[test]
    fn multi_day_trip_blocks_departures_before_its_return() {
        let vehicle = Uuid::new_v4();
        let long_trip = trip_span(vehicle, "2024-01-10", "2024-01-14", 400);
        let overlapping = trip(vehicle, "2024-01-13", 450);
        assert_eq!(
            validator().validate(&[long_trip], &create(&overlapping)),
            Err(RuleViolation::OutOfOrderInsertion)
        );
    }

    #[test]
    fn rejects_departure_after_return_regardless_of_history() {
        let vehicle = Uuid::new_v4();
        let existing = vec![trip(vehicle, "2024-03-01", 900)];
        let inverted = trip_span(vehicle, "2024-01-12", "2024-01-10", 100);
        assert_eq!(
            validator().validate(&existing, &create(&inverted)),
            Err(RuleViolation::InvalidDateRange)
        );
    }

    #[test]
    fn rejects_future_dates() {
        let record = trip_span(Uuid::new_v4(), "2024-06-30", "2024-07-01", 100);
        assert_eq!(
            validator().validate(&[], &create(&record)),
            Err(RuleViolation::FutureDateNotAllowed)
        );
    }

    #[test]
    fn rejects_zero_odometer_regardless_of_history() {
        let vehicle = Uuid::new_v4();
        let existing = vec![trip(vehicle, "2024-03-01", 900)];
        let zero = trip(vehicle, "2024-01-12", 0);
        assert_eq!(
            validator().validate(&existing, &create(&zero)),
            Err(RuleViolation::NonPositiveOdometer)
        );
        assert_eq!(
            validator().validate(&[], &create(&zero)),
            Err(RuleViolation::NonPositiveOdometer)
        );
    }

    #[test]
    fn rejects_odometer_lower_than_previous_day() {
        let vehicle = Uuid::new_v4();
        let first = trip(vehicle, "2024-01-10", 100);
        let second = trip(vehicle, "2024-01-12", 90);
        assert_eq!(
            validator().validate(&[first], &create(&second)),
            Err(RuleViolation::OdometerRegression)
        );
    }

    #[test]
    fn rejects_zero_distance_trip() {
        let vehicle = Uuid::new_v4();
        let first = trip(vehicle, "2024-01-10", 100);
        let second = trip(vehicle, "2024-01-12", 100);
        assert_eq!(
            validator().validate(&[first], &create(&second)),
            Err(RuleViolation::TripTooShort)
        );
    }

    #[test]
    fn batch_is_checked_in_departure_order() {
        let vehicle = Uuid::new_v4();
        let later = trip(vehicle, "2024-01-12", 150);
        let earlier = trip(vehicle, "2024-01-10", 100);
        let batch = vec![
            TripCandidate::created(later),
            TripCandidate::created(earlier),
        ];
        assert_eq!(validator().validate(&[], &batch), Ok(()));
    }

    #[test]
    fn batch_members_see_each_other_for_odometer_checks() {
        let vehicle = Uuid::new_v4();
        let first = trip(vehicle, "2024-01-10", 100);
        let regressing = trip(vehicle, "2024-01-12", 80);
        let batch = vec![
            TripCandidate::created(first),
            TripCandidate::created(regressing),
        ];
        assert_eq!(
            validator().validate(&[], &batch),
            Err(RuleViolation::OdometerRegression)
        );
    }

    #[test]
    fn edit_without_date_change_skips_order_check() {
        let vehicle = Uuid::new_v4();
        let first = trip(vehicle, "2024-01-10", 100);
        let second = trip(vehicle, "2024-01-12", 150);
        let mut edited = first.clone();
        edited.odometer_at_end = 110;
        let candidate = TripCandidate {
            record: edited,
            scope: CheckScope {
                dates: false,
                odometer: true,
            },
        };
        assert_eq!(
            validator().validate(&[first, second], &[candidate]),
            Ok(())
        );
    }

    #[test]
    fn edit_of_odometer_is_checked_against_predecessor() {
        let vehicle = Uuid::new_v4();
        let first = trip(vehicle, "2024-01-10", 100);
        let second = trip(vehicle, "2024-01-12", 150);
        let mut edited = second.clone();
        edited.odometer_at_end = 100;
        let candidate = TripCandidate {
            record: edited,
            scope: CheckScope {
                dates: false,
                odometer: true,
            },
        };
        assert_eq!(
            validator().validate(&[first, second], &[candidate]),
            Err(RuleViolation::TripTooShort)
        );
    }

    #[test]
    fn rederived_successor_below_its_predecessor_is_a_regression() {
        let vehicle = Uuid::new_v4();
        let mut first = trip(vehicle, "2024-01-10", 100);
        first.odometer_at_end = 200;
        let second = trip(vehicle, "2024-01-12", 150);
        let view = vec![first.clone(), second.clone()];
        assert_eq!(
            check_rederived(&view, &[first, second]),
            Err(RuleViolation::OdometerRegression)
        );
    }

    #[test]
    fn rederived_successor_at_same_reading_is_too_short() {
        let vehicle = Uuid::new_v4();
        let first = trip(vehicle, "2024-01-10", 150);
        let second = trip(vehicle, "2024-01-12", 150);
        let view = vec![first, second.clone()];
        assert_eq!(
            check_rederived(&view, &[second]),
            Err(RuleViolation::TripTooShort)
        );
    }

    #[test]
    fn rederived_chain_in_order_passes() {
        let vehicle = Uuid::new_v4();
        let view = vec![trip(vehicle, "2024-01-10", 120), trip(vehicle, "2024-01-12", 150)];
        assert_eq!(check_rederived(&view, &view), Ok(()));
    }
}
