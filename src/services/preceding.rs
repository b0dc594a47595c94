//! Búsqueda del registro inmediatamente anterior
//!
//! Dentro de un vehículo los registros se ordenan por (fecha de salida, odómetro).
//! Un registro precede a otro si es del mismo día con odómetro menor, o de un día
//! anterior con cualquier odómetro.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::TripRecord;

/// Posición de un registro en el orden de su vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OdometerPosition {
    pub vehicle_id: Uuid,
    pub departure_date: NaiveDate,
    pub odometer_at_end: i64,
}

impl OdometerPosition {
    pub fn of(record: &TripRecord) -> Self {
        Self {
            vehicle_id: record.vehicle_id,
            departure_date: record.departure_date,
            odometer_at_end: record.odometer_at_end,
        }
    }
}

/// `(mismo día Y odómetro menor) O (día anterior)`, siempre del mismo vehículo
pub fn precedes(candidate: &TripRecord, subject: &OdometerPosition) -> bool {
    if candidate.vehicle_id != subject.vehicle_id {
        return false;
    }
    let same_day_lower = candidate.departure_date == subject.departure_date
        && candidate.odometer_at_end < subject.odometer_at_end;
    same_day_lower || candidate.departure_date < subject.departure_date
}

/// Devuelve el mayor registro que precede a `subject`, ignorando el de id `exclude`.
///
/// Con varios candidatos gana la fecha de salida más reciente, luego el odómetro
/// más alto y por último el id, de modo que el resultado no depende del orden
/// en que el almacén devuelva las filas.
pub fn find_preceding<'a, I>(
    records: I,
    subject: &OdometerPosition,
    exclude: Option<Uuid>,
) -> Option<&'a TripRecord>
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    records
        .into_iter()
        .filter(|record| Some(record.id) != exclude)
        .filter(|record| precedes(record, subject))
        .max_by_key(|record| (record.departure_date, record.odometer_at_end, record.id))
}

/// Atajo para un registro ya construido: se excluye a sí mismo
pub fn preceding_of<'a, I>(records: I, record: &TripRecord) -> Option<&'a TripRecord>
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    find_preceding(records, &OdometerPosition::of(record), Some(record.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::trip;

    #[test]
    fn no_records_means_no_predecessor() {
        let subject = trip(Uuid::new_v4(), "2024-01-10", 100);
        let records: Vec<TripRecord> = Vec::new();
        assert!(preceding_of(&records, &subject).is_none());
    }

    #[test]
    fn earlier_day_precedes_regardless_of_odometer() {
        let vehicle = Uuid::new_v4();
        let earlier = trip(vehicle, "2024-01-09", 500);
        let subject = trip(vehicle, "2024-01-10", 100);
        let records = vec![earlier.clone()];
        assert_eq!(preceding_of(&records, &subject).map(|r| r.id), Some(earlier.id));
    }

    #[test]
    fn same_day_requires_lower_odometer() {
        let vehicle = Uuid::new_v4();
        let lower = trip(vehicle, "2024-01-10", 80);
        let higher = trip(vehicle, "2024-01-10", 120);
        let subject = trip(vehicle, "2024-01-10", 100);
        let records = vec![lower.clone(), higher];
        assert_eq!(preceding_of(&records, &subject).map(|r| r.id), Some(lower.id));
    }

    #[test]
    fn picks_closest_same_day_record() {
        let vehicle = Uuid::new_v4();
        let records = vec![
            trip(vehicle, "2024-01-09", 40),
            trip(vehicle, "2024-01-10", 60),
            trip(vehicle, "2024-01-10", 90),
        ];
        let subject = trip(vehicle, "2024-01-10", 100);
        assert_eq!(
            preceding_of(&records, &subject).map(|r| r.odometer_at_end),
            Some(90)
        );
    }

    #[test]
    fn picks_latest_earlier_day_then_highest_odometer() {
        let vehicle = Uuid::new_v4();
        let records = vec![
            trip(vehicle, "2024-01-05", 70),
            trip(vehicle, "2024-01-08", 50),
            trip(vehicle, "2024-01-08", 60),
        ];
        let subject = trip(vehicle, "2024-01-10", 100);
        let found = preceding_of(&records, &subject).unwrap();
        assert_eq!(found.departure_date.to_string(), "2024-01-08");
        assert_eq!(found.odometer_at_end, 60);
    }

    #[test]
    fn other_vehicles_are_ignored() {
        let subject = trip(Uuid::new_v4(), "2024-01-10", 100);
        let records = vec![trip(Uuid::new_v4(), "2024-01-01", 10)];
        assert!(preceding_of(&records, &subject).is_none());
    }

    #[test]
    fn stored_copy_of_subject_is_excluded() {
        let vehicle = Uuid::new_v4();
        let stored = trip(vehicle, "2024-01-10", 100);
        let mut edited = stored.clone();
        edited.odometer_at_end = 130;
        let records = vec![stored];
        assert!(preceding_of(&records, &edited).is_none());
    }
}
