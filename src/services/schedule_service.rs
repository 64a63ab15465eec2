//! Generación del calendario recurrente de sesiones
//!
//! Produce la plantilla semanal del circuito: franjas horarias de 9:00 a
//! 22:00 todos los días; entre semana el Grand Prix es a las 18:00 y los
//! fines de semana a las 12:00, 15:00 y 18:00. Las franjas en el pasado
//! se omiten.
//!
//! La función es pura: quien la llama inserta las franjas mediante el
//! catálogo de sesiones (inserción idempotente por clave única).

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::session_slot::SessionType;

const FIRST_SLOT_HOUR: u32 = 9;
const LAST_SLOT_HOUR: u32 = 22;
const WEEKDAY_GRAND_PRIX_HOUR: u32 = 18;
const WEEKEND_GRAND_PRIX_HOURS: [u32; 3] = [12, 15, 18];

const OPEN_SESSION_MINUTES: i64 = 60;
const GRAND_PRIX_MINUTES: i64 = 90;

const OPEN_SESSION_CAPACITY: i32 = 10;
const GRAND_PRIX_CAPACITY: i32 = 12;

/// Franja generada por la plantilla, pendiente de insertar
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledSlot {
    pub session_type: SessionType,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub capacity: i32,
    pub price: Decimal,
}

fn open_session_price() -> Decimal {
    Decimal::new(3500, 2) // 35.00
}

fn grand_prix_price() -> Decimal {
    Decimal::new(5500, 2) // 55.00
}

/// Generar las franjas de los próximos `days` días a partir de `now`,
/// omitiendo las que ya habrían comenzado.
pub fn build_schedule(now: DateTime<Utc>, days: i64) -> Vec<ScheduledSlot> {
    let mut slots = Vec::new();
    let start_date = now.date_naive();

    for day_offset in 0..days {
        let date = start_date + Duration::days(day_offset);
        let is_weekend = date.weekday().num_days_from_monday() >= 5;

        for hour in FIRST_SLOT_HOUR..=LAST_SLOT_HOUR {
            let is_grand_prix = if is_weekend {
                WEEKEND_GRAND_PRIX_HOURS.contains(&hour)
            } else {
                hour == WEEKDAY_GRAND_PRIX_HOUR
            };

            let (session_type, minutes, capacity, price) = if is_grand_prix {
                (
                    SessionType::GrandPrix,
                    GRAND_PRIX_MINUTES,
                    GRAND_PRIX_CAPACITY,
                    grand_prix_price(),
                )
            } else {
                (
                    SessionType::OpenSession,
                    OPEN_SESSION_MINUTES,
                    OPEN_SESSION_CAPACITY,
                    open_session_price(),
                )
            };

            // las horas de la plantilla siempre son válidas
            let naive = date
                .and_hms_opt(hour, 0, 0)
                .expect("template hour out of range");
            let start_datetime = Utc.from_utc_datetime(&naive);

            if start_datetime < now {
                continue;
            }

            slots.push(ScheduledSlot {
                session_type,
                start_datetime,
                end_datetime: start_datetime + Duration::minutes(minutes),
                capacity,
                price,
            });
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    // El 2026-08-10 es lunes; el 2026-08-15, sábado
    fn monday_midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 10, 0, 0, 0).unwrap()
    }

    fn saturday_midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_full_weekday_has_fourteen_slots() {
        let slots = build_schedule(monday_midnight(), 1);
        assert_eq!(slots.len(), 14); // 9:00 a 22:00 inclusive
    }

    #[test]
    fn test_weekday_grand_prix_at_six_pm() {
        let slots = build_schedule(monday_midnight(), 1);
        let grand_prix: Vec<_> = slots
            .iter()
            .filter(|s| s.session_type == SessionType::GrandPrix)
            .collect();

        assert_eq!(grand_prix.len(), 1);
        assert_eq!(grand_prix[0].start_datetime.time().to_string(), "18:00:00");
        assert_eq!(grand_prix[0].capacity, GRAND_PRIX_CAPACITY);
        assert_eq!(grand_prix[0].price, Decimal::new(5500, 2));
        assert_eq!(
            grand_prix[0].end_datetime - grand_prix[0].start_datetime,
            Duration::minutes(90)
        );
    }

    #[test]
    fn test_weekend_has_three_grand_prix() {
        let slots = build_schedule(saturday_midnight(), 1);
        let grand_prix_hours: Vec<u32> = slots
            .iter()
            .filter(|s| s.session_type == SessionType::GrandPrix)
            .map(|s| {
                use chrono::Timelike;
                s.start_datetime.hour()
            })
            .collect();

        assert_eq!(grand_prix_hours, vec![12, 15, 18]);
    }

    #[test]
    fn test_open_session_shape() {
        let slots = build_schedule(monday_midnight(), 1);
        let open = slots
            .iter()
            .find(|s| s.session_type == SessionType::OpenSession)
            .unwrap();

        assert_eq!(open.capacity, OPEN_SESSION_CAPACITY);
        assert_eq!(open.price, Decimal::new(3500, 2));
        assert_eq!(open.end_datetime - open.start_datetime, Duration::minutes(60));
    }

    #[test]
    fn test_past_slots_are_skipped() {
        // a mediodía ya han pasado las franjas de 9, 10 y 11
        let noon = Utc.with_ymd_and_hms(2026, 8, 10, 12, 0, 0).unwrap();
        let slots = build_schedule(noon, 1);

        assert_eq!(slots.len(), 11); // 12:00 a 22:00
        assert!(slots.iter().all(|s| s.start_datetime >= noon));
    }

    #[test]
    fn test_multiple_days() {
        let slots = build_schedule(monday_midnight(), 7);
        // 5 días entre semana + 2 de fin de semana, 14 franjas cada uno
        assert_eq!(slots.len(), 98);

        let grand_prix_count = slots
            .iter()
            .filter(|s| s.session_type == SessionType::GrandPrix)
            .count();
        // 5 GP entre semana + 3 por cada día del fin de semana
        assert_eq!(grand_prix_count, 11);
    }
}
