//! Plain-text rendering of airports and flights.

use chrono::{DateTime, Local, Utc};
use flightsnorway_models::{Airport, Direction, Flight};

/// One catalog line: code, name and position.
pub fn airport_line(airport: &Airport) -> String {
    format!(
        "{:<4} {:<40} {}",
        airport.code(),
        airport.name(),
        airport.location()
    )
}

/// One flight line, e.g. `11:00  SK4035   to BGO    gate E2  departed 11:04`.
pub fn flight_line(flight: &Flight) -> String {
    flight_line_in(flight, |t| t.with_timezone(&Local).format("%H:%M").to_string())
}

fn flight_line_in(flight: &Flight, clock: impl Fn(&DateTime<Utc>) -> String) -> String {
    let preposition = match flight.direction {
        Direction::Arrival => "from",
        Direction::Departure => "to",
    };
    let mut line = format!(
        "{}  {:<8} {} {:<5}",
        clock(&flight.schedule_time),
        flight.flight_id,
        preposition,
        flight.airport
    );

    let detail = match flight.direction {
        Direction::Arrival => flight.belt.as_ref().map(|belt| format!("belt {belt}")),
        Direction::Departure => flight.gate.as_ref().map(|gate| format!("gate {gate}")),
    };
    if let Some(detail) = detail {
        line.push_str("  ");
        line.push_str(&detail);
    }

    if let Some(status) = &flight.status {
        line.push_str("  ");
        line.push_str(status.code.label());
        if let Some(time) = &status.time {
            line.push(' ');
            line.push_str(&clock(time));
        }
    }
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use flightsnorway_models::{AirportCode, FlightStatus, FlightStatusCode, Location};

    fn utc_clock(t: &DateTime<Utc>) -> String {
        t.format("%H:%M").to_string()
    }

    fn departure() -> Flight {
        Flight {
            unique_id: "1".into(),
            flight_id: "SK4035".into(),
            airline: "SK".into(),
            direction: Direction::Departure,
            airport: AirportCode::new("BGO"),
            schedule_time: Utc.with_ymd_and_hms(2011, 3, 9, 11, 0, 0).unwrap(),
            domestic: true,
            check_in: None,
            gate: Some("E2".into()),
            belt: None,
            status: Some(FlightStatus {
                code: FlightStatusCode::Departed,
                time: Some(Utc.with_ymd_and_hms(2011, 3, 9, 11, 4, 0).unwrap()),
            }),
        }
    }

    #[test]
    fn departure_line() {
        assert_eq!(
            flight_line_in(&departure(), utc_clock),
            "11:00  SK4035   to BGO    gate E2  departed 11:04"
        );
    }

    #[test]
    fn arrival_line_without_status() {
        let flight = Flight {
            direction: Direction::Arrival,
            airport: AirportCode::new("TRD"),
            gate: None,
            belt: Some("3".into()),
            status: None,
            ..departure()
        };
        assert_eq!(
            flight_line_in(&flight, utc_clock),
            "11:00  SK4035   from TRD    belt 3"
        );
    }

    #[test]
    fn airport_line_has_code_and_name() {
        let airport = Airport::new("OSL", "Oslo Lufthavn", Location::new(60.1939, 11.1004));
        let line = airport_line(&airport);
        assert!(line.starts_with("OSL  Oslo Lufthavn"));
        assert!(line.ends_with("60.1939, 11.1004"));
    }
}
