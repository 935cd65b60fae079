//! Parser for the Avinor flight XML feed.
//!
//! ```text
//! <airport name="OSL">
//!   <flights lastUpdate="...">
//!     <flight uniqueID="...">
//!       <airline/> <flight_id/> <dom_int/> <schedule_time/> <arr_dep/>
//!       <airport/> <check_in/> <gate/> <belt/> <status code="" time=""/>
//!     </flight>
//!   </flights>
//! </airport>
//! ```

use std::io::{BufReader, Read};

use chrono::{DateTime, NaiveDateTime, Utc};
use flightsnorway_models::{AirportCode, Direction, Flight, FlightStatus, FlightStatusCode};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::FeedError;

/// Stateless parser for the flights feed.
pub struct FlightFeedParser;

impl FlightFeedParser {
    /// Parse every `flight` element in document order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<Flight>, FeedError> {
        let mut xml = Reader::from_reader(BufReader::new(reader));
        xml.config_mut().trim_text(true);

        let mut flights = Vec::new();
        let mut buf = Vec::new();
        let mut current: Option<PartialFlight> = None;
        let mut field: Option<String> = None;

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(element) => {
                    let name = element.name();
                    if let Some(flight) = current.as_mut() {
                        if name.as_ref() == b"status" {
                            flight.status = Some(parse_status(&element, flights.len())?);
                        } else {
                            field = Some(String::from_utf8_lossy(name.as_ref()).into_owned());
                        }
                    } else if name.as_ref() == b"flight" {
                        current = Some(PartialFlight::from_element(&element)?);
                    }
                }
                Event::Empty(element) => {
                    let name = element.name();
                    if let Some(flight) = current.as_mut() {
                        if name.as_ref() == b"status" {
                            flight.status = Some(parse_status(&element, flights.len())?);
                        }
                    } else if name.as_ref() == b"flight" {
                        let partial = PartialFlight::from_element(&element)?;
                        flights.push(partial.build(flights.len())?);
                    }
                }
                Event::Text(text) => {
                    if let (Some(flight), Some(name)) = (&mut current, &field) {
                        flight.set(name, text.unescape()?.into_owned());
                    }
                }
                Event::End(element) => {
                    if element.name().as_ref() == b"flight" {
                        if let Some(partial) = current.take() {
                            flights.push(partial.build(flights.len())?);
                        }
                    }
                    field = None;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if current.is_some() {
            return Err(FeedError::Parse("document ended inside <flight>".into()));
        }

        tracing::debug!(count = flights.len(), "parsed flights feed");
        Ok(flights)
    }
}

#[derive(Default)]
struct PartialFlight {
    unique_id: String,
    airline: Option<String>,
    flight_id: Option<String>,
    dom_int: Option<String>,
    schedule_time: Option<String>,
    arr_dep: Option<String>,
    airport: Option<String>,
    check_in: Option<String>,
    gate: Option<String>,
    belt: Option<String>,
    status: Option<FlightStatus>,
}

impl PartialFlight {
    fn from_element(element: &BytesStart<'_>) -> Result<Self, FeedError> {
        let mut unique_id = String::new();
        for attribute in element.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            if attribute.key.as_ref() == b"uniqueID" {
                unique_id = attribute.unescape_value()?.into_owned();
            }
        }
        Ok(Self {
            unique_id,
            ..Default::default()
        })
    }

    fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "airline" => &mut self.airline,
            "flight_id" => &mut self.flight_id,
            "dom_int" => &mut self.dom_int,
            "schedule_time" => &mut self.schedule_time,
            "arr_dep" => &mut self.arr_dep,
            "airport" => &mut self.airport,
            "check_in" => &mut self.check_in,
            "gate" => &mut self.gate,
            "belt" => &mut self.belt,
            _ => return,
        };
        *slot = Some(value);
    }

    fn build(self, index: usize) -> Result<Flight, FeedError> {
        let flight_id = self.flight_id.ok_or(FeedError::MissingField {
            index,
            field: "flight_id",
        })?;
        let arr_dep = self.arr_dep.ok_or(FeedError::MissingField {
            index,
            field: "arr_dep",
        })?;
        let airport = self.airport.ok_or(FeedError::MissingField {
            index,
            field: "airport",
        })?;
        let schedule_time = self.schedule_time.ok_or(FeedError::MissingField {
            index,
            field: "schedule_time",
        })?;

        let direction = Direction::from_code(&arr_dep).map_err(|_| FeedError::InvalidValue {
            index,
            field: "arr_dep",
            value: arr_dep.clone(),
        })?;
        let schedule_time =
            parse_timestamp(&schedule_time).ok_or_else(|| FeedError::InvalidValue {
                index,
                field: "schedule_time",
                value: schedule_time.clone(),
            })?;

        Ok(Flight {
            unique_id: self.unique_id,
            airline: self.airline.unwrap_or_default(),
            flight_id,
            direction,
            airport: AirportCode::new(&airport),
            schedule_time,
            domestic: self.dom_int.as_deref() == Some("D"),
            check_in: self.check_in,
            gate: self.gate,
            belt: self.belt,
            status: self.status,
        })
    }
}

fn parse_status(element: &BytesStart<'_>, index: usize) -> Result<FlightStatus, FeedError> {
    let mut code = None;
    let mut time = None;
    for attribute in element.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        match attribute.key.as_ref() {
            b"code" => code = Some(attribute.unescape_value()?.into_owned()),
            b"time" => time = Some(attribute.unescape_value()?.into_owned()),
            _ => {}
        }
    }

    let code = code.ok_or(FeedError::MissingField {
        index,
        field: "status code",
    })?;
    let time = match time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| FeedError::InvalidValue {
            index,
            field: "status time",
            value: raw.to_string(),
        })?),
    };

    Ok(FlightStatus {
        code: FlightStatusCode::from_code(&code),
        time,
    })
}

/// Feed timestamps are RFC 3339, or naive ISO 8601 meaning UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
