//! Parser for the airport catalog document.
//!
//! The catalog is an XML document whose root contains `Airport` elements
//! (at any depth) carrying four URL-encoded attributes:
//!
//! ```xml
//! <Airports>
//!   <Airport Code="OSL" Name="Oslo+Lufthavn%2C+Gardermoen" Lat="60.1939" Lon="11.1004"/>
//! </Airports>
//! ```

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};

use flightsnorway_models::{Airport, Location};
use percent_encoding::percent_decode_str;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::error::CatalogError;

const AIRPORT_ELEMENT: &[u8] = b"Airport";

/// Stateless parser for airport catalog documents.
pub struct AirportCatalogParser;

impl AirportCatalogParser {
    /// Parse every `Airport` element below the root, in document order.
    ///
    /// Fails with [`CatalogError::Parse`] if the document is not well-formed
    /// and with [`CatalogError::Format`] on the first element with a missing
    /// or invalid attribute.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<Airport>, CatalogError> {
        Self::parse_buffered(BufReader::new(reader))
    }

    fn parse_buffered<R: BufRead>(reader: R) -> Result<Vec<Airport>, CatalogError> {
        let mut xml = Reader::from_reader(reader);
        xml.config_mut().trim_text(true);

        let mut airports = Vec::new();
        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut seen_root = false;
        let mut root_closed = false;

        loop {
            let event = xml.read_event_into(&mut buf)?;
            if root_closed && !is_trailing_misc(&event) {
                return Err(CatalogError::Parse(format!(
                    "content after the root element at byte {}",
                    xml.buffer_position()
                )));
            }
            match event {
                Event::Start(element) => {
                    if depth > 0 && element.name().as_ref() == AIRPORT_ELEMENT {
                        airports.push(parse_airport(&element, airports.len())?);
                    }
                    seen_root = true;
                    depth += 1;
                }
                Event::Empty(element) => {
                    if depth > 0 && element.name().as_ref() == AIRPORT_ELEMENT {
                        airports.push(parse_airport(&element, airports.len())?);
                    }
                    seen_root = true;
                    root_closed = depth == 0;
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    root_closed = depth == 0;
                }
                Event::Text(text) if depth == 0 && !is_blank(&text) => {
                    return Err(CatalogError::Parse("text outside the root element".into()));
                }
                Event::CData(_) if depth == 0 => {
                    return Err(CatalogError::Parse("CDATA outside the root element".into()));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !seen_root {
            return Err(CatalogError::Parse("document has no root element".into()));
        }
        if depth != 0 {
            return Err(CatalogError::Parse(
                "document ended before the root element was closed".into(),
            ));
        }

        tracing::debug!(count = airports.len(), "parsed airport catalog");
        Ok(airports)
    }
}

/// Comments, processing instructions and whitespace may follow the root.
fn is_trailing_misc(event: &Event<'_>) -> bool {
    match event {
        Event::Comment(_) | Event::PI(_) | Event::Eof => true,
        Event::Text(text) => is_blank(text),
        _ => false,
    }
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn parse_airport(element: &BytesStart<'_>, index: usize) -> Result<Airport, CatalogError> {
    let mut code = None;
    let mut name = None;
    let mut lat = None;
    let mut lon = None;

    for attribute in element.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let slot = match attribute.key.as_ref() {
            b"Code" => &mut code,
            b"Name" => &mut name,
            b"Lat" => &mut lat,
            b"Lon" => &mut lon,
            _ => continue,
        };
        *slot = Some(attribute.unescape_value()?.into_owned());
    }

    let code = url_decode(&required(code, "Code", index)?, "Code", index)?;
    let name = url_decode(&required(name, "Name", index)?, "Name", index)?;
    let latitude = coordinate(&required(lat, "Lat", index)?, "Lat", 90.0, index)?;
    let longitude = coordinate(&required(lon, "Lon", index)?, "Lon", 180.0, index)?;

    let code = code.trim();
    if code.is_empty() {
        return Err(CatalogError::Format {
            element_index: index,
            reason: "attribute \"Code\" is empty".into(),
        });
    }

    Ok(Airport::new(
        code.to_uppercase().as_str(),
        &name,
        Location::new(latitude, longitude),
    ))
}

fn required(value: Option<String>, attribute: &str, index: usize) -> Result<String, CatalogError> {
    value.ok_or_else(|| CatalogError::Format {
        element_index: index,
        reason: format!("missing attribute \"{attribute}\""),
    })
}

/// Decode form-style URL encoding: `+` is a space, `%XX` is a byte.
fn url_decode(raw: &str, attribute: &str, index: usize) -> Result<String, CatalogError> {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| CatalogError::Format {
            element_index: index,
            reason: format!("attribute \"{attribute}\" is not valid UTF-8 once decoded: {e}"),
        })
}

fn coordinate(raw: &str, attribute: &str, limit: f64, index: usize) -> Result<f64, CatalogError> {
    let decoded = url_decode(raw, attribute, index)?;
    let invalid = |reason: String| CatalogError::Format {
        element_index: index,
        reason,
    };

    let value: f64 = decoded
        .trim()
        .parse()
        .map_err(|_| invalid(format!("attribute \"{attribute}\" is not a number: \"{decoded}\"")))?;

    if !value.is_finite() || !(-limit..=limit).contains(&value) {
        return Err(invalid(format!(
            "attribute \"{attribute}\" is out of range: {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Airports>
  <Airport Code="OSL" Name="Oslo+Lufthavn%2C+Gardermoen" Lat="60.1939" Lon="11.1004"/>
  <Airport Code="BGO" Name="Bergen+Lufthavn%2C+Flesland" Lat="60.2934" Lon="5.2181"/>
  <Airport Code="TOS" Name="Troms%C3%B8+Lufthavn%2C+Langnes" Lat="69.6833" Lon="18.9189"/>
</Airports>"#;

    fn parse(doc: &str) -> Result<Vec<Airport>, CatalogError> {
        AirportCatalogParser::parse(doc.as_bytes())
    }

    #[test]
    fn parses_every_airport_in_order() {
        let airports = parse(CATALOG).unwrap();
        let codes: Vec<_> = airports.iter().map(|a| a.code().as_str()).collect();
        assert_eq!(codes, vec!["OSL", "BGO", "TOS"]);
    }

    #[test]
    fn decodes_names() {
        let airports = parse(CATALOG).unwrap();
        assert_eq!(airports[0].name(), "Oslo Lufthavn, Gardermoen");
        assert_eq!(airports[2].name(), "Tromsø Lufthavn, Langnes");
    }

    #[test]
    fn parses_coordinates() {
        let airports = parse(CATALOG).unwrap();
        assert_eq!(airports[1].location(), Location::new(60.2934, 5.2181));
    }

    #[test]
    fn finds_nested_airports_with_bodies() {
        let doc = r#"<Root><Region name="north">
            <Airport Code="BOO" Name="Bod%C3%B8" Lat="67.2692" Lon="14.3653"></Airport>
        </Region></Root>"#;
        let airports = parse(doc).unwrap();
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].name(), "Bodø");
    }

    #[test]
    fn root_element_itself_is_not_an_airport() {
        let doc = r#"<Airport Code="X" Name="Y" Lat="1" Lon="2"/>"#;
        assert!(parse(doc).unwrap().is_empty());
    }

    #[test]
    fn empty_root_yields_no_airports() {
        assert!(parse("<Airports/>").unwrap().is_empty());
    }

    #[test]
    fn xml_entities_are_unescaped_before_url_decoding() {
        let doc = r#"<A><Airport Code="AES" Name="Vigra &amp; %C3%85lesund" Lat="62.56" Lon="6.11"/></A>"#;
        let airports = parse(doc).unwrap();
        assert_eq!(airports[0].name(), "Vigra & Ålesund");
    }

    #[test]
    fn malformed_markup_is_a_parse_error() {
        let err = parse("<Airports><Airport Code=\"OSL\"</Airports>").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn mismatched_end_tag_is_a_parse_error() {
        let err = parse("<Airports></Airport>").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn unclosed_root_is_a_parse_error() {
        let err = parse(r#"<Airports><Airport Code="OSL" Name="Oslo" Lat="60" Lon="11"/>"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn empty_document_is_a_parse_error() {
        assert!(matches!(parse("").unwrap_err(), CatalogError::Parse(_)));
    }

    #[test]
    fn missing_attribute_is_a_format_error() {
        let doc = r#"<A>
            <Airport Code="OSL" Name="Oslo" Lat="60" Lon="11"/>
            <Airport Code="BGO" Name="Bergen" Lat="60"/>
        </A>"#;
        match parse(doc).unwrap_err() {
            CatalogError::Format {
                element_index,
                reason,
            } => {
                assert_eq!(element_index, 1);
                assert!(reason.contains("Lon"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_code_is_a_format_error() {
        let doc = r#"<A><Airport Name="Oslo" Lat="60" Lon="11"/></A>"#;
        assert!(matches!(parse(doc).unwrap_err(), CatalogError::Format { .. }));
    }

    #[test]
    fn non_numeric_latitude_is_a_format_error() {
        let doc = r#"<A><Airport Code="OSL" Name="Oslo" Lat="sixty" Lon="11"/></A>"#;
        assert!(matches!(parse(doc).unwrap_err(), CatalogError::Format { .. }));
    }

    #[test]
    fn non_finite_coordinate_is_a_format_error() {
        let doc = r#"<A><Airport Code="OSL" Name="Oslo" Lat="60" Lon="inf"/></A>"#;
        assert!(matches!(parse(doc).unwrap_err(), CatalogError::Format { .. }));
    }

    #[test]
    fn invalid_utf8_after_decoding_is_a_format_error() {
        let doc = r#"<A><Airport Code="OSL" Name="Oslo%FF" Lat="60" Lon="11"/></A>"#;
        assert!(matches!(parse(doc).unwrap_err(), CatalogError::Format { .. }));
    }

    #[test]
    fn second_root_element_is_a_parse_error() {
        let doc = r#"<A/><B><Airport Code="OSL" Name="Oslo" Lat="60" Lon="11"/></B>"#;
        assert!(matches!(parse(doc).unwrap_err(), CatalogError::Parse(_)));
    }

    #[test]
    fn airport_after_root_is_a_parse_error() {
        let doc = r#"<A></A><Airport Code="OSL" Name="Oslo" Lat="60" Lon="11"/>"#;
        assert!(matches!(parse(doc).unwrap_err(), CatalogError::Parse(_)));
    }

    #[test]
    fn text_after_root_is_a_parse_error() {
        assert!(matches!(parse("<A></A>garbage").unwrap_err(), CatalogError::Parse(_)));
    }

    #[test]
    fn text_before_root_is_a_parse_error() {
        assert!(matches!(parse("junk<A></A>").unwrap_err(), CatalogError::Parse(_)));
    }

    #[test]
    fn trailing_whitespace_and_comments_are_allowed() {
        let doc = "<A><Airport Code=\"OSL\" Name=\"Oslo\" Lat=\"60\" Lon=\"11\"/></A>\n<!-- end -->\n";
        assert_eq!(parse(doc).unwrap().len(), 1);
    }

    #[test]
    fn codes_are_normalised_to_upper_case() {
        let doc = r#"<A><Airport Code="+osl+" Name="Oslo" Lat="60" Lon="11"/></A>"#;
        let airports = parse(doc).unwrap();
        assert_eq!(airports[0].code().as_str(), "OSL");
        assert_eq!(airports[0], Airport::new("OSL", "Oslo", Location::new(60.0, 11.0)));
    }

    #[test]
    fn blank_code_is_a_format_error() {
        let doc = r#"<A><Airport Code="+" Name="Oslo" Lat="60" Lon="11"/></A>"#;
        assert!(matches!(parse(doc).unwrap_err(), CatalogError::Format { .. }));
    }

    #[test]
    fn parser_is_reusable() {
        let first = parse(CATALOG).unwrap();
        let second = parse(CATALOG).unwrap();
        assert_eq!(first, second);
    }
}
