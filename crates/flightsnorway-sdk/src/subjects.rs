//! Canonical NATS subject names for FlightsNorway push notifications.
//!
//! # Subject layout
//!
//! ```text
//! flightsnorway.v1.push.{device}   ← a device SUBSCRIBES here
//! flightsnorway.v1.push.>          ← a sender may fan out to every device
//! ```

/// Current subject version prefix.
const VERSION: &str = "v1";

/// Central authority for push subject names.
///
/// # Examples
///
/// ```
/// use flightsnorway_sdk::PushSubjects;
///
/// assert_eq!(PushSubjects::device("phone-1"), "flightsnorway.v1.push.phone-1");
/// assert_eq!(PushSubjects::all_devices(), "flightsnorway.v1.push.>");
/// ```
pub struct PushSubjects;

impl PushSubjects {
    /// Subject a device listens on for pushed messages.
    ///
    /// Characters NATS treats specially (`.`, `*`, `>`, whitespace) are
    /// replaced with `_` so a device id always maps to a single token.
    pub fn device(device_id: &str) -> String {
        let token: String = device_id
            .chars()
            .map(|c| match c {
                '.' | '*' | '>' => '_',
                c if c.is_whitespace() => '_',
                c => c,
            })
            .collect();
        format!("flightsnorway.{VERSION}.push.{token}")
    }

    /// Wildcard subject that matches every device's push subject.
    pub fn all_devices() -> String {
        format!("flightsnorway.{VERSION}.push.>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_subject() {
        assert_eq!(PushSubjects::device("local"), "flightsnorway.v1.push.local");
    }

    #[test]
    fn device_subject_is_a_single_token() {
        assert_eq!(
            PushSubjects::device("my phone.v2>*"),
            "flightsnorway.v1.push.my_phone_v2__"
        );
    }

    #[test]
    fn wildcard_matches_device_prefix() {
        let wildcard = PushSubjects::all_devices();
        let prefix = wildcard.trim_end_matches('>');
        assert!(PushSubjects::device("abc").starts_with(prefix));
    }
}
