//! A minimal iCalendar (RFC 5545) writer for booking invites.
//!
//! Only the handful of properties the owner invites need are supported. Output uses CRLF line endings, escapes text
//! values, and folds lines longer than 75 octets.
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const PRODID: &str = "-//Kokomo Yacht Club//BookingInvite//EN";
const MAX_LINE_OCTETS: usize = 75;

#[derive(Debug, Clone)]
pub struct CalendarInvite {
    pub uid: String,
    pub stamp: DateTime<Utc>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// DTSTART and DTEND are written as local times in this zone
    pub timezone: Tz,
    pub summary: String,
    pub description: String,
    pub organizer_name: String,
    pub organizer_email: String,
    /// Minutes before the start at which the reminder fires
    pub reminder_minutes: u32,
}

impl CalendarInvite {
    /// Creates an invite with a random UID under `domain`, stamped now, with a 30 minute reminder.
    pub fn new(domain: &str, start: DateTime<Utc>, end: DateTime<Utc>, timezone: Tz) -> Self {
        Self {
            uid: format!("{:032x}@{domain}", rand::random::<u128>()),
            stamp: Utc::now(),
            start,
            end,
            timezone,
            summary: String::default(),
            description: String::default(),
            organizer_name: String::default(),
            organizer_email: String::default(),
            reminder_minutes: 30,
        }
    }

    pub fn with_summary<S: Into<String>>(mut self, summary: S) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_organizer<S: Into<String>>(mut self, name: S, email: S) -> Self {
        self.organizer_name = name.into();
        self.organizer_email = email.into();
        self
    }

    pub fn to_ics(&self) -> String {
        let tz = self.timezone.name();
        let local = |t: &DateTime<Utc>| t.with_timezone(&self.timezone).format("%Y%m%dT%H%M%S").to_string();
        let lines = [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{PRODID}"),
            "METHOD:PUBLISH".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
            format!("DTSTAMP:{}", self.stamp.format("%Y%m%dT%H%M%SZ")),
            format!("DTSTART;TZID={tz}:{}", local(&self.start)),
            format!("DTEND;TZID={tz}:{}", local(&self.end)),
            format!("SUMMARY:{}", escape_text(&self.summary)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
            format!("ORGANIZER;CN={}:mailto:{}", escape_param(&self.organizer_name), self.organizer_email),
            "BEGIN:VALARM".to_string(),
            "ACTION:DISPLAY".to_string(),
            "DESCRIPTION:Booking Reminder".to_string(),
            format!("TRIGGER:-PT{}M", self.reminder_minutes),
            "END:VALARM".to_string(),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ];
        lines.iter().map(|l| fold_line(l)).fold(String::new(), |mut ics, line| {
            ics.push_str(&line);
            ics.push_str("\r\n");
            ics
        })
    }
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {},
            c => out.push(c),
        }
    }
    out
}

/// Parameter values cannot be escaped, so they are quoted when they contain separators.
fn escape_param(s: &str) -> String {
    let s = s.replace('"', "'");
    if s.contains([':', ';', ',']) {
        format!("\"{s}\"")
    } else {
        s
    }
}

/// Splits a content line into chunks of at most 75 octets. Continuation lines start with a single space, which counts
/// towards their length. Multi-byte characters are never split.
fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 3 * (line.len() / MAX_LINE_OCTETS));
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    fn invite() -> CalendarInvite {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 21, 0, 0).unwrap();
        CalendarInvite::new("kokomoyachtclub.vip", start, end, chrono_tz::America::New_York)
            .with_summary("Kokomo Yachts: Wanderlust Booked")
            .with_description("Guest: Jane Member\nTour: 1 Full Day")
            .with_organizer("Kokomo Crew", "info@kokomoyachts.com")
    }

    #[test]
    fn event_in_local_time() {
        let ics = invite().to_ics();
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Kokomo Yacht Club//BookingInvite//EN\r\n"));
        assert!(ics.contains("\r\nMETHOD:PUBLISH\r\n"));
        assert!(ics.contains("\r\nDTSTART;TZID=America/New_York:20240601T090000\r\n"));
        assert!(ics.contains("\r\nDTEND;TZID=America/New_York:20240601T170000\r\n"));
        assert!(ics.contains("\r\nSUMMARY:Kokomo Yachts: Wanderlust Booked\r\n"));
        assert!(ics.contains("\r\nDESCRIPTION:Guest: Jane Member\\nTour: 1 Full Day\r\n"));
        assert!(ics.contains("\r\nORGANIZER;CN=Kokomo Crew:mailto:info@kokomoyachts.com\r\n"));
        assert!(ics.contains("\r\nTRIGGER:-PT30M\r\n"));
        assert!(ics.contains("\r\nDESCRIPTION:Booking Reminder\r\n"));
        assert!(ics.ends_with("END:VEVENT\r\nEND:VCALENDAR\r\n"));
        assert!(!ics.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn uid_uses_domain() {
        let a = invite();
        let b = invite();
        assert!(a.uid.ends_with("@kokomoyachtclub.vip"));
        assert_ne!(a.uid, b.uid);
    }

    #[test]
    fn text_escaping() {
        assert_eq!(escape_text("a,b;c\\d\r\ne"), "a\\,b\\;c\\\\d\\ne");
        assert_eq!(escape_param("Crew, Inc"), "\"Crew, Inc\"");
        assert_eq!(escape_param("Kokomo Crew"), "Kokomo Crew");
    }

    #[test]
    fn long_lines_are_folded() {
        let line = format!("DESCRIPTION:{}", "x".repeat(200));
        let folded = fold_line(&line);
        let parts = folded.split("\r\n").collect::<Vec<_>>();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() <= 75));
        assert!(parts[1..].iter().all(|p| p.starts_with(' ')));
        let unfolded = folded.replace("\r\n ", "");
        assert_eq!(unfolded, line);
    }

    #[test]
    fn folding_keeps_characters_whole() {
        let line = format!("SUMMARY:{}", "⚓".repeat(40));
        let folded = fold_line(&line);
        for part in folded.split("\r\n") {
            assert!(part.len() <= 75);
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }
}
