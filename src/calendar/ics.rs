//! Just enough RFC 5545 to write our lottery calendars and read them back.
//!
//! Only VEVENT properties the program writes are kept when parsing; everything
//! else in a file (foreign components, X- properties) is skipped.

use crate::calendar::CalendarError;
use crate::domain::timezone::{
    from_display_local, to_display_time, DISPLAY_OFFSET_SECS, DISPLAY_TZID,
};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

const PRODID: &str = "-//house_calendar//FFXIV housing lottery//ZH";
const MAX_LINE_OCTETS: usize = 75;
const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    pub dtstamp: DateTime<Utc>,
    pub summary: String,
    pub start: DateTime<FixedOffset>,
    pub end: Option<DateTime<FixedOffset>>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calendar {
    pub events: Vec<CalendarEvent>,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    pub fn find_by_summary_mut(&mut self, summary: &str) -> Option<&mut CalendarEvent> {
        self.events.iter_mut().find(|e| e.summary == summary)
    }

    pub fn to_ics(&self) -> String {
        let mut out = String::new();

        push_line(&mut out, "BEGIN:VCALENDAR");
        push_line(&mut out, "VERSION:2.0");
        push_line(&mut out, &format!("PRODID:{PRODID}"));
        push_line(&mut out, "CALSCALE:GREGORIAN");
        push_line(&mut out, "BEGIN:VTIMEZONE");
        push_line(&mut out, &format!("TZID:{DISPLAY_TZID}"));
        for line in [
            "BEGIN:STANDARD",
            "DTSTART:19700101T000000",
            "TZOFFSETFROM:+0800",
            "TZOFFSETTO:+0800",
            "TZNAME:CST",
            "END:STANDARD",
            "END:VTIMEZONE",
        ] {
            push_line(&mut out, line);
        }

        for event in &self.events {
            push_line(&mut out, "BEGIN:VEVENT");
            push_line(&mut out, &format!("UID:{}", escape_text(&event.uid)));
            push_line(&mut out, &format!("DTSTAMP:{}", event.dtstamp.format(UTC_FORMAT)));
            push_line(&mut out, &format!("SUMMARY:{}", escape_text(&event.summary)));
            push_line(&mut out, &format_date_time("DTSTART", &event.start));
            if let Some(end) = &event.end {
                push_line(&mut out, &format_date_time("DTEND", end));
            }
            if !event.description.is_empty() {
                push_line(
                    &mut out,
                    &format!("DESCRIPTION:{}", escape_text(&event.description)),
                );
            }
            push_line(&mut out, "END:VEVENT");
        }

        push_line(&mut out, "END:VCALENDAR");
        out
    }

    pub fn parse(input: &str) -> Result<Self, CalendarError> {
        let mut calendar = Calendar::new();
        let mut saw_calendar = false;
        let mut depth = 0usize;
        let mut event: Option<EventBuilder> = None;

        for (index, line) in unfold(input).iter().enumerate() {
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            let prop = ContentLine::parse(line).ok_or_else(|| CalendarError::Parse {
                line: line_no,
                message: format!("not a content line: {line}"),
            })?;

            match prop.name.as_str() {
                "BEGIN" => {
                    if prop.value.eq_ignore_ascii_case("VCALENDAR") {
                        saw_calendar = true;
                    }
                    if prop.value.eq_ignore_ascii_case("VEVENT") {
                        if event.is_some() {
                            return Err(CalendarError::Parse {
                                line: line_no,
                                message: "nested VEVENT".into(),
                            });
                        }
                        event = Some(EventBuilder::default());
                    }
                    depth += 1;
                }
                "END" => {
                    if depth == 0 {
                        return Err(CalendarError::Parse {
                            line: line_no,
                            message: format!("END:{} without BEGIN", prop.value),
                        });
                    }
                    depth -= 1;
                    if prop.value.eq_ignore_ascii_case("VEVENT") {
                        if let Some(builder) = event.take() {
                            calendar.push(builder.build(line_no)?);
                        }
                    }
                }
                _ => {
                    if let Some(builder) = event.as_mut() {
                        builder.apply(&prop, line_no)?;
                    }
                }
            }
        }

        if !saw_calendar || depth != 0 {
            return Err(CalendarError::Parse {
                line: 0,
                message: "missing or unterminated VCALENDAR".into(),
            });
        }

        Ok(calendar)
    }
}

#[derive(Default)]
struct EventBuilder {
    uid: Option<String>,
    dtstamp: Option<DateTime<Utc>>,
    summary: Option<String>,
    start: Option<DateTime<FixedOffset>>,
    end: Option<DateTime<FixedOffset>>,
    description: Option<String>,
}

impl EventBuilder {
    fn apply(&mut self, prop: &ContentLine, line: usize) -> Result<(), CalendarError> {
        match prop.name.as_str() {
            "UID" => self.uid = Some(unescape_text(&prop.value)),
            "SUMMARY" => self.summary = Some(unescape_text(&prop.value)),
            "DESCRIPTION" => self.description = Some(unescape_text(&prop.value)),
            "DTSTAMP" => {
                self.dtstamp = Some(parse_date_time(prop, line)?.with_timezone(&Utc));
            }
            "DTSTART" => self.start = Some(parse_date_time(prop, line)?),
            "DTEND" => self.end = Some(parse_date_time(prop, line)?),
            _ => {}
        }
        Ok(())
    }

    fn build(self, line: usize) -> Result<CalendarEvent, CalendarError> {
        let missing = |name: &'static str| CalendarError::MissingProperty { line, name };

        Ok(CalendarEvent {
            uid: self.uid.ok_or_else(|| missing("UID"))?,
            dtstamp: self.dtstamp.ok_or_else(|| missing("DTSTAMP"))?,
            summary: self.summary.ok_or_else(|| missing("SUMMARY"))?,
            start: self.start.ok_or_else(|| missing("DTSTART"))?,
            end: self.end,
            description: self.description.unwrap_or_default(),
        })
    }
}

struct ContentLine {
    name: String,
    params: Vec<(String, String)>,
    value: String,
}

impl ContentLine {
    /// `NAME;PARAM=VALUE;...:VALUE`. Colons inside quoted parameter values are not separators.
    fn parse(line: &str) -> Option<Self> {
        let mut in_quotes = false;
        let mut split_at = None;
        for (i, c) in line.char_indices() {
            match c {
                '"' => in_quotes = !in_quotes,
                ':' if !in_quotes => {
                    split_at = Some(i);
                    break;
                }
                _ => {}
            }
        }

        let split_at = split_at?;
        let (head, value) = (&line[..split_at], &line[split_at + 1..]);

        let mut parts = head.split(';');
        let name = parts.next()?.trim().to_ascii_uppercase();
        if name.is_empty() {
            return None;
        }

        let params = parts
            .filter_map(|p| {
                let (k, v) = p.split_once('=')?;
                Some((k.trim().to_ascii_uppercase(), v.trim_matches('"').to_string()))
            })
            .collect();

        Some(Self {
            name,
            params,
            value: value.to_string(),
        })
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn format_date_time(name: &str, dt: &DateTime<FixedOffset>) -> String {
    if dt.offset().local_minus_utc() == DISPLAY_OFFSET_SECS {
        format!("{name};TZID={DISPLAY_TZID}:{}", dt.format(LOCAL_FORMAT))
    } else {
        format!("{name}:{}", dt.with_timezone(&Utc).format(UTC_FORMAT))
    }
}

/// UTC values come back in display time so the writer emits them the same way it
/// emits everything else.
fn parse_date_time(
    prop: &ContentLine,
    line: usize,
) -> Result<DateTime<FixedOffset>, CalendarError> {
    let bad = |message: String| CalendarError::Parse { line, message };
    let value = prop.value.trim();

    if let Some(tzid) = prop.param("TZID") {
        if tzid != DISPLAY_TZID {
            return Err(bad(format!("unsupported TZID {tzid}")));
        }
    }

    if let Some(utc) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S")
            .map_err(|e| bad(format!("{}: {e}", prop.name)))?;
        let ts = Utc.from_utc_datetime(&naive).timestamp();
        return to_display_time(ts).ok_or_else(|| bad(format!("{} out of range", prop.name)));
    }

    let naive = if prop.param("VALUE") == Some("DATE") || value.len() == 8 {
        NaiveDate::parse_from_str(value, "%Y%m%d")
            .map_err(|e| bad(format!("{}: {e}", prop.name)))?
            .and_hms_opt(0, 0, 0)
    } else {
        Some(
            NaiveDateTime::parse_from_str(value, LOCAL_FORMAT)
                .map_err(|e| bad(format!("{}: {e}", prop.name)))?,
        )
    };

    // Floating times are read as display time too.
    naive
        .as_ref()
        .and_then(from_display_local)
        .ok_or_else(|| bad(format!("{} out of range", prop.name)))
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Appends one content line, folded at 75 octets without splitting a UTF-8 sequence.
fn push_line(out: &mut String, line: &str) {
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;

    for c in line.chars() {
        let len = c.len_utf8();
        if used + len > budget {
            out.push_str("\r\n ");
            // the leading space counts against the continuation line
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        out.push(c);
        used += len;
    }
    out.push_str("\r\n");
}

fn unfold(input: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in input.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        match (raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')), lines.last_mut()) {
            (Some(rest), Some(last)) => last.push_str(rest),
            _ => lines.push(raw.to_string()),
        }
    }
    lines
}
