use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use dayz_domain::{AdmEvents, LoginEvent, ParseStats, Position, PositionEvent};

use super::clock::LogClock;

/// Parser for DayZ admin logs (`*.ADM`).
///
/// Recognised lines:
/// - `AdminLog started on 2024-01-15 at 10:00:00` sets the date
/// - `10:05:12 | Player "Name"(id=...) is connected` is a login
/// - `10:05:40 | Player "Name" (id=... pos=<x, y, z>)` is a position
#[derive(Debug, Clone)]
pub struct AdmParser {
    header: Regex,
    login: Regex,
    position: Regex,
}

impl AdmParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            header: Regex::new(r"AdminLog started on (\d{4}-\d{2}-\d{2})")?,
            login: Regex::new(
                r#"^\s*(\d{1,2}:\d{2}:\d{2})\s*\|\s*Player "(.*?)"\s*\(id=[^)]*\) is connected"#,
            )?,
            position: Regex::new(
                r#"^\s*(\d{1,2}:\d{2}:\d{2})\s*\|\s*Player "(.*?)" \(id=.*? pos=<(-?\d+(?:\.\d+)?), (-?\d+(?:\.\d+)?), -?\d+(?:\.\d+)?>"#,
            )?,
        })
    }

    pub fn parse_str(&self, content: &str) -> AdmEvents {
        let mut clock = LogClock::default();
        let mut out = AdmEvents {
            stats: ParseStats {
                files: 1,
                ..ParseStats::default()
            },
            ..AdmEvents::default()
        };

        for line in content.lines() {
            out.stats.lines += 1;
            if let Some(caps) = self.header.captures(line) {
                if let Ok(date) = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d") {
                    clock.set_date(date);
                    continue;
                }
            }

            if let Some(caps) = self.login.captures(line) {
                match parse_time(&caps[1]).and_then(|time| clock.stamp(time)) {
                    Some(timestamp) => {
                        out.logins.push(LoginEvent {
                            player_id: caps[2].to_string(),
                            timestamp,
                        });
                        out.stats.events += 1;
                    }
                    None => out.stats.skipped += 1,
                }
                continue;
            }

            if let Some(caps) = self.position.captures(line) {
                let parsed = parse_time(&caps[1])
                    .and_then(|time| clock.stamp(time))
                    .zip(parse_coord(&caps[3]).zip(parse_coord(&caps[4])));
                match parsed {
                    Some((timestamp, (x, y))) => {
                        out.positions.push(PositionEvent {
                            player_id: caps[2].to_string(),
                            position: Position::new(x, y),
                            timestamp,
                        });
                        out.stats.events += 1;
                    }
                    None => out.stats.skipped += 1,
                }
                continue;
            }

            out.stats.skipped += 1;
        }
        out
    }
}

pub(crate) fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S").ok()
}

pub(crate) fn parse_coord(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"AdminLog started on 2024-01-15 at 10:00:00
10:00:05 | Player "Survivor"(id=Abc123XyZ=) is connected
10:00:30 | Player "Survivor" (id=Abc123XyZ= pos=<7500.1, 2500.3, 10.2>)
10:01:00 | Player "Survivor" (id=Abc123XyZ= pos=<7501.5, 2501.0, 10.4>) placed Fireplace
10:02:00 | Player "Other Guy"(id=Q9w8E7=) has been disconnected
garbage line
10:05:00 | Player "Other Guy"(id=Q9w8E7=) is connected
"#;

    #[test]
    fn extracts_logins_and_positions() {
        let parser = AdmParser::new().expect("parser");
        let events = parser.parse_str(SAMPLE);

        assert_eq!(events.logins.len(), 2);
        assert_eq!(events.logins[0].player_id, "Survivor");
        assert_eq!(events.logins[0].timestamp.to_string(), "2024-01-15 10:00:05");
        assert_eq!(events.logins[1].player_id, "Other Guy");

        assert_eq!(events.positions.len(), 2);
        assert_eq!(events.positions[0].position, Position::new(7500.1, 2500.3));
        assert_eq!(events.positions[1].timestamp.to_string(), "2024-01-15 10:01:00");

        assert_eq!(events.stats.files, 1);
        assert_eq!(events.stats.lines, 7);
        assert_eq!(events.stats.events, 4);
        assert_eq!(events.stats.skipped, 2);
    }

    #[test]
    fn lines_before_header_are_skipped() {
        let parser = AdmParser::new().expect("parser");
        let events = parser.parse_str(
            "10:00:05 | Player \"Early\"(id=1) is connected\n\
             AdminLog started on 2024-01-15 at 10:00:00\n\
             10:00:06 | Player \"Late\"(id=2) is connected\n",
        );
        assert_eq!(events.logins.len(), 1);
        assert_eq!(events.logins[0].player_id, "Late");
        assert_eq!(events.stats.skipped, 1);
    }

    #[test]
    fn timestamps_roll_over_midnight() {
        let parser = AdmParser::new().expect("parser");
        let events = parser.parse_str(
            "AdminLog started on 2024-01-15 at 23:50:00\n\
             23:59:59 | Player \"Night\"(id=1) is connected\n\
             00:04:59 | Player \"Night\"(id=1) is connected\n",
        );
        assert_eq!(events.logins[1].timestamp.to_string(), "2024-01-16 00:04:59");
    }
}
