use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;

use dayz_domain::{ParseStats, Position, RptEvents, SpawnEvent};

use super::adm::{parse_coord, parse_time};
use super::clock::LogClock;

/// Parser for DayZ runtime logs (`*.RPT`); only loot spawn lines are kept.
#[derive(Debug, Clone)]
pub struct RptParser {
    header: Regex,
    spawn: Regex,
}

impl RptParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            header: Regex::new(r"Current time:\s+(\d{4}/\d{2}/\d{2})")?,
            spawn: Regex::new(
                r"(\d{1,2}:\d{2}:\d{2})\.\d{3}\s+Adding (.*?) at \[\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*\]",
            )?,
        })
    }

    pub fn parse_str(&self, content: &str) -> RptEvents {
        let mut clock = LogClock::default();
        let mut out = RptEvents {
            stats: ParseStats {
                files: 1,
                ..ParseStats::default()
            },
            ..RptEvents::default()
        };

        for line in content.lines() {
            out.stats.lines += 1;
            if let Some(caps) = self.header.captures(line) {
                if let Ok(date) = NaiveDate::parse_from_str(&caps[1], "%Y/%m/%d") {
                    clock.set_date(date);
                    continue;
                }
            }

            let Some(caps) = self.spawn.captures(line) else {
                out.stats.skipped += 1;
                continue;
            };
            let item_name = caps[2].trim();
            let parsed = parse_time(&caps[1])
                .and_then(|time| clock.stamp(time))
                .zip(parse_coord(&caps[3]).zip(parse_coord(&caps[4])));
            match parsed {
                Some((timestamp, (x, y))) if !item_name.is_empty() => {
                    out.spawns.push(SpawnEvent {
                        item_name: item_name.to_string(),
                        position: Position::new(x, y),
                        timestamp,
                    });
                    out.stats.events += 1;
                }
                _ => out.stats.skipped += 1,
            }
        }
        out
    }
}
