use crate::error::{Error, Result};
use crate::stats::{STAT_COUNT, StatLine};

/// Column layout of one snapshot line. Column 0 carries the elapsed-time
/// marker on tick-boundary lines; columns past the team are ignored.
const NAME_FIELD: usize = 1;
const HERO_FIELD: usize = 2;
const FIRST_STAT_FIELD: usize = 3;
const TEAM_FIELD: usize = 13;
pub const MIN_FIELDS: usize = 14;

/// One player's cumulative counters at one reporting tick.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotRecord {
    pub player: String,
    pub hero: String,
    pub stats: StatLine,
    pub team: String,
}

impl SnapshotRecord {
    /// Parse one comma-separated log line. A numeric field that does not
    /// parse counts as zero so a single corrupt field cannot sink the
    /// match; a line with missing columns is fatal, since tick alignment
    /// can no longer be trusted past it. `line_no` is 1-based, for the
    /// error message.
    pub fn parse(line: &str, line_no: usize) -> Result<SnapshotRecord> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < MIN_FIELDS {
            return Err(Error::MalformedLine {
                line: line_no,
                expected: MIN_FIELDS,
                found: fields.len(),
            });
        }

        let mut stats = StatLine::default();
        for i in 0..STAT_COUNT {
            stats.0[i] = parse_stat_field(fields[FIRST_STAT_FIELD + i]);
        }

        Ok(SnapshotRecord {
            player: fields[NAME_FIELD].to_string(),
            hero: fields[HERO_FIELD].to_string(),
            stats,
            team: fields[TEAM_FIELD].to_string(),
        })
    }
}

/// Zero-fill policy for corrupt numeric fields.
fn parse_stat_field(field: &str) -> f64 {
    field.trim().parse::<f64>().unwrap_or(0.0)
}

/// Elapsed seconds from the bracketed `[H:MM:SS]` prefix of a
/// tick-boundary line. The bracket punctuation is stripped before
/// splitting; only minutes and seconds count, the hour field is wall-clock
/// noise the log carries but the original reporting never advances within
/// one map. Unparseable pieces count as zero.
pub fn parse_elapsed_seconds(line: &str) -> usize {
    let stamp = line.split(' ').next().unwrap_or("");
    let stamp = stamp.replace(['[', ']'], "");
    let mut parts = stamp.split(':').skip(1);
    let minutes: usize = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let seconds: usize = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    minutes * 60 + seconds
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LINE: &str =
        "[0:04:35] snap,eis,ana,1520.5,830,3,4,9,1,2200.25,0,5,2,frogs,extra,ignored";

    #[test]
    fn parses_fixed_layout() {
        let record = SnapshotRecord::parse(LINE, 1).unwrap();
        assert_eq!(record.player, "eis");
        assert_eq!(record.hero, "ana");
        assert_eq!(record.team, "frogs");
        assert_eq!(
            record.stats,
            StatLine([1520.5, 830.0, 3.0, 4.0, 9.0, 1.0, 2200.25, 0.0, 5.0, 2.0])
        );
    }

    #[test]
    fn corrupt_numeric_field_reads_as_zero() {
        let line = "x,eis,ana,??,830,3,4,9,1,2200.25,0,5,2,frogs";
        let record = SnapshotRecord::parse(line, 7).unwrap();
        assert_eq!(record.stats[crate::stats::StatCategory::DamageDealt], 0.0);
        assert_eq!(record.stats[crate::stats::StatCategory::DamageTaken], 830.0);
    }

    #[test]
    fn short_line_is_fatal() {
        let err = SnapshotRecord::parse("x,eis,ana,1,2,3", 42).unwrap_err();
        match err {
            Error::MalformedLine { line, found, .. } => {
                assert_eq!(line, 42);
                assert_eq!(found, 6);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn elapsed_seconds_ignore_the_hour() {
        assert_eq!(parse_elapsed_seconds("[0:04:35] snap,..."), 275);
        assert_eq!(parse_elapsed_seconds("[1:04:35] snap,..."), 275);
        assert_eq!(parse_elapsed_seconds("[0:00:00] snap,..."), 0);
    }

    #[test]
    fn garbage_timestamp_reads_as_zero() {
        assert_eq!(parse_elapsed_seconds("no marker here"), 0);
    }
}
