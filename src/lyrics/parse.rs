use super::{LyricLine, LyricTrack};
use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

/// Lazy-initialized regex patterns for LRC tags
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static TIMESTAMP_REGEX: OnceLock<Regex> = OnceLock::new();

/// Bracketed `key:value` groups; `[Chorus]` style brackets stay lyric text
fn get_tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"\[([^\[\]:]*:[^\[\]]*)\]").unwrap())
}

/// mm:ss, mm:ss.xx or mm:ss:xx with any number of fraction digits
fn get_timestamp_regex() -> &'static Regex {
    TIMESTAMP_REGEX.get_or_init(|| Regex::new(r"^\s*(\d+):(\d+)(?:[.:](\d+))?\s*$").unwrap())
}

/// Parse LRC text into a sorted lyric track.
///
/// Every timestamp tag on a line produces one lyric line carrying the
/// line's text with all tags stripped. Lines without a usable timestamp
/// and tags that fail to parse are skipped.
pub fn parse(raw: &str) -> LyricTrack {
    let mut lines = Vec::new();
    let mut skipped_tags = 0usize;

    for source_line in raw.lines() {
        let mut times = Vec::new();
        let mut segments = Vec::new();
        let mut cursor = 0;

        for caps in get_tag_regex().captures_iter(source_line) {
            let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            segments.push(&source_line[cursor..whole.start()]);
            cursor = whole.end();
            match parse_timestamp(tag.as_str()) {
                Some(time) => times.push(time),
                None => skipped_tags += 1,
            }
        }

        if times.is_empty() {
            continue;
        }
        segments.push(&source_line[cursor..]);

        // Tags split the text; rejoin the pieces with single spaces
        let text = segments
            .iter()
            .map(|segment| segment.trim())
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        lines.extend(times.into_iter().map(|time| LyricLine::new(time, text.as_str())));
    }

    if skipped_tags > 0 {
        tracing::debug!("Skipped {} non-timestamp tags", skipped_tags);
    }

    LyricTrack::from_lines(lines)
}

/// Parse the inside of a `[mm:ss.xx]` tag into seconds
fn parse_timestamp(tag: &str) -> Option<f64> {
    let caps = get_timestamp_regex().captures(tag)?;

    let minutes: u64 = caps.get(1)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(2)?.as_str().parse().ok()?;
    let fraction = match caps.get(3) {
        Some(digits) => {
            let digits = digits.as_str();
            let value: f64 = digits.parse().ok()?;
            value / 10f64.powi(digits.len() as i32)
        }
        None => 0.0,
    };

    Some(minutes as f64 * 60.0 + seconds as f64 + fraction)
}

/// Format seconds as an LRC timestamp body (`mm:ss.xx`)
pub fn format_timestamp(time_seconds: f64) -> String {
    let centis = (time_seconds.max(0.0) * 100.0).round() as u64;
    let minutes = centis / 6000;
    let seconds = (centis / 100) % 60;
    format!("{:02}:{:02}.{:02}", minutes, seconds, centis % 100)
}

/// Serialize a track back to LRC, one tag per line in track order
pub fn to_lrc(track: &LyricTrack) -> String {
    let mut out = String::new();
    for line in track {
        let _ = writeln!(out, "[{}]{}", format_timestamp(line.time_seconds), line.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(track: &LyricTrack) -> Vec<&str> {
        track.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\t\n  ").is_empty());
    }

    #[test]
    fn test_parse_single_line() {
        let track = parse("[00:12.50]hello");
        assert_eq!(track.lines(), &[LyricLine::new(12.5, "hello")]);
    }

    #[test]
    fn test_parse_multiple_tags_sorted() {
        let track = parse("[00:10.00][00:05.00]x");
        assert_eq!(
            track.lines(),
            &[LyricLine::new(5.0, "x"), LyricLine::new(10.0, "x")]
        );
    }

    #[test]
    fn test_parse_tags_after_text() {
        let track = parse("[00:01.00]hello [00:05.00]world");
        assert_eq!(
            track.lines(),
            &[
                LyricLine::new(1.0, "hello world"),
                LyricLine::new(5.0, "hello world")
            ]
        );
    }

    #[test]
    fn test_parse_keeps_plain_brackets_in_text() {
        let track = parse("[00:03.00]la la [Chorus]");
        assert_eq!(track.lines(), &[LyricLine::new(3.0, "la la [Chorus]")]);
    }

    #[test]
    fn test_parse_malformed_tag_skipped() {
        let track = parse("[aa:bb]text\n[00:01.00]valid");
        assert_eq!(track.lines(), &[LyricLine::new(1.0, "valid")]);

        let track = parse("[aa:bb][00:02.00]same line");
        assert_eq!(track.lines(), &[LyricLine::new(2.0, "same line")]);
    }

    #[test]
    fn test_parse_ignores_untagged_and_metadata_lines() {
        let raw = "[ti:Song Title]\n[ar:Someone]\nplain text line\n\n[00:03.00]first";
        let track = parse(raw);
        assert_eq!(track.len(), 1);
        assert_eq!(track.lines()[0].text, "first");
    }

    #[test]
    fn test_parse_fraction_precision_and_separators() {
        let track = parse("[01:02.5]a\n[01:02.500]b\n[01:02:50]c\n[01:02]d");
        let times: Vec<f64> = track.iter().map(|l| l.time_seconds).collect();
        assert_eq!(times, vec![62.0, 62.5, 62.5, 62.5]);
        assert_eq!(texts(&track), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_parse_unsorted_input_is_sorted_stably() {
        let raw = "[00:20.00]late\n[00:05.00]early\n[00:05.00]early twin";
        assert_eq!(texts(&parse(raw)), vec!["early", "early twin", "late"]);
    }

    #[test]
    fn test_parse_trims_text_and_handles_crlf() {
        let track = parse("[00:01.00]  spaced out  \r\n[00:02.00]\r\n");
        assert_eq!(texts(&track), vec!["spaced out", ""]);
    }

    #[test]
    fn test_to_lrc_preserves_equal_timestamp_order() {
        let original = parse("[00:07.00]b\n[00:07.00]a\n[00:01.25]z");
        let serialized = to_lrc(&original);
        assert_eq!(serialized, "[00:01.25]z\n[00:07.00]b\n[00:07.00]a\n");
        assert_eq!(parse(&serialized), original);
    }

    #[test]
    fn test_format_timestamp_rounding() {
        assert_eq!(format_timestamp(0.0), "00:00.00");
        assert_eq!(format_timestamp(59.999), "01:00.00");
        assert_eq!(format_timestamp(754.3), "12:34.30");
    }
}
