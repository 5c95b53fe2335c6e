//! Lyrics model and LRC parsing
//!
//! Synced lyrics arrive as LRC text (`[mm:ss.xx] line`), plain lyrics as
//! newline-separated text. Both are normalized into a list of `LyricLine`s;
//! untimed lines carry no timestamp.

use serde::{Deserialize, Serialize};

/// Text shown when no lyrics are available
pub const LYRICS_NOT_FOUND: &str = "Lyrics not found";

/// A single lyrics line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    /// Start time in seconds (None for untimed lines)
    pub time: Option<f64>,

    /// Line text
    pub text: String,
}

impl LyricLine {
    fn untimed(text: impl Into<String>) -> Self {
        Self {
            time: None,
            text: text.into(),
        }
    }
}

/// Lyrics for a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lyrics {
    /// Lines in display order
    #[serde(rename = "lyrics")]
    pub lines: Vec<LyricLine>,

    /// Whether lines carry timestamps
    pub is_synced: bool,
}

impl Lyrics {
    /// Parse LRC text
    ///
    /// Lines without a `[mm:ss.xx]` tag, or with an empty text, are dropped.
    pub fn from_synced(lrc: &str) -> Self {
        let lines = lrc.lines().filter_map(parse_lrc_line).collect();
        Self {
            lines,
            is_synced: true,
        }
    }

    /// Split plain text into untimed lines, skipping blank ones
    pub fn from_plain(text: &str) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(LyricLine::untimed)
            .collect();
        Self {
            lines,
            is_synced: false,
        }
    }

    /// Single "not found" line
    pub fn not_found() -> Self {
        Self {
            lines: vec![LyricLine::untimed(LYRICS_NOT_FOUND)],
            is_synced: false,
        }
    }

    /// Prefer synced lyrics, fall back to plain, then to "not found"
    pub fn from_sources(synced: Option<&str>, plain: Option<&str>) -> Self {
        match (synced, plain) {
            (Some(lrc), _) if !lrc.trim().is_empty() => Self::from_synced(lrc),
            (_, Some(text)) if !text.trim().is_empty() => Self::from_plain(text),
            _ => Self::not_found(),
        }
    }

    /// Index of the line being sung at `position_secs`
    ///
    /// The last line whose start time is at or before the position. Always
    /// `None` for unsynced lyrics.
    pub fn active_index(&self, position_secs: f64) -> Option<usize> {
        if !self.is_synced {
            return None;
        }
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.time.is_some_and(|t| position_secs >= t))
            .map(|(index, _)| index)
            .last()
    }

    /// Whether this is the "not found" placeholder
    pub fn is_not_found(&self) -> bool {
        !self.is_synced && self.lines.len() == 1 && self.lines[0].text == LYRICS_NOT_FOUND
    }
}

fn parse_lrc_line(line: &str) -> Option<LyricLine> {
    let rest = &line[line.find('[')? + 1..];
    let (tag, text) = rest.split_once(']')?;
    let (minutes, seconds) = tag.split_once(':')?;

    // Metadata tags like [ar:Artist] have no fractional seconds
    if !seconds.contains('.') {
        return None;
    }
    let minutes: u32 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;

    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(LyricLine {
        time: Some(f64::from(minutes) * 60.0 + seconds),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_synced_lines_and_skips_gaps() {
        let lrc = "[ar:Daft Punk]\n[00:12.50] One more time\n[00:15.00]\n[01:02.25]  We're gonna celebrate ";
        let lyrics = Lyrics::from_synced(lrc);

        assert!(lyrics.is_synced);
        assert_eq!(lyrics.lines.len(), 2);
        assert_eq!(lyrics.lines[0].time, Some(12.5));
        assert_eq!(lyrics.lines[1].time, Some(62.25));
        assert_eq!(lyrics.lines[1].text, "We're gonna celebrate");
    }

    #[test]
    fn plain_lines_are_untimed() {
        let lyrics = Lyrics::from_plain("first\n\n  second  \n");
        assert!(!lyrics.is_synced);
        assert_eq!(lyrics.lines.len(), 2);
        assert!(lyrics.lines.iter().all(|l| l.time.is_none()));
        assert_eq!(lyrics.active_index(100.0), None);
    }

    #[test]
    fn sources_fall_back_in_order() {
        assert!(Lyrics::from_sources(Some("[00:01.00] a"), Some("b")).is_synced);
        assert!(!Lyrics::from_sources(Some("  "), Some("b")).is_synced);
        assert!(Lyrics::from_sources(None, None).is_not_found());
    }

    #[test]
    fn active_index_tracks_position() {
        let lyrics = Lyrics::from_synced("[00:01.00] a\n[00:05.00] b\n[00:09.00] c");
        assert_eq!(lyrics.active_index(0.5), None);
        assert_eq!(lyrics.active_index(1.0), Some(0));
        assert_eq!(lyrics.active_index(6.0), Some(1));
        assert_eq!(lyrics.active_index(600.0), Some(2));
    }

    #[test]
    fn cache_json_shape() {
        let lyrics = Lyrics::from_plain("hello");
        let value = serde_json::to_value(&lyrics).unwrap();
        assert!(value["lyrics"].is_array());
        assert_eq!(value["is_synced"], false);
    }
}
