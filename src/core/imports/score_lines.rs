// Pasted score text: "Aledo 54, Brewer 7", one game per line.

use once_cell::sync::Lazy;
use regex::Regex;

static SCORE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\s+(\d+),?\s+(.+?)\s+(\d+)$").expect("score line pattern is valid")
});

static CITY_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(el paso|fort worth|ft worth|ft\.|san antonio|sa|corpus christi|cc|dallas|houston|frisco)\s+",
    )
    .expect("city prefix pattern is valid")
});

static SCHOOL_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(high school|hs)$").expect("school suffix pattern is valid"));

/// One parsed result. The first team listed is treated as home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    pub home: String,
    pub home_score: u32,
    pub away: String,
    pub away_score: u32,
}

pub fn parse_score_line(line: &str) -> Option<ScoreLine> {
    let caps = SCORE_LINE_RE.captures(line.trim())?;
    Some(ScoreLine {
        home: caps[1].trim().to_string(),
        home_score: caps[2].parse().ok()?,
        away: caps[3].trim().to_string(),
        away_score: caps[4].parse().ok()?,
    })
}

/// Parse a block of pasted text. Blank lines and `#` comments are ignored;
/// other lines that don't parse are returned separately.
pub fn parse_score_text(text: &str) -> (Vec<ScoreLine>, Vec<String>) {
    let mut games = Vec::new();
    let mut unparsed = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_score_line(line) {
            Some(game) => games.push(game),
            None => unparsed.push(line.to_string()),
        }
    }

    (games, unparsed)
}

/// Lowercase, drop one leading city prefix and a trailing "high school"/"hs".
pub fn normalize_team_name(name: &str) -> String {
    let name = name.trim().to_lowercase();
    let name = CITY_PREFIX_RE.replace(&name, "");
    SCHOOL_SUFFIX_RE.replace(&name, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_with_and_without_comma() {
        let line = parse_score_line("Aledo 54, Brewer 7").unwrap();
        assert_eq!(line.home, "Aledo");
        assert_eq!(line.home_score, 54);
        assert_eq!(line.away, "Brewer");
        assert_eq!(line.away_score, 7);

        let line = parse_score_line("  Highland Park 42 Dallas Jesuit 14 ").unwrap();
        assert_eq!(line.home, "Highland Park");
        assert_eq!(line.away, "Dallas Jesuit");
    }

    #[test]
    fn test_rejects_lines_without_scores() {
        assert!(parse_score_line("Aledo vs Brewer").is_none());
        assert!(parse_score_line("Week 3 results").is_none());
    }

    #[test]
    fn test_text_skips_comments_and_collects_garbage() {
        let text = "# week 3\n\nAledo 54, Brewer 7\nPostponed: Joshua at Cleburne\nRed Oak 21, Tyler 14\n";
        let (games, unparsed) = parse_score_text(text);
        assert_eq!(games.len(), 2);
        assert_eq!(unparsed, vec!["Postponed: Joshua at Cleburne".to_string()]);
    }

    #[test]
    fn test_normalization_strips_city_and_suffix() {
        assert_eq!(normalize_team_name("El Paso Americas"), "americas");
        assert_eq!(normalize_team_name("Ft. Worth Paschal"), "worth paschal");
        assert_eq!(normalize_team_name("SA Jay"), "jay");
        assert_eq!(normalize_team_name("Joshua High School"), "joshua");
        assert_eq!(normalize_team_name("Aledo HS"), "aledo");
        assert_eq!(normalize_team_name("Frisco"), "frisco");
    }
}
