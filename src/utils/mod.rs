use distance::damerau_levenshtein;

/// Upper bound for a "did you mean" suggestion; anything further away
/// is probably not a typo.
const SUGGESTION_DISTANCE: usize = 2;

/// Picks the candidate closest to the input, for error messages on
/// mistyped category or sort names.
pub fn closest_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    candidates
        .iter()
        .map(|candidate| (damerau_levenshtein(&needle, candidate), *candidate))
        .filter(|(d, _)| *d <= SUGGESTION_DISTANCE)
        .min_by_key(|(d, _)| *d)
        .map(|(_, candidate)| candidate)
}

pub fn parse_compatibility_threshold(value: &str) -> Result<u8, String> {
    let trimmed = value.trim();
    let pct: u8 = trimmed
        .parse()
        .map_err(|_| format!("invalid percentage '{trimmed}'"))?;
    if pct > 100 {
        return Err(format!("percentage out of range '{trimmed}', expected 0-100"));
    }
    Ok(pct)
}

pub fn parse_positive(value: &str) -> Result<usize, String> {
    let trimmed = value.trim();
    let n: usize = trimmed
        .parse()
        .map_err(|_| format!("invalid number '{trimmed}'"))?;
    if n == 0 {
        return Err("expected a positive number".to_string());
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_match_catches_small_typos() {
        let candidates = ["sport", "casual", "running", "boots", "all"];
        assert_eq!(closest_match("sprot", &candidates), Some("sport"));
        assert_eq!(closest_match("runing", &candidates), Some("running"));
        assert_eq!(closest_match("sandals", &candidates), None);
    }

    #[test]
    fn threshold_parse_enforces_range() {
        assert_eq!(parse_compatibility_threshold(" 60 "), Ok(60));
        assert_eq!(parse_compatibility_threshold("0"), Ok(0));
        assert_eq!(parse_compatibility_threshold("100"), Ok(100));
        assert!(parse_compatibility_threshold("101").is_err());
        assert!(parse_compatibility_threshold("sixty").is_err());
    }

    #[test]
    fn parse_positive_rejects_zero() {
        assert_eq!(parse_positive("12"), Ok(12));
        assert!(parse_positive("0").is_err());
    }
}
