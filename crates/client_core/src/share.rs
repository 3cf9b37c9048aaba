use url::{form_urlencoded, Url};

use crate::{error::ShareLinkError, types::VerificationResult};

pub const CHALLENGE_PARAM: &str = "challenge";
pub const PERCENTILE_PARAM: &str = "percentile";

pub fn build_share_link(base: &str, result: &VerificationResult) -> Result<String, ShareLinkError> {
    let mut url = Url::parse(base).map_err(|source| ShareLinkError::InvalidBase {
        url: base.to_string(),
        source,
    })?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != CHALLENGE_PARAM && key != PERCENTILE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(retained.iter());
        query.append_pair(CHALLENGE_PARAM, &result.elapsed_seconds.to_string());
        if let Some(ranking) = result.ranking {
            query.append_pair(PERCENTILE_PARAM, &format_percent(ranking.percentile));
        }
    }

    Ok(url.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Challenge {
    pub seconds: u64,
    pub percentile: Option<f64>,
}

impl Challenge {
    pub fn time_label(&self) -> String {
        format_clock(self.seconds)
    }

    pub fn top_percent(&self) -> Option<f64> {
        self.percentile.map(|p| 100.0 - p)
    }

    pub fn top_label(&self) -> Option<String> {
        self.top_percent()
            .map(|top| format!("top {}%", format_percent(top)))
    }
}

pub fn parse_challenge(input: &str) -> Option<Challenge> {
    let trimmed = input.trim();
    let pairs: Vec<(String, String)> = match Url::parse(trimmed) {
        Ok(url) => url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        Err(_) => form_urlencoded::parse(trimmed.trim_start_matches('?').as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
    };

    let lookup = |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    let seconds = lookup(CHALLENGE_PARAM)?.parse::<u64>().ok()?;
    let percentile = lookup(PERCENTILE_PARAM)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|p| p.is_finite() && (0.0..=100.0).contains(p));

    Some(Challenge {
        seconds,
        percentile,
    })
}

pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn ranking_badge(percentile: f64) -> &'static str {
    if percentile >= 95.0 {
        "TOP 5%"
    } else if percentile >= 90.0 {
        "TOP 10%"
    } else if percentile >= 75.0 {
        "TOP 25%"
    } else if percentile >= 50.0 {
        "TOP 50%"
    } else {
        "Great job!"
    }
}

fn format_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

#[cfg(test)]
#[path = "tests/share_tests.rs"]
mod tests;
