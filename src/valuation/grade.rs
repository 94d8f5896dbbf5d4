//! Investment grade classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal letter grade derived from a composite score.
///
/// Variants are declared worst-to-best so the derived `Ord` follows grade
/// quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InvestmentGrade {
    BMinus,
    B,
    BPlus,
    BbMinus,
    Bb,
    BbPlus,
    BbbMinus,
    Bbb,
    BbbPlus,
    AMinus,
    A,
    APlus,
    AaMinus,
    Aa,
    AaPlus,
    Aaa,
}

impl InvestmentGrade {
    /// Classify a composite score. Descending thresholds, first match wins;
    /// every score in [0, 100] lands on exactly one grade.
    pub fn from_score(score: u8) -> Self {
        match score {
            95..=u8::MAX => InvestmentGrade::Aaa,
            90..=94 => InvestmentGrade::AaPlus,
            85..=89 => InvestmentGrade::Aa,
            82..=84 => InvestmentGrade::AaMinus,
            78..=81 => InvestmentGrade::APlus,
            75..=77 => InvestmentGrade::A,
            70..=74 => InvestmentGrade::AMinus,
            65..=69 => InvestmentGrade::BbbPlus,
            60..=64 => InvestmentGrade::Bbb,
            55..=59 => InvestmentGrade::BbbMinus,
            50..=54 => InvestmentGrade::BbPlus,
            45..=49 => InvestmentGrade::Bb,
            40..=44 => InvestmentGrade::BbMinus,
            35..=39 => InvestmentGrade::BPlus,
            30..=34 => InvestmentGrade::B,
            _ => InvestmentGrade::BMinus,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InvestmentGrade::Aaa => "AAA",
            InvestmentGrade::AaPlus => "AA+",
            InvestmentGrade::Aa => "AA",
            InvestmentGrade::AaMinus => "AA-",
            InvestmentGrade::APlus => "A+",
            InvestmentGrade::A => "A",
            InvestmentGrade::AMinus => "A-",
            InvestmentGrade::BbbPlus => "BBB+",
            InvestmentGrade::Bbb => "BBB",
            InvestmentGrade::BbbMinus => "BBB-",
            InvestmentGrade::BbPlus => "BB+",
            InvestmentGrade::Bb => "BB",
            InvestmentGrade::BbMinus => "BB-",
            InvestmentGrade::BPlus => "B+",
            InvestmentGrade::B => "B",
            InvestmentGrade::BMinus => "B-",
        }
    }
}

impl fmt::Display for InvestmentGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestmentGrade {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "AAA" => InvestmentGrade::Aaa,
            "AA+" => InvestmentGrade::AaPlus,
            "AA" => InvestmentGrade::Aa,
            "AA-" => InvestmentGrade::AaMinus,
            "A+" => InvestmentGrade::APlus,
            "A" => InvestmentGrade::A,
            "A-" => InvestmentGrade::AMinus,
            "BBB+" => InvestmentGrade::BbbPlus,
            "BBB" => InvestmentGrade::Bbb,
            "BBB-" => InvestmentGrade::BbbMinus,
            "BB+" => InvestmentGrade::BbPlus,
            "BB" => InvestmentGrade::Bb,
            "BB-" => InvestmentGrade::BbMinus,
            "B+" => InvestmentGrade::BPlus,
            "B" => InvestmentGrade::B,
            "B-" => InvestmentGrade::BMinus,
            other => anyhow::bail!("unknown investment grade: {other}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundaries_classify_as_documented() {
        assert_eq!(InvestmentGrade::from_score(95), InvestmentGrade::Aaa);
        assert_eq!(InvestmentGrade::from_score(94), InvestmentGrade::AaPlus);
        assert_eq!(InvestmentGrade::from_score(50), InvestmentGrade::BbPlus);
        assert_eq!(InvestmentGrade::from_score(10), InvestmentGrade::BMinus);
        assert_eq!(InvestmentGrade::from_score(100), InvestmentGrade::Aaa);
        assert_eq!(InvestmentGrade::from_score(0), InvestmentGrade::BMinus);
    }

    #[test]
    fn classification_is_total_and_monotonic() {
        let mut prev = InvestmentGrade::from_score(0);
        for score in 1..=100u8 {
            let grade = InvestmentGrade::from_score(score);
            assert!(grade >= prev, "grade dropped at score {score}");
            prev = grade;
        }
    }

    #[test]
    fn display_and_parse_round_trip() {
        for score in 0..=100u8 {
            let grade = InvestmentGrade::from_score(score);
            let parsed: InvestmentGrade = grade.as_str().parse().unwrap();
            assert_eq!(parsed, grade);
        }
        assert!("ZZZ".parse::<InvestmentGrade>().is_err());
    }
}
