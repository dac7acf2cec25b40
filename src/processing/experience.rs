//! Experience heuristic: candidate years against the years a job requires

use crate::processing::lexicon::Lexicon;

/// Ratio bands applied when the candidate falls short of the requirement,
/// checked top to bottom; below the last band the score is [`EXPERIENCE_FLOOR`].
const RATIO_BANDS: &[(f64, f64)] = &[
    (0.8, 0.9),
    (0.7, 0.8),
    (0.6, 0.7),
    (0.5, 0.6),
    (0.4, 0.5),
    (0.3, 0.4),
    (0.2, 0.3),
];

const EXPERIENCE_FLOOR: f64 = 0.2;

/// Score when the job states no requirement at all.
const NO_REQUIREMENT_SCORE: f64 = 0.9;

/// Years the job asks for: the explicit level when it is positive, otherwise
/// whatever the title implies.
pub fn resolve_required_years(lexicon: &Lexicon, experience_level: f64, title: &str) -> f64 {
    if experience_level.is_finite() && experience_level > 0.0 {
        experience_level
    } else {
        lexicon.years_from_title(title)
    }
}

/// Piecewise experience score in `[0.1, 1.0]`.
pub fn experience_score(candidate_years: f64, required_years: f64) -> f64 {
    if required_years >= 5.0 && candidate_years < 2.0 {
        return 0.1;
    }
    if required_years >= 3.0 && candidate_years < 1.0 {
        return 0.2;
    }
    if required_years == 0.0 {
        return NO_REQUIREMENT_SCORE;
    }
    if candidate_years >= required_years {
        return 1.0;
    }

    let ratio = candidate_years / required_years.max(1.0);
    RATIO_BANDS
        .iter()
        .find(|(threshold, _)| ratio >= *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(EXPERIENCE_FLOOR)
}
