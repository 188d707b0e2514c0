use crate::models::MaturityTier;

/// Upper bound (inclusive) of each tier in days.
const NEW_MAX_DAYS: u64 = 270;
const EMERGING_MAX_DAYS: u64 = 547;
const GROWING_MAX_DAYS: u64 = 730;

pub fn classify_maturity(age_days: u64) -> MaturityTier {
    match age_days {
        d if d <= NEW_MAX_DAYS => MaturityTier::New,
        d if d <= EMERGING_MAX_DAYS => MaturityTier::Emerging,
        d if d <= GROWING_MAX_DAYS => MaturityTier::Growing,
        _ => MaturityTier::Mature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_close_on_upper_side() {
        assert_eq!(classify_maturity(0), MaturityTier::New);
        assert_eq!(classify_maturity(270), MaturityTier::New);
        assert_eq!(classify_maturity(271), MaturityTier::Emerging);
        assert_eq!(classify_maturity(547), MaturityTier::Emerging);
        assert_eq!(classify_maturity(548), MaturityTier::Growing);
        assert_eq!(classify_maturity(730), MaturityTier::Growing);
        assert_eq!(classify_maturity(731), MaturityTier::Mature);
    }

    #[test]
    fn test_expected_scores() {
        assert_eq!(MaturityTier::New.expected_score(), 60);
        assert_eq!(MaturityTier::Emerging.expected_score(), 70);
        assert_eq!(MaturityTier::Growing.expected_score(), 80);
        assert_eq!(MaturityTier::Mature.expected_score(), 90);
    }
}
