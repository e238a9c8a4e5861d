use crate::survey::{MaturityLevel, SurveySchema};

/// First band (by ascending `min_score`) containing the score, else the first declared band.
pub fn classify(levels: &[MaturityLevel], score: f64) -> Option<&MaturityLevel> {
    let mut ordered: Vec<&MaturityLevel> = levels.iter().collect();
    ordered.sort_by(|a, b| a.min_score.total_cmp(&b.min_score));

    ordered
        .into_iter()
        .find(|level| level.contains(score))
        .or_else(|| levels.first())
}

/// Static advice for the matched band followed by one line per weak domain, in schema order.
pub(crate) fn recommendations(
    schema: &SurveySchema,
    level: Option<&MaturityLevel>,
    domain_score: impl Fn(&str) -> f64,
    threshold: f64,
) -> Vec<String> {
    let mut lines: Vec<String> = level
        .map(|level| level.recommendations.clone())
        .unwrap_or_default();

    for domain in &schema.domains {
        if domain_score(&domain.id) < threshold {
            lines.push(format!("Focus on improving {} capabilities", domain.name));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::tests::common::band;

    fn spec_bands() -> Vec<MaturityLevel> {
        vec![band("basic", 1.0, 2.5), band("advanced", 2.51, 5.0)]
    }

    #[test]
    fn boundaries_are_inclusive() {
        let levels = spec_bands();
        assert_eq!(classify(&levels, 2.5).map(|l| l.name.as_str()), Some("basic"));
        assert_eq!(
            classify(&levels, 2.51).map(|l| l.name.as_str()),
            Some("advanced")
        );
        assert_eq!(classify(&levels, 5.0).map(|l| l.name.as_str()), Some("advanced"));
    }

    #[test]
    fn declaration_order_does_not_matter_for_matching() {
        let mut levels = spec_bands();
        levels.reverse();
        assert_eq!(classify(&levels, 1.2).map(|l| l.name.as_str()), Some("basic"));
    }

    #[test]
    fn unmatched_scores_fall_back_to_first_declared_band() {
        let mut levels = spec_bands();
        levels.reverse();
        assert_eq!(classify(&levels, 0.0).map(|l| l.name.as_str()), Some("advanced"));
        assert_eq!(classify(&levels, 2.505).map(|l| l.name.as_str()), Some("advanced"));
        assert!(classify(&[], 3.0).is_none());
    }

    #[test]
    fn higher_scores_never_select_lower_bands() {
        let levels = vec![
            band("initial", 0.0, 2.5),
            band("managed", 2.51, 4.0),
            band("optimized", 4.01, 5.0),
        ];
        let mut previous_min = f64::MIN;
        for step in 0..=500 {
            let score = step as f64 / 100.0;
            let level = classify(&levels, score).expect("bands declared");
            assert!(
                level.min_score >= previous_min,
                "score {score} dropped to band {}",
                level.name
            );
            previous_min = level.min_score;
        }
    }
}
