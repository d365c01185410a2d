use crate::classify::RawClassification;
use crate::fusion::mapping::{map_to_category, Category, Modality};

/// Per-category mean confidence for one sampling event. Categories that
/// received no classifications stay `None`: omission means "no new
/// information this tick", not "this emotion is absent".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryAverages {
    values: [Option<f64>; Category::COUNT],
}

impl CategoryAverages {
    pub fn get(&self, category: Category) -> Option<f64> {
        self.values[category.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL
            .iter()
            .filter_map(|&category| self.values[category.index()].map(|value| (category, value)))
    }
}

/// Reduce one modality's classification batch to at most one score per
/// category: group by mapped category, arithmetic mean of confidences.
/// An empty batch yields an all-empty result; callers must not update
/// fusion engine state in that case.
pub fn aggregate(modality: Modality, results: &[RawClassification]) -> CategoryAverages {
    let mut sums = [0.0f64; Category::COUNT];
    let mut counts = [0usize; Category::COUNT];

    for result in results {
        let idx = map_to_category(modality, &result.label).index();
        sums[idx] += result.confidence.clamp(0.0, 100.0);
        counts[idx] += 1;
    }

    let mut averages = CategoryAverages::default();
    for category in Category::ALL {
        let idx = category.index();
        if counts[idx] > 0 {
            averages.values[idx] = Some(sums[idx] / counts[idx] as f64);
        }
    }
    averages
}

/// The single highest-confidence raw label from one sampling event, used for
/// log and narration display independent of the category fusion math.
/// Batches arrive sorted highest-first, but scan anyway.
pub fn dominant(results: &[RawClassification]) -> Option<&RawClassification> {
    let mut best: Option<&RawClassification> = None;
    for result in results {
        match best {
            Some(current) if result.confidence <= current.confidence => {}
            _ => best = Some(result),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_classifications_that_share_a_category() {
        // "joy" is outside the voice vocabulary, so both entries fall back to Calm.
        let results = vec![
            RawClassification::new("joy", 80.0),
            RawClassification::new("joy", 60.0),
        ];
        let averages = aggregate(Modality::Voice, &results);
        assert_eq!(averages.get(Category::Calm), Some(70.0));
        assert_eq!(averages.get(Category::Focus), None);
        assert_eq!(averages.get(Category::Stress), None);
        assert_eq!(averages.get(Category::Fatigue), None);
    }

    #[test]
    fn splits_batches_across_categories() {
        let results = vec![
            RawClassification::new("sadness", 70.0),
            RawClassification::new("curiosity", 40.0),
            RawClassification::new("grief", 50.0),
        ];
        let averages = aggregate(Modality::Voice, &results);
        assert_eq!(averages.get(Category::Fatigue), Some(60.0));
        assert_eq!(averages.get(Category::Focus), Some(40.0));
        assert_eq!(averages.get(Category::Calm), None);
    }

    #[test]
    fn empty_batch_yields_empty_averages() {
        let averages = aggregate(Modality::Facial, &[]);
        assert!(averages.is_empty());
        assert_eq!(averages.iter().count(), 0);
    }

    #[test]
    fn dominant_picks_highest_confidence() {
        let results = vec![
            RawClassification::new("sadness", 70.0),
            RawClassification::new("grief", 50.0),
        ];
        assert_eq!(dominant(&results).map(|r| r.label.as_str()), Some("sadness"));
        assert!(dominant(&[]).is_none());
    }
}
