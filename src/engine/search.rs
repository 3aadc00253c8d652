//! Sampling-based search for the palette the model most expects to be liked.

use crate::engine::{
    color::HexColor,
    features::encode,
    model::PreferenceModel,
    sampler::PaletteSampler,
};

/// Result of scoring a palette against the preference model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    /// No classifier has been fitted yet.
    NoModel,
    /// A classifier exists but too little feedback backs it.
    InsufficientData,
    /// Predicted probability of a like.
    Scored(f64),
}

impl ScoreOutcome {
    /// Probability when the palette was actually scored.
    pub fn probability(&self) -> Option<f64> {
        match self {
            Self::Scored(p) => Some(*p),
            Self::NoModel | Self::InsufficientData => None,
        }
    }
}

/// Palette chosen by [`CandidateSearch::best_of`].
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Colors of the winning candidate.
    pub colors: Vec<HexColor>,
    /// Its score, or why it was not scored.
    pub outcome: ScoreOutcome,
}

/// Exploitation-only search: sample a fixed number of candidates and keep the best scored.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSearch {
    trial_budget: usize,
    min_feedback: usize,
    palette_size: usize,
}

impl CandidateSearch {
    /// A budget of zero is raised to one candidate.
    pub fn new(trial_budget: usize, min_feedback: usize, palette_size: usize) -> Self {
        Self {
            trial_budget: trial_budget.max(1),
            min_feedback,
            palette_size,
        }
    }

    /// Why scoring must be skipped, if it must.
    fn gate(&self, model: &PreferenceModel, usable_feedback: usize) -> Option<ScoreOutcome> {
        if !model.is_trained() {
            Some(ScoreOutcome::NoModel)
        } else if usable_feedback < self.min_feedback {
            Some(ScoreOutcome::InsufficientData)
        } else {
            None
        }
    }

    /// Score a single palette produced elsewhere (image extraction, harmony).
    pub fn score(
        &self,
        colors: &[HexColor],
        model: &PreferenceModel,
        usable_feedback: usize,
    ) -> ScoreOutcome {
        if let Some(blocked) = self.gate(model, usable_feedback) {
            return blocked;
        }
        match model.predict_proba(&encode(colors)) {
            Ok(p) => ScoreOutcome::Scored(p),
            Err(_) => ScoreOutcome::NoModel,
        }
    }

    /// Return the best of `trial_budget` random palettes.
    ///
    /// When the model cannot be trusted the first sample is returned unscored.
    pub fn best_of(
        &self,
        sampler: &mut PaletteSampler,
        model: &PreferenceModel,
        usable_feedback: usize,
    ) -> Candidate {
        let first = sampler.sample(self.palette_size);
        if let Some(outcome) = self.gate(model, usable_feedback) {
            return Candidate {
                colors: first,
                outcome,
            };
        }

        let mut best: Option<(Vec<HexColor>, f64)> = None;
        let candidates = std::iter::once(first)
            .chain((1..self.trial_budget).map(|_| sampler.sample(self.palette_size)));
        for colors in candidates {
            let Ok(p) = model.predict_proba(&encode(&colors)) else {
                continue;
            };
            // strict comparison keeps the first of equal scores
            if best.as_ref().is_none_or(|(_, best_p)| p > *best_p) {
                best = Some((colors, p));
            }
        }

        match best {
            Some((colors, p)) => Candidate {
                colors,
                outcome: ScoreOutcome::Scored(p),
            },
            None => Candidate {
                colors: sampler.sample(self.palette_size),
                outcome: ScoreOutcome::NoModel,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::TrainingParams;

    fn trained_model() -> PreferenceModel {
        let like: Vec<HexColor> = ["#FF0000", "#FF4400", "#EE2200", "#FF6600", "#DD1100"]
            .iter()
            .map(|c| HexColor::parse(c).unwrap())
            .collect();
        let dislike: Vec<HexColor> = ["#0000FF", "#0044EE", "#2200DD", "#0066FF", "#1100CC"]
            .iter()
            .map(|c| HexColor::parse(c).unwrap())
            .collect();
        let like = encode(&like).to_vec();
        let dislike = encode(&dislike).to_vec();
        let (model, _) = PreferenceModel::fit(
            vec![(like.as_slice(), true), (dislike.as_slice(), false)],
            &TrainingParams::default(),
        );
        assert!(model.is_trained());
        model
    }

    #[test]
    fn untrained_model_returns_first_sample_unscored() {
        let search = CandidateSearch::new(15, 15, 5);
        let mut sampler = PaletteSampler::seeded(3);
        let candidate = search.best_of(&mut sampler, &PreferenceModel::default(), 100);

        let mut reference = PaletteSampler::seeded(3);
        assert_eq!(candidate.colors, reference.sample(5));
        assert_eq!(candidate.outcome, ScoreOutcome::NoModel);
        assert_eq!(candidate.outcome.probability(), None);
        // only a single candidate was drawn
        assert_eq!(sampler.sample(5), reference.sample(5));
    }

    #[test]
    fn too_little_feedback_skips_scoring() {
        let search = CandidateSearch::new(15, 15, 5);
        let model = trained_model();
        let mut sampler = PaletteSampler::seeded(11);
        let candidate = search.best_of(&mut sampler, &model, 14);

        let mut reference = PaletteSampler::seeded(11);
        assert_eq!(candidate.colors, reference.sample(5));
        assert_eq!(candidate.outcome, ScoreOutcome::InsufficientData);
        assert_eq!(sampler.sample(5), reference.sample(5));
    }

    #[test]
    fn picks_highest_scoring_candidate_within_budget() {
        let search = CandidateSearch::new(15, 15, 5);
        let model = trained_model();
        let mut sampler = PaletteSampler::seeded(99);
        let candidate = search.best_of(&mut sampler, &model, 15);

        let mut reference = PaletteSampler::seeded(99);
        let mut expected: Option<(Vec<HexColor>, f64)> = None;
        for _ in 0..15 {
            let colors = reference.sample(5);
            let p = model.predict_proba(&encode(&colors)).unwrap();
            if expected.as_ref().is_none_or(|(_, best)| p > *best) {
                expected = Some((colors, p));
            }
        }
        let (colors, p) = expected.unwrap();

        assert_eq!(candidate.colors, colors);
        assert_eq!(candidate.outcome, ScoreOutcome::Scored(p));
        // exactly the budget was consumed
        assert_eq!(sampler.sample(5), reference.sample(5));
    }

    #[test]
    fn score_applies_the_same_gate() {
        let search = CandidateSearch::new(15, 15, 5);
        let model = trained_model();
        let colors = vec![HexColor::parse("#FF0000").unwrap()];

        assert_eq!(
            search.score(&colors, &PreferenceModel::default(), 50),
            ScoreOutcome::NoModel
        );
        assert_eq!(
            search.score(&colors, &model, 3),
            ScoreOutcome::InsufficientData
        );
        let scored = search.score(&colors, &model, 15).probability().unwrap();
        assert!((0.0..=1.0).contains(&scored));
    }
}
