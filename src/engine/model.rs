//! Binary preference classifier retrained from the full feedback corpus.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::engine::features::{FEATURE_DIM, FeatureVector};

/// Returned when a probability is requested from an untrained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("preference model is not trained")]
pub struct ModelUnavailable;

/// Hyper-parameters for the logistic regression fit.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Number of full-batch passes.
    pub epochs: usize,
    /// L2 penalty weight, equivalent to sklearn's `1 / C`.
    pub l2: f64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            epochs: 1_000,
            l2: 1.0,
        }
    }
}

/// Observable state of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    /// No classifier yet; probabilities are unavailable.
    Untrained,
    /// A classifier was fitted on both labels.
    Trained,
}

/// Summary of a retrain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrainReport {
    /// Records with a well-formed feature vector.
    pub usable: usize,
    /// Records dropped because their features were malformed.
    pub discarded: usize,
    /// State after the retrain.
    pub state: ModelState,
}

/// Fitted L2-regularised logistic regression over [`FEATURE_DIM`] inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    weights: [f64; FEATURE_DIM],
    bias: f64,
}

impl LogisticRegression {
    /// Full-batch gradient descent from zero weights; deterministic for a given corpus.
    fn fit(samples: &[(FeatureVector, bool)], params: &TrainingParams) -> Self {
        let mut weights = [0.0; FEATURE_DIM];
        let mut bias = 0.0;
        #[allow(clippy::cast_precision_loss)]
        let n = samples.len() as f64;

        for _ in 0..params.epochs {
            let mut grad_w = [0.0; FEATURE_DIM];
            let mut grad_b = 0.0;

            for (features, liked) in samples {
                let p = sigmoid(linear(&weights, bias, features));
                let error = p - if *liked { 1.0 } else { 0.0 };
                for (g, x) in grad_w.iter_mut().zip(features.as_slice()) {
                    *g += error * f64::from(*x);
                }
                grad_b += error;
            }

            for (w, g) in weights.iter_mut().zip(grad_w) {
                *w -= params.learning_rate * (g / n + params.l2 / n * *w);
            }
            bias -= params.learning_rate * grad_b / n;
        }

        Self { weights, bias }
    }

    /// Probability that the palette behind `features` is liked.
    pub fn predict_proba(&self, features: &FeatureVector) -> f64 {
        sigmoid(linear(&self.weights, self.bias, features))
    }
}

fn linear(weights: &[f64; FEATURE_DIM], bias: f64, features: &FeatureVector) -> f64 {
    weights
        .iter()
        .zip(features.as_slice())
        .fold(bias, |acc, (w, x)| acc + w * f64::from(*x))
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Process-wide preference model; either untrained or holding a fitted classifier.
#[derive(Debug, Clone, Default)]
pub struct PreferenceModel {
    classifier: Option<LogisticRegression>,
}

impl PreferenceModel {
    /// Current state.
    pub fn state(&self) -> ModelState {
        if self.classifier.is_some() {
            ModelState::Trained
        } else {
            ModelState::Untrained
        }
    }

    /// Shorthand for `state() == ModelState::Trained`.
    pub fn is_trained(&self) -> bool {
        self.classifier.is_some()
    }

    /// Build a model from the corpus of `(features, liked)` pairs.
    ///
    /// Records whose features are not a valid [`FeatureVector`] are skipped. The result is
    /// trained only when the remaining records contain both labels.
    pub fn fit<'a, I>(corpus: I, params: &TrainingParams) -> (Self, RetrainReport)
    where
        I: IntoIterator<Item = (&'a [f32], bool)>,
    {
        let mut samples = Vec::new();
        let mut discarded = 0;
        for (index, (raw, liked)) in corpus.into_iter().enumerate() {
            match FeatureVector::try_from(raw) {
                Ok(features) => samples.push((features, liked)),
                Err(err) => {
                    debug!(index, error = %err, "discarding malformed feedback features");
                    discarded += 1;
                }
            }
        }

        let has_like = samples.iter().any(|(_, liked)| *liked);
        let has_dislike = samples.iter().any(|(_, liked)| !*liked);
        let classifier =
            (has_like && has_dislike).then(|| LogisticRegression::fit(&samples, params));

        let model = Self { classifier };
        let report = RetrainReport {
            usable: samples.len(),
            discarded,
            state: model.state(),
        };
        (model, report)
    }

    /// Replace this model with one fitted on `corpus`.
    pub fn retrain<'a, I>(&mut self, corpus: I, params: &TrainingParams) -> RetrainReport
    where
        I: IntoIterator<Item = (&'a [f32], bool)>,
    {
        let (model, report) = Self::fit(corpus, params);
        *self = model;
        report
    }

    /// Probability of a like; callers must check [`PreferenceModel::is_trained`] first.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelUnavailable> {
        self.classifier
            .as_ref()
            .map(|classifier| classifier.predict_proba(features))
            .ok_or(ModelUnavailable)
    }
}
