// Latent Dirichlet Allocation fitted with online variational Bayes.
//
// Each pass over the corpus walks it in mini-batches. For every batch the
// E-step iterates each document's variational topic weights (gamma) to
// convergence, and the M-step blends the batch's sufficient statistics into
// the topic-word parameters (lambda) with a decaying learning rate
// `(offset + t)^-decay`.
//
// All randomness comes from a seeded `StdRng`, so fitting the same matrix
// with the same configuration always yields the same model.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Gamma;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Guards divisions by the normalizer phi.
const EPS: f64 = f64::EPSILON;

/// Shape and scale of the Gamma draw used to initialize lambda and gamma.
const INIT_SHAPE: f64 = 100.0;
const INIT_SCALE: f64 = 0.01;

/// Online LDA hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LdaConfig {
    /// Document-topic prior (alpha). `None` means 1 / n_topics.
    pub doc_topic_prior: Option<f64>,
    /// Topic-word prior (eta). `None` means 1 / n_topics.
    pub topic_word_prior: Option<f64>,
    /// kappa: how fast old lambda is forgotten, in (0.5, 1.0]
    pub learning_decay: f64,
    /// tau0: down-weights the first iterations
    pub learning_offset: f64,
    /// Passes over the corpus
    pub max_iter: usize,
    /// Documents per mini-batch
    pub batch_size: usize,
    /// E-step stops once the mean absolute change of gamma drops below this
    pub mean_change_tol: f64,
    /// Upper bound on E-step iterations per document
    pub max_doc_update_iter: usize,
    pub random_seed: u64,
}

impl Default for LdaConfig {
    fn default() -> Self {
        Self {
            doc_topic_prior: None,
            topic_word_prior: None,
            learning_decay: 0.7,
            learning_offset: 10.0,
            max_iter: 10,
            batch_size: 128,
            mean_change_tol: 1e-3,
            max_doc_update_iter: 100,
            random_seed: 42,
        }
    }
}

/// A fitted topic model. Immutable once built; refit to get a new one.
#[derive(Debug, Clone)]
pub struct LdaModel {
    n_topics: usize,
    doc_topic_prior: f64,
    config: LdaConfig,
    /// lambda: n_topics x n_terms
    components: Array2<f64>,
    /// exp(E[log beta]) for the current lambda
    exp_dirichlet_component: Array2<f64>,
    /// Draws the starting lambda and every document's starting gamma
    init: Gamma<f64>,
}

impl LdaModel {
    /// Fit `n_topics` topics to a document-term count matrix.
    pub fn fit(
        n_topics: usize,
        config: &LdaConfig,
        dtm: &Array2<f64>,
    ) -> Result<Self, AnalysisError> {
        let (n_docs, n_terms) = dtm.dim();
        if n_topics == 0 {
            return Err(AnalysisError::InvalidArgument(
                "number of topics must be positive".into(),
            ));
        }
        if n_docs == 0 || n_terms == 0 {
            return Err(AnalysisError::InsufficientData(format!(
                "cannot fit a topic model to a {n_docs}x{n_terms} document-term matrix"
            )));
        }
        if config.batch_size == 0 {
            return Err(AnalysisError::InvalidArgument(
                "batch size must be positive".into(),
            ));
        }

        let prior = 1.0 / n_topics as f64;
        let doc_topic_prior = config.doc_topic_prior.unwrap_or(prior);
        let topic_word_prior = config.topic_word_prior.unwrap_or(prior);

        let mut rng = StdRng::seed_from_u64(config.random_seed);
        let init = init_distribution()?;

        let components = Array2::from_shape_fn((n_topics, n_terms), |_| rng.sample(&init));
        let exp_dirichlet_component = exp_dirichlet_expectation(&components);

        let mut model = Self {
            n_topics,
            doc_topic_prior,
            config: config.clone(),
            components,
            exp_dirichlet_component,
            init,
        };

        let mut n_batch_iter: usize = 1;
        for _ in 0..config.max_iter {
            for start in (0..n_docs).step_by(config.batch_size) {
                let end = (start + config.batch_size).min(n_docs);
                let batch = dtm.slice(ndarray::s![start..end, ..]).to_owned();

                let (_, sstats) = model.e_step(&batch, &mut rng, true);
                let Some(sstats) = sstats else {
                    continue;
                };

                // online M-step
                let weight = (config.learning_offset + n_batch_iter as f64)
                    .powf(-config.learning_decay);
                let doc_ratio = n_docs as f64 / batch.nrows() as f64;
                model.components = &model.components * (1.0 - weight)
                    + (sstats * doc_ratio + topic_word_prior) * weight;
                model.exp_dirichlet_component = exp_dirichlet_expectation(&model.components);
                n_batch_iter += 1;
            }
        }

        Ok(model)
    }

    pub fn n_topics(&self) -> usize {
        self.n_topics
    }

    /// Topic-word weights (lambda), one row per topic.
    pub fn components(&self) -> &Array2<f64> {
        &self.components
    }

    /// Topic distribution of each row of `dtm`; every row sums to 1.
    ///
    /// Uses its own seeded generator, so repeated calls agree.
    pub fn transform(&self, dtm: &Array2<f64>) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(self.config.random_seed.wrapping_add(1));
        let (mut doc_topic, _) = self.e_step(dtm, &mut rng, false);

        for mut row in doc_topic.axis_iter_mut(Axis(0)) {
            let total = row.sum();
            if total > 0.0 {
                row /= total;
            } else {
                row.fill(1.0 / self.n_topics as f64);
            }
        }
        doc_topic
    }

    /// Variational E-step over the rows of `batch`.
    ///
    /// Returns unnormalized gamma (documents x topics) and, when requested,
    /// the sufficient statistics for the M-step (topics x terms).
    fn e_step(
        &self,
        batch: &Array2<f64>,
        rng: &mut StdRng,
        compute_sstats: bool,
    ) -> (Array2<f64>, Option<Array2<f64>>) {
        let n_docs = batch.nrows();

        let mut doc_topic: Array2<f64> = Array2::zeros((n_docs, self.n_topics));
        let mut sstats: Option<Array2<f64>> = compute_sstats.then(|| Array2::zeros(self.components.dim()));

        for (d, row) in batch.axis_iter(Axis(0)).enumerate() {
            let (ids, counts) = nonzero_terms(row);

            let mut gamma: Array1<f64> =
                Array1::from_shape_fn(self.n_topics, |_| rng.sample(&self.init));

            if ids.is_empty() {
                doc_topic.row_mut(d).assign(&gamma);
                continue;
            }

            let exp_topic_word = self.exp_dirichlet_component.select(Axis(1), &ids);
            let mut exp_doc_topic = exp_dirichlet_expectation_1d(&gamma);

            for _ in 0..self.config.max_doc_update_iter {
                let last = gamma.clone();
                let norm_phi = exp_doc_topic.dot(&exp_topic_word) + EPS;
                gamma = &exp_doc_topic * &exp_topic_word.dot(&(&counts / &norm_phi))
                    + self.doc_topic_prior;
                exp_doc_topic = exp_dirichlet_expectation_1d(&gamma);

                let mean_change = (&gamma - &last).mapv(f64::abs).mean().unwrap_or(0.0);
                if mean_change < self.config.mean_change_tol {
                    break;
                }
            }

            doc_topic.row_mut(d).assign(&gamma);

            if let Some(sstats) = sstats.as_mut() {
                let norm_phi = exp_doc_topic.dot(&exp_topic_word) + EPS;
                let weighted = &counts / &norm_phi;
                for (k, &topic_weight) in exp_doc_topic.iter().enumerate() {
                    for (j, &col) in ids.iter().enumerate() {
                        sstats[[k, col]] += topic_weight * weighted[j];
                    }
                }
            }
        }

        let sstats = sstats.map(|s| s * &self.exp_dirichlet_component);
        (doc_topic, sstats)
    }
}

fn init_distribution() -> Result<Gamma<f64>, AnalysisError> {
    Gamma::new(INIT_SHAPE, INIT_SCALE)
        .map_err(|e| AnalysisError::InvalidArgument(format!("bad initialization prior: {e}")))
}

/// Column indices and counts of the non-zero entries of a row.
fn nonzero_terms(row: ArrayView1<'_, f64>) -> (Vec<usize>, Array1<f64>) {
    let mut ids = Vec::new();
    let mut counts = Vec::new();
    for (j, &value) in row.iter().enumerate() {
        if value > 0.0 {
            ids.push(j);
            counts.push(value);
        }
    }
    (ids, Array1::from(counts))
}

/// exp(E[log theta]) for a Dirichlet parameter vector.
fn exp_dirichlet_expectation_1d(alpha: &Array1<f64>) -> Array1<f64> {
    let psi_total = digamma(alpha.sum());
    alpha.mapv(|a| (digamma(a) - psi_total).exp())
}

/// Row-wise exp(E[log beta]) for a matrix of Dirichlet parameters.
fn exp_dirichlet_expectation(alpha: &Array2<f64>) -> Array2<f64> {
    let mut out = alpha.clone();
    for mut row in out.axis_iter_mut(Axis(0)) {
        let psi_total = digamma(row.sum());
        row.mapv_inplace(|a| (digamma(a) - psi_total).exp());
    }
    out
}

/// The digamma function for x > 0.
///
/// Shifts x above 6 with psi(x) = psi(x + 1) - 1/x, then applies the
/// asymptotic series.
pub(crate) fn digamma(x: f64) -> f64 {
    if x <= 0.0 {
        return f64::NAN;
    }
    let mut x = x;
    let mut result = 0.0;
    while x < 6.0 {
        result -= 1.0 / x;
        x += 1.0;
    }
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    result + x.ln() - 0.5 * inv
        - inv2
            * (1.0 / 12.0
                - inv2 * (1.0 / 120.0 - inv2 * (1.0 / 252.0 - inv2 * (1.0 / 240.0 - inv2 / 132.0))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_digamma_known_values() {
        // psi(1) = -euler_gamma
        assert!((digamma(1.0) + 0.577_215_664_901_532_9).abs() < 1e-10);
        // psi(0.5) = -gamma - 2 ln 2
        let expected = -0.577_215_664_901_532_9 - 2.0 * 2f64.ln();
        assert!((digamma(0.5) - expected).abs() < 1e-10);
        // psi(x + 1) = psi(x) + 1/x
        assert!((digamma(11.5) - digamma(10.5) - 1.0 / 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_fit_rejects_zero_topics() {
        let dtm = array![[1.0, 0.0], [0.0, 1.0]];
        assert!(matches!(
            LdaModel::fit(0, &LdaConfig::default(), &dtm),
            Err(AnalysisError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_transform_rows_are_distributions() {
        let dtm = array![[3.0, 2.0, 0.0, 0.0], [0.0, 0.0, 4.0, 1.0], [1.0, 0.0, 0.0, 2.0]];
        let model = LdaModel::fit(2, &LdaConfig::default(), &dtm).unwrap();
        assert_eq!(model.components().dim(), (2, 4));

        let doc_topic = model.transform(&dtm);
        for row in doc_topic.axis_iter(Axis(0)) {
            assert!((row.sum() - 1.0).abs() < 1e-9);
            assert!(row.iter().all(|&p| p > 0.0));
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let dtm = array![[3.0, 2.0, 0.0], [0.0, 1.0, 4.0]];
        let a = LdaModel::fit(2, &LdaConfig::default(), &dtm).unwrap();
        let b = LdaModel::fit(2, &LdaConfig::default(), &dtm).unwrap();
        assert_eq!(a.components(), b.components());
    }

    #[test]
    fn test_empty_row_starts_from_the_fit_prior() {
        let dtm = array![[2.0, 1.0], [0.0, 3.0]];
        let model = LdaModel::fit(2, &LdaConfig::default(), &dtm).unwrap();
        let first = model.transform(&array![[0.0, 0.0]]);
        let second = model.transform(&array![[0.0, 0.0]]);

        assert_eq!(first, second);
        // a Gamma draw, never the exact uniform split of an all-ones start
        assert_ne!(first[[0, 0]], 0.5);
    }

    #[test]
    fn test_empty_row_gets_uniform_free_distribution() {
        let dtm = array![[2.0, 1.0], [0.0, 3.0]];
        let model = LdaModel::fit(2, &LdaConfig::default(), &dtm).unwrap();
        let doc_topic = model.transform(&array![[0.0, 0.0]]);
        assert!((doc_topic.row(0).sum() - 1.0).abs() < 1e-9);
    }
}
