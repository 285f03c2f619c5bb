//! Latent semantic analysis sentence ranking.
//!
//! Steinberger & Ježek style LSA: build a term×sentence matrix over the
//! stemmed, stop-word-free vocabulary, smooth it into term frequencies,
//! decompose it, and score each sentence by the length of its vector in the
//! latent space:
//!
//! ```text
//! rank(j) = sqrt( Σ_i σ_i² · v_ij² )    for the first `dimensions` singular values
//! ```
//!
//! The right singular vectors `v` and the squared singular values `σ²` are the
//! eigenpairs of the sentence Gram matrix `AᵀA`, which we diagonalize with
//! cyclic Jacobi rotations.

use super::tokenizer::{EnglishTokenizer, normalize};
use super::{FallbackReason, SentenceExtractor};
use ndarray::{Array1, Array2};
use std::collections::HashMap;
use tracing::debug;

const MIN_DIMENSIONS: usize = 3;
const REDUCTION_RATIO: f64 = 1.0;
const SMOOTHING: f64 = 0.4;
const MAX_SWEEPS: usize = 100;
/// Only the leading sentences are ranked; the decomposition is cubic in
/// their number.
const MAX_SENTENCES: usize = 120;
const JACOBI_EPSILON: f64 = 1e-12;

#[derive(Debug, Default)]
pub struct LsaExtractor {
    tokenizer: EnglishTokenizer,
}

impl LsaExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row index of every stemmed, non-stop word in the text.
    fn dictionary(&self, sentences: &[&str]) -> HashMap<String, usize> {
        let mut dictionary = HashMap::new();
        for sentence in sentences {
            for word in self.tokenizer.words(sentence) {
                if self.tokenizer.is_stop_word(&normalize(word)) {
                    continue;
                }
                let next = dictionary.len();
                dictionary.entry(self.tokenizer.stem(word)).or_insert(next);
            }
        }
        dictionary
    }

    /// Word counts: one row per dictionary term, one column per sentence.
    fn term_matrix(&self, sentences: &[&str], dictionary: &HashMap<String, usize>) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((dictionary.len(), sentences.len()));
        for (col, sentence) in sentences.iter().enumerate() {
            for word in self.tokenizer.words(sentence) {
                if let Some(&row) = dictionary.get(&self.tokenizer.stem(word)) {
                    matrix[[row, col]] += 1.0;
                }
            }
        }
        matrix
    }
}

impl SentenceExtractor for LsaExtractor {
    fn extract(&self, text: &str, count: usize) -> Result<Vec<String>, FallbackReason> {
        let mut sentences = self.tokenizer.sentences(text);
        if sentences.is_empty() {
            return Err(FallbackReason::EmptyInput);
        }
        if sentences.len() > MAX_SENTENCES {
            debug!(
                sentences = sentences.len(),
                kept = MAX_SENTENCES,
                "Ranking only the leading sentences"
            );
            sentences.truncate(MAX_SENTENCES);
        }

        let dictionary = self.dictionary(&sentences);
        if dictionary.is_empty() {
            return Err(FallbackReason::NoVocabulary);
        }
        if dictionary.len() < sentences.len() {
            debug!(
                words = dictionary.len(),
                sentences = sentences.len(),
                "Fewer distinct words than sentences; LSA ranking may be weak"
            );
        }

        let matrix = term_frequency(self.term_matrix(&sentences, &dictionary));
        let ranks = sentence_ranks(&matrix);
        let selected = select_best(&ranks, count);
        if selected.is_empty() {
            return Err(FallbackReason::NothingSelected);
        }
        Ok(selected.into_iter().map(|i| sentences[i].to_string()).collect())
    }
}

/// Replace counts with `SMOOTHING + (1 - SMOOTHING) * count / max_in_column`
/// for every column that has at least one term.
fn term_frequency(mut matrix: Array2<f64>) -> Array2<f64> {
    for mut column in matrix.columns_mut() {
        let max = column.iter().copied().fold(0.0, f64::max);
        if max > 0.0 {
            column.mapv_inplace(|count| SMOOTHING + (1.0 - SMOOTHING) * count / max);
        }
    }
    matrix
}

/// LSA score of every sentence (column) of the term-frequency matrix.
fn sentence_ranks(matrix: &Array2<f64>) -> Vec<f64> {
    let singular_count = matrix.nrows().min(matrix.ncols());
    let dimensions = MIN_DIMENSIONS.max((singular_count as f64 * REDUCTION_RATIO) as usize);

    let gram = matrix.t().dot(matrix);
    let (eigenvalues, eigenvectors) = symmetric_eigen(gram);

    let mut order: Vec<usize> = (0..eigenvalues.len()).collect();
    order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));
    let kept: Vec<usize> = order
        .into_iter()
        .take(dimensions.min(singular_count))
        .collect();

    (0..matrix.ncols())
        .map(|sentence| {
            kept.iter()
                .map(|&k| eigenvalues[k].max(0.0) * eigenvectors[[sentence, k]].powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .collect()
}

/// Indices of the `count` best-ranked sentences, in document order.
/// Ties keep document order.
fn select_best(ranks: &[f64], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ranks.len()).collect();
    order.sort_by(|&a, &b| ranks[b].total_cmp(&ranks[a]));
    order.truncate(count);
    order.sort_unstable();
    order
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns the eigenvalues and a matrix whose columns are the matching
/// eigenvectors.
fn symmetric_eigen(mut a: Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut v = Array2::<f64>::eye(n);

    for _ in 0..MAX_SWEEPS {
        let mut off_diagonal = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off_diagonal += a[[p, q]] * a[[p, q]];
            }
        }
        if off_diagonal < JACOBI_EPSILON {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() < f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    (a.diag().to_owned(), v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_term_frequency_smoothing() {
        let counts = array![[2.0, 0.0, 0.0], [1.0, 1.0, 0.0]];
        let tf = term_frequency(counts);
        assert!((tf[[0, 0]] - 1.0).abs() < 1e-9);
        assert!((tf[[1, 0]] - 0.7).abs() < 1e-9);
        assert!((tf[[0, 1]] - 0.4).abs() < 1e-9);
        assert!((tf[[1, 1]] - 1.0).abs() < 1e-9);
        // A sentence without vocabulary stays at zero.
        assert_eq!(tf[[0, 2]], 0.0);
        assert_eq!(tf[[1, 2]], 0.0);
    }

    #[test]
    fn test_symmetric_eigen_diagonalizes() {
        let m = array![[2.0, 1.0, 0.0], [1.0, 2.0, 0.0], [0.0, 0.0, 5.0]];
        let (values, vectors) = symmetric_eigen(m.clone());
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        assert!((sorted[0] - 1.0).abs() < 1e-9);
        assert!((sorted[1] - 3.0).abs() < 1e-9);
        assert!((sorted[2] - 5.0).abs() < 1e-9);

        // M v = λ v for every column
        for k in 0..3 {
            let col = vectors.column(k);
            let mv = m.dot(&col);
            for i in 0..3 {
                assert!((mv[i] - values[k] * col[i]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_ranks_match_column_norms_at_full_rank() {
        // With every dimension kept, the rank is the column's Euclidean norm.
        let m = array![[1.0, 0.4, 0.0], [0.4, 1.0, 0.7], [0.0, 0.4, 1.0]];
        let ranks = sentence_ranks(&m);
        for (j, rank) in ranks.iter().enumerate() {
            let norm = m.column(j).iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((rank - norm).abs() < 1e-6, "column {j}: {rank} vs {norm}");
        }
    }

    #[test]
    fn test_select_best_keeps_document_order() {
        let ranks = [0.2, 0.9, 0.1, 0.5];
        assert_eq!(select_best(&ranks, 2), vec![1, 3]);
        assert_eq!(select_best(&ranks, 10), vec![0, 1, 2, 3]);
        assert!(select_best(&ranks, 0).is_empty());
    }

    #[test]
    fn test_select_best_ties_prefer_earlier() {
        let ranks = [0.5, 0.5, 0.5];
        assert_eq!(select_best(&ranks, 2), vec![0, 1]);
    }

    #[test]
    fn test_extract_picks_central_sentences() {
        let extractor = LsaExtractor::new();
        let text = "Payment volumes grew strongly this quarter. \
                    The company reported payment volumes above forecasts. \
                    Weather was mild. \
                    Analysts expect payment growth to continue next quarter.";
        let picked = extractor.extract(text, 2).unwrap();
        assert_eq!(picked.len(), 2);
        assert!(!picked.contains(&"Weather was mild.".to_string()));
    }

    #[test]
    fn test_extract_returns_all_when_count_exceeds_sentences() {
        let extractor = LsaExtractor::new();
        let text = "Markets rallied on Monday. Bonds slipped slightly.";
        let picked = extractor.extract(text, 5).unwrap();
        assert_eq!(
            picked,
            vec!["Markets rallied on Monday.", "Bonds slipped slightly."]
        );
    }

    #[test]
    fn test_long_input_ranks_leading_sentences_quickly() {
        let extractor = LsaExtractor::new();
        let text = (0..2000)
            .map(|i| format!("Reporter {i} described harbor {} cargo delays.", i % 37))
            .collect::<Vec<_>>()
            .join(" ");

        let started = std::time::Instant::now();
        let picked = extractor.extract(&text, 3).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(10));

        assert_eq!(picked.len(), 3);
        let leading: Vec<&str> = extractor.tokenizer.sentences(&text)[..MAX_SENTENCES].to_vec();
        assert!(picked.iter().all(|s| leading.contains(&s.as_str())));
    }

    #[test]
    fn test_extract_reports_missing_vocabulary() {
        let extractor = LsaExtractor::new();
        assert!(matches!(
            extractor.extract("", 3),
            Err(FallbackReason::EmptyInput)
        ));
        assert!(matches!(
            extractor.extract("The and of the.", 3),
            Err(FallbackReason::NoVocabulary)
        ));
        assert!(matches!(
            extractor.extract("2024 1999 42.", 3),
            Err(FallbackReason::NoVocabulary)
        ));
    }
}
