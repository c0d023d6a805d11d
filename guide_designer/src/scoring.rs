use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;
use tracing::debug;

/// Where in the scanned sequence a guide was found.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub sequence: &'a str,
    pub position: usize,
}

/// Scores one guide/PAM pair. Implementations must return a value in [0, 1].
pub trait GuideScorer {
    fn score(&mut self, guide: &str, pam: &str, context: &ScoringContext<'_>) -> f64;
}

/// Placeholder off-target score: uniform in [0.5, 1.0).
pub struct RandomScorer<R = Isaac64Rng> {
    rng: R,
}

impl RandomScorer<Isaac64Rng> {
    pub fn from_entropy() -> Self {
        Self::new(Isaac64Rng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Isaac64Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomScorer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> GuideScorer for RandomScorer<R> {
    fn score(&mut self, _guide: &str, _pam: &str, _context: &ScoringContext<'_>) -> f64 {
        self.rng.gen_range(0.5..1.0)
    }
}

/// TKO position-specific scoring matrix, 1-indexed by guide position.
/// Rows: A, C, G, T.
pub const NUCLEOTIDE_SCORES: [[f64; 21]; 4] = [
    [0.0, 0.322, 0.409, 0.324, 0.072, 0.039, 0.143, 0.178, -0.013, 0.439, 0.458, 0.318, 0.254, -0.242, 0.291, 0.106, 0.151, -0.191, -0.673, -0.523, 0.048],
    [0.0, -0.776, -0.131, -0.5, -0.143, -0.059, -0.079, 0.017, 0.03, -0.245, -0.092, -0.107, 0.174, 0.509, -0.163, -0.108, 0.366, 0.177, 1.0, 0.075, -0.631],
    [0.0, 0.281, -0.103, 0.088, 0.437, 0.11, 0.344, 0.169, 0.003, 0.013, 0.103, 0.052, -0.431, -0.056, -0.585, -0.223, -0.377, 0.012, -0.326, 0.442, 0.584],
    [0.0, 0.172, -0.174, 0.087, -0.367, -0.207, -0.402, -0.365, -0.014, -0.206, -0.468, -0.258, 0.006, -0.209, 0.461, 0.227, -0.144, -1.0, -1.0, -1.0, -1.0],
];

const PSSM_MIN: f64 = -6.798;
const PSSM_MAX: f64 = 6.534;

fn nucleotide_index(nucleotide: char) -> Option<usize> {
    match nucleotide {
        'A' | 'a' => Some(0),
        'C' | 'c' => Some(1),
        'G' | 'g' => Some(2),
        'T' | 't' => Some(3),
        _ => None,
    }
}

/// Raw PSSM sum for a 20 nt guide, `None` on wrong length or non-ACGT input.
pub fn pssm_raw_score(guide: &str) -> Option<f64> {
    if guide.chars().count() != 20 {
        debug!("Guide sequence must be 20nt long, got {}", guide);
        return None;
    }
    guide
        .chars()
        .enumerate()
        .map(|(pos, nucleotide)| nucleotide_index(nucleotide).map(|idx| NUCLEOTIDE_SCORES[idx][pos + 1]))
        .sum()
}

/// Deterministic on-target score from the TKO PSSM, rescaled into [0, 1].
#[derive(Debug, Default, Clone, Copy)]
pub struct PssmScorer;

impl GuideScorer for PssmScorer {
    fn score(&mut self, guide: &str, _pam: &str, _context: &ScoringContext<'_>) -> f64 {
        match pssm_raw_score(guide) {
            Some(raw) => ((raw - PSSM_MIN) / (PSSM_MAX - PSSM_MIN)).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScorerKind {
    Random,
    Pssm,
}

/// How each request builds its scorer.
#[derive(Debug, Clone, Copy)]
pub struct ScoringSettings {
    pub kind: ScorerKind,
    pub seed: Option<u64>,
}

impl ScoringSettings {
    pub fn build(&self) -> Box<dyn GuideScorer> {
        match (self.kind, self.seed) {
            (ScorerKind::Pssm, _) => Box::new(PssmScorer),
            (ScorerKind::Random, Some(seed)) => Box::new(RandomScorer::seeded(seed)),
            (ScorerKind::Random, None) => Box::new(RandomScorer::from_entropy()),
        }
    }
}
