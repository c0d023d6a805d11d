use tracing::debug;

use crate::errors::ValidationError;
use crate::models::GuideCandidate;
use crate::scoring::{GuideScorer, ScoringContext};

pub const GUIDE_LEN: usize = 20;
pub const PAM_LEN: usize = 3;
pub const MIN_SEQUENCE_LEN: usize = GUIDE_LEN + PAM_LEN;
pub const MAX_GUIDES: usize = 10;
pub const PAM_SUFFIX: &str = "GG";

/// Rejects sequences the scanner cannot window over.
pub fn check_length(sequence: &str) -> Result<(), ValidationError> {
    let len = sequence.chars().count();
    if len == 0 {
        return Err(ValidationError::missing_input());
    }
    if len < MIN_SEQUENCE_LEN {
        return Err(ValidationError::TooShort {
            len,
            min: MIN_SEQUENCE_LEN,
        });
    }
    Ok(())
}

/// Finds NGG-adjacent guides in `sequence`.
///
/// Window starts run over `0..len - 23`, so the very last 23 nt window is
/// never looked at. Every match is scored, then the list is cut to the first
/// [`MAX_GUIDES`] in position order. Characters outside ACGT pass through.
/// Scores are clamped into [0, 1] and rounded to three decimals.
pub fn scan_sequence(
    sequence: &str,
    scorer: &mut dyn GuideScorer,
) -> Result<Vec<GuideCandidate>, ValidationError> {
    check_length(sequence)?;

    let bases: Vec<char> = sequence.to_uppercase().chars().collect();
    let normalized: String = bases.iter().collect();
    let last_start = bases.len() - MIN_SEQUENCE_LEN;

    let mut guides = Vec::new();
    for i in 0..last_start {
        let pam: String = bases[i + GUIDE_LEN..i + MIN_SEQUENCE_LEN].iter().collect();
        if !pam.ends_with(PAM_SUFFIX) {
            continue;
        }
        let guide: String = bases[i..i + GUIDE_LEN].iter().collect();
        let context = ScoringContext {
            sequence: &normalized,
            position: i,
        };
        let score = round_score(scorer.score(&guide, &pam, &context));
        guides.push(GuideCandidate {
            guide,
            pam,
            position: i,
            score,
        });
    }

    debug!(
        "Scanned {} bp: {} PAM sites, keeping {}",
        bases.len(),
        guides.len(),
        guides.len().min(MAX_GUIDES)
    );
    guides.truncate(MAX_GUIDES);
    Ok(guides)
}

fn round_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    (raw.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}
