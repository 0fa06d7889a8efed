use log::debug;

use std::sync::atomic::{AtomicBool, Ordering};

use super::crypto::sha256_hex;

/// Number of candidates tried between checks of the cancellation flag
pub const CANCEL_POLL_INTERVAL: u64 = 1024;

/// Simple proof of work
///
/// A proof `p'` is valid for the previous proof `p` when
/// `sha256(format!("{p}{p'}"))` starts with `difficulty` zero hex digits.
pub struct ProofOfWork;

impl ProofOfWork {
    /// Checks a candidate proof without searching
    ///
    /// A difficulty of zero accepts every candidate. A difficulty wider than
    /// the digest can never be met.
    pub fn validate(previous_proof: u64, candidate: u64, difficulty: usize) -> bool {
        let guess = format!("{}{}", previous_proof, candidate);
        let digest = sha256_hex(guess.as_bytes());

        digest.len() >= difficulty && digest.bytes().take(difficulty).all(|b| b == b'0')
    }

    /// Finds the smallest proof that satisfies `difficulty`
    ///
    /// Candidates are tried in ascending order starting from zero, so the
    /// result is reproducible. This blocks until a proof is found; use
    /// [`ProofOfWork::search_cancellable`] to bound it.
    pub fn search(previous_proof: u64, difficulty: usize) -> u64 {
        let mut candidate = 0;

        while !Self::validate(previous_proof, candidate, difficulty) {
            candidate += 1;
        }

        debug!(
            "Found proof {} for previous proof {} at difficulty {}",
            candidate, previous_proof, difficulty
        );
        candidate
    }

    /// Same search as [`ProofOfWork::search`], abandoned once `cancel` is set
    ///
    /// # Returns
    ///
    /// The proof, or `None` if the search was cancelled first
    pub fn search_cancellable(
        previous_proof: u64,
        difficulty: usize,
        cancel: &AtomicBool,
    ) -> Option<u64> {
        let mut candidate = 0;

        loop {
            if candidate % CANCEL_POLL_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
                debug!(
                    "Proof search for previous proof {} cancelled after {} candidates",
                    previous_proof, candidate
                );
                return None;
            }

            if Self::validate(previous_proof, candidate, difficulty) {
                debug!(
                    "Found proof {} for previous proof {} at difficulty {}",
                    candidate, previous_proof, difficulty
                );
                return Some(candidate);
            }

            candidate += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_proof_at_difficulty_two() {
        // sha256("100226") = 00e06c67...
        assert_eq!(ProofOfWork::search(100, 2), 226);
        assert!(ProofOfWork::validate(100, 226, 2));
    }

    #[test]
    fn test_search_returns_smallest_valid_proof() {
        let proof = ProofOfWork::search(100, 2);
        assert!((0..proof).all(|candidate| !ProofOfWork::validate(100, candidate, 2)));

        assert_eq!(ProofOfWork::search(100, 1), 16);
        assert_eq!(ProofOfWork::search(0, 2), 563);
    }

    #[test]
    fn test_search_result_validates() {
        for previous_proof in [0, 1, 100, 226, 99_999] {
            for difficulty in 0..=2 {
                let proof = ProofOfWork::search(previous_proof, difficulty);
                assert!(ProofOfWork::validate(previous_proof, proof, difficulty));
            }
        }
    }

    #[test]
    fn test_zero_difficulty_always_validates() {
        assert_eq!(ProofOfWork::search(100, 0), 0);
        assert!(ProofOfWork::validate(100, 12345, 0));
    }

    #[test]
    fn test_validate_is_deterministic() {
        for candidate in 0..50 {
            assert_eq!(
                ProofOfWork::validate(7, candidate, 1),
                ProofOfWork::validate(7, candidate, 1)
            );
        }
        assert!(!ProofOfWork::validate(100, 225, 2));
    }

    #[test]
    fn test_difficulty_wider_than_digest_never_validates() {
        assert!(!ProofOfWork::validate(100, 226, 65));
    }

    #[test]
    fn test_cancellable_search_matches_search() {
        let cancel = AtomicBool::new(false);
        assert_eq!(ProofOfWork::search_cancellable(100, 2, &cancel), Some(226));
    }

    #[test]
    fn test_cancelled_search_stops() {
        let cancel = AtomicBool::new(true);
        assert_eq!(ProofOfWork::search_cancellable(100, 64, &cancel), None);
    }
}
