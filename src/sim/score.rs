//! Score tracking and win detection

use super::state::PlayerId;
use crate::consts::WIN_SCORE;

/// Point tallies for both players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub player1: u32,
    pub player2: u32,
}

/// Sole owner of the score. First to `WIN_SCORE` wins; no win-by-margin.
#[derive(Debug, Clone, Default)]
pub struct ScoreKeeper {
    score: Score,
}

impl ScoreKeeper {
    /// Credit a point and return the updated tally.
    pub fn register_point(&mut self, scorer: PlayerId) -> Score {
        match scorer {
            PlayerId::One => self.score.player1 += 1,
            PlayerId::Two => self.score.player2 += 1,
        }
        self.score
    }

    /// Player 1 is checked first; both can't reach the threshold in the same
    /// tick since only one point is scored per tick.
    pub fn has_winner(&self) -> Option<PlayerId> {
        if self.score.player1 >= WIN_SCORE {
            Some(PlayerId::One)
        } else if self.score.player2 >= WIN_SCORE {
            Some(PlayerId::Two)
        } else {
            None
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn reset(&mut self) {
        self.score = Score::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_point_increments_by_one() {
        let mut keeper = ScoreKeeper::default();
        let score = keeper.register_point(PlayerId::Two);
        assert_eq!(score.player1, 0);
        assert_eq!(score.player2, 1);
        let score = keeper.register_point(PlayerId::One);
        assert_eq!(score.player1, 1);
        assert_eq!(score.player2, 1);
    }

    #[test]
    fn test_winner_at_threshold() {
        let mut keeper = ScoreKeeper::default();
        for _ in 0..WIN_SCORE - 1 {
            keeper.register_point(PlayerId::One);
            assert_eq!(keeper.has_winner(), None);
        }
        keeper.register_point(PlayerId::One);
        assert_eq!(keeper.has_winner(), Some(PlayerId::One));
    }

    #[test]
    fn test_reset_zeroes_both() {
        let mut keeper = ScoreKeeper::default();
        keeper.register_point(PlayerId::One);
        keeper.register_point(PlayerId::Two);
        keeper.reset();
        assert_eq!(keeper.score(), Score::default());
        assert_eq!(keeper.has_winner(), None);
    }
}
