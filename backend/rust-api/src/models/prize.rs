use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub const DEFAULT_PRIZES: [u64; 15] = [
    100, 200, 300, 500, 1_000, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 125_000, 250_000,
    500_000, 1_000_000,
];

pub const DEFAULT_FIREPROOF_LEVELS: [usize; 3] = [4, 9, 14];

pub const DEFAULT_TIME_LIMIT_MINUTES: i64 = 35;

/// Prize ladder: one strictly increasing amount per level, with a sorted
/// subset of levels marked fireproof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrizeTable {
    prizes: Vec<u64>,
    fireproof_levels: Vec<usize>,
}

impl PrizeTable {
    pub fn new(prizes: Vec<u64>, fireproof_levels: Vec<usize>) -> Result<Self, GameError> {
        if prizes.is_empty() {
            return Err(GameError::InvalidPrizeTable(
                "at least one level is required".to_string(),
            ));
        }

        if prizes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(GameError::InvalidPrizeTable(
                "prizes must be strictly increasing".to_string(),
            ));
        }

        if fireproof_levels.windows(2).any(|w| w[0] >= w[1]) {
            return Err(GameError::InvalidPrizeTable(
                "fireproof levels must be sorted and unique".to_string(),
            ));
        }

        if let Some(level) = fireproof_levels.iter().find(|l| **l >= prizes.len()) {
            return Err(GameError::InvalidPrizeTable(format!(
                "fireproof level {} is outside the ladder 0..{}",
                level,
                prizes.len()
            )));
        }

        Ok(Self {
            prizes,
            fireproof_levels,
        })
    }

    /// Number of ladder levels; levels run `0..len()`.
    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    pub fn max_level(&self) -> usize {
        self.prizes.len() - 1
    }

    pub fn max_prize(&self) -> u64 {
        self.prizes.last().copied().unwrap_or_default()
    }

    pub fn prizes(&self) -> &[u64] {
        &self.prizes
    }

    pub fn fireproof_levels(&self) -> &[usize] {
        &self.fireproof_levels
    }

    pub fn is_fireproof(&self, level: usize) -> bool {
        self.fireproof_levels.binary_search(&level).is_ok()
    }

    /// Full prize for having conquered `level`; 0 when nothing was conquered.
    pub fn prize_for(&self, level: i64) -> u64 {
        usize::try_from(level)
            .ok()
            .and_then(|l| self.prizes.get(l).copied())
            .unwrap_or(0)
    }

    /// Amount banked when the game is lost with `answered_level` as the last
    /// conquered level: the prize of the highest fireproof level at or below it.
    pub fn fireproof_prize(&self, answered_level: i64) -> u64 {
        let Ok(answered) = usize::try_from(answered_level) else {
            return 0;
        };

        self.fireproof_levels
            .iter()
            .rev()
            .find(|level| **level <= answered)
            .map(|level| self.prizes[*level])
            .unwrap_or(0)
    }
}

impl Default for PrizeTable {
    fn default() -> Self {
        Self {
            prizes: DEFAULT_PRIZES.to_vec(),
            fireproof_levels: DEFAULT_FIREPROOF_LEVELS.to_vec(),
        }
    }
}

/// Configuration a game is judged against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    pub prizes: PrizeTable,
    pub time_limit: Duration,
}

impl GameRules {
    pub fn new(prizes: PrizeTable, time_limit: Duration) -> Self {
        Self { prizes, time_limit }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            prizes: PrizeTable::default(),
            time_limit: Duration::minutes(DEFAULT_TIME_LIMIT_MINUTES),
        }
    }
}

/// One rung of the ladder as shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrizeStep {
    pub level: usize,
    pub amount: u64,
    pub fireproof: bool,
}

impl PrizeTable {
    pub fn ladder(&self) -> Vec<PrizeStep> {
        self.prizes
            .iter()
            .enumerate()
            .map(|(level, amount)| PrizeStep {
                level,
                amount: *amount,
                fireproof: self.is_fireproof(level),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        let table = PrizeTable::default();
        assert_eq!(
            PrizeTable::new(table.prizes().to_vec(), table.fireproof_levels().to_vec()),
            Ok(table.clone())
        );
        assert_eq!(table.len(), 15);
        assert_eq!(table.max_level(), 14);
        assert_eq!(table.max_prize(), 1_000_000);
    }

    #[test]
    fn fireproof_prize_uses_last_checkpoint_passed() {
        let table = PrizeTable::default();
        assert_eq!(table.fireproof_prize(-1), 0);
        assert_eq!(table.fireproof_prize(0), 0);
        assert_eq!(table.fireproof_prize(3), 0);
        assert_eq!(table.fireproof_prize(4), 1_000);
        assert_eq!(table.fireproof_prize(8), 1_000);
        assert_eq!(table.fireproof_prize(9), 32_000);
        assert_eq!(table.fireproof_prize(13), 32_000);
        assert_eq!(table.fireproof_prize(14), 1_000_000);
    }

    #[test]
    fn prize_for_conquered_level() {
        let table = PrizeTable::default();
        assert_eq!(table.prize_for(-1), 0);
        assert_eq!(table.prize_for(0), 100);
        assert_eq!(table.prize_for(5), 2_000);
        assert_eq!(table.prize_for(15), 0);
    }

    #[test]
    fn fireproof_prize_on_a_custom_table() {
        let table = PrizeTable::new(vec![10, 20, 50, 100, 250, 600], vec![1, 4]).unwrap();
        assert_eq!(table.fireproof_prize(-1), 0);
        assert_eq!(table.fireproof_prize(0), 0);
        assert_eq!(table.fireproof_prize(1), 20);
        assert_eq!(table.fireproof_prize(3), 20);
        assert_eq!(table.fireproof_prize(4), 250);
        assert_eq!(table.fireproof_prize(5), 250);

        let floors: Vec<u64> = (-1..6).map(|level| table.fireproof_prize(level)).collect();
        assert!(floors.windows(2).all(|pair| pair[0] <= pair[1]));
        for level in -1..6 {
            assert!(table.fireproof_prize(level) <= table.prize_for(level));
        }
    }

    #[test]
    fn fireproof_floor_never_exceeds_full_prize() {
        let table = PrizeTable::default();
        for level in -1..15 {
            assert!(table.fireproof_prize(level) <= table.prize_for(level));
        }
    }

    #[test]
    fn rejects_malformed_tables() {
        assert!(PrizeTable::new(vec![], vec![]).is_err());
        assert!(PrizeTable::new(vec![100, 100, 300], vec![]).is_err());
        assert!(PrizeTable::new(vec![100, 200, 300], vec![2, 1]).is_err());
        assert!(PrizeTable::new(vec![100, 200, 300], vec![3]).is_err());
        assert!(PrizeTable::new(vec![100, 200, 300], vec![1, 1]).is_err());
    }

    #[test]
    fn ladder_marks_fireproof_levels() {
        let ladder = PrizeTable::default().ladder();
        let marked: Vec<usize> = ladder
            .iter()
            .filter(|step| step.fireproof)
            .map(|step| step.level)
            .collect();
        assert_eq!(marked, vec![4, 9, 14]);
    }
}
