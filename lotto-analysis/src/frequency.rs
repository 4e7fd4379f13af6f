use serde::ser::{Serialize, Serializer};

use lotto_db::models::{Draw, POOL_SIZE};

/// Nombre de numéros retenus de chaque côté du classement chaud/froid.
pub const HOT_COLD_SIZE: usize = 9;

/// Fenêtre par défaut des statistiques récentes (en tirages).
pub const RECENT_WINDOW: usize = 50;

/// Occurrences de chaque numéro 1..=45, y compris ceux jamais sortis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; POOL_SIZE],
}

impl FrequencyTable {
    pub fn from_draws(draws: &[Draw]) -> Self {
        let mut counts = [0u32; POOL_SIZE];
        for draw in draws {
            for &n in &draw.numbers {
                // Les numéros hors 1..=45 sont ignorés, l'entrée n'est pas validée ici.
                if let Some(slot) = (n as usize).checked_sub(1).and_then(|i| counts.get_mut(i)) {
                    *slot += 1;
                }
            }
        }
        Self { counts }
    }

    pub fn get(&self, number: u8) -> u32 {
        (number as usize)
            .checked_sub(1)
            .and_then(|i| self.counts.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Paires (numéro, occurrences) dans l'ordre croissant des numéros.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| ((i + 1) as u8, count))
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Occurrence normalisée par le maximum de la table, 0 si la table est vide.
    pub fn normalized(&self, number: u8) -> f64 {
        let max = self.max();
        if max == 0 {
            0.0
        } else {
            self.get(number) as f64 / max as f64
        }
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NumberCount {
    pub number: u8,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HotCold {
    pub hot: Vec<NumberCount>,
    pub cold: Vec<NumberCount>,
}

pub fn frequency_analysis(draws: &[Draw]) -> FrequencyTable {
    FrequencyTable::from_draws(draws)
}

/// Les `window` derniers tirages de la séquence (ordre croissant supposé).
pub fn recent_draws(draws: &[Draw], window: usize) -> &[Draw] {
    &draws[draws.len().saturating_sub(window)..]
}

pub fn recent_frequency(draws: &[Draw], window: usize) -> FrequencyTable {
    FrequencyTable::from_draws(recent_draws(draws, window))
}

/// Classement par occurrences récentes décroissantes ; à égalité, le plus petit numéro d'abord.
pub fn rank_by_count(table: &FrequencyTable) -> Vec<NumberCount> {
    let mut ranked: Vec<NumberCount> = table
        .iter()
        .map(|(number, count)| NumberCount { number, count })
        .collect();
    // sort_by est stable : l'ordre croissant des numéros départage les égalités
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

pub fn hot_cold_numbers(draws: &[Draw], window: usize) -> HotCold {
    hot_cold_sized(draws, window, HOT_COLD_SIZE)
}

pub fn hot_cold_sized(draws: &[Draw], window: usize, size: usize) -> HotCold {
    let ranked = rank_by_count(&recent_frequency(draws, window));
    let size = size.min(ranked.len());
    HotCold {
        hot: ranked[..size].to_vec(),
        cold: ranked[ranked.len() - size..].to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{draw, sequential_draws};

    #[test]
    fn test_single_draw_frequency() {
        let draws = vec![draw(1, [1, 2, 3, 4, 5, 6], 7)];
        let freq = frequency_analysis(&draws);
        for n in 1..=6 {
            assert_eq!(freq.get(n), 1);
        }
        for n in 7..=45 {
            assert_eq!(freq.get(n), 0, "le numéro {n} ne devrait pas compter");
        }
        assert_eq!(freq.iter().count(), 45);
    }

    #[test]
    fn test_bonus_excluded() {
        let draws = vec![draw(1, [1, 2, 3, 4, 5, 6], 45)];
        assert_eq!(frequency_analysis(&draws).get(45), 0);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let draws = vec![draw(1, [0, 2, 3, 4, 5, 46], 7)];
        let freq = frequency_analysis(&draws);
        assert_eq!(freq.total(), 4);
        assert_eq!(freq.get(0), 0);
        assert_eq!(freq.get(46), 0);
    }

    #[test]
    fn test_empty_frequency_all_zero() {
        let freq = frequency_analysis(&[]);
        assert_eq!(freq.total(), 0);
        assert_eq!(freq.max(), 0);
        assert_eq!(freq.normalized(1), 0.0);
        assert_eq!(recent_frequency(&[], 50).total(), 0);
    }

    #[test]
    fn test_recent_window_uses_last_draws() {
        let draws = vec![
            draw(1, [1, 2, 3, 4, 5, 6], 7),
            draw(2, [11, 12, 13, 14, 15, 16], 7),
            draw(3, [21, 22, 23, 24, 25, 26], 7),
        ];
        let freq = recent_frequency(&draws, 2);
        assert_eq!(freq.get(1), 0);
        assert_eq!(freq.get(11), 1);
        assert_eq!(freq.get(21), 1);
        assert_eq!(freq.total(), 12);
    }

    #[test]
    fn test_recent_window_larger_than_history() {
        let draws = sequential_draws(10);
        assert_eq!(recent_frequency(&draws, 500), frequency_analysis(&draws));
        assert_eq!(recent_frequency(&draws, 0).total(), 0);
    }

    #[test]
    fn test_hot_cold_ordering_and_ties() {
        let draws = vec![
            draw(1, [1, 2, 3, 4, 5, 6], 7),
            draw(2, [1, 2, 3, 10, 11, 12], 7),
            draw(3, [1, 2, 20, 21, 22, 23], 7),
        ];
        let hc = hot_cold_numbers(&draws, 50);
        assert_eq!(hc.hot.len(), 9);
        assert_eq!(hc.cold.len(), 9);
        let hot: Vec<u8> = hc.hot.iter().map(|c| c.number).collect();
        // 1,2 (x3), 3 (x2), puis les numéros sortis une fois dans l'ordre croissant
        assert_eq!(hot, vec![1, 2, 3, 4, 5, 6, 10, 11, 12]);
        assert_eq!(hc.hot[0].count, 3);
        assert_eq!(hc.hot[2].count, 2);
        let cold: Vec<u8> = hc.cold.iter().map(|c| c.number).collect();
        assert_eq!(cold, vec![37, 38, 39, 40, 41, 42, 43, 44, 45]);
        assert!(hc.cold.iter().all(|c| c.count == 0));
    }

    #[test]
    fn test_hot_cold_overlap_on_empty_window() {
        let hc = hot_cold_numbers(&[], 50);
        let hot: Vec<u8> = hc.hot.iter().map(|c| c.number).collect();
        let cold: Vec<u8> = hc.cold.iter().map(|c| c.number).collect();
        assert_eq!(hot, (1..=9).collect::<Vec<u8>>());
        assert_eq!(cold, (37..=45).collect::<Vec<u8>>());
    }

    #[test]
    fn test_serialize_as_number_map() {
        let draws = vec![draw(1, [1, 2, 3, 4, 5, 6], 7)];
        let json = serde_json::to_value(frequency_analysis(&draws)).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 45);
        assert_eq!(map["1"], 1);
        assert_eq!(map["45"], 0);
    }
}
