use serde::ser::{Serialize, Serializer};

use lotto_db::models::{Draw, RangeBucket, PICK_COUNT};

use crate::round_to;

/// Part (en %) des numéros tirés tombant dans chaque tranche.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeDistribution {
    percentages: [f64; 5],
}

impl RangeDistribution {
    pub fn get(&self, bucket: RangeBucket) -> f64 {
        self.percentages[bucket.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (RangeBucket, f64)> + '_ {
        RangeBucket::ALL.into_iter().map(|b| (b, self.get(b)))
    }

    pub fn sum(&self) -> f64 {
        self.percentages.iter().sum()
    }
}

impl Serialize for RangeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(b, p)| (b.label(), p)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ComboCount {
    pub combo: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OddEvenStats {
    pub avg_odd: f64,
    pub avg_even: f64,
    pub combos: Vec<ComboCount>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConsecutiveStats {
    pub consecutive_draws: u32,
    pub total_draws: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SumStats {
    pub avg: f64,
    pub min: u32,
    pub max: u32,
    pub std: f64,
}

/// Sans tirage, toutes les tranches valent 0.
pub fn range_analysis(draws: &[Draw]) -> RangeDistribution {
    let mut counts = [0u32; 5];
    for draw in draws {
        // Numéros hors 1-45 ignorés, comme dans les tables de fréquence
        for bucket in draw.numbers.iter().filter_map(|&n| RangeBucket::of(n)) {
            counts[bucket.index()] += 1;
        }
    }

    let total: u32 = counts.iter().sum();
    let mut percentages = [0.0f64; 5];
    if total > 0 {
        for (pct, &count) in percentages.iter_mut().zip(counts.iter()) {
            *pct = round_to(count as f64 / total as f64 * 100.0, 1);
        }
    }

    RangeDistribution { percentages }
}

pub fn odd_even_analysis(draws: &[Draw]) -> OddEvenStats {
    // Combinaisons dans l'ordre de première apparition
    let mut combos: Vec<ComboCount> = Vec::new();
    let mut odd_total = 0usize;

    for draw in draws {
        let odd = draw.odd_count();
        let even = PICK_COUNT - odd;
        odd_total += odd;

        let key = format!("{odd}:{even}");
        match combos.iter_mut().find(|c| c.combo == key) {
            Some(entry) => entry.count += 1,
            None => combos.push(ComboCount { combo: key, count: 1 }),
        }
    }

    combos.sort_by(|a, b| b.count.cmp(&a.count));

    let (avg_odd, avg_even) = if draws.is_empty() {
        (0.0, 0.0)
    } else {
        let n = draws.len() as f64;
        let avg_odd = odd_total as f64 / n;
        (round_to(avg_odd, 2), round_to(PICK_COUNT as f64 - avg_odd, 2))
    };

    OddEvenStats {
        avg_odd,
        avg_even,
        combos,
    }
}

/// Vrai si le tirage contient au moins deux numéros qui se suivent.
pub fn has_consecutive(draw: &Draw) -> bool {
    draw.sorted_numbers()
        .windows(2)
        .any(|w| w[1] as i16 - w[0] as i16 == 1)
}

pub fn consecutive_analysis(draws: &[Draw]) -> ConsecutiveStats {
    let consecutive_draws = draws.iter().filter(|d| has_consecutive(d)).count() as u32;
    let total_draws = draws.len() as u32;
    let percentage = if total_draws > 0 {
        round_to(consecutive_draws as f64 / total_draws as f64 * 100.0, 1)
    } else {
        0.0
    };

    ConsecutiveStats {
        consecutive_draws,
        total_draws,
        percentage,
    }
}

/// Statistiques de la somme des 6 numéros ; écart-type de population. Zéros sans tirage.
pub fn sum_analysis(draws: &[Draw]) -> SumStats {
    if draws.is_empty() {
        return SumStats {
            avg: 0.0,
            min: 0,
            max: 0,
            std: 0.0,
        };
    }

    let sums: Vec<u32> = draws.iter().map(Draw::sum).collect();
    let n = sums.len() as f64;
    let mean = sums.iter().map(|&s| s as f64).sum::<f64>() / n;
    let variance = sums.iter().map(|&s| (s as f64 - mean).powi(2)).sum::<f64>() / n;

    SumStats {
        avg: round_to(mean, 1),
        min: sums.iter().copied().min().unwrap_or(0),
        max: sums.iter().copied().max().unwrap_or(0),
        std: round_to(variance.sqrt(), 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{draw, sequential_draws};

    #[test]
    fn test_single_draw_scenario() {
        let draws = vec![draw(1, [1, 2, 3, 4, 5, 6], 7)];

        let sum = sum_analysis(&draws);
        assert_eq!(sum, SumStats { avg: 21.0, min: 21, max: 21, std: 0.0 });

        let oe = odd_even_analysis(&draws);
        assert_eq!(oe.avg_odd, 3.0);
        assert_eq!(oe.avg_even, 3.0);
        assert_eq!(oe.combos, vec![ComboCount { combo: "3:3".into(), count: 1 }]);
    }

    #[test]
    fn test_sum_two_draws() {
        // sommes 100 et 120
        let draws = vec![
            draw(1, [5, 10, 15, 20, 22, 28], 1),
            draw(2, [5, 10, 15, 20, 30, 40], 1),
        ];
        let sum = sum_analysis(&draws);
        assert_eq!(sum.avg, 110.0);
        assert_eq!(sum.min, 100);
        assert_eq!(sum.max, 120);
        assert_eq!(sum.std, 10.0);
    }

    #[test]
    fn test_empty_input_is_zero_filled() {
        let sum = sum_analysis(&[]);
        assert_eq!(sum, SumStats { avg: 0.0, min: 0, max: 0, std: 0.0 });

        let ranges = range_analysis(&[]);
        assert!(ranges.iter().all(|(_, p)| p == 0.0));

        let oe = odd_even_analysis(&[]);
        assert_eq!(oe.avg_odd, 0.0);
        assert!(oe.combos.is_empty());

        let cons = consecutive_analysis(&[]);
        assert_eq!(cons, ConsecutiveStats { consecutive_draws: 0, total_draws: 0, percentage: 0.0 });
    }

    #[test]
    fn test_consecutive_counted_once_per_draw() {
        let draws = vec![
            draw(1, [5, 6, 20, 21, 40, 45], 1),
            draw(2, [1, 3, 5, 7, 9, 11], 2),
        ];
        let cons = consecutive_analysis(&draws);
        assert_eq!(cons.consecutive_draws, 1);
        assert_eq!(cons.total_draws, 2);
        assert_eq!(cons.percentage, 50.0);
    }

    #[test]
    fn test_consecutive_detected_on_unsorted_numbers() {
        assert!(has_consecutive(&draw(1, [45, 3, 44, 10, 20, 30], 1)));
        assert!(!has_consecutive(&draw(1, [45, 3, 43, 10, 20, 30], 1)));
    }

    #[test]
    fn test_range_percentages() {
        let draws = vec![draw(1, [1, 2, 11, 21, 31, 41], 7)];
        let ranges = range_analysis(&draws);
        assert_eq!(ranges.get(RangeBucket::Low), 33.3);
        assert_eq!(ranges.get(RangeBucket::Teens), 16.7);
        assert_eq!(ranges.get(RangeBucket::Top), 16.7);
        assert!((ranges.sum() - 100.0).abs() <= 0.5);
    }

    #[test]
    fn test_range_skips_out_of_pool_numbers() {
        let draws = vec![draw(1, [0, 2, 3, 4, 5, 46], 7)];
        let ranges = range_analysis(&draws);
        assert_eq!(ranges.get(RangeBucket::Low), 100.0);
        assert_eq!(ranges.get(RangeBucket::Top), 0.0);

        let draws = vec![draw(1, [0, 46, 47, 50, 60, 99], 7)];
        assert_eq!(range_analysis(&draws).sum(), 0.0);
    }

    #[test]
    fn test_odd_even_combos_sorted_by_count_then_first_seen() {
        let draws = vec![
            draw(1, [2, 4, 6, 8, 10, 12], 1),  // 0:6
            draw(2, [1, 3, 5, 8, 10, 12], 7),  // 3:3
            draw(3, [1, 3, 5, 8, 10, 12], 7),  // 3:3
            draw(4, [1, 3, 5, 7, 10, 12], 2),  // 4:2
        ];
        let oe = odd_even_analysis(&draws);
        let combos: Vec<(&str, u32)> = oe.combos.iter().map(|c| (c.combo.as_str(), c.count)).collect();
        assert_eq!(combos, vec![("3:3", 2), ("0:6", 1), ("4:2", 1)]);
        assert_eq!(oe.avg_odd, 2.5);
        assert_eq!(oe.avg_even, 3.5);
    }

    #[test]
    fn test_odd_even_rounding() {
        // 3 tirages : 1, 1 et 2 impairs -> 1.333...
        let draws = vec![
            draw(1, [1, 2, 4, 6, 8, 10], 3),
            draw(2, [1, 2, 4, 6, 8, 10], 3),
            draw(3, [1, 3, 4, 6, 8, 10], 5),
        ];
        let oe = odd_even_analysis(&draws);
        assert_eq!(oe.avg_odd, 1.33);
        assert_eq!(oe.avg_even, 4.67);
    }

    #[test]
    fn test_range_serialize_labels() {
        let json = serde_json::to_value(range_analysis(&sequential_draws(5))).unwrap();
        let map = json.as_object().unwrap();
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 5);
        assert!(map.contains_key("1-10"));
        assert!(map.contains_key("41-45"));
    }
}
