use rand::Rng;
use serde::Serialize;

use lotto_db::models::{Draw, RangeBucket, PICK_COUNT, POOL_SIZE};

use crate::config::PredictorConfig;
use crate::frequency::{frequency_analysis, recent_frequency};

/// Grille suggérée : 6 numéros distincts, triés.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionSet([u8; PICK_COUNT]);

impl PredictionSet {
    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.0
    }

    pub fn bucket_counts(&self) -> [usize; 5] {
        let mut counts = [0usize; 5];
        for bucket in self.0.iter().filter_map(|&n| RangeBucket::of(n)) {
            counts[bucket.index()] += 1;
        }
        counts
    }
}

impl std::fmt::Display for PredictionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:2}", n)).collect();
        write!(f, "{}", parts.join(" - "))
    }
}

/// Poids de base de chaque numéro (indice 0 = numéro 1).
///
/// Fréquence totale et récente, normalisées par leur maximum, plus le terme
/// constant de tranche et un bruit uniforme tiré une fois par numéro.
pub fn base_weights<R: Rng + ?Sized>(draws: &[Draw], config: &PredictorConfig, rng: &mut R) -> Vec<f64> {
    let total = frequency_analysis(draws);
    let recent = recent_frequency(draws, config.recent_window);

    (1..=POOL_SIZE as u8)
        .map(|n| {
            let w_total = total.normalized(n);
            let w_recent = recent.normalized(n);
            let w_range = 1.0;
            let w_random: f64 = rng.random();
            w_total * config.total_weight
                + w_recent * config.recent_weight
                + w_range * config.range_weight
                + w_random * config.noise_weight
        })
        .collect()
}

/// Sélection gloutonne par poids décroissant, plafonnée par tranche.
///
/// `weights[i]` est le poids du numéro `i + 1`. À poids égal, le plus petit numéro passe d'abord.
pub fn select_balanced(weights: &[f64]) -> PredictionSet {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| weights[b].partial_cmp(&weights[a]).unwrap_or(std::cmp::Ordering::Equal));

    let mut per_bucket = [0usize; 5];
    let mut selected = Vec::with_capacity(PICK_COUNT);

    for idx in order {
        if selected.len() >= PICK_COUNT {
            break;
        }
        let number = (idx + 1) as u8;
        let Some(bucket) = RangeBucket::of(number) else {
            continue;
        };
        if per_bucket[bucket.index()] < bucket.cap() {
            per_bucket[bucket.index()] += 1;
            selected.push(number);
        }
    }

    // Les plafonds cumulés (14) dépassent toujours 6 sur un pool complet.
    let mut numbers = [0u8; PICK_COUNT];
    for (slot, &n) in numbers.iter_mut().zip(selected.iter()) {
        *slot = n;
    }
    numbers.sort();
    PredictionSet(numbers)
}

pub fn predict_numbers<R: Rng + ?Sized>(draws: &[Draw], num_sets: usize, rng: &mut R) -> Vec<PredictionSet> {
    predict_numbers_with(draws, num_sets, &PredictorConfig::default(), rng)
}

pub fn predict_numbers_with<R: Rng + ?Sized>(
    draws: &[Draw],
    num_sets: usize,
    config: &PredictorConfig,
    rng: &mut R,
) -> Vec<PredictionSet> {
    tracing::debug!(draws = draws.len(), num_sets, "génération des grilles");

    let weights = base_weights(draws, config, rng);

    (0..num_sets)
        .map(|_| {
            let adjusted: Vec<f64> = weights
                .iter()
                .map(|&w| w + rng.random::<f64>() * config.jitter)
                .collect();
            select_balanced(&adjusted)
        })
        .collect()
}
