use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::frequency::{HOT_COLD_SIZE, RECENT_WINDOW};

/// Pondérations du générateur de grilles.
///
/// `range_weight` multiplie une constante 1.0 : il décale tous les numéros du
/// même montant et ne dépend pas (encore) de la tranche du numéro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub total_weight: f64,
    pub recent_weight: f64,
    pub range_weight: f64,
    pub noise_weight: f64,
    /// Bruit ajouté à chaque numéro, à chaque grille, tiré dans [0, jitter).
    pub jitter: f64,
    pub recent_window: usize,
    pub hot_cold_size: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            total_weight: 0.3,
            recent_weight: 0.4,
            range_weight: 0.2,
            noise_weight: 0.1,
            jitter: 0.15,
            recent_window: RECENT_WINDOW,
            hot_cold_size: HOT_COLD_SIZE,
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("total_weight", self.total_weight),
            ("recent_weight", self.recent_weight),
            ("range_weight", self.range_weight),
            ("noise_weight", self.noise_weight),
            ("jitter", self.jitter),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                bail!("Paramètre {name} invalide : {value} (attendu >= 0)");
            }
        }
        if self.hot_cold_size == 0 || self.hot_cold_size > lotto_db::models::POOL_SIZE {
            bail!("hot_cold_size doit être compris entre 1 et 45 (reçu {})", self.hot_cold_size);
        }
        Ok(())
    }
}

pub fn save_config(config: &PredictorConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<PredictorConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: PredictorConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration invalide dans {:?}", path))?;
    config.validate()?;
    Ok(config)
}
