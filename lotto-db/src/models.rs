use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nombre de boules dans l'urne (1-45).
pub const POOL_SIZE: usize = 45;

/// Nombre de numéros principaux par tirage (hors bonus).
pub const PICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub draw_no: u32,
    pub date: NaiveDate,
    pub numbers: [u8; 6],
    pub bonus: u8,
    pub prize_1st: u64,
    pub winners_1st: u32,
}

impl Draw {
    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }

    pub fn odd_count(&self) -> usize {
        self.numbers.iter().filter(|&&n| n % 2 == 1).count()
    }

    pub fn sorted_numbers(&self) -> [u8; 6] {
        let mut sorted = self.numbers;
        sorted.sort();
        sorted
    }
}

/// Les 5 tranches fixes qui partitionnent 1..=45.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RangeBucket {
    #[serde(rename = "1-10")]
    Low,
    #[serde(rename = "11-20")]
    Teens,
    #[serde(rename = "21-30")]
    Twenties,
    #[serde(rename = "31-40")]
    Thirties,
    #[serde(rename = "41-45")]
    Top,
}

impl RangeBucket {
    pub const ALL: [RangeBucket; 5] = [
        RangeBucket::Low,
        RangeBucket::Teens,
        RangeBucket::Twenties,
        RangeBucket::Thirties,
        RangeBucket::Top,
    ];

    /// Tranche d'un numéro, `None` hors de 1-45.
    pub fn of(n: u8) -> Option<RangeBucket> {
        match n {
            1..=10 => Some(RangeBucket::Low),
            11..=20 => Some(RangeBucket::Teens),
            21..=30 => Some(RangeBucket::Twenties),
            31..=40 => Some(RangeBucket::Thirties),
            41..=45 => Some(RangeBucket::Top),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            RangeBucket::Low => 0,
            RangeBucket::Teens => 1,
            RangeBucket::Twenties => 2,
            RangeBucket::Thirties => 3,
            RangeBucket::Top => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangeBucket::Low => "1-10",
            RangeBucket::Teens => "11-20",
            RangeBucket::Twenties => "21-30",
            RangeBucket::Thirties => "31-40",
            RangeBucket::Top => "41-45",
        }
    }

    /// Nombre maximal de numéros d'une même tranche dans une grille suggérée.
    pub fn cap(&self) -> usize {
        match self {
            RangeBucket::Top => 2,
            _ => 3,
        }
    }
}

impl std::fmt::Display for RangeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Date du tout premier tirage (tirage n°1).
pub fn first_draw_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2002, 12, 7).unwrap_or_default()
}

/// Numéro du dernier tirage attendu à la date donnée, à raison d'un tirage par semaine.
pub fn estimated_latest_draw_no(today: NaiveDate) -> u32 {
    let days = (today - first_draw_date()).num_days().max(0);
    (days / 7) as u32 + 1
}

pub fn validate_draw(numbers: &[u8; 6], bonus: u8) -> Result<()> {
    for &n in numbers {
        if n < 1 || n as usize > POOL_SIZE {
            bail!("Numéro {} hors limites (1-45)", n);
        }
    }
    if bonus < 1 || bonus as usize > POOL_SIZE {
        bail!("Bonus {} hors limites (1-45)", bonus);
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    if numbers.contains(&bonus) {
        bail!("Le bonus {} figure déjà parmi les numéros", bonus);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 7).is_ok());
        assert!(validate_draw(&[45, 44, 43, 42, 41, 40], 1).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6], 7).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 46], 7).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 46).is_err());
    }

    #[test]
    fn test_validate_draw_duplicates() {
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6], 7).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 6).is_err());
    }

    #[test]
    fn test_bucket_partition() {
        let mut sizes = [0usize; 5];
        for n in 1..=45u8 {
            let bucket = RangeBucket::of(n).unwrap();
            sizes[bucket.index()] += 1;
        }
        assert_eq!(sizes, [10, 10, 10, 10, 5]);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(RangeBucket::of(1), Some(RangeBucket::Low));
        assert_eq!(RangeBucket::of(10), Some(RangeBucket::Low));
        assert_eq!(RangeBucket::of(11), Some(RangeBucket::Teens));
        assert_eq!(RangeBucket::of(30), Some(RangeBucket::Twenties));
        assert_eq!(RangeBucket::of(40), Some(RangeBucket::Thirties));
        assert_eq!(RangeBucket::of(45), Some(RangeBucket::Top));
        assert_eq!(RangeBucket::of(0), None);
        assert_eq!(RangeBucket::of(46), None);
        assert_eq!(RangeBucket::Top.cap(), 2);
        assert_eq!(RangeBucket::Thirties.cap(), 3);
    }

    #[test]
    fn test_estimated_latest_draw_no() {
        assert_eq!(estimated_latest_draw_no(date(2002, 12, 7)), 1);
        assert_eq!(estimated_latest_draw_no(date(2002, 12, 13)), 1);
        assert_eq!(estimated_latest_draw_no(date(2002, 12, 14)), 2);
        assert_eq!(estimated_latest_draw_no(date(2000, 1, 1)), 1);
    }

    #[test]
    fn test_draw_helpers() {
        let draw = Draw {
            draw_no: 1,
            date: date(2002, 12, 7),
            numbers: [10, 23, 29, 33, 37, 40],
            bonus: 16,
            prize_1st: 0,
            winners_1st: 0,
        };
        assert_eq!(draw.sum(), 172);
        assert_eq!(draw.odd_count(), 4);
        assert_eq!(draw.sorted_numbers(), [10, 23, 29, 33, 37, 40]);
    }

    #[test]
    fn test_draw_serde_date_format() {
        let draw = Draw {
            draw_no: 1,
            date: date(2002, 12, 7),
            numbers: [1, 2, 3, 4, 5, 6],
            bonus: 7,
            prize_1st: 0,
            winners_1st: 0,
        };
        let json = serde_json::to_value(&draw).unwrap();
        assert_eq!(json["date"], "2002-12-07");
        assert_eq!(json["numbers"][5], 6);
    }
}
