use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Letters drawn most often and worth no bonus
pub const COMMON_LETTERS: [char; 12] = [
    'A', 'E', 'I', 'O', 'U', 'N', 'R', 'S', 'T', 'L', 'D', 'H',
];
pub const UNCOMMON_LETTERS: [char; 9] = ['B', 'C', 'F', 'G', 'M', 'P', 'V', 'W', 'Y'];
pub const RARE_LETTERS: [char; 5] = ['J', 'K', 'Q', 'X', 'Z'];

/// Levels up to this one use the base weights
pub const DRIFT_START_LEVEL: u32 = 7;

const BASE_COMMON: f64 = 0.80;
const BASE_UNCOMMON: f64 = 0.15;
const BASE_RARE: f64 = 0.05;

const COMMON_STEP: f64 = -0.01;
const UNCOMMON_STEP: f64 = 0.008;
const RARE_STEP: f64 = 0.002;

pub const COMMON_FLOOR: f64 = 0.70;
pub const UNCOMMON_CAP: f64 = 0.25;
pub const RARE_CAP: f64 = 0.10;

/// Frequency class of a letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Common,
    Uncommon,
    Rare,
}

static LETTER_TIERS: Lazy<HashMap<char, Tier>> = Lazy::new(|| {
    let mut map = HashMap::new();

    for ch in COMMON_LETTERS {
        map.insert(ch, Tier::Common);
    }
    for ch in UNCOMMON_LETTERS {
        map.insert(ch, Tier::Uncommon);
    }
    for ch in RARE_LETTERS {
        map.insert(ch, Tier::Rare);
    }

    map
});

impl Tier {
    pub fn letters(self) -> &'static [char] {
        match self {
            Tier::Common => &COMMON_LETTERS,
            Tier::Uncommon => &UNCOMMON_LETTERS,
            Tier::Rare => &RARE_LETTERS,
        }
    }

    /// Tier of a letter, case-insensitive. `None` for non-letters.
    pub fn of(letter: char) -> Option<Tier> {
        LETTER_TIERS.get(&letter.to_ascii_uppercase()).copied()
    }

    /// Pick the tier for a uniform roll in `[0, 1)` by comparing it against
    /// the cumulative weights. Rare is the fallthrough.
    pub fn from_roll(weights: TierWeights, roll: f64) -> Tier {
        if roll < weights.common {
            Tier::Common
        } else if roll < weights.common + weights.uncommon {
            Tier::Uncommon
        } else {
            Tier::Rare
        }
    }
}

/// Selection probabilities of the three tiers at a given level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierWeights {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
}

impl TierWeights {
    pub const BASE: TierWeights = TierWeights {
        common: BASE_COMMON,
        uncommon: BASE_UNCOMMON,
        rare: BASE_RARE,
    };

    /// Weights for `level`. Past level 7 common drifts down to its floor while
    /// uncommon and rare drift up to their caps.
    ///
    /// Rare is whatever the cumulative comparison leaves over, so once common
    /// hits its floor the effective rare weight is `1 - common - uncommon`
    /// rather than its nominal drifted value.
    pub fn for_level(level: u32) -> Self {
        if level <= DRIFT_START_LEVEL {
            return Self::BASE;
        }

        let steps = (level - DRIFT_START_LEVEL) as f64;
        let common = (BASE_COMMON + steps * COMMON_STEP).max(COMMON_FLOOR);
        let uncommon = (BASE_UNCOMMON + steps * UNCOMMON_STEP).min(UNCOMMON_CAP);
        let nominal_rare = (BASE_RARE + steps * RARE_STEP).min(RARE_CAP);
        let rare = nominal_rare.min(1.0 - common - uncommon).max(0.0);

        Self {
            common,
            uncommon,
            rare,
        }
    }

    #[cfg(test)]
    pub fn total(&self) -> f64 {
        self.common + self.uncommon + self.rare
    }
}
