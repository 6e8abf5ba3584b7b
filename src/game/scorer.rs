use crate::utils::letters::Tier;

const BASE_WORD_SCORE: u32 = 15;
const POINTS_PER_EXTRA_LETTER: u32 = 8;
const BASE_WORD_LENGTH: usize = 3;
const RARE_LETTER_BONUS: u32 = 5;
const UNCOMMON_LETTER_BONUS: u32 = 2;

pub struct Scorer;

impl Scorer {
    /// Points for a word, case-insensitive.
    ///
    /// Scoring rules:
    /// - 15 for a three-letter word, +8 for every letter beyond three
    /// - +5 for every rare letter (J K Q X Z)
    /// - +2 for every uncommon letter (B C F G M P V W Y)
    ///
    /// The session applies its own multiplier on top of this.
    pub fn score(word: &str) -> u32 {
        Self::length_score(word.chars().count()) + Self::letter_bonus(word)
    }

    fn length_score(length: usize) -> u32 {
        let extra = length.saturating_sub(BASE_WORD_LENGTH) as u32;
        BASE_WORD_SCORE + POINTS_PER_EXTRA_LETTER * extra
    }

    fn letter_bonus(word: &str) -> u32 {
        word.chars()
            .map(|ch| match Tier::of(ch) {
                Some(Tier::Rare) => RARE_LETTER_BONUS,
                Some(Tier::Uncommon) => UNCOMMON_LETTER_BONUS,
                _ => 0,
            })
            .sum()
    }
}
