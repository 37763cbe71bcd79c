use std::collections::BTreeMap;

use ethnum::U256;

use super::{
    bit_math::{least_significant_bit, most_significant_bit},
    constants::{MAX_TICK, MIN_TICK},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickBitmapError {
    TickMisaligned(i32, i32),
    TickOutOfBounds(i32),
    InvalidTickSpacing(i32),
}

/// Rounds towards negative infinity by tick_spacing.
pub fn compress(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing)
}

/// Computes the position in the bitmap where the initialized bit for a compressed tick lives.
///
/// # Returns
/// * `word_pos` - The key of the word containing the bit.
/// * `bit_pos` - The bit position in the word where the flag is stored.
pub fn position(compressed: i32) -> Result<(i16, u8), TickBitmapError> {
    let word_pos =
        i16::try_from(compressed >> 8).map_err(|_| TickBitmapError::TickOutOfBounds(compressed))?;
    let bit_pos = (compressed & 0xff) as u8;
    Ok((word_pos, bit_pos))
}

/// Sparse bitmap of initialized ticks, one bit per spacing-aligned tick, 256 bits per word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickBitmap {
    words: BTreeMap<i16, U256>,
}

impl TickBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word(&self, word_pos: i16) -> U256 {
        self.words.get(&word_pos).copied().unwrap_or(U256::ZERO)
    }

    /// Bit location of a tick that is about to be flipped.
    /// Fails if the tick is outside the tick range or not a multiple of the spacing.
    pub fn flip_position(tick: i32, tick_spacing: i32) -> Result<(i16, u8), TickBitmapError> {
        if tick_spacing <= 0 {
            return Err(TickBitmapError::InvalidTickSpacing(tick_spacing));
        }
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(TickBitmapError::TickOutOfBounds(tick));
        }
        if tick % tick_spacing != 0 {
            return Err(TickBitmapError::TickMisaligned(tick, tick_spacing));
        }
        position(tick / tick_spacing)
    }

    /// Toggles a bit previously located with [`TickBitmap::flip_position`].
    pub fn toggle(&mut self, (word_pos, bit_pos): (i16, u8)) {
        let word = self.word(word_pos) ^ (U256::ONE << bit_pos);
        if word == U256::ZERO {
            self.words.remove(&word_pos);
        } else {
            self.words.insert(word_pos, word);
        }
    }

    /// Flips the initialized state for a given tick from false to true, or vice versa.
    pub fn flip_tick(&mut self, tick: i32, tick_spacing: i32) -> Result<(), TickBitmapError> {
        let position = Self::flip_position(tick, tick_spacing)?;
        self.toggle(position);
        Ok(())
    }

    pub fn is_initialized(&self, tick: i32, tick_spacing: i32) -> bool {
        match Self::flip_position(tick, tick_spacing) {
            Ok((word_pos, bit_pos)) => self.word(word_pos) & (U256::ONE << bit_pos) != U256::ZERO,
            Err(_) => false,
        }
    }

    /// Returns the next initialized tick contained in the same word (or adjacent word) as the tick
    /// that is either to the left (less than or equal to) or right (greater than) of the given tick.
    ///
    /// # Arguments
    /// * `tick` - The starting tick.
    /// * `tick_spacing` - The spacing between usable ticks.
    /// * `lte` - Whether to search to the left (true) or right (false).
    ///
    /// # Returns
    /// * `next` - The next initialized or uninitialized tick up to 256 compressed ticks away.
    /// * `initialized` - Whether the next tick is initialized.
    pub fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        tick_spacing: i32,
        lte: bool,
    ) -> Result<(i32, bool), TickBitmapError> {
        if tick_spacing <= 0 {
            return Err(TickBitmapError::InvalidTickSpacing(tick_spacing));
        }
        let compressed = compress(tick, tick_spacing);

        if lte {
            let (word_pos, bit_pos) = position(compressed)?;
            // all the 1s at or to the right of the current bit_pos
            let mask = U256::MAX >> (255 - bit_pos as u32);
            let masked = self.word(word_pos) & mask;

            let next = match most_significant_bit(&masked) {
                Some(msb) => (compressed - (bit_pos as i32 - msb as i32)) * tick_spacing,
                None => (compressed - bit_pos as i32) * tick_spacing,
            };
            Ok((next, masked != U256::ZERO))
        } else {
            // start from the word of the next tick, the current one is already behind us
            let compressed = compressed + 1;
            let (word_pos, bit_pos) = position(compressed)?;
            // all the 1s at or to the left of bit_pos
            let mask = !((U256::ONE << bit_pos) - U256::ONE);
            let masked = self.word(word_pos) & mask;

            let next = match least_significant_bit(&masked) {
                Some(lsb) => (compressed + (lsb as i32 - bit_pos as i32)) * tick_spacing,
                None => (compressed + (255 - bit_pos as i32)) * tick_spacing,
            };
            Ok((next, masked != U256::ZERO))
        }
    }

    /// Lazily walks the initialized ticks from `start` in one direction, crossing words as needed.
    ///
    /// Searching down includes `start` itself, searching up starts strictly above it; this is the
    /// order in which a swap starting at `start` would reach them.
    pub fn initialized_ticks(
        &self,
        start: i32,
        tick_spacing: i32,
        searching_down: bool,
    ) -> InitializedTicks<'_> {
        InitializedTicks {
            bitmap: self,
            tick_spacing,
            searching_down,
            cursor: Some(start),
        }
    }
}

pub struct InitializedTicks<'a> {
    bitmap: &'a TickBitmap,
    tick_spacing: i32,
    searching_down: bool,
    cursor: Option<i32>,
}

impl Iterator for InitializedTicks<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        loop {
            let cursor = self.cursor?;
            let (next, initialized) = self
                .bitmap
                .next_initialized_tick_within_one_word(cursor, self.tick_spacing, self.searching_down)
                .ok()?;

            if self.searching_down {
                if next < MIN_TICK {
                    self.cursor = None;
                    return None;
                }
                self.cursor = (next > MIN_TICK).then(|| next - 1);
            } else {
                if next > MAX_TICK {
                    self.cursor = None;
                    return None;
                }
                self.cursor = (next < MAX_TICK).then_some(next);
            }

            if initialized {
                return Some(next);
            }
        }
    }
}
