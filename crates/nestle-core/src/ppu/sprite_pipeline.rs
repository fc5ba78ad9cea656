use super::sprite::SpriteAttributes;

/// Pattern data fetched for one secondary OAM slot during dots 257-320.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct FetchedSprite {
    pub(crate) attributes: SpriteAttributes,
    pub(crate) x: u8,
    pub(crate) pattern_low: u8,
    pub(crate) pattern_high: u8,
}

/// One of the eight sprite output units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct SpriteSlot {
    pattern_low: u8,
    pattern_high: u8,
    attributes: SpriteAttributes,
    /// Counts down once per dot; the slot outputs once it reaches zero.
    x_counter: u8,
    sprite_zero: bool,
}

/// Sprite pixel produced for a single dot. Color 0 is transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SpritePixel {
    pub(crate) palette: u8,
    pub(crate) color: u8,
    pub(crate) behind_background: bool,
    pub(crate) sprite_zero: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SpritePipeline {
    slots: [SpriteSlot; 8],
    active: u8,
}

impl SpritePipeline {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Loads the units for the next line. Horizontally flipped patterns are
    /// reversed up front so output always shifts out of bit 7.
    pub(crate) fn load(&mut self, fetched: &[FetchedSprite], sprite_zero_in_slot_0: bool) {
        self.clear();
        for (index, (slot, sprite)) in self.slots.iter_mut().zip(fetched).enumerate() {
            let flip = sprite.attributes.contains(SpriteAttributes::FLIP_HORIZONTAL);
            let (low, high) = if flip {
                (sprite.pattern_low.reverse_bits(), sprite.pattern_high.reverse_bits())
            } else {
                (sprite.pattern_low, sprite.pattern_high)
            };
            *slot = SpriteSlot {
                pattern_low: low,
                pattern_high: high,
                attributes: sprite.attributes,
                x_counter: sprite.x,
                sprite_zero: sprite_zero_in_slot_0 && index == 0,
            };
            self.active += 1;
        }
    }

    /// Samples the frontmost opaque sprite and advances every unit by a dot.
    pub(crate) fn sample_and_shift(&mut self) -> SpritePixel {
        let mut chosen: Option<SpritePixel> = None;
        for slot in self.slots.iter_mut().take(usize::from(self.active)) {
            if slot.x_counter > 0 {
                slot.x_counter -= 1;
                continue;
            }

            let color = ((slot.pattern_high >> 7) << 1) | (slot.pattern_low >> 7);
            if chosen.is_none() && color != 0 {
                chosen = Some(SpritePixel {
                    palette: slot.attributes.palette(),
                    color,
                    behind_background: slot.attributes.contains(SpriteAttributes::BEHIND_BACKGROUND),
                    sprite_zero: slot.sprite_zero,
                });
            }
            slot.pattern_low <<= 1;
            slot.pattern_high <<= 1;
        }
        chosen.unwrap_or_default()
    }
}
