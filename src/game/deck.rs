use crate::board::GridPoint;
use crate::card::{DealtCard, MoveCard, MoveCategory, MoveSignature, WarpTargetPool};
use crate::game::zones::{DiscardPile, DrawPile};
use crate::rng::{GameRng, RngState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck configuration cannot produce any card")]
    EmptyDeck,
}

/// Temporary weight applied to an identity for a number of draws after it is dealt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightReduction {
    pub reduced_weight: u32,
    pub duration: u32,
}

/// Which identities a deck may produce and how often
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckConfiguration {
    pub allowed: Vec<MoveCard>,
    pub default_weight: u32,
    pub weights: BTreeMap<MoveCard, u32>,
    pub reduction: Option<WeightReduction>,
}

impl DeckConfiguration {
    pub fn new(allowed: Vec<MoveCard>) -> Self {
        DeckConfiguration {
            allowed,
            default_weight: 1,
            weights: BTreeMap::new(),
            reduction: None,
        }
    }

    /// Allow every identity of `category` at `weight`
    pub fn with_category(mut self, category: MoveCategory, weight: u32) -> Self {
        for card in MoveCard::in_category(category) {
            if !self.allowed.contains(&card) {
                self.allowed.push(card);
            }
            self.weights.insert(card, weight);
        }
        self
    }

    pub fn with_reduction(mut self, reduction: WeightReduction) -> Self {
        self.reduction = Some(reduction);
        self
    }

    pub fn weight_of(&self, card: MoveCard) -> u32 {
        self.weights
            .get(&card)
            .copied()
            .unwrap_or(self.default_weight)
    }
}

/// Named deck setups a regulation can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckPreset {
    /// King 1.5 : knight 1.0 : long diagonal 0.5
    #[default]
    Standard,
    KingOnly,
    KingAndKnight,
    ClassicalKnight,
    DirectionalRays,
    ChoiceMix,
    WarpMix,
}

impl DeckPreset {
    pub fn configuration(&self) -> DeckConfiguration {
        let empty = DeckConfiguration::new(Vec::new());
        match self {
            DeckPreset::Standard => empty
                .with_category(MoveCategory::King, 3)
                .with_category(MoveCategory::Knight, 2)
                .with_category(MoveCategory::LongDiagonal, 1),
            DeckPreset::KingOnly => empty.with_category(MoveCategory::King, 1),
            DeckPreset::KingAndKnight => empty
                .with_category(MoveCategory::King, 3)
                .with_category(MoveCategory::Knight, 2),
            DeckPreset::ClassicalKnight => empty.with_category(MoveCategory::Knight, 1),
            DeckPreset::DirectionalRays => empty
                .with_category(MoveCategory::King, 3)
                .with_category(MoveCategory::Ray, 2)
                .with_reduction(WeightReduction {
                    reduced_weight: 1,
                    duration: 2,
                }),
            DeckPreset::ChoiceMix => empty
                .with_category(MoveCategory::King, 3)
                .with_category(MoveCategory::Knight, 2)
                .with_category(MoveCategory::Choice, 2)
                .with_reduction(WeightReduction {
                    reduced_weight: 1,
                    duration: 3,
                }),
            DeckPreset::WarpMix => empty
                .with_category(MoveCategory::King, 3)
                .with_category(MoveCategory::Knight, 2)
                .with_category(MoveCategory::Warp, 1)
                .with_reduction(WeightReduction {
                    reduced_weight: 0,
                    duration: 4,
                }),
        }
    }
}

/// Seeded weighted card source with a discard pile.
///
/// Draw order: preset sequence, then the draw pile, then the discard pile
/// (recycled oldest first), then a fresh weighted sample.
#[derive(Debug, Clone)]
pub struct Deck {
    configuration: DeckConfiguration,
    producible: Vec<MoveCard>,
    initial_state: RngState,
    rng: GameRng,
    preset_sequence: Vec<DealtCard>,
    preset_cursor: usize,
    draw_pile: DrawPile,
    discard_pile: DiscardPile,
    warp_pools: BTreeMap<MoveCard, WarpTargetPool>,
    reduced: BTreeMap<MoveCard, u32>,
}

impl Deck {
    /// Build a deck. `warp_targets` holds the sanitized destination pool of
    /// each fixed-warp identity; identities without a pool cannot be dealt.
    pub fn new(
        configuration: DeckConfiguration,
        warp_targets: BTreeMap<MoveCard, Vec<GridPoint>>,
        seed: Option<u64>,
    ) -> Result<Self, DeckError> {
        let warp_pools: BTreeMap<MoveCard, WarpTargetPool> = configuration
            .allowed
            .iter()
            .filter(|card| card.is_fixed_warp())
            .map(|card| {
                let targets = warp_targets.get(card).cloned().unwrap_or_default();
                (*card, WarpTargetPool::new(targets))
            })
            .collect();

        let mut producible = Vec::new();
        for card in &configuration.allowed {
            if producible.contains(card) || configuration.weight_of(*card) == 0 {
                continue;
            }
            if card.is_fixed_warp() && warp_pools.get(card).map_or(true, WarpTargetPool::is_empty) {
                debug!(%card, "fixed warp has no destinations, leaving it out of the deck");
                continue;
            }
            producible.push(*card);
        }
        if producible.is_empty() {
            return Err(DeckError::EmptyDeck);
        }

        let rng = GameRng::new(seed);
        Ok(Deck {
            configuration,
            producible,
            initial_state: rng.state(),
            rng,
            preset_sequence: Vec::new(),
            preset_cursor: 0,
            draw_pile: DrawPile::new(),
            discard_pile: DiscardPile::new(),
            warp_pools,
            reduced: BTreeMap::new(),
        })
    }

    /// Deal `cards` verbatim before any random draw
    pub fn with_preset_sequence(mut self, cards: Vec<DealtCard>) -> Self {
        self.preset_sequence = cards;
        self.preset_cursor = 0;
        self
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn rng_state(&self) -> RngState {
        self.rng.state()
    }

    pub fn configuration(&self) -> &DeckConfiguration {
        &self.configuration
    }

    pub fn draw_pile_size(&self) -> usize {
        self.draw_pile.size()
    }

    pub fn discard_pile(&self) -> &[DealtCard] {
        self.discard_pile.cards()
    }

    pub fn draw(&mut self) -> DealtCard {
        let card = match self.next_preset() {
            Some(card) => card,
            None => match self.next_recycled() {
                Some(card) => card,
                None => self.sample(),
            },
        };
        self.advance_reduction(card.card);
        card
    }

    pub fn discard(&mut self, card: DealtCard) {
        self.discard_pile.add_card(card);
    }

    /// Rewind to the state right after construction
    pub fn reset(&mut self) {
        self.rng = GameRng::from_state(self.initial_state);
        self.preset_cursor = 0;
        self.draw_pile.clear();
        self.discard_pile.clear();
        self.reduced.clear();
        for pool in self.warp_pools.values_mut() {
            pool.rewind();
        }
    }

    /// Start over with a different seed (fresh when None)
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.initial_state = GameRng::new(seed).state();
        self.reset();
    }

    /// Number of distinct stacking signatures this deck can ever deal
    pub fn distinct_signature_count(&self) -> usize {
        let mut signatures = BTreeSet::new();
        for card in &self.producible {
            match self.warp_pools.get(card) {
                Some(pool) if card.is_fixed_warp() => {
                    for target in pool.targets() {
                        signatures.insert(MoveSignature {
                            card: *card,
                            destination: Some(*target),
                        });
                    }
                }
                _ => {
                    signatures.insert(DealtCard::new(*card).signature());
                }
            }
        }
        for card in &self.preset_sequence {
            signatures.insert(card.signature());
        }
        signatures.len()
    }

    fn next_preset(&mut self) -> Option<DealtCard> {
        let card = self.preset_sequence.get(self.preset_cursor).copied()?;
        self.preset_cursor += 1;
        Some(card)
    }

    fn next_recycled(&mut self) -> Option<DealtCard> {
        if self.draw_pile.is_empty() && !self.discard_pile.is_empty() {
            debug!(
                cards = self.discard_pile.size(),
                "draw pile empty, recycling discard pile"
            );
            self.discard_pile.recycle_into(&mut self.draw_pile);
        }
        self.draw_pile.draw()
    }

    fn effective_weight(&self, card: MoveCard) -> u32 {
        match self.configuration.reduction {
            Some(reduction) if self.reduced.contains_key(&card) => reduction.reduced_weight,
            _ => self.configuration.weight_of(card),
        }
    }

    fn sample(&mut self) -> DealtCard {
        let weights: Vec<u32> = self
            .producible
            .iter()
            .map(|card| self.effective_weight(*card))
            .collect();
        let index = match self.rng.weighted_index(&weights) {
            Some(index) => index,
            None => {
                let base: Vec<u32> = self
                    .producible
                    .iter()
                    .map(|card| self.configuration.weight_of(*card))
                    .collect();
                self.rng.weighted_index(&base).unwrap_or(0)
            }
        };

        let card = self.producible[index];
        if card.is_fixed_warp() {
            DealtCard {
                card,
                destination: self
                    .warp_pools
                    .get_mut(&card)
                    .and_then(WarpTargetPool::next_target),
            }
        } else {
            DealtCard::new(card)
        }
    }

    fn advance_reduction(&mut self, dealt: MoveCard) {
        let Some(reduction) = self.configuration.reduction else {
            return;
        };
        self.reduced.retain(|_, remaining| {
            *remaining -= 1;
            *remaining > 0
        });
        if reduction.duration > 0 {
            self.reduced.insert(dealt, reduction.duration);
        }
    }
}
