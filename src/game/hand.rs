use crate::card::{DealtCard, MoveSignature};
use crate::game::deck::Deck;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

/// Upper bound on draws spent filling the hand in one refill
const MAX_REFILL_DRAWS: usize = 512;

/// Stable identifier of a hand stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StackId(pub u64);

/// Cards sharing one move signature, collapsed into one hand slot.
/// Never empty; the top card is the most recently added one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandStack {
    id: StackId,
    cards: Vec<DealtCard>,
}

impl HandStack {
    fn new(id: StackId, card: DealtCard) -> Self {
        HandStack {
            id,
            cards: vec![card],
        }
    }

    pub fn id(&self) -> StackId {
        self.id
    }

    pub fn top_card(&self) -> &DealtCard {
        &self.cards[self.cards.len() - 1]
    }

    pub fn signature(&self) -> MoveSignature {
        self.top_card().signature()
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[DealtCard] {
        &self.cards
    }
}

/// Ordered hand stacks plus a queue of upcoming cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandManager {
    hand_size: usize,
    preview_count: usize,
    stacking: bool,
    stacks: Vec<HandStack>,
    next_cards: VecDeque<DealtCard>,
    next_stack_id: u64,
}

impl HandManager {
    pub fn new(hand_size: usize, preview_count: usize, stacking: bool) -> Self {
        HandManager {
            hand_size,
            preview_count,
            stacking,
            stacks: Vec::with_capacity(hand_size),
            next_cards: VecDeque::with_capacity(preview_count),
            next_stack_id: 0,
        }
    }

    pub fn hand_size(&self) -> usize {
        self.hand_size
    }

    pub fn stacks(&self) -> &[HandStack] {
        &self.stacks
    }

    pub fn stack(&self, id: StackId) -> Option<&HandStack> {
        self.stacks.iter().find(|stack| stack.id == id)
    }

    pub fn stack_index(&self, id: StackId) -> Option<usize> {
        self.stacks.iter().position(|stack| stack.id == id)
    }

    pub fn next_cards(&self) -> impl Iterator<Item = &DealtCard> {
        self.next_cards.iter()
    }

    /// Most stacks the hand can hold with this deck
    pub fn stack_limit(&self, deck: &Deck) -> usize {
        if self.stacking {
            self.hand_size.min(deck.distinct_signature_count())
        } else {
            self.hand_size
        }
    }

    /// Fresh hand: lookahead first, then stacks fed from it
    pub fn deal(&mut self, deck: &mut Deck) {
        self.stacks.clear();
        self.next_cards.clear();
        self.top_up_queue(deck);
        self.refill_hand_stacks(deck, &[]);
    }

    /// Fill empty slots up to the stack limit. New stacks go to the
    /// `preferred_insertion_indices` first (only as many as there are
    /// gaps), then to the end of the hand.
    pub fn refill_hand_stacks(&mut self, deck: &mut Deck, preferred_insertion_indices: &[usize]) {
        let limit = self.stack_limit(deck);
        let gaps = limit.saturating_sub(self.stacks.len());
        let mut preferred: VecDeque<usize> = preferred_insertion_indices
            .iter()
            .copied()
            .take(gaps)
            .collect();

        let mut draws = 0;
        while self.stacks.len() < limit {
            if draws == MAX_REFILL_DRAWS {
                warn!(
                    stacks = self.stacks.len(),
                    limit, "gave up filling hand after {MAX_REFILL_DRAWS} draws"
                );
                break;
            }
            draws += 1;

            let card = self.pull_next(deck);
            if let Some(stack) = self.matching_stack_mut(&card) {
                stack.cards.push(card);
                continue;
            }

            let id = self.allocate_id();
            let position = preferred
                .pop_front()
                .map_or(self.stacks.len(), |index| index.min(self.stacks.len()));
            self.stacks.insert(position, HandStack::new(id, card));
        }
        self.top_up_queue(deck);
    }

    /// Take the top card off a stack. An emptied stack is removed and its
    /// slot refilled in place.
    pub fn play_card(&mut self, id: StackId, deck: &mut Deck) -> Option<DealtCard> {
        let index = self.stack_index(id)?;
        let card = self.stacks[index].cards.pop()?;
        if self.stacks[index].cards.is_empty() {
            self.stacks.remove(index);
            self.refill_hand_stacks(deck, &[index]);
        }
        Some(card)
    }

    /// Throw away a whole stack and refill its slot. The discarded cards
    /// reach the deck after the replacement is drawn.
    pub fn discard_stack(&mut self, id: StackId, deck: &mut Deck) -> bool {
        let Some(index) = self.stack_index(id) else {
            return false;
        };
        let removed = self.stacks.remove(index);
        self.refill_hand_stacks(deck, &[index]);
        for card in removed.cards {
            deck.discard(card);
        }
        true
    }

    /// Replace every stack and the lookahead. Old cards are discarded after
    /// the new hand is dealt so they cannot come straight back.
    pub fn redraw_all(&mut self, deck: &mut Deck) {
        for card in self.replace_all(deck) {
            deck.discard(card);
        }
    }

    /// Deal a new hand and lookahead, handing back the cards they replaced
    /// (stacks in hand order, then the old lookahead)
    pub fn replace_all(&mut self, deck: &mut Deck) -> Vec<DealtCard> {
        let mut replaced: Vec<DealtCard> = std::mem::take(&mut self.stacks)
            .into_iter()
            .flat_map(|stack| stack.cards)
            .collect();
        replaced.extend(self.next_cards.drain(..));

        self.top_up_queue(deck);
        self.refill_hand_stacks(deck, &[]);
        replaced
    }

    fn pull_next(&mut self, deck: &mut Deck) -> DealtCard {
        match self.next_cards.pop_front() {
            Some(card) => {
                self.top_up_queue(deck);
                card
            }
            None => deck.draw(),
        }
    }

    fn top_up_queue(&mut self, deck: &mut Deck) {
        while self.next_cards.len() < self.preview_count {
            self.next_cards.push_back(deck.draw());
        }
    }

    fn matching_stack_mut(&mut self, card: &DealtCard) -> Option<&mut HandStack> {
        if !self.stacking {
            return None;
        }
        let signature = card.signature();
        self.stacks
            .iter_mut()
            .find(|stack| stack.signature() == signature)
    }

    fn allocate_id(&mut self) -> StackId {
        let id = StackId(self.next_stack_id);
        self.next_stack_id += 1;
        id
    }
}
