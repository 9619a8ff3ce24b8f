use crate::card::DealtCard;
use std::collections::VecDeque;

/// Draw pile - cards waiting to be dealt, front first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawPile {
    cards: VecDeque<DealtCard>,
}

impl DrawPile {
    pub fn new() -> Self {
        DrawPile {
            cards: VecDeque::new(),
        }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn add_card(&mut self, card: DealtCard) {
        self.cards.push_back(card);
    }

    pub fn draw(&mut self) -> Option<DealtCard> {
        self.cards.pop_front()
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Discard pile - thrown-away cards in the order they were discarded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscardPile {
    cards: Vec<DealtCard>,
}

impl DiscardPile {
    pub fn new() -> Self {
        DiscardPile { cards: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn add_card(&mut self, card: DealtCard) {
        self.cards.push(card);
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[DealtCard] {
        &self.cards
    }

    /// Empty the pile into `draw_pile`, oldest discard first
    pub fn recycle_into(&mut self, draw_pile: &mut DrawPile) {
        for card in self.cards.drain(..) {
            draw_pile.add_card(card);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::MoveCard;

    #[test]
    fn test_draw_pile_is_fifo() {
        let mut pile = DrawPile::new();
        pile.add_card(MoveCard::KingUp.into());
        pile.add_card(MoveCard::KingDown.into());
        assert_eq!(pile.draw().map(|c| c.card), Some(MoveCard::KingUp));
        assert_eq!(pile.size(), 1);
        assert_eq!(pile.draw().map(|c| c.card), Some(MoveCard::KingDown));
        assert!(pile.is_empty());
    }

    #[test]
    fn test_recycle_preserves_discard_order() {
        let mut discard = DiscardPile::new();
        discard.add_card(MoveCard::RayLeft.into());
        discard.add_card(MoveCard::KnightUp1Left2.into());
        discard.add_card(MoveCard::KingRight.into());

        let mut pile = DrawPile::new();
        discard.recycle_into(&mut pile);

        assert!(discard.is_empty());
        let order: Vec<_> = std::iter::from_fn(|| pile.draw()).map(|c| c.card).collect();
        assert_eq!(
            order,
            vec![MoveCard::RayLeft, MoveCard::KnightUp1Left2, MoveCard::KingRight]
        );
    }
}
