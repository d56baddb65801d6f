use crate::board::ContainerId;
use crate::rules::Unit;

/// A transfer that has been applied to the board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Move {
    from: ContainerId,
    to: ContainerId,
    unit: Unit,
}

impl Move {
    pub(crate) fn new(from: ContainerId, to: ContainerId, unit: Unit) -> Move {
        Move{from, to, unit}
    }

    pub fn from(&self) -> ContainerId { self.from }

    pub fn to(&self) -> ContainerId { self.to }

    pub fn unit(&self) -> &Unit { &self.unit }
}

/// Applied moves, most recent last.
#[derive(Clone, Debug, Default)]
pub struct History {
    moves: Vec<Move>,
}

impl History {
    pub fn new() -> History {
        History{
            moves: Vec::with_capacity(64),
        }
    }

    pub fn len(&self) -> usize { self.moves.len() }

    pub fn is_empty(&self) -> bool { self.moves.is_empty() }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    pub(crate) fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub(crate) fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.moves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_order() {
        let mut h = History::new();
        let a = Move::new(ContainerId::Cascade(0), ContainerId::FreeCell(0),
            Unit::single("KS".parse().unwrap()));
        let b = Move::new(ContainerId::Cascade(1), ContainerId::Foundation(0),
            Unit::single("AH".parse().unwrap()));

        assert!(h.is_empty());
        h.push(a.clone());
        h.push(b.clone());
        assert_eq!(h.len(), 2);
        assert_eq!(h.last(), Some(&b));
        assert_eq!(h.pop(), Some(b));
        assert_eq!(h.pop(), Some(a));
        assert_eq!(h.pop(), None);
    }
}
