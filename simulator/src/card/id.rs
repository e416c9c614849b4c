/// Identity of one physical card copy, unique among the cards a single hero owns.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u64);

impl CardId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl std::fmt::Debug for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CardId(0x{:x})", self.0)
    }
}

/// Hands out card ids in order. Each hero owns one, so ids repeat across gauntlets.
#[derive(Clone, Debug, Default)]
pub struct CardIdSequence(u64);

impl CardIdSequence {
    pub fn next_id(&mut self) -> CardId {
        let id = CardId(self.0);
        self.0 += 1;
        id
    }
}
