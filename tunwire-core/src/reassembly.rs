//! Bounded reassembly cache: exactly three in-flight packets, most-recently
//! touched first. See spec.md §4.5.

use tracing::warn;

/// Fixed MRU capacity. Expected out-of-order depth is small; three slots are
/// enough for fragments interleaved across at most two in-flight originals.
const CACHE_SIZE: usize = 3;

struct Entry {
    id: u64,
    /// `frag_num` for the packet currently occupying this entry, or `0` if
    /// the entry is unused (matches the wire's reserved value for "no
    /// fragments configured yet").
    frag_num: u8,
    frags: Vec<Vec<u8>>,
}

impl Entry {
    fn empty() -> Self {
        Entry { id: 0, frag_num: 0, frags: Vec::new() }
    }

    fn reset(&mut self, id: u64) {
        self.id = id;
        self.frag_num = 0;
        self.frags.clear();
    }

    fn is_complete(&self) -> bool {
        self.frag_num != 0
            && self.frags.len() == self.frag_num as usize
            && self.frags.iter().all(|f| !f.is_empty())
    }
}

/// What happened to a fragment handed to the reassembler.
pub enum Outcome {
    /// The packet is still incomplete; nothing to forward yet.
    Pending,
    /// Every fragment has arrived; here is the concatenated payload.
    Complete(Vec<u8>),
    /// This fragment's `frag_num` didn't match the in-flight entry for its
    /// `id`; the caller should log "header mismatch" and drop it.
    HeaderMismatch,
}

/// Task-local, single-threaded reassembly state. Not shared across tasks.
pub struct Reassembler {
    /// Most-recently-touched first; `entries[CACHE_SIZE - 1]` is evicted next.
    entries: Vec<Entry>,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reassembler {
    pub fn new() -> Self {
        Reassembler { entries: (0..CACHE_SIZE).map(|_| Entry::empty()).collect() }
    }

    /// Finds (or allocates, evicting the tail) the entry for `id` and moves
    /// it to the front of the MRU list. Returns its index (always 0 after
    /// this call, since the found/allocated entry is rotated to the front).
    fn touch(&mut self, id: u64) -> usize {
        if let Some(pos) = self.entries.iter().position(|e| e.frag_num != 0 && e.id == id) {
            self.entries[..=pos].rotate_right(1);
            return 0;
        }
        // Not found: evict the tail, reset it for `id`, rotate to front.
        let last = self.entries.len() - 1;
        self.entries[last].reset(id);
        self.entries.rotate_right(1);
        0
    }

    /// Feeds one fragment's payload into the cache. `payload` is the
    /// `h.len`-byte slice at `buf[HEADER_LEN..HEADER_LEN + h.len]`.
    pub fn accept(&mut self, id: u64, frag_n: u8, frag_num: u8, payload: &[u8]) -> Outcome {
        let idx = self.touch(id);
        let entry = &mut self.entries[idx];

        if entry.frag_num == 0 {
            entry.frag_num = frag_num;
            entry.frags = vec![Vec::new(); frag_num as usize];
        } else if entry.frag_num != frag_num {
            warn!(id, frag_n, frag_num, expected = entry.frag_num, "header mismatch");
            return Outcome::HeaderMismatch;
        }

        entry.frags[frag_n as usize] = payload.to_vec();

        if !entry.is_complete() {
            return Outcome::Pending;
        }

        let mut out = Vec::with_capacity(entry.frags.iter().map(|f| f.len()).sum());
        for frag in &entry.frags {
            out.extend_from_slice(frag);
        }

        // Free the slot and push this entry to the tail so it is evicted
        // before entries that are still in-flight.
        entry.reset(0);
        let last = self.entries.len() - 1;
        self.entries[0..=last].rotate_left(1);

        Outcome::Complete(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_fragment_completes_immediately() {
        let mut r = Reassembler::new();
        match r.accept(1, 0, 1, b"hello") {
            Outcome::Complete(payload) => assert_eq!(payload, b"hello"),
            _ => panic!("expected completion"),
        }
    }

    #[test]
    fn out_of_order_fragments_still_complete() {
        let mut r = Reassembler::new();
        assert!(matches!(r.accept(7, 2, 3, b"ccc"), Outcome::Pending));
        assert!(matches!(r.accept(7, 0, 3, b"aaa"), Outcome::Pending));
        match r.accept(7, 1, 3, b"bbb") {
            Outcome::Complete(p) => assert_eq!(p, b"aaabbbccc"),
            _ => panic!("expected completion"),
        }
    }

    #[test]
    fn mismatched_frag_num_is_rejected() {
        let mut r = Reassembler::new();
        assert!(matches!(r.accept(1, 0, 2, b"a"), Outcome::Pending));
        assert!(matches!(r.accept(1, 1, 3, b"b"), Outcome::HeaderMismatch));
    }

    #[test]
    fn three_in_flight_ids_complete_independently() {
        let mut r = Reassembler::new();
        assert!(matches!(r.accept(1, 0, 2, b"a1"), Outcome::Pending));
        assert!(matches!(r.accept(2, 0, 2, b"a2"), Outcome::Pending));
        assert!(matches!(r.accept(3, 0, 2, b"a3"), Outcome::Pending));
        match r.accept(1, 1, 2, b"b1") {
            Outcome::Complete(p) => assert_eq!(p, b"a1b1"),
            _ => panic!("expected completion"),
        }
        match r.accept(2, 1, 2, b"b2") {
            Outcome::Complete(p) => assert_eq!(p, b"a2b2"),
            _ => panic!("expected completion"),
        }
        match r.accept(3, 1, 2, b"b3") {
            Outcome::Complete(p) => assert_eq!(p, b"a3b3"),
            _ => panic!("expected completion"),
        }
    }

    #[test]
    fn fourth_id_evicts_oldest_incomplete() {
        let mut r = Reassembler::new();
        assert!(matches!(r.accept(1, 0, 2, b"a1"), Outcome::Pending));
        assert!(matches!(r.accept(2, 0, 2, b"a2"), Outcome::Pending));
        assert!(matches!(r.accept(3, 0, 2, b"a3"), Outcome::Pending));
        // id=1 is now the LRU tail; a 4th id evicts it silently.
        assert!(matches!(r.accept(4, 0, 2, b"a4"), Outcome::Pending));
        // Completing id=1's second fragment now starts a brand new entry.
        assert!(matches!(r.accept(1, 1, 2, b"b1"), Outcome::Pending));
    }

    #[test]
    fn completed_entry_moves_to_mru_tail() {
        let mut r = Reassembler::new();
        // Complete id=1 first so it is pushed to the tail.
        assert!(matches!(r.accept(1, 0, 1, b"x"), Outcome::Complete(_)));
        assert!(matches!(r.accept(2, 0, 2, b"a2"), Outcome::Pending));
        assert!(matches!(r.accept(3, 0, 2, b"a3"), Outcome::Pending));
        // Entry for id=1 was freed and rotated to the tail, so this 4th id
        // reuses it rather than evicting 2 or 3's in-flight state.
        assert!(matches!(r.accept(4, 0, 2, b"a4"), Outcome::Pending));
        match r.accept(2, 1, 2, b"b2") {
            Outcome::Complete(p) => assert_eq!(p, b"a2b2"),
            _ => panic!("id=2 should still be in flight"),
        }
        match r.accept(3, 1, 2, b"b3") {
            Outcome::Complete(p) => assert_eq!(p, b"a3b3"),
            _ => panic!("id=3 should still be in flight"),
        }
    }
}
