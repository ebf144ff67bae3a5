/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Client order id allocation.
//!
//! Each session owns its own counter, so concurrent sessions never share ids
//! and can be tested in isolation.

use fixp_core::types::Timestamp;

/// Allocates client order ids for one session.
///
/// Ids have the form `<counter>-<epoch seconds>`; the counter starts at 1, is
/// incremented once per allocation and never reused.
#[derive(Debug, Default)]
pub struct ClOrdIdGenerator {
    /// Number of ids allocated so far.
    counter: u64,
}

impl ClOrdIdGenerator {
    /// Creates a generator that has not allocated any id yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    /// Allocates the next client order id.
    pub fn next_id(&mut self) -> String {
        self.next_id_at(Timestamp::now())
    }

    /// Allocates the next client order id using the given time.
    ///
    /// # Arguments
    /// * `now` - Time combined with the counter
    pub fn next_id_at(&mut self, now: Timestamp) -> String {
        self.counter += 1;
        format!("{}-{}", self.counter, now.format_epoch_secs())
    }

    /// Returns the number of ids allocated so far.
    #[inline]
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_of(cl_ord_id: &str) -> Option<u64> {
        cl_ord_id.split_once('-')?.0.parse().ok()
    }

    #[test]
    fn test_first_id_starts_at_one() {
        let mut ids = ClOrdIdGenerator::new();
        assert_eq!(ids.allocated(), 0);

        let id = ids.next_id_at(Timestamp::from_millis(1_595_610_929_414));
        assert_eq!(id, "1-1595610929.414000");
        assert_eq!(ids.allocated(), 1);
    }

    #[test]
    fn test_ids_strictly_increase_and_never_repeat() {
        let mut ids = ClOrdIdGenerator::new();
        let now = Timestamp::from_millis(1_000);
        let allocated: Vec<String> = (0..100).map(|_| ids.next_id_at(now)).collect();

        let counters: Vec<u64> = allocated.iter().filter_map(|id| counter_of(id)).collect();
        assert_eq!(counters.len(), 100);
        assert!(counters.windows(2).all(|w| w[0] < w[1]));

        let mut unique = allocated.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), allocated.len());
    }

    #[test]
    fn test_generators_are_independent() {
        let mut first = ClOrdIdGenerator::new();
        let mut second = ClOrdIdGenerator::new();
        first.next_id();
        first.next_id();
        assert_eq!(counter_of(&second.next_id()), Some(1));
        assert_eq!(first.allocated(), 2);
    }
}
