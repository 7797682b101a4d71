//! Seed derivation for the partitioner's random tie-breaking

use crate::types::ParticipantId;
use chrono::{DateTime, Utc};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a style hash of the participant id set, independent of input order
pub fn roster_hash<I>(ids: I) -> u64
where
    I: IntoIterator<Item = ParticipantId>,
{
    let mut ids: Vec<ParticipantId> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.into_iter()
        .fold(FNV_OFFSET_BASIS, |hash, id| (hash ^ id).wrapping_mul(FNV_PRIME))
}

/// 64-bit avalanche finaliser
pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    x ^= x >> 33;
    x
}

/// Seed for an unseeded call: the roster hash mixed with the clock
pub fn time_mixed_seed<I>(ids: I, now: DateTime<Utc>) -> u64
where
    I: IntoIterator<Item = ParticipantId>,
{
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp()) as u64;
    roster_hash(ids) ^ mix64(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_roster_hash_ignores_order() {
        assert_eq!(roster_hash([3, 1, 2]), roster_hash([1, 2, 3]));
        assert_ne!(roster_hash([1, 2, 3]), roster_hash([1, 2, 4]));
    }

    #[test]
    fn test_time_mixed_seed_varies_with_clock() {
        let t1 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let t2 = Utc.timestamp_opt(1_700_000_000, 1).unwrap();
        assert_eq!(time_mixed_seed([1, 2], t1), time_mixed_seed([2, 1], t1));
        assert_ne!(time_mixed_seed([1, 2], t1), time_mixed_seed([1, 2], t2));
    }

    #[test]
    fn test_mix64_spreads_small_inputs() {
        assert_ne!(mix64(1), mix64(2));
        assert_eq!(mix64(0), 0);
    }
}
