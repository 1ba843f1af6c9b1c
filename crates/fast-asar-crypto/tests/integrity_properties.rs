#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Property tests for block-chunked integrity records

use fast_asar_crypto::{Integrity, sha256_hex};
use proptest::prelude::*;

proptest! {
    #[test]
    fn block_count_matches_ceiling_division(
        data in proptest::collection::vec(any::<u8>(), 0..512),
        block_size in 1u32..64,
    ) {
        let integrity = Integrity::with_block_size(&data, block_size);
        let expected = if data.len() <= block_size as usize {
            1
        } else {
            data.len().div_ceil(block_size as usize)
        };
        prop_assert_eq!(integrity.block_count(), expected);
    }

    #[test]
    fn blocks_hash_consecutive_chunks(
        data in proptest::collection::vec(any::<u8>(), 65..512),
        block_size in 1u32..64,
    ) {
        let integrity = Integrity::with_block_size(&data, block_size);
        for (index, chunk) in data.chunks(block_size as usize).enumerate() {
            prop_assert_eq!(&integrity.blocks[index], &sha256_hex(chunk));
        }
    }

    #[test]
    fn computed_records_verify(
        data in proptest::collection::vec(any::<u8>(), 0..256),
        block_size in 1u32..32,
    ) {
        let integrity = Integrity::with_block_size(&data, block_size);
        prop_assert!(integrity.verify(&data).is_ok());
    }
}
