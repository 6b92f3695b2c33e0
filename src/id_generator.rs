use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::util::time;

// Single static counter for all blocks created by this process
static NEXT_BLOCK_SEQ: AtomicU64 = AtomicU64::new(1);

/// Block ids are `<millis>-<seq>-<random>` so ids created within the same
/// millisecond still differ.
pub fn generate_block_id() -> String {
    let seq = NEXT_BLOCK_SEQ.fetch_add(1, Ordering::SeqCst);
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", time::timestamp_millis(), seq, &random[..8])
}

pub fn generate_page_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn generate_site_id() -> String {
    Uuid::new_v4().to_string()
}
