use chrono::{DateTime, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 8;

/// `TKN_<unix millis>_<8 base36 chars>`.
pub fn mint_token(at: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String =
        (0..SUFFIX_LEN).map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char).collect();
    format!("TKN_{}_{}", at.timestamp_millis(), suffix)
}
