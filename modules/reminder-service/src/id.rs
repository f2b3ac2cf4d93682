//! Identifier generation for reminders created without an id.

use rand::Rng;

/// Builds `id<millis><rand>` where `<millis>` is the current Unix time in
/// milliseconds and `<rand>` is drawn from `0..10000`. Not collision-proof.
pub fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let salt: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("id{}{}", millis, salt)
}
