use anyhow::Result;
use chrono::{Duration, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;
use tracing::{info, warn};

use roster_core::Error;
use roster_core::auth::AccountService;
use roster_db::Database;
use roster_types::models::SenderType;

const NAMES: &[&str] = &[
    "ada", "grace", "edsger", "barbara", "donald", "margaret", "alan", "radia", "dennis", "frances",
];

const WORDS: &[&str] = &[
    "please", "review", "the", "latest", "update", "before", "friday", "thanks", "reminder",
    "your", "account", "was", "accessed", "from", "a", "new", "device", "meeting", "moved",
    "to", "noon", "tomorrow", "invoice", "attached", "for", "last", "month",
];

/// Fills the store with demo accounts and message history. Users go through
/// the account service so their hashes are real; messages are written
/// directly with a random creation time within the past year.
pub fn run(
    db: &Database,
    accounts: &AccountService,
    user_count: u32,
    messages_per_user: u32,
) -> Result<()> {
    let mut rng = rand::rng();

    for i in 0..user_count {
        let name = NAMES.choose(&mut rng).copied().unwrap_or("user");
        let email = format!("{name}{i}@example.com");
        let password: String = (&mut rng)
            .sample_iter(Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();

        let user_id = match accounts.register_new_user(&email, &password) {
            Ok(id) => id,
            Err(Error::UserExists) => {
                // Restart against an existing database; keep going.
                warn!(%email, "seed user already present, skipping");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        for _ in 0..messages_per_user {
            let created_at = Utc::now() - Duration::seconds(rng.random_range(0..31_536_000));
            let sender_type = if rng.random_bool(0.5) {
                SenderType::User
            } else {
                SenderType::System
            };

            if let Err(e) = db.save_message(user_id, &sentence(&mut rng), sender_type, created_at) {
                warn!(user_id, "failed to seed message: {e}");
            }
        }
    }

    info!(user_count, messages_per_user, "demo data seeding complete");
    Ok(())
}

fn sentence(rng: &mut impl Rng) -> String {
    let len = rng.random_range(4..9);
    let words: Vec<&str> = (0..len)
        .map(|_| WORDS.choose(rng).copied().unwrap_or("ok"))
        .collect();
    let mut text = words.join(" ");
    text.push('.');
    text
}
