//! Property-based tests for the simulated backend.
//!
//! Arbitrary interleavings of stores, reads and clock moves must keep the
//! backend's contract:
//! - a secret is returned at most once
//! - a secret is never returned after its lifetime
//! - a protected secret is never returned without its passphrase

use std::{collections::HashMap, time::Duration};

use keeper_client::{Passphrase, SecretGateway, SecretKey, Ttl};
use keeper_harness::SimBackend;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Store { ttl: Ttl, phrase: bool },
    Read { slot: usize, phrase: bool },
    Advance { minutes: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (prop::sample::select(Ttl::ALL.to_vec()), any::<bool>())
            .prop_map(|(ttl, phrase)| Op::Store { ttl, phrase }),
        4 => (0usize..8, any::<bool>()).prop_map(|(slot, phrase)| Op::Read { slot, phrase }),
        1 => (1u64..600).prop_map(|minutes| Op::Advance { minutes }),
    ]
}

struct Stored {
    key: SecretKey,
    expires_at: Option<Duration>,
    protected: bool,
    read: bool,
}

proptest! {
    #[test]
    fn prop_backend_contract(seed in any::<u64>(), ops in prop::collection::vec(op_strategy(), 1..60)) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let backend = SimBackend::new(seed);
        let phrase = Passphrase::normalize(Some("open sesame")).unwrap();
        let mut stored: Vec<Stored> = Vec::new();
        let mut reads: HashMap<String, usize> = HashMap::new();

        for op in ops {
            match op {
                Op::Store { ttl, phrase: protected } => {
                    let secret_phrase = protected.then_some(phrase.as_str());
                    let key = backend.insert("message", ttl, secret_phrase);
                    let expires_at = ttl.duration().map(|lifetime| backend.now() + lifetime);
                    stored.push(Stored { key, expires_at, protected, read: false });
                },
                Op::Read { slot, phrase: with_phrase } => {
                    let Some(entry) = stored.get_mut(slot) else { continue };
                    let sent = with_phrase.then_some(&phrase);
                    let result = runtime.block_on(backend.fetch_secret(&entry.key, sent));

                    if result.is_ok() {
                        *reads.entry(entry.key.as_str().to_string()).or_default() += 1;
                        prop_assert!(!entry.read, "secret returned twice");
                        prop_assert!(entry.expires_at.is_none_or(|at| backend.now() < at));
                        prop_assert!(!entry.protected || with_phrase);
                        entry.read = true;
                    } else if !entry.read
                        && (!entry.protected || with_phrase)
                        && entry.expires_at.is_none_or(|at| backend.now() < at)
                    {
                        prop_assert!(false, "readable secret was refused");
                    }
                },
                Op::Advance { minutes } => backend.advance(Duration::from_secs(minutes * 60)),
            }
        }

        prop_assert!(reads.values().all(|count| *count <= 1));
    }
}
