//! Process-global, concurrent-safe signing-key cache.
//!
//! Keyed by the UTC day boundary plus `region ∥ service ∥ secretAccessKey`.
//! Only entries for the current day are useful; [`SigningKeyCache::evict_stale`]
//! drops everything older. Concurrent insertions race harmlessly since every
//! derivation for the same day+secret produces an identical `kSigning`.

use dashmap::DashMap;

use crate::crypto::Signer;
use crate::date::AmzDate;

type DerivedKey = [u8; 32];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    numeric_day: i64,
    composite: String,
}

/// Shared, process-wide cache of derived `kSigning` keys.
#[derive(Default)]
pub struct SigningKeyCache {
    entries: DashMap<CacheKey, DerivedKey>,
}

impl SigningKeyCache {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    /// Return the cached `kSigning` for `(date, region, service, secret)`,
    /// deriving and inserting it on a miss.
    pub fn get_or_derive(
        &self,
        signer: &dyn Signer,
        date: &AmzDate,
        region: &str,
        service: &str,
        secret_access_key: &str,
    ) -> DerivedKey {
        let key = CacheKey {
            numeric_day: date.numeric_day(),
            composite: format!("{region}{service}{secret_access_key}"),
        };

        if let Some(existing) = self.entries.get(&key) {
            return *existing;
        }

        let derived = derive_signing_key(signer, date, region, service, secret_access_key);
        // Last-writer-wins on a concurrent race is fine: both derivations
        // for the same day+secret are byte-identical.
        self.entries.insert(key, derived);
        derived
    }

    /// Drop every entry whose day is older than `today`.
    pub fn evict_stale(&self, today: &AmzDate) {
        let today = today.numeric_day();
        self.entries.retain(|key, _| key.numeric_day >= today);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn derive_signing_key(
    signer: &dyn Signer,
    date: &AmzDate,
    region: &str,
    service: &str,
    secret_access_key: &str,
) -> DerivedKey {
    let k_date = signer.hmac_sha256(
        format!("AWS4{secret_access_key}").as_bytes(),
        date.date_stamp().as_bytes(),
    );
    let k_region = signer.hmac_sha256(&k_date, region.as_bytes());
    let k_service = signer.hmac_sha256(&k_region, service.as_bytes());
    signer.hmac_sha256(&k_service, b"aws4_request")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DefaultSigner;
    use chrono::{TimeZone, Utc};

    #[test]
    fn hits_cache_for_same_day_same_key() {
        let cache = SigningKeyCache::new();
        let signer = DefaultSigner;
        let date = AmzDate::from_utc(Utc.with_ymd_and_hms(2013, 5, 24, 0, 0, 0).unwrap());

        let first = cache.get_or_derive(&signer, &date, "us-east-1", "s3", "secret");
        assert_eq!(cache.len(), 1);
        let second = cache.get_or_derive(&signer, &date, "us-east-1", "s3", "secret");
        assert_eq!(cache.len(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn evicts_entries_older_than_today() {
        let cache = SigningKeyCache::new();
        let signer = DefaultSigner;
        let old = AmzDate::from_utc(Utc.with_ymd_and_hms(2013, 5, 24, 0, 0, 0).unwrap());
        let today = AmzDate::from_utc(Utc.with_ymd_and_hms(2026, 7, 26, 0, 0, 0).unwrap());

        cache.get_or_derive(&signer, &old, "us-east-1", "s3", "secret");
        cache.get_or_derive(&signer, &today, "us-east-1", "s3", "secret");
        assert_eq!(cache.len(), 2);

        cache.evict_stale(&today);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn derived_key_differs_across_secrets_and_regions() {
        let cache = SigningKeyCache::new();
        let signer = DefaultSigner;
        let date = AmzDate::from_utc(Utc.with_ymd_and_hms(2013, 5, 24, 0, 0, 0).unwrap());

        let a = cache.get_or_derive(&signer, &date, "us-east-1", "s3", "secret-a");
        let b = cache.get_or_derive(&signer, &date, "us-east-1", "s3", "secret-b");
        let c = cache.get_or_derive(&signer, &date, "eu-west-3", "s3", "secret-a");

        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
