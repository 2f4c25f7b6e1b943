//! The domain table: a shared, lock-guarded map of canonical domain names to
//! IPv4 address strings.
//!
//! The table is the only shared mutable state in the service. The [DNS
//! handler][crate::dns] reads it, the [admin API][crate::api] and
//! [bootstrap][crate::bootstrap] write it. All access goes through one
//! reader-writer lock; every batch mutation holds the write lock for the whole
//! batch, so a concurrent reader never observes a half-applied batch.
//!
//! Keys are stored in canonical form (one trailing `.` stripped, case left
//! exactly as supplied; see [`canonical_name`]). Values are dotted-decimal
//! strings and are deliberately not validated at write time.

use crate::error::Error;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// `SharedRegistry` is the handle passed to the DNS handler and the admin API.
pub type SharedRegistry = Arc<DomainRegistry>;

/// Strip a single trailing label terminator from a domain name.
///
/// This is the table's canonical key form: `"service.local."` and
/// `"service.local"` address the same entry. No case folding is performed;
/// names differing only in case are distinct keys.
pub fn canonical_name(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// The authoritative set of locally-known name → address bindings.
#[derive(Debug, Default)]
pub struct DomainRegistry {
    entries: RwLock<HashMap<String, String>>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the address bound to the exact canonical key, if any.
    pub async fn lookup(&self, name: &str) -> Option<String> {
        self.entries.read().await.get(name).cloned()
    }

    /// Insert or overwrite the binding for the given key.
    pub async fn upsert(&self, name: impl Into<String>, address: impl Into<String>) {
        self.entries
            .write()
            .await
            .insert(name.into(), address.into());
    }

    /// Insert or overwrite every binding in the batch under a single write
    /// lock hold.
    pub async fn merge(&self, pairs: Vec<(String, String)>) {
        let mut entries = self.entries.write().await;
        for (name, address) in pairs {
            entries.insert(name, address);
        }
    }

    /// Overwrite existing bindings only, in batch order, under a single write
    /// lock hold.
    ///
    /// Stops at the first name with no entry and returns
    /// [`Error::UnknownDomain`] for it. Bindings applied earlier in the same
    /// batch stay applied; this partial-batch behavior is a documented
    /// contract of the update operation.
    pub async fn update_existing(&self, pairs: Vec<(String, String)>) -> Result<(), Error> {
        let mut entries = self.entries.write().await;
        for (name, address) in pairs {
            match entries.get_mut(&name) {
                Some(bound) => *bound = address,
                None => return Err(Error::UnknownDomain(name)),
            }
        }
        Ok(())
    }

    /// Remove every entry whose (key, value) satisfies the predicate.
    /// Returns the number of entries removed. Removing nothing is not an error.
    pub async fn remove_matching(&self, predicate: impl Fn(&str, &str) -> bool) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|name, address| !predicate(name, address));
        before - entries.len()
    }

    /// A consistent point-in-time copy of all bindings.
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_strips_one_terminator() {
        assert_eq!(canonical_name("example.org."), "example.org");
        assert_eq!(canonical_name("example.org"), "example.org");
        // Only a single trailing dot is stripped.
        assert_eq!(canonical_name("example.org.."), "example.org.");
        assert_eq!(canonical_name(""), "");
    }

    #[tokio::test]
    async fn upsert_then_lookup() {
        let registry = DomainRegistry::new();
        registry.upsert("example.org", "192.168.1.2").await;
        assert_eq!(
            registry.lookup("example.org").await.as_deref(),
            Some("192.168.1.2")
        );
        assert_eq!(registry.lookup("notfound").await, None);

        registry.upsert("example.org", "192.168.1.3").await;
        assert_eq!(
            registry.lookup("example.org").await.as_deref(),
            Some("192.168.1.3")
        );
    }

    #[tokio::test]
    async fn keys_are_case_sensitive() {
        let registry = DomainRegistry::new();
        registry.upsert("example.org", "10.0.0.1").await;
        registry.upsert("Example.org", "10.0.0.2").await;
        assert_eq!(
            registry.lookup("example.org").await.as_deref(),
            Some("10.0.0.1")
        );
        assert_eq!(
            registry.lookup("Example.org").await.as_deref(),
            Some("10.0.0.2")
        );
        assert_eq!(registry.lookup("EXAMPLE.ORG").await, None);
    }

    #[tokio::test]
    async fn update_existing_applies_prefix_then_reports_unknown() {
        let registry = DomainRegistry::new();
        registry.upsert("known.example", "10.0.0.1").await;

        let err = registry
            .update_existing(vec![
                ("known.example".to_string(), "10.0.0.9".to_string()),
                ("missing.example".to_string(), "10.0.0.10".to_string()),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownDomain(name) if name == "missing.example"));

        // The update before the unknown name stays applied.
        assert_eq!(
            registry.lookup("known.example").await.as_deref(),
            Some("10.0.0.9")
        );
        assert_eq!(registry.lookup("missing.example").await, None);
    }

    #[tokio::test]
    async fn remove_matching_by_name_or_address() {
        let registry = DomainRegistry::new();
        registry.upsert("a.example", "10.0.0.5").await;
        registry.upsert("b.example", "10.0.0.5").await;
        registry.upsert("c.example", "10.0.0.6").await;

        // Several names can share one address; removal by address takes them all.
        let removed = registry
            .remove_matching(|_, address| address == "10.0.0.5")
            .await;
        assert_eq!(removed, 2);
        assert_eq!(registry.lookup("a.example").await, None);
        assert_eq!(registry.lookup("b.example").await, None);
        assert_eq!(
            registry.lookup("c.example").await.as_deref(),
            Some("10.0.0.6")
        );

        let removed = registry.remove_matching(|name, _| name == "c.example").await;
        assert_eq!(removed, 1);

        let removed = registry.remove_matching(|name, _| name == "gone").await;
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn snapshot_is_point_in_time() {
        let registry = DomainRegistry::new();
        registry.upsert("a.example", "10.0.0.1").await;
        let snap = registry.snapshot().await;
        registry.upsert("b.example", "10.0.0.2").await;
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get("a.example").map(String::as_str), Some("10.0.0.1"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn batches_are_never_partially_visible() {
        let registry = Arc::new(DomainRegistry::new());
        registry.upsert("a.example", "0").await;
        registry.upsert("b.example", "0").await;

        let writer = {
            let registry = registry.clone();
            tokio::spawn(async move {
                for i in 1..200u32 {
                    registry
                        .update_existing(vec![
                            ("a.example".to_string(), i.to_string()),
                            ("b.example".to_string(), i.to_string()),
                        ])
                        .await
                        .unwrap();
                }
            })
        };

        let reader = {
            let registry = registry.clone();
            tokio::spawn(async move {
                for _ in 0..200 {
                    let snap = registry.snapshot().await;
                    // Both keys are written under one lock hold, so every
                    // snapshot must see them agree.
                    assert_eq!(snap.get("a.example"), snap.get("b.example"));
                    tokio::task::yield_now().await;
                }
            })
        };

        writer.await.unwrap();
        reader.await.unwrap();
    }
}
