//! Protocol-Support Cache: remembers which protocol a `(preset, HostKey)`
//! pair negotiated last time, so `auto` mode skips racing on the common
//! case of a host it has already talked to.

use dashmap::DashMap;

use super::{HostKey, Protocol};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SupportKey {
    preset: String,
    host: HostKey,
}

/// Read-mostly map from `(preset, HostKey)` to the protocol last known to
/// work. Entries are written on race completion or on a protocol-class
/// error (permanently pinning to H1), never evicted on a timer — only
/// `set_preset`/`set_proxy` style reconfiguration clears it.
#[derive(Default)]
pub struct SupportCache {
    entries: DashMap<SupportKey, Protocol>,
}

impl SupportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, preset: &str, host: &HostKey) -> Option<Protocol> {
        self.entries
            .get(&SupportKey {
                preset: preset.to_string(),
                host: host.clone(),
            })
            .map(|v| *v.value())
    }

    pub fn record(&self, preset: &str, host: &HostKey, protocol: Protocol) {
        self.entries.insert(
            SupportKey {
                preset: preset.to_string(),
                host: host.clone(),
            },
            protocol,
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_returns_protocol() {
        let cache = SupportCache::new();
        let host = HostKey {
            host: "example.com".into(),
            port: 443,
        };
        assert!(cache.get("chrome", &host).is_none());
        cache.record("chrome", &host, Protocol::H3);
        assert_eq!(cache.get("chrome", &host), Some(Protocol::H3));
    }
}
