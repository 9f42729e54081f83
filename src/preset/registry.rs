//! Static preset registry.
//!
//! Resolves a preset name (`"chrome"`, `"chrome-140"`, `"firefox-128"`, ...)
//! to an `Arc<Preset>`, the way [`emulation::profiles::Chrome`]'s `Default`
//! resolves to the latest shipped version. Unknown names are a request-level
//! error (`NetError::UnknownPreset`), not a panic.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::base::neterror::NetError;
use crate::emulation::profiles::{Chrome, Edge, Firefox, Opera, Safari};
use crate::emulation::EmulationFactory;
use crate::socket::tls::impersonate::ImpersonateTarget;

use super::Preset;

/// Chromium's own default header order for a navigation-style request,
/// shared across the Chromium-derived presets (Chrome, Edge, Opera).
fn chromium_header_order() -> Vec<String> {
    [
        "sec-ch-ua",
        "sec-ch-ua-mobile",
        "sec-ch-ua-platform",
        "upgrade-insecure-requests",
        "user-agent",
        "accept",
        "sec-fetch-site",
        "sec-fetch-mode",
        "sec-fetch-user",
        "sec-fetch-dest",
        "accept-encoding",
        "accept-language",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn firefox_header_order() -> Vec<String> {
    [
        "user-agent",
        "accept",
        "accept-language",
        "accept-encoding",
        "dnt",
        "sec-fetch-dest",
        "sec-fetch-mode",
        "sec-fetch-site",
        "te",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn safari_header_order() -> Vec<String> {
    [
        "accept",
        "accept-language",
        "user-agent",
        "accept-encoding",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub struct PresetRegistry {
    presets: HashMap<&'static str, Arc<Preset>>,
    aliases: HashMap<&'static str, &'static str>,
}

impl PresetRegistry {
    fn build() -> Self {
        let mut presets = HashMap::new();
        let mut aliases = HashMap::new();

        let mut insert = |canonical: &'static str, preset: Preset| {
            presets.insert(canonical, Arc::new(preset));
        };

        insert(
            "chrome-140",
            Preset::from_emulation(
                "chrome-140",
                Chrome::V140.emulation(),
                ImpersonateTarget::Chrome128,
                chromium_header_order(),
            )
            .with_supports_h3(true),
        );
        insert(
            "chrome-131",
            Preset::from_emulation(
                "chrome-131",
                Chrome::V131.emulation(),
                ImpersonateTarget::Chrome128,
                chromium_header_order(),
            )
            .with_supports_h3(true),
        );
        insert(
            "chrome-124",
            Preset::from_emulation(
                "chrome-124",
                Chrome::V124.emulation(),
                ImpersonateTarget::Chrome124,
                chromium_header_order(),
            )
            .with_supports_h3(true),
        );
        insert(
            "firefox-133",
            Preset::from_emulation(
                "firefox-133",
                Firefox::V133.emulation(),
                ImpersonateTarget::Firefox129,
                firefox_header_order(),
            ),
        );
        insert(
            "firefox-128",
            Preset::from_emulation(
                "firefox-128",
                Firefox::V128.emulation(),
                ImpersonateTarget::Firefox128,
                firefox_header_order(),
            ),
        );
        insert(
            "safari-18",
            Preset::from_emulation(
                "safari-18",
                Safari::V18.emulation(),
                ImpersonateTarget::Safari18,
                safari_header_order(),
            ),
        );
        insert(
            "safari-17",
            Preset::from_emulation(
                "safari-17",
                Safari::V17.emulation(),
                ImpersonateTarget::Safari17,
                safari_header_order(),
            ),
        );
        insert(
            "edge-131",
            Preset::from_emulation(
                "edge-131",
                Edge::V131.emulation(),
                ImpersonateTarget::Chrome128,
                chromium_header_order(),
            )
            .with_supports_h3(true),
        );
        insert(
            "opera-116",
            Preset::from_emulation(
                "opera-116",
                Opera::V116.emulation(),
                ImpersonateTarget::Chrome128,
                chromium_header_order(),
            ),
        );

        aliases.insert("chrome", "chrome-140");
        aliases.insert("firefox", "firefox-133");
        aliases.insert("safari", "safari-18");
        aliases.insert("edge", "edge-131");
        aliases.insert("opera", "opera-116");

        Self { presets, aliases }
    }

    pub fn get(&self, name: &str) -> Result<Arc<Preset>, NetError> {
        let canonical = self.aliases.get(name).copied().unwrap_or(name);
        self.presets
            .get(canonical)
            .cloned()
            .ok_or_else(|| NetError::UnknownPreset(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.presets.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

static REGISTRY: OnceLock<PresetRegistry> = OnceLock::new();

fn registry() -> &'static PresetRegistry {
    REGISTRY.get_or_init(PresetRegistry::build)
}

/// Resolve a preset by name (or alias), e.g. `"chrome"` or `"firefox-128"`.
pub fn get(name: &str) -> Result<Arc<Preset>, NetError> {
    registry().get(name)
}

/// List canonical preset names currently registered.
pub fn names() -> Vec<&'static str> {
    registry().names()
}

impl Preset {
    fn with_supports_h3(mut self, value: bool) -> Self {
        self.supports_h3 = value;
        self
    }
}
