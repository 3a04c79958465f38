mod catalog;

use anyhow::{Context, Result};
use mitsutouge_page::{Page, PageFixture, SiteConfig};

/// Fixture page shipped with the page crate.
pub const DEFAULT_FIXTURE: &str = include_str!("../../../mitsutouge-page/fixtures/tourism.json");

/// Inputs shared by every scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioCtx {
    pub fixture: PageFixture,
    pub config: SiteConfig,
    pub verbose: bool,
}

impl ScenarioCtx {
    /// Parse `fixture_json`, or the built-in tourism page when `None`.
    ///
    /// # Errors
    /// Returns an error if the fixture is not a valid page description.
    pub fn new(fixture_json: Option<&str>, config: SiteConfig, verbose: bool) -> Result<Self> {
        let fixture = PageFixture::from_json(fixture_json.unwrap_or(DEFAULT_FIXTURE))
            .context("parsing page fixture")?;
        Ok(Self {
            fixture,
            config,
            verbose,
        })
    }

    /// A fresh, untouched copy of the fixture page.
    #[must_use]
    pub fn page(&self) -> Page {
        Page::from_fixture(&self.fixture)
    }
}

type Check = fn(&ScenarioCtx) -> Result<()>;

#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    check: Check,
}

impl Scenario {
    const fn new(key: &'static str, name: &'static str, description: &'static str, check: Check) -> Self {
        Self {
            key,
            name,
            description,
            check,
        }
    }

    /// Run the check.
    ///
    /// # Errors
    /// Returns the first violated expectation.
    pub fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        (self.check)(ctx)
    }
}

const SCENARIOS: &[Scenario] = &[
    Scenario::new(
        "external-links",
        "External Link Hardening",
        "http(s) anchors open in a new tab with rel=noopener",
        catalog::external_links,
    ),
    Scenario::new(
        "image-alt",
        "Image Alt Fallback",
        "images without alt text receive the fallback",
        catalog::image_alt,
    ),
    Scenario::new(
        "form-labels",
        "Form Label Backfill",
        "every visible control has exactly one label and a unique id",
        catalog::form_labels,
    ),
    Scenario::new(
        "enhance-idempotent",
        "Repeated Enhancement",
        "a second enhancement pass leaves the page unchanged",
        catalog::enhance_idempotent,
    ),
    Scenario::new(
        "switch-idempotent",
        "Repeated Language Switch",
        "switching to en twice yields identical DOM state",
        catalog::switch_idempotent,
    ),
    Scenario::new(
        "switch-round-trip",
        "Language Round Trip",
        "en then ja restores content, metadata, map and buttons",
        catalog::switch_round_trip,
    ),
    Scenario::new(
        "markup-decoding",
        "Entity Decoding",
        "encoded markup is decoded exactly once",
        catalog::markup_decoding,
    ),
    Scenario::new(
        "initial-locale",
        "Initial Locale Resolution",
        "URL suffix and stored preference pick the starting locale",
        catalog::initial_locale,
    ),
    Scenario::new(
        "focus-trap",
        "Focus Trap",
        "Tab and Shift+Tab wrap inside a trapped container",
        catalog::focus_trap,
    ),
    Scenario::new(
        "announcer",
        "Live Region Announcer",
        "a stale clear never erases a newer announcement",
        catalog::announcer,
    ),
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.description))
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<Scenario> {
    SCENARIOS.iter().copied().find(|s| s.key == key)
}

/// Expand `all` into every registered key, keeping explicit entries.
#[must_use]
pub fn expand_scenarios(requested: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = requested.iter().filter(|s| *s != "all").cloned().collect();
    if requested.iter().any(|s| s == "all") {
        for scenario in SCENARIOS {
            if !keys.iter().any(|k| k == scenario.key) {
                keys.push(scenario.key.to_string());
            }
        }
    }
    keys
}
