//! Selector profile for the map site's result list and place pages.
//!
//! The defaults target the live Google Maps markup. Obfuscated class names
//! drift, so the whole set can be replaced from a YAML file without a rebuild.

use std::path::Path;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::browser::Locator;
use crate::error::ProfileError;

const DEFAULT_RESULTS_ANCHOR: &str = "a.hfpxzc";
const DEFAULT_RESULTS_SIDEBAR: &str =
    r#"//*[@id="QA0Szd"]/div/div/div[1]/div[2]/div/div[1]/div/div/div[1]/div[1]"#;
const DEFAULT_NAME: &str = "h1.DUwDvf";
const DEFAULT_WEBSITE: &str = r#"a[data-item-id*="authority"]"#;
const DEFAULT_ADDRESS: &str = "div.Io6YTe";

/// Where one record field lives on a place page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// CSS selector; the first match is used.
    pub selector: String,
    /// Attribute to read instead of the element's text.
    #[serde(default)]
    pub attribute: Option<String>,
}

impl FieldRule {
    fn text(selector: &str) -> Self {
        Self {
            selector: selector.to_owned(),
            attribute: None,
        }
    }

    fn attr(selector: &str, attribute: &str) -> Self {
        Self {
            selector: selector.to_owned(),
            attribute: Some(attribute.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    /// CSS selector for the per-result anchors whose `href` is the detail URL.
    pub results_anchor: String,
    /// Scrollable container holding the result list, written as
    /// `css: <selector>` or `xpath: <expr>`.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub results_sidebar: Locator,
    pub name: FieldRule,
    pub website: FieldRule,
    pub address: FieldRule,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            results_anchor: DEFAULT_RESULTS_ANCHOR.to_owned(),
            results_sidebar: Locator::xpath(DEFAULT_RESULTS_SIDEBAR),
            name: FieldRule::text(DEFAULT_NAME),
            website: FieldRule::attr(DEFAULT_WEBSITE, "href"),
            address: FieldRule::text(DEFAULT_ADDRESS),
        }
    }
}

impl SiteProfile {
    /// Reads a profile from YAML. Fields missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] if the file cannot be read, or
    /// [`ProfileError::Parse`] if it is not a valid profile document.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ProfileError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// # Errors
    ///
    /// Returns [`ProfileError::Parse`] on malformed YAML or unknown shapes.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ProfileError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Parses every CSS selector up front so a bad profile fails before a
    /// browser session is opened.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidSelector`] naming the first field whose
    /// selector does not parse.
    pub fn compile(self) -> Result<CompiledProfile, ProfileError> {
        Ok(CompiledProfile {
            results_anchor: parse_selector("results_anchor", &self.results_anchor)?,
            name: CompiledField::new("name", &self.name)?,
            website: CompiledField::new("website", &self.website)?,
            address: CompiledField::new("address", &self.address)?,
            source: self,
        })
    }
}

/// A field rule with its selector parsed.
#[derive(Debug, Clone)]
pub struct CompiledField {
    pub(crate) selector: Selector,
    pub(crate) attribute: Option<String>,
}

impl CompiledField {
    fn new(field: &'static str, rule: &FieldRule) -> Result<Self, ProfileError> {
        Ok(Self {
            selector: parse_selector(field, &rule.selector)?,
            attribute: rule.attribute.clone(),
        })
    }
}

/// [`SiteProfile`] with parsed selectors, ready for extraction.
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    pub(crate) results_anchor: Selector,
    pub(crate) name: CompiledField,
    pub(crate) website: CompiledField,
    pub(crate) address: CompiledField,
    source: SiteProfile,
}

impl CompiledProfile {
    /// Browser-side locator matching the result anchors.
    #[must_use]
    pub fn results_anchor_locator(&self) -> Locator {
        Locator::css(self.source.results_anchor.clone())
    }

    #[must_use]
    pub fn results_sidebar_locator(&self) -> &Locator {
        &self.source.results_sidebar
    }

    #[must_use]
    pub fn profile(&self) -> &SiteProfile {
        &self.source
    }
}

fn parse_selector(field: &'static str, selector: &str) -> Result<Selector, ProfileError> {
    Selector::parse(selector).map_err(|e| ProfileError::InvalidSelector {
        field,
        selector: selector.to_owned(),
        reason: format!("{e:?}"),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn default_profile_compiles() {
        let compiled = SiteProfile::default().compile().unwrap();
        assert_eq!(
            compiled.results_anchor_locator(),
            Locator::css("a.hfpxzc")
        );
        assert!(matches!(
            compiled.results_sidebar_locator(),
            Locator::Xpath(x) if x.starts_with("//*[@id=\"QA0Szd\"]")
        ));
        assert_eq!(
            compiled.profile().website.attribute.as_deref(),
            Some("href")
        );
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r"
results_anchor: a.result-link
address:
  selector: span.addr
";
        let profile = SiteProfile::from_yaml_str(yaml).unwrap();
        assert_eq!(profile.results_anchor, "a.result-link");
        assert_eq!(profile.address, FieldRule::text("span.addr"));
        assert_eq!(profile.name, FieldRule::text(DEFAULT_NAME));
        assert_eq!(profile.results_sidebar, Locator::xpath(DEFAULT_RESULTS_SIDEBAR));
    }

    #[test]
    fn sidebar_can_be_css() {
        let yaml = "results_sidebar:\n  css: div[role=feed]\n";
        let profile = SiteProfile::from_yaml_str(yaml).unwrap();
        assert_eq!(profile.results_sidebar, Locator::css("div[role=feed]"));
    }

    #[test]
    fn sidebar_can_be_xpath_map() {
        let yaml = "results_sidebar:\n  xpath: //div[@role='feed']\n";
        let profile = SiteProfile::from_yaml_str(yaml).unwrap();
        assert_eq!(profile.results_sidebar, Locator::xpath("//div[@role='feed']"));
        assert!(profile.compile().is_ok());
    }

    #[test]
    fn sidebar_rejects_unknown_strategy() {
        let yaml = "results_sidebar:\n  id: feed\n";
        assert!(matches!(
            SiteProfile::from_yaml_str(yaml),
            Err(ProfileError::Parse(_))
        ));
    }

    #[test]
    fn profile_survives_yaml_round_trip() {
        let yaml = serde_yaml::to_string(&SiteProfile::default()).unwrap();
        assert!(yaml.contains("xpath:"), "sidebar not written as a map: {yaml}");
        assert_eq!(SiteProfile::from_yaml_str(&yaml).unwrap(), SiteProfile::default());
    }

    #[test]
    fn invalid_selector_names_the_field() {
        let profile = SiteProfile {
            name: FieldRule::text("h1[[["),
            ..SiteProfile::default()
        };
        let err = profile.compile().unwrap_err();
        match err {
            ProfileError::InvalidSelector { field, selector, .. } => {
                assert_eq!(field, "name");
                assert_eq!(selector, "h1[[[");
            }
            other => panic!("expected InvalidSelector, got {other:?}"),
        }
    }

    #[test]
    fn reads_profile_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name:\n  selector: h2.title").unwrap();
        let profile = SiteProfile::from_yaml_file(file.path()).unwrap();
        assert_eq!(profile.name.selector, "h2.title");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SiteProfile::from_yaml_file(Path::new("/nonexistent/selectors.yaml"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/selectors.yaml"));
    }
}
