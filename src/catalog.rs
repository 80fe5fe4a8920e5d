// src/catalog.rs
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::EntityKind;

/// Search terms keyed by entity type. A source targeting `both` carries
/// terms under each key.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchTerms {
    #[serde(default)]
    pub hoa: Vec<String>,
    #[serde(default)]
    pub property_management: Vec<String>,
}

impl SearchTerms {
    /// Terms relevant to a source of the given entity type, hoa first.
    pub fn for_kind(&self, kind: EntityKind) -> Vec<&str> {
        match kind {
            EntityKind::Hoa => self.hoa.iter().map(String::as_str).collect(),
            EntityKind::PropertyManagement => {
                self.property_management.iter().map(String::as_str).collect()
            }
            EntityKind::Both => self
                .hoa
                .iter()
                .chain(self.property_management.iter())
                .map(String::as_str)
                .collect(),
            EntityKind::Unknown => Vec::new(),
        }
    }
}

/// Site-specific locators. Opaque to the pipeline; strategies fall back to
/// generic listing selectors when these are absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Selectors {
    #[serde(default)]
    pub results_list: Option<String>,
    #[serde(default)]
    pub result_info: Option<String>,
    #[serde(default)]
    pub pagination_next: Option<String>,
}

/// One external directory/listing site plus the metadata describing how and
/// when to query it. Loaded once at startup, read-only thereafter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub region: String,
    pub source_type: String,
    pub entity_type: EntityKind,
    pub url: String,
    #[serde(default)]
    pub search_terms: SearchTerms,
    #[serde(default)]
    pub selectors: Option<Selectors>,
    #[serde(default)]
    pub special_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    sources: Vec<SourceDescriptor>,
}

pub async fn load_catalog(
    path: &str,
) -> std::result::Result<Vec<SourceDescriptor>, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;
    Ok(catalog.sources)
}

/// Filter the catalog down to the sources the active configuration enables.
/// Order-preserving; an empty result is valid.
pub fn enabled_sources(catalog: &[SourceDescriptor], config: &Config) -> Vec<SourceDescriptor> {
    catalog
        .iter()
        .filter(|source| {
            if !config.sources.get(&source.source_type).copied().unwrap_or(false) {
                return false;
            }
            if source.region != "all"
                && !config.regions.get(&source.region).copied().unwrap_or(false)
            {
                return false;
            }
            match source.entity_type {
                EntityKind::Hoa => config.entity_types.hoa,
                EntityKind::PropertyManagement => config.entity_types.property_management,
                EntityKind::Both => {
                    config.entity_types.hoa || config.entity_types.property_management
                }
                EntityKind::Unknown => false,
            }
        })
        .cloned()
        .collect()
}

fn terms(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The built-in South Florida source catalog, used when no catalog file is
/// provided. Each entry carries one of the generic special types the
/// strategy registry knows about, or none for the default strategy.
pub fn builtin_catalog() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor {
            name: "Broward County Property Appraiser".to_string(),
            region: "broward".to_string(),
            source_type: "propertyAppraisers".to_string(),
            entity_type: EntityKind::Both,
            url: "https://web.bcpa.net/BcpaClient/#/Record-Search".to_string(),
            search_terms: SearchTerms {
                hoa: terms(&["HOA", "Homeowners Association", "Condominium Association"]),
                property_management: terms(&["Property Management", "Real Estate Management"]),
            },
            selectors: Some(Selectors {
                results_list: Some(".results-container".to_string()),
                result_info: Some(".property-details".to_string()),
                pagination_next: Some(".pagination-next".to_string()),
            }),
            special_type: None,
        },
        SourceDescriptor {
            name: "Miami-Dade County Property Appraiser".to_string(),
            region: "dade".to_string(),
            source_type: "propertyAppraisers".to_string(),
            entity_type: EntityKind::Both,
            url: "https://www.miamidade.gov/propertysearch/".to_string(),
            search_terms: SearchTerms {
                hoa: terms(&["HOA", "Homeowners Association", "Community Association"]),
                property_management: terms(&["Property Management", "Rental Management"]),
            },
            selectors: Some(Selectors {
                results_list: Some(".results-list".to_string()),
                result_info: Some(".property-record".to_string()),
                pagination_next: Some(".next-page".to_string()),
            }),
            special_type: None,
        },
        SourceDescriptor {
            name: "Florida DBPR - Business & Professional Regulation".to_string(),
            region: "all".to_string(),
            source_type: "dbpr".to_string(),
            entity_type: EntityKind::PropertyManagement,
            url: "https://www.myfloridalicense.com/wl11.asp".to_string(),
            search_terms: SearchTerms {
                hoa: Vec::new(),
                property_management: terms(&[
                    "Community Association Manager",
                    "Property Manager",
                    "Property Management",
                ]),
            },
            selectors: None,
            special_type: Some("paginatedList".to_string()),
        },
        SourceDescriptor {
            name: "CAI Directory".to_string(),
            region: "all".to_string(),
            source_type: "directories".to_string(),
            entity_type: EntityKind::Both,
            url: "https://www.caionline.org/pages/default.aspx".to_string(),
            search_terms: SearchTerms {
                hoa: terms(&["Florida", "Broward", "Miami-Dade"]),
                property_management: terms(&["Property Management Florida", "CAM Florida"]),
            },
            selectors: Some(Selectors {
                results_list: Some(".directory-results".to_string()),
                result_info: Some(".directory-listing".to_string()),
                pagination_next: Some(".pagination-next".to_string()),
            }),
            special_type: Some("directoryListing".to_string()),
        },
        SourceDescriptor {
            name: "FindHOA.com".to_string(),
            region: "all".to_string(),
            source_type: "thirdParty".to_string(),
            entity_type: EntityKind::Hoa,
            url: "https://www.findhoa.com".to_string(),
            search_terms: SearchTerms {
                hoa: terms(&["Florida", "Broward", "Miami-Dade", "Miami"]),
                property_management: Vec::new(),
            },
            selectors: None,
            special_type: Some("paginatedList".to_string()),
        },
        SourceDescriptor {
            name: "All Property Management".to_string(),
            region: "all".to_string(),
            source_type: "thirdParty".to_string(),
            entity_type: EntityKind::PropertyManagement,
            url: "https://www.allpropertymanagement.com".to_string(),
            search_terms: SearchTerms {
                hoa: Vec::new(),
                property_management: terms(&[
                    "Fort Lauderdale, FL",
                    "Miami, FL",
                    "Hollywood, FL",
                ]),
            },
            selectors: None,
            special_type: Some("paginatedList".to_string()),
        },
        SourceDescriptor {
            name: "Google Maps - HOAs".to_string(),
            region: "all".to_string(),
            source_type: "googleMaps".to_string(),
            entity_type: EntityKind::Hoa,
            url: "https://www.google.com/maps".to_string(),
            search_terms: SearchTerms {
                hoa: terms(&[
                    "homeowners association broward county",
                    "hoa miami-dade county",
                    "condominium association fort lauderdale",
                ]),
                property_management: Vec::new(),
            },
            selectors: None,
            special_type: Some("mapSearch".to_string()),
        },
        SourceDescriptor {
            name: "Google Maps - Property Management".to_string(),
            region: "all".to_string(),
            source_type: "googleMaps".to_string(),
            entity_type: EntityKind::PropertyManagement,
            url: "https://www.google.com/maps".to_string(),
            search_terms: SearchTerms {
                hoa: Vec::new(),
                property_management: terms(&[
                    "property management companies broward county",
                    "property managers miami-dade county",
                    "property management fort lauderdale",
                ]),
            },
            selectors: None,
            special_type: Some("mapSearch".to_string()),
        },
        SourceDescriptor {
            name: "Yelp - HOAs".to_string(),
            region: "all".to_string(),
            source_type: "yelpPages".to_string(),
            entity_type: EntityKind::Hoa,
            url: "https://www.yelp.com".to_string(),
            search_terms: SearchTerms {
                hoa: terms(&["homeowners association broward", "hoa miami-dade"]),
                property_management: Vec::new(),
            },
            selectors: None,
            special_type: Some("directoryListing".to_string()),
        },
        SourceDescriptor {
            name: "Yelp - Property Management".to_string(),
            region: "all".to_string(),
            source_type: "yelpPages".to_string(),
            entity_type: EntityKind::PropertyManagement,
            url: "https://www.yelp.com".to_string(),
            search_terms: SearchTerms {
                hoa: Vec::new(),
                property_management: terms(&[
                    "property management fort lauderdale",
                    "property management miami",
                ]),
            },
            selectors: None,
            special_type: Some("directoryListing".to_string()),
        },
        SourceDescriptor {
            name: "Miami Association of Realtors".to_string(),
            region: "dade".to_string(),
            source_type: "realEstateBoards".to_string(),
            entity_type: EntityKind::PropertyManagement,
            url: "https://www.miamirealtors.com/property-management/".to_string(),
            search_terms: SearchTerms::default(),
            selectors: None,
            special_type: None,
        },
        SourceDescriptor {
            name: "Greater Miami Chamber of Commerce".to_string(),
            region: "miami".to_string(),
            source_type: "chamberOfCommerce".to_string(),
            entity_type: EntityKind::Both,
            url: "https://www.miamichamber.com/membership/member-directory".to_string(),
            search_terms: SearchTerms::default(),
            selectors: None,
            special_type: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, region: &str, source_type: &str, kind: EntityKind) -> SourceDescriptor {
        SourceDescriptor {
            name: name.to_string(),
            region: region.to_string(),
            source_type: source_type.to_string(),
            entity_type: kind,
            url: "https://example.com".to_string(),
            search_terms: SearchTerms::default(),
            selectors: None,
            special_type: None,
        }
    }

    #[test]
    fn selection_preserves_catalog_order() {
        let catalog = vec![
            descriptor("a", "all", "directories", EntityKind::Hoa),
            descriptor("b", "broward", "directories", EntityKind::Both),
            descriptor("c", "all", "directories", EntityKind::PropertyManagement),
        ];
        let selected = enabled_sources(&catalog, &Config::default());
        let names: Vec<&str> = selected.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn disabled_source_type_never_passes() {
        let catalog = vec![
            descriptor("a", "all", "dbpr", EntityKind::Both),
            descriptor("b", "all", "directories", EntityKind::Both),
        ];
        let config = Config::default(); // dbpr disabled by default
        let selected = enabled_sources(&catalog, &config);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "b");
    }

    #[test]
    fn region_all_ignores_the_regions_map() {
        let mut config = Config::default();
        config.regions.insert("broward".to_string(), false);
        config.regions.insert("dade".to_string(), false);
        config.regions.insert("miami".to_string(), false);
        let catalog = vec![
            descriptor("everywhere", "all", "directories", EntityKind::Hoa),
            descriptor("local", "broward", "directories", EntityKind::Hoa),
        ];
        let selected = enabled_sources(&catalog, &config);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "everywhere");
    }

    #[test]
    fn entity_type_must_intersect_enabled_types() {
        let mut config = Config::default();
        config.entity_types.hoa = false;
        let catalog = vec![
            descriptor("hoa-only", "all", "directories", EntityKind::Hoa),
            descriptor("pm-only", "all", "directories", EntityKind::PropertyManagement),
            descriptor("both", "all", "directories", EntityKind::Both),
        ];
        let selected = enabled_sources(&catalog, &config);
        let names: Vec<&str> = selected.iter().map(|s| s.name.as_str()).collect();
        // `both` passes as long as one entity type remains enabled
        assert_eq!(names, vec!["pm-only", "both"]);

        config.entity_types.property_management = false;
        assert!(enabled_sources(&catalog, &config).is_empty());
    }

    #[test]
    fn unknown_source_type_is_treated_as_disabled() {
        let catalog = vec![descriptor("a", "all", "somethingNew", EntityKind::Hoa)];
        assert!(enabled_sources(&catalog, &Config::default()).is_empty());
    }

    #[test]
    fn both_sources_chain_hoa_terms_before_pm_terms() {
        let st = SearchTerms {
            hoa: terms(&["one"]),
            property_management: terms(&["two"]),
        };
        assert_eq!(st.for_kind(EntityKind::Both), vec!["one", "two"]);
        assert_eq!(st.for_kind(EntityKind::Hoa), vec!["one"]);
    }

    #[test]
    fn builtin_catalog_descriptors_are_well_formed() {
        for source in builtin_catalog() {
            assert!(!source.name.is_empty());
            assert!(!source.source_type.is_empty());
            assert!(source.url.starts_with("http"));
        }
    }
}
