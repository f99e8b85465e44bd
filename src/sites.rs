//! Static site configuration registry.
//!
//! Site-specific behavior is encoded as data rather than per-site types: each
//! source carries the CSS selectors used for link discovery and content
//! extraction, so a single scraping code path serves every selector-driven
//! site. Radio-Canada pages have no stable markup and use a fallback-selector
//! variant instead (see [`crate::scrapers::radio_canada`]).
//!
//! The registry is built once at first use and never mutated.

use once_cell::sync::Lazy;

/// Selector rules for a selector-driven site.
#[derive(Debug, Clone)]
pub struct SelectorRules {
    /// Matches the listing-page elements that wrap one article teaser each.
    pub article_selector: &'static str,
    /// Matches the headline inside a teaser (and, broadened, on the article
    /// page during title recovery).
    pub title_selector: &'static str,
    /// Matches the single container holding the article body.
    pub content_container: &'static str,
    /// Matches the paragraph-level nodes inside the container.
    pub content_selector: &'static str,
    /// Sub-elements stripped from the container before text extraction
    /// (captions, share widgets, ads).
    pub exclude_selectors: &'static [&'static str],
}

/// How a site's pages are discovered and extracted.
#[derive(Debug, Clone)]
pub enum SiteRules {
    /// Configuration-driven extraction with fixed selectors.
    Selectors(SelectorRules),
    /// Radio-Canada variant: ordered fallback selectors, retrying fetcher.
    RadioCanada,
}

/// Immutable description of one news source.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub name: &'static str,
    /// Listing page enumerating article links.
    pub url: &'static str,
    /// Base for resolving relative article URLs.
    pub base_url: &'static str,
    /// Cap on articles taken from this site per run.
    pub max_articles: usize,
    pub rules: SiteRules,
}

impl SiteConfig {
    pub fn is_radio_canada(&self) -> bool {
        matches!(self.rules, SiteRules::RadioCanada)
    }
}

const CBC_RULES: SelectorRules = SelectorRules {
    article_selector: ".card, .contentListCard, .story",
    title_selector: "h3.headline, .headline, h3",
    content_container: ".story, article, main",
    content_selector: "p",
    exclude_selectors: &[".media-caption", ".metadata", ".social-media"],
};

const LAPRESSE_RULES: SelectorRules = SelectorRules {
    article_selector: ".headlineCard, .mainCard",
    title_selector: ".headlineCard__title, .mainCard__title",
    content_container: ".articleBody",
    content_selector: "p.paragraph",
    exclude_selectors: &[".socialShare", ".adSpotBlock", ".datewrapper"],
};

const fn cbc_section(name: &'static str, url: &'static str) -> SiteConfig {
    SiteConfig {
        name,
        url,
        base_url: "https://www.cbc.ca",
        max_articles: 18,
        rules: SiteRules::Selectors(CBC_RULES),
    }
}

const fn radio_canada_section(name: &'static str, url: &'static str) -> SiteConfig {
    SiteConfig {
        name,
        url,
        base_url: "https://ici.radio-canada.ca",
        max_articles: 15,
        rules: SiteRules::RadioCanada,
    }
}

/// Selector-driven news sources, in crawl order.
pub static NEWS_SITES: Lazy<Vec<SiteConfig>> = Lazy::new(|| {
    vec![
        cbc_section("CBC News Canada", "https://www.cbc.ca/news/canada"),
        SiteConfig {
            name: "La Presse - Actualités",
            url: "https://www.lapresse.ca/actualites/",
            base_url: "https://www.lapresse.ca",
            max_articles: 18,
            rules: SiteRules::Selectors(LAPRESSE_RULES),
        },
        SiteConfig {
            name: "La Presse - Arts",
            url: "https://www.lapresse.ca/arts/",
            base_url: "https://www.lapresse.ca",
            max_articles: 18,
            rules: SiteRules::Selectors(LAPRESSE_RULES),
        },
        SiteConfig {
            name: "Montreal Gazette",
            url: "https://www.montrealgazette.com",
            base_url: "https://www.montrealgazette.com",
            max_articles: 18,
            rules: SiteRules::Selectors(SelectorRules {
                article_selector: ".article-card, .article-teaser, .story-card",
                title_selector: ".article-title, .article-card__headline, h1, h2",
                content_container: ".article-content, .article__content, .content-story",
                content_selector: "p",
                exclude_selectors: &[".related-links", ".share-buttons", ".image-caption"],
            }),
        },
        SiteConfig {
            name: "The Guardian Environment",
            url: "https://www.theguardian.com/uk/environment",
            base_url: "https://www.theguardian.com",
            max_articles: 18,
            rules: SiteRules::Selectors(SelectorRules {
                article_selector: ".fc-item, .js-headline-text",
                title_selector: ".fc-item__title, .js-headline-text",
                content_container: ".content__article-body, .article-body-commercial-selector",
                content_selector: "p",
                exclude_selectors: &[".submeta", ".content-footer", ".block-share"],
            }),
        },
        SiteConfig {
            name: "CBC Politics",
            url: "https://www.cbc.ca/news/politics",
            base_url: "https://www.cbc.ca/",
            max_articles: 18,
            rules: SiteRules::Selectors(SelectorRules {
                article_selector: ".fc-item, .js-headline-text",
                title_selector: ".fc-item__title, .js-headline-text",
                content_container: ".content__article-body, .article-body-commercial-selector",
                content_selector: "p",
                exclude_selectors: &[".submeta", ".content-footer", ".block-share"],
            }),
        },
        cbc_section("CBC Montreal", "https://www.cbc.ca/news/canada/montreal"),
        cbc_section("CBC Windsor", "https://www.cbc.ca/news/canada/windsor"),
        cbc_section("CBC Ottawa", "https://www.cbc.ca/news/canada/ottawa"),
        cbc_section("CBC New Brunswick", "https://www.cbc.ca/news/canada/new-brunswick"),
        cbc_section("CBC Nova Scotia", "https://www.cbc.ca/news/canada/nova-scotia"),
        cbc_section("CBC North", "https://www.cbc.ca/news/canada/north"),
        SiteConfig {
            name: "Sherbrooke Record",
            url: "https://www.sherbrookerecord.com",
            base_url: "https://www.sherbrookerecord.com",
            max_articles: 18,
            rules: SiteRules::Selectors(SelectorRules {
                article_selector: ".article-card, .post",
                title_selector: ".entry-title, h1, h2",
                content_container: ".entry-content, .article-content",
                content_selector: "p",
                exclude_selectors: &[".widget", ".ad"],
            }),
        },
        SiteConfig {
            name: "Le Lac St-Jean",
            url: "https://www.lelacstjean.com",
            base_url: "https://www.lelacstjean.com",
            max_articles: 18,
            rules: SiteRules::Selectors(SelectorRules {
                article_selector: ".article-card, .post",
                title_selector: ".title, h1, h2",
                content_container: ".article-content, .post-content",
                content_selector: "p",
                exclude_selectors: &[".ad", ".widget"],
            }),
        },
        SiteConfig {
            name: "The Concordian",
            url: "https://theconcordian.com",
            base_url: "https://theconcordian.com",
            max_articles: 18,
            rules: SiteRules::Selectors(SelectorRules {
                article_selector: ".article, .post, .card",
                title_selector: ".entry-title, h1, h2",
                content_container: ".entry-content, .article-content",
                content_selector: "p",
                exclude_selectors: &[".ad", ".widget", ".sidebar"],
            }),
        },
        SiteConfig {
            name: "Quebec Chronicle-Telegraph",
            url: "https://www.qctonline.com",
            base_url: "https://www.qctonline.com",
            max_articles: 18,
            rules: SiteRules::Selectors(SelectorRules {
                article_selector: ".article, .post",
                title_selector: ".entry-title, h1, h2",
                content_container: ".entry-content, .article-content",
                content_selector: "p",
                exclude_selectors: &[".widget", ".ad"],
            }),
        },
    ]
});

/// Radio-Canada section pages, in crawl order.
pub static RADIO_CANADA_SITES: Lazy<Vec<SiteConfig>> = Lazy::new(|| {
    vec![
        radio_canada_section("Radio-Canada", "https://ici.radio-canada.ca/info"),
        radio_canada_section("Radio-Canada Quebec", "https://ici.radio-canada.ca/quebec"),
        radio_canada_section(
            "Radio-Canada Environnement",
            "https://ici.radio-canada.ca/environnement",
        ),
        radio_canada_section(
            "Radio-Canada Abitibi-Témiscamingue",
            "https://ici.radio-canada.ca/abitibi-temiscamingue",
        ),
        radio_canada_section(
            "Radio-Canada Gaspésie-Îles-de-la-Madeleine",
            "https://ici.radio-canada.ca/gaspesie-iles-de-la-madeleine",
        ),
        radio_canada_section("Radio-Canada Estrie", "https://ici.radio-canada.ca/estrie"),
        radio_canada_section(
            "Radio-Canada Grand Montréal",
            "https://ici.radio-canada.ca/grandmontreal",
        ),
        radio_canada_section("Radio-Canada Mauricie", "https://ici.radio-canada.ca/mauricie"),
        radio_canada_section("Radio-Canada Ontario", "https://ici.radio-canada.ca/ontario"),
        radio_canada_section(
            "Radio-Canada Saguenay-Lac-Saint-Jean",
            "https://ici.radio-canada.ca/saguenay-lac-saint-jean",
        ),
    ]
});

/// All configured sites in crawl order, optionally without Radio-Canada.
pub fn merged_sites(include_radio_canada: bool) -> Vec<SiteConfig> {
    let mut sites = NEWS_SITES.clone();
    if include_radio_canada {
        sites.extend(RADIO_CANADA_SITES.iter().cloned());
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn test_registry_selectors_all_parse() {
        for site in NEWS_SITES.iter() {
            let SiteRules::Selectors(rules) = &site.rules else {
                panic!("{} should be selector-driven", site.name);
            };
            for sel in [
                rules.article_selector,
                rules.title_selector,
                rules.content_container,
                rules.content_selector,
            ] {
                assert!(Selector::parse(sel).is_ok(), "{}: bad selector {sel}", site.name);
            }
            for sel in rules.exclude_selectors {
                assert!(Selector::parse(sel).is_ok(), "{}: bad selector {sel}", site.name);
            }
        }
    }

    #[test]
    fn test_merged_sites_order_and_exclusion() {
        let all = merged_sites(true);
        let without_rc = merged_sites(false);
        assert_eq!(all.len(), NEWS_SITES.len() + RADIO_CANADA_SITES.len());
        assert_eq!(without_rc.len(), NEWS_SITES.len());
        assert_eq!(all[0].name, "CBC News Canada");
        assert!(without_rc.iter().all(|s| !s.is_radio_canada()));
        assert!(all[NEWS_SITES.len()..].iter().all(|s| s.is_radio_canada()));
    }

    #[test]
    fn test_base_urls_parse() {
        for site in merged_sites(true) {
            assert!(url::Url::parse(site.base_url).is_ok(), "{}", site.name);
            assert!(url::Url::parse(site.url).is_ok(), "{}", site.name);
        }
    }

    #[test]
    fn test_article_caps() {
        for site in merged_sites(true) {
            let expected = if site.is_radio_canada() { 15 } else { 18 };
            assert_eq!(site.max_articles, expected, "{}", site.name);
        }
    }
}
