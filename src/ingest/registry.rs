// src/ingest/registry.rs
//! Built-in feed table: roughly two outlets per monitored country.
//! Can be replaced at startup via `ingest::config` (see `NEWS_FEEDS_PATH`).

use super::types::FeedDescriptor;

/// `(name, url, country, region, language)`
const FEEDS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Reuters (US)",
        "https://news.google.com/rss/search?q=when:24h+source:Reuters&hl=en-US&gl=US&ceid=US:en",
        "USA",
        "Americas",
        "English",
    ),
    (
        "Associated Press",
        "https://news.google.com/rss/search?q=when:24h+source:Associated+Press&hl=en-US&gl=US&ceid=US:en",
        "USA",
        "Americas",
        "English",
    ),
    (
        "China Daily",
        "https://news.google.com/rss/search?q=when:24h+source:China+Daily&hl=en-US&gl=US&ceid=US:en",
        "China",
        "Asia-Pacific",
        "English",
    ),
    (
        "CGTN",
        "https://news.google.com/rss/search?q=site:cgtn.com+when:24h&hl=en-US&gl=US&ceid=US:en",
        "China",
        "Asia-Pacific",
        "English",
    ),
    (
        "BBC News",
        "http://feeds.bbci.co.uk/news/world/rss.xml",
        "UK",
        "Europe",
        "English",
    ),
    (
        "Reuters (UK)",
        "https://news.google.com/rss/search?q=when:24h+source:Reuters&hl=en-GB&gl=GB&ceid=GB:en",
        "UK",
        "Europe",
        "English",
    ),
    (
        "TASS",
        "https://tass.com/rss/v2.xml",
        "Russia",
        "Europe",
        "English",
    ),
    (
        "RT",
        "https://www.rt.com/rss/",
        "Russia",
        "Europe",
        "English",
    ),
    (
        "ABC News",
        "https://news.google.com/rss/search?q=site:abc.net.au+when:24h&hl=en-AU&gl=AU&ceid=AU:en",
        "Australia",
        "Oceania",
        "English",
    ),
    (
        "Sydney Morning Herald",
        "https://news.google.com/rss/search?q=site:smh.com.au+when:24h&hl=en-AU&gl=AU&ceid=AU:en",
        "Australia",
        "Oceania",
        "English",
    ),
    (
        "9News",
        "https://news.google.com/rss/search?q=site:9news.com.au+when:24h&hl=en-AU&gl=AU&ceid=AU:en",
        "Australia",
        "Oceania",
        "English",
    ),
    (
        "RNZ",
        "https://www.rnz.co.nz/rss/world.xml",
        "New Zealand",
        "Oceania",
        "English",
    ),
    (
        "NZ Herald",
        "https://news.google.com/rss/search?q=site:nzherald.co.nz+when:24h&hl=en-NZ&gl=NZ&ceid=NZ:en",
        "New Zealand",
        "Oceania",
        "English",
    ),
    (
        "Reuters (Africa)",
        "https://news.google.com/rss/search?q=when:24h+source:Reuters&hl=en-ZA&gl=ZA&ceid=ZA:en",
        "South Africa",
        "Africa",
        "English",
    ),
    (
        "News24",
        "https://news.google.com/rss/search?q=site:news24.com+when:24h&hl=en-ZA&gl=ZA&ceid=ZA:en",
        "South Africa",
        "Africa",
        "English",
    ),
    (
        "Ethiopia News",
        "https://news.google.com/rss/search?q=Ethiopia+when:24h&hl=en-US&gl=US&ceid=US:en",
        "Ethiopia",
        "Africa",
        "English",
    ),
    (
        "Addis Standard",
        "https://news.google.com/rss/search?q=site:addisstandard.com+when:24h&hl=en-US&gl=US&ceid=US:en",
        "Ethiopia",
        "Africa",
        "English",
    ),
    (
        "Al Jazeera",
        "https://www.aljazeera.com/xml/rss/all.xml",
        "Qatar",
        "Middle East",
        "English",
    ),
    (
        "Gulf Times",
        "https://news.google.com/rss/search?q=site:gulf-times.com+when:24h&hl=en-US&gl=US&ceid=US:en",
        "Qatar",
        "Middle East",
        "English",
    ),
    (
        "Reuters (Mexico)",
        "https://news.google.com/rss/search?q=when:24h+source:Reuters&hl=es-MX&gl=MX&ceid=MX:es",
        "Mexico",
        "Americas",
        "Spanish",
    ),
    (
        "El Universal",
        "https://news.google.com/rss/search?q=site:eluniversal.com.mx+when:24h&hl=es-MX&gl=MX&ceid=MX:es",
        "Mexico",
        "Americas",
        "Spanish",
    ),
    (
        "AFP",
        "https://news.google.com/rss/search?q=when:24h+source:AFP&hl=en-US&gl=US&ceid=US:en",
        "France",
        "Europe",
        "English",
    ),
    (
        "France 24",
        "https://www.france24.com/en/rss",
        "France",
        "Europe",
        "English",
    ),
    (
        "Reuters (Nigeria)",
        "https://news.google.com/rss/search?q=when:24h+source:Reuters+Nigeria&hl=en-NG&gl=NG&ceid=NG:en",
        "Nigeria",
        "Africa",
        "English",
    ),
    (
        "Premium Times",
        "https://www.premiumtimesng.com/feed",
        "Nigeria",
        "Africa",
        "English",
    ),
    (
        "Reuters (Brazil)",
        "https://news.google.com/rss/search?q=when:24h+source:Reuters&hl=pt-BR&gl=BR&ceid=BR:pt",
        "Brazil",
        "Americas",
        "Portuguese",
    ),
    (
        "Folha de S.Paulo",
        "https://feeds.folha.uol.com.br/mundo/rss091.xml",
        "Brazil",
        "Americas",
        "Portuguese",
    ),
    (
        "Anadolu Agency",
        "https://news.google.com/rss/search?q=site:aa.com.tr+when:24h&hl=en-US&gl=US&ceid=US:en",
        "Turkey",
        "Middle East",
        "English",
    ),
    (
        "Daily Sabah",
        "https://news.google.com/rss/search?q=site:dailysabah.com+when:24h&hl=en-US&gl=US&ceid=US:en",
        "Turkey",
        "Middle East",
        "English",
    ),
    (
        "Antara News",
        "https://news.google.com/rss/search?q=site:antaranews.com+when:24h&hl=en-ID&gl=ID&ceid=ID:en",
        "Indonesia",
        "Asia-Pacific",
        "English",
    ),
    (
        "Jakarta Post",
        "https://news.google.com/rss/search?q=site:thejakartapost.com+when:24h&hl=en-ID&gl=ID&ceid=ID:en",
        "Indonesia",
        "Asia-Pacific",
        "English",
    ),
    (
        "Reuters (India)",
        "https://news.google.com/rss/search?q=when:24h+source:Reuters&hl=en-IN&gl=IN&ceid=IN:en",
        "India",
        "Asia-Pacific",
        "English",
    ),
    (
        "The Hindu",
        "https://news.google.com/rss/search?q=site:thehindu.com+when:24h&hl=en-IN&gl=IN&ceid=IN:en",
        "India",
        "Asia-Pacific",
        "English",
    ),
    (
        "Dawn",
        "https://www.dawn.com/feeds/home",
        "Pakistan",
        "Asia-Pacific",
        "English",
    ),
    (
        "Reuters (Pakistan)",
        "https://news.google.com/rss/search?q=when:24h+source:Reuters&hl=en-PK&gl=PK&ceid=PK:en",
        "Pakistan",
        "Asia-Pacific",
        "English",
    ),
    (
        "Kyodo News",
        "https://news.google.com/rss/search?q=site:english.kyodonews.net+when:24h&hl=en-US&gl=US&ceid=US:en",
        "Japan",
        "Asia-Pacific",
        "English",
    ),
    (
        "NHK World",
        "https://www3.nhk.or.jp/rss/news/cat0.xml",
        "Japan",
        "Asia-Pacific",
        "Japanese",
    ),
    (
        "Reuters (Middle East)",
        "https://news.google.com/rss/search?q=when:24h+source:Reuters&hl=en-IL&gl=IL&ceid=IL:en",
        "Israel",
        "Middle East",
        "English",
    ),
    (
        "Jerusalem Post",
        "https://news.google.com/rss/search?q=site:jpost.com+when:24h&hl=en-US&gl=US&ceid=US:en",
        "Israel",
        "Middle East",
        "English",
    ),
    (
        "Haaretz",
        "https://news.google.com/rss/search?q=site:haaretz.com+when:24h&hl=en-US&gl=US&ceid=US:en",
        "Israel",
        "Middle East",
        "English",
    ),
    (
        "Tehran Times",
        "https://news.google.com/rss/search?q=site:tehrantimes.com+when:24h&hl=en-US&gl=US&ceid=US:en",
        "Iran",
        "Middle East",
        "English",
    ),
    (
        "Iran News",
        "https://news.google.com/rss/search?q=Iran+when:24h&hl=en-US&gl=US&ceid=US:en",
        "Iran",
        "Middle East",
        "English",
    ),
];

/// Number of entries in the built-in table.
pub fn feed_count() -> usize {
    FEEDS.len()
}

/// Materialize the built-in table.
pub fn default_feeds() -> Vec<FeedDescriptor> {
    FEEDS
        .iter()
        .map(|(name, url, country, region, language)| {
            FeedDescriptor::new(name, url, country, region, language)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_urls_are_http() {
        let feeds = default_feeds();
        assert_eq!(feeds.len(), feed_count());
        assert!(feeds.len() >= 40);

        let names: HashSet<_> = feeds.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names.len(), feeds.len(), "duplicate feed name");
        assert!(feeds.iter().all(|f| f.url.starts_with("http")));
    }

    #[test]
    fn non_english_feeds_are_tagged() {
        let feeds = default_feeds();
        let langs: HashSet<_> = feeds.iter().map(|f| f.language.as_str()).collect();
        assert!(langs.contains("English"));
        assert!(langs.contains("Spanish"));
        assert!(langs.contains("Portuguese"));
        assert!(langs.contains("Japanese"));
    }
}
