//! Content categories and per-day archive URLs

use crate::archive::day::Day;
use crate::Result;
use std::fmt;
use url::Url;

/// Content category of the release archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Anekdot,
    Story,
    Aphorism,
    Poems,
}

impl Category {
    /// Every category, in crawl order
    pub const ALL: [Category; 4] = [
        Category::Anekdot,
        Category::Story,
        Category::Aphorism,
        Category::Poems,
    ];

    /// Path token used by the site
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anekdot => "anekdot",
            Self::Story => "story",
            Self::Aphorism => "aphorism",
            Self::Poems => "poems",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First archive page of one category on one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUrl {
    pub category: Category,
    pub day: Day,
    pub url: Url,
}

/// Builds one base URL per category for `day`
///
/// "Base" means page one: further pagination pages are discovered from it.
/// URLs follow `{site}/release/{category}/day/{day}/` and come back in
/// [`Category::ALL`] order.
///
/// # Errors
///
/// * `CrawlerError::DayFormat` - `day` fails the `YYYY-MM-DD` shape check
/// * `CrawlerError::UrlParse` - the joined URL is invalid
pub fn category_urls(day: &str, site_root: &Url) -> Result<Vec<CategoryUrl>> {
    let day = Day::parse(day)?;

    Category::ALL
        .iter()
        .map(|category| -> Result<CategoryUrl> {
            let url = site_root.join(&format!("release/{}/day/{}/", category, day))?;
            Ok(CategoryUrl {
                category: *category,
                day: day.clone(),
                url,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CrawlerError;

    fn site_root() -> Url {
        Url::parse("https://www.anekdot.ru/").unwrap()
    }

    #[test]
    fn test_one_url_per_category() {
        let urls = category_urls("2020-05-17", &site_root()).unwrap();
        assert_eq!(urls.len(), Category::ALL.len());

        for (built, category) in urls.iter().zip(Category::ALL.iter()) {
            assert_eq!(built.category, *category);
            let segments: Vec<&str> = built.url.path_segments().unwrap().collect();
            assert!(segments.contains(&"2020-05-17"));
            assert!(segments.contains(&category.as_str()));
        }
    }

    #[test]
    fn test_url_scheme() {
        let urls = category_urls("1995-11-08", &site_root()).unwrap();
        let rendered: Vec<&str> = urls.iter().map(|u| u.url.as_str()).collect();
        assert_eq!(
            rendered,
            vec![
                "https://www.anekdot.ru/release/anekdot/day/1995-11-08/",
                "https://www.anekdot.ru/release/story/day/1995-11-08/",
                "https://www.anekdot.ru/release/aphorism/day/1995-11-08/",
                "https://www.anekdot.ru/release/poems/day/1995-11-08/",
            ]
        );
    }

    #[test]
    fn test_custom_site_root() {
        let root = Url::parse("http://127.0.0.1:8080/mirror/").unwrap();
        let urls = category_urls("2001-01-01", &root).unwrap();
        assert_eq!(
            urls[1].url.as_str(),
            "http://127.0.0.1:8080/mirror/release/story/day/2001-01-01/"
        );
    }

    #[test]
    fn test_bad_day_fails_before_building() {
        let err = category_urls("2020-5-17", &site_root()).unwrap_err();
        assert!(matches!(err, CrawlerError::DayFormat { .. }));
    }

    #[test]
    fn test_pattern_only_check() {
        // Month 13 passes the shape check; the calendar check happens elsewhere
        let urls = category_urls("2020-13-01", &site_root()).unwrap();
        assert_eq!(urls.len(), 4);
    }
}
