//! View models built from backend stories.
//!
//! Everything here is a pure function of the story data; templates only
//! iterate and print.

use crate::model::{Article, Story, StoryId, StoryImage};

pub const FALLBACK_LOGO: &str = "/static/logo.svg";

/// Expand state of one story card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardState {
    #[default]
    Collapsed,
    Expanded,
}

impl CardState {
    pub fn from_expanded(expanded: bool) -> Self {
        if expanded {
            CardState::Expanded
        } else {
            CardState::Collapsed
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            CardState::Collapsed => CardState::Expanded,
            CardState::Expanded => CardState::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == CardState::Expanded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Lead,
    Standard,
}

impl Presentation {
    /// The first story of a list leads, the rest are standard.
    pub fn for_position(index: usize) -> Self {
        if index == 0 {
            Presentation::Lead
        } else {
            Presentation::Standard
        }
    }

    pub fn from_lead(lead: bool) -> Self {
        if lead {
            Presentation::Lead
        } else {
            Presentation::Standard
        }
    }

    pub fn is_lead(self) -> bool {
        self == Presentation::Lead
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
    pub is_fallback: bool,
}

impl ImageView {
    fn for_story(story: &Story) -> Self {
        match &story.image_article {
            Some(image) if !image.image_url.is_empty() => Self {
                src: image.image_url.clone(),
                alt: story.title.clone(),
                is_fallback: false,
            },
            _ => Self {
                src: FALLBACK_LOGO.to_string(),
                alt: "logo".to_string(),
                is_fallback: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLine {
    pub label: String,
    pub url: String,
}

impl From<&Article> for ArticleLine {
    fn from(article: &Article) -> Self {
        let label = match article.source_name() {
            Some(source) => format!("{} - {}", source, article.title),
            None => article.title.clone(),
        };
        Self {
            label,
            url: article.url.clone(),
        }
    }
}

/// One story card. Collapsed and expanded cards share every field except
/// `state`, so both render from the same body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: StoryId,
    pub title: String,
    pub source_count: usize,
    pub sentences: Vec<String>,
    pub articles: Vec<ArticleLine>,
    pub image: ImageView,
    pub presentation: Presentation,
    pub state: CardState,
}

impl CardView {
    pub fn new(story: &Story, presentation: Presentation, state: CardState) -> Self {
        Self {
            id: story.id,
            title: story.title.clone(),
            source_count: story.source_count(),
            sentences: story.summary_sentences(),
            articles: story.articles.iter().map(ArticleLine::from).collect(),
            image: ImageView::for_story(story),
            presentation,
            state,
        }
    }

    pub fn toggled(&self) -> Self {
        Self {
            state: self.state.toggle(),
            ..self.clone()
        }
    }

    pub fn is_lead(&self) -> bool {
        self.presentation.is_lead()
    }

    pub fn is_expanded(&self) -> bool {
        self.state.is_expanded()
    }

    /// Whether a click on this card should ask for the expanded fragment.
    pub fn toggle_expanded(&self) -> bool {
        self.state.toggle().is_expanded()
    }

    pub fn css_class(&self) -> &'static str {
        match (self.presentation, self.state) {
            (Presentation::Lead, CardState::Collapsed) => "card lead collapsed",
            (Presentation::Lead, CardState::Expanded) => "card lead expanded",
            (Presentation::Standard, CardState::Collapsed) => "card standard collapsed",
            (Presentation::Standard, CardState::Expanded) => "card standard expanded",
        }
    }
}

/// Cards for an ordered story collection, all collapsed.
pub fn story_list(stories: &[Story]) -> Vec<CardView> {
    stories
        .iter()
        .enumerate()
        .map(|(index, story)| {
            CardView::new(story, Presentation::for_position(index), CardState::Collapsed)
        })
        .collect()
}

/// One source article on the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    pub title: String,
    pub subtitle: Option<String>,
    pub url: String,
    pub provider_name: String,
    /// Provider homepage, or the article itself when the provider has none
    pub provider_link: String,
    pub favicon_url: Option<String>,
    pub date: Option<String>,
}

impl From<&Article> for ArticleView {
    fn from(article: &Article) -> Self {
        let provider = article.provider.as_ref();
        Self {
            title: article.title.clone(),
            subtitle: article.subtitle.clone().filter(|s| !s.is_empty()),
            url: article.url.clone(),
            provider_name: article.source_name().unwrap_or("Unknown source").to_string(),
            provider_link: article
                .provider_url
                .clone()
                .or_else(|| provider.and_then(|p| p.url.clone()))
                .unwrap_or_else(|| article.url.clone()),
            favicon_url: provider.and_then(|p| p.favicon_url.clone()),
            date: article.display_date(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    pub url: String,
    pub favicon_url: String,
    pub article_url: String,
}

/// A summary image, or the reason it can't be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageBlock {
    Ready(ImageLink),
    Missing(&'static str),
}

impl ImageBlock {
    pub fn from_image(image: &StoryImage) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        let Some(url) = non_empty(&image.url) else {
            return ImageBlock::Missing("No image URL available");
        };
        let Some(favicon_url) = non_empty(&image.provider.as_ref().and_then(|p| p.favicon_url.clone()))
        else {
            return ImageBlock::Missing("No favicon available");
        };
        let Some(article_url) = non_empty(&image.article_url) else {
            return ImageBlock::Missing("No article URL available");
        };

        ImageBlock::Ready(ImageLink {
            url,
            favicon_url,
            article_url,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryBlock {
    Sentence(String),
    Image(ImageBlock),
}

/// Summary sentences with the first image after sentence 0 and the second
/// after sentence 2.
pub fn summary_blocks(sentences: &[String], images: &[StoryImage]) -> Vec<SummaryBlock> {
    let mut blocks = Vec::with_capacity(sentences.len() + 2);
    for (index, sentence) in sentences.iter().enumerate() {
        blocks.push(SummaryBlock::Sentence(sentence.clone()));
        let image = match index {
            0 => images.first(),
            2 => images.get(1),
            _ => None,
        };
        if let Some(image) = image {
            blocks.push(SummaryBlock::Image(ImageBlock::from_image(image)));
        }
    }
    blocks
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: StoryId,
    pub title: String,
    pub blocks: Vec<SummaryBlock>,
    pub coverage: Option<Vec<String>>,
    pub articles: Vec<ArticleView>,
}

impl From<&Story> for DetailView {
    fn from(story: &Story) -> Self {
        let coverage = story
            .coverage
            .as_ref()
            .map(|c| c.to_sentences())
            .filter(|sentences| !sentences.is_empty());

        Self {
            id: story.id,
            title: story.title.clone(),
            blocks: summary_blocks(&story.summary_sentences(), &story.images),
            coverage,
            articles: story.articles.iter().map(ArticleView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(json: &str) -> Story {
        serde_json::from_str(json).unwrap()
    }

    fn numbered_stories(n: usize) -> Vec<Story> {
        (0..n)
            .map(|i| story(&format!(r#"{{"id": {}, "title": "Story {}"}}"#, i + 1, i + 1)))
            .collect()
    }

    fn image(url: Option<&str>, favicon: Option<&str>, article: Option<&str>) -> StoryImage {
        StoryImage {
            url: url.map(String::from),
            article_url: article.map(String::from),
            provider: Some(crate::model::Provider {
                name: "P".to_string(),
                url: None,
                favicon_url: favicon.map(String::from),
            }),
        }
    }

    mod card_state_tests {
        use super::*;

        #[test]
        fn test_initial_state_collapsed() {
            assert_eq!(CardState::default(), CardState::Collapsed);
        }

        #[test]
        fn test_double_toggle_is_identity() {
            for state in [CardState::Collapsed, CardState::Expanded] {
                assert_eq!(state.toggle().toggle(), state);
                assert_ne!(state.toggle(), state);
            }
        }

        #[test]
        fn test_from_expanded() {
            assert_eq!(CardState::from_expanded(true), CardState::Expanded);
            assert_eq!(CardState::from_expanded(false), CardState::Collapsed);
        }
    }

    mod story_list_tests {
        use super::*;

        #[test]
        fn test_lead_then_standard() {
            let cards = story_list(&numbered_stories(5));
            assert_eq!(cards.len(), 5);
            assert_eq!(cards[0].presentation, Presentation::Lead);
            for card in &cards[1..] {
                assert_eq!(card.presentation, Presentation::Standard);
            }
            assert!(cards.iter().all(|c| c.state == CardState::Collapsed));
        }

        #[test]
        fn test_order_preserved() {
            let cards = story_list(&numbered_stories(3));
            let ids: Vec<_> = cards.iter().map(|c| c.id).collect();
            assert_eq!(ids, vec![1, 2, 3]);
        }

        #[test]
        fn test_single_story_is_lead() {
            let cards = story_list(&numbered_stories(1));
            assert!(cards[0].is_lead());
        }

        #[test]
        fn test_empty_list() {
            assert!(story_list(&[]).is_empty());
        }
    }

    mod card_view_tests {
        use super::*;

        #[test]
        fn test_fallback_logo_without_image_article() {
            let card = CardView::new(
                &story(r#"{"id": 1, "title": "No image"}"#),
                Presentation::Standard,
                CardState::Collapsed,
            );
            assert!(card.image.is_fallback);
            assert_eq!(card.image.src, FALLBACK_LOGO);
        }

        #[test]
        fn test_image_article_used() {
            let card = CardView::new(
                &story(r#"{"id": 1, "title": "Pic", "image_article": {"image_url": "https://img.example/a.jpg"}}"#),
                Presentation::Lead,
                CardState::Collapsed,
            );
            assert!(!card.image.is_fallback);
            assert_eq!(card.image.src, "https://img.example/a.jpg");
            assert_eq!(card.image.alt, "Pic");
        }

        #[test]
        fn test_toggle_points_to_opposite_state() {
            let story = story(r#"{"id": 9, "title": "T"}"#);
            let card = CardView::new(&story, Presentation::Lead, CardState::Collapsed);
            assert!(card.toggle_expanded());
            assert!(!card.toggled().toggle_expanded());
            assert!(card.toggled().is_lead());
            assert_eq!(card.toggled().toggled(), card);
        }

        #[test]
        fn test_article_lines() {
            let card = CardView::new(
                &story(
                    r#"{"id": 1, "title": "T", "articles": [
                        {"title": "A", "url": "https://a.example", "feed": "BBC"},
                        {"title": "B", "url": "https://b.example"}
                    ]}"#,
                ),
                Presentation::Standard,
                CardState::Expanded,
            );
            assert_eq!(card.articles[0].label, "BBC - A");
            assert_eq!(card.articles[1].label, "B");
            assert_eq!(card.css_class(), "card standard expanded");
        }
    }

    mod detail_tests {
        use super::*;

        fn sentences(n: usize) -> Vec<String> {
            (0..n).map(|i| format!("Sentence {i}.")).collect()
        }

        #[test]
        fn test_images_after_first_and_third_sentence() {
            let images = vec![
                image(Some("https://i/1"), Some("https://f/1"), Some("https://a/1")),
                image(Some("https://i/2"), Some("https://f/2"), Some("https://a/2")),
            ];
            let blocks = summary_blocks(&sentences(4), &images);

            assert_eq!(blocks.len(), 6);
            assert!(matches!(blocks[1], SummaryBlock::Image(ImageBlock::Ready(ref link)) if link.url == "https://i/1"));
            assert!(matches!(blocks[4], SummaryBlock::Image(ImageBlock::Ready(ref link)) if link.url == "https://i/2"));
        }

        #[test]
        fn test_single_image() {
            let images = vec![image(Some("https://i/1"), Some("https://f/1"), Some("https://a/1"))];
            let blocks = summary_blocks(&sentences(4), &images);
            assert_eq!(blocks.len(), 5);
        }

        #[test]
        fn test_short_summary_skips_second_image() {
            let images = vec![
                image(Some("https://i/1"), Some("https://f/1"), Some("https://a/1")),
                image(Some("https://i/2"), Some("https://f/2"), Some("https://a/2")),
            ];
            let blocks = summary_blocks(&sentences(2), &images);
            assert_eq!(blocks.len(), 3);
        }

        #[test]
        fn test_incomplete_images() {
            assert_eq!(
                ImageBlock::from_image(&image(None, Some("f"), Some("a"))),
                ImageBlock::Missing("No image URL available")
            );
            assert_eq!(
                ImageBlock::from_image(&image(Some("u"), None, Some("a"))),
                ImageBlock::Missing("No favicon available")
            );
            assert_eq!(
                ImageBlock::from_image(&image(Some("u"), Some("f"), Some(""))),
                ImageBlock::Missing("No article URL available")
            );
        }

        #[test]
        fn test_coverage_absent_or_empty() {
            let view = DetailView::from(&story(r#"{"id": 1, "title": "T"}"#));
            assert!(view.coverage.is_none());

            let view = DetailView::from(&story(r#"{"id": 1, "title": "T", "coverage": ""}"#));
            assert!(view.coverage.is_none());

            let view = DetailView::from(&story(
                r#"{"id": 1, "title": "T", "coverage": ["Left says X.", "Right says Y."]}"#,
            ));
            assert_eq!(view.coverage.unwrap().len(), 2);
        }

        #[test]
        fn test_article_view_fields() {
            let view = DetailView::from(&story(
                r#"{"id": 1, "title": "T", "articles": [{
                    "title": "Headline",
                    "subtitle": "",
                    "url": "https://news.example/a",
                    "provider": {"name": "News", "url": "https://news.example", "favicon_url": "https://news.example/f.ico"},
                    "ts": 1733745600000
                }]}"#,
            ));
            let article = &view.articles[0];
            assert_eq!(article.provider_name, "News");
            assert_eq!(article.provider_link, "https://news.example");
            assert_eq!(article.favicon_url.as_deref(), Some("https://news.example/f.ico"));
            assert_eq!(article.subtitle, None);
            assert_eq!(article.date.as_deref(), Some("Monday 9 December 2024"));
        }

        #[test]
        fn test_provider_link_falls_back_to_article() {
            let view = DetailView::from(&story(
                r#"{"id": 1, "title": "T", "articles": [{"title": "a", "url": "https://x.example/a", "feed": "X"}]}"#,
            ));
            let article = &view.articles[0];
            assert_eq!(article.provider_link, "https://x.example/a");
            assert_eq!(article.provider_name, "X");
            assert_eq!(article.favicon_url, None);
        }
    }
}
