//! Route-level data loaders.

use fernweh_cms::{CmsClient, Introduction, Place};
use fernweh_config::Config;
use fernweh_content::{ImageOptions, optimize_content, slugify};
use tracing::error;

/// Sort expression for the chronological list (newest first).
const SORT_NEWEST_FIRST: &str = "-date";

/// Data for the home page.
#[derive(Debug, Clone)]
pub struct HomeData {
    /// All published places.
    pub places: Vec<Place>,
    /// Introduction text, when the CMS has one.
    pub introduction: Option<Introduction>,
}

/// A single place prepared for rendering.
#[derive(Debug, Clone)]
pub struct PlaceView {
    /// The raw place record.
    pub place: Place,
    /// Story HTML with asset references rewritten for delivery transforms.
    pub story: String,
}

/// Page data loaders backed by the content API.
pub struct Pages {
    client: CmsClient,
    images: ImageOptions,
}

impl Pages {
    /// Create loaders from an existing client and transform options.
    #[must_use]
    pub fn new(client: CmsClient, images: ImageOptions) -> Self {
        Self { client, images }
    }

    /// Create loaders from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let images = ImageOptions {
            format: config.images.format.clone(),
            width: config.images.width.clone(),
            quality: config.images.quality.clone(),
        };
        Self::new(CmsClient::from_config(&config.api.base_url), images)
    }

    /// Home page: all published places plus the introduction.
    ///
    /// Either fetch failing degrades that part to empty data.
    pub fn home(&self) -> HomeData {
        let places = self.client.list_places(None).unwrap_or_else(|err| {
            error!("Error fetching places: {}", err);
            Vec::new()
        });
        let introduction = self.client.get_introduction().unwrap_or_else(|err| {
            error!("Error fetching introduction: {}", err);
            None
        });

        HomeData {
            places,
            introduction,
        }
    }

    /// List page: published places, newest first.
    pub fn list(&self) -> Vec<Place> {
        self.client
            .list_places(Some(SORT_NEWEST_FIRST))
            .unwrap_or_else(|err| {
                error!("Error fetching places: {}", err);
                Vec::new()
            })
    }

    /// Map page: published places in API order.
    pub fn map(&self) -> Vec<Place> {
        self.client.list_places(None).unwrap_or_else(|err| {
            error!("Error fetching places: {}", err);
            Vec::new()
        })
    }

    /// Place page: the published place whose name slugifies to `slug`,
    /// with its story rewritten for rendering.
    ///
    /// Returns `None` when no place matches or the fetch fails; the route
    /// layer turns that into a 404.
    pub fn place(&self, slug: &str) -> Option<PlaceView> {
        let places = match self.client.list_places(None) {
            Ok(places) => places,
            Err(err) => {
                error!("Error fetching place '{}': {}", slug, err);
                return None;
            }
        };

        let place = find_by_slug(&places, slug)?.clone();
        let story = render_story(&place, &self.images);
        Some(PlaceView { place, story })
    }
}

/// Find the place whose name slugifies to `slug`.
#[must_use]
pub fn find_by_slug<'a>(places: &'a [Place], slug: &str) -> Option<&'a Place> {
    places.iter().find(|place| slugify(&place.name) == slug)
}

/// Rewrite a place's story HTML for rendering.
#[must_use]
pub fn render_story(place: &Place, images: &ImageOptions) -> String {
    optimize_content(&place.story, images)
}

#[cfg(test)]
mod tests {
    use fernweh_cms::GeoPoint;
    use pretty_assertions::assert_eq;

    use super::*;

    fn place(id: i64, name: &str, story: &str) -> Place {
        Place {
            id,
            status: "published".to_owned(),
            name: name.to_owned(),
            date: "2024-06-14".to_owned(),
            point: GeoPoint {
                point_type: "Point".to_owned(),
                coordinates: [9.257, 45.986],
            },
            thumbnail: "0bd9c7a2".to_owned(),
            story: story.to_owned(),
        }
    }

    #[test]
    fn test_find_by_slug_matches_name() {
        let places = vec![
            place(1, "Lago di Como", ""),
            place(2, "Cap d'Agde", ""),
        ];
        assert_eq!(find_by_slug(&places, "cap-dagde").map(|p| p.id), Some(2));
        assert_eq!(find_by_slug(&places, "lago-di-como").map(|p| p.id), Some(1));
    }

    #[test]
    fn test_find_by_slug_unknown_is_none() {
        let places = vec![place(1, "Lago di Como", "")];
        assert!(find_by_slug(&places, "somewhere-else").is_none());
    }

    #[test]
    fn test_find_by_slug_empty_list() {
        assert!(find_by_slug(&[], "anything").is_none());
    }

    #[test]
    fn test_render_story_rewrites_asset_images() {
        let p = place(1, "Lago di Como", r#"<p>Boat.</p><img src="/assets/a.jpg">"#);
        assert_eq!(
            render_story(&p, &ImageOptions::default()),
            r#"<p>Boat.</p><img src="/assets/a.jpg?format=webp&width=800&quality=100">"#
        );
    }

    #[test]
    fn test_render_story_leaves_foreign_images() {
        let p = place(1, "Lago di Como", r#"<img src="https://other.example.com/x.jpg">"#);
        assert_eq!(
            render_story(&p, &ImageOptions::default()),
            r#"<img src="https://other.example.com/x.jpg">"#
        );
    }

    #[test]
    fn test_render_story_empty() {
        let p = place(1, "Lago di Como", "");
        assert_eq!(render_story(&p, &ImageOptions::default()), "");
    }
}
