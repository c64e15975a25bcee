//! Content post-processing for Fernweh.
//!
//! Stories arrive from the CMS as opaque HTML strings whose embedded images
//! point at the managed asset directory. This crate rewrites those image
//! references to request delivery-side transforms (format, width, quality)
//! and derives URL-safe slugs from place names for routing.
//!
//! Both transforms are pure, synchronous and fail-open: a URL that cannot
//! be parsed is passed through unchanged and the failure is only visible in
//! the logs, never to the caller.

mod images;
mod slug;

pub use images::{ASSET_PATH_MARKER, ImageOptions, optimize_content, optimize_image_url};
pub use slug::slugify;
