//! Page data loading for Fernweh.
//!
//! One loader per route of the site: home (places + introduction),
//! chronological list, map, and a single place by slug. Loaders are
//! fail-open the way the rendering layer expects: a fetch error degrades
//! to empty data and shows up in the logs, never as a panic or an error
//! page for content that could still render.

mod pages;

pub use pages::{HomeData, Pages, PlaceView, find_by_slug, render_story};
