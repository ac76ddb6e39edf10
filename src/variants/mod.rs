//! Per-variant URL records and renderers
//!
//! Each variant is a record type plus a [`UrlRenderer`](crate::render::UrlRenderer)
//! selected when the generator is constructed. The type aliases pair a renderer
//! with the generic engine, e.g. [`VideoSitemapGenerator`].

pub mod code;
pub mod geo;
pub mod image;
pub mod link;
pub mod mobile;
pub mod news;
pub mod video;
pub mod web;

pub use code::{CodeFileType, CodeLicense, CodeRenderer, CodeSitemapGenerator, CodeSitemapUrl};
pub use geo::{GeoFormat, GeoRenderer, GeoSitemapGenerator, GeoSitemapUrl};
pub use image::{Image, ImageRenderer, ImageSitemapGenerator, ImageSitemapUrl};
pub use link::{LinkAlternate, LinkRenderer, LinkSitemapGenerator, LinkSitemapUrl};
pub use mobile::{MobileRenderer, MobileSitemapGenerator, MobileSitemapUrl};
pub use news::{NewsPublication, NewsRenderer, NewsSitemapGenerator, NewsSitemapUrl};
pub use video::{VideoRenderer, VideoSitemapGenerator, VideoSitemapUrl};
pub use web::{WebRenderer, WebSitemapGenerator};
