//! Markdown rendering.
//!
//! The engine renders its cleaned markup through the [`MarkdownRenderer`]
//! trait. [`Html2MdRenderer`] is the default, backed by `quick_html2md`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use quick_html2md::{html_to_markdown_with_options, MarkdownOptions};

use crate::error::{Error, Result};
use crate::options::RendererOptions;
use crate::patterns::INDENTED_FENCE;

/// HTML to markdown conversion.
///
/// `options` is the caller's pass-through map, forwarded untouched.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, html: &str, options: &RendererOptions) -> Result<String>;
}

/// Default renderer backed by `quick_html2md`.
///
/// Recognized option keys (all booleans, default `true`):
/// `include_links`, `include_images`, `preserve_tables`. The inverses
/// `ignore_links` and `ignore_images` are honored when the positive key is
/// absent. Unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html2MdRenderer;

impl MarkdownRenderer for Html2MdRenderer {
    fn render(&self, html: &str, options: &RendererOptions) -> Result<String> {
        let md_options = MarkdownOptions::new()
            .include_links(toggle(options, "include_links", "ignore_links"))
            .include_images(toggle(options, "include_images", "ignore_images"))
            .preserve_tables(flag(options, "preserve_tables").unwrap_or(true));

        catch_unwind(AssertUnwindSafe(|| {
            html_to_markdown_with_options(html, &md_options)
        }))
        .map_err(|panic| Error::Render(panic_message(panic.as_ref())))
    }
}

fn flag(options: &RendererOptions, key: &str) -> Option<bool> {
    options.get(key).and_then(serde_json::Value::as_bool)
}

fn toggle(options: &RendererOptions, include: &str, ignore: &str) -> bool {
    flag(options, include)
        .or_else(|| flag(options, ignore).map(|ignored| !ignored))
        .unwrap_or(true)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "renderer panicked".to_string())
}

/// Pull indented code fences back to the left margin.
///
/// ```
/// use rs_pagesift::markdown::normalize_fences;
///
/// assert_eq!(normalize_fences("text\n    ```\ncode\n    ```"), "text\n```\ncode\n```");
/// ```
#[must_use]
pub fn normalize_fences(markdown: &str) -> String {
    INDENTED_FENCE.replace_all(markdown, "```").into_owned()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn options(pairs: &[(&str, serde_json::Value)]) -> RendererOptions {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_toggle_defaults_to_true() {
        let opts = RendererOptions::new();
        assert!(toggle(&opts, "include_links", "ignore_links"));
    }

    #[test]
    fn test_toggle_positive_key_wins() {
        let opts = options(&[("include_links", json!(false)), ("ignore_links", json!(false))]);
        assert!(!toggle(&opts, "include_links", "ignore_links"));
    }

    #[test]
    fn test_toggle_inverse_key() {
        let opts = options(&[("ignore_images", json!(true))]);
        assert!(!toggle(&opts, "include_images", "ignore_images"));
    }

    #[test]
    fn test_non_boolean_values_are_ignored() {
        let opts = options(&[("include_links", json!("no")), ("body_width", json!(80))]);
        assert!(toggle(&opts, "include_links", "ignore_links"));
    }

    #[test]
    fn test_render_paragraph() {
        let md = Html2MdRenderer
            .render("<p>Hello world</p>", &RendererOptions::new())
            .expect("render");
        assert!(md.contains("Hello world"));
    }

    #[test]
    fn test_render_link_toggle() {
        let html = r#"<p>See <a href="https://example.com/docs">the docs</a></p>"#;

        let with_links = Html2MdRenderer.render(html, &RendererOptions::new()).expect("render");
        assert!(with_links.contains("https://example.com/docs"));

        let opts = options(&[("ignore_links", json!(true))]);
        let without_links = Html2MdRenderer.render(html, &opts).expect("render");
        assert!(without_links.contains("the docs"));
    }

    #[test]
    fn test_normalize_fences_only_touches_fences() {
        assert_eq!(normalize_fences("    indented code"), "    indented code");
        assert_eq!(normalize_fences("a\n    ```rust\nb"), "a\n```rust\nb");
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");

        let boxed: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(boxed.as_ref()), "renderer panicked");
    }
}
