use rs_pagesift::{extract, Error, ExtractionOptions, ExtractionResult, MediaKind};

const PAGE: &str = "https://example.com/articles/harbour";

fn run(html: &str, options: &ExtractionOptions) -> ExtractionResult {
    match extract(PAGE, html, options) {
        Ok(Some(result)) => result,
        Ok(None) => panic!("expected a result for non-empty html"),
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn extract_paragraph_image_and_internal_link() {
    let html = r#"<html><head><title>Harbour</title></head><body>
        <p>Hello world from the harbour.</p>
        <img src="/photos/boat.jpg" alt="A boat at dusk" width="400" height="300">
        <a href="/about">About us</a>
    </body></html>"#;

    let result = run(html, &ExtractionOptions::default());

    assert!(result.success);
    assert!(result.message.is_none());
    assert!(result.markdown.contains("Hello world from the harbour."));
    assert!(result.cleaned_html.contains("<p>Hello world from the harbour.</p>"));

    assert_eq!(result.media.images.len(), 1);
    let image = &result.media.images[0];
    assert_eq!(image.src, "/photos/boat.jpg");
    assert_eq!(image.alt, "A boat at dusk");
    assert_eq!(image.score, 5);
    assert_eq!(image.kind, MediaKind::Image);

    assert_eq!(result.links.internal.len(), 1);
    assert_eq!(result.links.internal[0].href, "/about");
    assert_eq!(result.links.internal[0].text, "About us");
    assert!(result.links.external.is_empty());

    assert_eq!(result.metadata.get("title").map(String::as_str), Some("Harbour"));
}

#[test]
fn extract_empty_html_returns_none() {
    let result = extract(PAGE, "", &ExtractionOptions::default());
    assert!(matches!(result, Ok(None)));
}

#[test]
fn extract_selector_matching_nothing_is_terminal_success() {
    let options = ExtractionOptions {
        css_selector: Some("article.missing".to_string()),
        ..ExtractionOptions::default()
    };

    let result = run("<html><body><p>Some text <a href=\"/x\">x</a></p></body></html>", &options);

    assert!(result.success);
    assert_eq!(
        result.message.as_deref(),
        Some("No elements found for CSS selector: article.missing")
    );
    assert!(result.markdown.is_empty());
    assert!(result.cleaned_html.is_empty());
    assert!(result.links.internal.is_empty());
    assert!(result.media.images.is_empty());
    assert!(result.metadata.is_empty());
}

#[test]
fn extract_selector_narrows_scope() {
    let options = ExtractionOptions {
        css_selector: Some("article".to_string()),
        ..ExtractionOptions::default()
    };
    let html = r#"<html><body>
        <nav><a href="/home">NAV_TEXT</a></nav>
        <article><p>ARTICLE_TEXT</p></article>
    </body></html>"#;

    let result = run(html, &options);

    assert!(result.cleaned_html.contains("ARTICLE_TEXT"));
    assert!(!result.cleaned_html.contains("NAV_TEXT"));
    assert!(result.links.internal.is_empty());
}

#[test]
fn extract_invalid_selector_is_an_error() {
    let options = ExtractionOptions {
        css_selector: Some("div[[[".to_string()),
        ..ExtractionOptions::default()
    };

    let result = extract(PAGE, "<p>text</p>", &options);
    assert!(matches!(result, Err(Error::InvalidSelector(_))));
}

#[test]
fn extract_word_threshold_drops_short_blocks() {
    let html = "<html><body><div>one two three</div><div>one two three four five</div></body></html>";
    let options = ExtractionOptions {
        word_count_threshold: 4,
        ..ExtractionOptions::default()
    };

    let result = run(html, &options);

    assert_eq!(result.cleaned_html, "<body><div>one two three four five</div></body>");
}

#[test]
fn extract_keeps_base64_prefix_only() {
    let html = r#"<html><body><p>Inline pixel below</p><img src="data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==" alt="pixel"></body></html>"#;

    let result = run(html, &ExtractionOptions::default());

    assert!(result.cleaned_html.contains(r#"src="data:image/png;base64,""#));
    assert!(!result.cleaned_html.contains("iVBORw0KGgo"));
}

#[test]
fn extract_removes_scripts_comments_and_presentational_attributes() {
    let html = r#"<html><head><style>p { color: red }</style></head><body>
        <script>track()</script>
        <!-- layout comment -->
        <p class="lead" style="margin:0" title="Intro">Readable text</p>
    </body></html>"#;

    let result = run(html, &ExtractionOptions::default());

    assert!(!result.cleaned_html.contains("track()"));
    assert!(!result.cleaned_html.contains("layout comment"));
    assert!(!result.cleaned_html.contains("class="));
    assert!(!result.cleaned_html.contains("style="));
    assert!(result.cleaned_html.contains(r#"<p title="Intro">Readable text</p>"#));
}

#[test]
fn extract_flattens_redundant_wrappers() {
    let html = "<html><body><div><div><div><p>Deep text</p></div></div></div></body></html>";

    let result = run(html, &ExtractionOptions::default());

    assert_eq!(result.cleaned_html, "<body><div><p>Deep text</p></div></body>");
}

#[test]
fn extract_result_serializes_with_wire_names() {
    let html = r#"<html><body><p>Caption text</p><img src="/a.png" data-src="/a-large.png" alt="Chart" width="600"></body></html>"#;

    let result = run(html, &ExtractionOptions::default());
    let json = serde_json::to_value(&result).expect("serialize");

    assert!(json.get("cleaned_html").is_some());
    assert!(json.get("message").is_none());
    let image = &json["media"]["images"][0];
    assert_eq!(image["type"], "image");
    assert_eq!(image["data-src"], "/a-large.png");
    assert_eq!(image["desc"], "Caption text");
}
