mod common;

use common::{ScriptedRenderer, TOC_HTML, count_operators, layout, manual_page_texts};
use pdf_paginate::*;
use std::time::Duration;

#[tokio::test]
async fn test_two_passes_inject_toc_page_numbers() {
    let renderer = ScriptedRenderer::new(manual_page_texts());
    let paginator = Paginator::new(&renderer, layout());
    let mut source = SourceDocument::from_html(TOC_HTML);

    let result = paginator.paginate(&mut source).await.unwrap();

    assert_eq!(renderer.calls(), 2);
    assert_eq!(result.injected, 2);
    assert_eq!(source.text_by_id("toc-pn-01").as_deref(), Some("3"));
    assert_eq!(source.text_by_id("toc-pn-02").as_deref(), Some("7"));
    assert_eq!(result.first_pass_pages, 10);
    assert_eq!(result.second_pass_pages, 10);
    assert_eq!(result.drift, None);
    assert_eq!(result.sections.start_page_for_id("TOC"), Some(1));
}

#[tokio::test]
async fn test_toc_marker_is_never_injected() {
    let html = r#"<html><body><span id="toc-pn-TOC">--</span></body></html>"#;
    let renderer = ScriptedRenderer::new(manual_page_texts());
    let paginator = Paginator::new(&renderer, layout());
    let mut source = SourceDocument::from_html(html);

    let result = paginator.paginate(&mut source).await.unwrap();
    assert_eq!(result.injected, 0);
    assert_eq!(source.text_by_id("toc-pn-TOC").as_deref(), Some("--"));
}

#[tokio::test]
async fn test_page_drift_is_reported() {
    let mut renderer = ScriptedRenderer::new(manual_page_texts());
    renderer.extra_pages_after_injection = 1;
    let paginator = Paginator::new(&renderer, layout());
    let mut source = SourceDocument::from_html(TOC_HTML);

    let result = paginator.paginate(&mut source).await.unwrap();
    assert_eq!(
        result.drift,
        Some(PageDrift {
            first_pass: 10,
            second_pass: 11
        })
    );
    // second-pass pages with first-pass sections
    assert_eq!(result.document.get_pages().len(), 11);
    assert_eq!(result.sections.start_page_for_id("02"), Some(7));
}

#[tokio::test]
async fn test_render_failure_propagates() {
    let mut renderer = ScriptedRenderer::new(manual_page_texts());
    renderer.fail = true;
    let paginator = Paginator::new(&renderer, layout());
    let mut source = SourceDocument::from_html(TOC_HTML);

    let err = paginator.paginate(&mut source).await.unwrap_err();
    assert!(matches!(err, PaginateError::Render(_)));
    assert_eq!(renderer.calls(), 1);
    assert_eq!(source.text_by_id("toc-pn-01").as_deref(), Some("--"));
}

#[tokio::test]
async fn test_slow_render_times_out() {
    let mut renderer = ScriptedRenderer::new(manual_page_texts());
    renderer.delay = Some(Duration::from_millis(500));
    let paginator = Paginator::new(&renderer, layout()).with_timeout(Duration::from_millis(20));
    let mut source = SourceDocument::from_html(TOC_HTML);

    let err = paginator.paginate(&mut source).await.unwrap_err();
    assert!(matches!(err, PaginateError::RenderTimeout(d) if d == Duration::from_millis(20)));
}

#[tokio::test]
async fn test_empty_render_is_rejected() {
    let renderer = ScriptedRenderer::new(Vec::new());
    let paginator = Paginator::new(&renderer, layout());
    let mut source = SourceDocument::from_html(TOC_HTML);

    let err = paginator.paginate(&mut source).await.unwrap_err();
    assert!(matches!(err, PaginateError::NoPages));
}

#[test]
fn test_inject_keeps_first_start_page_of_duplicate_ids() {
    let pages = vec![
        "FWMARK-01-ONE".to_string(),
        "text".to_string(),
        "FWMARK-01-AGAIN".to_string(),
    ];
    let sections = extract_sections(&pages);
    let mut source = SourceDocument::from_html(TOC_HTML);

    let injected = inject_page_numbers(&mut source, &sections);
    assert_eq!(injected, 1);
    assert_eq!(source.text_by_id("toc-pn-01").as_deref(), Some("1"));
    // no section 02 in the map, placeholder stays
    assert_eq!(source.text_by_id("toc-pn-02").as_deref(), Some("--"));
}

const MANUAL_HTML: &str = r#"<html><head><style>body { font-family: monospace; }</style></head>
<body>
  <section>
    <h1>FWMARK-TOC</h1>
    <p>Init <span id="toc-pn-01">--</span></p>
    <p>Kernel <span id="toc-pn-02">--</span></p>
  </section>
  <section class="page-break">
    <h1>FWMARK-01-INIT.SYS Initialization</h1>
    <p>The init process starts every service.</p>
  </section>
  <section class="page-break">
    <h1>FWMARK-02-KERNEL Kernel</h1>
    <p>The kernel schedules tasks.</p>
  </section>
</body></html>"#;

#[tokio::test]
async fn test_text_renderer_end_to_end() {
    let layout = layout();
    let paginator = Paginator::new(TextRenderer::default(), layout.clone());
    let mut source = SourceDocument::from_html(MANUAL_HTML);

    let result = paginator.paginate(&mut source).await.unwrap();
    assert_eq!(result.second_pass_pages, 3);
    assert_eq!(result.drift, None);
    assert_eq!(source.text_by_id("toc-pn-01").as_deref(), Some("2"));
    assert_eq!(source.text_by_id("toc-pn-02").as_deref(), Some("3"));
    assert_eq!(
        extract_sections(&extract_page_texts(&result.document)),
        result.sections
    );

    let (doc, stats) = apply_running_heads_async(
        result.document,
        result.sections,
        layout,
        "v0.1.0".to_string(),
    )
    .await
    .unwrap();
    assert_eq!(stats.decorated, 3);
    for page in 1..=3 {
        assert_eq!(count_operators(&doc, page, "S"), 2);
    }

    let texts = extract_page_texts(&doc);
    assert!(texts[1].contains("INIT.SYS"));
    assert!(texts[2].contains("KERNEL"));
    assert!(texts[0].contains("v0.1.0"));
}
