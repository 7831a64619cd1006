#![no_main]
use chanlog::render::Template;
use chanlog::{Fields, Level, LineRenderer, Record, Renderer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Any template parses and renders, with empty and non-empty values alike
    let template = Template::parse(data);
    let _ = template.render(|_| String::new());
    let _ = template.render(|ph| ph.as_str().to_string());

    let record = Record::new("fuzz", Level::Info, data)
        .with_context(Fields::new().with("input", data));
    let out = LineRenderer::new().template(data).render(&record);
    assert!(out.ends_with('\n'));
    assert_eq!(out.matches('\n').count(), 1);
});
