#![no_main]
use chanlog::cli::parse_record;
use chanlog::{BoxedRenderer, CompactRenderer, JsonRenderer, LineRenderer, Renderer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Must not panic on any input line; valid records must render everywhere
    let Ok(record) = parse_record(data) else {
        return;
    };
    let _ = JsonRenderer::new().include_stacktraces(true).render(&record);
    let _ = LineRenderer::new().render(&record);
    let _ = CompactRenderer::new().include_stacktraces(true).render(&record);
    let _ = BoxedRenderer::new().width(40).render(&record);
});
