#![no_main]
use chanlog::config::Config;
use chanlog::{Fields, Level, Record, Renderer, RendererKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(config) = Config::parse(data) else {
        return;
    };
    let _ = config.filter();
    let _ = config.diagnostics_level();

    let record = Record::new("fuzz", Level::Warning, "m").with_context(Fields::new().with("k", 1));
    for kind in RendererKind::all() {
        let _ = config.render.build(kind).render(&record);
    }
});
