//! `chanlog render`: JSONL on stdin, rendered text on stdout.

use crate::cli::parse_record;
use crate::internal;
use crate::render::Renderer;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

/// Totals of one `render_lines` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub rendered: u64,
    pub failed: u64,
}

/// Renders every non-blank line of `input` to `out`. Invalid lines are
/// reported on `errors` and skipped.
///
/// # Errors
/// I/O errors reading `input` or writing `out`.
pub fn render_lines(
    input: impl BufRead,
    renderer: &dyn Renderer,
    out: &mut impl Write,
    errors: &mut impl Write,
) -> io::Result<RenderStats> {
    let mut stats = RenderStats::default();
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(&line) {
            Ok(record) => {
                out.write_all(renderer.render(&record).as_bytes())?;
                stats.rendered += 1;
            }
            Err(e) => {
                writeln!(errors, "line {}: {e}", idx + 1)?;
                stats.failed += 1;
            }
        }
    }
    out.flush()?;
    Ok(stats)
}

/// Handles `chanlog render`.
#[must_use]
pub fn cmd_render(renderer: &dyn Renderer) -> ExitCode {
    internal::debug("RENDER", "Reading records from stdin");
    let stdin = io::stdin();
    let result = render_lines(
        stdin.lock(),
        renderer,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    match result {
        Ok(stats) => {
            internal::info(
                "RENDER",
                &format!(
                    "Rendered {} record(s), {} failed",
                    stats.rendered, stats.failed
                ),
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            internal::error("RENDER", &format!("I/O error: {e}"));
            ExitCode::FAILURE
        }
    }
}
