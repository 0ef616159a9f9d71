//! SVG charts comparing measured timings with the reference dataset.
//!
//! Three charts, one file each:
//! - `comparison_log.svg`: means with ±stddev error bars, log y axis
//! - `speedup.svg`: reference mean / measured mean per size class
//! - `complexity.svg`: mean / (N ln N), log y axis; flat means O(N log N)

use std::path::{Path, PathBuf};

use heapbench_core::ComparisonRow;

use crate::error::CliError;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;

const MEASURED_COLOR: &str = "#1f77b4";
const REFERENCE_COLOR: &str = "#ff7f0e";
const BAR_COLOR: &str = "teal";

pub const COMPARISON_FILE: &str = "comparison_log.svg";
pub const SPEEDUP_FILE: &str = "speedup.svg";
pub const COMPLEXITY_FILE: &str = "complexity.svg";

/// Render all three charts into `dir`, creating it if needed.
pub fn write_charts(
    dir: &Path,
    rows: &[ComparisonRow],
    measured: &str,
    reference: &str,
) -> Result<Vec<PathBuf>, CliError> {
    std::fs::create_dir_all(dir).map_err(|source| CliError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let charts = [
        (COMPARISON_FILE, comparison_chart(rows, measured, reference)),
        (SPEEDUP_FILE, speedup_chart(rows, measured, reference)),
        (COMPLEXITY_FILE, complexity_chart(rows, measured, reference)),
    ];

    let mut written = Vec::with_capacity(charts.len());
    for (name, svg) in charts {
        let path = dir.join(name);
        std::fs::write(&path, svg).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "chart written");
        written.push(path);
    }
    Ok(written)
}

/// Log-scale means for both implementations with ±stddev error bars.
pub fn comparison_chart(rows: &[ComparisonRow], measured: &str, reference: &str) -> String {
    let measured_points: Vec<Option<(f64, f64)>> = rows
        .iter()
        .map(|r| Some((r.measured_mean, r.measured_stddev)))
        .collect();
    let reference_points: Vec<Option<(f64, f64)>> = rows
        .iter()
        .map(|r| r.reference.map(|p| (p.mean, p.stddev)))
        .collect();

    let values = measured_points
        .iter()
        .chain(&reference_points)
        .flatten()
        .flat_map(|&(mean, stddev)| [mean, mean + stddev, mean - stddev]);
    let scale = YScale::log_for(values);

    let mut canvas = Canvas::new(
        &format!("Heap sort timing ({} vs {})", measured, reference),
        "Input size (N)",
        "Mean time (s), log scale",
    );
    canvas.axes(&scale, rows);
    canvas.series(&scale, &measured_points, MEASURED_COLOR, false);
    canvas.series(&scale, &reference_points, REFERENCE_COLOR, true);
    canvas.legend(&[(measured, MEASURED_COLOR, false), (reference, REFERENCE_COLOR, true)]);
    canvas.finish()
}

/// Bars of reference mean / measured mean, labelled like `23.7x`.
pub fn speedup_chart(rows: &[ComparisonRow], measured: &str, reference: &str) -> String {
    let max = rows
        .iter()
        .filter_map(|r| r.speedup)
        .fold(0.0_f64, f64::max);
    let scale = YScale::Linear {
        max: if max > 0.0 { max * 1.2 } else { 1.0 },
    };

    let mut canvas = Canvas::new(
        &format!("Speed-up factor ({} vs {})", measured, reference),
        "Input size",
        &format!("{} mean / {} mean", reference, measured),
    );
    canvas.axes(&scale, rows);

    let slot = canvas.slot_width(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let Some(speedup) = row.speedup else {
            continue;
        };
        let cx = canvas.x_for(i, rows.len());
        let top = scale.y_for(speedup);
        let bottom = scale.y_for(0.0);
        let width = slot * 0.6;
        canvas.push_line(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" stroke="black" />"#,
            cx - width / 2.0,
            top,
            width,
            (bottom - top).max(0.0),
            BAR_COLOR
        ));
        canvas.text(cx, top - 6.0, "middle", 14, &format!("{:.1}x", speedup));
    }
    if rows.iter().all(|r| r.speedup.is_none()) {
        canvas.text(WIDTH / 2.0, HEIGHT / 2.0, "middle", 14, "no reference timings");
    }
    canvas.finish()
}

/// `T(N) / (N ln N)` for both implementations on a log axis.
pub fn complexity_chart(rows: &[ComparisonRow], measured: &str, reference: &str) -> String {
    let measured_points: Vec<Option<(f64, f64)>> = rows
        .iter()
        .map(|r| r.measured_normalized.map(|v| (v, 0.0)))
        .collect();
    let reference_points: Vec<Option<(f64, f64)>> = rows
        .iter()
        .map(|r| r.reference_normalized.map(|v| (v, 0.0)))
        .collect();

    let values = measured_points
        .iter()
        .chain(&reference_points)
        .flatten()
        .map(|&(v, _)| v);
    let scale = YScale::log_for(values);

    let mut canvas = Canvas::new(
        "Normalized time T(N) / (N ln N)",
        "Input size (N)",
        "Seconds per N ln N, log scale",
    );
    canvas.axes(&scale, rows);
    canvas.series(&scale, &measured_points, MEASURED_COLOR, false);
    canvas.series(&scale, &reference_points, REFERENCE_COLOR, true);
    canvas.legend(&[(measured, MEASURED_COLOR, false), (reference, REFERENCE_COLOR, true)]);
    canvas.finish()
}

// ---------------------------------------------------------------------------
// Scales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum YScale {
    Linear { max: f64 },
    /// Decades `10^lo ..= 10^hi`.
    Log { lo: i32, hi: i32 },
}

impl YScale {
    /// Smallest whole-decade range covering every positive value.
    fn log_for(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values
            .filter(|v| *v > 0.0 && v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !min.is_finite() {
            return YScale::Log { lo: -6, hi: 0 };
        }
        let lo = min.log10().floor() as i32;
        let mut hi = max.log10().ceil() as i32;
        if hi <= lo {
            hi = lo + 1;
        }
        YScale::Log { lo, hi }
    }

    fn top() -> f64 {
        MARGIN_TOP
    }

    fn bottom() -> f64 {
        HEIGHT - MARGIN_BOTTOM
    }

    /// Pixel row for a value. Values below the axis are clamped to it.
    fn y_for(&self, value: f64) -> f64 {
        let frac = match *self {
            YScale::Linear { max } => (value / max).clamp(0.0, 1.0),
            YScale::Log { lo, hi } => {
                if value <= 10f64.powi(lo) {
                    0.0
                } else {
                    ((value.log10() - lo as f64) / (hi - lo) as f64).clamp(0.0, 1.0)
                }
            }
        };
        Self::bottom() - frac * (Self::bottom() - Self::top())
    }

    fn ticks(&self) -> Vec<(f64, String)> {
        match *self {
            YScale::Linear { max } => (0..=5)
                .map(|i| {
                    let v = max * i as f64 / 5.0;
                    (v, format!("{:.1}", v))
                })
                .collect(),
            YScale::Log { lo, hi } => (lo..=hi)
                .map(|e| (10f64.powi(e), format!("1e{}", e)))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

struct Canvas {
    body: String,
}

impl Canvas {
    fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        let body = format!(
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">
<style>
    text {{ font-family: sans-serif; fill: #222; }}
    .grid {{ stroke: #ccc; stroke-dasharray: 4 4; }}
</style>
<rect width="{w}" height="{h}" fill="white" />
"#,
            w = WIDTH,
            h = HEIGHT
        );
        let mut canvas = Canvas { body };
        canvas.push_line(&format!(
            r#"<text x="{:.1}" y="30" text-anchor="middle" font-size="18">{}</text>"#,
            WIDTH / 2.0,
            escape(title)
        ));
        canvas.push_line(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">{}</text>"#,
            (MARGIN_LEFT + WIDTH - MARGIN_RIGHT) / 2.0,
            HEIGHT - 20.0,
            escape(x_label)
        ));
        canvas.push_line(&format!(
            r#"<text transform="translate(22 {:.1}) rotate(-90)" text-anchor="middle" font-size="13">{}</text>"#,
            (MARGIN_TOP + HEIGHT - MARGIN_BOTTOM) / 2.0,
            escape(y_label)
        ));
        canvas
    }

    fn slot_width(&self, count: usize) -> f64 {
        (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / count.max(1) as f64
    }

    /// Centre of category slot `index` out of `count`.
    fn x_for(&self, index: usize, count: usize) -> f64 {
        MARGIN_LEFT + (index as f64 + 0.5) * self.slot_width(count)
    }

    fn axes(&mut self, scale: &YScale, rows: &[ComparisonRow]) {
        let left = MARGIN_LEFT;
        let right = WIDTH - MARGIN_RIGHT;
        let bottom = YScale::bottom();

        for (value, label) in scale.ticks() {
            let y = scale.y_for(value);
            self.push_line(&format!(
                r#"<line class="grid" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" />"#,
                left, y, right, y
            ));
            self.text(left - 8.0, y + 4.0, "end", 11, &label);
        }

        self.push_line(&format!(
            r#"<line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black" />
<line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black" />"#,
            l = left,
            t = YScale::top(),
            b = bottom,
            r = right
        ));

        for (i, row) in rows.iter().enumerate() {
            let x = self.x_for(i, rows.len());
            let label = if row.label == row.size.to_string() {
                row.label.clone()
            } else {
                format!("{} ({})", row.label, row.size)
            };
            self.text(x, bottom + 20.0, "middle", 12, &label);
        }
    }

    /// A line through the present points, with markers and error bars.
    fn series(&mut self, scale: &YScale, points: &[Option<(f64, f64)>], color: &str, dashed: bool) {
        let coords: Vec<(f64, f64, f64)> = points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|(v, err)| (self.x_for(i, points.len()), v, err)))
            .collect();
        if coords.is_empty() {
            return;
        }

        let path: Vec<String> = coords
            .iter()
            .map(|&(x, v, _)| format!("{:.1},{:.1}", x, scale.y_for(v)))
            .collect();
        let dash = if dashed { r#" stroke-dasharray="6 4""# } else { "" };
        self.push_line(&format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"{} />"#,
            path.join(" "),
            color,
            dash
        ));

        for &(x, v, err) in &coords {
            if err > 0.0 {
                let hi = scale.y_for(v + err);
                let lo = scale.y_for(v - err);
                self.push_line(&format!(
                    r#"<path d="M{x:.1},{hi:.1} V{lo:.1} M{l:.1},{hi:.1} H{r:.1} M{l:.1},{lo:.1} H{r:.1}" stroke="{c}" />"#,
                    x = x,
                    hi = hi,
                    lo = lo,
                    l = x - 5.0,
                    r = x + 5.0,
                    c = color
                ));
            }
            self.push_line(&format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}" />"#,
                x,
                scale.y_for(v),
                color
            ));
        }
    }

    fn legend(&mut self, entries: &[(&str, &str, bool)]) {
        let x = WIDTH - MARGIN_RIGHT - 150.0;
        for (i, &(name, color, dashed)) in entries.iter().enumerate() {
            let y = MARGIN_TOP + 15.0 + i as f64 * 20.0;
            let dash = if dashed { r#" stroke-dasharray="6 4""# } else { "" };
            self.push_line(&format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2"{} />"#,
                x,
                y,
                x + 30.0,
                y,
                color,
                dash
            ));
            self.text(x + 38.0, y + 4.0, "start", 12, name);
        }
    }

    fn push_line(&mut self, element: &str) {
        self.body.push_str(element);
        self.body.push('\n');
    }

    fn text(&mut self, x: f64, y: f64, anchor: &str, size: u32, content: &str) {
        self.push_line(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="{}" font-size="{}">{}</text>"#,
            x,
            y,
            anchor,
            size,
            escape(content)
        ));
    }

    fn finish(mut self) -> String {
        self.body.push_str("</svg>\n");
        self.body
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
