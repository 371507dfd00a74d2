use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use csv::ReaderBuilder;
use plotters::prelude::*;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render range-payload diagrams from a computed-curves CSV"
)]
struct Cli {
    #[arg(long)]
    input: String,
    #[arg(long, default_value = "artifacts/range_payload.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 900)]
    height: u32,
}

#[derive(Debug, Clone, Copy)]
struct CurveSample {
    payload_lb: f64,
    range_nm: f64,
}

const PALETTE: [RGBColor; 7] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(23, 190, 207),
];

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let curves = read_curves(&cli.input)?;
    if curves.is_empty() {
        return Err(anyhow::anyhow!("No curves in the provided CSV"));
    }

    let max_range = curves
        .values()
        .flatten()
        .map(|s| s.range_nm)
        .fold(0.0, f64::max);
    let max_payload = curves
        .values()
        .flatten()
        .map(|s| s.payload_lb)
        .fold(0.0, f64::max);

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 18.0, FontStyle::Normal);

    let caption = format!(
        "Range-payload diagrams ({})",
        Local::now().format("%Y-%m-%d")
    );

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, caption_font)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(0.0..max_range * 1.05, 0.0..max_payload * 1.05)?;

    chart
        .configure_mesh()
        .x_desc("Range (nm)")
        .y_desc("Payload (lb)")
        .label_style(label_font.clone())
        .x_labels(8)
        .y_labels(8)
        .draw()?;

    for (i, (designation, samples)) in curves.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let mut ordered = samples.clone();
        ordered.sort_by(|a, b| a.range_nm.total_cmp(&b.range_nm));
        chart
            .draw_series(LineSeries::new(
                ordered.iter().map(|s| (s.range_nm, s.payload_lb)),
                ShapeStyle::from(&color).stroke_width(2),
            ))?
            .label(designation.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&color).stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .label_font(label_font)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    eprintln!("wrote {}", cli.output.display());
    Ok(())
}

fn read_curves(path: &str) -> anyhow::Result<BTreeMap<String, Vec<CurveSample>>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let idx = |name: &str| -> anyhow::Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow::anyhow!("CSV missing column {name}"))
    };
    let designation_idx = idx("designation")?;
    let payload_idx = idx("payload_lb")?;
    let range_idx = idx("range_nm")?;

    let mut curves: BTreeMap<String, Vec<CurveSample>> = BTreeMap::new();
    for record in reader.records() {
        let record = record?;
        let designation = record
            .get(designation_idx)
            .ok_or_else(|| anyhow::anyhow!("short CSV row"))?
            .to_string();
        let payload_lb: f64 = record
            .get(payload_idx)
            .ok_or_else(|| anyhow::anyhow!("short CSV row"))?
            .parse()?;
        let range_nm: f64 = record
            .get(range_idx)
            .ok_or_else(|| anyhow::anyhow!("short CSV row"))?
            .parse()?;
        curves
            .entry(designation)
            .or_default()
            .push(CurveSample { payload_lb, range_nm });
    }
    Ok(curves)
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}
