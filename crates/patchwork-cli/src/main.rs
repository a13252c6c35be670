//! `patchwork` command line tool.
//!
//! Usage:
//!   patchwork analyze button.9.png
//!   patchwork compose button.9.png --width 240 --height 64 -o button.png
//!   patchwork compose panel.png --cap-insets 8,8,8,8 --width 300 --height 200 -o out.png
//!   patchwork compose icon.png --fill aspect-fill --tint '#3366ff' --width 64 --height 32 -o out.png
//!   patchwork swipe --end "Delete*,Archive" --drag=-250
//!   patchwork swipe --end Delete --drag 0 --tap 100 --long-press
//!
//! `RUST_LOG=debug` shows analyzer and swipe-state logging.

mod image_io;
mod swipe_sim;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use patchwork_ninepatch::{
    Axis, CapInsets, Canvas, Fill, ImageId, NinePatch, Patch, PatchCache, PatchRegionSet,
};
use patchwork_types::bitmap::Bitmap;
use patchwork_types::color::Color;
use patchwork_types::config::PatchworkConfig;
use patchwork_types::geometry::Rect;

use crate::swipe_sim::{Menu, Script};

/// Nine-patch inspection and rendering, swipe-cell simulation.
#[derive(Parser, Debug)]
#[command(name = "patchwork", version, about)]
struct Cli {
    /// TOML configuration file (swipe thresholds, gesture slop).
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stretch and content regions of a marker-bordered PNG.
    Analyze {
        input: PathBuf,
        /// Also write the image without its marker border.
        #[arg(long, value_name = "FILE")]
        strip: Option<PathBuf>,
    },
    /// Render a nine-patch PNG at a new size.
    Compose {
        input: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        /// Treat the input as a plain image with `left,top,right,bottom`
        /// fixed caps instead of reading a marker border. Negative = unset.
        #[arg(long, value_name = "L,T,R,B", allow_hyphen_values = true)]
        cap_insets: Option<String>,
        /// Layout for images without stretch regions:
        /// aspect-fit, aspect-fill, fill or tile.
        #[arg(long, default_value = "aspect-fit")]
        fill: Fill,
        /// Recolor the image, `#RRGGBB` or `#RRGGBBAA`.
        #[arg(long, value_parser = parse_tint)]
        tint: Option<Color>,
        /// Print the draw plan.
        #[arg(long)]
        plan: bool,
    },
    /// Drive a simulated swipe cell with a horizontal drag.
    Swipe {
        /// Cell width in logical pixels.
        #[arg(long, default_value_t = 320.0)]
        width: f32,
        /// Start-side actions, comma separated; `*` suffix = swipe-activated.
        #[arg(long, value_delimiter = ',')]
        start: Vec<String>,
        /// End-side actions, comma separated; `*` suffix = swipe-activated.
        #[arg(long, value_delimiter = ',')]
        end: Vec<String>,
        /// TOML file with `[[start]]` / `[[end]]` action tables.
        #[arg(long, value_name = "FILE", conflicts_with_all = ["start", "end"])]
        menu: Option<PathBuf>,
        /// Signed drag distance; negative reveals the end side.
        #[arg(long, allow_hyphen_values = true)]
        drag: f32,
        #[arg(long, default_value_t = 12)]
        steps: u32,
        /// Tap at this cell-local x once the drag has settled.
        #[arg(long)]
        tap: Option<f32>,
        /// Hold the tap past the long-press threshold.
        #[arg(long, requires = "tap")]
        long_press: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PatchworkConfig::load(path)?,
        None => PatchworkConfig::default(),
    };

    match cli.command {
        Command::Analyze { input, strip } => cmd_analyze(&input, strip.as_deref()),
        Command::Compose {
            input,
            width,
            height,
            output,
            cap_insets,
            fill,
            tint,
            plan,
        } => {
            let style = Style {
                cap_insets: cap_insets.as_deref().map(parse_insets).transpose()?,
                fill,
                tint,
            };
            cmd_compose(&input, width, height, &output, &style, plan)
        }
        Command::Swipe {
            width,
            start,
            end,
            menu,
            drag,
            steps,
            tap,
            long_press,
        } => {
            let menu = match menu {
                Some(path) => Menu::load(&path)?,
                None => Menu {
                    start: Menu::actions_from_labels(&start),
                    end: Menu::actions_from_labels(&end),
                },
            };
            if menu.start.is_empty() && menu.end.is_empty() {
                bail!("no swipe actions given (use --start, --end or --menu)");
            }
            let report = swipe_sim::run(
                &config,
                menu,
                &Script {
                    width,
                    drag,
                    steps,
                    tap,
                    long_press,
                },
            );
            for line in &report.lines {
                println!("{line}");
            }
            for activation in &report.activations {
                println!("activated: {activation:?}");
            }
            if report.item_taps > 0 {
                println!("item taps: {}", report.item_taps);
            }
            if report.item_long_presses > 0 {
                println!("item long presses: {}", report.item_long_presses);
            }
            Ok(())
        }
    }
}

fn cmd_analyze(input: &Path, strip: Option<&Path>) -> anyhow::Result<()> {
    let bitmap = image_io::load_png(input)?;
    let set = patchwork_ninepatch::analyze(&bitmap)
        .with_context(|| format!("{} is not a nine-patch image", input.display()))?;

    let size = set.size();
    println!("{}: {}x{} content", input.display(), size.w, size.h);
    println!("  x: {}", describe_patches(set.patches(Axis::X)));
    println!("  y: {}", describe_patches(set.patches(Axis::Y)));
    let pad = set.content_padding();
    println!(
        "  content padding: left {} top {} right {} bottom {}",
        pad.left, pad.top, pad.right, pad.bottom
    );
    let min = set.min_size();
    println!("  minimum size: {}x{}", min.w, min.h);

    if let Some(out) = strip {
        let inset = set.inset() as i32;
        let interior = bitmap.crop(Rect::new(inset, inset, size.w, size.h));
        image_io::save_png(out, &interior)?;
        log::info!("Wrote {}", out.display());
    }
    Ok(())
}

/// How `compose` treats its input beyond the target size.
#[derive(Debug, Clone, Copy, Default)]
struct Style {
    /// `Some` skips marker analysis.
    cap_insets: Option<CapInsets>,
    fill: Fill,
    tint: Option<Color>,
}

fn cmd_compose(
    input: &Path,
    width: u32,
    height: u32,
    output: &Path,
    style: &Style,
    show_plan: bool,
) -> anyhow::Result<()> {
    let bitmap = image_io::load_png(input)?;
    let mut cache = PatchCache::new();
    let id = ImageId(0);
    let regions = match style.cap_insets {
        Some(insets) => cache.insert(id, PatchRegionSet::from_cap_insets(bitmap.size(), insets)),
        None => cache.get_or_analyze(id, &bitmap),
    };

    let mut image = NinePatch::new(&bitmap, Arc::clone(&regions)).with_fill(style.fill);
    if let Some(tint) = style.tint {
        image = image.with_tint(tint);
    }
    let mut canvas = Canvas::new(width, height);
    let plan = image.draw(&mut canvas, 0, 0, width, height)?;
    if show_plan {
        for warning in &plan.warnings {
            println!(
                "{:?} axis squeezed: fixed regions need {} px, target is {} px",
                warning.axis, warning.fixed_sum, warning.target
            );
        }
        println!("columns {:?}", plan.widths);
        println!("rows    {:?}", plan.heights);
        for cell in plan.visible_cells() {
            let (s, d) = (cell.source, cell.dest);
            println!(
                "  src {:>4},{:<4} {:>4}x{:<4} -> dst {:>4},{:<4} {:>4}x{:<4}",
                s.x, s.y, s.w, s.h, d.x, d.y, d.w, d.h
            );
        }
    }

    image_io::save_png(output, &canvas.into_bitmap())?;
    log::info!("Wrote {} ({width}x{height})", output.display());
    Ok(())
}

fn describe_patches(patches: &[Patch]) -> String {
    patches
        .iter()
        .map(|p| {
            let kind = if p.is_stretch() { "stretch" } else { "fixed" };
            format!("{kind} {}..{}", p.range.start, p.range.end)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_insets(text: &str) -> anyhow::Result<CapInsets> {
    let parts = text
        .split(',')
        .map(|s| s.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid cap insets '{text}'"))?;
    match parts.as_slice() {
        [v] => Ok(CapInsets::from_signed(*v, *v, *v, *v)),
        [l, t, r, b] => Ok(CapInsets::from_signed(*l, *t, *r, *b)),
        _ => bail!("cap insets need 1 or 4 values, got {}", parts.len()),
    }
}

fn parse_tint(s: &str) -> Result<Color, String> {
    Color::from_hex(s).ok_or_else(|| format!("invalid color '{s}'"))
}
