use anyhow::{anyhow, bail, Context};
use crabshot::testing::SyntheticCamera;
use crabshot::{
    AspectRatio, CameraDevice, CameraScreen, CrabshotConfig, DirectoryConsumer, PreviewLayout,
    RatioSelector, ResolutionAxis, ResolutionSelector,
};
use std::env;
use std::path::PathBuf;

const USAGE: &str = "Usage: crabshot-cli <command> [args]

Commands:
  select-ratio <ratio>... [--json]
  select-resolution <size>... [--target <px>] [--long-edge] [--json]
  layout <screen_width> <screen_height> <ratio> [--json]
  list-devices [--json]
  capture [--synthetic] [--front] [--out <dir>] [--config <file>] [--json]
  init-config [<file>]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    crabshot::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }

    let rest = &args[2..];
    match args[1].as_str() {
        "select-ratio" => cmd_select_ratio(rest),
        "select-resolution" => cmd_select_resolution(rest),
        "layout" => cmd_layout(rest),
        "list-devices" => cmd_list_devices(rest),
        "capture" => cmd_capture(rest).await,
        "init-config" => cmd_init_config(rest),
        other => {
            eprintln!("Unknown command: {}\n\n{}", other, USAGE);
            std::process::exit(1);
        }
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Positional arguments, skipping flags and the values of `value_flags`
fn positionals<'a>(args: &'a [String], value_flags: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if value_flags.contains(&arg) {
            i += 2;
            continue;
        }
        if !arg.starts_with("--") {
            out.push(arg);
        }
        i += 1;
    }
    out
}

fn cmd_select_ratio(args: &[String]) -> anyhow::Result<()> {
    let ratios = positionals(args, &[]);
    let chosen = RatioSelector::default().select(&ratios)?;

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string(&chosen.map(|r| r.label))?);
    } else {
        match chosen {
            Some(ratio) => println!("{}", ratio),
            None => println!("none (default 4:3)"),
        }
    }
    Ok(())
}

fn cmd_select_resolution(args: &[String]) -> anyhow::Result<()> {
    let target = match flag_value(args, "--target") {
        Some(value) => value.parse().context("--target must be a pixel count")?,
        None => crabshot::selection::TARGET_HEIGHT,
    };
    let axis = if has_flag(args, "--long-edge") {
        ResolutionAxis::LongEdge
    } else {
        ResolutionAxis::Height
    };

    let sizes = positionals(args, &["--target"]);
    let chosen = ResolutionSelector::new(target, axis).select(&sizes)?;

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string(&chosen.map(|r| r.to_string()))?);
    } else {
        match chosen {
            Some(res) => println!("{}", res),
            None => println!("none"),
        }
    }
    Ok(())
}

fn cmd_layout(args: &[String]) -> anyhow::Result<()> {
    let values = positionals(args, &[]);
    let [width, height, ratio] = values.as_slice() else {
        bail!("Usage: crabshot-cli layout <screen_width> <screen_height> <ratio>");
    };

    let width: f64 = width.parse().context("screen width")?;
    let height: f64 = height.parse().context("screen height")?;
    let ratio: AspectRatio = ratio.parse()?;
    let layout = PreviewLayout::compute(width, height, &ratio);

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string(&layout)?);
    } else {
        println!(
            "preview {:.1}x{:.1}, overlay top {:.1}{}",
            layout.preview_width,
            layout.preview_height,
            layout.overlay_top,
            if layout.fits(height) { "" } else { " (overflows screen)" }
        );
    }
    Ok(())
}

fn cmd_list_devices(args: &[String]) -> anyhow::Result<()> {
    let devices = crabshot::platform::list_cameras()?;
    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string(&devices)?);
    } else {
        for d in devices {
            println!("{}: {} ({})", d.index, d.name, d.description);
        }
    }
    Ok(())
}

async fn cmd_capture(args: &[String]) -> anyhow::Result<()> {
    let config = match flag_value(args, "--config") {
        Some(path) => CrabshotConfig::load_from_file(path)?,
        None => CrabshotConfig::load_or_default(),
    };

    let device: Box<dyn CameraDevice> = if has_flag(args, "--synthetic") {
        Box::new(SyntheticCamera::new(&config.storage.capture_directory))
    } else {
        Box::new(crabshot::NativeCamera::new(&config))
    };

    let output = flag_value(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.storage.output_directory));
    let mut consumer = DirectoryConsumer::new(output)
        .organize_by_date(config.storage.auto_organize_by_date);

    let mut screen = CameraScreen::new(device, config);
    let gate = screen.refresh_permission()?;
    if !gate.is_ready() {
        return Err(anyhow!("Camera not available: {:?}", gate));
    }

    if has_flag(args, "--front") && screen.facing() != crabshot::CameraFacing::Front {
        screen.toggle_facing()?;
    }
    screen.prepare().await?;
    screen.capture().await?;
    let photo = screen.confirm(&mut consumer)?;

    let stored = consumer
        .last_stored()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    if has_flag(args, "--json") {
        println!(
            "{}",
            serde_json::json!({ "photo": photo, "stored_at": stored, "ratio": screen.ratio().as_str() })
        );
    } else {
        println!(
            "Captured {}x{} with {} camera (ratio {}) -> {}",
            photo.width,
            photo.height,
            photo.facing.as_str(),
            screen.ratio(),
            stored
        );
    }
    Ok(())
}

fn cmd_init_config(args: &[String]) -> anyhow::Result<()> {
    let path = positionals(args, &[])
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(CrabshotConfig::default_path);
    CrabshotConfig::default().save_to_file(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
