use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use photobooth::{
    BoothConfig, Clock, CompositeStrip, FilterChain, GlyphRasterizer, ImageFileDevice,
    ManualClock, PhotoBooth, PixelSize, StillImage, StripCompositor, SystemClock,
    TestPatternDevice, VideoDevice, apply_filter, parse_filter_expression, run_headless,
};

#[derive(Parser, Debug)]
#[command(name = "photobooth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the configured filters.
    Filters(FiltersArgs),
    /// Run a full session headlessly and export the strip.
    Shoot(ShootArgs),
    /// Apply one filter to an image file.
    Filter(FilterArgs),
    /// Compose image files into a strip.
    Strip(StripArgs),
}

#[derive(Parser, Debug)]
struct FiltersArgs {
    /// Booth configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ShootArgs {
    /// Booth configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame source: `pattern` or the path of an image file.
    #[arg(long, default_value = "pattern")]
    source: String,

    /// Test pattern width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Test pattern height.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Mirror frames horizontally.
    #[arg(long)]
    mirror: bool,

    /// Filter name or index.
    #[arg(long)]
    filter: Option<String>,

    /// Sticker placed on every photo, as `GLYPH@X,Y` in display pixels. Repeatable.
    #[arg(long = "sticker", value_parser = parse_sticker)]
    stickers: Vec<StickerArg>,

    /// Output directory for the strip.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Wait out countdowns in real time instead of a virtual clock.
    #[arg(long)]
    realtime: bool,

    /// Extra directory to load fonts from.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Skip font loading; glyphs and the title are not drawn.
    #[arg(long)]
    no_fonts: bool,
}

#[derive(Parser, Debug)]
struct FilterArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Filter name from the configuration, or a filter expression.
    #[arg(long)]
    filter: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Booth configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StripArgs {
    /// Images in strip order.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Booth configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip font loading; the title is not drawn.
    #[arg(long)]
    no_fonts: bool,
}

#[derive(Clone, Debug)]
struct StickerArg {
    glyph: String,
    x: f64,
    y: f64,
}

fn parse_sticker(s: &str) -> Result<StickerArg, String> {
    let (glyph, pos) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("expected GLYPH@X,Y, got '{s}'"))?;
    let (x, y) = pos
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y after '@', got '{pos}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    if glyph.is_empty() {
        return Err("sticker glyph is empty".to_owned());
    }
    Ok(StickerArg {
        glyph: glyph.to_owned(),
        x,
        y,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Filters(args) => cmd_filters(args),
        Command::Shoot(args) => cmd_shoot(args),
        Command::Filter(args) => cmd_filter(args),
        Command::Strip(args) => cmd_strip(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BoothConfig> {
    match path {
        Some(p) => BoothConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(BoothConfig::default()),
    }
}

fn glyphs(no_fonts: bool, extra: Option<&Path>) -> GlyphRasterizer {
    if no_fonts {
        return GlyphRasterizer::without_fonts();
    }
    match extra {
        Some(dir) => GlyphRasterizer::with_font_dirs(&[dir]),
        None => GlyphRasterizer::system(),
    }
}

fn cmd_filters(args: FiltersArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let registry = config.filter_registry()?;
    for (i, spec) in registry.list().iter().enumerate() {
        println!("{i}\t{}\t{}", spec.name, spec.expression);
    }
    Ok(())
}

fn cmd_shoot(args: ShootArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let glyphs = glyphs(args.no_fonts, args.fonts.as_deref());

    let mut device: Box<dyn VideoDevice> = if args.source == "pattern" {
        let size = PixelSize::new(args.width, args.height)?;
        Box::new(TestPatternDevice::new(size).mirrored(args.mirror))
    } else {
        Box::new(ImageFileDevice::new(&args.source).mirrored(args.mirror))
    };

    let strip = if args.realtime {
        shoot_with(config, SystemClock::new(), glyphs, device.as_mut(), &args)?
    } else {
        shoot_with(config, ManualClock::new(), glyphs, device.as_mut(), &args)?
    };

    let path = strip
        .export(&args.out)
        .with_context(|| format!("export strip into '{}'", args.out.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn shoot_with<C: Clock>(
    config: BoothConfig,
    clock: C,
    glyphs: GlyphRasterizer,
    device: &mut dyn VideoDevice,
    args: &ShootArgs,
) -> anyhow::Result<CompositeStrip> {
    let mut booth = PhotoBooth::new(config, clock, glyphs)?;
    if let Some(filter) = &args.filter {
        let index = match filter.parse::<usize>() {
            Ok(i) => i,
            Err(_) => booth
                .engine()
                .registry()
                .position(filter)
                .with_context(|| format!("unknown filter '{filter}'"))?,
        };
        booth.select_filter(index)?;
    }

    let strip = run_headless(&mut booth, device, |editor| {
        for s in &args.stickers {
            editor.place(&s.glyph, s.x, s.y)?;
        }
        Ok(())
    })?;
    Ok(strip)
}

fn resolve_filter(config: &BoothConfig, filter: &str) -> anyhow::Result<FilterChain> {
    let registry = config.filter_registry()?;
    if let Some(i) = registry.position(filter) {
        return Ok(registry.chain(i)?.clone());
    }
    parse_filter_expression(filter)
        .with_context(|| format!("'{filter}' is neither a filter name nor an expression"))
}

fn cmd_filter(args: FilterArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let chain = resolve_filter(&config, &args.filter)?;

    let mut img = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?
        .to_rgba8();
    apply_filter(&chain, &mut img)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_strip(args: StripArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut photos = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        let still = StillImage::from_encoded(bytes, "none")
            .with_context(|| format!("decode image '{}'", path.display()))?;
        photos.push(still);
    }

    let compositor = StripCompositor::new(config.strip.clone(), glyphs(args.no_fonts, None))?
        .with_export_filename(config.export_filename.clone());
    let path = compositor
        .compose(&photos)?
        .export(&args.out)
        .with_context(|| format!("export strip into '{}'", args.out.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
