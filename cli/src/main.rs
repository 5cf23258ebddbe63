//! unredact CLI - weak-redaction recovery tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unredact::{
    output_path, BuiltinFont, PageRenderer, ParseOptions, PdfParser, RedactionPolicy,
    RenderOptions,
};

#[derive(Parser)]
#[command(name = "unredact")]
#[command(version)]
#[command(
    about = "Recover content hidden under weak PDF redactions",
    long_about = "Rebuilds each page of a PDF from its recorded layout while refusing to \
                  redraw shapes that look like redaction cover boxes, so content that was \
                  merely painted over becomes visible again."
)]
#[derive(Debug)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (defaults to <input>-unredacted.pdf)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Dump the parsed layout tree as JSON instead of writing a PDF
    #[arg(long)]
    dump_layout: bool,

    /// Output compact JSON with --dump-layout
    #[arg(long)]
    compact: bool,

    /// Fallback font for unmapped font names
    #[arg(long, value_name = "NAME", default_value = "times-roman")]
    default_font: String,

    /// Minimum height (page units) for a black box to count as a cover shape
    #[arg(long, value_name = "HEIGHT", default_value = "2.0")]
    min_cover_height: f32,

    /// Fail on the first uninterpretable page instead of skipping it
    #[arg(long)]
    strict: bool,
}

fn main() {
    env_logger::init();

    // Argument errors must land on stderr with exit code 1; only --help
    // and --version take clap's own exit path.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.use_stderr() {
                eprintln!("{e}");
                usage_and_exit();
            }
            e.exit();
        }
    };

    let Some(input) = cli.input.clone() else {
        usage_and_exit();
    };

    let result = if cli.dump_layout {
        cmd_dump_layout(&input, &cli)
    } else {
        cmd_recover(&input, &cli)
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn usage_and_exit() -> ! {
    eprintln!("{}", "Usage: unredact <FILE> [-o OUTPUT]".yellow());
    eprintln!("       unredact --help for more information");
    std::process::exit(1);
}

fn cmd_recover(input: &Path, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| output_path(input));

    let parser = PdfParser::open(input, parse_options(cli))?;
    let mut renderer = PageRenderer::new(render_options(cli)?);

    let total = parser.page_count();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] page {pos}/{len}")
            .unwrap()
            .progress_chars("#>-"),
    );

    for number in 1..=total {
        let layout = parser.parse_page(number)?;
        renderer.render_page(&layout)?;
        pb.inc(1);
    }

    renderer.finish(&output)?;
    pb.finish_and_clear();

    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_dump_layout(input: &Path, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let layouts = unredact::extract_layouts(input, parse_options(cli))?;

    let json = if cli.compact {
        serde_json::to_string(&layouts)?
    } else {
        serde_json::to_string_pretty(&layouts)?
    };

    if let Some(path) = &cli.output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{json}");
    }

    Ok(())
}

fn parse_options(cli: &Cli) -> ParseOptions {
    ParseOptions::new().with_strict(cli.strict)
}

fn render_options(cli: &Cli) -> Result<RenderOptions, String> {
    Ok(RenderOptions::new()
        .with_default_font(font_by_name(&cli.default_font)?)
        .with_redaction(RedactionPolicy::new().with_min_cover_height(cli.min_cover_height)))
}

fn font_by_name(name: &str) -> Result<BuiltinFont, String> {
    match name.to_ascii_lowercase().as_str() {
        "times-roman" | "times" => Ok(BuiltinFont::TimesRoman),
        "times-italic" => Ok(BuiltinFont::TimesItalic),
        "times-bold" => Ok(BuiltinFont::TimesBold),
        "times-bolditalic" => Ok(BuiltinFont::TimesBoldItalic),
        "helvetica" => Ok(BuiltinFont::Helvetica),
        "helvetica-oblique" => Ok(BuiltinFont::HelveticaOblique),
        "helvetica-bold" => Ok(BuiltinFont::HelveticaBold),
        "helvetica-boldoblique" => Ok(BuiltinFont::HelveticaBoldOblique),
        "courier" => Ok(BuiltinFont::Courier),
        "zapfdingbats" => Ok(BuiltinFont::ZapfDingbats),
        other => Err(format!(
            "unknown font '{other}' (expected one of: times-roman, times-italic, times-bold, \
             times-bolditalic, helvetica, helvetica-oblique, helvetica-bold, \
             helvetica-boldoblique, courier, zapfdingbats)"
        )),
    }
}
