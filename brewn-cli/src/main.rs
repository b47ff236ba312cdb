use std::io::Write as _;
use std::path::PathBuf;
use std::{fs, thread, time::Duration};

use chrono::{NaiveTime, Timelike};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};

use brewn_core::methods::{
    BodyStrength, ColdBrewParams, CustomMethod, FlavourStrength, FourSixParams, LiquidType,
    Method, RoastLevel, TasteBalance, UniformParams, BETTER_ONE, SIMPLE,
};
use brewn_core::{format_clock, format_time, BrewRecipe, Schedule, TimerPhase};

/// Roast CLI enum mirrors brewn-core (derive for Clap).
#[derive(Copy, Clone, Debug, ValueEnum)]
enum RoastFlag {
    Light,
    Medium,
    Dark,
}

impl From<RoastFlag> for RoastLevel {
    fn from(r: RoastFlag) -> Self {
        match r {
            RoastFlag::Light => RoastLevel::Light,
            RoastFlag::Medium => RoastLevel::Medium,
            RoastFlag::Dark => RoastLevel::Dark,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TasteFlag {
    Neutral,
    Sweetness,
    Acidity,
}

impl From<TasteFlag> for TasteBalance {
    fn from(t: TasteFlag) -> Self {
        match t {
            TasteFlag::Neutral => TasteBalance::Neutral,
            TasteFlag::Sweetness => TasteBalance::Sweetness,
            TasteFlag::Acidity => TasteBalance::Acidity,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum BodyFlag {
    Thinner,
    Medium,
    Stronger,
}

impl From<BodyFlag> for BodyStrength {
    fn from(b: BodyFlag) -> Self {
        match b {
            BodyFlag::Thinner => BodyStrength::Thinner,
            BodyFlag::Medium => BodyStrength::Medium,
            BodyFlag::Stronger => BodyStrength::Stronger,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FlavourFlag {
    Lighter,
    Balanced,
    Bold,
    ExtraBold,
}

impl From<FlavourFlag> for FlavourStrength {
    fn from(f: FlavourFlag) -> Self {
        match f {
            FlavourFlag::Lighter => FlavourStrength::Lighter,
            FlavourFlag::Balanced => FlavourStrength::Balanced,
            FlavourFlag::Bold => FlavourStrength::Bold,
            FlavourFlag::ExtraBold => FlavourStrength::ExtraBold,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LiquidFlag {
    Water,
    Milk,
}

impl From<LiquidFlag> for LiquidType {
    fn from(l: LiquidFlag) -> Self {
        match l {
            LiquidFlag::Water => LiquidType::Water,
            LiquidFlag::Milk => LiquidType::Milk,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "brewn",
    about = "Pour-over brew calculators, timer & recipe sharing.",
    version
)]
struct Cli {
    /// Brew start time HH:MM; adds wall-clock times to the schedule
    #[arg(long, global = true)]
    start: Option<String>,

    /// Run the brew countdown after printing the schedule
    #[arg(long, global = true)]
    brew: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// The 4:6 method by Tetsu Kasuya
    FourSix {
        /// Coffee dose in grams
        #[arg(long, default_value_t = 14.0)]
        coffee: f64,

        /// Roast level (sets the water temperature)
        #[arg(long, value_enum, default_value_t = RoastFlag::Medium)]
        roast: RoastFlag,

        /// Taste balance (shifts the two flavor pours)
        #[arg(long, value_enum, default_value_t = TasteFlag::Neutral)]
        taste: TasteFlag,

        /// Body strength (sets the number of body pours)
        #[arg(long, value_enum, default_value_t = BodyFlag::Medium)]
        body: BodyFlag,
    },
    /// Simple Brew: four equal pours at 1:15
    Simple {
        /// Coffee dose in grams
        #[arg(long, default_value_t = 14.0)]
        coffee: f64,
    },
    /// The Better One Cup by James Hoffmann
    BetterOne {
        /// Coffee dose in grams
        #[arg(long, default_value_t = 14.0)]
        coffee: f64,
    },
    /// Cold brew steep calculator
    ColdBrew {
        /// Coffee dose in grams
        #[arg(long, default_value_t = 20.0)]
        coffee: f64,

        /// Liquid ratio (1 : N); rederives the liquid amount
        #[arg(long, conflicts_with = "liquid")]
        ratio: Option<f64>,

        /// Liquid amount in ml; rederives the ratio
        #[arg(long)]
        liquid: Option<f64>,

        /// Flavour strength (sets the steep time)
        #[arg(long, value_enum, default_value_t = FlavourFlag::Balanced)]
        flavour: FlavourFlag,

        /// Steeping liquid
        #[arg(long, value_enum, default_value_t = LiquidFlag::Water)]
        liquid_type: LiquidFlag,
    },
    /// Build, import, export or share a custom method
    Custom {
        /// Load a recipe JSON file
        #[arg(long, conflicts_with = "link")]
        import: Option<PathBuf>,

        /// Load a shared link token (falls back to the seed method)
        #[arg(long)]
        link: Option<String>,

        /// Write the recipe to a JSON file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Print a shareable link token
        #[arg(long)]
        share: bool,
    },
}

fn fmt_ml(x: f64) -> String {
    format!("{:.1} ml", x)
}

fn parse_start(start: &Option<String>) -> Option<NaiveTime> {
    let hhmm = start.as_ref()?;
    match NaiveTime::parse_from_str(hhmm, "%H:%M") {
        Ok(t) => Some(t),
        Err(_) => {
            eprintln!("Invalid --start time (expected HH:MM): {hhmm}");
            std::process::exit(1);
        }
    }
}

fn summary_table(rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for (title, value) in rows {
        table.add_row(vec![
            Cell::new(title).add_attribute(Attribute::Bold),
            Cell::new(value),
        ]);
    }
    table
}

fn schedule_table(schedule: &Schedule, start: Option<NaiveTime>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Time").add_attribute(Attribute::Bold),
        Cell::new("Volume (ml)").add_attribute(Attribute::Bold),
        Cell::new("Label").add_attribute(Attribute::Bold),
    ];
    if start.is_some() {
        header.push(Cell::new("Clock").add_attribute(Attribute::Bold));
    }
    table.set_header(header);

    for step in schedule.steps() {
        // pacing steps show a blank volume cell, matching the schedule rows
        let volume = if step.is_pour() {
            format!("{:.1}", step.volume)
        } else {
            String::new()
        };
        let mut row = vec![
            Cell::new(format!(
                "{} - {}",
                format_time(step.start),
                format_time(step.end)
            )),
            Cell::new(volume),
            Cell::new(&step.label),
        ];
        if let Some(st) = start {
            let at = st + chrono::Duration::seconds(i64::from(step.start));
            row.push(Cell::new(format!(
                "{:02}:{:02}:{:02}",
                at.hour(),
                at.minute(),
                at.second()
            )));
        }
        table.add_row(row);
    }
    table
}

/// `[######------] 40.0% (66s / 165s)`, the countdown's progress line.
fn render_progress_bar(elapsed: u32, total: u32, bar_width: usize) -> String {
    let percent = if total == 0 {
        100.0
    } else {
        (f64::from(elapsed) / f64::from(total) * 100.0).clamp(0.0, 100.0)
    };
    let filled = ((percent / 100.0) * bar_width as f64).round() as usize;
    let bar = format!("[{}{}]", "#".repeat(filled), "-".repeat(bar_width - filled));
    format!("{bar} {percent:>5.1}% ({elapsed}s / {total}s)")
}

/// Drive the brew countdown at one tick per real second. The loop exits as
/// soon as the timer leaves Running, so nothing keeps ticking afterwards.
fn run_brew(method: &Method) {
    let schedule = method.schedule().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    let mut timer = method.timer().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    println!(
        "\nBrewing \"{}\" ({} total)\n",
        method.title(),
        format_clock(timer.total_duration())
    );
    timer.start();
    while timer.is_running() {
        thread::sleep(Duration::from_secs(1));
        timer.tick();
        let active = schedule
            .active_at(timer.elapsed())
            .map(|i| schedule.steps()[i].label.as_str())
            .unwrap_or("-");
        print!(
            "\r{} {} {:<40}",
            format_clock(timer.elapsed()),
            render_progress_bar(timer.elapsed(), timer.total_duration(), 24),
            active
        );
        let _ = std::io::stdout().flush();
    }
    println!();
    if timer.phase() == TimerPhase::Complete {
        println!("Brew complete. Enjoy!");
    }
}

fn print_method(method: &Method, summary: &[(&str, String)], cli: &Cli) {
    let schedule = method.schedule().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    println!("\n=== {} by {} ===", method.title(), method.creator());
    println!("{}", summary_table(summary));
    println!("\n=== Pour Schedule ===");
    println!("{}", schedule_table(&schedule, parse_start(&cli.start)));

    if cli.brew {
        run_brew(method);
    }
}

fn load_custom(import: &Option<PathBuf>, link: &Option<String>) -> CustomMethod {
    if let Some(path) = import {
        let Ok(txt) = fs::read_to_string(path) else {
            eprintln!("Failed to read recipe: {}", path.display());
            std::process::exit(1);
        };
        let method = BrewRecipe::from_json(&txt)
            .and_then(|recipe| CustomMethod::from_recipe(&recipe));
        match method {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Import rejected: {e}");
                std::process::exit(1);
            }
        }
    } else if let Some(token) = link {
        // Undecodable links fall back to the seed method with a logged
        // warning; they are never fatal.
        brewn_core::share::decode_or_default(token)
    } else {
        CustomMethod::default()
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::FourSix {
            coffee,
            roast,
            taste,
            body,
        } => {
            if *coffee <= 0.0 {
                eprintln!("coffee must be > 0");
                std::process::exit(1);
            }
            let params = FourSixParams {
                coffee_grams: *coffee,
                roast: (*roast).into(),
                taste: (*taste).into(),
                body: (*body).into(),
            };
            let method = Method::FourSix(params);
            let duration = params.schedule().total_duration();
            let summary = vec![
                ("Total Water", fmt_ml(params.total_water())),
                ("Temperature", format!("{}°C", params.water_temp())),
                ("Brew Time", format_time(duration)),
                ("Pouring", format!("{} Pours", params.pour_count())),
            ];
            print_method(&method, &summary, &cli);
        }
        Command::Simple { coffee } | Command::BetterOne { coffee } => {
            if *coffee <= 0.0 {
                eprintln!("coffee must be > 0");
                std::process::exit(1);
            }
            let config = match &cli.command {
                Command::Simple { .. } => SIMPLE,
                _ => BETTER_ONE,
            };
            let params = UniformParams::new(*coffee, config);
            let method = Method::Uniform(params);
            let duration = method.total_duration().unwrap_or_else(|e| {
                eprintln!("{e}");
                std::process::exit(1);
            });
            let summary = vec![
                ("Total Water", fmt_ml(params.total_water())),
                ("Temperature", format!("{}°C", config.water_temp)),
                ("Grind Size", config.grind_size.to_string()),
                ("Brew Time", format_time(duration)),
                ("Pouring", format!("{} Pours", config.pours)),
            ];
            print_method(&method, &summary, &cli);
        }
        Command::ColdBrew {
            coffee,
            ratio,
            liquid,
            flavour,
            liquid_type,
        } => {
            let result = ColdBrewParams::new(
                *coffee,
                (*ratio).unwrap_or(10.0),
                (*flavour).into(),
                (*liquid_type).into(),
            )
            .and_then(|mut p| {
                if let Some(ml) = liquid {
                    p.set_liquid_ml(*ml)?;
                }
                Ok(p)
            });
            let params = result.unwrap_or_else(|e| {
                eprintln!("{e}");
                std::process::exit(1);
            });

            println!("\n=== Cold Brew Method ===");
            let summary = vec![
                ("Brew Time", format!("{} Hours", params.steep_hours())),
                (
                    "Total Liquid",
                    format!(
                        "{} ({})",
                        fmt_ml(params.liquid_ml()),
                        params.liquid_type.as_str()
                    ),
                ),
                ("Ratio", format!("1 : {:.2}", params.ratio())),
                ("Avg Result", format!("± {:.2} ml", params.average_yield_ml())),
                ("Liquidity", params.liquidity().as_str().to_string()),
            ];
            println!("{}", summary_table(&summary));
            let (lo, hi) = params.yield_range_ml();
            println!(
                "\nExpect {:.1}-{:.1} ml after the grounds take their share.",
                lo, hi
            );
        }
        Command::Custom {
            import,
            link,
            export,
            share,
        } => {
            let custom = load_custom(import, link);

            if let Some(path) = export {
                let json = BrewRecipe::from(&custom).to_json_pretty().unwrap_or_else(|e| {
                    eprintln!("{e}");
                    std::process::exit(1);
                });
                if let Err(e) = fs::write(path, json) {
                    eprintln!("Failed to write recipe: {e}");
                    std::process::exit(1);
                }
                println!("Recipe saved to {}", path.display());
            }
            if *share {
                match brewn_core::share::encode_share_token(&BrewRecipe::from(&custom)) {
                    Ok(token) => println!("Share token: {token}"),
                    Err(e) => {
                        eprintln!("{e}");
                        std::process::exit(1);
                    }
                }
            }

            let ratio = custom.ratio().unwrap_or_else(|e| {
                eprintln!("{e}");
                std::process::exit(1);
            });
            let summary = vec![
                ("Total Time", format_clock(custom.total_duration())),
                ("Total Water", fmt_ml(custom.total_water())),
                ("Ratio", format!("1 : {:.2}", ratio)),
                ("Pouring", format!("{} Pours", custom.schedule().len())),
            ];
            let method = Method::Custom(custom);
            print_method(&method, &summary, &cli);
        }
    }
}
