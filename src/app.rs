use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::catalog::{
    CatalogState, FilterConfig, FilterUpdate, MinCompatibility, RecommendationView, SortKey,
    TypeFilter, PAGE_SIZE,
};
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat, Theme};
use crate::runner::{LoadReport, Options, Runner};
use crate::utils;

fn print_banner(no_color: bool) {
    const BANNER: &str = r#"
    ___ __                           __
   / _/(_) /_ ___ ____ ___  __ __ __/ /_
  / /_/ / __/(_-</ __// _ \/ // // _  _/
 / __/ /\__//___/\__/ \___/\_,_/ \_,_/
/_/
       v0.2.1 - shoe-fit recommendation browser
    "#;
    if no_color {
        print!("{}", BANNER);
    } else {
        let _ = write!(&mut rainbowcoat::stdout(), "{}", BANNER);
    }
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

// Everything a run needs, with CLI flags already merged over the
// config file.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub base_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub rate: u32,
    pub timeout: usize,
    pub workers: usize,
    pub proxy: Option<String>,
    pub follow_redirects: bool,
    pub min_compatibility: Option<u8>,
    pub type_filter: TypeFilter,
    pub sort_key: SortKey,
    pub limit: usize,
    pub show_all: bool,
    pub probe_images: bool,
    pub interactive: bool,
    pub theme: Theme,
    pub no_color: bool,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    let base_url = args
        .base_url
        .or(cfg.base_url)
        .ok_or_else(|| "no base URL, pass -b or set base_url in the config file".to_string())?;

    let email = args.email.or(cfg.email);
    let password = args.password.or(cfg.password);

    let min_compatibility = args.min_compatibility.or(cfg.min_compatibility);
    if let Some(pct) = min_compatibility {
        if pct > 100 {
            return Err(format!("invalid min_compatibility '{pct}', expected 0-100"));
        }
    }

    let type_filter = match args.shoe_type.or(cfg.shoe_type) {
        Some(raw) => {
            TypeFilter::parse(&raw).ok_or_else(|| format!("invalid shoe type '{raw}'"))?
        }
        None => TypeFilter::All,
    };

    let sort_key = match args.sort.or(cfg.sort) {
        Some(raw) => SortKey::parse(&raw).ok_or_else(|| format!("invalid sort key '{raw}'"))?,
        None => SortKey::CompatibilityDesc,
    };

    let limit = match args.limit.or(cfg.limit) {
        Some(0) => return Err("invalid limit, expected a positive number".to_string()),
        Some(n) => n,
        None => PAGE_SIZE,
    };

    let theme = match args.theme.or(cfg.theme) {
        Some(raw) => Theme::parse(&raw).ok_or_else(|| format!("invalid theme '{raw}'"))?,
        None => Theme::Dark,
    };

    Ok(RunConfig {
        base_url,
        email,
        password,
        rate: args.rate.or(cfg.rate).unwrap_or(50),
        timeout: args.timeout.or(cfg.timeout).unwrap_or(10),
        workers: args.workers.or(cfg.workers).unwrap_or(4),
        proxy: args.proxy.or(cfg.proxy),
        follow_redirects: args.follow_redirects || cfg.follow_redirects.unwrap_or(false),
        min_compatibility,
        type_filter,
        sort_key,
        limit,
        show_all: args.show_all,
        probe_images: !args.no_probe && cfg.probe_images.unwrap_or(true),
        interactive: args.interactive,
        theme,
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
        output: args.output.or(cfg.output),
        output_format: args.output_format.or(cfg.output_format),
        verbose: args.verbose,
    })
}

fn initial_filters(run: &RunConfig) -> FilterConfig {
    FilterConfig {
        min_compatibility: run
            .min_compatibility
            .map(MinCompatibility::AtLeast)
            .unwrap_or(MinCompatibility::Any),
        type_filter: run.type_filter,
        sort_key: run.sort_key,
        visible_count: if run.show_all { usize::MAX } else { run.limit },
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner(run.no_color);

    format_kv_line("target", &run.base_url);
    format_kv_line("session", run.email.as_deref().unwrap_or("anonymous"));
    format_kv_line("theme", run.theme.as_str());
    if run.verbose > 0 {
        format_kv_line("rate", &format!("{} req/s", run.rate));
        format_kv_line("timeout", &format!("{}s", run.timeout));
    }
    println!();

    let options = Options {
        base_url: run.base_url.clone(),
        email: run.email.clone(),
        password: run.password.clone(),
        rate: run.rate,
        timeout_seconds: run.timeout,
        proxy: run.proxy.clone(),
        follow_redirects: run.follow_redirects,
        probe_images: run.probe_images,
    };
    let runner = Runner::new(options).map_err(|e| e.to_string())?;

    let pb = ProgressBar::new(1);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(200));
    pb.set_style(
        ProgressStyle::with_template(
            ":: Progress: [{pos}/{len}] :: {per_sec} :: Duration: [{elapsed_precise}] :: {msg}",
        )
        .map_err(|e| format!("failed to build progress bar style: {e}"))?
        .progress_chars(r#"#>-"#),
    );

    let report = match runner.run(&pb).await {
        Ok(report) => {
            pb.finish_and_clear();
            report
        }
        Err(e) => {
            pb.finish_and_clear();
            println!(
                "{}{}{} {}",
                "[".bold().white(),
                "x".bold().red(),
                "]".bold().white(),
                "could not load recommendations".bold().white(),
            );
            format_kv_line("hint", "check the service is reachable, then run again");
            return Err(e.to_string());
        }
    };

    match &report.state {
        CatalogState::Unauthenticated => {
            output::print_unauthenticated(&report.base);
        }
        CatalogState::Empty => {
            output::print_empty(&report.base);
        }
        CatalogState::Ready(loaded) => {
            let mut view =
                RecommendationView::with_filters(loaded.items().to_vec(), initial_filters(&run));

            if run.verbose > 0 {
                format_kv_line(
                    "types",
                    &format!(
                        "lookup {}, heuristic {}, default {}",
                        report.stats.looked_up, report.stats.heuristic, report.stats.defaulted
                    ),
                );
                println!();
            }

            output::print_gallery(&view, &report.images, &report.base, run.theme);
            write_export(&run, &view, &report).await?;

            if run.interactive {
                interactive_loop(&mut view, &report, &run).await;
            }
        }
    }

    println!();
    println!(
        ":: Completed :: load took {}ms ::",
        report.elapsed.as_millis()
    );
    Ok(())
}

async fn write_export(
    run: &RunConfig,
    view: &RecommendationView,
    report: &LoadReport,
) -> Result<(), String> {
    let Some(outfile_path) = run.output.as_ref() else {
        return Ok(());
    };

    let output_format = run
        .output_format
        .as_deref()
        .and_then(OutputFormat::parse)
        .or_else(|| output::infer_format_from_path(outfile_path))
        .unwrap_or(OutputFormat::Text);

    let records = output::build_records(&view.visible(), &report.images, &report.base);
    let rendered = match output_format {
        OutputFormat::Text => output::render_text(&records),
        OutputFormat::Json => output::render_json(&records),
        OutputFormat::Xml => output::render_xml(&records),
        OutputFormat::Html => output::render_html(&records),
    };

    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(outfile_path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|_| "failed to write output file".to_string())?;
    Ok(())
}

// Small read-eval loop standing in for the page's filter controls. Every
// accepted command mutates the view and repaints the gallery.
async fn interactive_loop(view: &mut RecommendationView, report: &LoadReport, run: &RunConfig) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!();
        println!(":: more | min <PCT> | type <NAME> | sort <KEY> | limit <N> | q ::");
        print!("> ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            _ => break,
        };
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        let update = match command {
            "" | "more" => {
                view.show_more();
                None
            }
            "q" | "quit" | "exit" => break,
            "min" => match utils::parse_compatibility_threshold(argument) {
                Ok(pct) => Some(FilterUpdate {
                    min_compatibility: Some(MinCompatibility::AtLeast(pct)),
                    ..Default::default()
                }),
                Err(e) => {
                    println!("{} {}", "!".bold().red(), e);
                    continue;
                }
            },
            "type" => match TypeFilter::parse(argument) {
                Some(type_filter) => Some(FilterUpdate {
                    type_filter: Some(type_filter),
                    ..Default::default()
                }),
                None => {
                    println!("{} unknown type '{argument}'", "!".bold().red());
                    continue;
                }
            },
            "sort" => match SortKey::parse(argument) {
                Some(sort_key) => Some(FilterUpdate {
                    sort_key: Some(sort_key),
                    ..Default::default()
                }),
                None => {
                    println!("{} unknown sort key '{argument}'", "!".bold().red());
                    continue;
                }
            },
            "limit" => match utils::parse_positive(argument) {
                Ok(count) => Some(FilterUpdate {
                    visible_count: Some(count),
                    ..Default::default()
                }),
                Err(e) => {
                    println!("{} {}", "!".bold().red(), e);
                    continue;
                }
            },
            other => {
                println!("{} unknown command '{other}'", "!".bold().red());
                continue;
            }
        };

        if let Some(update) = update {
            view.set_filter(update);
        }
        println!();
        output::print_gallery(view, &report.images, &report.base, run.theme);
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::parse();
    validation::validate(&args)?;

    let config_path: PathBuf = match args.config.as_deref() {
        Some(path) => config::expand_tilde(path),
        None => config::default_config_path()
            .ok_or_else(|| "could not determine home directory".to_string())?,
    };
    let cfg = if args.config.is_some() {
        config::load_config(&config_path, false)?
    } else {
        config::ensure_default_config_file(&config_path)?;
        config::load_config(&config_path, true)?
    };

    if args.save_theme {
        let mut updated = cfg.clone();
        updated.theme = args.theme.clone();
        config::save_config(&config_path, &updated)?;
    }

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(run.workers)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
