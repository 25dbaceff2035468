use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use muscu_core::workbook::format_date;
use muscu_core::*;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "muscu")]
#[command(about = "Workout log: strength and cardio sessions in a spreadsheet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workbook to read and update (defaults to the configured data directory)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new workbook with the starter catalog
    Init {
        /// Overwrite an existing workbook
        #[arg(long)]
        force: bool,
    },

    /// List categories, or the exercises of one category
    Categories {
        #[arg(long)]
        category: Option<String>,
    },

    /// Print logged sessions as CSV, newest first
    Show {
        /// Category filter ("Tout" or empty for all)
        #[arg(long)]
        category: Option<String>,

        /// Exercise filter, applied only with a category
        #[arg(long)]
        exercise: Option<String>,

        /// Read the cardio log when no category is given
        #[arg(long)]
        cardio: bool,
    },

    /// Show the pre-filled values for a new session
    Defaults {
        #[arg(long)]
        category: String,

        #[arg(long)]
        exercise: String,

        /// Session date (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Add an exercise to the catalog
    AddExercise {
        #[arg(long)]
        category: String,

        #[arg(long)]
        exercise: String,

        #[arg(long)]
        muscle: Option<String>,
    },

    /// Log a strength session; omitted values take the pre-filled defaults
    AddStrength {
        #[arg(long)]
        category: String,

        #[arg(long)]
        exercise: String,

        /// Session date (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Load in kg
        #[arg(long)]
        load: Option<f64>,

        #[arg(long)]
        repetitions: Option<f64>,

        #[arg(long)]
        series: Option<f64>,

        /// Rest between series, in seconds
        #[arg(long)]
        rest: Option<f64>,

        /// Augmenter, Maintenir, Diminuer or a 1-5 rating
        #[arg(long)]
        difficulty: Option<String>,

        /// Exercise logged the same day to pair with ("Non" for none)
        #[arg(long)]
        superset: Option<String>,
    },

    /// Log a cardio session
    AddCardio {
        #[arg(long)]
        exercise: String,

        /// Session date (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Total duration in minutes
        #[arg(long)]
        duration: Option<f64>,

        #[arg(long)]
        difficulty: Option<String>,

        /// Interval times, e.g. '["05:00", "10:00"]'
        #[arg(long)]
        splits: Option<String>,

        /// Intensity levels, e.g. '[4, 6]'
        #[arg(long)]
        levels: Option<String>,
    },

    /// Write the workbook under a new name
    Export {
        /// Base file name; the .xlsx extension is added
        #[arg(long)]
        name: Option<String>,

        /// Target directory (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() {
    muscu_core::logging::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let file = cli.file.unwrap_or_else(|| config.default_workbook_path());
    tracing::debug!("Using workbook {:?}", file);

    match cli.command {
        Commands::Init { force } => cmd_init(&file, force),
        Commands::Categories { category } => cmd_categories(&file, category),
        Commands::Show {
            category,
            exercise,
            cardio,
        } => cmd_show(&file, category, exercise, cardio),
        Commands::Defaults {
            category,
            exercise,
            date,
        } => cmd_defaults(&file, &category, &exercise, date, &config),
        Commands::AddExercise {
            category,
            exercise,
            muscle,
        } => cmd_add_exercise(&file, &category, &exercise, muscle),
        Commands::AddStrength {
            category,
            exercise,
            date,
            load,
            repetitions,
            series,
            rest,
            difficulty,
            superset,
        } => {
            let form = StrengthForm {
                date,
                load,
                repetitions,
                series,
                rest,
                difficulty,
                superset,
            };
            cmd_add_strength(&file, category, exercise, form, &config)
        }
        Commands::AddCardio {
            exercise,
            date,
            duration,
            difficulty,
            splits,
            levels,
        } => {
            let form = CardioForm {
                date,
                duration,
                difficulty,
                splits,
                levels,
            };
            cmd_add_cardio(&file, exercise, form, &config)
        }
        Commands::Export { name, dir } => {
            let name = name.unwrap_or_else(|| config.data.file_name.clone());
            cmd_export(&file, &name, dir)
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn session_date(date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(text) => Ok(parse_entry_date(&text)?),
        None => Ok(today()),
    }
}

fn cmd_init(file: &Path, force: bool) -> Result<()> {
    if file.exists() && !force {
        return Err(Error::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            file.display()
        )));
    }

    let state = WorkoutState::new(starter_catalog().clone());
    state.save(file)?;

    println!("✓ Created {}", file.display());
    println!("  {} categories", state.catalog().categories().len());
    Ok(())
}

fn cmd_categories(file: &Path, category: Option<String>) -> Result<()> {
    let state = WorkoutState::open(file)?;

    let names = match &category {
        Some(c) => state.catalog().exercises(c),
        None => state.catalog().categories(),
    };
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_show(
    file: &Path,
    category: Option<String>,
    exercise: Option<String>,
    cardio: bool,
) -> Result<()> {
    let state = WorkoutState::open(file)?;
    let category = Selector::from(category.as_deref());
    let exercise = Selector::from(exercise.as_deref());

    let view = state.view(&category, &exercise, cardio);
    write_view(&view, io::stdout())?;
    Ok(())
}

fn write_view<W: io::Write>(view: &View, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    match view {
        View::Strength(records) => {
            writer.write_record(workbook::STRENGTH_COLUMNS.iter().map(|c| c.name))?;
            for r in records {
                writer.write_record([
                    format_date(r.date),
                    r.exercise.clone(),
                    r.category.clone(),
                    r.load.map(|l| l.to_string()).unwrap_or_default(),
                    r.difficulty.to_string(),
                    r.repetitions.to_string(),
                    r.series.to_string(),
                    r.rest.to_string(),
                    r.superset.clone(),
                ])?;
            }
        }
        View::Cardio(records) => {
            writer.write_record(workbook::CARDIO_COLUMNS.iter().map(|c| c.name))?;
            for r in records {
                writer.write_record([
                    format_date(r.date),
                    r.exercise.clone(),
                    r.category.clone(),
                    r.duration.to_string(),
                    r.difficulty.to_string(),
                    r.splits.clone(),
                    r.levels.clone(),
                ])?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

fn cmd_defaults(
    file: &Path,
    category: &str,
    exercise: &str,
    date: Option<String>,
    config: &Config,
) -> Result<()> {
    let state = WorkoutState::open(file)?;
    let date = session_date(date)?;

    if is_cardio(category) {
        let d = state.cardio_defaults(exercise, &config.defaults);
        println!("duration: {}", d.duration);
        println!("difficulty: {}", d.difficulty);
        println!("splits: {}", d.splits);
        println!("levels: {}", d.levels);
    } else {
        let d = state.strength_defaults(category, exercise, date, &config.defaults);
        println!("series: {}", d.series);
        println!("repetitions: {}", d.repetitions);
        println!(
            "load: {}",
            d.load.map(|l| l.to_string()).unwrap_or_default()
        );
        println!("rest: {}", d.rest);
        println!("difficulty: {}", d.difficulty);
        println!("superset: {}", d.superset_options.join(", "));
    }
    Ok(())
}

fn cmd_add_exercise(file: &Path, category: &str, exercise: &str, muscle: Option<String>) -> Result<()> {
    let mut state = WorkoutState::open(file)?;
    let change = state.add_exercise(category, exercise, muscle.as_deref())?;
    state.save(file)?;

    if let Change::ExerciseAdded { category, exercise } = change {
        println!("✓ Added {} to {}", exercise, category);
    }
    Ok(())
}

/// Strength values given on the command line
struct StrengthForm {
    date: Option<String>,
    load: Option<f64>,
    repetitions: Option<f64>,
    series: Option<f64>,
    rest: Option<f64>,
    difficulty: Option<String>,
    superset: Option<String>,
}

fn cmd_add_strength(
    file: &Path,
    category: String,
    exercise: String,
    form: StrengthForm,
    config: &Config,
) -> Result<()> {
    let mut state = WorkoutState::open(file)?;
    let date = session_date(form.date)?;
    let defaults = state.strength_defaults(&category, &exercise, date, &config.defaults);

    let difficulty = match form.difficulty {
        Some(text) => parse_entry_difficulty(&text)?,
        None => defaults.difficulty,
    };

    let entry = StrengthEntry {
        date,
        category,
        exercise,
        load: form.load.or(defaults.load),
        difficulty,
        repetitions: form.repetitions.unwrap_or(f64::from(defaults.repetitions)),
        series: form.series.unwrap_or(f64::from(defaults.series)),
        rest: form.rest.unwrap_or(f64::from(defaults.rest)),
        superset: form.superset.unwrap_or_else(|| NO_SUPERSET.to_string()),
    };

    let change = state.append_strength(entry)?;
    state.save(file)?;

    if let Change::StrengthAppended { position } = change {
        println!("✓ Session logged (#{})", position + 1);
    }
    Ok(())
}

/// Cardio values given on the command line
struct CardioForm {
    date: Option<String>,
    duration: Option<f64>,
    difficulty: Option<String>,
    splits: Option<String>,
    levels: Option<String>,
}

fn cmd_add_cardio(file: &Path, exercise: String, form: CardioForm, config: &Config) -> Result<()> {
    let mut state = WorkoutState::open(file)?;
    let date = session_date(form.date)?;
    let defaults = state.cardio_defaults(&exercise, &config.defaults);

    let difficulty = match form.difficulty {
        Some(text) => parse_entry_difficulty(&text)?,
        None => defaults.difficulty,
    };

    let entry = CardioEntry {
        date,
        exercise,
        duration: form.duration.unwrap_or(defaults.duration),
        difficulty,
        splits: form.splits.unwrap_or(defaults.splits),
        levels: form.levels.unwrap_or(defaults.levels),
    };

    let change = state.append_cardio(entry)?;
    state.save(file)?;

    if let Change::CardioAppended { position } = change {
        println!("✓ Cardio session logged (#{})", position + 1);
    }
    Ok(())
}

fn cmd_export(file: &Path, name: &str, dir: Option<PathBuf>) -> Result<()> {
    let state = WorkoutState::open(file)?;
    let target = dir
        .unwrap_or_else(|| PathBuf::from("."))
        .join(export_file_name(name)?);

    state.save(&target)?;
    println!("✓ Exported to {}", target.display());
    Ok(())
}
