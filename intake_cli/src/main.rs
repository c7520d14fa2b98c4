use clap::{Parser, Subcommand};
use intake_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Daily water and calorie tracking assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User identifier the command applies to
    #[arg(long, global = true, default_value = "default")]
    user: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up or update the profile and derive daily norms
    Profile {
        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,

        /// Height in cm
        #[arg(long)]
        height: Option<f64>,

        /// Age in years
        #[arg(long)]
        age: Option<u32>,

        /// Gender (male/female)
        #[arg(long)]
        gender: Option<String>,

        /// Daily activity in minutes (0-480)
        #[arg(long)]
        activity: Option<u32>,

        /// City used to fetch the current temperature
        #[arg(long)]
        city: Option<String>,

        /// Skip the weather lookup and use this temperature in °C
        #[arg(long)]
        temperature: Option<f64>,
    },

    /// Log drunk water in ml
    Water {
        /// Amount in ml
        ml: u32,
    },

    /// Search a food product and log eaten calories
    Food {
        /// Product name to search for
        query: String,

        /// Amount eaten in grams
        grams: f64,
    },

    /// Log a workout
    Workout {
        /// Workout type, e.g. running
        kind: String,

        /// Duration in minutes
        minutes: u32,
    },

    /// Show today's progress
    Progress,

    /// Run the daily reset (once, or as a background daemon)
    Reset {
        /// Keep running and fire at the configured hour every day
        #[arg(long)]
        daemon: bool,

        /// Skip the weather lookup and use this temperature in °C
        #[arg(long)]
        temperature: Option<f64>,
    },

    /// Interactive conversation mode (/set_profile, /log_water, ...)
    Chat {
        /// Skip the weather lookup and use this temperature in °C
        #[arg(long)]
        temperature: Option<f64>,
    },
}

fn main() -> Result<()> {
    intake_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Workout catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Config("Invalid workout catalog".into()));
    }

    let store = ProfileStore::open(data_dir.join("storage.json"))?;

    match cli.command {
        Commands::Profile {
            weight,
            height,
            age,
            gender,
            activity,
            city,
            temperature,
        } => {
            let weather = build_weather(&config, temperature)?;
            let fields = match (weight, height, age, gender, activity, city) {
                (Some(w), Some(h), Some(a), Some(g), Some(act), Some(c)) => {
                    Some((w, h, a, g, act, c))
                }
                _ => None,
            };
            match fields {
                Some((w, h, a, g, act, c)) => {
                    cmd_profile_flags(&store, weather.as_ref(), &cli.user, w, h, a, &g, act, &c)
                }
                None => cmd_profile_interactive(&store, weather.as_ref(), &config, &cli.user),
            }
        }
        Commands::Water { ml } => cmd_water(&store, &cli.user, ml),
        Commands::Food { query, grams } => cmd_food(&store, &config, &cli.user, &query, grams),
        Commands::Workout { kind, minutes } => {
            cmd_workout(&store, catalog, &cli.user, &kind, minutes)
        }
        Commands::Progress => cmd_progress(&store, &cli.user),
        Commands::Reset {
            daemon,
            temperature,
        } => cmd_reset(store, &config, daemon, temperature),
        Commands::Chat { temperature } => cmd_chat(&store, &config, &cli.user, temperature),
    }
}

/// Pick the temperature source: an explicit override, the configured API
/// key, or a stand-in that explains how to get one.
fn build_weather(
    config: &Config,
    temperature: Option<f64>,
) -> Result<Arc<dyn TemperatureLookup>> {
    if let Some(t) = temperature {
        return Ok(Arc::new(FixedTemperature(t)));
    }
    match config.weather_api_key() {
        Some(key) => Ok(Arc::new(lookup::OpenWeatherClient::new(
            config.weather.base_url.clone(),
            key,
            config.weather_timeout(),
        )?)),
        None => Ok(Arc::new(MissingApiKey)),
    }
}

/// Used when neither an API key nor a --temperature override is available
struct MissingApiKey;

impl TemperatureLookup for MissingApiKey {
    fn current_temperature(&self, _city: &str) -> Result<f64> {
        Err(Error::Lookup(
            "no weather API key configured; set WEATHER_API_KEY or pass --temperature".into(),
        ))
    }
}

fn cmd_profile_flags(
    store: &ProfileStore,
    weather: &dyn TemperatureLookup,
    user: &str,
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    gender: &str,
    activity_minutes: u32,
    city: &str,
) -> Result<()> {
    let gender = Gender::parse(gender)?;
    let temperature = weather.current_temperature(city)?;

    let water_norm = norms::water_norm(weight_kg, activity_minutes, temperature)?;
    let calories_norm =
        norms::calorie_norm(weight_kg, height_cm, age_years, gender, activity_minutes)?;

    store.upsert(
        user,
        &ProfilePatch {
            weight_kg: Some(weight_kg),
            height_cm: Some(height_cm),
            age_years: Some(age_years),
            gender: Some(gender),
            activity_minutes: Some(activity_minutes),
            city: Some(city.to_string()),
            water_norm_ml: Some(water_norm),
            calories_norm_kcal: Some(calories_norm),
        },
    )?;

    println!("✓ Profile saved for {}", user);
    println!("  Weight: {} kg, height: {} cm, age: {}", weight_kg, height_cm, age_years);
    println!("  Activity: {} min/day, city: {}", activity_minutes, city);
    println!("  Daily water norm: {:.0} ml", water_norm);
    println!("  Daily calorie norm: {:.0} kcal", calories_norm);
    Ok(())
}

/// Interactive profile setup when not all flags were given
fn cmd_profile_interactive(
    store: &ProfileStore,
    weather: &dyn TemperatureLookup,
    config: &Config,
    user: &str,
) -> Result<()> {
    let food = lookup::OpenFoodFactsClient::new(
        config.food.base_url.clone(),
        config.food_timeout(),
        config.food.page_size,
    )?;
    let catalog = get_default_catalog();
    let engine = DialogEngine::new(store, weather, &food, catalog);

    let mut step = engine.handle_command(user, Command::SetProfile)?;
    let stdin = io::stdin();

    loop {
        println!("{}", step.reply);
        if matches!(step.dialog, Dialog::Idle) {
            break;
        }
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!("\nProfile setup aborted.");
            break;
        }
        step = engine.handle_message(user, step.dialog, line.trim())?;
    }

    Ok(())
}

fn cmd_water(store: &ProfileStore, user: &str, ml: u32) -> Result<()> {
    if ml == 0 {
        return Err(Error::invalid_input("amount must be above 0 ml"));
    }
    let total = store.increment_counter(user, CounterKind::WaterLoggedMl, f64::from(ml))?;
    println!("✓ Added {} ml of water. Total today: {:.0} ml", ml, total);

    if let Some(record) = store.get(user) {
        if let Ok(report) = progress::report(&record) {
            println!("  {:.0} ml to go", report.water_balance_ml);
        }
    }
    Ok(())
}

fn cmd_food(
    store: &ProfileStore,
    config: &Config,
    user: &str,
    query: &str,
    grams: f64,
) -> Result<()> {
    if grams <= 0.0 || !grams.is_finite() {
        return Err(Error::invalid_input("amount must be above 0 grams"));
    }

    let food = lookup::OpenFoodFactsClient::new(
        config.food.base_url.clone(),
        config.food_timeout(),
        config.food.page_size,
    )?;

    let hits = match food.search_food(query) {
        Ok(hits) => hits,
        Err(Error::Lookup(message)) => {
            println!("Food search failed: {}", message);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    // Non-interactive mode takes the best match
    let Some(hit) = hits.first() else {
        println!("Food search returned no matches.");
        return Ok(());
    };
    let calories = hit.kcal_per_100g / 100.0 * grams;
    let total = store.increment_counter(user, CounterKind::CaloriesLoggedKcal, calories)?;

    println!(
        "✓ {}: {} g, {:.2} kcal ({} kcal/100g)",
        hit.name, grams, calories, hit.kcal_per_100g
    );
    println!("  Consumed today: {:.0} kcal", total);
    Ok(())
}

fn cmd_workout(
    store: &ProfileStore,
    catalog: &WorkoutCatalog,
    user: &str,
    kind: &str,
    minutes: u32,
) -> Result<()> {
    let Some(cost) = norms::workout_energy(catalog, kind, minutes)? else {
        println!("Unknown workout type: {}", kind);
        println!("Known types: {}", catalog.known_types().join(", "));
        return Ok(());
    };

    let total =
        store.increment_counter(user, CounterKind::CaloriesBurnedKcal, cost.calories_kcal)?;

    println!("✓ Workout: {} ({} min)", kind, minutes);
    println!("  Burned: {:.0} kcal", cost.calories_kcal);
    println!("  Drink an extra {:.0} ml of water", cost.additional_water_ml);
    println!("  Total burned today: {:.0} kcal", total);
    Ok(())
}

fn cmd_progress(store: &ProfileStore, user: &str) -> Result<()> {
    let report = store
        .get(user)
        .ok_or(Error::ProfileNotFound)
        .and_then(|record| progress::report(&record));

    match report {
        Ok(report) => {
            display_report(&report);
            Ok(())
        }
        Err(Error::ProfileNotFound) => {
            println!("No profile found. Run 'intake profile' first.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn cmd_reset(
    store: ProfileStore,
    config: &Config,
    daemon: bool,
    temperature: Option<f64>,
) -> Result<()> {
    let weather = build_weather(config, temperature)?;
    let scheduler = Arc::new(DailyResetScheduler::new(Arc::new(store), weather));

    if daemon {
        println!(
            "Daily reset daemon running, firing at {:02}:00 local time",
            config.reset.hour
        );
        let handle = scheduler.spawn(config.reset.hour);
        handle
            .join()
            .map_err(|_| Error::Config("reset daemon thread panicked".into()))?;
        return Ok(());
    }

    match scheduler.trigger() {
        Some(summary) => {
            println!(
                "✓ Daily reset done: {} users reset, {} norms recomputed, {} skipped",
                summary.users_reset, summary.norms_recomputed, summary.norms_skipped
            );
        }
        None => println!("A reset sweep is already running."),
    }
    Ok(())
}

fn cmd_chat(
    store: &ProfileStore,
    config: &Config,
    user: &str,
    temperature: Option<f64>,
) -> Result<()> {
    let weather = build_weather(config, temperature)?;
    let food = lookup::OpenFoodFactsClient::new(
        config.food.base_url.clone(),
        config.food_timeout(),
        config.food.page_size,
    )?;
    let catalog = get_default_catalog();
    let engine = DialogEngine::new(store, weather.as_ref(), &food, catalog);

    println!("Conversation mode. Type /help for commands, /quit to leave.");

    let mut dialog = Dialog::Idle;
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/quit" {
            break;
        }

        let step = engine.handle_message(user, dialog, input)?;
        println!("{}", step.reply);
        dialog = step.dialog;
    }

    println!("Bye!");
    Ok(())
}

fn display_report(report: &ProgressReport) {
    println!("╭─────────────────────────────────────────╮");
    println!("│  TODAY'S PROGRESS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Water:    {:.0} / {:.0} ml ({:.0} ml to go)",
        report.water_drunk_ml, report.water_target_ml, report.water_balance_ml
    );
    println!(
        "  Calories: {:.0} / {:.0} kcal",
        report.calories_consumed_kcal, report.calories_target_kcal
    );
    println!(
        "  Burned:   {:.0} kcal (raises today's allowance)",
        report.calories_burned_kcal
    );
    println!("  Balance:  {:.0} kcal", report.calories_balance_kcal);
    println!();
}
