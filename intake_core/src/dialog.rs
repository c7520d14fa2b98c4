//! Conversational state machine.
//!
//! The turn-by-turn flows (profile setup, water/food/workout logging,
//! progress) are modeled as one explicit per-user state: a tagged enum
//! carrying whatever the next message is expected to fill in. The engine is
//! transport-agnostic; it consumes one line of user input and produces the
//! next state plus a reply. Invalid input re-prompts in place and never
//! touches stored state.

use crate::catalog::WorkoutCatalog;
use crate::lookup::{FoodHit, FoodLookup, TemperatureLookup};
use crate::store::ProfileStore;
use crate::types::{CounterKind, Gender, ProfilePatch};
use crate::{norms, progress, Error, Result};

// ============================================================================
// Commands and States
// ============================================================================

/// Top-level commands a user can issue from any state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    SetProfile,
    LogWater,
    LogFood,
    LogWorkout,
    Progress,
}

impl Command {
    /// Parse a slash command, e.g. "/log_water"
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "/start" => Some(Command::Start),
            "/help" => Some(Command::Help),
            "/set_profile" => Some(Command::SetProfile),
            "/log_water" => Some(Command::LogWater),
            "/log_food" => Some(Command::LogFood),
            "/log_workout" => Some(Command::LogWorkout),
            "/progress" => Some(Command::Progress),
            _ => None,
        }
    }
}

/// Which profile attribute the next message should carry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileField {
    Weight,
    Height,
    Age,
    Gender,
    Activity,
    City,
}

/// Profile attributes collected so far during setup
#[derive(Clone, Debug, Default)]
pub struct ProfileDraft {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<u32>,
    pub gender: Option<Gender>,
    pub activity_minutes: Option<u32>,
}

/// Per-user conversation state
#[derive(Clone, Debug, Default)]
pub enum Dialog {
    #[default]
    Idle,
    ProfileSetup {
        draft: ProfileDraft,
        pending: ProfileField,
    },
    WaterLog,
    FoodSearch,
    FoodChoice {
        options: Vec<FoodHit>,
    },
    FoodQuantity {
        chosen: FoodHit,
    },
    WorkoutLog,
}

/// One turn of the conversation: the state to keep and the reply to show
#[derive(Debug)]
pub struct Step {
    pub dialog: Dialog,
    pub reply: String,
}

impl Step {
    fn idle(reply: impl Into<String>) -> Self {
        Step {
            dialog: Dialog::Idle,
            reply: reply.into(),
        }
    }

    fn stay(dialog: Dialog, reply: impl Into<String>) -> Self {
        Step {
            dialog,
            reply: reply.into(),
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Drives dialogs against the store, the norm calculator and the external
/// lookups
pub struct DialogEngine<'a> {
    store: &'a ProfileStore,
    weather: &'a dyn TemperatureLookup,
    food: &'a dyn FoodLookup,
    catalog: &'a WorkoutCatalog,
}

impl<'a> DialogEngine<'a> {
    pub fn new(
        store: &'a ProfileStore,
        weather: &'a dyn TemperatureLookup,
        food: &'a dyn FoodLookup,
        catalog: &'a WorkoutCatalog,
    ) -> Self {
        Self {
            store,
            weather,
            food,
            catalog,
        }
    }

    /// Start a flow from a command. Commands cut short whatever flow was in
    /// progress.
    pub fn handle_command(&self, user_id: &str, command: Command) -> Result<Step> {
        match command {
            Command::Start => Ok(Step::idle(
                "Hi! I track your daily water and calorie intake. Type /help for commands.",
            )),
            Command::Help => Ok(Step::idle(
                "Available commands:\n\
                 /set_profile - set up your profile\n\
                 /log_water - log drunk water\n\
                 /log_food - log eaten food\n\
                 /log_workout - log a workout\n\
                 /progress - show today's progress",
            )),
            Command::SetProfile => Ok(Step::stay(
                Dialog::ProfileSetup {
                    draft: ProfileDraft::default(),
                    pending: ProfileField::Weight,
                },
                "Enter your weight (kg):",
            )),
            Command::LogWater => Ok(Step::stay(
                Dialog::WaterLog,
                "Enter the amount of water you drank, in ml:",
            )),
            Command::LogFood => Ok(Step::stay(Dialog::FoodSearch, "Enter a product name:")),
            Command::LogWorkout => Ok(Step::stay(
                Dialog::WorkoutLog,
                "Enter the workout type and duration, e.g. 'running 30':",
            )),
            Command::Progress => self.progress_step(user_id),
        }
    }

    /// Consume one line of user input in the given state.
    ///
    /// A line that parses as a slash command is handled as such regardless
    /// of the current state.
    pub fn handle_message(&self, user_id: &str, dialog: Dialog, input: &str) -> Result<Step> {
        if let Some(command) = Command::parse(input) {
            return self.handle_command(user_id, command);
        }

        match dialog {
            Dialog::Idle => Ok(Step::idle("I did not catch that. Type /help for commands.")),
            Dialog::ProfileSetup { draft, pending } => {
                self.profile_step(user_id, draft, pending, input)
            }
            Dialog::WaterLog => self.water_step(user_id, input),
            Dialog::FoodSearch => self.food_search_step(input),
            Dialog::FoodChoice { options } => Ok(food_choice_step(options, input)),
            Dialog::FoodQuantity { chosen } => self.food_quantity_step(user_id, chosen, input),
            Dialog::WorkoutLog => self.workout_step(user_id, input),
        }
    }

    // ------------------------------------------------------------------
    // Profile setup
    // ------------------------------------------------------------------

    fn profile_step(
        &self,
        user_id: &str,
        mut draft: ProfileDraft,
        pending: ProfileField,
        input: &str,
    ) -> Result<Step> {
        let retry = |draft: ProfileDraft, reply: &str| {
            Ok(Step::stay(
                Dialog::ProfileSetup {
                    draft,
                    pending,
                },
                reply,
            ))
        };

        match pending {
            ProfileField::Weight => match parse_positive_f64(input) {
                Ok(weight) => {
                    draft.weight_kg = Some(weight);
                    Ok(Step::stay(
                        Dialog::ProfileSetup {
                            draft,
                            pending: ProfileField::Height,
                        },
                        "Enter your height (cm):",
                    ))
                }
                Err(_) => retry(draft, "Please enter a weight in kg, a number above 0."),
            },
            ProfileField::Height => match parse_positive_f64(input) {
                Ok(height) => {
                    draft.height_cm = Some(height);
                    Ok(Step::stay(
                        Dialog::ProfileSetup {
                            draft,
                            pending: ProfileField::Age,
                        },
                        "Enter your age:",
                    ))
                }
                Err(_) => retry(draft, "Please enter a height in cm, a number above 0."),
            },
            ProfileField::Age => match parse_positive_u32(input) {
                Ok(age) => {
                    draft.age_years = Some(age);
                    Ok(Step::stay(
                        Dialog::ProfileSetup {
                            draft,
                            pending: ProfileField::Gender,
                        },
                        "Your gender (male/female):",
                    ))
                }
                Err(_) => retry(draft, "Please enter an age in whole years, above 0."),
            },
            ProfileField::Gender => match Gender::parse(input) {
                Ok(gender) => {
                    draft.gender = Some(gender);
                    Ok(Step::stay(
                        Dialog::ProfileSetup {
                            draft,
                            pending: ProfileField::Activity,
                        },
                        "How many minutes of activity do you get per day?",
                    ))
                }
                Err(_) => retry(draft, "Please answer 'male' or 'female'."),
            },
            ProfileField::Activity => match parse_activity(input) {
                Ok(minutes) => {
                    draft.activity_minutes = Some(minutes);
                    Ok(Step::stay(
                        Dialog::ProfileSetup {
                            draft,
                            pending: ProfileField::City,
                        },
                        "Which city are you in?",
                    ))
                }
                Err(_) => retry(
                    draft,
                    "Please enter daily activity in minutes, between 0 and 480.",
                ),
            },
            ProfileField::City => self.finish_profile(user_id, draft, input),
        }
    }

    /// Final setup step: fetch the temperature, derive both norms, persist
    /// the whole profile. A lookup failure keeps the state so the user can
    /// retry with the same or a corrected city name.
    fn finish_profile(&self, user_id: &str, draft: ProfileDraft, input: &str) -> Result<Step> {
        let city = input.trim();
        if city.is_empty() {
            return Ok(Step::stay(
                Dialog::ProfileSetup {
                    draft,
                    pending: ProfileField::City,
                },
                "Please enter a city name.",
            ));
        }

        let (Some(weight_kg), Some(height_cm), Some(age_years), Some(gender), Some(activity)) = (
            draft.weight_kg,
            draft.height_cm,
            draft.age_years,
            draft.gender,
            draft.activity_minutes,
        ) else {
            // Draft fields are filled strictly in order; a hole means the
            // state was built by hand. Start over.
            return self.handle_command(user_id, Command::SetProfile);
        };

        let temperature = match self.weather.current_temperature(city) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Temperature lookup failed for {}: {}", city, e);
                return Ok(Step::stay(
                    Dialog::ProfileSetup {
                        draft,
                        pending: ProfileField::City,
                    },
                    format!(
                        "Could not fetch the weather for '{city}'. \
                         Check the name and try again."
                    ),
                ));
            }
        };

        let water_norm = norms::water_norm(weight_kg, activity, temperature)?;
        let calories_norm = norms::calorie_norm(weight_kg, height_cm, age_years, gender, activity)?;

        self.store.upsert(
            user_id,
            &ProfilePatch {
                weight_kg: Some(weight_kg),
                height_cm: Some(height_cm),
                age_years: Some(age_years),
                gender: Some(gender),
                activity_minutes: Some(activity),
                city: Some(city.to_string()),
                water_norm_ml: Some(water_norm),
                calories_norm_kcal: Some(calories_norm),
            },
        )?;

        Ok(Step::idle(format!(
            "Your profile is set:\n\
             Weight: {weight_kg} kg\n\
             Height: {height_cm} cm\n\
             Age: {age_years}\n\
             Activity: {activity} min per day\n\
             City: {city}\n\
             Daily water norm: {water_norm:.0} ml\n\
             Daily calorie norm: {calories_norm:.0} kcal"
        )))
    }

    // ------------------------------------------------------------------
    // Water
    // ------------------------------------------------------------------

    fn water_step(&self, user_id: &str, input: &str) -> Result<Step> {
        let amount = match parse_positive_u32(input) {
            Ok(ml) => ml,
            Err(_) => {
                return Ok(Step::stay(
                    Dialog::WaterLog,
                    "Please enter a positive whole number of ml.",
                ))
            }
        };

        let total = self
            .store
            .increment_counter(user_id, CounterKind::WaterLoggedMl, f64::from(amount))?;

        Ok(Step::idle(format!(
            "Added {amount} ml of water. Total today: {total:.0} ml."
        )))
    }

    // ------------------------------------------------------------------
    // Food
    // ------------------------------------------------------------------

    fn food_search_step(&self, input: &str) -> Result<Step> {
        let query = input.trim();
        if query.is_empty() {
            return Ok(Step::stay(Dialog::FoodSearch, "Please enter a product name."));
        }

        let options = match self.food.search_food(query) {
            Ok(hits) => hits,
            Err(Error::Lookup(message)) => {
                // Interactive lookup failure aborts this logging attempt
                return Ok(Step::idle(format!("Food search failed: {message}")));
            }
            Err(e) => return Err(e),
        };

        let mut reply = String::from("Found products:\n");
        for (index, hit) in options.iter().enumerate() {
            reply.push_str(&format!(
                "{}. {} - {} kcal/100g\n",
                index + 1,
                hit.name,
                hit.kcal_per_100g
            ));
        }
        reply.push_str("Pick a product by number:");

        Ok(Step::stay(Dialog::FoodChoice { options }, reply))
    }

    fn food_quantity_step(&self, user_id: &str, chosen: FoodHit, input: &str) -> Result<Step> {
        let grams = match parse_positive_f64(input) {
            Ok(g) => g,
            Err(_) => {
                return Ok(Step::stay(
                    Dialog::FoodQuantity { chosen },
                    "Please enter an amount in grams, a number above 0.",
                ))
            }
        };

        let calories = chosen.kcal_per_100g / 100.0 * grams;
        let total = self
            .store
            .increment_counter(user_id, CounterKind::CaloriesLoggedKcal, calories)?;

        let mut reply = format!(
            "{}: {grams} g, {calories:.2} kcal.\nConsumed today: {total:.0} kcal",
            chosen.name
        );
        if let Some(record) = self.store.get(user_id) {
            if let Ok(report) = progress::report(&record) {
                reply.push_str(&format!(" of {:.0} kcal", report.calories_target_kcal));
            }
        }
        reply.push('.');

        Ok(Step::idle(reply))
    }

    // ------------------------------------------------------------------
    // Workout
    // ------------------------------------------------------------------

    fn workout_step(&self, user_id: &str, input: &str) -> Result<Step> {
        let format_help = format!(
            "Use the format: <workout type> <minutes>. Known types: {}.",
            self.catalog.known_types().join(", ")
        );

        let Some((workout_type, duration)) = parse_workout_line(input) else {
            return Ok(Step::stay(Dialog::WorkoutLog, format_help));
        };

        if duration == 0 {
            return Ok(Step::stay(
                Dialog::WorkoutLog,
                "The duration must be a whole number of minutes above 0.",
            ));
        }

        let cost = match norms::workout_energy(self.catalog, &workout_type, duration)? {
            Some(cost) => cost,
            None => {
                // Unknown workout type: help the user, mutate nothing
                return Ok(Step::stay(
                    Dialog::WorkoutLog,
                    format!("I don't know '{workout_type}'. {format_help}"),
                ));
            }
        };

        let burned_total = self.store.increment_counter(
            user_id,
            CounterKind::CaloriesBurnedKcal,
            cost.calories_kcal,
        )?;

        Ok(Step::idle(format!(
            "Workout: {workout_type} ({duration} min)\n\
             Burned: {:.0} kcal\n\
             Drink an extra {:.0} ml of water.\n\n\
             Total burned today: {burned_total:.0} kcal",
            cost.calories_kcal, cost.additional_water_ml
        )))
    }

    // ------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------

    fn progress_step(&self, user_id: &str) -> Result<Step> {
        let report = self
            .store
            .get(user_id)
            .ok_or(Error::ProfileNotFound)
            .and_then(|record| progress::report(&record));

        match report {
            Ok(report) => Ok(Step::idle(format!(
                "Today's progress:\n\
                 Water: {:.0} / {:.0} ml ({:.0} ml to go)\n\
                 Calories: {:.0} / {:.0} kcal (burned {:.0}, balance {:.0})",
                report.water_drunk_ml,
                report.water_target_ml,
                report.water_balance_ml,
                report.calories_consumed_kcal,
                report.calories_target_kcal,
                report.calories_burned_kcal,
                report.calories_balance_kcal
            ))),
            Err(Error::ProfileNotFound) => Ok(Step::idle(
                "No profile found. Set one up first with /set_profile.",
            )),
            Err(e) => Err(e),
        }
    }
}

/// Choice handling needs no engine access, split out for testability
fn food_choice_step(options: Vec<FoodHit>, input: &str) -> Step {
    match input.trim().parse::<usize>() {
        Ok(index) if (1..=options.len()).contains(&index) => {
            let chosen = options[index - 1].clone();
            let name = chosen.name.clone();
            Step::stay(
                Dialog::FoodQuantity { chosen },
                format!("You picked: {name}. Enter the amount in grams:"),
            )
        }
        _ => {
            let max = options.len();
            Step::stay(
                Dialog::FoodChoice { options },
                format!("Please pick a number between 1 and {max}."),
            )
        }
    }
}

// ============================================================================
// Input parsing
// ============================================================================

fn parse_positive_f64(input: &str) -> Result<f64> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("not a number: '{}'", input.trim())))?;
    if value <= 0.0 || !value.is_finite() {
        return Err(Error::invalid_input(format!(
            "expected a positive number, got {value}"
        )));
    }
    Ok(value)
}

fn parse_positive_u32(input: &str) -> Result<u32> {
    let value: u32 = input
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("not a whole number: '{}'", input.trim())))?;
    if value == 0 {
        return Err(Error::invalid_input("expected a number above 0"));
    }
    Ok(value)
}

fn parse_activity(input: &str) -> Result<u32> {
    let value: u32 = input
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("not a whole number: '{}'", input.trim())))?;
    if value > norms::MAX_ACTIVITY_MINUTES {
        return Err(Error::invalid_input(format!(
            "activity must be at most {} minutes",
            norms::MAX_ACTIVITY_MINUTES
        )));
    }
    Ok(value)
}

/// Split "<type words> <minutes>" into the type and the duration
fn parse_workout_line(input: &str) -> Option<(String, u32)> {
    let mut parts: Vec<&str> = input.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }
    let duration: u32 = parts.pop()?.parse().ok()?;
    Some((parts.join(" "), duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::lookup::FixedTemperature;
    use crate::Result;

    struct StubFood(Vec<FoodHit>);

    impl FoodLookup for StubFood {
        fn search_food(&self, query: &str) -> Result<Vec<FoodHit>> {
            if self.0.is_empty() {
                Err(Error::Lookup(format!("no products matched '{query}'")))
            } else {
                Ok(self.0.clone())
            }
        }
    }

    fn hits() -> Vec<FoodHit> {
        vec![
            FoodHit {
                name: "Rye bread".into(),
                kcal_per_100g: 250.0,
            },
            FoodHit {
                name: "White bread".into(),
                kcal_per_100g: 270.0,
            },
        ]
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        store: ProfileStore,
        weather: FixedTemperature,
        food: StubFood,
        catalog: WorkoutCatalog,
    }

    impl Fixture {
        fn new(temperature: f64, food: Vec<FoodHit>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store = ProfileStore::open(dir.path().join("storage.json")).unwrap();
            Fixture {
                _dir: dir,
                store,
                weather: FixedTemperature(temperature),
                food: StubFood(food),
                catalog: build_default_catalog(),
            }
        }

        fn engine(&self) -> DialogEngine<'_> {
            DialogEngine::new(&self.store, &self.weather, &self.food, &self.catalog)
        }
    }

    /// Walk a sequence of messages through the engine, returning the final step
    fn run_flow(engine: &DialogEngine<'_>, user: &str, inputs: &[&str]) -> Step {
        let mut step = Step {
            dialog: Dialog::Idle,
            reply: String::new(),
        };
        for input in inputs {
            step = engine.handle_message(user, step.dialog, input).unwrap();
        }
        step
    }

    #[test]
    fn test_profile_setup_happy_path() {
        let fixture = Fixture::new(28.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(
            &engine,
            "alice",
            &["/set_profile", "70", "175", "30", "male", "60", "Lisbon"],
        );

        assert!(matches!(step.dialog, Dialog::Idle));
        assert!(step.reply.contains("3600 ml"));
        assert!(step.reply.contains("2123 kcal"));

        let record = fixture.store.get("alice").unwrap();
        assert_eq!(record.weight_kg, Some(70.0));
        assert_eq!(record.city.as_deref(), Some("Lisbon"));
        assert_eq!(record.water_norm_ml, Some(3600.0));
        assert_eq!(record.calories_norm_kcal, Some(2122.77));
    }

    #[test]
    fn test_profile_setup_reprompts_on_invalid_weight() {
        let fixture = Fixture::new(20.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(&engine, "alice", &["/set_profile", "zero", "-3"]);

        // Still waiting for a weight, nothing stored
        assert!(matches!(
            step.dialog,
            Dialog::ProfileSetup {
                pending: ProfileField::Weight,
                ..
            }
        ));
        assert!(fixture.store.get("alice").is_none());
    }

    #[test]
    fn test_profile_setup_rejects_out_of_range_activity() {
        let fixture = Fixture::new(20.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(
            &engine,
            "alice",
            &["/set_profile", "70", "175", "30", "male", "481"],
        );

        assert!(matches!(
            step.dialog,
            Dialog::ProfileSetup {
                pending: ProfileField::Activity,
                ..
            }
        ));
    }

    struct FailingWeather;

    impl TemperatureLookup for FailingWeather {
        fn current_temperature(&self, _city: &str) -> Result<f64> {
            Err(Error::Lookup("city not found".into()))
        }
    }

    #[test]
    fn test_profile_setup_weather_failure_keeps_city_state() {
        let fixture = Fixture::new(20.0, vec![]);
        let food = StubFood(vec![]);
        let catalog = build_default_catalog();
        let engine = DialogEngine::new(&fixture.store, &FailingWeather, &food, &catalog);

        let step = run_flow(
            &engine,
            "alice",
            &["/set_profile", "70", "175", "30", "male", "60", "Nowhere"],
        );

        assert!(matches!(
            step.dialog,
            Dialog::ProfileSetup {
                pending: ProfileField::City,
                ..
            }
        ));
        assert!(step.reply.contains("try again"));
        assert!(fixture.store.get("alice").is_none());
    }

    #[test]
    fn test_command_interrupts_flow() {
        let fixture = Fixture::new(20.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(&engine, "alice", &["/set_profile", "70", "/log_water"]);
        assert!(matches!(step.dialog, Dialog::WaterLog));
    }

    #[test]
    fn test_water_logging_accumulates() {
        let fixture = Fixture::new(20.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(&engine, "bob", &["/log_water", "300"]);
        assert!(step.reply.contains("Total today: 300 ml"));

        let step = run_flow(&engine, "bob", &["/log_water", "200"]);
        assert!(step.reply.contains("Total today: 500 ml"));
    }

    #[test]
    fn test_water_logging_rejects_garbage_without_mutation() {
        let fixture = Fixture::new(20.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(&engine, "bob", &["/log_water", "-100"]);
        assert!(matches!(step.dialog, Dialog::WaterLog));
        assert!(fixture.store.get("bob").is_none());
    }

    #[test]
    fn test_food_flow_logs_proportional_calories() {
        let fixture = Fixture::new(20.0, hits());
        let engine = fixture.engine();

        let step = run_flow(&engine, "carol", &["/log_food", "bread", "2", "150"]);

        assert!(matches!(step.dialog, Dialog::Idle));
        // 270 kcal/100g * 150 g
        assert!(step.reply.contains("405.00 kcal"));

        let record = fixture.store.get("carol").unwrap();
        assert_eq!(record.counters.calories_logged_kcal, 405.0);
    }

    #[test]
    fn test_food_choice_out_of_range_reprompts() {
        let fixture = Fixture::new(20.0, hits());
        let engine = fixture.engine();

        let step = run_flow(&engine, "carol", &["/log_food", "bread", "7"]);
        assert!(matches!(step.dialog, Dialog::FoodChoice { .. }));
        assert!(step.reply.contains("between 1 and 2"));
    }

    #[test]
    fn test_food_search_failure_aborts_flow() {
        let fixture = Fixture::new(20.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(&engine, "carol", &["/log_food", "unobtainium"]);
        assert!(matches!(step.dialog, Dialog::Idle));
        assert!(step.reply.contains("Food search failed"));
    }

    #[test]
    fn test_workout_logs_burned_calories_and_water_advice() {
        let fixture = Fixture::new(20.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(&engine, "dave", &["/log_workout", "running 30"]);

        assert!(matches!(step.dialog, Dialog::Idle));
        assert!(step.reply.contains("Burned: 300 kcal"));
        assert!(step.reply.contains("extra 200 ml"));

        let record = fixture.store.get("dave").unwrap();
        assert_eq!(record.counters.calories_burned_kcal, 300.0);
        // Advice only: the stored norm is never touched by a workout
        assert!(record.water_norm_ml.is_none());
    }

    #[test]
    fn test_workout_unknown_type_mutates_nothing() {
        let fixture = Fixture::new(20.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(&engine, "dave", &["/log_workout", "quidditch 60"]);

        assert!(matches!(step.dialog, Dialog::WorkoutLog));
        assert!(step.reply.contains("quidditch"));
        assert!(fixture.store.get("dave").is_none());
    }

    #[test]
    fn test_workout_zero_duration_rejected() {
        let fixture = Fixture::new(20.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(&engine, "dave", &["/log_workout", "running 0"]);
        assert!(matches!(step.dialog, Dialog::WorkoutLog));
        assert!(fixture.store.get("dave").is_none());
    }

    #[test]
    fn test_progress_before_profile_gives_guidance() {
        let fixture = Fixture::new(20.0, vec![]);
        let engine = fixture.engine();

        let step = run_flow(&engine, "erin", &["/progress"]);
        assert!(step.reply.contains("/set_profile"));
    }

    #[test]
    fn test_progress_after_setup_and_logging() {
        let fixture = Fixture::new(28.0, vec![]);
        let engine = fixture.engine();

        run_flow(
            &engine,
            "frank",
            &["/set_profile", "70", "175", "30", "male", "60", "Lisbon"],
        );
        run_flow(&engine, "frank", &["/log_water", "600"]);
        run_flow(&engine, "frank", &["/log_workout", "walking 30"]);

        let step = run_flow(&engine, "frank", &["/progress"]);
        assert!(step.reply.contains("600 / 3600 ml"));
        // Effective target raised by 120 burned kcal
        assert!(step.reply.contains("2243 kcal"));
    }

    #[test]
    fn test_parse_workout_line_multiword_type() {
        assert_eq!(
            parse_workout_line("strength training 45"),
            Some(("strength training".into(), 45))
        );
        assert_eq!(parse_workout_line("running"), None);
        assert_eq!(parse_workout_line("running thirty"), None);
    }
}
