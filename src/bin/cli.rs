//! Insurance CLI - Command-line interface for insurance cost predictions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use insurance::artifacts::{ArtifactConfig, DEFAULT_MODEL_DIR};
use insurance::core::risk::{factor_impacts, recommendations, risk_factors};
use insurance::data::RecordBatch;
use insurance::error::validate_record;
use insurance::models::{CategoricalField, InputRecord};
use insurance::predictor::InsurancePredictor;

#[derive(Parser)]
#[command(name = "insurance")]
#[command(author, version, about = "Health insurance cost prediction CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run the interactive input form
    #[arg(short, long)]
    interactive: bool,

    /// Directory containing the model and scaler artifacts
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,

    /// Young cohort model file name
    #[arg(long, default_value = "model_young.json")]
    model_young: String,

    /// Rest cohort model file name
    #[arg(long, default_value = "model_rest.json")]
    model_rest: String,

    /// Young cohort scaler file name
    #[arg(long, default_value = "scaler_young.json")]
    scaler_young: String,

    /// Rest cohort scaler file name
    #[arg(long, default_value = "scaler_rest.json")]
    scaler_rest: String,
}

impl Cli {
    fn artifact_config(&self) -> ArtifactConfig {
        ArtifactConfig {
            model_dir: self.model_dir.clone(),
            model_young: self.model_young.clone(),
            model_rest: self.model_rest.clone(),
            scaler_young: self.scaler_young.clone(),
            scaler_rest: self.scaler_rest.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the cost for one applicant
    Predict {
        /// Age (18-100)
        #[arg(short, long)]
        age: u32,

        /// Number of dependants (0-20)
        #[arg(short, long, default_value = "0")]
        dependants: u32,

        /// Income in lakhs (0-200)
        #[arg(long, default_value = "0")]
        income: u32,

        /// Genetical risk (0-5)
        #[arg(long, default_value = "0")]
        genetical_risk: u32,

        /// Insurance plan: Bronze, Silver or Gold
        #[arg(long, default_value = "Bronze")]
        plan: String,

        /// Employment status: Salaried, Self-Employed or Freelancer
        #[arg(long, default_value = "Salaried")]
        employment: String,

        /// Gender: Male or Female
        #[arg(long, default_value = "Male")]
        gender: String,

        /// Marital status: Unmarried or Married
        #[arg(long, default_value = "Unmarried")]
        marital_status: String,

        /// BMI category: Normal, Obesity, Overweight or Underweight
        #[arg(long, default_value = "Normal")]
        bmi: String,

        /// Smoking status: No Smoking, Regular or Occasional
        #[arg(long, default_value = "No Smoking")]
        smoking: String,

        /// Region: Northwest, Southeast, Northeast or Southwest
        #[arg(long, default_value = "Northeast")]
        region: String,

        /// Medical history, e.g. "Diabetes & Thyroid"
        #[arg(long, default_value = "No Disease")]
        medical_history: String,
    },

    /// Predict costs for every applicant in a CSV file
    Batch {
        /// CSV file with form labels as headers
        #[arg(short, long)]
        input: PathBuf,

        /// Number of rows to print
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// List the categorical options and factor impacts
    Options,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("{}", "Insurance Cost Predictor".cyan().bold());
    println!();

    let config = cli.artifact_config();

    if cli.interactive {
        run_interactive(&config)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Predict {
                age,
                dependants,
                income,
                genetical_risk,
                plan,
                employment,
                gender,
                marital_status,
                bmi,
                smoking,
                region,
                medical_history,
            } => {
                let record = InputRecord {
                    age: Some(age),
                    number_of_dependants: Some(dependants),
                    income_lakhs: Some(income),
                    genetical_risk: Some(genetical_risk),
                    insurance_plan: Some(plan),
                    employment_status: Some(employment),
                    gender: Some(gender),
                    marital_status: Some(marital_status),
                    bmi_category: Some(bmi),
                    smoking_status: Some(smoking),
                    region: Some(region),
                    medical_history: Some(medical_history),
                };
                let predictor = load_predictor(&config)?;
                predict_record(&predictor, &record)?;
            }
            Commands::Batch { input, top } => {
                run_batch(&config, &input, top)?;
            }
            Commands::Options => {
                list_options();
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn load_predictor(config: &ArtifactConfig) -> Result<InsurancePredictor> {
    InsurancePredictor::load(config)
        .with_context(|| format!("Failed to load artifacts from {:?}", config.model_dir))
}

/// Format an amount with thousands separators
fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn predict_record(predictor: &InsurancePredictor, record: &InputRecord) -> Result<()> {
    validate_record(record)?;

    let prediction = predictor
        .predict(record)
        .context("Prediction failed")?;

    println!(
        "{}: ₹{}  ({} cohort)",
        "Predicted Health Insurance Cost".green().bold(),
        format_amount(prediction.cost),
        prediction.cohort.as_str()
    );
    println!();

    let factors = risk_factors(record);
    println!(
        "{} {}",
        "Number of Risk Factors:".yellow().bold(),
        factors.len()
    );
    if factors.is_empty() {
        println!("  {}", "No major risk factors identified".green());
    } else {
        for factor in &factors {
            println!("  - {}", factor.label());
        }
    }

    let recs = recommendations(record);
    if !recs.is_empty() {
        println!();
        println!("{}", "Recommendations:".yellow().bold());
        for rec in &recs {
            println!("  {} {}", "→".cyan(), rec);
        }
    }

    Ok(())
}

fn run_batch(config: &ArtifactConfig, input: &Path, top: usize) -> Result<()> {
    let predictor = load_predictor(config)?;

    let batch = RecordBatch::load(input)
        .with_context(|| format!("Failed to load CSV from {:?}", input))?;

    if batch.is_empty() {
        println!("{}", "No records found in input.".red());
        return Ok(());
    }

    println!("{}: {} records", "Predicting".green(), batch.len());

    let pb = ProgressBar::new(batch.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let mut rows = Vec::with_capacity(batch.len());
    for row in batch.rows() {
        let outcome = row.as_ref().map_err(|e| e.to_string()).and_then(|record| {
            validate_record(record)
                .map_err(|e| e.to_string())
                .and_then(|_| predictor.predict(record).map_err(|e| e.to_string()))
        });
        rows.push((row.as_ref().ok(), outcome));
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!();
    println!(
        "{:>5} {:>4} {:<8} {:<13} {:>12}",
        "Row", "Age", "Plan", "Cohort", "Cost"
    );
    println!("{}", "-".repeat(48));

    for (i, (record, outcome)) in rows.iter().enumerate().take(top) {
        let age = record
            .and_then(|r| r.age)
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        let plan = record
            .and_then(|r| r.insurance_plan.as_deref())
            .unwrap_or("-");

        match outcome {
            Ok(prediction) => println!(
                "{:>5} {:>4} {:<8} {:<13} {:>12}",
                i + 1,
                age,
                plan,
                prediction.cohort.as_str(),
                format!("₹{}", format_amount(prediction.cost))
            ),
            Err(e) => println!(
                "{:>5} {:>4} {:<8} {}",
                i + 1,
                age,
                plan,
                e.as_str().red()
            ),
        }
    }
    if rows.len() > top {
        println!("{}", format!("... {} more rows", rows.len() - top).dimmed());
    }

    let costs: Vec<u64> = rows
        .iter()
        .filter_map(|(_, outcome)| outcome.as_ref().ok().map(|p| p.cost))
        .collect();
    let failed = rows.len() - costs.len();

    println!();
    println!("{}", "Summary:".yellow().bold());
    println!("  Predicted: {}", costs.len());
    if failed > 0 {
        println!("  Failed:    {}", failed.to_string().red());
    }
    if !costs.is_empty() {
        let total: u64 = costs.iter().sum();
        let mean = total / costs.len() as u64;
        let min = costs.iter().min().copied().unwrap_or(0);
        let max = costs.iter().max().copied().unwrap_or(0);
        println!("  Mean cost: ₹{}", format_amount(mean));
        println!(
            "  Range:     ₹{} - ₹{}",
            format_amount(min),
            format_amount(max)
        );
    }

    Ok(())
}

fn list_options() {
    println!("{}", "Form Options:".yellow().bold());
    for field in CategoricalField::ALL {
        let options: Vec<String> = field
            .options()
            .iter()
            .map(|o| {
                if o.is_empty() {
                    "(empty)".to_string()
                } else {
                    o.to_string()
                }
            })
            .collect();
        println!("  {:<18} {}", field.label(), options.join(", "));
    }

    println!();
    println!("{}", "Relative Impact on Cost:".yellow().bold());
    for impact in factor_impacts() {
        let bar = "█".repeat((impact.impact * 40.0).round() as usize);
        println!(
            "  {:<16} {:>5.2} {}",
            impact.factor,
            impact.impact,
            bar.cyan()
        );
    }
}

/// Prompt for a number within the form bounds
fn prompt_number(theme: &ColorfulTheme, label: &str, min: u32, max: u32) -> Result<u32> {
    let value = Input::<u32>::with_theme(theme)
        .with_prompt(format!("{} ({}-{})", label, min, max))
        .validate_with(|v: &u32| -> Result<(), String> {
            if (min..=max).contains(v) {
                Ok(())
            } else {
                Err(format!("Enter a value between {} and {}", min, max))
            }
        })
        .interact_text()?;
    Ok(value)
}

fn prompt_choice(theme: &ColorfulTheme, field: CategoricalField) -> Result<String> {
    let options = field.options();
    let display: Vec<&str> = options
        .iter()
        .map(|o| if o.is_empty() { "(none)" } else { o })
        .collect();

    let selection = Select::with_theme(theme)
        .with_prompt(field.label())
        .items(&display)
        .default(0)
        .interact()?;

    Ok(options[selection].to_string())
}

fn run_interactive(config: &ArtifactConfig) -> Result<()> {
    let predictor = load_predictor(config)?;
    let theme = ColorfulTheme::default();

    println!("{}", "Personal Information".yellow().bold());
    println!("Please fill in all the fields below to get an accurate prediction.");
    println!();

    loop {
        let mut record = InputRecord {
            age: Some(prompt_number(&theme, "Age", 18, 100)?),
            number_of_dependants: Some(prompt_number(&theme, "Number of Dependants", 0, 20)?),
            income_lakhs: Some(prompt_number(&theme, "Income in Lakhs", 0, 200)?),
            genetical_risk: Some(prompt_number(&theme, "Genetical Risk", 0, 5)?),
            ..Default::default()
        };
        for field in CategoricalField::ALL {
            let value = prompt_choice(&theme, field)?;
            record.set_categorical(field, Some(value));
        }

        println!();
        predict_record(&predictor, &record)?;
        println!();

        let again = Select::with_theme(&theme)
            .with_prompt("Calculate another?")
            .items(&["Yes", "No"])
            .default(1)
            .interact()?;
        if again != 0 {
            break;
        }
        println!();
    }

    Ok(())
}
