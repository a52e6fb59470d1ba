//! Command implementations for cardioctl.

use anyhow::{bail, Context, Result};
use cardio_core::auth::CredentialStore;
use cardio_core::config::CardioConfig;
use cardio_core::pipeline::Pipeline;
use cardio_core::provider::OllamaProvider;
use cardio_core::records::{FileRecordStore, RecordStore};
use cardio_core::storage::JsonStore;
use cardio_core::types::{AnalysisResult, Gender, RiskLevel, User, VitalsInput, VitalsReading};
use console::Term;
use owo_colors::OwoColorize;
use std::sync::Arc;

fn open_config_and_store() -> Result<(CardioConfig, JsonStore)> {
    let config = CardioConfig::load();
    let store = JsonStore::open(&config.data_dir)
        .with_context(|| format!("failed to open data dir {:?}", config.data_dir))?;
    Ok((config, store))
}

fn require_user(auth: &CredentialStore) -> Result<User> {
    auth.current_user()?
        .context("not logged in - run `cardioctl login <username>` first")
}

fn prompt_password(term: &Term, prompt: &str) -> Result<String> {
    term.write_str(prompt)?;
    let password = term.read_secure_line()?;
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}

pub fn register(username: &str, age: u32, gender: Gender) -> Result<()> {
    let (_config, store) = open_config_and_store()?;
    let auth = CredentialStore::new(store);

    let term = Term::stderr();
    let password = prompt_password(&term, "Password: ")?;
    let confirm = prompt_password(&term, "Confirm password: ")?;
    if password != confirm {
        bail!("passwords do not match");
    }

    let user = auth.register(username, &password, age, gender)?;
    println!("Registered and logged in as {}", user.username.bold());
    Ok(())
}

pub fn login(username: &str) -> Result<()> {
    let (_config, store) = open_config_and_store()?;
    let auth = CredentialStore::new(store);

    let term = Term::stderr();
    let password = prompt_password(&term, "Password: ")?;

    let user = auth.login(username, &password)?;
    println!("Logged in as {}", user.username.bold());
    Ok(())
}

pub fn logout() -> Result<()> {
    let (_config, store) = open_config_and_store()?;
    CredentialStore::new(store).logout()?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami() -> Result<()> {
    let (_config, store) = open_config_and_store()?;
    match CredentialStore::new(store).current_user()? {
        Some(user) => {
            println!("{} (id {})", user.username.bold(), user.id);
            if let (Some(age), Some(gender)) = (user.age, user.gender) {
                println!("age {}, {}", age, gender);
            }
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

pub async fn submit(
    age: Option<u32>,
    gender: Option<Gender>,
    heart_rate: u32,
    systolic: u32,
    diastolic: u32,
) -> Result<()> {
    let (config, store) = open_config_and_store()?;
    let auth = CredentialStore::new(store.clone());
    let user = require_user(&auth)?;

    let age = age.or(user.age).context("no age on file - pass --age")?;
    let gender = gender
        .or(user.gender)
        .context("no gender on file - pass --gender")?;

    let input = VitalsInput {
        age,
        gender,
        heart_rate,
        systolic_bp: systolic,
        diastolic_bp: diastolic,
    };

    let pipeline = Pipeline::new(
        Arc::new(FileRecordStore::new(store)),
        Arc::new(OllamaProvider::new(&config.provider)),
    );

    println!("Analyzing reading...");
    let result = pipeline.submit(&user, input).await?;
    print_result(&result);
    Ok(())
}

pub fn history() -> Result<()> {
    let (_config, store) = open_config_and_store()?;
    let auth = CredentialStore::new(store.clone());
    let user = require_user(&auth)?;

    let records = FileRecordStore::new(store).records_for(&user.id)?;
    if records.is_empty() {
        println!("No data entries yet.");
        return Ok(());
    }

    println!(
        "{:<18} {:>8} {:>10}  {}",
        "TIMESTAMP", "HR (BPM)", "BP (mmHg)", "STATUS"
    );
    for record in &records {
        print_record_row(record);
    }
    Ok(())
}

pub fn thresholds() -> Result<()> {
    println!("Risk level guidance");
    println!("  {:<8} HR 60-100 BPM, BP below 120/80 mmHg", "Low");
    println!("  {:<8} HR above 100 or below 60, BP 120-139/80-89", "Medium");
    println!(
        "  {:<8} HR above 120, BP at or above 140/90, or extreme values",
        "High"
    );
    println!();
    println!("Scoring weights (total >=4 is High, >=2 Medium, otherwise Low)");
    println!("  Blood pressure   +3 at >=160/100    +2 at >=140/90    +1 at >=130/85");
    println!("  Heart rate       +2 above 120 or below 50    +1 above 100 or below 60");
    println!("  Age              +1 above 65    +1 above 50 with systolic above 130");
    Ok(())
}

fn print_result(result: &AnalysisResult) {
    let level = match result.risk_level {
        RiskLevel::Low => "Low Risk".green().bold().to_string(),
        RiskLevel::Medium => "Medium Risk".yellow().bold().to_string(),
        RiskLevel::High => "High Risk".red().bold().to_string(),
    };

    println!();
    println!("Risk level: {}", level);
    println!("{}", result.summary);

    if !result.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for rec in &result.recommendations {
            println!("  - {}", rec);
        }
    }

    if !result.anomalies.is_empty() {
        println!();
        println!("Anomalies:");
        for anomaly in &result.anomalies {
            println!("  ! {}", anomaly.yellow());
        }
    }
}

fn print_record_row(record: &VitalsReading) {
    let when = chrono::DateTime::from_timestamp_millis(record.timestamp)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| record.timestamp.to_string());

    let hr_cell = format!("{:>8}", record.heart_rate);
    let hr_cell = if record.heart_rate > 100 || record.heart_rate < 60 {
        hr_cell.red().bold().to_string()
    } else {
        hr_cell
    };

    let bp_cell = format!("{:>10}", format!("{}/{}", record.systolic_bp, record.diastolic_bp));

    let status = if record.systolic_bp >= 140 || record.diastolic_bp >= 90 {
        "HYPER".red().to_string()
    } else {
        "NORMAL".green().to_string()
    };

    println!("{:<18} {} {}  {}", when, hr_cell, bp_cell, status);
}
