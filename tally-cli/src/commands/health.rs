//! `tally health` — patients and prescription history.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use tabled::Tabled;

use tally_domain::{HealthManager, Patient, Prescription};

use super::{done, print_json, print_table};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum HealthCommand {
    /// Add the sample patients and prescriptions.
    Seed,

    /// List patients.
    Patients {
        #[arg(long)]
        json: bool,
    },

    /// Register a patient.
    AddPatient(AddPatientArgs),

    /// Issue a prescription to an existing patient, dated now.
    Prescribe(PrescribeArgs),

    /// Show a patient's prescriptions, newest first.
    History {
        patient_id: u32,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddPatientArgs {
    pub id: u32,
    pub name: String,

    #[arg(long)]
    pub age: u32,

    #[arg(long)]
    pub gender: String,
}

#[derive(Args, Debug)]
pub struct PrescribeArgs {
    /// Prescription id.
    pub id: u32,
    pub patient_id: u32,
    pub medication: String,
}

#[derive(Tabled)]
struct PatientRow {
    #[tabled(rename = "id")]
    id: u32,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "age")]
    age: u32,
    #[tabled(rename = "gender")]
    gender: String,
}

#[derive(Tabled)]
struct PrescriptionRow {
    #[tabled(rename = "id")]
    id: u32,
    #[tabled(rename = "medication")]
    medication: String,
    #[tabled(rename = "issued")]
    issued: String,
}

pub fn run(command: HealthCommand, config: &Config) -> Result<()> {
    let mut manager = HealthManager::new(config.store()?);
    manager.load().context("failed to load health records")?;

    let changed = match command {
        HealthCommand::Seed => {
            manager.seed()?;
            done("Seeded 3 patients and 5 prescriptions");
            true
        }
        HealthCommand::Patients { json } => {
            let patients: Vec<&Patient> = manager.patients().iter().collect();
            if json {
                print_json(&patients)?;
            } else {
                let rows = patients
                    .into_iter()
                    .map(|p| PatientRow {
                        id: p.id,
                        name: p.name.clone(),
                        age: p.age,
                        gender: p.gender.clone(),
                    })
                    .collect();
                print_table(rows, "No patients registered.");
            }
            false
        }
        HealthCommand::AddPatient(args) => {
            let name = args.name.clone();
            manager.add_patient(Patient::new(args.id, args.name, args.age, args.gender))?;
            done(format!("Registered patient #{} ({name})", args.id));
            true
        }
        HealthCommand::Prescribe(args) => {
            let medication = args.medication.clone();
            manager.add_prescription(Prescription::new(
                args.id,
                args.patient_id,
                args.medication,
                Utc::now(),
            ))?;
            done(format!(
                "Prescribed {medication} to patient #{}",
                args.patient_id
            ));
            true
        }
        HealthCommand::History { patient_id, json } => {
            history(&manager, patient_id, json)?;
            false
        }
    };

    if changed {
        manager.save().context("failed to save health records")?;
    }
    Ok(())
}

fn history<S: tally_core::Storage>(
    manager: &HealthManager<S>,
    patient_id: u32,
    json: bool,
) -> Result<()> {
    let patient = manager.patients().get(patient_id)?;
    let prescriptions = manager.prescriptions_for(patient_id).unwrap_or_default();
    if json {
        return print_json(prescriptions);
    }

    println!("Prescriptions for {} (#{})", patient.name, patient.id);
    let rows = prescriptions
        .iter()
        .map(|p| PrescriptionRow {
            id: p.id,
            medication: p.medication_name.clone(),
            issued: p.date_issued.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();
    print_table(rows, "No prescriptions found.");
    Ok(())
}
