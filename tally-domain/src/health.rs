//! Patients and their prescriptions.
//!
//! # Invariants
//!
//! - `by_patient` is rebuilt after every prescription change and after load;
//!   it is never edited in place.
//! - A prescription can only be added for a patient that exists.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{Entity, GroupIndex, RepoError, Repository, SnapshotStore, SortOrder, Storage};

use crate::error::DomainResult;
use crate::manager::{load_repo, save_repo, FlushPolicy};

pub const PATIENTS_DOC: &str = "patients";
pub const PRESCRIPTIONS_DOC: &str = "prescriptions";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: u32,
    pub name: String,
    pub age: u32,
    pub gender: String,
}

impl Patient {
    pub fn new(id: u32, name: impl Into<String>, age: u32, gender: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            gender: gender.into(),
        }
    }
}

impl Entity for Patient {
    type Id = u32;
    const KIND: &'static str = "patient";

    fn id(&self) -> u32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: u32,
    pub patient_id: u32,
    pub medication_name: String,
    pub date_issued: DateTime<Utc>,
}

impl Prescription {
    pub fn new(
        id: u32,
        patient_id: u32,
        medication_name: impl Into<String>,
        date_issued: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            patient_id,
            medication_name: medication_name.into(),
            date_issued,
        }
    }
}

impl Entity for Prescription {
    type Id = u32;
    const KIND: &'static str = "prescription";

    fn id(&self) -> u32 {
        self.id
    }
}

/// Patient and prescription repositories plus the per-patient index.
#[derive(Debug)]
pub struct HealthManager<S> {
    patients: Repository<Patient>,
    prescriptions: Repository<Prescription>,
    by_patient: GroupIndex<u32, Prescription>,
    store: SnapshotStore<S>,
    flush: FlushPolicy,
}

impl<S: Storage> HealthManager<S> {
    pub fn new(store: SnapshotStore<S>) -> Self {
        Self {
            patients: Repository::new(),
            prescriptions: Repository::new(),
            by_patient: GroupIndex::new(),
            store,
            flush: FlushPolicy::default(),
        }
    }

    pub fn with_flush(mut self, flush: FlushPolicy) -> Self {
        self.flush = flush;
        self
    }

    /// Add three patients and five prescriptions issued 1–10 days before `now`.
    pub fn seed_at(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.patients.add(Patient::new(1, "John Doe", 30, "Male"))?;
        self.patients.add(Patient::new(2, "Jane Smith", 25, "Female"))?;
        self.patients.add(Patient::new(3, "Michael Brown", 40, "Male"))?;

        let days_ago = |days: i64| now - Duration::days(days);
        self.prescriptions
            .add(Prescription::new(1, 1, "Paracetamol", days_ago(10)))?;
        self.prescriptions
            .add(Prescription::new(2, 1, "Amoxicillin", days_ago(5)))?;
        self.prescriptions
            .add(Prescription::new(3, 2, "Ibuprofen", days_ago(8)))?;
        self.prescriptions
            .add(Prescription::new(4, 3, "Vitamin C", days_ago(3)))?;
        self.prescriptions
            .add(Prescription::new(5, 2, "Cough Syrup", days_ago(1)))?;

        self.rebuild_index();
        tracing::info!("health records seeded");
        self.after_change()
    }

    pub fn seed(&mut self) -> DomainResult<()> {
        self.seed_at(Utc::now())
    }

    pub fn add_patient(&mut self, patient: Patient) -> DomainResult<()> {
        if patient.name.trim().is_empty() {
            return Err(RepoError::invalid(Patient::KIND, "name cannot be empty").into());
        }
        self.patients.add(patient)?;
        self.after_change()
    }

    /// Add a prescription for an existing patient and refresh the index.
    pub fn add_prescription(&mut self, prescription: Prescription) -> DomainResult<()> {
        if prescription.medication_name.trim().is_empty() {
            return Err(
                RepoError::invalid(Prescription::KIND, "medication name cannot be empty").into(),
            );
        }
        self.patients.get(prescription.patient_id)?;
        self.prescriptions.add(prescription)?;
        self.rebuild_index();
        self.after_change()
    }

    /// Prescriptions for `patient_id`, newest first. `None` if there are none.
    pub fn prescriptions_for(&self, patient_id: u32) -> Option<&[Prescription]> {
        self.by_patient.lookup(&patient_id)
    }

    pub fn rebuild_index(&mut self) {
        self.by_patient.rebuild(
            &self.prescriptions.all(),
            |p| p.patient_id,
            |p| p.date_issued,
            SortOrder::Descending,
        );
    }

    pub fn patients(&self) -> &Repository<Patient> {
        &self.patients
    }

    pub fn prescriptions(&self) -> &Repository<Prescription> {
        &self.prescriptions
    }

    pub fn save(&self) -> DomainResult<()> {
        save_repo(&self.store, PATIENTS_DOC, &self.patients)?;
        save_repo(&self.store, PRESCRIPTIONS_DOC, &self.prescriptions)
    }

    /// Replace both repositories with their saved snapshots, then rebuild
    /// the index. On error nothing is replaced.
    pub fn load(&mut self) -> DomainResult<()> {
        let mut patients = Repository::new();
        let mut prescriptions = Repository::new();
        load_repo(&self.store, PATIENTS_DOC, &mut patients)?;
        load_repo(&self.store, PRESCRIPTIONS_DOC, &mut prescriptions)?;

        self.patients = patients;
        self.prescriptions = prescriptions;
        self.rebuild_index();
        Ok(())
    }

    fn after_change(&self) -> DomainResult<()> {
        match self.flush {
            FlushPolicy::Manual => Ok(()),
            FlushPolicy::EveryChange => self.save(),
        }
    }
}
