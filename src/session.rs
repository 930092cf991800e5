//! Per-session calculator context
//!
//! Holds the questionnaire draft for one visitor as it is filled in step by
//! step. Each session is an owned value passed to whatever handles the
//! request; nothing is shared between sessions.

use crate::engine::{CalculationResult, RebateCalculator};
use crate::lead::{
    Attribution, ConsultationForm, ConsultationRequest, ConsultationType, ContactInfo, LeadError,
    LeadRecord, LeadSource, UserType,
};
use crate::profile::HouseholdProfile;
use crate::reference::{HeatingSystem, HomeType, IncomeBracket, SystemAge};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// Location, home, heating, income, contact, results
pub const TOTAL_STEPS: u8 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorSession {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    current_step: u8,

    // Questionnaire draft
    postal_code: String,
    home_type: Option<HomeType>,
    square_feet: Option<f64>,
    heating_system: Option<HeatingSystem>,
    system_age: Option<SystemAge>,
    income_bracket: Option<IncomeBracket>,

    contact: ContactInfo,
    results: Option<CalculationResult>,
    user_type: UserType,
    lead_id: Option<String>,
    attribution: Attribution,
}

impl CalculatorSession {
    pub fn new(session_id: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.to_string(),
            started_at,
            current_step: 1,
            postal_code: String::new(),
            home_type: None,
            square_feet: None,
            heating_system: None,
            system_age: None,
            income_bracket: None,
            contact: ContactInfo::default(),
            results: None,
            user_type: UserType::default(),
            lead_id: None,
            attribution: Attribution::default(),
        }
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn results(&self) -> Option<&CalculationResult> {
        self.results.as_ref()
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub fn lead_id(&self) -> Option<&str> {
        self.lead_id.as_deref()
    }

    pub fn attribution(&self) -> &Attribution {
        &self.attribution
    }

    pub fn set_postal_code(&mut self, postal_code: &str) {
        self.postal_code = postal_code.trim().to_string();
    }

    pub fn set_home_type(&mut self, home_type: HomeType) {
        self.home_type = Some(home_type);
    }

    pub fn set_square_feet(&mut self, square_feet: f64) {
        self.square_feet = Some(square_feet);
    }

    pub fn set_heating_system(&mut self, heating_system: HeatingSystem) {
        self.heating_system = Some(heating_system);
    }

    pub fn set_system_age(&mut self, system_age: SystemAge) {
        self.system_age = Some(system_age);
    }

    pub fn set_income_bracket(&mut self, income_bracket: IncomeBracket) {
        self.income_bracket = Some(income_bracket);
    }

    pub fn set_contact(&mut self, contact: ContactInfo) {
        self.contact = contact;
    }

    pub fn set_results(&mut self, results: CalculationResult) {
        self.results = Some(results);
    }

    pub fn set_lead_id(&mut self, lead_id: &str) {
        self.lead_id = Some(lead_id.to_string());
    }

    pub fn set_user_type(&mut self, user_type: UserType) {
        self.user_type = user_type;
    }

    /// Move to a step, clamped to 1..=6
    pub fn set_step(&mut self, step: u8) {
        self.current_step = step.clamp(1, TOTAL_STEPS);
    }

    /// Replace attribution. A missing source keeps the current one; the
    /// utm fields and contractor id are always overwritten.
    pub fn set_attribution(&mut self, source: Option<LeadSource>, update: Attribution) {
        self.attribution = Attribution {
            source: source.unwrap_or(self.attribution.source),
            ..update
        };
    }

    /// The draft as a calculator input
    pub fn profile(&self) -> HouseholdProfile {
        HouseholdProfile {
            postal_code: self.postal_code.clone(),
            home_type: self.home_type,
            square_feet: self.square_feet,
            heating_system: self.heating_system,
            system_age: self.system_age,
            income_bracket: self.income_bracket,
        }
    }

    pub fn is_step_complete(&self, step: u8) -> bool {
        match step {
            1 => self.postal_code.chars().count() == 5,
            2 => self.home_type.is_some(),
            3 => self.heating_system.is_some() && self.system_age.is_some(),
            4 => self.income_bracket.is_some(),
            5 => !self.contact.email.is_empty() || !self.contact.phone.is_empty(),
            6 => self.results.is_some(),
            _ => false,
        }
    }

    /// Percentage of steps complete
    pub fn progress(&self) -> f64 {
        let completed = (1..=TOTAL_STEPS).filter(|s| self.is_step_complete(*s)).count();
        completed as f64 / TOTAL_STEPS as f64 * 100.0
    }

    /// Compute results for the current draft and store them
    pub fn calculate(&mut self, calculator: &RebateCalculator) -> &CalculationResult {
        self.results.insert(calculator.compute_rebates(&self.profile()))
    }

    /// Run the contact gate: compute final results, build the lead and move
    /// to the results step. Results are kept even if the contact is rejected.
    pub fn submit_contact(
        &mut self,
        calculator: &RebateCalculator,
        contact: ContactInfo,
        now: DateTime<Utc>,
    ) -> Result<LeadRecord, LeadError> {
        let result = self.calculate(calculator).clone();
        self.contact = contact.clone();

        let lead = LeadRecord::capture(
            contact,
            self.profile(),
            result,
            self.attribution.clone(),
            self.user_type,
            now,
        );
        if lead.is_ok() {
            self.set_step(TOTAL_STEPS);
        }
        lead
    }

    /// Booking form prefilled with the contact already given
    pub fn consultation_form(&self, consultation_type: ConsultationType) -> ConsultationForm {
        let name = [&self.contact.first_name, &self.contact.last_name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        ConsultationForm {
            consultation_type,
            name,
            email: self.contact.email.clone(),
            phone: self.contact.phone.clone(),
            ..ConsultationForm::default()
        }
    }

    /// Validate a booking against this session's lead and attribution
    pub fn request_consultation(
        &self,
        form: ConsultationForm,
        now: DateTime<Utc>,
    ) -> Result<ConsultationRequest, LeadError> {
        ConsultationRequest::submit(form, self.lead_id(), self.attribution.source, now)
    }

    /// Start over under a new session id, keeping attribution
    pub fn reset(&mut self, session_id: &str, now: DateTime<Utc>) {
        debug!("Resetting session {} as {}", self.session_id, session_id);
        let attribution = std::mem::take(&mut self.attribution);
        *self = Self {
            attribution,
            ..Self::new(session_id, now)
        };
    }
}
