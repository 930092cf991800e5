//! Lead records assembled from a completed calculation
//!
//! A `LeadRecord` is what gets handed to storage: contact details, the
//! questionnaire answers, the result verbatim, attribution, and a flat index
//! block for querying. Storage itself belongs to the caller.

use crate::engine::CalculationResult;
use crate::profile::HouseholdProfile;
use crate::reference::Jurisdiction;
use crate::validation::{strip_phone, validate_consultation, validate_contact};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LeadError {
    #[error("invalid contact: {0}")]
    InvalidContact(String),
    #[error("invalid consultation request: {0}")]
    InvalidConsultation(String),
}

/// Channel the lead arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadSource {
    #[default]
    IosApp,
    AndroidApp,
    Pwa,
    Web,
    QrCode,
    ContractorEmbed,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::IosApp => "ios-app",
            LeadSource::AndroidApp => "android-app",
            LeadSource::Pwa => "pwa",
            LeadSource::Web => "web",
            LeadSource::QrCode => "qr-code",
            LeadSource::ContractorEmbed => "contractor-embed",
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource playbook matched to an audience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Playbook {
    Nonprofit,
    LowIncome,
    Contractor,
    PeIntelligence,
}

impl Playbook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Playbook::Nonprofit => "nonprofit",
            Playbook::LowIncome => "low-income",
            Playbook::Contractor => "contractor",
            Playbook::PeIntelligence => "pe-intelligence",
        }
    }
}

/// Audience the calculator session is serving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserType {
    #[default]
    Homeowner,
    Nonprofit,
    LowIncomeHousing,
    Contractor,
    PeManager,
}

impl UserType {
    pub const ALL: [UserType; 5] = [
        UserType::Homeowner,
        UserType::Nonprofit,
        UserType::LowIncomeHousing,
        UserType::Contractor,
        UserType::PeManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Homeowner => "homeowner",
            UserType::Nonprofit => "nonprofit",
            UserType::LowIncomeHousing => "low-income-housing",
            UserType::Contractor => "contractor",
            UserType::PeManager => "pe-manager",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Homeowner => "Homeowner",
            UserType::Nonprofit => "Nonprofit Organization",
            UserType::LowIncomeHousing => "Affordable Housing Owner/Operator",
            UserType::Contractor => "HVAC Contractor",
            UserType::PeManager => "Portfolio/Asset Manager",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UserType::Homeowner => "Individual looking to upgrade their home",
            UserType::Nonprofit => "Community-serving 501(c)(3) organization",
            UserType::LowIncomeHousing => "Owner of low-income residential properties",
            UserType::Contractor => "Professional installer seeking resources",
            UserType::PeManager => "PE fund or real estate portfolio manager",
        }
    }

    /// Homeowners go straight to the calculator
    pub fn playbook(&self) -> Option<Playbook> {
        match self {
            UserType::Homeowner => None,
            UserType::Nonprofit => Some(Playbook::Nonprofit),
            UserType::LowIncomeHousing => Some(Playbook::LowIncome),
            UserType::Contractor => Some(Playbook::Contractor),
            UserType::PeManager => Some(Playbook::PeIntelligence),
        }
    }
}

/// Marketing attribution carried through a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub source: LeadSource,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub contractor_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sms_opt_in: bool,
}

impl ContactInfo {
    pub fn new(email: &str, phone: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            phone: phone.to_string(),
            ..Self::default()
        }
    }

    pub fn has_any(&self) -> bool {
        !self.email.trim().is_empty() || !strip_phone(&self.phone).is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadStatus {
    New,
    Contacted,
    ConsultationRequested,
    Converted,
    Closed,
}

/// Flat copy of result fields for querying without opening the result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadIndex {
    pub state: Jurisdiction,
    pub utility: String,
    pub risk_score: f64,
    pub incentive_coverage: f64,
    pub incremental_benefit: f64,
    pub total_incentives: f64,
    pub net_cost: f64,
}

impl LeadIndex {
    pub fn from_result(result: &CalculationResult) -> Self {
        Self {
            state: result.location_data.state,
            utility: result.location_data.utility.clone(),
            risk_score: result.intelligence.asset_risk_score,
            incentive_coverage: result.intelligence.incentive_coverage_percent,
            incremental_benefit: result.intelligence.incremental_net_benefit,
            total_incentives: result.total_incentives,
            net_cost: result.net_cost,
        }
    }
}

/// Analytics event emitted when a lead is captured
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionEvent {
    pub name: String,
    pub params: BTreeMap<String, Value>,
}

/// Kind of consultation being booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsultationType {
    #[default]
    Homeowner,
    Contractor,
    Portfolio,
}

impl ConsultationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationType::Homeowner => "homeowner",
            ConsultationType::Contractor => "contractor",
            ConsultationType::Portfolio => "portfolio",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ConsultationType::Homeowner => "Homeowner Consultation",
            ConsultationType::Contractor => "Contractor Partnership",
            ConsultationType::Portfolio => "Portfolio Analysis",
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        match self {
            ConsultationType::Homeowner => 30,
            ConsultationType::Contractor => 45,
            ConsultationType::Portfolio => 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Afternoon => "Afternoon",
            TimeSlot::Evening => "Evening",
        }
    }

    pub fn hours(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "9am - 12pm",
            TimeSlot::Afternoon => "12pm - 5pm",
            TimeSlot::Evening => "5pm - 7pm",
        }
    }
}

/// Consultation booking form as entered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationForm {
    pub consultation_type: ConsultationType,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<TimeSlot>,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsultationStatus {
    Pending,
    Scheduled,
    Completed,
    Cancelled,
}

/// Validated consultation request, ready for storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    pub lead_id: Option<String>,
    pub name: String,
    pub email: String,
    /// Digits only
    pub phone: String,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<TimeSlot>,
    /// Free text prefixed with a `Type: <kind>` line
    pub notes: String,
    pub consultation_type: ConsultationType,
    pub source: LeadSource,
    pub status: ConsultationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConsultationRequest {
    pub fn submit(
        form: ConsultationForm,
        lead_id: Option<&str>,
        source: LeadSource,
        now: DateTime<Utc>,
    ) -> Result<Self, LeadError> {
        let check = validate_consultation(&form.name, &form.email, &form.phone);
        if let Some(message) = check.first_error() {
            return Err(LeadError::InvalidConsultation(message.to_string()));
        }

        Ok(Self {
            lead_id: lead_id.map(str::to_string),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: strip_phone(&form.phone),
            preferred_date: form.preferred_date,
            preferred_time: form.preferred_time,
            notes: format!("Type: {}\n{}", form.consultation_type.as_str(), form.notes),
            consultation_type: form.consultation_type,
            source,
            status: ConsultationStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_status(&mut self, status: ConsultationStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    pub fn conversion_event(&self) -> ConversionEvent {
        let mut params = BTreeMap::new();
        params.insert("source".to_string(), json!(self.source.as_str()));
        params.insert("consultation_type".to_string(), json!(self.consultation_type.as_str()));

        ConversionEvent {
            name: "consultation_requested".to_string(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub contact: ContactInfo,
    pub profile: HouseholdProfile,
    pub calculated_results: CalculationResult,
    pub attribution: Attribution,
    pub user_type: UserType,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub index: LeadIndex,
}

impl LeadRecord {
    /// Assemble a new lead. The phone is stored as digits only.
    pub fn capture(
        contact: ContactInfo,
        profile: HouseholdProfile,
        result: CalculationResult,
        attribution: Attribution,
        user_type: UserType,
        now: DateTime<Utc>,
    ) -> Result<Self, LeadError> {
        let check = validate_contact(&contact.email, &contact.phone);
        if let Some(message) = check.first_error() {
            return Err(LeadError::InvalidContact(message.to_string()));
        }

        let contact = ContactInfo {
            phone: strip_phone(&contact.phone),
            ..contact
        };

        Ok(Self {
            contact,
            profile,
            index: LeadIndex::from_result(&result),
            calculated_results: result,
            attribution,
            user_type,
            status: LeadStatus::New,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_status(&mut self, status: LeadStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    /// Book a consultation against this lead and move it to `ConsultationRequested`.
    /// The lead is left untouched when the form is rejected.
    pub fn request_consultation(
        &mut self,
        form: ConsultationForm,
        lead_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ConsultationRequest, LeadError> {
        let request = ConsultationRequest::submit(form, lead_id, self.attribution.source, now)?;
        self.set_status(LeadStatus::ConsultationRequested, now);
        Ok(request)
    }

    /// `lead_captured` event with scalar parameters only
    pub fn conversion_event(&self) -> ConversionEvent {
        let id_or_empty = |id: Option<&'static str>| json!(id.unwrap_or(""));

        let mut params = BTreeMap::new();
        params.insert("state".to_string(), json!(self.index.state.abbreviation()));
        params.insert("home_type".to_string(), id_or_empty(self.profile.home_type.map(|h| h.id())));
        params.insert(
            "current_heating".to_string(),
            id_or_empty(self.profile.heating_system.map(|h| h.id())),
        );
        params.insert(
            "income_bracket".to_string(),
            id_or_empty(self.profile.income_bracket.map(|b| b.id())),
        );
        params.insert("total_incentives".to_string(), json!(self.index.total_incentives));
        params.insert("source".to_string(), json!(self.attribution.source.as_str()));

        ConversionEvent {
            name: "lead_captured".to_string(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CalculatorConfig, RebateCalculator};
    use crate::reference::{HeatingSystem, HomeType, IncomeBracket, SystemAge};
    use crate::validation::{MISSING_CONTACT_MESSAGE, MISSING_NAME_MESSAGE};
    use chrono::TimeZone;

    fn sample() -> (HouseholdProfile, CalculationResult) {
        let profile = HouseholdProfile::new(
            "21201",
            HomeType::SingleFamily,
            HeatingSystem::GasFurnace,
            SystemAge::Over20,
            IncomeBracket::Low,
        );
        let result = RebateCalculator::builtin(CalculatorConfig::for_year(2025)).compute_rebates(&profile);
        (profile, result)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_capture_builds_index() {
        let (profile, result) = sample();
        let lead = LeadRecord::capture(
            ContactInfo::new("jane@example.com", "(410) 555-1234"),
            profile,
            result.clone(),
            Attribution::default(),
            UserType::Homeowner,
            now(),
        )
        .unwrap();

        assert_eq!(lead.contact.phone, "4105551234");
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.calculated_results, result);
        assert_eq!(lead.index.state, Jurisdiction::Maryland);
        assert_eq!(lead.index.utility, "bge");
        assert_eq!(lead.index.risk_score, 9.0);
        assert_eq!(lead.index.total_incentives, 13_000.0);
        assert_eq!(lead.index.net_cost, 2_000.0);
        assert_eq!(lead.created_at, lead.updated_at);
    }

    #[test]
    fn test_capture_rejects_missing_contact() {
        let (profile, result) = sample();
        let err = LeadRecord::capture(
            ContactInfo::default(),
            profile,
            result,
            Attribution::default(),
            UserType::Homeowner,
            now(),
        )
        .unwrap_err();

        assert_eq!(err, LeadError::InvalidContact(MISSING_CONTACT_MESSAGE.to_string()));
    }

    #[test]
    fn test_conversion_event_params() {
        let (profile, result) = sample();
        let attribution = Attribution {
            source: LeadSource::QrCode,
            ..Attribution::default()
        };
        let lead = LeadRecord::capture(
            ContactInfo::new("", "4105551234"),
            profile,
            result,
            attribution,
            UserType::Nonprofit,
            now(),
        )
        .unwrap();

        let event = lead.conversion_event();
        assert_eq!(event.name, "lead_captured");
        assert_eq!(event.params["state"], "MD");
        assert_eq!(event.params["home_type"], "single-family");
        assert_eq!(event.params["current_heating"], "gas-furnace");
        assert_eq!(event.params["income_bracket"], "low");
        assert_eq!(event.params["total_incentives"], 13000.0);
        assert_eq!(event.params["source"], "qr-code");
        assert_eq!(event.params.len(), 6);
    }

    #[test]
    fn test_set_status_touches_updated_at() {
        let (profile, result) = sample();
        let mut lead = LeadRecord::capture(
            ContactInfo::new("jane@example.com", ""),
            profile,
            result,
            Attribution::default(),
            UserType::Homeowner,
            now(),
        )
        .unwrap();

        let later = now() + chrono::Duration::days(2);
        lead.set_status(LeadStatus::Contacted, later);
        assert_eq!(lead.status, LeadStatus::Contacted);
        assert_eq!(lead.updated_at, later);
        assert_eq!(lead.created_at, now());
    }

    #[test]
    fn test_user_type_playbooks() {
        assert_eq!(UserType::Homeowner.playbook(), None);
        assert_eq!(UserType::LowIncomeHousing.playbook(), Some(Playbook::LowIncome));
        assert_eq!(UserType::PeManager.playbook().map(|p| p.as_str()), Some("pe-intelligence"));
        assert_eq!(UserType::Contractor.label(), "HVAC Contractor");

        for user_type in UserType::ALL {
            let json = serde_json::to_value(user_type).unwrap();
            assert_eq!(json, user_type.as_str());
        }
    }

    fn consultation_form() -> ConsultationForm {
        ConsultationForm {
            consultation_type: ConsultationType::Portfolio,
            name: " Jane Doe ".to_string(),
            email: "jane@example.com".to_string(),
            phone: "(410) 555-1234".to_string(),
            preferred_date: NaiveDate::from_ymd_opt(2025, 3, 10),
            preferred_time: Some(TimeSlot::Morning),
            notes: "Twelve buildings".to_string(),
        }
    }

    #[test]
    fn test_consultation_submit() {
        let request = ConsultationRequest::submit(consultation_form(), Some("lead-1"), LeadSource::Web, now()).unwrap();

        assert_eq!(request.lead_id.as_deref(), Some("lead-1"));
        assert_eq!(request.name, "Jane Doe");
        assert_eq!(request.phone, "4105551234");
        assert_eq!(request.notes, "Type: portfolio\nTwelve buildings");
        assert_eq!(request.status, ConsultationStatus::Pending);
        assert_eq!(request.consultation_type.duration_minutes(), 60);

        let event = request.conversion_event();
        assert_eq!(event.name, "consultation_requested");
        assert_eq!(event.params["source"], "web");
    }

    #[test]
    fn test_consultation_requires_name() {
        let form = ConsultationForm {
            name: "  ".to_string(),
            ..consultation_form()
        };
        let err = ConsultationRequest::submit(form, None, LeadSource::IosApp, now()).unwrap_err();
        assert_eq!(err, LeadError::InvalidConsultation(MISSING_NAME_MESSAGE.to_string()));
    }

    #[test]
    fn test_request_consultation_moves_lead() {
        let (profile, result) = sample();
        let attribution = Attribution {
            source: LeadSource::ContractorEmbed,
            ..Attribution::default()
        };
        let mut lead = LeadRecord::capture(
            ContactInfo::new("jane@example.com", ""),
            profile,
            result,
            attribution,
            UserType::Homeowner,
            now(),
        )
        .unwrap();

        let later = now() + chrono::Duration::hours(1);
        let rejected = lead.request_consultation(ConsultationForm::default(), None, later);
        assert!(rejected.is_err());
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.updated_at, now());

        let request = lead.request_consultation(consultation_form(), Some("lead-9"), later).unwrap();
        assert_eq!(request.source, LeadSource::ContractorEmbed);
        assert_eq!(lead.status, LeadStatus::ConsultationRequested);
        assert_eq!(lead.updated_at, later);
    }

    #[test]
    fn test_lead_json_round_trips_through_storage() {
        let (profile, result) = sample();
        let lead = LeadRecord::capture(
            ContactInfo::new("jane@example.com", ""),
            profile,
            result,
            Attribution::default(),
            UserType::Homeowner,
            now(),
        )
        .unwrap();

        let json = serde_json::to_string(&lead).unwrap();
        assert!(json.contains("\"calculatedResults\""));
        let back: LeadRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lead);
    }
}
