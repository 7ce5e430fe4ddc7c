use super::{record_id, require};
use resource_framework::AdminResource;
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Airports.
    AirportId
);

/// A departure airport offered on holiday searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: AirportId,
    pub name: String,
    /// IATA code, e.g. `LHR`.
    pub code: String,
    #[serde(default)]
    pub city: Option<String>,
    pub country: String,
}

/// Form data for creating or editing an airport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportForm {
    pub name: String,
    pub code: String,
    pub city: Option<String>,
    pub country: String,
}

impl AdminResource for Airport {
    type Id = AirportId;
    type Payload = AirportForm;
    const COLLECTION: &'static str = "airports";
    const LABEL: &'static str = "Airport";

    fn id(&self) -> &AirportId {
        &self.id
    }

    fn to_payload(&self) -> AirportForm {
        AirportForm {
            name: self.name.clone(),
            code: self.code.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
        }
    }

    fn validate(form: &AirportForm) -> Result<(), String> {
        require(&form.name, "Airport name is required")?;
        let code = form.code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err("Airport code must be three letters".to_string());
        }
        require(&form.country, "Country is required")
    }
}
