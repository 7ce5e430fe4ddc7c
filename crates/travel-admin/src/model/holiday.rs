use super::{record_id, require, AirportId, BoardBasisId};
use resource_framework::{AdminResource, FileField};
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Holidays.
    HolidayId
);

/// A bookable holiday package. Always carries a hero image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: HolidayId,
    pub title: String,
    pub destination: String,
    /// Price per person in whole pounds.
    pub price: u32,
    pub nights: u32,
    #[serde(default)]
    pub board_basis_id: Option<BoardBasisId>,
    #[serde(default)]
    pub departure_airport_id: Option<AirportId>,
    /// Server path of the uploaded image.
    pub image: String,
}

/// Form data for a holiday. The image travels separately as a staged file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HolidayForm {
    pub title: String,
    pub destination: String,
    pub price: u32,
    pub nights: u32,
    pub board_basis_id: Option<BoardBasisId>,
    pub departure_airport_id: Option<AirportId>,
}

impl AdminResource for Holiday {
    type Id = HolidayId;
    type Payload = HolidayForm;
    const COLLECTION: &'static str = "holidays";
    const LABEL: &'static str = "Holiday";
    const FILE: Option<FileField> = Some(FileField::required("image"));

    fn id(&self) -> &HolidayId {
        &self.id
    }

    fn to_payload(&self) -> HolidayForm {
        HolidayForm {
            title: self.title.clone(),
            destination: self.destination.clone(),
            price: self.price,
            nights: self.nights,
            board_basis_id: self.board_basis_id,
            departure_airport_id: self.departure_airport_id,
        }
    }

    fn validate(form: &HolidayForm) -> Result<(), String> {
        require(&form.title, "Title is required")?;
        require(&form.destination, "Destination is required")?;
        if form.price == 0 {
            return Err("Price must be greater than zero".to_string());
        }
        if form.nights == 0 {
            return Err("Nights must be at least 1".to_string());
        }
        Ok(())
    }
}
