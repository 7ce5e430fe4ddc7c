use super::{record_id, require};
use resource_framework::AdminResource;
use serde::{Deserialize, Serialize};

record_id!(BoardBasisId);

/// A meal plan such as "All Inclusive" or "Bed & Breakfast".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardBasis {
    pub id: BoardBasisId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardBasisForm {
    pub name: String,
    pub description: Option<String>,
}

impl AdminResource for BoardBasis {
    type Id = BoardBasisId;
    type Payload = BoardBasisForm;
    const COLLECTION: &'static str = "board-basis";
    const LABEL: &'static str = "Board basis";

    fn id(&self) -> &BoardBasisId {
        &self.id
    }

    fn to_payload(&self) -> BoardBasisForm {
        BoardBasisForm {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    fn validate(form: &BoardBasisForm) -> Result<(), String> {
        require(&form.name, "Board basis name is required")
    }
}
