use super::{record_id, require};
use resource_framework::AdminResource;
use serde::{Deserialize, Serialize};

record_id!(TermId);

/// One section of the booking terms and conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermForm {
    pub title: String,
    pub content: String,
}

impl AdminResource for Term {
    type Id = TermId;
    type Payload = TermForm;
    const COLLECTION: &'static str = "terms";
    const LABEL: &'static str = "Term";

    fn id(&self) -> &TermId {
        &self.id
    }

    fn to_payload(&self) -> TermForm {
        TermForm {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }

    fn validate(form: &TermForm) -> Result<(), String> {
        require(&form.title, "Title is required")?;
        require(&form.content, "Content is required")
    }
}
