use super::{record_id, require};
use resource_framework::AdminResource;
use serde::{Deserialize, Serialize};

record_id!(FaqId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaqForm {
    pub question: String,
    pub answer: String,
}

impl AdminResource for Faq {
    type Id = FaqId;
    type Payload = FaqForm;
    const COLLECTION: &'static str = "faqs";
    const LABEL: &'static str = "FAQ";

    fn id(&self) -> &FaqId {
        &self.id
    }

    fn to_payload(&self) -> FaqForm {
        FaqForm {
            question: self.question.clone(),
            answer: self.answer.clone(),
        }
    }

    fn validate(form: &FaqForm) -> Result<(), String> {
        require(&form.question, "Question is required")?;
        require(&form.answer, "Answer is required")
    }
}
