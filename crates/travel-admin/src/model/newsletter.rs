use super::record_id;
use resource_framework::AdminResource;
use serde::{Deserialize, Serialize};

record_id!(SubscriberId);

/// A newsletter signup. Admins mostly list and remove these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub email: String,
    #[serde(default)]
    pub subscribed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriberForm {
    pub email: String,
}

impl AdminResource for Subscriber {
    type Id = SubscriberId;
    type Payload = SubscriberForm;
    const COLLECTION: &'static str = "newsletter";
    const LABEL: &'static str = "Subscriber";

    fn id(&self) -> &SubscriberId {
        &self.id
    }

    fn to_payload(&self) -> SubscriberForm {
        SubscriberForm {
            email: self.email.clone(),
        }
    }

    fn validate(form: &SubscriberForm) -> Result<(), String> {
        if form.email.trim().contains('@') {
            Ok(())
        } else {
            Err("Enter a valid email address".to_string())
        }
    }
}
