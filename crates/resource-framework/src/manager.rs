//! # Resource Manager
//!
//! One [`ResourceManager`] per admin screen. It owns the wiring for a resource type (store
//! client, notification channel, upload policy, timings) and stamps out fresh dialog and
//! delete controllers, so screens never assemble those by hand.
//!
//! ```rust,ignore
//! let (airports, handle) = ResourceManager::<Airport>::builder()
//!     .notifications(channel.clone())
//!     .spawn(transport.clone());
//!
//! let dialog = airports.dialog();
//! let delete = airports.delete_confirmation(None);
//! ```

use crate::actor::StoreActor;
use crate::client::StoreClient;
use crate::delete::DeleteConfirmationController;
use crate::dialog::{ResourceDialogController, UploadSlot};
use crate::entity::AdminResource;
use crate::guard::{SubmissionGuard, DEFAULT_COOLDOWN};
use crate::notification::{NotificationChannel, TtlOverrides};
use crate::staging::UploadStager;
use crate::transport::ResourceTransport;
use crate::upload::UploadPolicy;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

const DEFAULT_BUFFER_SIZE: usize = 32;

/// Factory for the controllers of one resource type.
pub struct ResourceManager<R: AdminResource> {
    store: StoreClient<R>,
    notifications: NotificationChannel,
    uploads: Option<UploadSlot>,
    cooldown: Duration,
    ttl: TtlOverrides,
}

impl<R: AdminResource> Clone for ResourceManager<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            notifications: self.notifications.clone(),
            uploads: self.uploads.clone(),
            cooldown: self.cooldown,
            ttl: self.ttl,
        }
    }
}

impl<R: AdminResource> ResourceManager<R> {
    pub fn builder() -> ResourceManagerBuilder<R> {
        ResourceManagerBuilder::default()
    }

    pub fn store(&self) -> &StoreClient<R> {
        &self.store
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    /// Policies files are checked against. Empty when the resource takes no files.
    pub fn upload_policies(&self) -> &[UploadPolicy] {
        self.uploads.as_ref().map_or(&[], |slot| slot.policies.as_slice())
    }

    /// A new create/edit dialog with its own guard key-space.
    pub fn dialog(&self) -> ResourceDialogController<R> {
        let mut dialog = ResourceDialogController::new(self.store.clone(), self.notifications.clone())
            .with_guard(SubmissionGuard::new(self.cooldown));
        if let Some(slot) = &self.uploads {
            dialog = dialog.with_upload_policies(slot.stager.clone(), slot.policies.clone());
        }
        dialog.with_notification_ttl(self.ttl)
    }

    /// A new delete session. `acting` is the signed-in identity when it can be a target.
    pub fn delete_confirmation(&self, acting: Option<R::Id>) -> DeleteConfirmationController<R> {
        let mut delete = DeleteConfirmationController::new(self.store.clone(), self.notifications.clone())
            .with_guard(SubmissionGuard::new(self.cooldown));
        if let Some(acting) = acting {
            delete = delete.with_acting_identity(acting);
        }
        delete.with_notification_ttl(self.ttl)
    }
}

/// Builder for [`ResourceManager`].
pub struct ResourceManagerBuilder<R: AdminResource> {
    buffer_size: usize,
    notifications: Option<NotificationChannel>,
    uploads: Option<UploadSlot>,
    cooldown: Duration,
    ttl: TtlOverrides,
    _resource: std::marker::PhantomData<fn() -> R>,
}

impl<R: AdminResource> Default for ResourceManagerBuilder<R> {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            notifications: None,
            uploads: None,
            cooldown: DEFAULT_COOLDOWN,
            ttl: TtlOverrides::default(),
            _resource: std::marker::PhantomData,
        }
    }
}

impl<R: AdminResource> ResourceManagerBuilder<R> {
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Shares a channel with other screens. Defaults to a private one.
    pub fn notifications(mut self, channel: NotificationChannel) -> Self {
        self.notifications = Some(channel);
        self
    }

    pub fn uploads(self, stager: Arc<UploadStager>, policy: UploadPolicy) -> Self {
        self.upload_policies(stager, vec![policy])
    }

    /// For a file field that takes several kinds, e.g. an image or a video.
    pub fn upload_policies(mut self, stager: Arc<UploadStager>, policies: Vec<UploadPolicy>) -> Self {
        self.uploads = Some(UploadSlot { stager, policies });
        self
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// One lifetime for every notification the controllers post.
    pub fn notification_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = TtlOverrides::uniform(ttl);
        self
    }

    /// Separate lifetimes for success and error notifications.
    pub fn severity_ttl(mut self, success: Duration, error: Duration) -> Self {
        self.ttl = TtlOverrides {
            success: Some(success),
            error: Some(error),
        };
        self
    }

    /// Starts a store actor on `transport` and returns the manager with the actor's handle.
    ///
    /// The actor stops once the manager and every controller it produced are dropped.
    pub fn spawn<T: ResourceTransport<R>>(self, transport: T) -> (ResourceManager<R>, JoinHandle<()>) {
        let (actor, store) = StoreActor::<R>::new(self.buffer_size);
        let handle = tokio::spawn(actor.run(transport));
        info!(collection = R::COLLECTION, "Resource manager started");
        (self.build(store), handle)
    }

    /// Wraps an existing store client (a shared store, or a mock).
    pub fn build(self, store: StoreClient<R>) -> ResourceManager<R> {
        ResourceManager {
            store,
            notifications: self.notifications.unwrap_or_default(),
            uploads: self.uploads,
            cooldown: self.cooldown,
            ttl: self.ttl,
        }
    }
}
