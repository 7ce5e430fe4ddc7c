use crate::config::{AdminConfig, ConfigError};
use crate::model::{
    media_policies, Airport, BoardBasis, CarouselSlide, Faq, Holiday, Subscriber, Term, User,
    UserId,
};
use resource_framework::{
    AdminResource, DeleteConfirmationController, HttpTransport, NotificationChannel,
    ResourceManager, ResourceManagerBuilder, StoreError, UploadStager,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Errors raised while starting the console.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("transport setup failed: {0}")]
    Transport(#[from] StoreError),
}

/// The running admin back office: one manager per screen.
pub struct AdminConsole {
    pub airports: ResourceManager<Airport>,
    pub board_basis: ResourceManager<BoardBasis>,
    pub holidays: ResourceManager<Holiday>,
    pub faqs: ResourceManager<Faq>,
    pub terms: ResourceManager<Term>,
    pub carousel: ResourceManager<CarouselSlide>,
    pub users: ResourceManager<User>,
    pub newsletter: ResourceManager<Subscriber>,
    notifications: NotificationChannel,
    acting_user: Option<UserId>,
    handles: Vec<JoinHandle<()>>,
}

/// What every store shares.
struct Wiring<'a> {
    config: &'a AdminConfig,
    transport: HttpTransport,
    notifications: NotificationChannel,
    handles: Vec<JoinHandle<()>>,
}

impl Wiring<'_> {
    fn start<R: AdminResource>(&mut self, builder: ResourceManagerBuilder<R>) -> ResourceManager<R> {
        let (manager, handle) = builder
            .buffer_size(self.config.store.buffer_size)
            .notifications(self.notifications.clone())
            .cooldown(self.config.ui.cooldown())
            .severity_ttl(self.config.ui.success_ttl(), self.config.ui.error_ttl())
            .spawn(self.transport.clone());
        self.handles.push(handle);
        manager
    }
}

impl AdminConsole {
    /// Starts every store against the configured API. Must be called inside a runtime.
    ///
    /// # Errors
    ///
    /// [`ConsoleError`] when the configuration is invalid or the HTTP client cannot be built.
    pub fn new(config: &AdminConfig) -> Result<Self, ConsoleError> {
        config.validate()?;
        let transport = HttpTransport::new(
            config.api.base_url.clone(),
            config.api.auth_token.as_deref(),
            config.api.connect_timeout(),
            config.api.request_timeout(),
        )?;
        let notifications = NotificationChannel::new(config.ui.notification_ttl());
        let stager = Arc::new(UploadStager::new(config.uploads.staging_dir.clone()));
        let images = config.uploads.images.clone();
        let media = media_policies(&config.uploads.images, &config.uploads.videos);

        let mut wiring = Wiring {
            config,
            transport,
            notifications: notifications.clone(),
            handles: Vec::new(),
        };
        let airports = wiring.start(ResourceManager::builder());
        let board_basis = wiring.start(ResourceManager::builder());
        let holidays = wiring.start(ResourceManager::builder().uploads(stager.clone(), images));
        let faqs = wiring.start(ResourceManager::builder());
        let terms = wiring.start(ResourceManager::builder());
        let carousel = wiring.start(ResourceManager::builder().upload_policies(stager, media));
        let users = wiring.start(ResourceManager::builder());
        let newsletter = wiring.start(ResourceManager::builder());

        info!(
            base_url = %config.api.base_url,
            stores = wiring.handles.len(),
            "Admin console started"
        );
        Ok(Self {
            airports,
            board_basis,
            holidays,
            faqs,
            terms,
            carousel,
            users,
            newsletter,
            notifications,
            acting_user: config.session.acting_user_id.map(UserId),
            handles: wiring.handles,
        })
    }

    /// The channel every screen posts to.
    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    pub fn acting_user(&self) -> Option<UserId> {
        self.acting_user
    }

    /// A delete session for the user screen that refuses to delete the signed-in admin.
    pub fn user_delete_confirmation(&self) -> DeleteConfirmationController<User> {
        self.users.delete_confirmation(self.acting_user)
    }

    /// Loads every collection. Returns the collections that failed to load.
    pub async fn refresh_all(&self) -> Vec<(&'static str, StoreError)> {
        let results = [
            refresh(&self.airports).await,
            refresh(&self.board_basis).await,
            refresh(&self.holidays).await,
            refresh(&self.faqs).await,
            refresh(&self.terms).await,
            refresh(&self.carousel).await,
            refresh(&self.users).await,
            refresh(&self.newsletter).await,
        ];
        results.into_iter().flatten().collect()
    }

    /// Closes every store and waits for them to finish.
    pub async fn shutdown(self) {
        info!(stores = self.handles.len(), "Shutting down admin console");
        drop(self.airports);
        drop(self.board_basis);
        drop(self.holidays);
        drop(self.faqs);
        drop(self.terms);
        drop(self.carousel);
        drop(self.users);
        drop(self.newsletter);

        for handle in self.handles {
            if let Err(error) = handle.await {
                warn!(%error, "Store task ended abnormally");
            }
        }
        info!("Admin console stopped");
    }
}

async fn refresh<R: AdminResource>(
    manager: &ResourceManager<R>,
) -> Option<(&'static str, StoreError)> {
    match manager.store().list().await {
        Ok(records) => {
            info!(collection = R::COLLECTION, size = records.len(), "Loaded");
            None
        }
        Err(error) => {
            warn!(collection = R::COLLECTION, %error, "Load failed");
            Some((R::COLLECTION, error))
        }
    }
}
